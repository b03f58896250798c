//! Server constants

// ============================================================================
// REQUEST MAPPING
// ============================================================================

/// Keyword argument carrying the decoded JSON request body
pub const BODY_KWARG: &str = "body";

// ============================================================================
// HANDLER GROUPS
// ============================================================================

/// Authority required to read a course roster
pub const LECTURER_AUTHORITY: &str = "LECTURER";

/// Seconds a course lookup stays cached
pub const COURSE_CACHE_TTL_SECS: u64 = 60;
