//! Domain layer constants
//!
//! Field names and messages that shape how principals are read out of
//! token introspection payloads.

// ============================================================================
// PRINCIPAL EXTRACTION CONSTANTS
// ============================================================================

/// Field holding the authority list in introspection payloads
pub const AUTHORITIES_FIELD: &str = "authorities";

/// Keys tried, in order, when an authority entry is an object
pub const AUTHORITY_KEYS: [&str; 3] = ["authority", "role", "value"];

/// Keys tried, in order, when locating the principal identifier
pub const PRINCIPAL_KEYS: [&str; 7] = ["user", "username", "userid", "user_id", "login", "id", "name"];

/// Maximum nesting depth searched for an authority list
pub const AUTHORITY_SEARCH_DEPTH: usize = 16;

/// Field holding arbitrary user details
pub const DETAILS_FIELD: &str = "details";

/// Field holding the client's additional information
pub const ADDITIONAL_INFORMATION_FIELD: &str = "additional_information";

/// Partner identifier key inside the client's additional information
pub const PARTNER_ID_FIELD: &str = "partner_id";

// ============================================================================
// AUTHENTICATION MESSAGES
// ============================================================================

/// Message used when the authorization server cannot be reached
pub const CANNOT_CONNECT_MESSAGE: &str = "Can't connect to authorization server";

/// Message used when a resolved user is inactive
pub const USER_DISABLED_MESSAGE: &str = "This user has been disabled";

/// Message used when a resolved client is inactive
pub const CLIENT_DISABLED_MESSAGE: &str = "This client has been disabled";
