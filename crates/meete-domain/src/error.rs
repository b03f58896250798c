//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Default message carried by authentication failures
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated";

/// Default message carried by authorization failures
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Main error type for the Meete backend
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// A capability was requested that has no binding, or that the
    /// requesting binding never declared
    #[error("Unresolved dependency: {key} (requested by {})", .requested_by.as_deref().unwrap_or("container"))]
    UnresolvedDependency {
        /// Display form of the capability key
        key: String,
        /// Binding whose factory asked for the key, if any
        requested_by: Option<String>,
    },

    /// The dependency graph reachable from a capability contains a cycle
    #[error("Cyclic dependency: {}", .chain.join(" -> "))]
    CyclicDependency {
        /// Keys along the cycle, first and last being the same key
        chain: Vec<String>,
    },

    /// A type was queried for handler group metadata it never declared
    #[error("Not a router: {name}")]
    NotARouter {
        /// Type name of the queried handler
        name: String,
    },

    /// Missing, invalid or disabled credentials
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Machine code surfaced in the response body
        code: i64,
        /// Human readable reason
        message: String,
    },

    /// Authenticated principal lacks a required authority
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Machine code surfaced in the response body
        code: i64,
        /// Human readable reason
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network-related error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache operation error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// Wiring error creation methods
impl Error {
    /// Create an unresolved dependency error
    pub fn unresolved<K: ToString>(key: K, requested_by: Option<String>) -> Self {
        Self::UnresolvedDependency {
            key: key.to_string(),
            requested_by,
        }
    }

    /// Create a cyclic dependency error from the keys along the cycle
    pub fn cyclic_dependency(chain: Vec<String>) -> Self {
        Self::CyclicDependency { chain }
    }

    /// Create a not-a-router error
    pub fn not_a_router<S: Into<String>>(name: S) -> Self {
        Self::NotARouter { name: name.into() }
    }
}

// Authentication error creation methods
impl Error {
    /// Create an unauthenticated error with the default code
    pub fn unauthenticated<S: Into<String>>(message: S) -> Self {
        Self::Unauthenticated {
            code: 401,
            message: message.into(),
        }
    }

    /// Create an unauthenticated error with the default message
    pub fn unauthenticated_default() -> Self {
        Self::unauthenticated(UNAUTHENTICATED_MESSAGE)
    }

    /// Create an unauthenticated error carrying an upstream code
    pub fn unauthenticated_with_code<S: Into<String>>(code: i64, message: S) -> Self {
        Self::Unauthenticated {
            code,
            message: message.into(),
        }
    }

    /// Create an unauthorized error with the default code
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            code: 403,
            message: message.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Network error creation methods
impl Error {
    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Internal and infrastructure error creation methods
impl Error {
    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Boundary mapping
impl Error {
    /// HTTP status the request boundary answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated { .. } => 401,
            Self::Unauthorized { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::InvalidArgument { .. } | Self::Json { .. } => 400,
            _ => 500,
        }
    }

    /// Machine code placed in the structured error body
    pub fn code(&self) -> i64 {
        match self {
            Self::Unauthenticated { code, .. } | Self::Unauthorized { code, .. } => *code,
            other => i64::from(other.status_code()),
        }
    }

    /// Message placed in the structured error body
    ///
    /// Authentication failures expose their bare message; wiring and
    /// infrastructure failures are not leaked past the boundary.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthenticated { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::InvalidArgument { message } => message.clone(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Json { source } => format!("Malformed JSON: {source}"),
            _ => "Internal Server Error".to_string(),
        }
    }

    /// Whether this error indicates a wiring defect that must stop startup
    pub fn is_wiring_defect(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedDependency { .. }
                | Self::CyclicDependency { .. }
                | Self::NotARouter { .. }
                | Self::Configuration { .. }
        )
    }
}
