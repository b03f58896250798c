//! Handler group discovery configuration

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_IGNORED_NAMESPACES, DEFAULT_ROUTING_PACKAGE};

/// Handler group discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Module path whose handler groups are mounted
    pub package: String,
    /// Module roots skipped while walking
    pub ignored_namespaces: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_ROUTING_PACKAGE.to_string(),
            ignored_namespaces: DEFAULT_IGNORED_NAMESPACES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
