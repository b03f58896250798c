//! Liveness

use std::sync::Arc;

use meete_domain::error::Result;
use meete_infrastructure::AppConfig;
use meete_infrastructure::di::{
    CapabilityKey, Dependencies, Invocation, Operation, OperationInfo, Operations,
};
use meete_infrastructure::routing::{
    GroupDeclaration, HANDLER_GROUPS, HandlerGroup, HandlerGroupEntry, Route,
};
use serde::Serialize;

/// Liveness report
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Always `"ok"` when the server answers
    pub status: &'static str,
    /// API title from configuration
    pub title: String,
    /// API version from configuration
    pub version: String,
}

/// `/health`
pub struct HealthHandlers {
    title: String,
    version: String,
}

impl HealthHandlers {
    async fn status(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "ok",
            title: self.title.clone(),
            version: self.version.clone(),
        })
    }
}

impl Operations for HealthHandlers {
    fn operations(self: Arc<Self>) -> Vec<Operation> {
        vec![Operation::bind(
            &self,
            OperationInfo::new::<Self>("status"),
            |this: Arc<Self>, _invocation: Invocation| async move { this.status().await },
        )]
    }
}

impl HandlerGroup for HealthHandlers {
    const NAME: &'static str = "health";

    fn declare() -> GroupDeclaration {
        GroupDeclaration::new("/health")
            .tag("health")
            .route(Route::get("/", "status").summary("Liveness probe"))
    }

    fn dependencies() -> Vec<CapabilityKey> {
        vec![CapabilityKey::of::<AppConfig>()]
    }

    fn construct(deps: &Dependencies<'_>) -> Result<Self> {
        let config = deps.get::<AppConfig>()?;
        Ok(Self {
            title: config.server.title.clone(),
            version: config.server.version.clone(),
        })
    }
}

#[linkme::distributed_slice(HANDLER_GROUPS)]
static HEALTH: HandlerGroupEntry = HandlerGroupEntry::of::<HealthHandlers>(module_path!());
