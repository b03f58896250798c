//! Current OAuth2 client

use std::sync::Arc;

use meete_domain::error::Result;
use meete_infrastructure::di::{Dependencies, Invocation, Operation, OperationInfo, Operations};
use meete_infrastructure::routing::{
    GroupDeclaration, HANDLER_GROUPS, HandlerGroup, HandlerGroupEntry, Route,
};

/// `/clients`
pub struct ClientHandlers;

impl Operations for ClientHandlers {
    fn operations(self: Arc<Self>) -> Vec<Operation> {
        vec![Operation::bind(
            &self,
            OperationInfo::new::<Self>("me"),
            |_this: Arc<Self>, invocation: Invocation| async move { invocation.client() },
        )]
    }
}

impl HandlerGroup for ClientHandlers {
    const NAME: &'static str = "clients";

    fn declare() -> GroupDeclaration {
        GroupDeclaration::new("/clients")
            .tag("clients")
            .route(Route::get("/me", "me").client().summary("Authenticated client"))
    }

    fn construct(_deps: &Dependencies<'_>) -> Result<Self> {
        Ok(Self)
    }
}

#[linkme::distributed_slice(HANDLER_GROUPS)]
static CLIENTS: HandlerGroupEntry = HandlerGroupEntry::of::<ClientHandlers>(module_path!());
