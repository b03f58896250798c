//! Current user

use std::sync::Arc;

use meete_domain::error::Result;
use meete_domain::value_objects::User;
use meete_infrastructure::di::{Dependencies, Invocation, Operation, OperationInfo, Operations};
use meete_infrastructure::routing::{
    GroupDeclaration, HANDLER_GROUPS, HandlerGroup, HandlerGroupEntry, Route,
};

/// `/users`
pub struct UserHandlers;

impl UserHandlers {
    async fn me(&self, user: User) -> Result<User> {
        Ok(user)
    }

    async fn authorities(&self, user: User) -> Result<Vec<String>> {
        Ok(user.authorities)
    }
}

impl Operations for UserHandlers {
    fn operations(self: Arc<Self>) -> Vec<Operation> {
        vec![
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("me"),
                |this: Arc<Self>, invocation: Invocation| async move {
                    this.me(invocation.user()?).await
                },
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("authorities"),
                |this: Arc<Self>, invocation: Invocation| async move {
                    this.authorities(invocation.user()?).await
                },
            ),
        ]
    }
}

impl HandlerGroup for UserHandlers {
    const NAME: &'static str = "users";

    fn declare() -> GroupDeclaration {
        GroupDeclaration::new("/users")
            .tag("users")
            .route(Route::get("/me", "me").user().summary("Authenticated user"))
            .route(
                Route::get("/me/authorities", "authorities")
                    .user()
                    .summary("Authorities granted to the authenticated user"),
            )
    }

    fn construct(_deps: &Dependencies<'_>) -> Result<Self> {
        Ok(Self)
    }
}

#[linkme::distributed_slice(HANDLER_GROUPS)]
static USERS: HandlerGroupEntry = HandlerGroupEntry::of::<UserHandlers>(module_path!());
