//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_registry::SessionRegistry;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with the PostgreSQL repository
pub fn auth_router(
    repo: PgAuthRepository,
    registry: SessionRegistry<PgAuthRepository>,
    config: AuthConfig,
) -> Router {
    auth_router_generic(Arc::new(repo), registry, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<U, S>(
    users: Arc<U>,
    registry: SessionRegistry<S>,
    config: AuthConfig,
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let state = AuthAppState {
        users,
        registry,
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<U, S>))
        .route("/signin", post(handlers::sign_in::<U, S>))
        .route("/signout", post(handlers::sign_out::<U, S>))
        .route("/status", get(handlers::session_status::<U, S>))
        .with_state(state)
}
