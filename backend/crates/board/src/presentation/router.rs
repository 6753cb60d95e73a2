//! Board Router

use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

use auth::domain::repository::SessionStore;
use auth::{PgAuthRepository, SessionLayerState, require_session};

use crate::application::config::BoardConfig;
use crate::domain::repository::{CommentRepository, PostRepository, VoteRepository};
use crate::infra::postgres::PgBoardRepository;
use crate::presentation::handlers::{self, BoardAppState};

/// Create the Board router with the PostgreSQL repositories
pub fn board_router(
    repo: PgBoardRepository,
    sessions: SessionLayerState<PgAuthRepository>,
    config: BoardConfig,
) -> Router {
    board_router_generic(Arc::new(repo), sessions, config)
}

/// Create a generic Board router for any repository implementation.
///
/// Reads are public; writes go through `require_session`.
pub fn board_router_generic<R, S>(
    repo: Arc<R>,
    sessions: SessionLayerState<S>,
    config: BoardConfig,
) -> Router
where
    R: PostRepository + CommentRepository + VoteRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let require_auth = middleware::from_fn_with_state(sessions.clone(), require_session::<S>);

    let state = BoardAppState {
        repo,
        sessions: sessions.registry,
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_posts::<R, S>)
                .post(handlers::submit_post::<R, S>.layer(require_auth.clone())),
        )
        .route("/{id}", get(handlers::post_detail::<R, S>))
        .route(
            "/{id}/comments",
            post(handlers::add_comment::<R, S>.layer(require_auth.clone())),
        )
        .route(
            "/{id}/vote",
            post(handlers::cast_vote::<R, S>.layer(require_auth)),
        )
        .with_state(state)
}
