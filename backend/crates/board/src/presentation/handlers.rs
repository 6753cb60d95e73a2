//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use auth::domain::entity::session::FLASH_KEY;
use auth::domain::repository::SessionStore;
use auth::{CurrentUser, SessionRegistry};
use kernel::id::PostId;
use serde_json::Value;

use crate::application::{
    AddCommentInput, AddCommentUseCase, BoardConfig, CastVoteUseCase, ListPostsUseCase,
    PostDetailUseCase, SubmitPostInput, SubmitPostUseCase,
};
use crate::domain::entities::Author;
use crate::domain::repository::{CommentRepository, PostRepository, VoteRepository};
use crate::domain::value_objects::Filter;
use crate::error::{BoardError, BoardResult};
use crate::presentation::dto::{
    AddCommentRequest, CommentResponse, FeedQuery, FeedResponse, PostDetailResponse,
    PostResponse, SubmitPostRequest, VoteResponse,
};

/// Shared state for board handlers
pub struct BoardAppState<R, S> {
    pub repo: Arc<R>,
    pub sessions: SessionRegistry<S>,
    pub config: Arc<BoardConfig>,
}

impl<R, S> Clone for BoardAppState<R, S> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            sessions: self.sessions.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Reads
// ============================================================================

/// GET /api/posts?q=&page=&page_size=&order_by=
pub async fn list_posts<R, S>(
    State(state): State<BoardAppState<R, S>>,
    Query(query): Query<FeedQuery>,
) -> BoardResult<Json<FeedResponse>>
where
    R: PostRepository + CommentRepository + VoteRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let filter = Filter::from_raw(
        query.q.as_deref(),
        query.page.as_deref(),
        query.page_size.as_deref(),
        query.order_by.as_deref(),
    );

    let page = ListPostsUseCase::new(state.repo.clone())
        .execute(&filter)
        .await?;

    Ok(Json(page.into()))
}

/// GET /api/posts/{id}
pub async fn post_detail<R, S>(
    State(state): State<BoardAppState<R, S>>,
    Path(post_id): Path<String>,
) -> BoardResult<Json<PostDetailResponse>>
where
    R: PostRepository + CommentRepository + VoteRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let detail = PostDetailUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(post_id)
        .await?;

    Ok(Json(detail.into()))
}

// ============================================================================
// Writes (behind require_session)
// ============================================================================

/// POST /api/posts
pub async fn submit_post<R, S>(
    State(state): State<BoardAppState<R, S>>,
    user: CurrentUser,
    Json(req): Json<SubmitPostRequest>,
) -> BoardResult<(StatusCode, Json<PostResponse>)>
where
    R: PostRepository + CommentRepository + VoteRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let post = SubmitPostUseCase::new(state.repo.clone())
        .execute(
            &author(user),
            SubmitPostInput {
                title: req.title,
                url: req.url,
                body: req.body,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment<R, S>(
    State(state): State<BoardAppState<R, S>>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> BoardResult<(StatusCode, Json<CommentResponse>)>
where
    R: PostRepository + CommentRepository + VoteRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let comment = AddCommentUseCase::new(state.repo.clone())
        .execute(&author(user), post_id, AddCommentInput { body: req.body })
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// POST /api/posts/{id}/vote
pub async fn cast_vote<R, S>(
    State(state): State<BoardAppState<R, S>>,
    user: CurrentUser,
    Path(post_id): Path<String>,
) -> BoardResult<Json<VoteResponse>>
where
    R: PostRepository + CommentRepository + VoteRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let outcome = CastVoteUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(user.user_id, post_id)
        .await?;

    let flash = state
        .config
        .vote_flash_message
        .as_ref()
        .filter(|_| outcome.is_recorded());

    if let Some(message) = flash {
        // The vote stands even if the flash cannot be stored
        if let Err(e) = state
            .sessions
            .put(&user.token, FLASH_KEY, Value::String(message.clone()))
            .await
        {
            tracing::warn!(error = %e, "Failed to store vote flash message");
        }
    }

    Ok(Json(VoteResponse {
        recorded: outcome.is_recorded(),
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// A malformed id cannot name an existing post
fn parse_post_id(raw: &str) -> BoardResult<PostId> {
    raw.parse().map_err(|_| BoardError::PostNotFound)
}

fn author(user: CurrentUser) -> Author {
    Author {
        user_id: user.user_id,
        user_name: user.user_name,
    }
}
