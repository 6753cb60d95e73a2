//! Auth Middleware
//!
//! Resolves the caller identity from the session cookie for protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::cookie::CookieConfig;

use crate::application::config::AuthConfig;
use crate::application::session_registry::SessionRegistry;
use crate::domain::repository::SessionStore;
use crate::error::AuthError;

/// Middleware state
pub struct SessionLayerState<S> {
    pub registry: SessionRegistry<S>,
    pub cookie: CookieConfig,
}

impl<S> SessionLayerState<S> {
    pub fn new(registry: SessionRegistry<S>, config: &AuthConfig) -> Self {
        Self {
            registry,
            cookie: config.cookie(),
        }
    }
}

impl<S> Clone for SessionLayerState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            cookie: self.cookie.clone(),
        }
    }
}

/// Authenticated caller, inserted into request extensions by [`require_session`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_name: String,
    /// Raw session token (for flash messages and the like)
    pub token: String,
}

/// Middleware that requires an active session.
///
/// The user id seen by downstream handlers only ever comes from here.
pub async fn require_session<S>(
    State(state): State<SessionLayerState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionStore + Send + Sync + 'static,
{
    let token = state
        .cookie
        .extract(req.headers())
        .ok_or(AuthError::SessionInvalid)?;

    let identity = state
        .registry
        .identity(&token)
        .await?
        .ok_or(AuthError::SessionInvalid)?;

    req.extensions_mut().insert(CurrentUser {
        user_id: identity.user_id,
        user_name: identity.user_name,
        token,
    });

    Ok(next.run(req).await)
}

impl<St> FromRequestParts<St> for CurrentUser
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::SessionInvalid)
    }
}
