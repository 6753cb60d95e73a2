//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    SessionRegistry, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::entity::session::FLASH_KEY;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    SessionStatusResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<U, S> {
    pub users: Arc<U>,
    pub registry: SessionRegistry<S>,
    pub config: Arc<AuthConfig>,
}

impl<U, S> Clone for AuthAppState<U, S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            registry: self.registry.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<U, S>(
    State(state): State<AuthAppState<U, S>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<SignUpResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.users.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            user_name: req.user_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_id: output.user_id,
            activated: output.activated,
        }),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let cookie = state.config.cookie();
    let current_token = cookie.extract(&headers);

    let use_case = SignInUseCase::new(state.users.clone(), state.registry.clone(), &state.config);

    let output = use_case
        .execute(
            SignInInput {
                email: req.email,
                password: req.password,
            },
            current_token.as_deref(),
        )
        .await?;

    let body = Json(SignInResponse {
        user_id: output.user_id,
        user_name: output.user_name,
    });

    Ok(with_cookie(
        cookie.set_cookie_header(&output.session_token),
        (StatusCode::OK, body),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let cookie = state.config.cookie();

    if let Some(token) = cookie.extract(&headers) {
        SignOutUseCase::new(state.registry.clone())
            .execute(&token)
            .await?;
    }

    Ok(with_cookie(
        cookie.delete_cookie_header(),
        StatusCode::NO_CONTENT,
    ))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let Some(token) = state.config.cookie().extract(&headers) else {
        return Ok(Json(SessionStatusResponse::anonymous()));
    };

    let Some(identity) = state.registry.identity(&token).await? else {
        return Ok(Json(SessionStatusResponse::anonymous()));
    };

    let flash = state
        .registry
        .pop(&token, FLASH_KEY)
        .await?
        .and_then(|value| value.as_str().map(str::to_string));

    Ok(Json(SessionStatusResponse {
        authenticated: true,
        user_id: Some(identity.user_id),
        user_name: Some(identity.user_name),
        flash,
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn with_cookie(cookie: Option<HeaderValue>, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    match cookie {
        Some(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        None => tracing::warn!("Session cookie value is not a valid header"),
    }
    response
}
