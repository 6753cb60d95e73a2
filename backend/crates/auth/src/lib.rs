//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Credential store, session registry, use cases
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Sign up with display name + email + password
//! - Sign in with email + password, sign out
//! - Server-side sessions referenced by an HMAC-signed cookie token
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; verification on the blocking pool
//! - Unknown email and wrong password are indistinguishable to the caller
//! - Account activation is only revealed after the password verified
//! - A token whose signature does not verify is treated as absent
//! - Sign-in renews an existing session id (fixation defense)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_registry::SessionRegistry;
pub use error::{AuthError, AuthResult};
pub use infra::memory::{MemorySessionStore, MemoryUserRepository};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{CurrentUser, SessionLayerState, require_session};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
