//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use kernel::id::SessionId;
use serde_json::Value;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user. An email collision is `AuthError::DuplicateEmail`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email is registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Session key-value store
///
/// Records are keyed by `SessionId`; expiry is judged by the caller.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Insert or replace a session record
    async fn save(&self, session: &Session) -> AuthResult<()>;

    /// Load a session record (expired records included)
    async fn load(&self, session_id: &SessionId) -> AuthResult<Option<Session>>;

    /// Set one attribute on a record unexpired at `now_ms`, in a single
    /// store operation. `false` when no such record exists.
    async fn set_attribute(
        &self,
        session_id: &SessionId,
        key: &str,
        value: &Value,
        now_ms: i64,
    ) -> AuthResult<bool>;

    /// Remove and return one attribute of a record unexpired at `now_ms`,
    /// in a single store operation
    async fn take_attribute(
        &self,
        session_id: &SessionId,
        key: &str,
        now_ms: i64,
    ) -> AuthResult<Option<Value>>;

    /// Delete a session. Deleting an absent record is not an error.
    async fn delete(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Remove expired records, returning how many were removed
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
