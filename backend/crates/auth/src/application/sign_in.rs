//! Sign In Use Case
//!
//! Authenticates a user and binds the identity to a fresh session token.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::authenticate::Authenticator;
use crate::application::config::AuthConfig;
use crate::application::credentials::CredentialStore;
use crate::application::session_registry::SessionRegistry;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::AuthResult;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Session token for cookie
    pub session_token: String,
    pub user_id: UserId,
    pub user_name: String,
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    authenticator: Authenticator<U>,
    registry: SessionRegistry<S>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    pub fn new(user_repo: Arc<U>, registry: SessionRegistry<S>, config: &AuthConfig) -> Self {
        Self {
            authenticator: Authenticator::new(user_repo, CredentialStore::new(config.pepper())),
            registry,
        }
    }

    /// `current_token` is the caller's existing session, if any. It is
    /// renewed rather than reused so a pre-set token never becomes
    /// authenticated.
    pub async fn execute(
        &self,
        input: SignInInput,
        current_token: Option<&str>,
    ) -> AuthResult<SignInOutput> {
        let user = self
            .authenticator
            .authenticate(&input.email, input.password)
            .await?;

        let session_token = self
            .registry
            .establish(current_token, user.user_id, user.user_name.as_str())
            .await?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput {
            session_token,
            user_id: user.user_id,
            user_name: user.user_name.as_str().to_string(),
        })
    }
}
