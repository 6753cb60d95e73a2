//! Auth Manager
//!
//! Email + password -> `User`.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::credentials::CredentialStore;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct Authenticator<U> {
    user_repo: Arc<U>,
    credentials: CredentialStore,
}

impl<U> Authenticator<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, credentials: CredentialStore) -> Self {
        Self {
            user_repo,
            credentials,
        }
    }

    /// Check a credential pair.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`
    /// after the same Argon2 work. `AccountNotActive` is only reported once
    /// the password has verified, so it never confirms that an email is
    /// registered.
    pub async fn authenticate(&self, email: &str, password: String) -> AuthResult<User> {
        let attempt = ClearTextPassword::for_verification(password);

        let user = match Email::new(email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.credentials.verify_absent(attempt).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.credentials.verify(&user.password_hash, attempt).await? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.can_login() {
            return Err(AuthError::AccountNotActive);
        }

        if user.password_hash.needs_rehash() {
            tracing::info!(user_id = %user.user_id, "Stored password hash uses outdated parameters");
        }

        Ok(user)
    }
}
