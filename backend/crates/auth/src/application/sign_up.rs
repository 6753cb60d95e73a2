//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::credentials::CredentialStore;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::{AuthError, AuthResult};

/// Sign up input (raw, as received)
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Sign up input that passed validation
#[derive(Debug)]
pub struct ValidSignUp {
    pub user_name: DisplayName,
    pub email: Email,
    pub password: ClearTextPassword,
}

impl SignUpInput {
    /// Pure validation; no I/O
    pub fn validate(self) -> AuthResult<ValidSignUp> {
        let user_name =
            DisplayName::new(&self.user_name).map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let email =
            Email::new(&self.email).map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let password =
            ClearTextPassword::new(self.password).map_err(|e| AuthError::Validation(e.to_string()))?;

        Ok(ValidSignUp {
            user_name,
            email,
            password,
        })
    }
}

/// Sign up output
#[derive(Debug, Clone)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub activated: bool,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    credentials: CredentialStore,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            credentials: CredentialStore::new(config.pepper()),
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let valid = input.validate()?;

        // Fast path; the unique constraint still decides under races
        if self.user_repo.exists_by_email(&valid.email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.credentials.hash(valid.password).await?;

        let user = User::new(
            valid.user_name,
            valid.email,
            password_hash,
            self.config.activate_on_sign_up,
        );

        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            activated = user.activated,
            "User signed up"
        );

        Ok(SignUpOutput {
            user_id: user.user_id,
            activated: user.activated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            user_name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let valid = input(" alice ", "Alice@Example.com", "s3cretpass")
            .validate()
            .unwrap();
        assert_eq!(valid.user_name.as_str(), "alice");
        assert_eq!(valid.email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_validate_rejects_each_field() {
        assert!(matches!(
            input("", "a@example.com", "s3cretpass").validate(),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            input("alice", "not-an-email", "s3cretpass").validate(),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            input("alice", "a@example.com", "short").validate(),
            Err(AuthError::Validation(_))
        ));
    }
}
