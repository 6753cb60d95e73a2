//! Credential Store
//!
//! Async front for `platform::password`. Argon2 is CPU bound, so both
//! operations run on the blocking pool.

use std::sync::{Arc, LazyLock};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};

use crate::error::{AuthError, AuthResult};

/// Stand-in hash verified when no account matches, computed on first use
static ABSENT_ACCOUNT_HASH: LazyLock<Result<HashedPassword, PasswordHashError>> =
    LazyLock::new(|| {
        ClearTextPassword::for_verification("absent-account-placeholder".to_string()).hash(None)
    });

#[derive(Clone, Default)]
pub struct CredentialStore {
    pepper: Option<Arc<[u8]>>,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl CredentialStore {
    pub fn new(pepper: Option<&[u8]>) -> Self {
        Self {
            pepper: pepper.map(Arc::from),
            #[cfg(test)]
            verifications: Arc::default(),
        }
    }

    /// Salted Argon2id hash
    pub async fn hash(&self, password: ClearTextPassword) -> AuthResult<HashedPassword> {
        let pepper = self.pepper.clone();

        tokio::task::spawn_blocking(move || password.hash(pepper.as_deref()))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task failed: {e}")))?
            .map_err(AuthError::from)
    }

    /// `Ok(false)` on mismatch, `Err(Verification)` when the stored hash is unusable
    pub async fn verify(
        &self,
        stored: &HashedPassword,
        attempt: ClearTextPassword,
    ) -> AuthResult<bool> {
        let pepper = self.pepper.clone();
        let stored = stored.clone();

        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::Relaxed);

        tokio::task::spawn_blocking(move || stored.verify(&attempt, pepper.as_deref()))
            .await
            .map_err(|e| AuthError::Internal(format!("verify task failed: {e}")))?
            .map_err(AuthError::from)
    }

    /// Spend one full verification when there is no stored hash to check.
    ///
    /// Keeps an unknown email as slow as a wrong password. The outcome is
    /// discarded; the caller rejects the attempt either way.
    pub async fn verify_absent(&self, attempt: ClearTextPassword) -> AuthResult<()> {
        let placeholder = tokio::task::spawn_blocking(|| ABSENT_ACCOUNT_HASH.as_ref().ok().cloned())
            .await
            .map_err(|e| AuthError::Internal(format!("hash task failed: {e}")))?;

        match placeholder {
            Some(stored) => {
                self.verify(&stored, attempt).await?;
            }
            None => tracing::warn!("Placeholder password hash unavailable"),
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn verification_count(&self) -> usize {
        self.verifications.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let store = CredentialStore::new(Some(b"pepper".as_slice()));

        let hashed = store
            .hash(ClearTextPassword::new("correct horse".to_string()).unwrap())
            .await
            .unwrap();

        let ok = store
            .verify(
                &hashed,
                ClearTextPassword::for_verification("correct horse".to_string()),
            )
            .await
            .unwrap();
        assert!(ok);

        let wrong = store
            .verify(
                &hashed,
                ClearTextPassword::for_verification("battery staple".to_string()),
            )
            .await
            .unwrap();
        assert!(!wrong);
    }

    #[tokio::test]
    async fn test_corrupted_hash_is_verification_error() {
        let store = CredentialStore::default();

        for stored in ["not-a-phc-string", "$argon2id$garbage"] {
            let result = store
                .verify(
                    &HashedPassword::from_stored(stored),
                    ClearTextPassword::for_verification("whatever".to_string()),
                )
                .await;

            assert!(
                matches!(result, Err(AuthError::Verification(_))),
                "{stored} should not verify as a mismatch"
            );
        }
    }

    #[tokio::test]
    async fn test_verify_absent_runs_a_verification() {
        let store = CredentialStore::new(Some(b"pepper".as_slice()));

        store
            .verify_absent(ClearTextPassword::for_verification("guess".to_string()))
            .await
            .unwrap();

        assert_eq!(store.verification_count(), 1);
    }
}
