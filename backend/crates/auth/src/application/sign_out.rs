//! Sign Out Use Case

use crate::application::session_registry::SessionRegistry;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    registry: SessionRegistry<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(registry: SessionRegistry<S>) -> Self {
        Self { registry }
    }

    /// Destroy the session behind `session_token`. Idempotent.
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        self.registry.destroy(session_token).await?;
        tracing::info!("User signed out");
        Ok(())
    }
}
