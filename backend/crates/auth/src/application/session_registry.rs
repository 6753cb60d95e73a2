//! Session Registry
//!
//! Session lifecycle over an injected [`SessionStore`]. The registry holds
//! no session state itself.
//!
//! Token format: `<session uuid>.<base64url(HMAC-SHA256(secret, uuid))>`.
//! Tokens that fail to parse or verify are treated exactly like unknown or
//! expired ones: absent.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{SessionId, UserId};
use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};
use serde_json::Value;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::{Session, USER_ID_KEY, USER_NAME_KEY};
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

/// Identity stored in an active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub user_name: String,
}

pub struct SessionRegistry<S> {
    store: Arc<S>,
    secret: [u8; 32],
    ttl: chrono::Duration,
}

impl<S> Clone for SessionRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            secret: self.secret,
            ttl: self.ttl,
        }
    }
}

impl<S> SessionRegistry<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>, config: &AuthConfig) -> Self {
        Self {
            store,
            secret: config.session_secret,
            ttl: config.session_ttl_chrono(),
        }
    }

    /// Start a session for an authenticated user
    pub async fn create(&self, user_id: UserId, user_name: &str) -> AuthResult<String> {
        let session = Session::new(user_id, user_name, self.ttl);
        self.store.save(&session).await?;

        tracing::debug!(session_id = %session.session_id, "Session created");
        Ok(self.sign(&session.session_id))
    }

    /// Move an active session to a new id, keeping its attributes
    pub async fn renew(&self, token: &str) -> AuthResult<String> {
        let current = self.active(token).await?.ok_or(AuthError::SessionInvalid)?;
        let renewed = current.renewed(self.ttl);

        self.replace(&current, &renewed).await?;

        tracing::debug!(
            old_session_id = %current.session_id,
            session_id = %renewed.session_id,
            renewals = renewed.renewals,
            "Session renewed"
        );
        Ok(self.sign(&renewed.session_id))
    }

    /// Bind an identity to the caller's session.
    ///
    /// An active current session is renewed (its other attributes survive);
    /// otherwise a new session is created. Either way the caller receives a
    /// token it has never held before.
    pub async fn establish(
        &self,
        current_token: Option<&str>,
        user_id: UserId,
        user_name: &str,
    ) -> AuthResult<String> {
        let current = match current_token {
            Some(token) => self.active(token).await?,
            None => None,
        };

        let Some(current) = current else {
            return self.create(user_id, user_name).await;
        };

        let mut renewed = current.renewed(self.ttl);
        renewed
            .data
            .insert(USER_ID_KEY.to_string(), Value::String(user_id.to_string()));
        renewed
            .data
            .insert(USER_NAME_KEY.to_string(), Value::String(user_name.to_string()));

        self.replace(&current, &renewed).await?;
        Ok(self.sign(&renewed.session_id))
    }

    /// Attribute lookup. Absent for unknown keys and inactive tokens.
    pub async fn get(&self, token: &str, key: &str) -> AuthResult<Option<Value>> {
        Ok(self
            .active(token)
            .await?
            .and_then(|session| session.get(key).cloned()))
    }

    /// Set an ancillary attribute. Identity keys are refused.
    ///
    /// Writes only the one key, so concurrent puts and pops on the same
    /// session never overwrite each other.
    pub async fn put(&self, token: &str, key: &str, value: Value) -> AuthResult<()> {
        if Session::is_reserved_key(key) {
            return Err(AuthError::Validation(format!(
                "session key '{key}' is reserved"
            )));
        }

        let session_id = self.parse_token(token).ok_or(AuthError::SessionInvalid)?;
        let now_ms = Utc::now().timestamp_millis();

        if !self
            .store
            .set_attribute(&session_id, key, &value, now_ms)
            .await?
        {
            return Err(AuthError::SessionInvalid);
        }
        Ok(())
    }

    /// Read and remove an ancillary attribute (one-shot flash messages)
    pub async fn pop(&self, token: &str, key: &str) -> AuthResult<Option<Value>> {
        if Session::is_reserved_key(key) {
            return Ok(None);
        }

        let Some(session_id) = self.parse_token(token) else {
            return Ok(None);
        };

        self.store
            .take_attribute(&session_id, key, Utc::now().timestamp_millis())
            .await
    }

    /// Typed view of the identity attributes
    pub async fn identity(&self, token: &str) -> AuthResult<Option<SessionIdentity>> {
        Ok(self.active(token).await?.and_then(|session| {
            Some(SessionIdentity {
                user_id: session.user_id()?,
                user_name: session.user_name()?.to_string(),
            })
        }))
    }

    /// End a session. Unknown, expired or forged tokens are a no-op.
    pub async fn destroy(&self, token: &str) -> AuthResult<()> {
        if let Some(session_id) = self.parse_token(token) {
            self.store.delete(&session_id).await?;
            tracing::debug!(session_id = %session_id, "Session destroyed");
        }
        Ok(())
    }

    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.store.cleanup_expired().await
    }

    async fn replace(&self, old: &Session, new: &Session) -> AuthResult<()> {
        self.store.save(new).await?;
        self.store.delete(&old.session_id).await
    }

    /// Load the session behind a token if it is authentic and unexpired
    async fn active(&self, token: &str) -> AuthResult<Option<Session>> {
        let Some(session_id) = self.parse_token(token) else {
            return Ok(None);
        };

        let Some(session) = self.store.load(&session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.store.delete(&session_id).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    fn sign(&self, session_id: &SessionId) -> String {
        let id = session_id.to_string();
        let tag = hmac_sha256(&self.secret, id.as_bytes());
        format!("{}.{}", id, to_base64_url(&tag))
    }

    fn parse_token(&self, token: &str) -> Option<SessionId> {
        let (id, tag_b64) = token.split_once('.')?;
        let tag = from_base64_url(tag_b64).ok()?;

        if !verify_hmac_sha256(&self.secret, id.as_bytes(), &tag) {
            tracing::warn!("Session token signature mismatch");
            return None;
        }

        id.parse().ok()
    }
}
