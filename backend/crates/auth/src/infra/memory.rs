//! In-memory Repository Implementations
//!
//! Used by tests and for running the API without Postgres. Every operation
//! is a single short critical section; no lock is held across an await.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use kernel::id::{SessionId, UserId};
use serde_json::Value;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

fn poisoned<T>(_: T) -> AuthError {
    AuthError::Storage("in-memory store lock poisoned".to_string())
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;

        // Same check-and-insert as the unique index on users.email
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().any(|u| &u.email == email))
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn load(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(session_id).cloned())
    }

    async fn set_attribute(
        &self,
        session_id: &SessionId,
        key: &str,
        value: &Value,
        now_ms: i64,
    ) -> AuthResult<bool> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        match sessions.get_mut(session_id) {
            Some(session) if !session.is_expired_at(now_ms) => {
                session.data.insert(key.to_string(), value.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn take_attribute(
        &self,
        session_id: &SessionId,
        key: &str,
        now_ms: i64,
    ) -> AuthResult<Option<Value>> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        Ok(sessions
            .get_mut(session_id)
            .filter(|session| !session.is_expired_at(now_ms))
            .and_then(|session| session.data.remove(key)))
    }

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now_ms));
        Ok((before - sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::display_name::DisplayName;
    use chrono::Duration;
    use platform::password::HashedPassword;

    fn user(email: &str) -> User {
        User::new(
            DisplayName::new("alice").unwrap(),
            Email::new(email).unwrap(),
            HashedPassword::from_stored("$argon2id$stub"),
            true,
        )
    }

    #[test]
    fn test_duplicate_email_rejected() {
        tokio_test::block_on(async {
            let repo = MemoryUserRepository::new();
            repo.create(&user("alice@example.com")).await.unwrap();

            let result = repo.create(&user("ALICE@example.com")).await;
            assert!(matches!(result, Err(AuthError::DuplicateEmail)));
        });
    }

    #[test]
    fn test_find_by_email() {
        tokio_test::block_on(async {
            let repo = MemoryUserRepository::new();
            let alice = user("alice@example.com");
            repo.create(&alice).await.unwrap();

            let email = Email::new("alice@example.com").unwrap();
            let found = repo.find_by_email(&email).await.unwrap().unwrap();
            assert_eq!(found.user_id, alice.user_id);
            assert!(repo.exists_by_email(&email).await.unwrap());

            let other = Email::new("bob@example.com").unwrap();
            assert!(repo.find_by_email(&other).await.unwrap().is_none());
        });
    }

    #[test]
    fn test_attributes_only_change_on_live_records() {
        tokio_test::block_on(async {
            let store = MemorySessionStore::new();
            let live = Session::new(UserId::new(), "a", Duration::hours(1));
            let expired = Session::new(UserId::new(), "b", Duration::zero());
            store.save(&live).await.unwrap();
            store.save(&expired).await.unwrap();
            let now_ms = Utc::now().timestamp_millis();

            let flash = Value::from("hi");
            assert!(store.set_attribute(&live.session_id, "flash", &flash, now_ms).await.unwrap());
            assert!(!store.set_attribute(&expired.session_id, "flash", &flash, now_ms).await.unwrap());
            assert!(!store.set_attribute(&SessionId::new(), "flash", &flash, now_ms).await.unwrap());

            assert_eq!(
                store.take_attribute(&live.session_id, "flash", now_ms).await.unwrap(),
                Some(flash)
            );
            assert_eq!(store.take_attribute(&live.session_id, "flash", now_ms).await.unwrap(), None);
        });
    }

    #[test]
    fn test_cleanup_expired() {
        tokio_test::block_on(async {
            let store = MemorySessionStore::new();
            store
                .save(&Session::new(UserId::new(), "a", Duration::hours(1)))
                .await
                .unwrap();
            store
                .save(&Session::new(UserId::new(), "b", Duration::zero()))
                .await
                .unwrap();

            assert_eq!(store.cleanup_expired().await.unwrap(), 1);
            assert_eq!(store.len(), 1);
        });
    }
}
