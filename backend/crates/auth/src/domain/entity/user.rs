//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{display_name::DisplayName, email::Email};

/// Registered account.
///
/// Only the hash is ever held; the clear text password never reaches the
/// entity.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: DisplayName,
    /// Unique across users, stored normalized
    pub email: Email,
    pub password_hash: HashedPassword,
    /// Only activated accounts may authenticate
    pub activated: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_name: DisplayName,
        email: Email,
        password_hash: HashedPassword,
        activated: bool,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password_hash,
            activated,
            created_at: Utc::now(),
        }
    }

    pub fn can_login(&self) -> bool {
        self.activated
    }
}
