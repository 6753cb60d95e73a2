//! Session Entity
//!
//! Server-side session record. The client only ever holds a signed
//! reference to `session_id`.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{SessionId, UserId};
use serde_json::{Map, Value};

/// Reserved attribute holding the authenticated user id
pub const USER_ID_KEY: &str = "userId";
/// Reserved attribute holding the authenticated user's display name
pub const USER_NAME_KEY: &str = "userName";
/// One-shot message for the next request
pub const FLASH_KEY: &str = "flash";

/// Session record
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: SessionId,
    /// String-keyed attributes (identity, flash messages, ...)
    pub data: Map<String, Value>,
    /// Expiry (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// How many times this session has been moved to a fresh id
    pub renewals: i32,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session carrying the given identity
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, user_name: &str, ttl: Duration) -> Self {
        let mut data = Map::new();
        data.insert(USER_ID_KEY.to_string(), Value::String(user_id.to_string()));
        data.insert(USER_NAME_KEY.to_string(), Value::String(user_name.to_string()));

        Self::with_data(data, 0, ttl)
    }

    fn with_data(data: Map<String, Value>, renewals: i32, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            session_id: SessionId::new(),
            data,
            expires_at_ms: expires_at.timestamp_millis(),
            renewals,
            created_at: now,
        }
    }

    /// Same attributes under a new id with a fresh expiry
    pub fn renewed(&self, ttl: Duration) -> Self {
        Self::with_data(self.data.clone(), self.renewals.saturating_add(1), ttl)
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.data.get(USER_ID_KEY)?.as_str()?.parse().ok()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.data.get(USER_NAME_KEY)?.as_str()
    }

    /// Identity keys cannot be written through the generic attribute API
    pub fn is_reserved_key(key: &str) -> bool {
        key == USER_ID_KEY || key == USER_NAME_KEY
    }
}
