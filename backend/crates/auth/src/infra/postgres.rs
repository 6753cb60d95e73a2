//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};
use platform::password::HashedPassword;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository (users + sessions)
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                email,
                password_hash,
                activated,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.activated)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(AuthError::from_user_insert)?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                password_hash,
                activated,
                created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgAuthRepository {
    async fn save(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                data,
                expires_at_ms,
                renewals,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (session_id) DO UPDATE SET
                data = EXCLUDED.data,
                expires_at_ms = EXCLUDED.expires_at_ms,
                renewals = EXCLUDED.renewals
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(Json(&session.data))
        .bind(session.expires_at_ms)
        .bind(session.renewals)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                data,
                expires_at_ms,
                renewals,
                created_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn set_attribute(
        &self,
        session_id: &SessionId,
        key: &str,
        value: &Value,
        now_ms: i64,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE sessions
            SET data = jsonb_set(data, ARRAY[$2::text], $3, true)
            WHERE session_id = $1 AND expires_at_ms > $4
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(key)
        .bind(Json(value))
        .bind(now_ms)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn take_attribute(
        &self,
        session_id: &SessionId,
        key: &str,
        now_ms: i64,
    ) -> AuthResult<Option<Value>> {
        // Row lock in the subquery makes read-and-remove one step
        let taken = sqlx::query_as::<_, (Json<Value>,)>(
            r#"
            UPDATE sessions s
            SET data = s.data - $2::text
            FROM (
                SELECT session_id, data -> $2::text AS value
                FROM sessions
                WHERE session_id = $1
                  AND expires_at_ms > $3
                  AND data -> $2::text IS NOT NULL
                FOR UPDATE
            ) old
            WHERE s.session_id = old.session_id
            RETURNING old.value
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(key)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(taken.map(|(value,)| value.0))
    }

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: String,
    password_hash: String,
    activated: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from(self.user_id),
            user_name: DisplayName::from_db(self.user_name),
            email: Email::from_db(self.email),
            // Not parsed here: a corrupted hash must surface at verification
            password_hash: HashedPassword::from_stored(self.password_hash),
            activated: self.activated,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    data: Json<Map<String, Value>>,
    expires_at_ms: i64,
    renewals: i32,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: SessionId::from(self.session_id),
            data: self.data.0,
            expires_at_ms: self.expires_at_ms,
            renewals: self.renewals,
            created_at: self.created_at,
        }
    }
}
