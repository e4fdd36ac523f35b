use chrono::{Duration, Utc};
use log::info;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::error::StoreError;
use crate::models::session::Session;
use crate::models::user::User;

const SESSION_TTL_DAYS: i64 = 1;

/// Start a session for `user_id`, replacing any earlier one. One session
/// row per user.
pub async fn create(pool: &SqlitePool, user_id: i64) -> Result<Session, StoreError> {
    let session = Session {
        session_id: Uuid::new_v4().to_string(),
        user_id,
        expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
    };

    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO sessions (session_id, user_id, expires_at) VALUES (?, ?, ?)")
        .bind(&session.session_id)
        .bind(user_id)
        .bind(session.expires_at)
        .execute(pool)
        .await?;

    Ok(session)
}

/// Resolve the user behind a session id. Unknown and expired sessions both
/// come back as `AuthFailed`; expired rows are removed on the way out.
pub async fn find_user(pool: &SqlitePool, session_id: &str) -> Result<User, StoreError> {
    let session: Option<Session> =
        sqlx::query_as("SELECT session_id, user_id, expires_at FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await?;

    let session = match session {
        Some(session) => session,
        None => return Err(StoreError::AuthFailed),
    };

    if session.expires_at < Utc::now() {
        sqlx::query("DELETE FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(pool)
            .await?;
        info!("Session {} expired", session_id);
        return Err(StoreError::AuthFailed);
    }

    let user: Option<User> =
        sqlx::query_as("SELECT user_id, email, password_hash FROM users WHERE user_id = ?")
            .bind(session.user_id)
            .fetch_optional(pool)
            .await?;
    user.ok_or(StoreError::AuthFailed)
}

/// End a session. Returns whether a row was actually removed.
pub async fn delete(pool: &SqlitePool, session_id: &str) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM sessions WHERE session_id = ?")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
