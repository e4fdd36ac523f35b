use bcrypt::{hash, verify, DEFAULT_COST};
use log::info;
use sqlx::SqlitePool;

use super::error::StoreError;
use crate::models::user::User;

// Just enough syntax checking: a non-empty local part and domain, no
// whitespace anywhere.
fn email_is_valid(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

/// Register a new user. The password is bcrypt-hashed before it is stored.
pub async fn register(pool: &SqlitePool, email: &str, password: &str) -> Result<User, StoreError> {
    if !email_is_valid(email) {
        return Err(StoreError::Validation(
            "email must be a valid address".into(),
        ));
    }
    if password.trim().is_empty() {
        return Err(StoreError::Validation("password must not be blank".into()));
    }

    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    if taken > 0 {
        return Err(StoreError::Conflict(format!(
            "email {} is already registered",
            email
        )));
    }

    let password_hash = hash(password, DEFAULT_COST)?;
    let result = sqlx::query("INSERT INTO users (email, password_hash) VALUES (?, ?)")
        .bind(email)
        .bind(&password_hash)
        .execute(pool)
        .await?;

    let user_id = result.last_insert_rowid();
    info!("User {} registered with id {}", email, user_id);
    Ok(User {
        user_id,
        email: email.to_string(),
        password_hash,
    })
}

/// Verify credentials. An unknown email and a wrong password both yield
/// `AuthFailed` so the caller cannot tell them apart.
pub async fn authenticate(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<User, StoreError> {
    let user: Option<User> =
        sqlx::query_as("SELECT user_id, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

    let user = match user {
        Some(user) => user,
        None => {
            info!("Login failed for unknown email {}", email);
            return Err(StoreError::AuthFailed);
        }
    };

    if !verify(password, &user.password_hash)? {
        info!("Invalid password for {}", email);
        return Err(StoreError::AuthFailed);
    }

    Ok(user)
}

/// Resolve a user record from an email, as the task store does for owners.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<User, StoreError> {
    let user: Option<User> =
        sqlx::query_as("SELECT user_id, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

    user.ok_or_else(|| StoreError::NotFound(format!("user {} not found", email)))
}
