use thiserror::Error;

/// Failure taxonomy shared by the user, session and to-do stores. Handlers
/// map these onto HTTP statuses; database and hashing detail is logged at
/// the boundary and never echoed to the client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Unknown email and wrong password collapse into this one variant so
    /// the two cases stay indistinguishable to callers.
    #[error("invalid email or password")]
    AuthFailed,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
}
