use thiserror::Error;

/// Failures of the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Failures of the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid user or password")]
    InvalidCredential,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}
