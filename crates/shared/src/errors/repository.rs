use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl RepositoryError {
    /// Turns a unique-constraint violation into `Conflict`, keeping every other
    /// database error as-is.
    pub fn unique_violation(err: SqlxError, message: impl Into<String>) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(message.into())
            }
            _ => RepositoryError::Sqlx(err),
        }
    }
}
