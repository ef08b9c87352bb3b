use thiserror::Error;

/// Errors raised by repositories and query services
///
/// Framework failures pass through unchanged inside [`RepositoryError::Database`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Expected at most one result but found {0}")]
    NonUniqueResult(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl RepositoryError {
    /// Returns true when the database rejected a row for breaking a foreign key
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            RepositoryError::Database(sqlx::Error::Database(e)) => {
                matches!(e.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
            }
            _ => false,
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
