use crate::validate::ValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Foreign key pointing to a row that does not exist
    #[error("{0}")]
    InvalidReference(&'static str),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}
