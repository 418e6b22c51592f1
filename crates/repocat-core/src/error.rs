//! Error types for repocat

use thiserror::Error;

/// Result type alias using RepocatError
pub type Result<T> = std::result::Result<T, RepocatError>;

/// Error type alias for convenience
pub type Error = RepocatError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const EXISTING_DATA: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for repocat
#[derive(Debug, Error)]
pub enum RepocatError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Existing data: {0}")]
    ExistingData(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RepocatError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExistingData(_) => exit_codes::EXISTING_DATA,
            Self::InvalidInput(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

/// True if the underlying SQLite error is a constraint violation
/// (duplicate primary key, NOT NULL failure).
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
