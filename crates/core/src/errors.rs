use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClubError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ClubError {
    /// Shorthand for the "field is required" family of validation errors.
    pub fn required(fields: &str) -> Self {
        ClubError::Validation(format!("{} required", fields))
    }
}

pub type ClubResult<T> = Result<T, ClubError>;
