//! Error types for study-worker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Failed to fetch URL: {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for URL: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to extract PDF text: {0}")]
    Extract(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document processing timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, StudyError>;
