use quorum_types::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForumError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ForumError {
    /// True for 401/403 responses
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ForumError::Status { status: 401 | 403, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ForumError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ForumError>;
