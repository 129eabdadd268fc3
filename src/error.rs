use thiserror::Error;

#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid build number {0:?}: expected an integer")]
    InvalidBuildNumber(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status}, expected {expected}")]
    UnexpectedStatus { status: u16, expected: u16 },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DedupError>;
