use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoomError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Listing failed for window {window}: {message}")]
    Listing { window: String, message: String },
    #[error("Download failed for {file}: {message}")]
    Download { file: String, message: String },
    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid recording timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZoomError>;
