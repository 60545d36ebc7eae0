//! Error types for city-locator

use thiserror::Error;

/// Main error type for city-locator operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Vendor returned status {status}")]
    Vendor { status: u16 },

    #[error("Vendor request timed out")]
    Timeout,

    #[error("Malformed vendor payload: {0}")]
    MalformedPayload(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Map a reqwest failure, keeping timeouts distinguishable
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_decode() {
            Error::MalformedPayload(err.to_string())
        } else {
            Error::Http(err)
        }
    }

    /// Short description of a vendor failure that is safe to show clients
    pub fn summary(&self) -> String {
        match self {
            Error::Vendor { status } => format!("Vendor returned status {}", status),
            Error::Timeout => "Vendor request timed out".to_string(),
            Error::MalformedPayload(_) => "Vendor returned an unexpected payload".to_string(),
            _ => "Vendor request failed".to_string(),
        }
    }
}

/// Result type alias for city-locator operations
pub type Result<T> = std::result::Result<T, Error>;
