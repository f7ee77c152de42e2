//! Error types for the pio client

use thiserror::Error;

/// Core error type for pio operations
#[derive(Error, Debug)]
pub enum PioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file holds no token
    #[error("No OAuth token configured in {path}")]
    MissingToken { path: String },

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request never produced a response (DNS, refused connection, timeout)
    #[error("Failed to reach {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The response body was not the JSON we expected
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The API answered with an error status
    #[error("API error at {endpoint}: {message}")]
    Api { endpoint: String, message: String },

    /// A download request did not answer with a redirect
    #[error("Expected a redirect from {endpoint}, got HTTP {status}")]
    MissingRedirect { endpoint: String, status: u16 },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PioError {
    /// Whether the failure is worth a "check your connection and token" hint
    pub fn needs_connectivity_hint(&self) -> bool {
        matches!(
            self,
            PioError::Transport { .. } | PioError::Api { .. } | PioError::MissingRedirect { .. }
        )
    }
}

/// Result type alias for pio operations
pub type Result<T> = std::result::Result<T, PioError>;

impl From<serde_json::Error> for PioError {
    fn from(err: serde_json::Error) -> Self {
        PioError::Serialization(err.to_string())
    }
}
