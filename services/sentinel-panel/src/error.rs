//! Error types for the sentinel panel

use serde::Deserialize;

/// Errors that can occur while talking to the Sentinel API
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The server rejected the credentials (HTTP 401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Any other non-2xx response, including validation failures
    #[error("Server returned status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A 2xx response whose body does not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A user id that cannot be used as a single path segment
    #[error("Invalid user id {0:?}")]
    InvalidUserId(String),

    /// A newer login or a logout happened while this login was in flight
    #[error("Login superseded by a newer session change")]
    Superseded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error body the API sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl PanelError {
    /// Classify a non-2xx response.
    ///
    /// The message is the body's `error` field when the server sent one,
    /// the raw body otherwise.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.to_string());

        if status == 401 {
            PanelError::Authentication(message)
        } else {
            PanelError::Server { status, message }
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            PanelError::Authentication(_) => Some(401),
            PanelError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
