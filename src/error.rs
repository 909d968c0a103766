pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Backend returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Request already in flight: {0}")]
    Busy(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Text shown in the blocking notification for this failure.
    ///
    /// Transport, server and parse failures are all surfaced the same way: the
    /// backend's own message when it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            Error::BadRequest(msg) | Error::Unauthorized(msg) | Error::Busy(msg) => msg.clone(),
            Error::Validation(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}
