//! Crate-level error type.

use thiserror::Error;

/// Errors surfaced by the API client and configuration loader.
///
/// Handlers never propagate these past the current action; they turn them
/// into a toast or an inline message via [`ClientError::server_message`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (refused, timed out, reset).
    #[error("request to {url} failed: {detail}")]
    Transport { url: String, detail: String },

    /// The backend replied with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("could not decode response from {url}: {detail}")]
    Decode { url: String, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Text suitable for showing to the user.
    ///
    /// Rejections carry the backend's own `message`; everything else is a
    /// connection problem from the user's point of view.
    pub fn server_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            _ => "Connection error".to_string(),
        }
    }

    /// HTTP status for rejections, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(e: toml::de::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}
