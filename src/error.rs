use thiserror::Error;

/// Everything that can end a client operation.
///
/// None of these are retried; the caller turns them into a notification and
/// leaves the store as the fetch policy dictates.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: unable to reach the server")]
    Network(#[source] reqwest::Error),

    #[error("{0}")]
    Backend(String),

    #[error("Your session has expired, please log in again")]
    SessionExpired,

    #[error("The uploaded file is too large")]
    PayloadTooLarge,

    #[error("The uploaded file type is not supported")]
    UnsupportedMedia,

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Another upload is already in progress")]
    Busy,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Maps a non-success HTTP status and its body text onto the taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => ClientError::SessionExpired,
            413 => ClientError::PayloadTooLarge,
            415 => ClientError::UnsupportedMedia,
            _ => ClientError::Http {
                status,
                message: backend_message(body).unwrap_or_else(|| "Something went wrong".to_string()),
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

/// Pulls the `message` field out of a JSON error body, if there is one.
pub fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Decode(error.to_string())
    }
}
