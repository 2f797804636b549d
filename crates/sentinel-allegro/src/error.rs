//! Error types for the Allegro client.

use thiserror::Error;

/// Client error taxonomy.
///
/// `Auth` is surfaced to the operator and never retried automatically;
/// `Transport` and `Status` are transient (the next scheduled cycle is the
/// retry); `Decode` means the response shape moved under us.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("No credential present")]
    MissingCredential,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl ClientError {
    /// True for failures where retrying on the next tick can help.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
