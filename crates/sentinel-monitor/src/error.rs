//! Error types for the monitor loops.

use thiserror::Error;

/// A cycle-level failure. Loops log these and wait for the next tick.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Marketplace error: {0}")]
    Client(#[from] sentinel_allegro::ClientError),

    #[error("Notification error: {0}")]
    Notify(#[from] sentinel_notify::NotifyError),

    #[error("Core error: {0}")]
    Core(#[from] sentinel_core::CoreError),
}

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
