//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] sentinel_core::CoreError),

    #[error("Marketplace error: {0}")]
    Client(#[from] sentinel_allegro::ClientError),

    #[error("Notification error: {0}")]
    Notify(#[from] sentinel_notify::NotifyError),

    #[error("Monitor error: {0}")]
    Monitor(#[from] sentinel_monitor::MonitorError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] sentinel_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
