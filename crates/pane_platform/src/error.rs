//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// One-time backend initialization failed (class registration, event loop, ...)
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// Failed to drive the platform event loop
    #[error("Event loop error: {0}")]
    EventLoop(String),

    /// Failed to create a native window
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Failed to create or activate a graphics context
    #[error("Graphics context error: {0}")]
    GraphicsContext(String),

    /// Backend not supported on this target
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
