//! Engine error types

use pane_platform::{NativeHandle, PlatformError};
use thiserror::Error;

use crate::registry::WindowId;

/// Errors returned by [`Context`](crate::Context) entry points
#[derive(Error, Debug)]
pub enum Error {
    /// The backend failed
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A backend reported a native handle that is already registered
    #[error("Native window handle {0:?} is already registered")]
    DuplicateHandle(NativeHandle),

    /// The window id does not name a live window
    #[error("Unknown window {0:?}")]
    UnknownWindow(WindowId),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
