//! Common error types for hotkey-platform.

use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("keyboard hook failed: {0}")]
    Hook(String),
    #[error("signal handler: {0}")]
    Signal(String),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
