use thiserror::Error;

use crate::platform::BridgeError;

/// Errors surfaced by [`crate::ForegroundTaskManager`] operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// `start` was called while the service reports the task as running.
    #[error("foreground task is already running; stop it first")]
    AlreadyRunning,

    /// `start` was called before any notification options were configured.
    #[error("foreground task is not initialized; call init first")]
    NotInitialized,

    #[error("service bridge call failed: {0}")]
    Bridge(#[from] BridgeError),
}
