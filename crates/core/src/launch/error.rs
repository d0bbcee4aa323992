//! Error types for the launch module.

use std::path::PathBuf;
use thiserror::Error;

/// A launch spec was requested for a login that never completed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("login result has no authentication ticket")]
pub struct InvalidLoginResultError;

/// Errors that can occur while controlling a client instance.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Client executable not found.
    #[error("client executable not found: {path}")]
    ExecutableNotFound { path: PathBuf },

    /// The instance already owns a process; launch is once-only.
    #[error("instance was already launched")]
    AlreadyLaunched,

    /// The instance has no running process to act on.
    #[error("instance is not running")]
    NotRunning,

    #[error("failed to spawn client: {0}")]
    Spawn(std::io::Error),

    #[error("failed to kill client: {0}")]
    Kill(std::io::Error),

    /// I/O error while waiting on the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during fleet operations.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    InvalidLogin(#[from] InvalidLoginResultError),

    /// One or more instances could not be killed; the rest were still
    /// attempted.
    #[error("failed to kill {} instance(s)", .failures.len())]
    KillAll { failures: Vec<(u16, LaunchError)> },
}
