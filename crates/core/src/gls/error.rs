//! Error types for the GLS directory and login client.

use thiserror::Error;

/// Errors that can occur while talking to the GLS directory/auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The service rejected the credentials (distinct HTTP status).
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The service answered with an unexpected HTTP status.
    #[error("GLS service returned HTTP {status}")]
    ServiceError { status: u16 },

    #[error("connection to GLS service failed: {0}")]
    ConnectionFailed(String),

    #[error("GLS request timed out")]
    Timeout,

    /// A field the protocol needs was absent from the response.
    #[error("GLS response is missing required field: {0}")]
    MissingField(&'static str),

    /// The account has no subscription for the requested game.
    #[error("no subscription found for game {0}")]
    NoSubscription(String),

    /// The world status query yielded an empty server or queue list.
    #[error("world {world} advertised no {what}")]
    WorldUnavailable { world: String, what: &'static str },
}
