//! Error types for the login queue protocol.

use thiserror::Error;

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue service flagged the request as failed.
    #[error("queue service reported error code {code:#x}")]
    ServerError { code: i64 },

    /// A field the protocol needs was absent from the reply.
    #[error("queue reply is missing required field: {0}")]
    MissingField(&'static str),

    /// A reply field could not be parsed as a number.
    #[error("queue reply field {field} is not numeric: {value}")]
    InvalidField {
        field: &'static str,
        value: String,
    },

    /// A queue was never joined, so there is nothing to leave.
    #[error("not in a queue: no ticket has been acquired")]
    NotInQueue,

    #[error("connection to queue service failed: {0}")]
    ConnectionFailed(String),

    #[error("queue request timed out")]
    Timeout,

    /// The queue service answered with an unexpected HTTP status.
    #[error("queue service returned HTTP {status}")]
    ServiceError { status: u16 },

    /// The caller cancelled the wait.
    #[error("queue wait cancelled")]
    Cancelled,
}

/// Queue standing was evaluated before any ticket was acquired.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no queue ticket has been acquired yet")]
pub struct ProtocolStateError;
