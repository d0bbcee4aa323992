//! Login queue protocol.
//!
//! Logins do not proceed straight to launch: the service hands out numbered
//! queue tickets and admits them as its now-serving counter advances. This
//! module owns that state machine — taking a number, polling until served,
//! and leaving the queue cleanly — over a swappable transport.

mod error;
mod protocol;
mod transport;
mod types;
mod wire;

pub use error::{ProtocolStateError, QueueError};
pub use protocol::{QueueProtocol, DEFAULT_POLL_INTERVAL};
pub use transport::{HttpQueueTransport, QueueTransport};
pub use types::QueueTicket;
pub use wire::{LeaveQueueRequest, QueueReply, TakeANumberRequest};
