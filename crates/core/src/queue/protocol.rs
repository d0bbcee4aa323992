//! Queue-ticket polling state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::gls::LoginResult;

use super::wire::{LeaveQueueRequest, TakeANumberRequest};
use super::{ProtocolStateError, QueueError, QueueTicket, QueueTransport};

/// Default delay between queue polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Gates login completion behind the server-side login queue.
///
/// One protocol instance can serve any number of logins; all queue standing
/// lives on the [`LoginResult`] being waited on, never on the protocol.
pub struct QueueProtocol {
    transport: Arc<dyn QueueTransport>,
    poll_interval: Duration,
}

impl QueueProtocol {
    /// Create a protocol over the given transport.
    pub fn new(transport: Arc<dyn QueueTransport>) -> Self {
        Self {
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the delay between polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Take a number in the login queue and record the standing on the login.
    pub async fn acquire_ticket(
        &self,
        login: &mut LoginResult,
    ) -> Result<QueueTicket, QueueError> {
        let request = TakeANumberRequest {
            subscription: login.subscription().name.clone(),
            ticket: login.ticket().to_string(),
            queue_url: login.world().queue_url.clone(),
        };

        let reply = self.transport.take_a_number(&request).await?;
        let ticket = QueueTicket {
            ticket_number: reply.queue_number,
            now_serving: reply.now_serving,
            context: reply.context,
        };
        debug!(
            "Queue standing for {}: ticket {} now serving {}",
            request.subscription, ticket.ticket_number, ticket.now_serving
        );

        login.set_queue_ticket(ticket.clone());
        Ok(ticket)
    }

    /// Poll the queue until the login is served.
    ///
    /// Retries indefinitely on "not yet served" with a fixed delay between
    /// polls; transport and protocol errors abort immediately. The login's
    /// queue standing is updated on every poll, so a caller holding the
    /// result can observe progress mid-wait. The cancellation receiver is
    /// checked every iteration; a signal (or a closed channel) aborts with
    /// [`QueueError::Cancelled`].
    pub async fn wait_until_served(
        &self,
        login: &mut LoginResult,
        cancel: &mut broadcast::Receiver<()>,
    ) -> Result<(), QueueError> {
        loop {
            let ticket = self.acquire_ticket(login).await?;
            if ticket.is_served() {
                info!(
                    "{} has been served (ticket {}, now serving {})",
                    login.subscription().name,
                    ticket.ticket_number,
                    ticket.now_serving
                );
                return Ok(());
            }

            debug!(
                "{} waiting in queue: ticket {}, now serving {}",
                login.subscription().name,
                ticket.ticket_number,
                ticket.now_serving
            );

            tokio::select! {
                _ = cancel.recv() => return Err(QueueError::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Leave the queue using the last-seen context token.
    pub async fn leave_queue(&self, login: &LoginResult) -> Result<(), QueueError> {
        let Some(ticket) = login.queue_ticket() else {
            return Err(QueueError::NotInQueue);
        };

        let request = LeaveQueueRequest {
            subscription: login.subscription().name.clone(),
            context: ticket.context.clone(),
            queue_url: login.world().queue_url.clone(),
        };
        self.transport.leave_queue(&request).await
    }

    /// Whether the login's recorded standing admits it.
    ///
    /// Fails if no ticket has been acquired yet; an unpolled queue has no
    /// standing to evaluate.
    pub fn is_served(login: &LoginResult) -> Result<bool, ProtocolStateError> {
        login
            .queue_ticket()
            .map(QueueTicket::is_served)
            .ok_or(ProtocolStateError)
    }
}
