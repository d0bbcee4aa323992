//! Mock queue transport for testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::queue::{
    LeaveQueueRequest, QueueError, QueueReply, QueueTransport, TakeANumberRequest,
};

/// A recorded TakeANumber call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTakeANumber {
    pub subscription: String,
    pub ticket: String,
    pub queue_url: String,
    /// When the request was made.
    pub timestamp: DateTime<Utc>,
}

/// A recorded LeaveQueue call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedLeaveQueue {
    pub subscription: String,
    pub context: String,
    pub queue_url: String,
    pub timestamp: DateTime<Utc>,
}

/// Mock implementation of the QueueTransport trait.
///
/// Provides controllable behavior for testing:
/// - Script a sequence of replies (or errors) for successive polls
/// - Fall back to a default reply once the script runs dry
/// - Inspect every request the protocol made
///
/// # Example
///
/// ```rust,ignore
/// let transport = Arc::new(MockQueueTransport::new());
/// transport.push_reply(5, 3, "ctx-1").await;
/// transport.push_reply(5, 5, "ctx-2").await;
///
/// let protocol = QueueProtocol::new(transport.clone());
/// protocol.wait_until_served(&mut login, &mut cancel_rx).await?;
///
/// assert_eq!(transport.take_a_number_calls().await.len(), 2);
/// ```
pub struct MockQueueTransport {
    replies: Arc<RwLock<VecDeque<Result<QueueReply, QueueError>>>>,
    /// Returned when the scripted replies are exhausted.
    default_reply: Arc<RwLock<Option<QueueReply>>>,
    take_a_number_calls: Arc<RwLock<Vec<RecordedTakeANumber>>>,
    leave_queue_calls: Arc<RwLock<Vec<RecordedLeaveQueue>>>,
}

impl Default for MockQueueTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockQueueTransport {
    /// Create a new mock transport with an empty script.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(RwLock::new(VecDeque::new())),
            default_reply: Arc::new(RwLock::new(None)),
            take_a_number_calls: Arc::new(RwLock::new(Vec::new())),
            leave_queue_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Script the next TakeANumber reply.
    pub async fn push_reply(&self, queue_number: u64, now_serving: u64, context: &str) {
        self.replies.write().await.push_back(Ok(QueueReply {
            queue_number,
            now_serving,
            context: context.to_string(),
        }));
    }

    /// Script the next TakeANumber call to fail.
    pub async fn push_error(&self, error: QueueError) {
        self.replies.write().await.push_back(Err(error));
    }

    /// Reply to return whenever the script is exhausted.
    pub async fn set_default_reply(&self, queue_number: u64, now_serving: u64, context: &str) {
        *self.default_reply.write().await = Some(QueueReply {
            queue_number,
            now_serving,
            context: context.to_string(),
        });
    }

    /// All recorded TakeANumber calls.
    pub async fn take_a_number_calls(&self) -> Vec<RecordedTakeANumber> {
        self.take_a_number_calls.read().await.clone()
    }

    /// All recorded LeaveQueue calls.
    pub async fn leave_queue_calls(&self) -> Vec<RecordedLeaveQueue> {
        self.leave_queue_calls.read().await.clone()
    }
}

#[async_trait]
impl QueueTransport for MockQueueTransport {
    async fn take_a_number(&self, request: &TakeANumberRequest) -> Result<QueueReply, QueueError> {
        self.take_a_number_calls
            .write()
            .await
            .push(RecordedTakeANumber {
                subscription: request.subscription.clone(),
                ticket: request.ticket.clone(),
                queue_url: request.queue_url.clone(),
                timestamp: Utc::now(),
            });

        if let Some(reply) = self.replies.write().await.pop_front() {
            return reply;
        }
        if let Some(reply) = self.default_reply.read().await.clone() {
            return Ok(reply);
        }
        Err(QueueError::ConnectionFailed(
            "mock transport has no scripted reply".to_string(),
        ))
    }

    async fn leave_queue(&self, request: &LeaveQueueRequest) -> Result<(), QueueError> {
        self.leave_queue_calls
            .write()
            .await
            .push(RecordedLeaveQueue {
                subscription: request.subscription.clone(),
                context: request.context.clone(),
                queue_url: request.queue_url.clone(),
                timestamp: Utc::now(),
            });
        Ok(())
    }
}
