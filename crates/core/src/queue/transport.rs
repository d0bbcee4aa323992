//! Transport seam for the login queue service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::DirectoryConfig;

use super::wire::{
    check_leave_reply, leave_queue_body, parse_queue_reply, take_a_number_body, LeaveQueueRequest,
    QueueReply, TakeANumberRequest,
};
use super::QueueError;

/// Trait for queue service backends.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Request a queue position for a login.
    async fn take_a_number(&self, request: &TakeANumberRequest) -> Result<QueueReply, QueueError>;

    /// Leave a previously joined queue.
    async fn leave_queue(&self, request: &LeaveQueueRequest) -> Result<(), QueueError>;
}

/// Queue transport talking to the real GLS queue endpoint.
pub struct HttpQueueTransport {
    client: Client,
    endpoint: String,
}

impl HttpQueueTransport {
    /// Create a new transport for the configured queue endpoint.
    pub fn new(config: &DirectoryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.queue_endpoint.clone(),
        }
    }

    async fn post(&self, body: String) -> Result<String, QueueError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueueError::Timeout
                } else {
                    QueueError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueueError::ServiceError {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| QueueError::ConnectionFailed(e.to_string()))
    }
}

#[async_trait]
impl QueueTransport for HttpQueueTransport {
    async fn take_a_number(&self, request: &TakeANumberRequest) -> Result<QueueReply, QueueError> {
        debug!("TakeANumber for {}", request.subscription);
        let body = self.post(take_a_number_body(request)).await?;
        parse_queue_reply(&body)
    }

    async fn leave_queue(&self, request: &LeaveQueueRequest) -> Result<(), QueueError> {
        debug!("LeaveQueue for {}", request.subscription);
        let body = self.post(leave_queue_body(request)).await?;
        check_leave_reply(&body)
    }
}
