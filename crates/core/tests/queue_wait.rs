//! Queue polling integration tests.
//!
//! These drive the queue protocol against a scripted transport and verify
//! the polling state machine: when the wait terminates, what the login sees
//! mid-wait, and how errors and cancellation cut the loop short.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use turnstile_core::testing::{fixtures, MockQueueTransport};
use turnstile_core::{QueueError, QueueProtocol};

fn protocol(transport: &Arc<MockQueueTransport>) -> QueueProtocol {
    QueueProtocol::new(Arc::clone(transport) as Arc<dyn turnstile_core::QueueTransport>)
        .with_poll_interval(Duration::from_millis(10))
}

fn cancel_channel() -> (broadcast::Sender<()>, broadcast::Receiver<()>) {
    broadcast::channel(1)
}

#[tokio::test]
async fn test_wait_polls_until_now_serving_reaches_ticket() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_reply(5, 3, "ctx-1").await;
    transport.push_reply(5, 5, "ctx-2").await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");
    let (_tx, mut rx) = cancel_channel();

    protocol.wait_until_served(&mut login, &mut rx).await.unwrap();

    // Exactly two polls: (5, 3) waits, (5, 5) is served.
    let calls = transport.take_a_number_calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].subscription, "acme.user");
    assert_eq!(calls[0].ticket, "Ticket-acme.user");

    let ticket = login.queue_ticket().unwrap();
    assert_eq!(ticket.ticket_number, 5);
    assert_eq!(ticket.now_serving, 5);
    assert_eq!(ticket.context, "ctx-2");
}

#[tokio::test]
async fn test_wait_returns_immediately_when_already_served() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_reply(2, 7, "ctx").await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");
    let (_tx, mut rx) = cancel_channel();

    protocol.wait_until_served(&mut login, &mut rx).await.unwrap();
    assert_eq!(transport.take_a_number_calls().await.len(), 1);
}

#[tokio::test]
async fn test_acquire_updates_login_standing_each_poll() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_reply(5, 1, "ctx-1").await;
    transport.push_reply(5, 4, "ctx-2").await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");

    protocol.acquire_ticket(&mut login).await.unwrap();
    let first = login.queue_ticket().unwrap().clone();
    assert_eq!(first.now_serving, 1);
    assert_eq!(first.context, "ctx-1");

    protocol.acquire_ticket(&mut login).await.unwrap();
    let second = login.queue_ticket().unwrap();
    assert_eq!(second.now_serving, 4);
    assert_eq!(second.context, "ctx-2");
}

#[tokio::test]
async fn test_is_served_before_acquire_is_a_state_error() {
    let login = fixtures::login_result("acme.user");
    assert!(QueueProtocol::is_served(&login).is_err());
}

#[tokio::test]
async fn test_is_served_after_acquire() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_reply(5, 0, "ctx").await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");
    protocol.acquire_ticket(&mut login).await.unwrap();

    // Now-serving zero means the queue has not started, not that we passed.
    assert!(!QueueProtocol::is_served(&login).unwrap());
}

#[tokio::test]
async fn test_server_error_aborts_wait() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_reply(5, 3, "ctx-1").await;
    transport.push_error(QueueError::ServerError { code: 0x80004005 }).await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");
    let (_tx, mut rx) = cancel_channel();

    let err = protocol
        .wait_until_served(&mut login, &mut rx)
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::ServerError { .. }));
    assert_eq!(transport.take_a_number_calls().await.len(), 2);
}

#[tokio::test]
async fn test_cancellation_aborts_wait() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.set_default_reply(5, 3, "ctx").await;

    let protocol = QueueProtocol::new(
        Arc::clone(&transport) as Arc<dyn turnstile_core::QueueTransport>,
    )
    .with_poll_interval(Duration::from_secs(60));

    let (tx, mut rx) = cancel_channel();
    let mut login = fixtures::login_result("acme.user");

    let waiter = tokio::spawn(async move {
        let result = protocol.wait_until_served(&mut login, &mut rx).await;
        (result, login)
    });

    // Give the first poll a moment to land, then cancel the wait.
    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(()).unwrap();

    let (result, login) = waiter.await.unwrap();
    assert!(matches!(result, Err(QueueError::Cancelled)));

    // The standing recorded before cancellation is still visible.
    let ticket = login.queue_ticket().unwrap();
    assert_eq!(ticket.ticket_number, 5);
    assert_eq!(ticket.now_serving, 3);
}

#[tokio::test]
async fn test_leave_queue_requires_prior_acquire() {
    let transport = Arc::new(MockQueueTransport::new());
    let protocol = protocol(&transport);
    let login = fixtures::login_result("acme.user");

    let err = protocol.leave_queue(&login).await.unwrap_err();
    assert!(matches!(err, QueueError::NotInQueue));
    assert!(transport.leave_queue_calls().await.is_empty());
}

#[tokio::test]
async fn test_leave_queue_sends_last_context() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_reply(5, 1, "ctx-1").await;
    transport.push_reply(5, 2, "ctx-2").await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");
    protocol.acquire_ticket(&mut login).await.unwrap();
    protocol.acquire_ticket(&mut login).await.unwrap();

    protocol.leave_queue(&login).await.unwrap();

    let calls = transport.leave_queue_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].context, "ctx-2");
    assert_eq!(calls[0].subscription, "acme.user");
}

#[tokio::test]
async fn test_transport_failure_surfaces_from_acquire() {
    let transport = Arc::new(MockQueueTransport::new());
    transport.push_error(QueueError::Timeout).await;

    let protocol = protocol(&transport);
    let mut login = fixtures::login_result("acme.user");

    let err = protocol.acquire_ticket(&mut login).await.unwrap_err();
    assert!(matches!(err, QueueError::Timeout));
    assert!(login.queue_ticket().is_none());
}
