//! Testing utilities and mock implementations.
//!
//! Provides a scripted queue transport and ready-made login fixtures so the
//! protocol and fleet can be exercised without the real GLS service.

mod mock_queue_transport;

pub use mock_queue_transport::{MockQueueTransport, RecordedLeaveQueue, RecordedTakeANumber};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::gls::{LoginResult, Subscription, WorldAddresses};

    /// Create a completed login for an account with reasonable defaults.
    pub fn login_result(account: &str) -> LoginResult {
        LoginResult::new(
            format!("Ticket-{}", account),
            Subscription {
                name: account.to_string(),
                game: "DDO".to_string(),
                description: Some("Test subscription".to_string()),
                status: Some("Active".to_string()),
                product_tokens: vec!["DDO".to_string()],
            },
            WorldAddresses {
                login_server: "198.51.100.7:9010".to_string(),
                chat_server: "198.51.100.8:2900".to_string(),
                queue_url: "http://gls.example.com/queue".to_string(),
            },
            "DDO",
        )
    }

    /// Create a login whose authentication never completed.
    pub fn ticketless_login_result(account: &str) -> LoginResult {
        LoginResult::new(
            "",
            Subscription {
                name: account.to_string(),
                game: "DDO".to_string(),
                description: None,
                status: None,
                product_tokens: vec![],
            },
            WorldAddresses {
                login_server: "198.51.100.7:9010".to_string(),
                chat_server: "198.51.100.8:2900".to_string(),
                queue_url: "http://gls.example.com/queue".to_string(),
            },
            "DDO",
        )
    }
}
