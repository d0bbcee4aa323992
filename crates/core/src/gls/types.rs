//! Types for the GLS directory and login protocol.

use crate::queue::QueueTicket;

/// A game subscription attached to an account.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Subscription (account) name used for queueing and launching.
    pub name: String,
    /// Game identifier the subscription belongs to.
    pub game: String,
    pub description: Option<String>,
    pub status: Option<String>,
    /// Product tokens (expansions and the like).
    pub product_tokens: Vec<String>,
}

/// A world advertised by a data center.
#[derive(Debug, Clone)]
pub struct World {
    pub name: String,
    pub login_server_url: String,
    pub chat_server_url: String,
    /// Status endpoint answering the login server / queue URL lists.
    pub status_server_url: String,
    pub language: Option<String>,
}

/// A data center entry from the directory service.
#[derive(Debug, Clone)]
pub struct DataCenter {
    pub game_name: String,
    pub auth_server_url: String,
    pub patch_server_url: String,
    pub launcher_config_url: String,
    pub worlds: Vec<World>,
}

impl DataCenter {
    /// Find a world by name, case-insensitively.
    pub fn world(&self, name: &str) -> Option<&World> {
        self.worlds
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name))
    }
}

/// Result of querying a world's status endpoint.
///
/// The service answers semicolon-separated lists; entries are already split
/// and empty entries dropped.
#[derive(Debug, Clone)]
pub struct WorldStatus {
    pub login_servers: Vec<String>,
    pub queue_urls: Vec<String>,
}

impl WorldStatus {
    /// First advertised login server, if any.
    pub fn primary_login_server(&self) -> Option<&str> {
        self.login_servers.first().map(String::as_str)
    }

    /// First advertised queue URL, if any.
    pub fn primary_queue_url(&self) -> Option<&str> {
        self.queue_urls.first().map(String::as_str)
    }
}

/// Addresses a completed login is bound to.
#[derive(Debug, Clone)]
pub struct WorldAddresses {
    pub login_server: String,
    pub chat_server: String,
    pub queue_url: String,
}

/// A completed account login.
///
/// Produced by [`GlsClient::login`](crate::gls::GlsClient::login). Everything
/// except the queue standing is fixed at construction; the queue protocol
/// updates the standing in place as polls come back.
#[derive(Debug, Clone)]
pub struct LoginResult {
    ticket: String,
    subscription: Subscription,
    world: WorldAddresses,
    game_name: String,
    queue_ticket: Option<QueueTicket>,
}

impl LoginResult {
    pub fn new(
        ticket: impl Into<String>,
        subscription: Subscription,
        world: WorldAddresses,
        game_name: impl Into<String>,
    ) -> Self {
        Self {
            ticket: ticket.into(),
            subscription,
            world,
            game_name: game_name.into(),
            queue_ticket: None,
        }
    }

    /// The opaque GLS authentication ticket.
    pub fn ticket(&self) -> &str {
        &self.ticket
    }

    /// Whether the login actually produced an authentication ticket.
    pub fn has_ticket(&self) -> bool {
        !self.ticket.is_empty()
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn world(&self) -> &WorldAddresses {
        &self.world
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    /// Current queue standing; `None` until the first successful poll.
    pub fn queue_ticket(&self) -> Option<&QueueTicket> {
        self.queue_ticket.as_ref()
    }

    pub(crate) fn set_queue_ticket(&mut self, ticket: QueueTicket) {
        self.queue_ticket = Some(ticket);
    }
}
