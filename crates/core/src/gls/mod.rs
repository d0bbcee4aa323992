//! GLS directory and login service client.
//!
//! This module is the outward-facing half of the launcher: it discovers data
//! centers and worlds, resolves a world's login server and queue URL through
//! the status endpoint, and performs the SOAP account login that yields the
//! GLS authentication ticket everything downstream runs on.

mod client;
mod error;
mod types;
pub mod xml;

pub use client::GlsClient;
pub use error::AuthError;
pub use types::{
    DataCenter, LoginResult, Subscription, World, WorldAddresses, WorldStatus,
};
