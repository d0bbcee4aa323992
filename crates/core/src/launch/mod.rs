//! Client instance launching.
//!
//! A served login turns into an ordered argument list ([`LaunchSpec`]), an
//! [`InstanceLauncher`] owns the one process spawned from it, and the
//! [`FleetManager`] runs any number of instances side by side, handing each
//! a unique outbound port.

mod error;
mod fleet;
mod instance;
mod spec;

pub use error::{FleetError, InvalidLoginResultError, LaunchError};
pub use fleet::FleetManager;
pub use instance::InstanceLauncher;
pub use spec::{LaunchOverrides, LaunchSpec};
