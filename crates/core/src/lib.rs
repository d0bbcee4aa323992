pub mod config;
pub mod gls;
pub mod launch;
pub mod queue;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DirectoryConfig,
    GameConfig, LaunchConfig,
};
pub use gls::{
    AuthError, DataCenter, GlsClient, LoginResult, Subscription, World, WorldAddresses,
    WorldStatus,
};
pub use launch::{
    FleetError, FleetManager, InstanceLauncher, InvalidLoginResultError, LaunchError,
    LaunchOverrides, LaunchSpec,
};
pub use queue::{
    HttpQueueTransport, ProtocolStateError, QueueError, QueueProtocol, QueueTicket,
    QueueTransport,
};
