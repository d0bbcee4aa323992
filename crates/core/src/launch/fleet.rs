//! Multi-instance fleet management.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::gls::LoginResult;

use super::{FleetError, InstanceLauncher, LaunchOverrides, LaunchSpec};

/// Port and instance bookkeeping, guarded by one lock.
///
/// `ports` holds every port a live or reserved instance owns; `instances`
/// only the spawned ones. A port allocated for a launch in flight is in
/// `ports` but not yet in `instances`.
#[derive(Debug, Default)]
struct FleetState {
    ports: BTreeSet<u16>,
    instances: HashMap<u16, InstanceLauncher>,
}

impl FleetState {
    /// Reserve the lowest free port at or above `base`.
    fn allocate_port(&mut self, base: u16) -> u16 {
        let mut port = base;
        while self.ports.contains(&port) {
            port += 1;
        }
        self.ports.insert(port);
        port
    }

    fn release_port(&mut self, port: u16) {
        self.ports.remove(&port);
    }
}

/// Runs any number of concurrently active client instances, each bound to a
/// unique outbound port.
pub struct FleetManager {
    client_path: PathBuf,
    install_dir: PathBuf,
    language: String,
    base_port: u16,
    state: Mutex<FleetState>,
}

impl FleetManager {
    /// Create a fleet for an explicit client path and install directory.
    pub fn new(
        client_path: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
        base_port: u16,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client_path: client_path.into(),
            install_dir: install_dir.into(),
            language: language.into(),
            base_port,
            state: Mutex::new(FleetState::default()),
        }
    }

    /// Create a fleet from a loaded configuration, re-checking the install.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let client_path = config.game.client_path();
        if !client_path.is_file() {
            return Err(ConfigError::ValidationError(format!(
                "game.install_dir has no {}: {}",
                config.game.client_executable,
                client_path.display()
            )));
        }

        Ok(Self::new(
            client_path,
            config.game.install_dir.clone(),
            config.launch.base_port,
            config.launch.language.clone(),
        ))
    }

    /// Launch a new client instance for a served login.
    ///
    /// Allocates a unique outbound port, builds the launch spec, and spawns
    /// the client with the install directory as its working directory. The
    /// port reservation is released if anything along the way fails.
    /// Returns the port the instance is tracked under.
    pub async fn launch(&self, login: &LoginResult) -> Result<u16, FleetError> {
        let port = self.state.lock().await.allocate_port(self.base_port);

        match self.spawn_instance(login, port).await {
            Ok(instance) => {
                let mut state = self.state.lock().await;
                state.instances.insert(port, instance);
                info!(
                    "Launched instance for {} on outbound port {}",
                    login.subscription().name,
                    port
                );
                Ok(port)
            }
            Err(e) => {
                self.state.lock().await.release_port(port);
                Err(e)
            }
        }
    }

    async fn spawn_instance(
        &self,
        login: &LoginResult,
        port: u16,
    ) -> Result<InstanceLauncher, FleetError> {
        let overrides = LaunchOverrides {
            outbound_port: port,
            language: self.language.clone(),
        };
        let spec = LaunchSpec::build(login, &overrides)?;

        let mut instance = InstanceLauncher::new();
        instance
            .launch(&self.client_path, &self.install_dir, spec.args())
            .await?;
        Ok(instance)
    }

    /// Wait until every tracked instance has exited.
    ///
    /// Instances are drained one at a time; the lock is never held across a
    /// wait, so other fleet operations keep making progress. Each port is
    /// released once its instance has been waited out.
    pub async fn wait_all(&self) -> Result<(), FleetError> {
        loop {
            let entry = {
                let mut state = self.state.lock().await;
                let port = state.instances.keys().next().copied();
                port.and_then(|p| state.instances.remove(&p).map(|i| (p, i)))
            };

            let Some((port, mut instance)) = entry else {
                return Ok(());
            };

            let result = instance.wait().await;
            self.state.lock().await.release_port(port);
            result?;
        }
    }

    /// Terminate every tracked instance.
    ///
    /// A failure on one instance does not stop the attempt on the rest; all
    /// failures are collected and reported together. Killed instances stay
    /// tracked until [`reap`](Self::reap) prunes them.
    pub async fn kill_all(&self) -> Result<(), FleetError> {
        let mut failures = Vec::new();

        let mut state = self.state.lock().await;
        for (port, instance) in state.instances.iter_mut() {
            if let Err(e) = instance.kill().await {
                warn!("Failed to kill instance on port {}: {}", port, e);
                failures.push((*port, e));
            }
        }
        drop(state);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(FleetError::KillAll { failures })
        }
    }

    /// Prune instances that are no longer running and release their ports.
    ///
    /// Dead entries are collected in a first pass and removed in a second,
    /// so the instance map is never mutated while being walked. Safe to call
    /// while other instances keep running.
    pub async fn reap(&self) {
        let mut state = self.state.lock().await;

        let mut dead = Vec::new();
        for (port, instance) in state.instances.iter_mut() {
            if !instance.is_running() {
                dead.push(*port);
            }
        }

        for port in dead {
            debug!("Reaping exited instance on port {}", port);
            state.instances.remove(&port);
            state.release_port(port);
        }
    }

    /// Whether at least one tracked instance is currently running.
    pub async fn any_running(&self) -> bool {
        let mut state = self.state.lock().await;
        for instance in state.instances.values_mut() {
            if instance.is_running() {
                return true;
            }
        }
        false
    }

    /// Ports of all tracked instances, in ascending order.
    pub async fn active_ports(&self) -> Vec<u16> {
        let state = self.state.lock().await;
        let mut ports: Vec<u16> = state.instances.keys().copied().collect();
        ports.sort_unstable();
        ports
    }
}
