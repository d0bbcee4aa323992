//! Single client instance ownership.

use std::path::Path;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::LaunchError;

/// Owns exactly one spawned client process.
///
/// Lifecycle: unstarted until [`launch`](Self::launch) (once-only), then
/// running until the process exits or is killed. Once an exit has been
/// observed the handle is dropped and only the exit status remains.
#[derive(Debug, Default)]
pub struct InstanceLauncher {
    child: Option<Child>,
    exit_status: Option<ExitStatus>,
    launched: bool,
}

impl InstanceLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the client process.
    ///
    /// The executable must exist, the working directory is set on the child
    /// itself, and the spec arguments follow the executable untouched.
    pub async fn launch(
        &mut self,
        executable: &Path,
        working_dir: &Path,
        args: &[String],
    ) -> Result<(), LaunchError> {
        if self.launched {
            return Err(LaunchError::AlreadyLaunched);
        }
        if !executable.is_file() {
            return Err(LaunchError::ExecutableNotFound {
                path: executable.to_path_buf(),
            });
        }

        let child = Command::new(executable)
            .args(args)
            .current_dir(working_dir)
            .spawn()
            .map_err(LaunchError::Spawn)?;

        info!(
            "Spawned client {} (pid {:?})",
            executable.display(),
            child.id()
        );
        self.child = Some(child);
        self.launched = true;
        Ok(())
    }

    /// Non-blocking liveness check; reaps the exit status as a side effect.
    pub fn is_running(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Client exited with {}", status);
                self.exit_status = Some(status);
                self.child = None;
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("Failed to poll client process: {}", e);
                false
            }
        }
    }

    /// Wait until the process exits. No-op when it already has.
    pub async fn wait(&mut self) -> Result<(), LaunchError> {
        if let Some(mut child) = self.child.take() {
            let status = child.wait().await?;
            debug!("Client exited with {}", status);
            self.exit_status = Some(status);
        }
        Ok(())
    }

    /// Forcibly terminate a running process.
    ///
    /// Fails with [`LaunchError::NotRunning`] on an unstarted or already
    /// exited instance. After a successful kill the handle is cleared, so a
    /// later [`is_running`](Self::is_running) answers false without probing
    /// a dead handle.
    pub async fn kill(&mut self) -> Result<(), LaunchError> {
        if !self.is_running() {
            return Err(LaunchError::NotRunning);
        }

        // is_running() == true implies the handle is present.
        let Some(mut child) = self.child.take() else {
            return Err(LaunchError::NotRunning);
        };

        match child.kill().await {
            Ok(()) => {
                if let Ok(Some(status)) = child.try_wait() {
                    self.exit_status = Some(status);
                }
                info!("Killed client instance");
                Ok(())
            }
            Err(e) => {
                self.child = Some(child);
                Err(LaunchError::Kill(e))
            }
        }
    }

    /// Exit status of the process, once observed.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }
}
