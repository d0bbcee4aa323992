use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Game section exists (enforced by serde)
/// - Install directory contains the client executable
/// - Launch base port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Game directory validation happens here, once, rather than on every read.
    let client = config.game.client_path();
    if !client.is_file() {
        return Err(ConfigError::ValidationError(format!(
            "game.install_dir has no {}: {}",
            config.game.client_executable,
            client.display()
        )));
    }

    if config.launch.base_port == 0 {
        return Err(ConfigError::ValidationError(
            "launch.base_port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
