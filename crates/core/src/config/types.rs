use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub game: GameConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// Game installation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    /// Directory containing the native client installation.
    pub install_dir: PathBuf,
    /// Client executable file name inside the install directory.
    #[serde(default = "default_client_executable")]
    pub client_executable: String,
    /// Game key used when querying the directory service.
    #[serde(default = "default_game_name")]
    pub name: String,
}

impl GameConfig {
    /// Full path of the client executable.
    pub fn client_path(&self) -> PathBuf {
        self.install_dir.join(&self.client_executable)
    }
}

fn default_client_executable() -> String {
    "dndclient.exe".to_string()
}

fn default_game_name() -> String {
    "DDO".to_string()
}

/// Instance launch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LaunchConfig {
    /// Lowest outbound port handed to client instances.
    #[serde(default = "default_base_port")]
    pub base_port: u16,
    /// Display language passed to the client.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            base_port: default_base_port(),
            language: default_language(),
        }
    }
}

fn default_base_port() -> u16 {
    5200
}

fn default_language() -> String {
    "English".to_string()
}

/// Directory/login service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
    /// Datacenter directory endpoint (SOAP).
    #[serde(default = "default_datacenter_url")]
    pub datacenter_url: String,
    /// Login queue endpoint (form POST).
    #[serde(default = "default_queue_endpoint")]
    pub queue_endpoint: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            datacenter_url: default_datacenter_url(),
            queue_endpoint: default_queue_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_datacenter_url() -> String {
    "http://gls.ddo.com/GLS.DataCenterServer/Service.asmx".to_string()
}

fn default_queue_endpoint() -> String {
    "https://gls.ddo.com/GLS.AuthServer/LoginQueue.aspx".to_string()
}

fn default_timeout() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[game]
install_dir = "/opt/ddo"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.game.install_dir, PathBuf::from("/opt/ddo"));
        assert_eq!(config.game.client_executable, "dndclient.exe");
        assert_eq!(config.game.name, "DDO");
        assert_eq!(config.launch.base_port, 5200);
        assert_eq!(config.launch.language, "English");
        assert_eq!(
            config.directory.datacenter_url,
            "http://gls.ddo.com/GLS.DataCenterServer/Service.asmx"
        );
        assert_eq!(config.directory.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[game]
install_dir = "/games/lotro"
client_executable = "lotroclient.exe"
name = "LOTRO"

[launch]
base_port = 6000
language = "DE"

[directory]
datacenter_url = "http://example.com/dc.asmx"
queue_endpoint = "https://example.com/queue.aspx"
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.game.name, "LOTRO");
        assert_eq!(
            config.game.client_path(),
            PathBuf::from("/games/lotro/lotroclient.exe")
        );
        assert_eq!(config.launch.base_port, 6000);
        assert_eq!(config.launch.language, "DE");
        assert_eq!(config.directory.timeout_secs, 10);
    }

    #[test]
    fn test_deserialize_missing_game_fails() {
        let toml = r#"
[launch]
base_port = 5200
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_path_joins_install_dir() {
        let game = GameConfig {
            install_dir: PathBuf::from("/opt/ddo"),
            client_executable: "dndclient.exe".to_string(),
            name: "DDO".to_string(),
        };
        assert_eq!(game.client_path(), PathBuf::from("/opt/ddo/dndclient.exe"));
    }
}
