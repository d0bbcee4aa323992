use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turnstile_core::{
    load_config, validate_config, DataCenter, FleetManager, GlsClient, HttpQueueTransport,
    QueueError, QueueProtocol, QueueTransport, World,
};

/// Log in one or more accounts, wait out the login queue, and launch a
/// client instance per account.
#[derive(Parser)]
#[command(name = "turnstile", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "turnstile.toml")]
    config: PathBuf,

    /// World to log in to (defaults to the first advertised world)
    #[arg(short, long)]
    world: Option<String>,

    /// List the advertised worlds and exit
    #[arg(long)]
    list_worlds: bool,

    /// Account names to log in and launch
    accounts: Vec<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    // Discover data centers and pick a world
    let gls = GlsClient::new(config.directory.clone());
    let datacenters = gls
        .query_datacenters(&config.game.name)
        .await
        .context("Failed to query the directory service")?;
    let datacenter = datacenters
        .first()
        .ok_or_else(|| anyhow!("directory advertised no data centers for {}", config.game.name))?;

    if args.list_worlds {
        for world in &datacenter.worlds {
            println!("{}", world.name);
        }
        return Ok(());
    }
    if args.accounts.is_empty() {
        bail!("no accounts given; pass at least one account name");
    }

    let world = select_world(datacenter, args.world.as_deref())?;
    info!("Using world {}", world.name);

    let fleet = FleetManager::from_config(&config).context("Failed to set up the launcher")?;
    let transport: Arc<dyn QueueTransport> = Arc::new(HttpQueueTransport::new(&config.directory));
    let protocol = QueueProtocol::new(transport);

    // Ctrl-C cancels any queue wait in progress.
    let (cancel_tx, _) = broadcast::channel(1);
    {
        let cancel_tx = cancel_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling");
                let _ = cancel_tx.send(());
            }
        });
    }

    for account in &args.accounts {
        let password = inquire::Password::new(&format!("Password for {}:", account))
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?;

        info!("Logging in {}", account);
        let mut login = gls
            .login(datacenter, world, account, &password)
            .await
            .with_context(|| format!("Login failed for {}", account))?;

        let mut cancel_rx = cancel_tx.subscribe();
        match protocol.wait_until_served(&mut login, &mut cancel_rx).await {
            Ok(()) => {}
            Err(QueueError::Cancelled) => {
                if let Err(e) = protocol.leave_queue(&login).await {
                    warn!("Failed to leave the queue cleanly: {}", e);
                }
                if let Err(e) = fleet.kill_all().await {
                    warn!("Failed to stop running instances: {}", e);
                }
                bail!("cancelled while waiting in the login queue");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Queue wait failed for {}", account));
            }
        }

        let port = fleet
            .launch(&login)
            .await
            .with_context(|| format!("Failed to launch the client for {}", account))?;
        info!("Launched {} on outbound port {}", account, port);
    }

    info!("All instances launched, waiting for them to exit");
    fleet.wait_all().await.context("Failed waiting on the fleet")?;
    info!("All instances have exited");
    Ok(())
}

/// Pick the requested world, or the first advertised one.
fn select_world<'a>(datacenter: &'a DataCenter, requested: Option<&str>) -> Result<&'a World> {
    match requested {
        Some(name) => datacenter.world(name).ok_or_else(|| {
            anyhow!(
                "world {} not found; known worlds: {}",
                name,
                datacenter
                    .worlds
                    .iter()
                    .map(|w| w.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }),
        None => datacenter
            .worlds
            .first()
            .ok_or_else(|| anyhow!("data center {} advertised no worlds", datacenter.game_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datacenter() -> DataCenter {
        DataCenter {
            game_name: "DDO".to_string(),
            auth_server_url: "http://example.com/auth".to_string(),
            patch_server_url: String::new(),
            launcher_config_url: String::new(),
            worlds: vec![
                World {
                    name: "Orien".to_string(),
                    login_server_url: "http://example.com/login".to_string(),
                    chat_server_url: "198.51.100.8:2900".to_string(),
                    status_server_url: "http://example.com/status".to_string(),
                    language: None,
                },
                World {
                    name: "Thelanis".to_string(),
                    login_server_url: "http://example.com/login".to_string(),
                    chat_server_url: "198.51.100.9:2900".to_string(),
                    status_server_url: "http://example.com/status2".to_string(),
                    language: None,
                },
            ],
        }
    }

    #[test]
    fn test_select_world_defaults_to_first() {
        let dc = datacenter();
        assert_eq!(select_world(&dc, None).unwrap().name, "Orien");
    }

    #[test]
    fn test_select_world_by_name_case_insensitive() {
        let dc = datacenter();
        assert_eq!(select_world(&dc, Some("thelanis")).unwrap().name, "Thelanis");
    }

    #[test]
    fn test_select_world_unknown_fails() {
        let dc = datacenter();
        let err = select_world(&dc, Some("Khyber")).unwrap_err();
        assert!(err.to_string().contains("Khyber"));
    }
}
