//! Fleet lifecycle integration tests.
//!
//! These run the fleet manager against small shell scripts standing in for
//! the native client, covering port allocation and reuse, reaping, waiting,
//! and kill aggregation.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use turnstile_core::testing::fixtures;
use turnstile_core::{FleetError, FleetManager, LaunchError};

const SLEEP_SCRIPT: &str = "#!/bin/sh\nsleep 30\n";

/// Client stand-in that exits immediately when launched with the given
/// outbound port and sleeps otherwise.
fn exit_on_port_script(port: u16) -> String {
    format!(
        "#!/bin/sh\nport=\"\"\nwhile [ $# -gt 0 ]; do\n  \
         if [ \"$1\" = \"--outport\" ]; then port=\"$2\"; fi\n  shift\ndone\n\
         if [ \"$port\" = \"{port}\" ]; then exit 0; fi\nsleep 30\n"
    )
}

fn write_client(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("dndclient");
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn fleet(dir: &TempDir, body: &str) -> FleetManager {
    let client = write_client(dir, body);
    FleetManager::new(client, dir.path(), 5200, "English")
}

#[tokio::test]
async fn test_sequential_launches_get_ascending_ports() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet(&dir, SLEEP_SCRIPT);
    let login = fixtures::login_result("acme.user");

    let first = fleet.launch(&login).await.unwrap();
    let second = fleet.launch(&login).await.unwrap();
    assert_eq!(first, 5200);
    assert_eq!(second, 5201);
    assert_eq!(fleet.active_ports().await, vec![5200, 5201]);
    assert!(fleet.any_running().await);

    fleet.kill_all().await.unwrap();
    fleet.reap().await;
    assert!(fleet.active_ports().await.is_empty());
    assert!(!fleet.any_running().await);
}

#[tokio::test]
async fn test_reap_releases_port_for_reuse() {
    let dir = TempDir::new().unwrap();
    // The first instance (port 5200) exits immediately; the second keeps running.
    let fleet = fleet(&dir, &exit_on_port_script(5200));
    let login = fixtures::login_result("acme.user");

    assert_eq!(fleet.launch(&login).await.unwrap(), 5200);
    assert_eq!(fleet.launch(&login).await.unwrap(), 5201);

    // Let the first instance die, then prune it.
    tokio::time::sleep(Duration::from_millis(300)).await;
    fleet.reap().await;
    assert_eq!(fleet.active_ports().await, vec![5201]);

    // The freed port is handed out again.
    assert_eq!(fleet.launch(&login).await.unwrap(), 5200);

    let _ = fleet.kill_all().await;
}

#[tokio::test]
async fn test_concurrent_launches_get_distinct_ports() {
    let dir = TempDir::new().unwrap();
    let fleet = Arc::new(fleet(&dir, SLEEP_SCRIPT));

    let mut handles = Vec::new();
    for i in 0..8 {
        let fleet = Arc::clone(&fleet);
        handles.push(tokio::spawn(async move {
            let login = fixtures::login_result(&format!("user-{}", i));
            fleet.launch(&login).await.unwrap()
        }));
    }

    let mut ports = Vec::new();
    for handle in handles {
        ports.push(handle.await.unwrap());
    }

    ports.sort_unstable();
    let mut deduped = ports.clone();
    deduped.dedup();
    assert_eq!(ports, deduped, "allocated ports must be pairwise distinct");
    assert!(ports.iter().all(|p| *p >= 5200));

    fleet.kill_all().await.unwrap();
}

#[tokio::test]
async fn test_failed_launch_releases_port() {
    let dir = TempDir::new().unwrap();
    let fleet = FleetManager::new(
        dir.path().join("missing-client"),
        dir.path(),
        5200,
        "English",
    );
    let login = fixtures::login_result("acme.user");

    let err = fleet.launch(&login).await.unwrap_err();
    assert!(matches!(
        err,
        FleetError::Launch(LaunchError::ExecutableNotFound { .. })
    ));
    assert!(fleet.active_ports().await.is_empty());
}

#[tokio::test]
async fn test_ticketless_login_releases_port() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet(&dir, SLEEP_SCRIPT);
    let login = fixtures::ticketless_login_result("acme.user");

    let err = fleet.launch(&login).await.unwrap_err();
    assert!(matches!(err, FleetError::InvalidLogin(_)));
    assert!(fleet.active_ports().await.is_empty());
}

#[tokio::test]
async fn test_kill_all_reports_failures_but_kills_the_rest() {
    let dir = TempDir::new().unwrap();
    // The middle instance (port 5201) exits on its own; killing it later fails.
    let fleet = fleet(&dir, &exit_on_port_script(5201));
    let login = fixtures::login_result("acme.user");

    assert_eq!(fleet.launch(&login).await.unwrap(), 5200);
    assert_eq!(fleet.launch(&login).await.unwrap(), 5201);
    assert_eq!(fleet.launch(&login).await.unwrap(), 5202);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let err = fleet.kill_all().await.unwrap_err();
    match err {
        FleetError::KillAll { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, 5201);
            assert!(matches!(failures[0].1, LaunchError::NotRunning));
        }
        other => panic!("expected KillAll, got {:?}", other),
    }

    // The other two were still killed.
    assert!(!fleet.any_running().await);

    fleet.reap().await;
    assert!(fleet.active_ports().await.is_empty());
}

#[tokio::test]
async fn test_wait_all_drains_the_fleet() {
    let dir = TempDir::new().unwrap();
    let fleet = fleet(&dir, "#!/bin/sh\nsleep 0.3\n");
    let login = fixtures::login_result("acme.user");

    fleet.launch(&login).await.unwrap();
    fleet.launch(&login).await.unwrap();

    fleet.wait_all().await.unwrap();
    assert!(!fleet.any_running().await);
    assert!(fleet.active_ports().await.is_empty());

    // Everything was released, so the base port is available again.
    assert_eq!(fleet.launch(&login).await.unwrap(), 5200);
    fleet.wait_all().await.unwrap();
}
