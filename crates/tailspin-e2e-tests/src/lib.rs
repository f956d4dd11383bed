pub mod rest;

use std::path::Path;

use anyhow::{Result, anyhow};
use rand::Rng as _;
use tailspin_server::config::{Parser, ServerConfig};
use tempfile::TempDir;
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::debug;

pub const SEED_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../test-data/seed.json");

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(5130..6130);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, std::time::Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?.to_string();
    let base_url = format!("http://localhost:{}", port);
    let args = &[
        "tailspin-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--seed",
        SEED_FILE,
        "--base-url",
        &base_url,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

/// Config with a fresh data directory, seeded from the shared test catalog
pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let base_dir = std::env::temp_dir();
    test_config(test_name, &base_dir)
}

/// Running server, stopped gracefully when dropped
pub struct ServerGuard {
    shutdown: Option<oneshot::Sender<()>>,
    #[allow(dead_code)]
    handle: JoinHandle<Result<()>>,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Starts the server in background and waits until it answers health checks
pub async fn spawn_server(args: ServerConfig) -> Result<ServerGuard> {
    let health_url = args.base_url.join("health")?;
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let state = tailspin_server::build_state(&args).await?;
        tailspin_server::run::run_graceful_with_state(args, state, async move {
            let _ = rx.await;
        })
        .await
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(response) = client.get(health_url.clone()).send().await {
            if response.status().is_success() {
                debug!("Server ready at {health_url}");
                return Ok(ServerGuard {
                    shutdown: Some(tx),
                    handle,
                });
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    Err(anyhow!("Server did not start"))
}
