pub mod config;
pub mod error;
pub mod run;

use anyhow::Context as _;
use config::ServerConfig;
pub use error::{Error, Result};
use tailspin_app::state::AppState;
use tailspin_dal::seed::{seed, SeedData};
use tokio::fs;
use tracing::info;

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.data_dir();
    if !fs::try_exists(&data_dir).await? {
        fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {}", data_dir.display());
    } else if !data_dir.is_dir() {
        anyhow::bail!("Data directory {} is not a directory", data_dir.display());
    }

    let pool = tailspin_dal::new_pool(&config.database_url()).await?;

    if let Some(seed_file) = &config.seed {
        let content = fs::read(seed_file)
            .await
            .with_context(|| format!("Cannot read seed file {}", seed_file.display()))?;
        let data: SeedData = serde_json::from_slice(&content)
            .with_context(|| format!("Invalid seed file {}", seed_file.display()))?;
        seed(&pool, &data).await?;
    }

    Ok(AppState::new(pool))
}
