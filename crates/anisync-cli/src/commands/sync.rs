use crate::output::Output;
use color_eyre::Result;
use anisync_config::PathManager;

pub async fn run_sync(dry_run: bool, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let paths = PathManager::default();
    let mut config = super::load_config(&paths)?;
    if dry_run {
        config.sync.dry_run = true;
    }
    let driver = super::prepare_driver(&config, &paths, output)?;

    let summary = driver
        .run_cycle()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Sync operation failed: {}", e))?;

    output.summary(&summary);
    Ok(())
}
