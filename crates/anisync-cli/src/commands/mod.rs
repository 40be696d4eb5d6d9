pub mod config;
pub mod daemon;
pub mod sync;

use crate::output::Output;
use anisync_config::{Config, CredentialStore, PathManager};
use anisync_core::{SyncDriver, SyncOptions};
use anisync_sources::create_sources;
use color_eyre::Result;

pub(crate) fn load_config(paths: &PathManager) -> Result<Config> {
    Config::load(paths).map_err(|e| color_eyre::eyre::eyre!("{}", e))
}

/// Check the stored token and build the driver
pub(crate) fn prepare_driver(config: &Config, paths: &PathManager, output: &Output) -> Result<SyncDriver> {
    warn_if_token_expired(paths, output);

    let sources = create_sources(config)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create sources: {}", e))?;
    Ok(SyncDriver::new(sources, SyncOptions::from_config(&config.sync)))
}

fn warn_if_token_expired(paths: &PathManager, output: &Output) {
    let mut cred_store = CredentialStore::new(paths.credentials_file());
    if cred_store.load().is_err() {
        return;
    }
    if cred_store.is_anilist_token_expired(chrono::Utc::now()) {
        output.warn("The stored AniList token is older than one year and has likely expired. Run `anisync config anilist` to replace it.");
    }
}
