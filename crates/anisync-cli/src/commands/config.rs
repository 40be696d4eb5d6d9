use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use anisync_config::{mask_secret, Config, CredentialStore, PathManager};
use color_eyre::Result;
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();

    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Hikka { username, api_url } => configure_hikka(&paths, username, api_url, output),
        ConfigCommands::Anilist { token } => configure_anilist(&paths, token, output),
        ConfigCommands::Path => {
            match output.format() {
                OutputFormat::Human => {
                    output.info(format!("Config:      {}", paths.config_file().display()));
                    output.info(format!("Credentials: {}", paths.credentials_file().display()));
                    output.info(format!("Daemon log:  {}", paths.daemon_log_file().display()));
                }
                _ => output.json(&json!({
                    "config": paths.config_file(),
                    "credentials": paths.credentials_file(),
                    "daemon_log": paths.daemon_log_file(),
                })),
            }
            Ok(())
        }
    }
}

/// Config file as stored on disk, or defaults when it does not exist yet
fn load_file_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        return Ok(Config::default());
    }
    Config::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config = super::load_config(paths)?;
    let scheduler = config.scheduler_or_default();
    let token = match config.anilist.token.as_deref() {
        Some(token) if full => token.to_string(),
        Some(token) => mask_secret(token),
        None => "(not set)".to_string(),
    };

    match output.format() {
        OutputFormat::Human => {
            output.info(format!("Config file: {}", paths.config_file().display()));
            output.info("");
            output.info("[hikka]");
            output.info(format!("  api_url       = {}", config.hikka.api_url));
            output.info(format!("  username      = {}", config.hikka.username));
            output.info(format!("  history_limit = {}", config.hikka.history_limit));
            output.info("[anilist]");
            output.info(format!("  api_url       = {}", config.anilist.api_url));
            output.info(format!("  token         = {}", token));
            output.info("[sync]");
            output.info(format!("  request_delay_ms     = {}", config.sync.request_delay_ms));
            output.info(format!("  dry_run              = {}", config.sync.dry_run));
            output.info(format!(
                "  request_timeout_secs = {}",
                config.sync.request_timeout_secs.map(|s| s.to_string()).unwrap_or_else(|| "(none)".to_string())
            ));
            output.info("[scheduler]");
            output.info(format!("  schedule       = {}", scheduler.schedule));
            output.info(format!("  run_on_startup = {}", scheduler.run_on_startup));

            if let Err(e) = config.validate() {
                output.warn(format!("Configuration is incomplete: {}", e));
            }
        }
        _ => output.json(&json!({
            "config_file": paths.config_file(),
            "hikka": {
                "api_url": config.hikka.api_url,
                "username": config.hikka.username,
                "history_limit": config.hikka.history_limit,
            },
            "anilist": {
                "api_url": config.anilist.api_url,
                "token": token,
            },
            "sync": {
                "request_delay_ms": config.sync.request_delay_ms,
                "dry_run": config.sync.dry_run,
                "request_timeout_secs": config.sync.request_timeout_secs,
            },
            "scheduler": {
                "schedule": scheduler.schedule,
                "run_on_startup": scheduler.run_on_startup,
            },
            "valid": config.validate().is_ok(),
        })),
    }

    Ok(())
}

fn configure_hikka(
    paths: &PathManager,
    username: Option<String>,
    api_url: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut config = load_file_config(paths)?;

    let username = match username {
        Some(username) => username,
        None => prompt_line("Hikka username: ")?,
    };
    if username.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("Hikka username cannot be empty"));
    }
    config.hikka.username = username.trim().to_string();

    if let Some(api_url) = api_url {
        config.hikka.api_url = api_url;
    }

    config
        .save_to_file(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config: {}", e))?;
    output.success(format!(
        "Hikka configured for user '{}' ({})",
        config.hikka.username, config.hikka.api_url
    ));
    Ok(())
}

fn configure_anilist(paths: &PathManager, token: Option<String>, output: &Output) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => {
            output.info("Create an implicit-grant token at https://anilist.co/settings/developer and paste it below.");
            rpassword::prompt_password("AniList token: ")?
        }
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(color_eyre::eyre::eyre!("AniList token cannot be empty"));
    }

    let mut cred_store = CredentialStore::new(paths.credentials_file());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;
    cred_store.set_anilist_token(token);
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("AniList token saved to {}", paths.credentials_file().display()));
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
