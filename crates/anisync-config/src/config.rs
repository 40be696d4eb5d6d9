use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::credentials::CredentialStore;
use crate::paths::PathManager;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub hikka: HikkaConfig,
    #[serde(default)]
    pub anilist: AniListConfig,
    #[serde(default)]
    pub sync: SyncOptions,
    #[serde(default)]
    pub scheduler: Option<SchedulerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HikkaConfig {
    #[serde(default = "default_hikka_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub username: String,
    /// Page size of the history request (only the first page is read)
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListConfig {
    #[serde(default = "default_anilist_api_url")]
    pub api_url: String,
    /// Bearer token; never written to config.toml, comes from credentials or env
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Pause after each processed title
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default)]
    pub dry_run: bool,
    /// Per-request timeout; `None` keeps the HTTP client's default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Six-field cron expression (seconds first)
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

/// Values read from the process environment, applied over the file config
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub hikka_api_url: Option<String>,
    pub hikka_username: Option<String>,
    pub anilist_token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            hikka_api_url: read("HIKKA_API_URL"),
            hikka_username: read("HIKKA_USERNAME"),
            anilist_token: read("ANILIST_IMPLICIT_AUTH"),
        }
    }
}

impl Default for HikkaConfig {
    fn default() -> Self {
        Self {
            api_url: default_hikka_api_url(),
            username: String::new(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for AniListConfig {
    fn default() -> Self {
        Self {
            api_url: default_anilist_api_url(),
            token: None,
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            dry_run: false,
            request_timeout_secs: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_hikka_api_url() -> String {
    "https://api.hikka.io".to_string()
}

fn default_anilist_api_url() -> String {
    "https://graphql.anilist.co".to_string()
}

fn default_history_limit() -> u32 {
    100
}

fn default_request_delay_ms() -> u64 {
    3000
}

fn default_schedule() -> String {
    "0 0 * * * *".to_string() // Top of every hour
}

pub fn default_scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        schedule: default_schedule(),
        run_on_startup: default_true(),
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the runtime config: file (if present) → credentials → environment
    pub fn load(paths: &PathManager) -> anyhow::Result<Self> {
        let config_file = paths.config_file();
        let mut config = if config_file.exists() {
            Self::load_from_file(&config_file)
                .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", config_file.display(), e))?
        } else {
            Self::default()
        };

        let mut cred_store = CredentialStore::new(paths.credentials_file());
        cred_store.load()?;
        config.apply_credentials(&cred_store);
        config.apply_env(&EnvOverrides::from_env());

        Ok(config)
    }

    pub fn apply_credentials(&mut self, store: &CredentialStore) {
        if let Some(token) = store.get_anilist_token() {
            self.anilist.token = Some(token.clone());
        }
    }

    pub fn apply_env(&mut self, env: &EnvOverrides) {
        if let Some(ref url) = env.hikka_api_url {
            self.hikka.api_url = url.clone();
        }
        if let Some(ref username) = env.hikka_username {
            self.hikka.username = username.clone();
        }
        if let Some(ref token) = env.anilist_token {
            self.anilist.token = Some(token.clone());
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hikka.username.trim().is_empty() {
            return Err(anyhow::anyhow!("hikka.username is required (set it in config.toml or HIKKA_USERNAME)"));
        }
        if self.hikka.api_url.trim().is_empty() {
            return Err(anyhow::anyhow!("hikka.api_url cannot be empty"));
        }
        if self.anilist.api_url.trim().is_empty() {
            return Err(anyhow::anyhow!("anilist.api_url cannot be empty"));
        }
        if self.hikka.history_limit == 0 {
            return Err(anyhow::anyhow!("hikka.history_limit must be greater than zero"));
        }
        Ok(())
    }

    pub fn anilist_token(&self) -> anyhow::Result<&str> {
        self.anilist
            .token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("AniList token is not configured (run `anisync config anilist` or set ANILIST_IMPLICIT_AUTH)"))
    }

    pub fn scheduler_or_default(&self) -> SchedulerConfig {
        self.scheduler.clone().unwrap_or_else(default_scheduler_config)
    }
}
