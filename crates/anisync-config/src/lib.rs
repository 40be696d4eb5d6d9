pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AniListConfig, Config, EnvOverrides, HikkaConfig, SchedulerConfig, SyncOptions, default_scheduler_config};
pub use credentials::{CredentialStore, mask_secret};
pub use paths::{PathManager, container_base_path};
