use anisync_config::Config;
use std::time::Duration;
use tracing::debug;
use crate::anilist::AniListClient;
use crate::hikka::HikkaClient;
use crate::http::create_http_client;
use crate::traits::{HistorySource, ListTracker};

/// The two services a sync cycle talks to
pub struct Sources {
    pub history: Box<dyn HistorySource>,
    pub tracker: Box<dyn ListTracker>,
}

/// Build both clients from a validated config
pub fn create_sources(config: &Config) -> anyhow::Result<Sources> {
    config.validate()?;
    let token = config.anilist_token()?;

    let timeout = config.sync.request_timeout_secs.map(Duration::from_secs);
    let http = create_http_client(timeout);

    let history = HikkaClient::new(config.hikka.api_url.clone(), config.hikka.username.clone())
        .with_history_limit(config.hikka.history_limit)
        .with_http_client(http.clone());
    let tracker = AniListClient::new(config.anilist.api_url.clone(), token.to_string())
        .with_http_client(http);

    debug!(
        hikka = %config.hikka.api_url,
        anilist = %config.anilist.api_url,
        username = %config.hikka.username,
        timeout_secs = ?config.sync.request_timeout_secs,
        "Created sources"
    );

    Ok(Sources {
        history: Box::new(history),
        tracker: Box::new(tracker),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sources_requires_token() {
        let mut config = Config::default();
        config.hikka.username = "tester".to_string();
        let err = create_sources(&config).err().unwrap();
        assert!(err.to_string().contains("AniList token"));

        config.anilist.token = Some("token".to_string());
        let sources = create_sources(&config).unwrap();
        assert_eq!(sources.history.source_name(), "hikka");
        assert_eq!(sources.tracker.source_name(), "anilist");
    }

    #[test]
    fn test_create_sources_validates_config() {
        let mut config = Config::default();
        config.anilist.token = Some("token".to_string());
        assert!(create_sources(&config).is_err());
    }
}
