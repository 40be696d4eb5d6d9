use anisync_models::{HistoryEvent, HistoryPage};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use crate::error::SourceError;

const SERVICE: &str = "Hikka";

#[derive(Debug, Deserialize)]
struct AnimeInfo {
    #[serde(default)]
    mal_id: Option<u64>,
}

/// Fetch the first page of a user's history
pub async fn get_user_history(
    client: &Client,
    api_url: &str,
    username: &str,
    limit: u32,
) -> Result<Vec<HistoryEvent>, SourceError> {
    let url = format!(
        "{}/history/user/{}?page=1&limit={}",
        api_url.trim_end_matches('/'),
        urlencoding::encode(username),
        limit
    );

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| SourceError::http(SERVICE, e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            service: SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await.map_err(|e| SourceError::http(SERVICE, e))?;
    let page: HistoryPage = serde_json::from_str(&body)
        .map_err(|source| SourceError::Decode { service: SERVICE, source })?;

    debug!(username, events = page.list.len(), "Fetched Hikka history page");
    Ok(page.list)
}

/// Resolve a Hikka slug to its MyAnimeList id
pub async fn get_mal_id(
    client: &Client,
    api_url: &str,
    slug: &str,
) -> Result<Option<u64>, SourceError> {
    let url = format!(
        "{}/anime/{}",
        api_url.trim_end_matches('/'),
        urlencoding::encode(slug)
    );

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| SourceError::http(SERVICE, e))?;

    // Unknown slug: no counterpart rather than a failure
    if response.status() == StatusCode::NOT_FOUND {
        debug!(slug, "Hikka has no anime for slug");
        return Ok(None);
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            service: SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await.map_err(|e| SourceError::http(SERVICE, e))?;
    let info: AnimeInfo = serde_json::from_str(&body)
        .map_err(|source| SourceError::Decode { service: SERVICE, source })?;

    Ok(info.mal_id)
}
