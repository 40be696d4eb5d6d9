use anisync_models::{EntryUpdate, RemoteMedia};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};
use crate::error::{GraphQlError, SourceError};

const SERVICE: &str = "AniList";

const MEDIA_BY_MAL_ID_QUERY: &str = r#"
query ($malId: Int) {
    Media(idMal: $malId, type: ANIME) {
        id
        siteUrl
        mediaListEntry {
            status
            score
            progress
            repeat
        }
    }
}
"#;

const SAVE_ENTRY_MUTATION: &str = r#"
mutation ($mediaId: Int, $status: MediaListStatus, $score: Float, $progress: Int, $repeat: Int) {
    SaveMediaListEntry(mediaId: $mediaId, status: $status, score: $score, progress: $progress, repeat: $repeat) {
        id
    }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media", default)]
    media: Option<RemoteMedia>,
}

#[derive(Debug, Deserialize)]
struct SaveEntryData {
    #[serde(rename = "SaveMediaListEntry", default)]
    save_media_list_entry: Option<SavedEntry>,
}

#[derive(Debug, Deserialize)]
struct SavedEntry {
    id: u64,
}

/// POST a GraphQL document and decode the envelope
///
/// AniList answers some failures (e.g. unknown media) with a non-2xx status
/// and a regular JSON envelope, so the body is decoded before the status is judged.
async fn post_graphql<T: DeserializeOwned>(
    client: &Client,
    api_url: &str,
    token: &str,
    query: &str,
    variables: Value,
) -> Result<GraphQlResponse<T>, SourceError> {
    let response = client
        .post(api_url)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .json(&json!({ "query": query, "variables": variables }))
        .send()
        .await
        .map_err(|e| SourceError::http(SERVICE, e))?;

    let status = response.status();
    let body = response.text().await.map_err(|e| SourceError::http(SERVICE, e))?;
    trace!(status = status.as_u16(), body = %body, "AniList response");

    match serde_json::from_str::<GraphQlResponse<T>>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(SourceError::Status {
            service: SERVICE,
            status: status.as_u16(),
            body,
        }),
        Err(source) => Err(SourceError::Decode { service: SERVICE, source }),
    }
}

/// Look up a media (and the viewer's list entry) by MyAnimeList id
pub async fn get_media_by_mal_id(
    client: &Client,
    api_url: &str,
    token: &str,
    mal_id: u64,
) -> Result<Option<RemoteMedia>, SourceError> {
    let envelope: GraphQlResponse<MediaData> = post_graphql(
        client,
        api_url,
        token,
        MEDIA_BY_MAL_ID_QUERY,
        json!({ "malId": mal_id }),
    )
    .await?;

    match envelope.data {
        Some(data) => {
            if data.media.is_none() {
                debug!(mal_id, errors = ?envelope.errors, "AniList has no media for MAL id");
            }
            Ok(data.media)
        }
        None => Err(SourceError::Rejected {
            service: SERVICE,
            errors: envelope.errors.unwrap_or_default(),
        }),
    }
}

/// Run `SaveMediaListEntry` and return the saved entry id
pub async fn save_media_list_entry(
    client: &Client,
    api_url: &str,
    token: &str,
    update: &EntryUpdate,
) -> Result<u64, SourceError> {
    let variables = serde_json::to_value(update)
        .map_err(|source| SourceError::Decode { service: SERVICE, source })?;

    let envelope: GraphQlResponse<SaveEntryData> = post_graphql(
        client,
        api_url,
        token,
        SAVE_ENTRY_MUTATION,
        variables,
    )
    .await?;

    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        return Err(SourceError::Rejected { service: SERVICE, errors });
    }

    envelope
        .data
        .and_then(|d| d.save_media_list_entry)
        .map(|saved| saved.id)
        .ok_or_else(|| SourceError::Rejected {
            service: SERVICE,
            errors: Vec::new(),
        })
}
