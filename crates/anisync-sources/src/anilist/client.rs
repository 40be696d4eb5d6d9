use crate::anilist::api;
use crate::error::SourceError;
use crate::http::create_http_client;
use crate::traits::ListTracker;
use anisync_models::{EntryUpdate, RemoteMedia};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AniListClient {
    client: Arc<Client>,
    api_url: String,
    token: String,
}

impl AniListClient {
    pub fn new(api_url: String, token: String) -> Self {
        Self {
            client: Arc::new(create_http_client(None)),
            api_url,
            token,
        }
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = Arc::new(client);
        self
    }
}

#[async_trait]
impl ListTracker for AniListClient {
    fn source_name(&self) -> &str {
        "anilist"
    }

    async fn get_media_by_mal_id(&self, mal_id: u64) -> Result<Option<RemoteMedia>, SourceError> {
        api::get_media_by_mal_id(&self.client, &self.api_url, &self.token, mal_id).await
    }

    async fn save_entry(&self, update: &EntryUpdate) -> Result<u64, SourceError> {
        api::save_media_list_entry(&self.client, &self.api_url, &self.token, update).await
    }
}
