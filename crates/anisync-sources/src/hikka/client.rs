use crate::error::SourceError;
use crate::hikka::api;
use crate::http::create_http_client;
use crate::traits::HistorySource;
use anisync_models::HistoryEvent;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct HikkaClient {
    client: Arc<Client>,
    api_url: String,
    username: String,
    history_limit: u32,
}

impl HikkaClient {
    pub fn new(api_url: String, username: String) -> Self {
        Self {
            client: Arc::new(create_http_client(None)),
            api_url,
            username,
            history_limit: 100,
        }
    }

    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = Arc::new(client);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[async_trait]
impl HistorySource for HikkaClient {
    fn source_name(&self) -> &str {
        "hikka"
    }

    async fn get_history(&self) -> Result<Vec<HistoryEvent>, SourceError> {
        api::get_user_history(&self.client, &self.api_url, &self.username, self.history_limit).await
    }

    async fn get_mal_id(&self, slug: &str) -> Result<Option<u64>, SourceError> {
        api::get_mal_id(&self.client, &self.api_url, slug).await
    }
}
