use async_trait::async_trait;
use anisync_models::{EntryUpdate, HistoryEvent, RemoteMedia};
use crate::error::SourceError;

/// Read side of the watch-history provider (Hikka)
#[async_trait]
pub trait HistorySource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Raw history events of the configured user, newest page only
    async fn get_history(&self) -> Result<Vec<HistoryEvent>, SourceError>;

    /// MyAnimeList id of a title; `None` when the title has no counterpart
    async fn get_mal_id(&self, slug: &str) -> Result<Option<u64>, SourceError>;
}

/// List tracker being written to (AniList)
#[async_trait]
pub trait ListTracker: Send + Sync {
    fn source_name(&self) -> &str;

    /// Media and the viewer's list entry for a MyAnimeList id; `None` when the
    /// tracker does not know the title
    async fn get_media_by_mal_id(&self, mal_id: u64) -> Result<Option<RemoteMedia>, SourceError>;

    /// Save a list entry and return the id of the written entry
    async fn save_entry(&self, update: &EntryUpdate) -> Result<u64, SourceError>;
}
