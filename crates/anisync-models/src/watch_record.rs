use serde::{Deserialize, Serialize};
use crate::history::HistoryEvent;
use crate::status::WatchStatus;

/// Latest known state of one title in the user's Hikka watch list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchRecord {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewatches: Option<u32>,
    pub updated: i64,
}

impl WatchRecord {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            status: None,
            score: None,
            episodes: None,
            rewatches: None,
            updated: 0,
        }
    }

    /// Build a record from a watch event. Returns `None` for other event types
    /// or events without content.
    pub fn from_event(event: &HistoryEvent) -> Option<Self> {
        if !event.is_watch() {
            return None;
        }
        let slug = event.slug()?;
        let after = event
            .data
            .as_ref()
            .and_then(|d| d.after.clone())
            .unwrap_or_default();

        Some(Self {
            slug: slug.to_string(),
            status: after.status,
            score: after.score,
            episodes: after.episodes,
            rewatches: after.rewatches,
            updated: event.updated,
        })
    }
}
