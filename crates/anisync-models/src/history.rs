use serde::{Deserialize, Serialize};
use crate::status::WatchStatus;

/// `history_type` value of events that describe a watch-list change
pub const WATCH_HISTORY_TYPE: &str = "watch";

/// One page of `GET /history/user/{username}`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryPage {
    #[serde(default)]
    pub pagination: Option<serde_json::Value>,
    #[serde(default)]
    pub list: Vec<HistoryEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEvent {
    pub history_type: String,
    /// Unix timestamp (seconds) of the last update of this event
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub content: Option<HistoryContent>,
    #[serde(default)]
    pub data: Option<HistoryData>,
}

impl HistoryEvent {
    pub fn is_watch(&self) -> bool {
        self.history_type == WATCH_HISTORY_TYPE
    }

    pub fn slug(&self) -> Option<&str> {
        self.content.as_ref().map(|c| c.slug.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryContent {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HistoryData {
    #[serde(default)]
    pub after: Option<HistoryAfter>,
}

/// State of the watch entry after the event; only changed fields are present
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HistoryAfter {
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub rewatches: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_page_decodes_hikka_payload() {
        let payload = r#"{
            "pagination": {"total": 2, "pages": 1, "page": 1},
            "list": [
                {
                    "reference": "c5b1b8b4",
                    "history_type": "watch",
                    "created": 1700000000,
                    "updated": 1700000100,
                    "content": {"slug": "frieren-1a2b3c", "title_en": "Frieren"},
                    "data": {"before": {"episodes": 4}, "after": {"episodes": 5, "status": "watching"}, "new_watch": false}
                },
                {
                    "history_type": "favourite_anime_add",
                    "updated": 1700000200,
                    "content": {"slug": "bocchi-9f8e7d"},
                    "data": null
                }
            ]
        }"#;

        let page: HistoryPage = serde_json::from_str(payload).unwrap();
        assert_eq!(page.list.len(), 2);

        let first = &page.list[0];
        assert!(first.is_watch());
        assert_eq!(first.slug(), Some("frieren-1a2b3c"));
        let after = first.data.as_ref().unwrap().after.as_ref().unwrap();
        assert_eq!(after.episodes, Some(5));
        assert_eq!(after.status, Some(WatchStatus::Watching));
        assert_eq!(after.score, None);

        assert!(!page.list[1].is_watch());
    }
}
