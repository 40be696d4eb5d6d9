use serde::{Deserialize, Serialize};
use crate::status::ListStatus;

/// AniList `Media` object as returned by the lookup query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMedia {
    pub id: u64,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub media_list_entry: Option<RemoteEntry>,
}

/// The viewer's list entry for a media (`mediaListEntry`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RemoteEntry {
    #[serde(default)]
    pub status: Option<ListStatus>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub repeat: Option<u32>,
}
