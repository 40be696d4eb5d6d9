use serde::{Deserialize, Serialize};
use crate::remote::RemoteEntry;
use crate::status::ListStatus;

/// Sparse set of list-entry fields that need to change on AniList
///
/// A field is `Some` only when the local value differs from the remote one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Patch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.field_names().len()
    }

    /// Names of the fields carried by this patch, in canonical order
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.status.is_some() {
            names.push("status");
        }
        if self.score.is_some() {
            names.push("score");
        }
        if self.progress.is_some() {
            names.push("progress");
        }
        if self.repeat.is_some() {
            names.push("repeat");
        }
        names
    }

    /// Overlay this patch on an existing entry (or on an empty one)
    pub fn apply_to(&self, entry: Option<&RemoteEntry>) -> RemoteEntry {
        let base = entry.cloned().unwrap_or_default();
        RemoteEntry {
            status: self.status.clone().or(base.status),
            score: self.score.or(base.score),
            progress: self.progress.or(base.progress),
            repeat: self.repeat.or(base.repeat),
        }
    }
}

/// Variables of the `SaveMediaListEntry` mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate {
    pub media_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
}

impl EntryUpdate {
    /// Pre-existing entry fields overlaid by the patch
    pub fn from_patch(media_id: u64, existing: Option<&RemoteEntry>, patch: &Patch) -> Self {
        let merged = patch.apply_to(existing);
        Self {
            media_id,
            status: merged.status,
            score: merged.score,
            progress: merged.progress,
            repeat: merged.repeat,
        }
    }
}
