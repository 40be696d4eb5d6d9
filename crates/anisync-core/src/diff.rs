// Field diff between a Hikka watch record and an AniList list entry

use anisync_models::{ListStatus, Patch, RemoteEntry, WatchRecord};
use crate::status::normalize_status;

/// A watch record expressed in AniList terms
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRecord {
    pub status: Option<ListStatus>,
    pub score: Option<f64>,
    pub progress: Option<u32>,
    pub repeat: Option<u32>,
}

impl NormalizedRecord {
    pub fn from_watch_record(record: &WatchRecord) -> Self {
        Self {
            status: record.status.as_ref().map(normalize_status),
            score: record.score,
            progress: record.episodes,
            repeat: record.rewatches,
        }
    }

    /// Every defined field, as a full initial write
    pub fn into_patch(self) -> Patch {
        Patch {
            status: self.status,
            score: self.score,
            progress: self.progress,
            repeat: self.repeat,
        }
    }
}

/// Local value if it is defined and differs from the remote one
fn changed<T: PartialEq + Clone>(local: &Option<T>, remote: &Option<T>) -> Option<T> {
    match local {
        Some(value) if remote.as_ref() != Some(value) => Some(value.clone()),
        _ => None,
    }
}

/// Minimal patch bringing `remote` in line with `local`
///
/// Without a remote entry the whole normalized record is the patch. Fields
/// missing locally never appear, so a remote value is never cleared.
pub fn diff(local: &WatchRecord, remote: Option<&RemoteEntry>) -> Patch {
    let normalized = NormalizedRecord::from_watch_record(local);

    let Some(remote) = remote else {
        return normalized.into_patch();
    };

    Patch {
        status: changed(&normalized.status, &remote.status),
        score: changed(&normalized.score, &remote.score),
        progress: changed(&normalized.progress, &remote.progress),
        repeat: changed(&normalized.repeat, &remote.repeat),
    }
}
