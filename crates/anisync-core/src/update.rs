use anisync_models::{EntryUpdate, ListStatus, Patch, RemoteEntry};

/// Outcome of the write gate for one title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Patch is non-empty and the status moved
    Write,
    /// Nothing differs
    NoChanges,
    /// Patch is non-empty but the normalized status already matches the remote one
    StatusUnchanged,
}

impl WriteDecision {
    pub fn should_write(self) -> bool {
        self == WriteDecision::Write
    }
}

/// Decide whether a patch is pushed
///
/// Both conditions must hold: the patch is non-empty, and the local normalized
/// status differs from the remote status seen at diff time. The second check
/// also suppresses score/progress-only changes while the status is unchanged.
pub fn write_decision(
    local_status: Option<&ListStatus>,
    remote: Option<&RemoteEntry>,
    patch: &Patch,
) -> WriteDecision {
    if patch.is_empty() {
        return WriteDecision::NoChanges;
    }

    let remote_status = remote.and_then(|entry| entry.status.as_ref());
    if local_status == remote_status {
        return WriteDecision::StatusUnchanged;
    }

    WriteDecision::Write
}

/// Build the outgoing mutation: existing entry overlaid by the patch, then
/// status forced to CURRENT whenever progress is sent for an unfinished title
pub fn prepare_update(media_id: u64, existing: Option<&RemoteEntry>, patch: &Patch) -> EntryUpdate {
    let mut update = EntryUpdate::from_patch(media_id, existing, patch);
    adjust_status(&mut update);
    update
}

fn adjust_status(update: &mut EntryUpdate) {
    if update.progress.is_some() && update.status != Some(ListStatus::Completed) {
        update.status = Some(ListStatus::Current);
    }
}
