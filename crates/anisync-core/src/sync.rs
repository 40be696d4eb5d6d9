use anyhow::Result;
use anisync_models::WatchRecord;
use anisync_sources::{HistorySource, ListTracker, SourceError, Sources};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use crate::diff::{diff, NormalizedRecord};
use crate::filter::latest_watch_records;
use crate::update::{prepare_update, write_decision, WriteDecision};

/// Fixed pause between processed titles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub delay: Duration,
}

impl PacingPolicy {
    pub fn from_millis(millis: u64) -> Self {
        Self {
            delay: Duration::from_millis(millis),
        }
    }

    pub fn none() -> Self {
        Self { delay: Duration::ZERO }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::from_millis(3000)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Decide and log, but never write
    pub dry_run: bool,
    pub pacing: PacingPolicy,
}

impl SyncOptions {
    pub fn from_config(options: &anisync_config::SyncOptions) -> Self {
        Self {
            dry_run: options.dry_run,
            pacing: PacingPolicy::from_millis(options.request_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Entry written on AniList
    Updated { entry_id: u64, fields: Vec<&'static str> },
    /// Would have been written (dry run)
    Planned { fields: Vec<&'static str> },
    /// Gate decided there is nothing to push
    Unchanged,
    /// No AniList counterpart for this title
    Skipped { reason: String },
    /// AniList answered the write with errors
    Rejected { message: String },
    /// Transport or decoding failure
    Failed { message: String },
}

impl ItemOutcome {
    /// Whether the pacing delay follows this item
    pub fn is_paced(&self) -> bool {
        !matches!(self, ItemOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub started_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_duration_secs")]
    pub duration: Duration,
    pub dry_run: bool,
    /// Number of pacing delays taken
    pub pauses: usize,
    pub items: Vec<ItemReport>,
}

fn serialize_duration_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl CycleSummary {
    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Updated { .. } | ItemOutcome::Planned { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Rejected { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    pub fn has_errors(&self) -> bool {
        self.rejected() + self.failed() > 0
    }
}

/// Runs sync cycles from Hikka into AniList
pub struct SyncDriver {
    history: Box<dyn HistorySource>,
    tracker: Box<dyn ListTracker>,
    options: SyncOptions,
}

impl SyncDriver {
    pub fn new(sources: Sources, options: SyncOptions) -> Self {
        Self::from_parts(sources.history, sources.tracker, options)
    }

    pub fn from_parts(
        history: Box<dyn HistorySource>,
        tracker: Box<dyn ListTracker>,
        options: SyncOptions,
    ) -> Self {
        Self {
            history,
            tracker,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// One full pass over the deduplicated watch history
    ///
    /// Fails only when the history itself cannot be fetched; per-title failures
    /// are recorded in the summary and the loop moves on.
    #[instrument(skip(self), fields(dry_run = self.options.dry_run))]
    pub async fn run_cycle(&self) -> Result<CycleSummary> {
        let started_at = Utc::now();
        let start = Instant::now();

        info!(operation = "cycle_start", source = self.history.source_name(), target = self.tracker.source_name(), "Starting sync cycle");

        let events = self.history.get_history().await.map_err(|e| {
            error!(operation = "fetch_history", error = %e, "Failed to fetch watch history");
            anyhow::anyhow!("Failed to fetch watch history: {}", e)
        })?;
        let records = latest_watch_records(&events);

        let mut items = Vec::with_capacity(records.len());
        let mut pauses = 0;

        for record in &records {
            let report = self.process_item(record).await;
            let paced = report.outcome.is_paced();
            items.push(report);

            if paced {
                self.options.pacing.pause().await;
                pauses += 1;
            }
        }

        let summary = CycleSummary {
            started_at,
            duration: start.elapsed(),
            dry_run: self.options.dry_run,
            pauses,
            items,
        };

        info!(
            operation = "cycle_complete",
            titles = summary.items.len(),
            updated = summary.updated(),
            unchanged = summary.unchanged(),
            skipped = summary.skipped(),
            rejected = summary.rejected(),
            failed = summary.failed(),
            duration_ms = summary.duration.as_millis() as u64,
            "Sync cycle finished"
        );

        Ok(summary)
    }

    async fn process_item(&self, record: &WatchRecord) -> ItemReport {
        let slug = record.slug.as_str();
        let report = |site_url: Option<String>, outcome: ItemOutcome| ItemReport {
            slug: slug.to_string(),
            site_url,
            outcome,
        };

        let mal_id = match self.history.get_mal_id(slug).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!(operation = "resolve_id", slug, "No MyAnimeList id for {}", slug);
                return report(None, ItemOutcome::Skipped { reason: "no MyAnimeList id".to_string() });
            }
            Err(e) => return report(None, failed(slug, "resolve_id", &e)),
        };

        let media = match self.tracker.get_media_by_mal_id(mal_id).await {
            Ok(Some(media)) => media,
            Ok(None) => {
                warn!(operation = "fetch_remote", slug, mal_id, "No AniList entry for {}", slug);
                return report(None, ItemOutcome::Skipped { reason: "no AniList entry".to_string() });
            }
            Err(e) => return report(None, failed(slug, "fetch_remote", &e)),
        };

        let site_url = Some(media.site_url.clone());
        let existing = media.media_list_entry.as_ref();
        let patch = diff(record, existing);
        let local_status = NormalizedRecord::from_watch_record(record).status;

        match write_decision(local_status.as_ref(), existing, &patch) {
            WriteDecision::Write => {}
            decision => {
                debug!(slug, ?decision, patch = ?patch.field_names(), "Write gate declined");
                info!(operation = "reconcile", slug, site_url = %media.site_url, "No changes for {}", media.site_url);
                return report(site_url, ItemOutcome::Unchanged);
            }
        }

        let update = prepare_update(media.id, existing, &patch);
        let fields = patch.field_names();

        if self.options.dry_run {
            info!(operation = "write_planned", slug, media_id = media.id, update = ?update, "Dry run: would update {}", media.site_url);
            return report(site_url, ItemOutcome::Planned { fields });
        }

        info!(
            operation = "write",
            slug,
            media_id = media.id,
            status = ?update.status,
            score = ?update.score,
            progress = ?update.progress,
            repeat = ?update.repeat,
            "Setting {} to {}",
            media.id,
            update.status.as_ref().map(|s| s.as_str()).unwrap_or("-")
        );

        match self.tracker.save_entry(&update).await {
            Ok(entry_id) => report(site_url, ItemOutcome::Updated { entry_id, fields }),
            Err(e) if e.is_rejection() => {
                error!(operation = "write", slug, media_id = media.id, error = %e, "AniList rejected the update");
                report(site_url, ItemOutcome::Rejected { message: e.to_string() })
            }
            Err(e) => report(site_url, failed(slug, "write", &e)),
        }
    }
}

fn failed(slug: &str, operation: &'static str, e: &SourceError) -> ItemOutcome {
    error!(operation, slug, error = %e, "Failed to sync {}", slug);
    ItemOutcome::Failed { message: e.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anisync_models::{
        EntryUpdate, HistoryAfter, HistoryContent, HistoryData, HistoryEvent, ListStatus,
        RemoteEntry, RemoteMedia, WatchStatus,
    };
    use anisync_sources::GraphQlError;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeHistory {
        events: Vec<HistoryEvent>,
        mal_ids: HashMap<String, u64>,
        broken_slugs: HashSet<String>,
        fail_history: bool,
    }

    #[async_trait]
    impl HistorySource for FakeHistory {
        fn source_name(&self) -> &str {
            "fake-history"
        }

        async fn get_history(&self) -> Result<Vec<HistoryEvent>, SourceError> {
            if self.fail_history {
                return Err(SourceError::Status { service: "Hikka", status: 500, body: "boom".to_string() });
            }
            Ok(self.events.clone())
        }

        async fn get_mal_id(&self, slug: &str) -> Result<Option<u64>, SourceError> {
            if self.broken_slugs.contains(slug) {
                return Err(SourceError::Status { service: "Hikka", status: 502, body: String::new() });
            }
            Ok(self.mal_ids.get(slug).copied())
        }
    }

    #[derive(Default)]
    struct FakeTracker {
        media: HashMap<u64, RemoteMedia>,
        reject_writes: bool,
        saved: Arc<Mutex<Vec<EntryUpdate>>>,
    }

    #[async_trait]
    impl ListTracker for FakeTracker {
        fn source_name(&self) -> &str {
            "fake-tracker"
        }

        async fn get_media_by_mal_id(&self, mal_id: u64) -> Result<Option<RemoteMedia>, SourceError> {
            Ok(self.media.get(&mal_id).cloned())
        }

        async fn save_entry(&self, update: &EntryUpdate) -> Result<u64, SourceError> {
            if self.reject_writes {
                return Err(SourceError::Rejected {
                    service: "AniList",
                    errors: vec![GraphQlError { message: "Invalid token".to_string(), status: Some(401) }],
                });
            }
            self.saved.lock().unwrap().push(update.clone());
            Ok(update.media_id * 10)
        }
    }

    fn watch_event(slug: &str, updated: i64, status: &str, episodes: u32) -> HistoryEvent {
        HistoryEvent {
            history_type: "watch".to_string(),
            updated,
            content: Some(HistoryContent { slug: slug.to_string() }),
            data: Some(HistoryData {
                after: Some(HistoryAfter {
                    status: Some(WatchStatus::from(status)),
                    score: Some(8.0),
                    episodes: Some(episodes),
                    rewatches: Some(0),
                }),
            }),
        }
    }

    fn media(id: u64, entry: Option<RemoteEntry>) -> RemoteMedia {
        RemoteMedia {
            id,
            site_url: format!("https://anilist.co/anime/{}", id),
            media_list_entry: entry,
        }
    }

    fn entry(status: ListStatus, progress: u32) -> RemoteEntry {
        RemoteEntry {
            status: Some(status),
            score: Some(8.0),
            progress: Some(progress),
            repeat: Some(0),
        }
    }

    fn options() -> SyncOptions {
        SyncOptions {
            dry_run: false,
            pacing: PacingPolicy::none(),
        }
    }

    fn driver(history: FakeHistory, tracker: FakeTracker, options: SyncOptions) -> SyncDriver {
        SyncDriver::from_parts(Box::new(history), Box::new(tracker), options)
    }

    #[tokio::test]
    async fn test_empty_history_finishes_immediately() {
        let summary = driver(FakeHistory::default(), FakeTracker::default(), options())
            .run_cycle()
            .await
            .unwrap();
        assert!(summary.items.is_empty());
        assert_eq!(summary.pauses, 0);
    }

    #[tokio::test]
    async fn test_history_failure_aborts_cycle() {
        let history = FakeHistory { fail_history: true, ..FakeHistory::default() };
        let result = driver(history, FakeTracker::default(), options()).run_cycle().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cycle_writes_status_changes_and_skips_the_rest() {
        let history = FakeHistory {
            events: vec![
                watch_event("frieren", 100, "watching", 3),
                watch_event("bocchi", 200, "completed", 12),
                watch_event("frieren", 300, "completed", 28),
                watch_event("orphan", 400, "planned", 0),
            ],
            mal_ids: HashMap::from([("frieren".to_string(), 1), ("bocchi".to_string(), 2)]),
            ..FakeHistory::default()
        };
        let saved = Arc::new(Mutex::new(Vec::new()));
        let tracker = FakeTracker {
            media: HashMap::from([
                (1, media(101, Some(entry(ListStatus::Current, 20)))),
                (2, media(102, Some(entry(ListStatus::Completed, 12)))),
            ]),
            saved: saved.clone(),
            ..FakeTracker::default()
        };

        let summary = driver(history, tracker, options()).run_cycle().await.unwrap();

        assert_eq!(summary.items.len(), 3);
        assert_eq!(summary.items[0].slug, "frieren");
        assert_eq!(
            summary.items[0].outcome,
            ItemOutcome::Updated { entry_id: 1010, fields: vec!["status", "progress"] }
        );
        assert_eq!(summary.items[1].outcome, ItemOutcome::Unchanged);
        assert!(matches!(summary.items[2].outcome, ItemOutcome::Skipped { .. }));
        assert_eq!(summary.updated(), 1);
        assert_eq!(summary.skipped(), 1);
        // The missing-counterpart item is not followed by a pause
        assert_eq!(summary.pauses, 2);

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].media_id, 101);
        assert_eq!(saved[0].status, Some(ListStatus::Completed));
        assert_eq!(saved[0].progress, Some(28));
    }

    #[tokio::test]
    async fn test_new_title_gets_full_write_with_current_status() {
        let history = FakeHistory {
            events: vec![watch_event("frieren", 100, "on_hold", 7)],
            mal_ids: HashMap::from([("frieren".to_string(), 1)]),
            ..FakeHistory::default()
        };
        let saved = Arc::new(Mutex::new(Vec::new()));
        let tracker = FakeTracker {
            media: HashMap::from([(1, media(101, None))]),
            saved: saved.clone(),
            ..FakeTracker::default()
        };

        let summary = driver(history, tracker, options()).run_cycle().await.unwrap();
        assert_eq!(summary.updated(), 1);

        let saved = saved.lock().unwrap();
        // on_hold normalizes to PAUSED, then progress forces CURRENT
        assert_eq!(saved[0].status, Some(ListStatus::Current));
        assert_eq!(saved[0].progress, Some(7));
        assert_eq!(saved[0].score, Some(8.0));
        assert_eq!(saved[0].repeat, Some(0));
    }

    #[tokio::test]
    async fn test_progress_only_change_is_not_written() {
        let history = FakeHistory {
            events: vec![watch_event("frieren", 100, "watching", 6)],
            mal_ids: HashMap::from([("frieren".to_string(), 1)]),
            ..FakeHistory::default()
        };
        let saved = Arc::new(Mutex::new(Vec::new()));
        let tracker = FakeTracker {
            media: HashMap::from([(1, media(101, Some(entry(ListStatus::Current, 5))))]),
            saved: saved.clone(),
            ..FakeTracker::default()
        };

        let summary = driver(history, tracker, options()).run_cycle().await.unwrap();
        assert_eq!(summary.items[0].outcome, ItemOutcome::Unchanged);
        assert!(saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_item_does_not_stop_cycle() {
        let history = FakeHistory {
            events: vec![
                watch_event("broken", 100, "watching", 1),
                watch_event("frieren", 200, "completed", 28),
            ],
            mal_ids: HashMap::from([("frieren".to_string(), 1)]),
            broken_slugs: HashSet::from(["broken".to_string()]),
            ..FakeHistory::default()
        };
        let tracker = FakeTracker {
            media: HashMap::from([(1, media(101, Some(entry(ListStatus::Current, 27))))]),
            ..FakeTracker::default()
        };

        let summary = driver(history, tracker, options()).run_cycle().await.unwrap();
        assert!(matches!(summary.items[0].outcome, ItemOutcome::Failed { .. }));
        assert!(matches!(summary.items[1].outcome, ItemOutcome::Updated { .. }));
        assert!(summary.has_errors());
        assert_eq!(summary.pauses, 2);
    }

    #[tokio::test]
    async fn test_rejected_write_is_reported() {
        let history = FakeHistory {
            events: vec![watch_event("frieren", 100, "completed", 28)],
            mal_ids: HashMap::from([("frieren".to_string(), 1)]),
            ..FakeHistory::default()
        };
        let tracker = FakeTracker {
            media: HashMap::from([(1, media(101, Some(entry(ListStatus::Current, 27))))]),
            reject_writes: true,
            ..FakeTracker::default()
        };

        let summary = driver(history, tracker, options()).run_cycle().await.unwrap();
        match &summary.items[0].outcome {
            ItemOutcome::Rejected { message } => assert!(message.contains("Invalid token")),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(summary.rejected(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_never_writes() {
        let history = FakeHistory {
            events: vec![watch_event("frieren", 100, "completed", 28)],
            mal_ids: HashMap::from([("frieren".to_string(), 1)]),
            ..FakeHistory::default()
        };
        let saved = Arc::new(Mutex::new(Vec::new()));
        let tracker = FakeTracker {
            media: HashMap::from([(1, media(101, Some(entry(ListStatus::Current, 27))))]),
            saved: saved.clone(),
            ..FakeTracker::default()
        };
        let options = SyncOptions { dry_run: true, ..options() };

        let summary = driver(history, tracker, options).run_cycle().await.unwrap();
        assert_eq!(
            summary.items[0].outcome,
            ItemOutcome::Planned { fields: vec!["status", "progress"] }
        );
        assert!(summary.dry_run);
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_summary_serializes_outcomes() {
        let summary = CycleSummary {
            started_at: Utc::now(),
            duration: Duration::from_millis(1500),
            dry_run: false,
            pauses: 1,
            items: vec![ItemReport {
                slug: "frieren".to_string(),
                site_url: Some("https://anilist.co/anime/101".to_string()),
                outcome: ItemOutcome::Updated { entry_id: 5, fields: vec!["status"] },
            }],
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["duration"], 1.5);
        assert_eq!(json["items"][0]["outcome"], "updated");
        assert_eq!(json["items"][0]["entry_id"], 5);
        assert_eq!(json["items"][0]["slug"], "frieren");
    }

    #[test]
    fn test_pacing_policy_from_config() {
        let config = anisync_config::SyncOptions::default();
        let options = SyncOptions::from_config(&config);
        assert_eq!(options.pacing.delay, Duration::from_secs(3));
        assert!(!options.dry_run);
    }
}
