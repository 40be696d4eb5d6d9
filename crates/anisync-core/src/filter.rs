use anisync_models::{HistoryEvent, WatchRecord};
use std::collections::HashMap;
use tracing::debug;

/// Reduce raw history to one record per slug
///
/// Only watch events are kept. A later event replaces an earlier one for the
/// same slug only when its `updated` timestamp is strictly greater; on a tie the
/// first-seen event stays. Output order is the order in which each slug was
/// first seen, and a replacement keeps that slot.
pub fn latest_watch_records(events: &[HistoryEvent]) -> Vec<WatchRecord> {
    let mut records: Vec<WatchRecord> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for event in events {
        let Some(record) = WatchRecord::from_event(event) else {
            skipped += 1;
            continue;
        };

        match slots.get(&record.slug) {
            Some(&slot) => {
                if records[slot].updated < record.updated {
                    records[slot] = record;
                }
            }
            None => {
                slots.insert(record.slug.clone(), records.len());
                records.push(record);
            }
        }
    }

    debug!(
        events = events.len(),
        records = records.len(),
        skipped,
        "Deduplicated watch history"
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use anisync_models::{HistoryAfter, HistoryContent, HistoryData, WatchStatus};

    fn watch_event(slug: &str, updated: i64, episodes: u32) -> HistoryEvent {
        HistoryEvent {
            history_type: "watch".to_string(),
            updated,
            content: Some(HistoryContent { slug: slug.to_string() }),
            data: Some(HistoryData {
                after: Some(HistoryAfter {
                    status: Some(WatchStatus::Watching),
                    score: None,
                    episodes: Some(episodes),
                    rewatches: None,
                }),
            }),
        }
    }

    #[test]
    fn test_newest_event_wins() {
        let events = vec![
            watch_event("a", 100, 1),
            watch_event("b", 200, 4),
            watch_event("a", 300, 3),
        ];

        let records = latest_watch_records(&events);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].slug, "a");
        assert_eq!(records[0].updated, 300);
        assert_eq!(records[0].episodes, Some(3));
        assert_eq!(records[1].slug, "b");
    }

    #[test]
    fn test_older_event_does_not_replace_newer() {
        let events = vec![watch_event("a", 300, 3), watch_event("a", 100, 1)];
        let records = latest_watch_records(&events);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].episodes, Some(3));
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let events = vec![watch_event("a", 100, 1), watch_event("a", 100, 2)];
        let records = latest_watch_records(&events);
        assert_eq!(records[0].episodes, Some(1));
    }

    #[test]
    fn test_non_watch_events_are_ignored() {
        let mut favourite = watch_event("c", 500, 0);
        favourite.history_type = "favourite_anime_add".to_string();
        let mut orphan = watch_event("d", 600, 0);
        orphan.content = None;

        let records = latest_watch_records(&[favourite, orphan, watch_event("a", 1, 1)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "a");
    }

    #[test]
    fn test_empty_history() {
        assert!(latest_watch_records(&[]).is_empty());
    }
}
