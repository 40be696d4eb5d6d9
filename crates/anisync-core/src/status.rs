use anisync_models::{ListStatus, WatchStatus};

/// Map a Hikka watch status onto the AniList vocabulary
///
/// Unknown tokens pass through unchanged.
pub fn normalize_status(status: &WatchStatus) -> ListStatus {
    match status {
        WatchStatus::Completed => ListStatus::Completed,
        WatchStatus::Watching => ListStatus::Current,
        WatchStatus::OnHold => ListStatus::Paused,
        WatchStatus::Dropped => ListStatus::Dropped,
        WatchStatus::Planned => ListStatus::Planning,
        WatchStatus::Other(token) => ListStatus::from(token.as_str()),
    }
}

/// String form of [`normalize_status`]
pub fn normalize_token(token: &str) -> String {
    normalize_status(&WatchStatus::from(token)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_tokens() {
        assert_eq!(normalize_token("completed"), "COMPLETED");
        assert_eq!(normalize_token("watching"), "CURRENT");
        assert_eq!(normalize_token("on_hold"), "PAUSED");
        assert_eq!(normalize_token("dropped"), "DROPPED");
        assert_eq!(normalize_token("planned"), "PLANNING");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        assert_eq!(normalize_token("unknown_value"), "unknown_value");
        assert_eq!(normalize_token("Watching"), "Watching");
        assert_eq!(
            normalize_status(&WatchStatus::Other("unknown_value".to_string())),
            ListStatus::Other("unknown_value".to_string())
        );
    }
}
