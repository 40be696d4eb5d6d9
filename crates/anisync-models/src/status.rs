use serde::{Deserialize, Serialize};
use std::fmt;

/// Watch status as reported by Hikka history events
///
/// Tokens outside the known vocabulary are kept verbatim in `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum WatchStatus {
    Completed,
    Watching,
    OnHold,
    Dropped,
    Planned,
    Other(String),
}

impl WatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WatchStatus::Completed => "completed",
            WatchStatus::Watching => "watching",
            WatchStatus::OnHold => "on_hold",
            WatchStatus::Dropped => "dropped",
            WatchStatus::Planned => "planned",
            WatchStatus::Other(token) => token,
        }
    }
}

impl From<String> for WatchStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            "completed" => WatchStatus::Completed,
            "watching" => WatchStatus::Watching,
            "on_hold" => WatchStatus::OnHold,
            "dropped" => WatchStatus::Dropped,
            "planned" => WatchStatus::Planned,
            _ => WatchStatus::Other(token),
        }
    }
}

impl From<&str> for WatchStatus {
    fn from(token: &str) -> Self {
        WatchStatus::from(token.to_string())
    }
}

impl From<WatchStatus> for String {
    fn from(status: WatchStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AniList `MediaListStatus`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ListStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
    Other(String),
}

impl ListStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ListStatus::Current => "CURRENT",
            ListStatus::Planning => "PLANNING",
            ListStatus::Completed => "COMPLETED",
            ListStatus::Dropped => "DROPPED",
            ListStatus::Paused => "PAUSED",
            ListStatus::Repeating => "REPEATING",
            ListStatus::Other(token) => token,
        }
    }
}

impl From<String> for ListStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            "CURRENT" => ListStatus::Current,
            "PLANNING" => ListStatus::Planning,
            "COMPLETED" => ListStatus::Completed,
            "DROPPED" => ListStatus::Dropped,
            "PAUSED" => ListStatus::Paused,
            "REPEATING" => ListStatus::Repeating,
            _ => ListStatus::Other(token),
        }
    }
}

impl From<&str> for ListStatus {
    fn from(token: &str) -> Self {
        ListStatus::from(token.to_string())
    }
}

impl From<ListStatus> for String {
    fn from(status: ListStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_status_parses_known_tokens() {
        assert_eq!(WatchStatus::from("on_hold"), WatchStatus::OnHold);
        assert_eq!(WatchStatus::from("planned"), WatchStatus::Planned);
    }

    #[test]
    fn test_unknown_tokens_are_preserved() {
        let status = WatchStatus::from("rewatching");
        assert_eq!(status, WatchStatus::Other("rewatching".to_string()));
        assert_eq!(status.to_string(), "rewatching");

        // Case-sensitive: upper-case Hikka tokens are not recognized
        assert_eq!(WatchStatus::from("Completed"), WatchStatus::Other("Completed".to_string()));
    }

    #[test]
    fn test_list_status_serde_uses_anilist_tokens() {
        let json = serde_json::to_string(&ListStatus::Paused).unwrap();
        assert_eq!(json, "\"PAUSED\"");

        let parsed: ListStatus = serde_json::from_str("\"REPEATING\"").unwrap();
        assert_eq!(parsed, ListStatus::Repeating);
    }
}
