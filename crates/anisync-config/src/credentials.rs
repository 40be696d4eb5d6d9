use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// AniList implicit-grant tokens are issued for one year
const ANILIST_TOKEN_LIFETIME_DAYS: i64 = 365;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_anilist_token(&self) -> Option<&String> {
        self.get("anilist_token").filter(|t| !t.is_empty())
    }

    /// Store a new token and remember when it was issued
    pub fn set_anilist_token(&mut self, token: String) {
        self.set("anilist_token".to_string(), token);
        self.set("anilist_token_saved_at".to_string(), Utc::now().to_rfc3339());
    }

    pub fn get_anilist_token_saved_at(&self) -> Option<DateTime<Utc>> {
        self.get("anilist_token_saved_at")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn get_anilist_token_expires(&self) -> Option<DateTime<Utc>> {
        self.get_anilist_token_saved_at()
            .map(|saved| saved + Duration::days(ANILIST_TOKEN_LIFETIME_DAYS))
    }

    pub fn is_anilist_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.get_anilist_token_expires()
            .map(|expires| expires <= now)
            .unwrap_or(false)
    }
}

/// Mask all but the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(8), visible)
}
