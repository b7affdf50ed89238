use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the hosted data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Anonymous access key, sent both as `apikey` and as bearer token.
    pub anon_key: String,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            ..Default::default()
        }
    }

    /// True when both a parseable URL and a key are set.
    pub fn is_configured(&self) -> bool {
        !self.anon_key.trim().is_empty() && Url::parse(self.url.trim()).is_ok()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `{url}/rest/v1/{table}`.
    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim().trim_end_matches('/'), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_or_key_is_not_configured() {
        assert!(!StoreConfig::default().is_configured());
        assert!(!StoreConfig::new("", "key").is_configured());
        assert!(!StoreConfig::new("not a url", "key").is_configured());
        assert!(StoreConfig::new("https://abcd.supabase.co", "eyJhbGci").is_configured());
    }

    #[test]
    fn table_url_strips_trailing_slash() {
        let cfg = StoreConfig::new("https://abcd.supabase.co/", "k");
        assert_eq!(
            cfg.table_url("airdrops"),
            "https://abcd.supabase.co/rest/v1/airdrops"
        );
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: StoreConfig =
            serde_json::from_str(r#"{"url":"https://abcd.supabase.co","anon_key":"k"}"#).unwrap();
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.is_configured());
    }
}
