//! Static collector settings.
//!
//! Settings are read once at startup from an optional YAML file. Every field
//! may be omitted; missing fields fall back to [`Settings::default`], which
//! reproduces the stock registry and request policy.
//!
//! ```yaml
//! subreddits: [movies, flicks, truefilm]
//! request_delay_ms: 800
//! min_text_len: 15
//! topics:
//!   - key: barbie
//!     query: '(barbie) (film OR movie)'
//!     start_utc: 1688083200
//!     title_tokens: [barbie]
//!     negative_title_regex: '\b(doll|toy)\b'
//! ```

use crate::registry::{default_topics, TopicConfig, TopicRegistry};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Subreddits searched for every topic, in order.
    pub subreddits: Vec<String>,
    /// Pause between page requests and between subreddits.
    pub request_delay_ms: u64,
    /// Texts shorter than this (in characters) skip statistical language detection.
    pub min_text_len: usize,
    /// Records requested per search page.
    pub page_limit: u32,
    /// Per-request timeout; a timeout ends the current subreddit's paging.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Origin used both for the search endpoint and as the permalink prefix.
    pub base_url: String,
    pub topics: Vec<TopicConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subreddits: vec!["movies".into(), "flicks".into(), "truefilm".into()],
            request_delay_ms: 800,
            min_text_len: 15,
            page_limit: 100,
            request_timeout_secs: 15,
            user_agent: "RedditMovieProject/1.0".into(),
            base_url: "https://www.reddit.com".into(),
            topics: default_topics(),
        }
    }
}

impl Settings {
    /// Parse settings from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        if settings.subreddits.is_empty() {
            return Err("settings must name at least one subreddit".into());
        }
        Ok(settings)
    }

    /// Load settings from `path`, or the built-in defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let yaml = fs::read_to_string(path).await?;
                let settings = Self::from_yaml_str(&yaml)?;
                info!(
                    path,
                    topics = settings.topics.len(),
                    subreddits = settings.subreddits.len(),
                    "Loaded settings file"
                );
                Ok(settings)
            }
            None => {
                info!("No settings file given; using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Compile the configured topics.
    pub fn registry(&self) -> Result<TopicRegistry, Box<dyn Error>> {
        TopicRegistry::from_configs(&self.topics)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.subreddits, vec!["movies", "flicks", "truefilm"]);
        assert_eq!(settings.request_delay(), Duration::from_millis(800));
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.min_text_len, 15);
        assert_eq!(settings.registry().unwrap().len(), 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml_str("request_delay_ms: 0\nsubreddits: [movies]\n").unwrap();
        assert_eq!(settings.request_delay(), Duration::ZERO);
        assert_eq!(settings.subreddits, vec!["movies"]);
        assert_eq!(settings.page_limit, 100);
        assert_eq!(settings.topics, default_topics());
    }

    #[test]
    fn test_yaml_topics() {
        let yaml = r#"
topics:
  - key: barbie
    query: '(barbie) (film OR movie)'
    start_utc: 1688083200
    end_utc: 1700000000
    title_tokens: [Barbie]
    negative_title_regex: '\b(doll|toy)\b'
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        let registry = settings.registry().unwrap();
        assert_eq!(registry.len(), 1);
        let barbie = registry.get("barbie").unwrap();
        assert_eq!(barbie.end_time, Some(1_700_000_000));
        assert_eq!(barbie.title_tokens, vec!["barbie".to_string()]);
        assert!(barbie.negative_pattern.is_some());
    }

    #[test]
    fn test_example_file_matches_defaults() {
        let settings = Settings::from_yaml_str(include_str!("../collector.example.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_rejects_empty_subreddits() {
        assert!(Settings::from_yaml_str("subreddits: []\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(Settings::from_yaml_str("request_delay_ms: [nope").is_err());
    }

    #[tokio::test]
    async fn test_load_without_path() {
        let settings = Settings::load(None).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.yaml");
        std::fs::write(&path, "min_text_len: 20\n").unwrap();
        let settings = Settings::load(path.to_str()).await.unwrap();
        assert_eq!(settings.min_text_len, 20);
    }
}
