//! Topic registry: the fixed set of movies the collector tracks.
//!
//! Each topic carries the Reddit search query used to find candidate posts,
//! the time window posts must fall into, the tokens that make a title
//! relevant, and an optional negative pattern that excludes look-alike
//! discussion (toy lines, birthday parties, ...).
//!
//! Topics are declared as plain [`TopicConfig`] values (deserialized from the
//! settings file or taken from [`default_topics`]) and compiled into
//! [`Topic`]s once at startup. The resulting [`TopicRegistry`] is passed
//! explicitly through the pipeline.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, instrument};

/// 2023-06-30T00:00:00Z, the start of the summer 2023 release window.
const SUMMER_2023_START_UTC: i64 = 1_688_083_200;

/// Declarative form of a topic, as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopicConfig {
    /// Registry key, written to the `movie` column of the dataset.
    pub key: String,
    /// Reddit search query.
    pub query: String,
    /// Posts created before this epoch second are dropped.
    pub start_utc: i64,
    /// Posts created after this epoch second are dropped; `None` is open-ended.
    #[serde(default)]
    pub end_utc: Option<i64>,
    /// Case-insensitive substrings that mark a title as on-topic.
    pub title_tokens: Vec<String>,
    /// Regex matched against the lowercased title to exclude off-topic posts.
    #[serde(default)]
    pub negative_title_regex: Option<String>,
}

/// A compiled, immutable topic definition.
#[derive(Debug, Clone)]
pub struct Topic {
    pub key: String,
    pub query: String,
    pub start_time: i64,
    pub end_time: Option<i64>,
    /// Lowercased copies of the configured title tokens.
    pub title_tokens: Vec<String>,
    pub negative_pattern: Option<Regex>,
}

impl Topic {
    /// Whether any title token occurs in `lowered` (already lowercased text).
    pub fn mentioned_in(&self, lowered: &str) -> bool {
        self.title_tokens.iter().any(|tok| lowered.contains(tok.as_str()))
    }

    /// Whether `created_utc` lies inside this topic's window.
    pub fn within_window(&self, created_utc: i64) -> bool {
        if created_utc < self.start_time {
            return false;
        }
        match self.end_time {
            Some(end) => created_utc <= end,
            None => true,
        }
    }
}

impl TryFrom<&TopicConfig> for Topic {
    type Error = Box<dyn Error>;

    fn try_from(cfg: &TopicConfig) -> Result<Self, Self::Error> {
        if cfg.key.trim().is_empty() {
            return Err("topic key must not be empty".into());
        }
        let title_tokens: Vec<String> = cfg
            .title_tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if title_tokens.is_empty() {
            return Err(format!("topic `{}` has no title tokens", cfg.key).into());
        }
        if let Some(end) = cfg.end_utc {
            if end < cfg.start_utc {
                return Err(format!("topic `{}` ends before it starts", cfg.key).into());
            }
        }
        let negative_pattern = match cfg.negative_title_regex.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(Regex::new(pattern).map_err(|e| {
                format!("topic `{}` has an invalid negative_title_regex: {e}", cfg.key)
            })?),
            _ => None,
        };

        Ok(Topic {
            key: cfg.key.clone(),
            query: cfg.query.clone(),
            start_time: cfg.start_utc,
            end_time: cfg.end_utc,
            title_tokens,
            negative_pattern,
        })
    }
}

/// Ordered collection of compiled topics, keyed by [`Topic::key`].
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl TopicRegistry {
    /// Compile a list of topic declarations, preserving their order.
    ///
    /// # Errors
    ///
    /// Fails on duplicate keys, empty token lists, inverted windows or a
    /// negative pattern that does not compile.
    #[instrument(level = "debug", skip_all, fields(count = configs.len()))]
    pub fn from_configs(configs: &[TopicConfig]) -> Result<Self, Box<dyn Error>> {
        let mut seen = HashSet::new();
        let mut topics = Vec::with_capacity(configs.len());
        for cfg in configs {
            if !seen.insert(cfg.key.as_str()) {
                return Err(format!("duplicate topic key `{}`", cfg.key).into());
            }
            let topic = Topic::try_from(cfg)?;
            debug!(topic = %topic.key, tokens = ?topic.title_tokens, "Registered topic");
            topics.push(topic);
        }
        Ok(Self { topics })
    }

    pub fn get(&self, key: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

fn movie_query(title_clause: &str) -> String {
    format!(r#"{title_clause} (film OR movie OR trailer OR review OR "box office")"#)
}

fn topic(key: &str, title_clause: &str, tokens: &[&str], negative: Option<&str>) -> TopicConfig {
    TopicConfig {
        key: key.to_string(),
        query: movie_query(title_clause),
        start_utc: SUMMER_2023_START_UTC,
        end_utc: None,
        title_tokens: tokens.iter().map(|t| t.to_string()).collect(),
        negative_title_regex: negative.map(str::to_string),
    }
}

/// The built-in registry: the five tentpole releases of summer 2023.
pub fn default_topics() -> Vec<TopicConfig> {
    vec![
        topic("oppenheimer", "(oppenheimer)", &["oppenheimer"], None),
        topic(
            "barbie",
            "(barbie)",
            &["barbie"],
            Some(r"\b(doll|toy|birthday|ken doll|barbiecore)\b"),
        ),
        topic(
            "mi7",
            r#"("mission impossible" OR "dead reckoning" OR "mi7")"#,
            &["mission impossible", "dead reckoning", "mi7"],
            None,
        ),
        topic(
            "sound_of_freedom",
            r#"("sound of freedom")"#,
            &["sound of freedom"],
            None,
        ),
        topic(
            "indiana_jones",
            r#"("dial of destiny" OR "indiana jones")"#,
            &["dial of destiny", "indiana jones"],
            None,
        ),
    ]
}
