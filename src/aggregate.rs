//! Deduplication and assembly of the final dataset.
//!
//! Within a topic, posts gathered from every subreddit are deduplicated by
//! id before filtering. Across topics, rows are deduplicated on
//! `(movie, id)` and stably sorted by movie ascending, then newest first.
//! Ties keep their concatenation order, so identical inputs always produce
//! an identical [`Dataset`].

use crate::filter::{Decision, RelevanceFilter};
use crate::language::LanguageDetector;
use crate::models::{RawPost, Row};
use crate::registry::Topic;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// The ordered, deduplicated output of a run. Only [`merge`] builds one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Drop posts without an id and collapse repeated ids.
///
/// A repeated id keeps the position of its first sighting and the content
/// of its last.
pub fn dedupe_by_id(posts: Vec<RawPost>) -> Vec<RawPost> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<RawPost> = Vec::with_capacity(posts.len());
    for post in posts.into_iter().filter(|p| !p.id.is_empty()) {
        match index.get(&post.id) {
            Some(&slot) => unique[slot] = post,
            None => {
                index.insert(post.id.clone(), unique.len());
                unique.push(post);
            }
        }
    }
    unique
}

/// Run each unique post through the filter once and collect the kept rows.
#[instrument(level = "info", skip_all, fields(topic = %topic.key))]
pub fn build_rows<D>(topic: &Topic, posts: Vec<RawPost>, filter: &RelevanceFilter<'_, D>) -> Vec<Row>
where
    D: LanguageDetector + ?Sized,
{
    let unique = dedupe_by_id(posts);
    let candidates = unique.len();
    let mut rejected: HashMap<String, usize> = HashMap::new();
    let mut rows = Vec::new();
    for post in &unique {
        match filter.decide(post, topic) {
            Decision::Keep(row) => rows.push(row),
            Decision::Reject(reason) => *rejected.entry(reason.to_string()).or_default() += 1,
        }
    }
    debug!(rejected = ?rejected, "Rejections by reason");
    info!(candidates, kept = rows.len(), "[{}] kept {} posts", topic.key, rows.len());
    rows
}

/// Assemble the final dataset from per-topic rows.
pub fn merge(rows: Vec<Row>) -> Dataset {
    let mut rows: Vec<Row> = rows
        .into_iter()
        .unique_by(|row| (row.movie.clone(), row.id.clone()))
        .collect();
    rows.sort_by_key(|row| (row.movie.clone(), Reverse(row.created_utc)));
    Dataset { rows }
}
