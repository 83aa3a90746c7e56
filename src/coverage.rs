//! Coverage statistics derived from the final dataset.
//!
//! Two tables are produced, both recomputed from scratch on every run:
//!
//! - per movie: row count, whole days since the topic start (at least 1),
//!   and posts per day over that span;
//! - per (movie, subreddit): row count.
//!
//! Rows are ordered by key, so the summary is stable for a given dataset.

use crate::aggregate::Dataset;
use crate::registry::TopicRegistry;
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::{instrument, warn};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCoverage {
    pub movie: String,
    pub count: usize,
    pub days_since_start: i64,
    pub posts_per_day_since_start: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubredditCoverage {
    pub movie: String,
    pub subreddit: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageSummary {
    pub by_movie: Vec<MovieCoverage>,
    pub by_movie_and_subreddit: Vec<SubredditCoverage>,
}

/// Whole days elapsed since `start_time`, never less than one.
pub fn days_since(start_time: i64, now: i64) -> i64 {
    (now - start_time).div_euclid(SECONDS_PER_DAY).max(1)
}

/// Summarize `dataset` as of `now`.
///
/// # Arguments
///
/// * `dataset` - The merged, deduplicated rows of a run
/// * `registry` - Topics supplying each movie's start time
/// * `now` - Current time in epoch seconds
///
/// # Returns
///
/// Both coverage tables, ordered by movie and then subreddit. Movies missing
/// from `registry` have no start time; they are left out of the rate table
/// but still counted per subreddit.
#[instrument(level = "info", skip_all, fields(rows = dataset.len(), now = now))]
pub fn summarize(dataset: &Dataset, registry: &TopicRegistry, now: i64) -> CoverageSummary {
    let per_movie: BTreeMap<&str, usize> = dataset
        .rows()
        .iter()
        .map(|r| r.movie.as_str())
        .counts()
        .into_iter()
        .collect();

    let by_movie = per_movie
        .into_iter()
        .filter_map(|(movie, count)| {
            let Some(topic) = registry.get(movie) else {
                warn!(movie, "Dataset movie is not in the registry; skipping its rate");
                return None;
            };
            let days = days_since(topic.start_time, now);
            Some(MovieCoverage {
                movie: movie.to_string(),
                count,
                days_since_start: days,
                posts_per_day_since_start: count as f64 / days as f64,
            })
        })
        .collect();

    let per_subreddit: BTreeMap<(&str, &str), usize> = dataset
        .rows()
        .iter()
        .map(|r| (r.movie.as_str(), r.subreddit.as_str()))
        .counts()
        .into_iter()
        .collect();

    let by_movie_and_subreddit = per_subreddit
        .into_iter()
        .map(|((movie, subreddit), count)| SubredditCoverage {
            movie: movie.to_string(),
            subreddit: subreddit.to_string(),
            count,
        })
        .collect();

    CoverageSummary {
        by_movie,
        by_movie_and_subreddit,
    }
}
