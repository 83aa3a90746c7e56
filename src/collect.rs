//! Run orchestration: every topic, every subreddit, strictly in sequence.
//!
//! For each topic the configured subreddits are paged one after another
//! (with the configured delay between them), the combined posts go through
//! [`build_rows`], and after the last topic the rows are merged into the
//! final [`Dataset`].

use crate::aggregate::{build_rows, merge, Dataset};
use crate::api::SearchApi;
use crate::config::Settings;
use crate::fetcher::fetch_posts;
use crate::filter::RelevanceFilter;
use crate::language::LanguageDetector;
use crate::models::RawPost;
use crate::registry::{Topic, TopicRegistry};
use crate::utils::epoch_to_rfc3339;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Result of a collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Collected(Dataset),
    /// No post survived filtering for any topic.
    NothingCollected,
}

/// Gather the raw posts for one topic from every subreddit, in order.
#[instrument(level = "info", skip_all, fields(topic = %topic.key))]
async fn collect_topic<A: SearchApi>(api: &A, topic: &Topic, settings: &Settings) -> Vec<RawPost> {
    let delay = settings.request_delay();
    let mut posts = Vec::new();
    for subreddit in &settings.subreddits {
        let result = fetch_posts(api, subreddit, &topic.query, topic.start_time, delay).await;
        info!(
            subreddit = %subreddit,
            pages = result.pages,
            fetched = result.posts.len(),
            state = ?result.state,
            "Subreddit done"
        );
        posts.extend(result.posts);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
    posts
}

/// Collect, filter and merge posts for every topic in `registry`.
#[instrument(level = "info", skip_all, fields(topics = registry.len(), subreddits = settings.subreddits.len()))]
pub async fn run<A, D>(api: &A, detector: &D, settings: &Settings, registry: &TopicRegistry) -> RunOutcome
where
    A: SearchApi,
    D: LanguageDetector + ?Sized,
{
    let filter = RelevanceFilter::new(detector, settings.min_text_len, &settings.base_url);
    let mut rows = Vec::new();

    for topic in registry.iter() {
        info!(
            topic = %topic.key,
            since = %epoch_to_rfc3339(topic.start_time),
            "Collecting: {}",
            topic.key
        );
        let posts = collect_topic(api, topic, settings).await;
        rows.extend(build_rows(topic, posts, &filter));
    }

    let dataset = merge(rows);
    if dataset.is_empty() {
        warn!("No rows collected.");
        return RunOutcome::NothingCollected;
    }
    info!(rows = dataset.len(), "Dataset assembled");
    RunOutcome::Collected(dataset)
}
