//! Paginated retrieval of search results for one (subreddit, query) pair.
//!
//! Paging is a small state machine:
//!
//! ```text
//!            page ok, guards pass
//!   Paging ───────────────────────▶ Paging (next cursor)
//!     │  page ok, a guard fires
//!     ├───────────────────────────▶ Done(StopReason)
//!     │  request failed
//!     └───────────────────────────▶ Failed(error)
//! ```
//!
//! Guards are checked after every page, in order: empty page, missing
//! cursor, then "the oldest post on this page predates the topic start".
//! Posts accumulated before a failure are kept.

use crate::api::SearchApi;
use crate::models::{RawPost, SearchPage};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Why paging finished normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page came back without records.
    EmptyPage,
    /// The response carried no next-page cursor.
    NoCursor,
    /// The page reached back past the topic start.
    CrossedStart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingState {
    Paging { cursor: Option<String> },
    Done(StopReason),
    Failed(String),
}

impl PagingState {
    pub fn start() -> Self {
        PagingState::Paging { cursor: None }
    }

    #[cfg(test)]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PagingState::Paging { .. })
    }
}

pub fn page_is_empty(page: &SearchPage) -> bool {
    page.posts.is_empty()
}

pub fn lacks_cursor(page: &SearchPage) -> bool {
    page.after.is_none()
}

pub fn crossed_start(page: &SearchPage, start_time: i64) -> bool {
    page.oldest_created().is_some_and(|oldest| oldest < start_time)
}

/// Transition after a successfully decoded page.
pub fn after_page(page: &SearchPage, start_time: i64) -> PagingState {
    if page_is_empty(page) {
        PagingState::Done(StopReason::EmptyPage)
    } else if lacks_cursor(page) {
        PagingState::Done(StopReason::NoCursor)
    } else if crossed_start(page, start_time) {
        PagingState::Done(StopReason::CrossedStart)
    } else {
        PagingState::Paging {
            cursor: page.after.clone(),
        }
    }
}

/// Everything gathered for one (subreddit, query) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub posts: Vec<RawPost>,
    pub pages: usize,
    /// Terminal state, `Done` or `Failed`.
    pub state: PagingState,
}

/// Page through `subreddit` search results for `query`, newest first, until
/// the listing runs out or reaches back past `start_time`.
///
/// # Arguments
///
/// * `api` - Search endpoint to page through
/// * `subreddit` - Subreddit the search is restricted to
/// * `query` - Topic search query, passed through verbatim
/// * `start_time` - Topic start in epoch seconds; paging stops on the first
///   page whose oldest post predates it
/// * `delay` - Pause between consecutive page requests
///
/// # Returns
///
/// Every post from every page received, in page order, including the page
/// that crossed `start_time`. A failed request ends paging in
/// [`PagingState::Failed`] without discarding posts already gathered, so
/// this function never returns an error.
#[instrument(level = "info", skip(api, query, delay))]
pub async fn fetch_posts<A: SearchApi>(
    api: &A,
    subreddit: &str,
    query: &str,
    start_time: i64,
    delay: Duration,
) -> FetchResult {
    let mut posts = Vec::new();
    let mut pages = 0usize;
    let mut state = PagingState::start();

    while let PagingState::Paging { cursor } = &state {
        let cursor = cursor.clone();
        if pages > 0 && !delay.is_zero() {
            sleep(delay).await;
        }
        let response = api.search_page(subreddit, query, cursor.as_deref()).await;
        state = match response {
            Ok(page) => {
                pages += 1;
                let next = after_page(&page, start_time);
                debug!(page = pages, records = page.posts.len(), next = ?next, "Search page received");
                posts.extend(page.posts);
                next
            }
            Err(e) => {
                warn!(page = pages + 1, error = %e, "Search page failed; keeping what was fetched");
                PagingState::Failed(e.to_string())
            }
        };
    }

    info!(pages, count = posts.len(), state = ?state, "Finished paging");
    FetchResult { posts, pages, state }
}
