//! Reddit search endpoint client.
//!
//! The fetcher talks to the search endpoint through the [`SearchApi`] trait
//! so paging logic can be exercised against scripted pages in tests.
//! [`RedditSearchClient`] is the HTTP implementation.
//!
//! # Request shape
//!
//! ```text
//! GET {base_url}/r/{subreddit}/search.json?q=..&restrict_sr=on&sort=new&limit=100[&after=t3_..]
//! ```
//!
//! Failed requests are not retried; the caller decides what a failure means.

use crate::config::Settings;
use crate::models::{Listing, SearchPage};
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// One page of "search within subreddit, newest first".
pub trait SearchApi {
    /// Fetch the page of results for `query` in `subreddit` that follows
    /// the `after` cursor (the first page when `after` is `None`).
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses and undecodable bodies.
    async fn search_page(
        &self,
        subreddit: &str,
        query: &str,
        after: Option<&str>,
    ) -> Result<SearchPage, Box<dyn Error>>;
}

/// HTTP client for Reddit's public JSON search endpoint.
#[derive(Debug)]
pub struct RedditSearchClient {
    http: Client,
    base_url: Url,
    page_limit: u32,
}

impl RedditSearchClient {
    /// Build a client with the configured user agent, timeout and page size.
    ///
    /// # Arguments
    ///
    /// * `settings` - Supplies `user_agent`, `request_timeout_secs`,
    ///   `base_url` and `page_limit`
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client cannot be constructed.
    pub fn new(settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let http = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(&settings.base_url)?,
            page_limit: settings.page_limit,
        })
    }

    /// Absolute URL of one search page.
    pub fn search_url(&self, subreddit: &str, query: &str, after: Option<&str>) -> Result<Url, Box<dyn Error>> {
        let path = format!("r/{}/search.json", urlencoding::encode(subreddit));
        let mut url = self.base_url.join(&path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("restrict_sr", "on")
                .append_pair("sort", "new")
                .append_pair("limit", &self.page_limit.to_string());
            if let Some(after) = after {
                pairs.append_pair("after", after);
            }
        }
        Ok(url)
    }
}

impl SearchApi for RedditSearchClient {
    #[instrument(level = "debug", skip(self, query))]
    async fn search_page(
        &self,
        subreddit: &str,
        query: &str,
        after: Option<&str>,
    ) -> Result<SearchPage, Box<dyn Error>> {
        let url = self.search_url(subreddit, query, after)?;
        let t0 = Instant::now();
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let dt = t0.elapsed();

        let listing: Listing = serde_json::from_str(&body).inspect_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Search response is not a listing"
            )
        })?;
        let page = SearchPage::from(listing);
        debug!(
            elapsed_ms = dt.as_millis() as u64,
            posts = page.posts.len(),
            has_next = page.after.is_some(),
            "Fetched search page"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RedditSearchClient {
        RedditSearchClient::new(&Settings::default()).unwrap()
    }

    #[test]
    fn test_search_url_first_page() {
        let url = client().search_url("movies", r#"(barbie) (film OR "box office")"#, None).unwrap();
        assert_eq!(url.path(), "/r/movies/search.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), r#"(barbie) (film OR "box office")"#.to_string()),
                ("restrict_sr".to_string(), "on".to_string()),
                ("sort".to_string(), "new".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_carries_cursor() {
        let url = client().search_url("truefilm", "q", Some("t3_xyz")).unwrap();
        assert_eq!(url.host_str(), Some("www.reddit.com"));
        assert!(url.query_pairs().any(|(k, v)| k == "after" && v == "t3_xyz"));
    }

    #[test]
    fn test_custom_base_and_limit() {
        let settings = Settings {
            base_url: "http://127.0.0.1:8080".into(),
            page_limit: 25,
            ..Settings::default()
        };
        let client = RedditSearchClient::new(&settings).unwrap();
        let url = client.search_url("movies", "q", None).unwrap();
        assert_eq!(url.as_str().split('?').next(), Some("http://127.0.0.1:8080/r/movies/search.json"));
        assert!(url.query_pairs().any(|(k, v)| k == "limit" && v == "25"));
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = Settings {
            base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(RedditSearchClient::new(&settings).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let settings = Settings {
            base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 2,
            ..Settings::default()
        };
        let client = RedditSearchClient::new(&settings).unwrap();
        assert!(client.search_page("movies", "q", None).await.is_err());
    }
}
