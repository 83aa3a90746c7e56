//! Data models for Reddit search results and the rows written to the dataset.
//!
//! - [`RawPost`]: one post as returned by the search endpoint
//! - [`Listing`]: the wire envelope around a page of search results
//! - [`SearchPage`]: a decoded page, the unit the fetcher works with
//! - [`Row`]: a kept, normalized post tagged with its movie

use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A post exactly as the search endpoint returned it.
///
/// Every field is optional on the wire; missing or `null` values decode to
/// their defaults so a single odd record never fails a whole page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawPost {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subreddit: String,
    /// Creation time in epoch seconds. Reddit sends this as a float.
    pub created_utc: Option<f64>,
    pub title: Option<String>,
    pub selftext: Option<String>,
    pub permalink: Option<String>,
}

impl RawPost {
    /// Creation time truncated to whole seconds, `0` when absent.
    pub fn created(&self) -> i64 {
        self.created_utc.map(|t| t as i64).unwrap_or(0)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("").trim()
    }

    pub fn body(&self) -> &str {
        self.selftext.as_deref().unwrap_or("").trim()
    }
}

/// Envelope of a Reddit listing response: `{"kind": "Listing", "data": {...}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingData {
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<ListingChild>,
    pub after: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingChild {
    pub data: Option<RawPost>,
}

/// One decoded page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub posts: Vec<RawPost>,
    /// Cursor for the next page; `None` once the listing is exhausted.
    pub after: Option<String>,
}

impl SearchPage {
    /// Oldest creation time on the page.
    pub fn oldest_created(&self) -> Option<i64> {
        self.posts.iter().map(RawPost::created).min()
    }
}

impl From<Listing> for SearchPage {
    fn from(listing: Listing) -> Self {
        let posts = listing
            .data
            .children
            .into_iter()
            .filter_map(|child| child.data)
            .collect();
        let after = listing.data.after.filter(|cursor| !cursor.is_empty());
        SearchPage { posts, after }
    }
}

/// A kept post, normalized for the output dataset.
///
/// Field order matches the dataset's column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub movie: String,
    pub subreddit: String,
    pub id: String,
    pub created_utc: i64,
    pub title: String,
    pub text: String,
    pub permalink: String,
    pub url: String,
}

impl Row {
    /// Dataset column names, in order.
    pub const COLUMNS: [&'static str; 8] = [
        "movie",
        "subreddit",
        "id",
        "created_utc",
        "title",
        "text",
        "permalink",
        "url",
    ];

    /// Build a row for `movie` from a kept post.
    ///
    /// `web_base` is prefixed to the permalink to form `url`; a post without
    /// a permalink gets an empty `url`.
    pub fn from_post(movie: &str, post: &RawPost, web_base: &str) -> Self {
        let permalink = post.permalink.clone().unwrap_or_default();
        let url = if permalink.is_empty() {
            String::new()
        } else {
            format!("{}{}", web_base.trim_end_matches('/'), permalink)
        };
        Row {
            movie: movie.to_string(),
            subreddit: post.subreddit.clone(),
            id: post.id.clone(),
            created_utc: post.created(),
            title: post.title().to_string(),
            text: post.body().to_string(),
            permalink,
            url,
        }
    }

    /// Field values in column order.
    pub fn fields(&self) -> [String; 8] {
        [
            self.movie.clone(),
            self.subreddit.clone(),
            self.id.clone(),
            self.created_utc.to_string(),
            self.title.clone(),
            self.text.clone(),
            self.permalink.clone(),
            self.url.clone(),
        ]
    }
}
