//! Test doubles: a scripted search endpoint and scripted language detectors.

use crate::api::SearchApi;
use crate::language::{LanguageDetector, Undetermined};
use crate::models::{RawPost, SearchPage};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::error::Error;

/// Build a post with a permalink derived from its subreddit and id.
pub fn post(id: &str, subreddit: &str, created: i64, title: &str, body: &str) -> RawPost {
    RawPost {
        id: id.to_string(),
        subreddit: subreddit.to_string(),
        created_utc: Some(created as f64),
        title: Some(title.to_string()),
        selftext: Some(body.to_string()),
        permalink: Some(format!("/r/{subreddit}/comments/{id}/")),
    }
}

pub fn page(posts: Vec<RawPost>, after: Option<&str>) -> SearchPage {
    SearchPage {
        posts,
        after: after.map(str::to_string),
    }
}

type ScriptedPage = Result<SearchPage, String>;

/// Serves queued pages per subreddit; an exhausted or unknown subreddit
/// answers with an empty page.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    pages: RefCell<HashMap<String, VecDeque<ScriptedPage>>>,
    calls: RefCell<Vec<(String, String, Option<String>)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(self, subreddit: &str, pages: Vec<ScriptedPage>) -> Self {
        self.pages
            .borrow_mut()
            .entry(subreddit.to_string())
            .or_default()
            .extend(pages);
        self
    }

    /// Cursors requested for `subreddit`, in call order.
    pub fn cursors(&self, subreddit: &str) -> Vec<Option<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(sr, _, _)| sr == subreddit)
            .map(|(_, _, after)| after.clone())
            .collect()
    }

    /// Every (subreddit, query) pair requested, in call order.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.calls
            .borrow()
            .iter()
            .map(|(sr, q, _)| (sr.clone(), q.clone()))
            .collect()
    }
}

impl SearchApi for ScriptedApi {
    async fn search_page(
        &self,
        subreddit: &str,
        query: &str,
        after: Option<&str>,
    ) -> Result<SearchPage, Box<dyn Error>> {
        self.calls.borrow_mut().push((
            subreddit.to_string(),
            query.to_string(),
            after.map(str::to_string),
        ));
        let next = self
            .pages
            .borrow_mut()
            .get_mut(subreddit)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(page)) => Ok(page),
            Some(Err(e)) => Err(e.into()),
            None => Ok(SearchPage::default()),
        }
    }
}

#[derive(Debug, Clone)]
enum Script {
    Answer(String),
    Fail,
    Panic,
}

/// Language detector with a fixed behaviour.
#[derive(Debug, Clone)]
pub struct ScriptedDetector(Script);

impl ScriptedDetector {
    /// Always reports `lang`.
    pub fn answering(lang: &str) -> Self {
        Self(Script::Answer(lang.to_string()))
    }

    /// Always fails to classify.
    pub fn failing() -> Self {
        Self(Script::Fail)
    }

    /// Panics if consulted; for paths that must not reach the detector.
    pub fn panicking() -> Self {
        Self(Script::Panic)
    }
}

impl LanguageDetector for ScriptedDetector {
    fn classify(&self, text: &str) -> Result<String, Undetermined> {
        match &self.0 {
            Script::Answer(lang) => Ok(lang.clone()),
            Script::Fail => Err(Undetermined),
            Script::Panic => panic!("language detector consulted for {text:?}"),
        }
    }
}
