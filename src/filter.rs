//! Per-post relevance filter.
//!
//! A post is kept for a topic only if it survives, in order:
//!
//! 1. the topic's time window,
//! 2. topical relevance (token in the title, or token in the body backed by a
//!    film cue in the title),
//! 3. the topic's negative title pattern, which a film cue overrides,
//! 4. the English-language check.
//!
//! The first failing step decides the [`Rejection`].

use crate::language::{is_english, LanguageDetector};
use crate::models::{RawPost, Row};
use crate::registry::Topic;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Whole-word vocabulary that signals film discussion.
static FILM_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(film|movie|trailer|review|box\s*office|director|cast|cinema|screening|premiere)\b")
        .expect("film cue pattern is valid")
});

/// Whether `lowered` (already lowercased) contains a film cue.
pub fn has_film_cue(lowered: &str) -> bool {
    FILM_CUE.is_match(lowered)
}

/// Why a post was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BeforeStart,
    AfterEnd,
    NotRelevant,
    NegativeKeyword,
    NotEnglish,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::BeforeStart => "before_start",
            Rejection::AfterEnd => "after_end",
            Rejection::NotRelevant => "not_relevant",
            Rejection::NegativeKeyword => "negative_keyword",
            Rejection::NotEnglish => "not_english",
        };
        f.write_str(s)
    }
}

/// Outcome of [`RelevanceFilter::decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Keep(Row),
    Reject(Rejection),
}

impl Decision {
    #[cfg(test)]
    pub fn into_row(self) -> Option<Row> {
        match self {
            Decision::Keep(row) => Some(row),
            Decision::Reject(_) => None,
        }
    }
}

/// Stateless keep/drop decision for a post against a topic.
#[derive(Debug)]
pub struct RelevanceFilter<'a, D: ?Sized> {
    detector: &'a D,
    min_text_len: usize,
    web_base: &'a str,
}

impl<'a, D> RelevanceFilter<'a, D>
where
    D: LanguageDetector + ?Sized,
{
    /// * `min_text_len` - shortest text handed to the language detector
    /// * `web_base` - origin prefixed to permalinks to build row URLs
    pub fn new(detector: &'a D, min_text_len: usize, web_base: &'a str) -> Self {
        Self {
            detector,
            min_text_len,
            web_base,
        }
    }

    pub fn decide(&self, post: &RawPost, topic: &Topic) -> Decision {
        let created = post.created();
        if created < topic.start_time {
            return Decision::Reject(Rejection::BeforeStart);
        }
        if !topic.within_window(created) {
            return Decision::Reject(Rejection::AfterEnd);
        }

        let title = post.title();
        let body = post.body();
        let title_lower = title.to_lowercase();
        let film_cue = has_film_cue(&title_lower);

        if !topic.mentioned_in(&title_lower) && !(film_cue && topic.mentioned_in(&body.to_lowercase())) {
            return Decision::Reject(Rejection::NotRelevant);
        }

        if let Some(negative) = &topic.negative_pattern {
            if negative.is_match(&title_lower) && !film_cue {
                return Decision::Reject(Rejection::NegativeKeyword);
            }
        }

        if !is_english(self.detector, &self.language_text(title, body), self.min_text_len) {
            return Decision::Reject(Rejection::NotEnglish);
        }

        Decision::Keep(Row::from_post(&topic.key, post, self.web_base))
    }

    /// Title alone when the body is too short to help detection, else both.
    fn language_text(&self, title: &str, body: &str) -> String {
        if body.chars().count() < self.min_text_len {
            title.to_string()
        } else {
            format!("{title} {body}").trim().to_string()
        }
    }
}
