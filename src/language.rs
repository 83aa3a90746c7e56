//! English-language check for post text.
//!
//! Statistical detection is only trusted on text of a minimum length. Shorter
//! text, and text the detector cannot classify, is judged by a cheap
//! character-class heuristic instead: more than 90% ASCII counts as English.

use std::error::Error;
use std::fmt;
use tracing::debug;

/// ISO 639-3 code reported for English.
pub const ENGLISH: &str = "eng";

/// Share of ASCII characters above which short text is treated as English.
const ASCII_THRESHOLD: f64 = 0.9;

/// The detector could not assign a language to the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undetermined;

impl fmt::Display for Undetermined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("language could not be determined")
    }
}

impl Error for Undetermined {}

/// Pluggable language classifier.
pub trait LanguageDetector {
    /// Classify `text`, returning an ISO 639-3 language code.
    fn classify(&self, text: &str) -> Result<String, Undetermined>;
}

/// Production detector backed by the `whatlang` trigram model.
///
/// Guesses `whatlang` itself flags as unreliable are reported as
/// [`Undetermined`]. Short titles routinely draw a low-confidence guess of
/// some other Latin-script language, and those must not count as a verdict.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn classify(&self, text: &str) -> Result<String, Undetermined> {
        let info = whatlang::detect(text).ok_or(Undetermined)?;
        if !info.is_reliable() {
            debug!(
                guess = info.lang().code(),
                confidence = info.confidence(),
                "Unreliable language guess"
            );
            return Err(Undetermined);
        }
        Ok(info.lang().code().to_string())
    }
}

/// Fraction of characters in `text` that are ASCII.
pub fn ascii_ratio(text: &str) -> f64 {
    let total = text.chars().count().max(1);
    let ascii = text.chars().filter(char::is_ascii).count();
    ascii as f64 / total as f64
}

/// Decide whether `text` is English.
///
/// Empty text is never English. Text of at least `min_len` characters goes
/// to `detector`; a definite answer is final, while [`Undetermined`] (no
/// guess, or an unreliable one) falls back to the ASCII heuristic, which
/// also decides for shorter text.
pub fn is_english<D: LanguageDetector + ?Sized>(detector: &D, text: &str, min_len: usize) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    if text.chars().count() >= min_len {
        match detector.classify(text) {
            Ok(lang) => return lang == ENGLISH,
            Err(e) => debug!(error = %e, "Language detection failed; using ASCII heuristic"),
        }
    }
    ascii_ratio(text) > ASCII_THRESHOLD
}
