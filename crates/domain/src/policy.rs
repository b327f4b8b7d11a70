//! Derived-content policies applied at render time

use regex::Regex;
use std::sync::LazyLock;

/// Average reading speed used for estimates
pub const WORDS_PER_MINUTE: usize = 200;

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Strip HTML tags, leaving the text content
pub fn strip_markup(html: &str) -> String {
    MARKUP.replace_all(html, " ").into_owned()
}

/// Count whitespace-separated words in an HTML body
pub fn word_count(html: &str) -> usize {
    strip_markup(html).split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounded up.
///
/// An empty body yields 0; templates show that as "< 1 min read".
pub fn reading_time_minutes(html: &str) -> u32 {
    word_count(html).div_ceil(WORDS_PER_MINUTE) as u32
}

/// Reader-facing label for a reading time estimate
pub fn reading_time_label(minutes: u32) -> String {
    if minutes == 0 {
        "< 1 min read".to_string()
    } else {
        format!("{} min read", minutes)
    }
}
