//! Stress signals from free text.
//!
//! [`analyze`] is a keyword heuristic producing a [`TextStressSignal`] that is
//! reported next to the classifier output. It is never fed into the
//! classifier or the risk engine. [`TextStressClassifier`] is a trained
//! bag-of-words alternative for labelled text corpora.
//!
//! ```
//! use stress2health::encoder::Level;
//! use stress2health::text::analyze;
//!
//! let signal = analyze("I feel extremely stressed and anxious about work");
//! assert_eq!(signal.level, Level::High);
//! assert_eq!(signal.high_stress_keywords, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::encoder::Level;

mod bow;

pub use bow::{CountVectorizer, TextStressClassifier, TextTrainingMetrics};

/// Stems whose presence suggests high stress.
pub const HIGH_STRESS_KEYWORDS: [&str; 14] = [
    "anxious",
    "stressed",
    "overwhelmed",
    "panic",
    "worried",
    "exhausted",
    "burnt",
    "pressure",
    "tense",
    "depressed",
    "anxiet",
    "overwhelming",
    "burnout",
    "chaotic",
];

/// Stems whose presence suggests low stress.
pub const LOW_STRESS_KEYWORDS: [&str; 10] = [
    "relaxed",
    "calm",
    "peaceful",
    "happy",
    "great",
    "wonderful",
    "balanced",
    "content",
    "motivated",
    "harmony",
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Keyword counts and the level they imply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStressSignal {
    /// High-stress stems found
    pub high_stress_keywords: usize,
    /// Low-stress stems found
    pub low_stress_keywords: usize,
    /// Tokens left after stop-word removal
    pub word_count: usize,
    /// `low - high`
    pub sentiment_score: i64,
    /// Implied stress level
    pub level: Level,
}

/// Lowercases, drops everything but ASCII letters and whitespace, and
/// collapses runs of whitespace.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let letters: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();
    letters.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned tokens without stop words.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    clean_text(text)
        .split(' ')
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn count_present(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| haystack.contains(*k)).count()
}

/// Level implied by keyword counts: mostly-stressed wording is high,
/// mostly-calm wording is low, mixed or neutral wording is medium.
#[must_use]
pub fn level_from_counts(high: usize, low: usize) -> Level {
    if high >= 2 || (high > 0 && low == 0) {
        Level::High
    } else if low >= 2 || (low > 0 && high == 0) {
        Level::Low
    } else {
        Level::Medium
    }
}

/// Scores `text`.
#[must_use]
pub fn analyze(text: &str) -> TextStressSignal {
    let tokens = tokenize(text);
    let processed = tokens.join(" ");
    let high = count_present(&processed, &HIGH_STRESS_KEYWORDS);
    let low = count_present(&processed, &LOW_STRESS_KEYWORDS);
    TextStressSignal {
        high_stress_keywords: high,
        low_stress_keywords: low,
        word_count: tokens.len(),
        sentiment_score: low as i64 - high as i64,
        level: level_from_counts(high, low),
    }
}
