//! Lexical similarity between headlines.
//!
//! Two coefficients over significant-keyword sets: Jaccard for titles of
//! comparable length, overlap for a short title contained in a longer one.
//! The early-pass and final-pass decision surfaces use separate, fixed
//! threshold sets.

use std::collections::HashSet;

use crate::tokenizer::{normalize, significant_words};

/// Titles with this many distinct keywords or fewer need a high Jaccard.
const SHORT_TITLE_WORDS: usize = 2;
const SHORT_TITLE_JACCARD: f64 = 0.6;

const EARLY_JACCARD: f64 = 0.35;
const EARLY_OVERLAP: f64 = 0.65;
const EARLY_MIXED_JACCARD: f64 = 0.25;
const EARLY_MIXED_OVERLAP: f64 = 0.5;

const FINAL_JACCARD: f64 = 0.3;
const FINAL_OVERLAP: f64 = 0.6;
const FINAL_MIXED_JACCARD: f64 = 0.2;
const FINAL_MIXED_OVERLAP: f64 = 0.45;

/// Distinct significant keywords of one text, plus its normalized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    normalized: String,
    words: HashSet<String>,
}

impl KeywordSet {
    pub fn from_text(text: &str) -> Self {
        Self {
            normalized: normalize(text),
            words: significant_words(text).into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of keywords shared with `other`.
    pub fn shared(&self, other: &KeywordSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        small.iter().filter(|w| large.contains(*w)).count()
    }

    pub fn jaccard(&self, other: &KeywordSet) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let shared = self.shared(other);
        let union = self.len() + other.len() - shared;
        shared as f64 / union as f64
    }

    pub fn overlap(&self, other: &KeywordSet) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        self.shared(other) as f64 / self.len().min(other.len()) as f64
    }

    fn same_text(&self, other: &KeywordSet) -> bool {
        self.normalized == other.normalized
    }

    /// Early-pass decision: recall-favoring, strict for very short titles.
    pub fn is_similar_to(&self, other: &KeywordSet) -> bool {
        if self.same_text(other) {
            return true;
        }
        let j = self.jaccard(other);
        if self.len() <= SHORT_TITLE_WORDS || other.len() <= SHORT_TITLE_WORDS {
            return j >= SHORT_TITLE_JACCARD;
        }
        let o = self.overlap(other);
        j >= EARLY_JACCARD
            || o >= EARLY_OVERLAP
            || (j >= EARLY_MIXED_JACCARD && o >= EARLY_MIXED_OVERLAP)
    }

    /// Final-pass decision, applied right before delivery.
    pub fn is_final_duplicate_of(&self, other: &KeywordSet) -> bool {
        if self.same_text(other) {
            return true;
        }
        let j = self.jaccard(other);
        let o = self.overlap(other);
        j >= FINAL_JACCARD
            || o >= FINAL_OVERLAP
            || (j >= FINAL_MIXED_JACCARD && o >= FINAL_MIXED_OVERLAP)
    }
}

/// Jaccard coefficient of two keyword sequences (set semantics).
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    to_set(a).jaccard(&to_set(b))
}

/// Overlap coefficient of two keyword sequences (set semantics).
pub fn overlap(a: &[String], b: &[String]) -> f64 {
    to_set(a).overlap(&to_set(b))
}

fn to_set(words: &[String]) -> KeywordSet {
    KeywordSet {
        normalized: words.join(" "),
        words: words.iter().cloned().collect(),
    }
}

/// Whether two titles report the same story (early-pass thresholds).
pub fn are_similar(title_a: &str, title_b: &str) -> bool {
    KeywordSet::from_text(title_a).is_similar_to(&KeywordSet::from_text(title_b))
}

/// Whether two titles are duplicates under the final-pass thresholds.
pub fn is_final_duplicate(title_a: &str, title_b: &str) -> bool {
    KeywordSet::from_text(title_a).is_final_duplicate_of(&KeywordSet::from_text(title_b))
}
