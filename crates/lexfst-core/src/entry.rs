// Lexicon entry: one pronunciation of one word

use serde::{Deserialize, Serialize};

/// A single pronunciation of a word.
///
/// `weight` is an additive cost (a negative log probability), so `0.0` means
/// "no penalty". The same word may appear in several entries with different
/// pronunciations, and the same pronunciation may be shared by several words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub word: String,
    #[serde(default)]
    pub weight: f64,
    pub pronunciation: Vec<String>,
}

impl LexiconEntry {
    pub fn new<P>(word: impl Into<String>, weight: f64, pronunciation: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            word: word.into(),
            weight,
            pronunciation: pronunciation.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the pronunciation has no phones at all.
    pub fn is_empty(&self) -> bool {
        self.pronunciation.is_empty()
    }

    /// Pronunciation joined with single spaces, the key used when comparing
    /// pronunciations against each other.
    pub fn pronunciation_key(&self) -> String {
        self.pronunciation.join(" ")
    }
}
