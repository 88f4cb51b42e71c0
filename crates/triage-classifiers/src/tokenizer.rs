//! Comment tokenization shared by model training and vectorization

use regex::Regex;
use std::collections::HashSet;
use triage_core::{Error, Result};

/// Lower-casing word tokenizer with stopword removal
#[derive(Debug, Clone)]
pub struct Tokenizer {
    word_regex: Regex,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a tokenizer that drops the given stopwords
    pub fn new<I, S>(stopwords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            word_regex: Regex::new(r"[\p{L}\p{N}'’]+")
                .map_err(|e| Error::config(format!("Failed to compile word regex: {}", e)))?,
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        })
    }

    /// Split text into normalized tokens.
    ///
    /// Splits on anything that is not a letter, digit or apostrophe, then
    /// strips apostrophes and digits from each piece, so "Don't" becomes
    /// "dont" and "2024" disappears.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();

        self.word_regex
            .find_iter(&lower)
            .filter_map(|m| {
                let token: String = m.as_str().chars().filter(|c| c.is_alphabetic()).collect();
                if token.is_empty() || self.stopwords.contains(&token) {
                    None
                } else {
                    Some(token)
                }
            })
            .collect()
    }

    /// Whether a token is dropped as a stopword
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Configured stopwords in sorted order
    pub fn stopwords(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.stopwords.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>()).expect("Failed to create tokenizer")
    }
}
