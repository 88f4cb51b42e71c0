//! Keyword-count sentiment heuristic
//!
//! Keywords match as plain substrings of the lower-cased comment, so a
//! keyword can hit inside a longer word. Each configured keyword counts at
//! most once per comment.

use crate::classifier::SentimentCheck;
use crate::config::{normalize_keywords, SentimentConfig};
use aho_corasick::AhoCorasick;
use tracing::debug;
use triage_core::{Error, Result, Sentiment};

pub struct SentimentClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl SentimentClassifier {
    pub fn new(config: &SentimentConfig) -> Result<Self> {
        Self::with_name("sentiment-keywords", config)
    }

    pub fn with_name(name: impl Into<String>, config: &SentimentConfig) -> Result<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(normalize_keywords(&config.positive_words))
            .map_err(|e| {
                Error::classifier(format!("Failed to build positive sentiment matcher: {e}"))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(normalize_keywords(&config.negative_words))
            .map_err(|e| {
                Error::classifier(format!("Failed to build negative sentiment matcher: {e}"))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }

    pub fn classify(&self, comment: &str) -> Sentiment {
        if comment.trim().is_empty() {
            return Sentiment::Neutral;
        }

        let text = comment.to_lowercase();
        let positive_hits = distinct_matches(&self.positive, &text);
        let negative_hits = distinct_matches(&self.negative, &text);

        debug!(positive_hits, negative_hits, "Sentiment keyword counts");

        match positive_hits.cmp(&negative_hits) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

/// Number of distinct patterns occurring anywhere in `text`
fn distinct_matches(matcher: &AhoCorasick, text: &str) -> usize {
    let mut seen = vec![false; matcher.patterns_len()];
    for m in matcher.find_overlapping_iter(text) {
        seen[m.pattern().as_usize()] = true;
    }
    seen.into_iter().filter(|hit| *hit).count()
}

impl SentimentCheck for SentimentClassifier {
    fn check(&self, comment: &str) -> Result<Sentiment> {
        Ok(self.classify(comment))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SentimentClassifier {
        SentimentClassifier::new(&SentimentConfig::default()).unwrap()
    }

    fn custom(positive: &[&str], negative: &[&str]) -> SentimentClassifier {
        let config = SentimentConfig {
            positive_words: positive.iter().map(|w| w.to_string()).collect(),
            negative_words: negative.iter().map(|w| w.to_string()).collect(),
        };
        SentimentClassifier::new(&config).unwrap()
    }

    #[test]
    fn test_positive() {
        let classifier = classifier();
        assert_eq!(classifier.classify("Great video, thanks!"), Sentiment::Positive);
        assert_eq!(classifier.classify("I LOVE this"), Sentiment::Positive);
    }

    #[test]
    fn test_negative() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("I hate this, worst video ever"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_tie_is_neutral() {
        let classifier = classifier();
        assert_eq!(classifier.classify("good but boring"), Sentiment::Neutral);
        assert_eq!(classifier.classify("meh"), Sentiment::Neutral);
    }

    #[test]
    fn test_blank_is_neutral() {
        let classifier = classifier();
        assert_eq!(classifier.classify(""), Sentiment::Neutral);
        assert_eq!(classifier.classify("  \t "), Sentiment::Neutral);
    }

    #[test]
    fn test_substring_matching() {
        let classifier = custom(&["good"], &["bad"]);
        assert_eq!(classifier.classify("goodness me"), Sentiment::Positive);
        assert_eq!(classifier.classify("badminton"), Sentiment::Negative);
    }

    #[test]
    fn test_keyword_counts_once() {
        let classifier = custom(&["good"], &["bad", "awful"]);
        assert_eq!(
            classifier.classify("good good good, bad and awful"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_overlapping_keywords_each_count() {
        let classifier = custom(&["thank", "thanks"], &["bad", "awful"]);
        assert_eq!(classifier.classify("thanks, bad and awful"), Sentiment::Neutral);
    }

    #[test]
    fn test_configured_words_are_normalized() {
        let classifier = custom(&[" Cool "], &[]);
        assert_eq!(classifier.classify("so COOL"), Sentiment::Positive);
    }

    #[test]
    fn test_sentiment_check_trait() {
        let classifier = classifier();
        assert_eq!(classifier.name(), "sentiment-keywords");
        assert_eq!(classifier.check("awful").unwrap(), Sentiment::Negative);
    }
}
