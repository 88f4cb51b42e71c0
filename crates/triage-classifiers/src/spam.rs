//! Embedding-similarity spam classifier
//!
//! Decision order:
//! 1. Blank comments are never spam.
//! 2. A URL (`http`, `https`, `ftp` or `file` scheme) is spam, regardless of
//!    similarity.
//! 3. The comment is spam iff its best similarity to the spam examples beats
//!    its best similarity to the non-spam examples *and* exceeds the
//!    threshold.
//!
//! If scoring fails for any reason the classifier falls back to a keyword
//! containment check instead of surfacing the error.

use crate::classifier::SpamCheck;
use crate::config::{normalize_keywords, SpamConfig};
use crate::corpus::ReferenceCorpus;
use crate::vector::{cosine_similarity, WordVector};
use crate::vectorizer::TextEmbedder;
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, error, info};
use triage_core::{Error, Result};

/// Similarity scores behind a spam verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpamScore {
    /// Best cosine similarity against the spam examples (floored at 0.0)
    pub max_spam_similarity: f32,

    /// Best cosine similarity against the non-spam examples (floored at 0.0)
    pub max_non_spam_similarity: f32,

    /// Whether the decision rule flagged the comment
    pub is_spam: bool,
}

pub struct SpamClassifier {
    name: String,
    embedder: Arc<dyn TextEmbedder>,
    corpus: ReferenceCorpus,
    threshold: f32,
    url_regex: Regex,
    fallback_keywords: AhoCorasick,
}

impl SpamClassifier {
    /// Create a spam classifier over a reference corpus
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        corpus: ReferenceCorpus,
        config: &SpamConfig,
    ) -> Result<Self> {
        let url_regex = Regex::new(
            r"(?i)\b(https?|ftp|file)://[-A-Za-z0-9+&@#/%?=~_|!:,.;]*[-A-Za-z0-9+&@#/%=~_|]",
        )
        .map_err(|e| Error::classifier(format!("Failed to compile URL regex: {}", e)))?;

        let fallback_keywords = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(normalize_keywords(&config.fallback_keywords))
            .map_err(|e| {
                Error::classifier(format!("Failed to build spam keyword matcher: {e}"))
            })?;

        info!(
            threshold = config.threshold,
            spam_examples = corpus.spam().len(),
            non_spam_examples = corpus.non_spam().len(),
            "Spam classifier initialized"
        );

        Ok(Self {
            name: "spam-embedding".to_string(),
            embedder,
            corpus,
            threshold: config.threshold,
            url_regex,
            fallback_keywords,
        })
    }

    /// Whether a comment is spam. Never fails.
    pub fn classify(&self, comment: &str) -> bool {
        if comment.trim().is_empty() {
            return false;
        }

        if self.contains_url(comment) {
            debug!("Comment contains URL, classified as spam");
            return true;
        }

        match self.score(comment) {
            Ok(score) => {
                if score.is_spam {
                    debug!(
                        spam_similarity = score.max_spam_similarity,
                        non_spam_similarity = score.max_non_spam_similarity,
                        "Comment classified as spam"
                    );
                }
                score.is_spam
            }
            Err(e) => {
                error!("Error classifying comment as spam, using keyword fallback: {}", e);
                metrics::counter!("comment_triage_spam_fallback_total").increment(1);
                self.keyword_fallback(comment)
            }
        }
    }

    /// Similarity scores and the resulting verdict, without the URL fast path
    pub fn score(&self, comment: &str) -> Result<SpamScore> {
        let comment_vector = self.embedder.embed(comment)?;

        let max_spam_similarity = self.max_similarity(&comment_vector, self.corpus.spam())?;
        let max_non_spam_similarity =
            self.max_similarity(&comment_vector, self.corpus.non_spam())?;

        let is_spam = max_spam_similarity > max_non_spam_similarity
            && max_spam_similarity > self.threshold;

        Ok(SpamScore {
            max_spam_similarity,
            max_non_spam_similarity,
            is_spam,
        })
    }

    /// Whether the comment contains a URL
    pub fn contains_url(&self, comment: &str) -> bool {
        self.url_regex.is_match(comment)
    }

    /// Keyword containment check used when scoring fails
    pub fn keyword_fallback(&self, comment: &str) -> bool {
        self.fallback_keywords.is_match(&comment.to_lowercase())
    }

    /// Spam subset of a batch, in input order
    pub fn detect_spam(&self, comments: &[String]) -> Vec<String> {
        info!("Detecting spam in {} comments", comments.len());

        let spam: Vec<String> = comments
            .iter()
            .filter(|c| self.classify(c))
            .cloned()
            .collect();

        info!("Found {} spam comments", spam.len());
        spam
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    fn max_similarity(&self, comment_vector: &WordVector, examples: &[String]) -> Result<f32> {
        let mut max = 0.0f32;
        for example in examples {
            let example_vector = self.embedder.embed(example)?;
            max = max.max(cosine_similarity(comment_vector, &example_vector)?);
        }
        Ok(max)
    }
}

impl SpamCheck for SpamClassifier {
    fn check(&self, comment: &str) -> Result<bool> {
        Ok(self.classify(comment))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
