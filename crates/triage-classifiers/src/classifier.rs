//! Classifier traits used by the triage orchestrator

use triage_core::{Result, Sentiment};

/// Binary spam verdict for a single comment
pub trait SpamCheck: Send + Sync {
    /// Whether the comment is spam
    fn check(&self, comment: &str) -> Result<bool>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Sentiment verdict for a comment already known not to be spam
pub trait SentimentCheck: Send + Sync {
    /// Classify the comment's sentiment
    fn check(&self, comment: &str) -> Result<Sentiment>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
