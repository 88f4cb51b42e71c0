//! Curated spam and non-spam reference sentences

use std::collections::HashSet;
use triage_core::{Error, Result};

const DEFAULT_SPAM: &[&str] = &[
    "Buy cheap products now! Click here for amazing deals!",
    "Make money fast! Work from home and earn thousands!",
    "Free giveaway! Enter now to win a prize!",
    "Check out my channel and subscribe for more content!",
    "Like and share this video for a chance to win!",
    "Follow me on social media for exclusive content!",
    "Limited time offer! Don't miss out on this opportunity!",
    "Investment opportunity! Guaranteed returns!",
    "Click the link in my bio for special access!",
    "Subscribe to my channel for daily uploads!",
];

const DEFAULT_NON_SPAM: &[&str] = &[
    "Great video! Really enjoyed watching it.",
    "Thanks for sharing this information.",
    "I learned a lot from this content.",
    "This is one of the best videos on this topic.",
    "The explanation was very clear and helpful.",
    "I've been looking for this information for a while.",
    "This video helped me solve my problem.",
    "I appreciate the effort you put into making this.",
    "Looking forward to more content like this.",
    "This is exactly what I needed, thank you!",
];

/// Two disjoint, immutable sets of example sentences
#[derive(Debug, Clone)]
pub struct ReferenceCorpus {
    spam: Vec<String>,
    non_spam: Vec<String>,
}

impl ReferenceCorpus {
    /// Create a corpus, rejecting sentences listed in both sets
    pub fn new(spam: Vec<String>, non_spam: Vec<String>) -> Result<Self> {
        let spam_set: HashSet<&str> = spam.iter().map(String::as_str).collect();
        if let Some(shared) = non_spam.iter().find(|s| spam_set.contains(s.as_str())) {
            return Err(Error::config(format!(
                "Reference sentence appears in both spam and non-spam sets: {:?}",
                shared
            )));
        }

        Ok(Self { spam, non_spam })
    }

    /// Spam examples
    pub fn spam(&self) -> &[String] {
        &self.spam
    }

    /// Non-spam examples
    pub fn non_spam(&self) -> &[String] {
        &self.non_spam
    }

    /// Every sentence, spam first, as used for training
    pub fn all_sentences(&self) -> impl Iterator<Item = &str> {
        self.spam
            .iter()
            .chain(self.non_spam.iter())
            .map(String::as_str)
    }

    /// Total number of sentences
    pub fn len(&self) -> usize {
        self.spam.len() + self.non_spam.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReferenceCorpus {
    fn default() -> Self {
        Self {
            spam: DEFAULT_SPAM.iter().map(|s| s.to_string()).collect(),
            non_spam: DEFAULT_NON_SPAM.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus() {
        let corpus = ReferenceCorpus::default();

        assert_eq!(corpus.spam().len(), 10);
        assert_eq!(corpus.non_spam().len(), 10);
        assert_eq!(corpus.all_sentences().count(), 20);
        assert_eq!(
            corpus.all_sentences().next(),
            Some("Buy cheap products now! Click here for amazing deals!")
        );
    }

    #[test]
    fn test_overlapping_sets_rejected() {
        let result = ReferenceCorpus::new(
            vec!["click here".to_string()],
            vec!["nice one".to_string(), "click here".to_string()],
        );

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
