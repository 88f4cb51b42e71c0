//! Core types for comment triage

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Exclusive category assigned to a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Negative,
    Neutral,
    Spam,
}

impl Category {
    /// All categories, in output order
    pub const ALL: [Category; 4] = [
        Category::Positive,
        Category::Negative,
        Category::Neutral,
        Category::Spam,
    ];

    /// Lowercase category name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of the keyword sentiment heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl From<Sentiment> for Category {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => Category::Positive,
            Sentiment::Negative => Category::Negative,
            Sentiment::Neutral => Category::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Category::from(*self).fmt(f)
    }
}

/// Category assigned to one comment, paired with the original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Assigned category
    pub category: Category,

    /// Original comment text, untouched
    pub comment: String,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(category: Category, comment: impl Into<String>) -> Self {
        Self {
            category,
            comment: comment.into(),
        }
    }
}

/// Comments grouped by category.
///
/// All four categories are always present. Within a category, comments keep
/// the order in which they were pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedBatch {
    buckets: BTreeMap<Category, Vec<String>>,
}

impl CategorizedBatch {
    /// Create a batch with four empty buckets
    pub fn new() -> Self {
        Self {
            buckets: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// Append a classified comment to its bucket
    pub fn push(&mut self, result: ClassificationResult) {
        self.buckets
            .entry(result.category)
            .or_default()
            .push(result.comment);
    }

    /// Comments in one category
    pub fn get(&self, category: Category) -> &[String] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of comments in one category
    pub fn len_of(&self, category: Category) -> usize {
        self.get(category).len()
    }

    /// Total number of categorized comments
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Derived per-category and total counts
    pub fn counts(&self) -> TriageCounts {
        TriageCounts {
            total: self.total(),
            positive: self.len_of(Category::Positive),
            negative: self.len_of(Category::Negative),
            neutral: self.len_of(Category::Neutral),
            spam: self.len_of(Category::Spam),
        }
    }

    /// Iterate over categories and their comments
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.buckets.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Consume into a map keyed by category name
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.buckets
            .into_iter()
            .map(|(c, v)| (c.as_str().to_string(), v))
            .collect()
    }
}

impl Default for CategorizedBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ClassificationResult> for CategorizedBatch {
    fn from_iter<I: IntoIterator<Item = ClassificationResult>>(iter: I) -> Self {
        let mut batch = Self::new();
        for result in iter {
            batch.push(result);
        }
        batch
    }
}

/// Aggregate counts derived from a categorized batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageCounts {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub spam: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_batch_has_four_empty_buckets() {
        let batch = CategorizedBatch::new();

        assert_eq!(batch.iter().count(), 4);
        assert_eq!(batch.total(), 0);
        for category in Category::ALL {
            assert!(batch.get(category).is_empty());
        }
    }

    #[test]
    fn test_counts_follow_buckets() {
        let batch: CategorizedBatch = vec![
            ClassificationResult::new(Category::Spam, "buy now"),
            ClassificationResult::new(Category::Spam, "http://x.example"),
            ClassificationResult::new(Category::Positive, "great"),
            ClassificationResult::new(Category::Neutral, "meh"),
        ]
        .into_iter()
        .collect();

        let counts = batch.counts();
        assert_eq!(counts.total, 4);
        assert_eq!(counts.spam, 2);
        assert_eq!(counts.positive, 1);
        assert_eq!(counts.neutral, 1);
        assert_eq!(counts.negative, 0);
        assert_eq!(batch.get(Category::Spam), ["buy now", "http://x.example"]);
    }

    #[test]
    fn test_batch_serializes_with_lowercase_keys() {
        let mut batch = CategorizedBatch::new();
        batch.push(ClassificationResult::new(Category::Negative, "awful"));

        let json = serde_json::to_value(&batch).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(json["negative"][0], "awful");
        assert!(json["spam"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_sentiment_maps_to_category() {
        assert_eq!(Category::from(Sentiment::Positive), Category::Positive);
        assert_eq!(Category::from(Sentiment::Neutral), Category::Neutral);
        assert_eq!(Sentiment::Negative.to_string(), "negative");
    }

    #[test]
    fn test_into_map_uses_names() {
        let map = CategorizedBatch::new().into_map();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["negative", "neutral", "positive", "spam"]);
    }
}
