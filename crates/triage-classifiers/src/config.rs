//! Configuration for the triage pipeline
//!
//! A single [`TriageConfig`] is built once at process start and passed by
//! reference into each component's constructor. Every field has a default,
//! so an empty YAML document is a valid configuration.

use crate::embedding::EmbeddingParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use triage_core::{Error, Result};

/// Configuration for the whole triage pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Spam classifier settings
    #[serde(default)]
    pub spam: SpamConfig,

    /// Embedding model settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Keyword sentiment settings
    #[serde(default)]
    pub sentiment: SentimentConfig,

    /// Worker pool and timeout settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Spam classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Minimum spam similarity required for a spam verdict
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Substrings checked when similarity scoring fails
    #[serde(default = "default_fallback_keywords")]
    pub fallback_keywords: Vec<String>,
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Dimensionality of every word vector
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,

    /// Co-occurrence window on each side of a word
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Words seen fewer times than this are left out of the vocabulary
    #[serde(default = "default_min_word_frequency")]
    pub min_word_frequency: usize,

    /// Number of smoothing passes
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Seed for index vector initialization
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Persisted model artifact; trained from the corpus when absent or unreadable
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Tokens dropped during preprocessing
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
}

/// Keyword sentiment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Substrings counted as positive
    #[serde(default = "default_positive_words")]
    pub positive_words: Vec<String>,

    /// Substrings counted as negative
    #[serde(default = "default_negative_words")]
    pub negative_words: Vec<String>,
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Number of classification units allowed to run at once
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,

    /// Deadline for a single unit, in seconds
    #[serde(default = "default_unit_timeout_secs")]
    pub unit_timeout_secs: u64,
}

impl TriageConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            Error::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Reject settings no component can run with
    pub fn validate(&self) -> Result<()> {
        if !self.spam.threshold.is_finite() {
            return Err(Error::config("spam.threshold must be a finite number"));
        }
        if self.embedding.vector_size == 0 {
            return Err(Error::config("embedding.vector_size must be greater than 0"));
        }
        if self.embedding.window_size == 0 {
            return Err(Error::config("embedding.window_size must be greater than 0"));
        }
        if self.embedding.iterations == 0 {
            return Err(Error::config("embedding.iterations must be greater than 0"));
        }
        if self.orchestrator.worker_pool_size == 0 {
            return Err(Error::config(
                "orchestrator.worker_pool_size must be greater than 0",
            ));
        }
        if self.orchestrator.unit_timeout_secs == 0 {
            return Err(Error::config(
                "orchestrator.unit_timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl EmbeddingConfig {
    /// Training parameters for the embedding model
    pub fn params(&self) -> EmbeddingParams {
        EmbeddingParams {
            vector_size: self.vector_size,
            window_size: self.window_size,
            min_word_frequency: self.min_word_frequency,
            iterations: self.iterations,
            seed: self.seed,
        }
    }
}

impl OrchestratorConfig {
    /// Per-unit deadline
    pub fn unit_timeout(&self) -> Duration {
        Duration::from_secs(self.unit_timeout_secs)
    }
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            fallback_keywords: default_fallback_keywords(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            vector_size: default_vector_size(),
            window_size: default_window_size(),
            min_word_frequency: default_min_word_frequency(),
            iterations: default_iterations(),
            seed: default_seed(),
            model_path: None,
            stopwords: default_stopwords(),
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_words: default_positive_words(),
            negative_words: default_negative_words(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: default_worker_pool_size(),
            unit_timeout_secs: default_unit_timeout_secs(),
        }
    }
}

/// Trim, lower-case and drop blank entries from a keyword list
pub(crate) fn normalize_keywords(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn default_threshold() -> f32 {
    0.5
}

fn default_fallback_keywords() -> Vec<String> {
    to_strings(&["buy", "cheap", "discount"])
}

fn default_vector_size() -> usize {
    100
}

fn default_window_size() -> usize {
    5
}

fn default_min_word_frequency() -> usize {
    1
}

fn default_iterations() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

fn default_stopwords() -> Vec<String> {
    to_strings(&[
        "a", "an", "and", "the", "to", "of", "for", "in", "on", "at", "is", "it", "this",
        "that", "i", "me", "my", "you", "your", "we", "be", "was", "with", "or", "as", "by",
        "from",
    ])
}

fn default_positive_words() -> Vec<String> {
    to_strings(&[
        "good",
        "great",
        "awesome",
        "excellent",
        "amazing",
        "love",
        "best",
        "thanks",
        "thank",
        "helpful",
        "nice",
        "wonderful",
        "fantastic",
        "enjoyed",
    ])
}

fn default_negative_words() -> Vec<String> {
    to_strings(&[
        "bad",
        "terrible",
        "awful",
        "hate",
        "worst",
        "boring",
        "poor",
        "horrible",
        "useless",
        "waste",
        "disappointed",
        "dislike",
    ])
}

fn default_worker_pool_size() -> usize {
    5
}

fn default_unit_timeout_secs() -> u64 {
    5
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
