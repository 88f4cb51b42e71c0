//! Comment Triage Classifiers
//!
//! Sorts batches of short user comments into positive, negative, neutral and
//! spam buckets.
//!
//! - Spam detection compares a comment's embedding against curated spam and
//!   non-spam examples, with a URL fast path and a keyword fallback.
//! - Sentiment is a keyword-count heuristic applied to non-spam comments.
//! - The orchestrator runs one unit per comment on a bounded worker pool with
//!   a per-unit timeout, dropping units that time out or fail.
//!
//! The embedding model is trained from the reference corpus at startup, or
//! loaded from a persisted artifact when one matches the configuration.

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod orchestrator;
pub mod pool;
pub mod sentiment;
pub mod spam;
pub mod tokenizer;
pub mod vector;
pub mod vectorizer;

pub use classifier::{SentimentCheck, SpamCheck};
pub use config::{
    EmbeddingConfig, OrchestratorConfig, SentimentConfig, SpamConfig, TriageConfig,
};
pub use corpus::ReferenceCorpus;
pub use embedding::{EmbeddingModel, EmbeddingParams};
pub use engine::TriageEngine;
pub use orchestrator::TriageOrchestrator;
pub use pool::{UnitHandle, WorkerPool};
pub use sentiment::SentimentClassifier;
pub use spam::{SpamClassifier, SpamScore};
pub use tokenizer::Tokenizer;
pub use vector::{cosine_similarity, WordVector};
pub use vectorizer::{TextEmbedder, TextVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{SentimentCheck, SpamCheck};
    pub use crate::config::TriageConfig;
    pub use crate::engine::TriageEngine;
    pub use crate::orchestrator::TriageOrchestrator;
    pub use crate::pool::WorkerPool;
    pub use crate::sentiment::SentimentClassifier;
    pub use crate::spam::SpamClassifier;
}
