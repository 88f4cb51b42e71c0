//! Comment Triage Core
//!
//! Core types and error handling shared across the comment triage crates.
//!
//! This crate provides:
//! - The error taxonomy and `Result` alias used by every component
//! - Category and sentiment labels produced by the classifiers
//! - The categorized batch returned by a triage run, with derived counts

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{CategorizedBatch, Category, ClassificationResult, Sentiment, TriageCounts};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{CategorizedBatch, Category, ClassificationResult, Sentiment};
}
