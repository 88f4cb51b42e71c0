//! Concurrent batch triage
//!
//! One classification unit per comment runs on the shared [`WorkerPool`].
//! A unit checks spam first and only asks for sentiment when the comment is
//! not spam. Units that time out, fail or panic are dropped from the result;
//! the rest of the batch is unaffected.

use crate::classifier::{SentimentCheck, SpamCheck};
use crate::pool::WorkerPool;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use triage_core::{CategorizedBatch, Category, ClassificationResult, Error, Result};

/// Fans a batch out to the worker pool and folds the results into buckets
#[derive(Clone)]
pub struct TriageOrchestrator {
    spam: Arc<dyn SpamCheck>,
    sentiment: Arc<dyn SentimentCheck>,
    pool: WorkerPool,
    unit_timeout: Duration,
}

impl TriageOrchestrator {
    pub fn new(
        spam: Arc<dyn SpamCheck>,
        sentiment: Arc<dyn SentimentCheck>,
        pool: WorkerPool,
        unit_timeout: Duration,
    ) -> Self {
        Self {
            spam,
            sentiment,
            pool,
            unit_timeout,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn unit_timeout(&self) -> Duration {
        self.unit_timeout
    }

    /// Triage a batch of comments.
    ///
    /// Every category is present in the result. Comments keep their input
    /// order within a bucket. Never fails: a unit that misses its deadline
    /// or errors is logged and left out.
    pub async fn triage(&self, comments: &[String]) -> CategorizedBatch {
        let start = Instant::now();

        let handles: Vec<_> = comments
            .iter()
            .cloned()
            .map(|comment| {
                let spam = self.spam.clone();
                let sentiment = self.sentiment.clone();
                self.pool
                    .submit(self.unit_timeout, move || classify_unit(&*spam, &*sentiment, comment))
            })
            .collect();

        let results = join_all(handles.into_iter().map(|h| h.join())).await;

        let mut batch = CategorizedBatch::new();
        let mut dropped = 0usize;

        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(classified) => {
                    metrics::counter!("comment_triage_units_total", "outcome" => "completed")
                        .increment(1);
                    metrics::counter!(
                        "comment_triage_comments_total",
                        "category" => classified.category.as_str()
                    )
                    .increment(1);
                    batch.push(classified);
                }
                Err(e) => {
                    dropped += 1;
                    let outcome = if e.is_timeout() { "timed_out" } else { "failed" };
                    metrics::counter!("comment_triage_units_total", "outcome" => outcome)
                        .increment(1);
                    warn!(comment_index = index, error = %e, "Dropping comment from batch");
                }
            }
        }

        let elapsed = start.elapsed();
        metrics::histogram!("comment_triage_batch_latency_us").record(elapsed.as_micros() as f64);

        let counts = batch.counts();
        info!(
            total = counts.total,
            positive = counts.positive,
            negative = counts.negative,
            neutral = counts.neutral,
            spam = counts.spam,
            dropped,
            latency_ms = elapsed.as_millis() as u64,
            "Triaged {} comments",
            comments.len()
        );

        batch
    }
}

fn classify_unit(
    spam: &dyn SpamCheck,
    sentiment: &dyn SentimentCheck,
    comment: String,
) -> Result<ClassificationResult> {
    if spam.check(&comment)? {
        debug!(classifier = spam.name(), "Unit classified as spam");
        return Ok(ClassificationResult::new(Category::Spam, comment));
    }

    let sentiment = sentiment
        .check(&comment)
        .map_err(|e| Error::classifier(format!("{} failed: {}", sentiment.name(), e)))?;

    Ok(ClassificationResult::new(sentiment.into(), comment))
}
