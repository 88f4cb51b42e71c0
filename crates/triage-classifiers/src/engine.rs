//! Assembles the full triage pipeline from a [`TriageConfig`]

use crate::config::TriageConfig;
use crate::corpus::ReferenceCorpus;
use crate::embedding::EmbeddingModel;
use crate::orchestrator::TriageOrchestrator;
use crate::pool::WorkerPool;
use crate::sentiment::SentimentClassifier;
use crate::spam::SpamClassifier;
use crate::tokenizer::Tokenizer;
use crate::vectorizer::TextVectorizer;
use std::sync::Arc;
use tracing::info;
use triage_core::{CategorizedBatch, Result};

/// Process-wide triage pipeline: model, classifiers, pool and orchestrator
#[derive(Clone)]
pub struct TriageEngine {
    model: Arc<EmbeddingModel>,
    spam: Arc<SpamClassifier>,
    sentiment: Arc<SentimentClassifier>,
    orchestrator: TriageOrchestrator,
}

impl TriageEngine {
    /// Build the engine using the default reference corpus
    pub fn from_config(config: &TriageConfig) -> Result<Self> {
        Self::with_corpus(config, ReferenceCorpus::default())
    }

    /// Build the engine against a custom reference corpus
    pub fn with_corpus(config: &TriageConfig, corpus: ReferenceCorpus) -> Result<Self> {
        config.validate()?;

        let tokenizer = Arc::new(Tokenizer::new(&config.embedding.stopwords)?);
        let model = Arc::new(EmbeddingModel::load_or_build(
            &corpus,
            &tokenizer,
            &config.embedding.params(),
            config.embedding.model_path.as_deref(),
        )?);

        info!(
            vocab_size = model.vocab_size(),
            dimensions = model.dimensions(),
            "Embedding model ready"
        );

        let vectorizer = Arc::new(TextVectorizer::new(model.clone(), tokenizer));
        let spam = Arc::new(SpamClassifier::new(vectorizer, corpus, &config.spam)?);
        let sentiment = Arc::new(SentimentClassifier::new(&config.sentiment)?);

        let pool = WorkerPool::new(config.orchestrator.worker_pool_size);
        let orchestrator = TriageOrchestrator::new(
            spam.clone(),
            sentiment.clone(),
            pool,
            config.orchestrator.unit_timeout(),
        );

        info!(
            workers = config.orchestrator.worker_pool_size,
            unit_timeout_secs = config.orchestrator.unit_timeout_secs,
            "Triage engine initialized"
        );

        Ok(Self {
            model,
            spam,
            sentiment,
            orchestrator,
        })
    }

    /// Triage a batch of comments on the shared worker pool
    pub async fn triage(&self, comments: &[String]) -> CategorizedBatch {
        self.orchestrator.triage(comments).await
    }

    pub fn spam_classifier(&self) -> &Arc<SpamClassifier> {
        &self.spam
    }

    pub fn sentiment_classifier(&self) -> &Arc<SentimentClassifier> {
        &self.sentiment
    }

    pub fn model(&self) -> &Arc<EmbeddingModel> {
        &self.model
    }

    pub fn orchestrator(&self) -> &TriageOrchestrator {
        &self.orchestrator
    }
}
