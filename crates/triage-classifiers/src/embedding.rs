//! Word embedding model trained from the reference corpus
//!
//! The model is a shallow co-occurrence embedding:
//!
//! 1. Every vocabulary word gets a unit-length random index vector drawn from
//!    an RNG seeded with `EmbeddingParams::seed`, in sorted vocabulary order.
//! 2. A co-occurrence pass adds the index vectors of every word inside the
//!    context window, weighted by proximity.
//! 3. A fixed number of smoothing passes blend each word's co-occurrence
//!    vector with the mean of its context words' current vectors.
//!
//! Training is deterministic for a given corpus and parameter set. It is not
//! meant to converge; it only needs to pull words that share sentences
//! together so that spam-like and ordinary phrasing separate under cosine
//! similarity.
//!
//! A persisted model records its parameters and a fingerprint of the
//! training sentences and stopwords. It is only reused when both match.

use crate::corpus::ReferenceCorpus;
use crate::tokenizer::Tokenizer;
use crate::vector::WordVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use triage_core::{Error, Result};

const ARTIFACT_VERSION: u32 = 2;

/// Weight of the neighbourhood mean in each smoothing pass
const SMOOTHING: f32 = 0.5;

/// Training parameters; a persisted model is only reused when they match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingParams {
    pub vector_size: usize,
    pub window_size: usize,
    pub min_word_frequency: usize,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        Self {
            vector_size: 100,
            window_size: 5,
            min_word_frequency: 1,
            iterations: 5,
            seed: 42,
        }
    }
}

/// Immutable mapping from token to word vector
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingModel {
    params: EmbeddingParams,
    fingerprint: String,
    vocabulary: BTreeMap<String, WordVector>,
}

/// On-disk representation
#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    version: u32,
    params: EmbeddingParams,
    fingerprint: String,
    vocabulary: BTreeMap<String, WordVector>,
}

/// SHA-256 over the sorted stopwords and the training sentences, in order
pub fn training_fingerprint<'a, I>(sentences: I, tokenizer: &Tokenizer) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();
    for word in tokenizer.stopwords() {
        hasher.update(b"stopword:");
        hasher.update(word.as_bytes());
        hasher.update([0u8]);
    }
    for sentence in sentences {
        hasher.update(b"sentence:");
        hasher.update(sentence.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

impl EmbeddingModel {
    /// Train a model over tokenized sentences
    pub fn build<'a, I>(sentences: I, tokenizer: &Tokenizer, params: &EmbeddingParams) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let start = Instant::now();

        if params.vector_size == 0 || params.window_size == 0 {
            return Err(Error::config(
                "embedding vector_size and window_size must be greater than 0",
            ));
        }

        let sentences: Vec<&str> = sentences.into_iter().collect();
        let fingerprint = training_fingerprint(sentences.iter().copied(), tokenizer);

        let sentences: Vec<Vec<String>> = sentences
            .into_iter()
            .map(|s| tokenizer.tokenize(s))
            .collect();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for token in sentences.iter().flatten() {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }

        let words: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count >= params.min_word_frequency)
            .map(|(word, _)| word.to_string())
            .collect();

        if words.is_empty() {
            return Err(Error::model_unavailable(format!(
                "no word in the corpus reaches min_word_frequency {}",
                params.min_word_frequency
            )));
        }

        let word_index: HashMap<&str, usize> = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.as_str(), i))
            .collect();

        let mut rng = StdRng::seed_from_u64(params.seed);
        let index_vectors: Vec<WordVector> = (0..words.len())
            .map(|_| random_unit_vector(&mut rng, params.vector_size))
            .collect();

        let contexts = collect_contexts(&sentences, &word_index, params.window_size);

        let mut cooccurrence = Vec::with_capacity(words.len());
        for (word, context) in contexts.iter().enumerate() {
            let mut vector = index_vectors[word].clone();
            for &(neighbour, weight) in context {
                vector.add_scaled(&index_vectors[neighbour], weight)?;
            }
            vector.normalize();
            cooccurrence.push(vector);
        }

        let mut vectors = cooccurrence.clone();
        for pass in 0..params.iterations {
            vectors = smooth(&cooccurrence, &vectors, &contexts)?;
            debug!(pass = pass + 1, "Embedding smoothing pass complete");
        }

        let vocabulary: BTreeMap<String, WordVector> = words.into_iter().zip(vectors).collect();

        info!(
            vocab_size = vocabulary.len(),
            vector_size = params.vector_size,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Embedding model training complete"
        );

        Ok(Self {
            params: *params,
            fingerprint,
            vocabulary,
        })
    }

    /// Load a persisted model trained with `expected` parameters on the
    /// sentences and stopwords summarized by `fingerprint`
    pub fn load(
        path: impl AsRef<Path>,
        expected: &EmbeddingParams,
        fingerprint: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(Error::model_unavailable(format!(
                "unsupported model artifact version {}",
                artifact.version
            )));
        }

        if artifact.params != *expected {
            return Err(Error::model_unavailable(format!(
                "model at {} was trained with {:?}, expected {:?}",
                path.display(),
                artifact.params,
                expected
            )));
        }

        if artifact.fingerprint != fingerprint {
            return Err(Error::model_unavailable(format!(
                "model at {} was trained on a different corpus or stopword list",
                path.display()
            )));
        }

        if artifact.vocabulary.is_empty() {
            return Err(Error::model_unavailable(format!(
                "model at {} has an empty vocabulary",
                path.display()
            )));
        }

        if let Some((word, vector)) = artifact
            .vocabulary
            .iter()
            .find(|(_, v)| v.dimensions() != expected.vector_size)
        {
            return Err(Error::model_unavailable(format!(
                "vector for {:?} has {} dimensions, expected {}",
                word,
                vector.dimensions(),
                expected.vector_size
            )));
        }

        Ok(Self {
            params: artifact.params,
            fingerprint: artifact.fingerprint,
            vocabulary: artifact.vocabulary,
        })
    }

    /// Persist the model, replacing any existing file atomically
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let artifact = ModelArtifact {
            version: ARTIFACT_VERSION,
            params: self.params,
            fingerprint: self.fingerprint.clone(),
            vocabulary: self.vocabulary.clone(),
        };

        let tmp_path = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &artifact)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Reuse a persisted model when possible, otherwise train from the corpus.
    ///
    /// A missing, corrupt or mismatched artifact is never fatal: the model is
    /// retrained and, when a path is configured, written back.
    pub fn load_or_build(
        corpus: &ReferenceCorpus,
        tokenizer: &Tokenizer,
        params: &EmbeddingParams,
        path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = path {
            if path.exists() {
                info!("Loading pre-trained embedding model from {}", path.display());
                let fingerprint = training_fingerprint(corpus.all_sentences(), tokenizer);
                match Self::load(path, params, &fingerprint) {
                    Ok(model) => return Ok(model),
                    Err(e) => warn!(
                        "Failed to load embedding model from {}: {}. Retraining",
                        path.display(),
                        e
                    ),
                }
            } else {
                info!(
                    "No pre-trained embedding model at {}. Training new model",
                    path.display()
                );
            }
        }

        let model = Self::build(corpus.all_sentences(), tokenizer, params)?;

        if let Some(path) = path {
            match model.save(path) {
                Ok(()) => info!("Embedding model saved to {}", path.display()),
                Err(e) => warn!("Failed to save embedding model to {}: {}", path.display(), e),
            }
        }

        Ok(model)
    }

    /// Vector for an already-normalized token
    pub fn vector(&self, word: &str) -> Option<&WordVector> {
        self.vocabulary.get(word)
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.vocabulary.contains_key(word)
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn dimensions(&self) -> usize {
        self.params.vector_size
    }

    pub fn params(&self) -> &EmbeddingParams {
        &self.params
    }

    /// Fingerprint of the sentences and stopwords the model was trained on
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Vocabulary words in sorted order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}

fn random_unit_vector(rng: &mut StdRng, dimensions: usize) -> WordVector {
    let mut vector = WordVector::from(
        (0..dimensions)
            .map(|_| rng.gen_range(-1.0f32..1.0))
            .collect::<Vec<_>>(),
    );
    vector.normalize();
    vector
}

/// Neighbours of each vocabulary word with proximity weights.
///
/// Out-of-vocabulary tokens are removed before windows are taken.
fn collect_contexts(
    sentences: &[Vec<String>],
    word_index: &HashMap<&str, usize>,
    window: usize,
) -> Vec<Vec<(usize, f32)>> {
    let mut contexts = vec![Vec::new(); word_index.len()];

    for sentence in sentences {
        let ids: Vec<usize> = sentence
            .iter()
            .filter_map(|t| word_index.get(t.as_str()).copied())
            .collect();

        for (pos, &center) in ids.iter().enumerate() {
            let start = pos.saturating_sub(window);
            let end = (pos + window + 1).min(ids.len());

            for (ctx_pos, &neighbour) in ids.iter().enumerate().take(end).skip(start) {
                if ctx_pos == pos {
                    continue;
                }
                let distance = pos.abs_diff(ctx_pos);
                let weight = (window + 1 - distance) as f32 / window as f32;
                contexts[center].push((neighbour, weight));
            }
        }
    }

    contexts
}

fn smooth(
    cooccurrence: &[WordVector],
    current: &[WordVector],
    contexts: &[Vec<(usize, f32)>],
) -> Result<Vec<WordVector>> {
    let mut next = Vec::with_capacity(current.len());

    for (word, context) in contexts.iter().enumerate() {
        let mut vector = cooccurrence[word].clone();

        let total_weight: f32 = context.iter().map(|(_, w)| w).sum();
        if total_weight > 0.0 {
            let mut mean = WordVector::zeros(vector.dimensions());
            for &(neighbour, weight) in context {
                mean.add_scaled(&current[neighbour], weight)?;
            }
            vector.add_scaled(&mean, SMOOTHING / total_weight)?;
        }

        vector.normalize();
        next.push(vector);
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::cosine_similarity;

    fn small_params() -> EmbeddingParams {
        EmbeddingParams {
            vector_size: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_vocabulary() {
        let tokenizer = Tokenizer::default();
        let model = EmbeddingModel::build(
            ["Buy cheap stuff now", "great video thanks"],
            &tokenizer,
            &small_params(),
        )
        .unwrap();

        assert_eq!(model.vocab_size(), 7);
        assert!(model.has_word("cheap"));
        assert!(!model.has_word("meh"));
        assert_eq!(model.vector("video").unwrap().dimensions(), 16);
        assert_eq!(model.dimensions(), 16);
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let tokenizer = Tokenizer::default();
        let model =
            EmbeddingModel::build(["alpha beta"], &tokenizer, &small_params()).unwrap();

        assert!(model.vector("gamma").is_none());
        assert!(!model.has_word("gamma"));
        assert_eq!(model.vocab_size(), 2);
    }

    #[test]
    fn test_min_word_frequency_filters() {
        let tokenizer = Tokenizer::default();
        let params = EmbeddingParams {
            min_word_frequency: 2,
            ..small_params()
        };
        let model =
            EmbeddingModel::build(["spam spam eggs", "spam ham ham"], &tokenizer, &params)
                .unwrap();

        let words: Vec<_> = model.words().collect();
        assert_eq!(words, ["ham", "spam"]);
    }

    #[test]
    fn test_empty_vocabulary_is_unavailable() {
        let tokenizer = Tokenizer::default();
        let params = EmbeddingParams {
            min_word_frequency: 10,
            ..small_params()
        };

        let result = EmbeddingModel::build(["just once"], &tokenizer, &params);
        assert!(matches!(result, Err(Error::ModelUnavailable(_))));

        let result = EmbeddingModel::build(std::iter::empty(), &tokenizer, &small_params());
        assert!(matches!(result, Err(Error::ModelUnavailable(_))));
    }

    #[test]
    fn test_build_is_deterministic() {
        let tokenizer = Tokenizer::default();
        let corpus = ReferenceCorpus::default();
        let params = EmbeddingParams::default();

        let first = EmbeddingModel::build(corpus.all_sentences(), &tokenizer, &params).unwrap();
        let second = EmbeddingModel::build(corpus.all_sentences(), &tokenizer, &params).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_seed_changes_vectors() {
        let tokenizer = Tokenizer::default();
        let corpus = ReferenceCorpus::default();
        let other_seed = EmbeddingParams {
            seed: 7,
            ..Default::default()
        };

        let first =
            EmbeddingModel::build(corpus.all_sentences(), &tokenizer, &Default::default())
                .unwrap();
        let second = EmbeddingModel::build(corpus.all_sentences(), &tokenizer, &other_seed)
            .unwrap();

        assert_ne!(first.vector("cheap"), second.vector("cheap"));
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let tokenizer = Tokenizer::default();
        let corpus = ReferenceCorpus::default();
        let model =
            EmbeddingModel::build(corpus.all_sentences(), &tokenizer, &Default::default())
                .unwrap();

        for word in model.words() {
            let norm = model.vector(word).unwrap().norm();
            assert!((norm - 1.0).abs() < 1e-4, "{} has norm {}", word, norm);
        }
    }

    #[test]
    fn test_cooccurring_words_are_closer() {
        let tokenizer = Tokenizer::default();
        let corpus = ReferenceCorpus::default();
        let model =
            EmbeddingModel::build(corpus.all_sentences(), &tokenizer, &Default::default())
                .unwrap();

        let buy = model.vector("buy").unwrap();
        let cheap = model.vector("cheap").unwrap();
        let explanation = model.vector("explanation").unwrap();

        let related = cosine_similarity(buy, cheap).unwrap();
        let unrelated = cosine_similarity(buy, explanation).unwrap();
        assert!(
            related > unrelated,
            "buy/cheap {} should exceed buy/explanation {}",
            related,
            unrelated
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let tokenizer = Tokenizer::default();
        let params = small_params();

        let model =
            EmbeddingModel::build(["click here to win", "thanks for the video"], &tokenizer, &params)
                .unwrap();
        model.save(&path).unwrap();

        let loaded = EmbeddingModel::load(&path, &params, model.fingerprint()).unwrap();
        assert_eq!(loaded.vocab_size(), model.vocab_size());
        for word in model.words() {
            let a = model.vector(word).unwrap().as_slice();
            let b = loaded.vector(word).unwrap().as_slice();
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_load_rejects_changed_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let tokenizer = Tokenizer::default();

        let model = EmbeddingModel::build(["alpha beta"], &tokenizer, &small_params()).unwrap();
        model.save(&path).unwrap();

        let wider = EmbeddingParams {
            vector_size: 32,
            ..small_params()
        };
        assert!(matches!(
            EmbeddingModel::load(&path, &wider, model.fingerprint()),
            Err(Error::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_load_rejects_changed_training_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let tokenizer = Tokenizer::default();

        let model = EmbeddingModel::build(["alpha beta"], &tokenizer, &small_params()).unwrap();
        model.save(&path).unwrap();

        let other_corpus = training_fingerprint(["alpha gamma"], &tokenizer);
        assert!(matches!(
            EmbeddingModel::load(&path, &small_params(), &other_corpus),
            Err(Error::ModelUnavailable(_))
        ));

        let with_stopwords = Tokenizer::new(["beta"]).unwrap();
        let other_stopwords = training_fingerprint(["alpha beta"], &with_stopwords);
        assert!(matches!(
            EmbeddingModel::load(&path, &small_params(), &other_stopwords),
            Err(Error::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_fingerprint_tracks_sentences_and_stopwords() {
        let plain = Tokenizer::default();
        let base = training_fingerprint(["alpha beta", "gamma"], &plain);

        assert_eq!(base, training_fingerprint(["alpha beta", "gamma"], &plain));
        assert_ne!(base, training_fingerprint(["alpha", "beta gamma"], &plain));
        assert_ne!(base, training_fingerprint(["gamma", "alpha beta"], &plain));

        let reordered = Tokenizer::new(["b", "a"]).unwrap();
        let sorted = Tokenizer::new(["a", "b"]).unwrap();
        assert_ne!(base, training_fingerprint(["alpha beta", "gamma"], &sorted));
        assert_eq!(
            training_fingerprint(["alpha beta", "gamma"], &reordered),
            training_fingerprint(["alpha beta", "gamma"], &sorted)
        );
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            EmbeddingModel::load(&missing, &small_params(), ""),
            Err(Error::Io(_))
        ));

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "not a model").unwrap();
        assert!(matches!(
            EmbeddingModel::load(&corrupt, &small_params(), ""),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_or_build_trains_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let tokenizer = Tokenizer::default();
        let corpus = ReferenceCorpus::default();
        let params = small_params();

        let trained =
            EmbeddingModel::load_or_build(&corpus, &tokenizer, &params, Some(&path)).unwrap();
        assert!(path.exists());

        let reloaded =
            EmbeddingModel::load_or_build(&corpus, &tokenizer, &params, Some(&path)).unwrap();
        assert_eq!(reloaded.vocab_size(), trained.vocab_size());
    }

    #[test]
    fn test_load_or_build_recovers_from_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let tokenizer = Tokenizer::default();
        let corpus = ReferenceCorpus::default();
        let params = small_params();

        let model =
            EmbeddingModel::load_or_build(&corpus, &tokenizer, &params, Some(&path)).unwrap();
        assert!(model.has_word("giveaway"));

        // The corrupt artifact was replaced by the retrained model
        assert!(EmbeddingModel::load(&path, &params, model.fingerprint()).is_ok());
    }

    #[test]
    fn test_load_or_build_retrains_after_stopword_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let corpus = ReferenceCorpus::default();
        let params = small_params();

        let filtered = Tokenizer::new(["the", "for"]).unwrap();
        let first =
            EmbeddingModel::load_or_build(&corpus, &filtered, &params, Some(&path)).unwrap();
        assert!(!first.has_word("the"));

        let unfiltered = Tokenizer::default();
        let second =
            EmbeddingModel::load_or_build(&corpus, &unfiltered, &params, Some(&path)).unwrap();
        assert!(second.has_word("the"));
        assert_ne!(first.fingerprint(), second.fingerprint());

        // The retrained model now owns the artifact
        assert!(EmbeddingModel::load(&path, &params, second.fingerprint()).is_ok());
    }

    #[test]
    fn test_load_or_build_retrains_after_corpus_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let tokenizer = Tokenizer::default();
        let params = small_params();

        EmbeddingModel::load_or_build(&ReferenceCorpus::default(), &tokenizer, &params, Some(&path))
            .unwrap();

        let custom = ReferenceCorpus::new(
            vec!["zebra promo deal".to_string()],
            vec!["lovely tutorial".to_string()],
        )
        .unwrap();
        let model = EmbeddingModel::load_or_build(&custom, &tokenizer, &params, Some(&path)).unwrap();

        assert!(model.has_word("zebra"));
        assert_eq!(model.vocab_size(), 5);
    }
}
