//! Sentence vectorization by averaging word vectors

use crate::embedding::EmbeddingModel;
use crate::tokenizer::Tokenizer;
use crate::vector::WordVector;
use std::sync::Arc;
use triage_core::Result;

/// Reduces a text to a single fixed-size vector
pub trait TextEmbedder: Send + Sync {
    /// Dimensionality of produced vectors
    fn dimensions(&self) -> usize;

    /// Vectorize a text
    fn embed(&self, text: &str) -> Result<WordVector>;
}

/// Mean of the in-vocabulary word vectors of a text
#[derive(Debug, Clone)]
pub struct TextVectorizer {
    model: Arc<EmbeddingModel>,
    tokenizer: Arc<Tokenizer>,
}

impl TextVectorizer {
    pub fn new(model: Arc<EmbeddingModel>, tokenizer: Arc<Tokenizer>) -> Self {
        Self { model, tokenizer }
    }

    /// Element-wise mean of the vectors of known tokens.
    ///
    /// Unknown tokens are skipped and do not count towards the mean. Empty
    /// or entirely unknown text yields the zero vector.
    pub fn vectorize(&self, text: &str) -> Result<WordVector> {
        let mut sum = WordVector::zeros(self.model.dimensions());
        let mut count = 0usize;

        for token in self.tokenizer.tokenize(text) {
            if let Some(vector) = self.model.vector(&token) {
                sum.add_assign(vector)?;
                count += 1;
            }
        }

        if count > 0 {
            sum.scale(1.0 / count as f32);
        }

        Ok(sum)
    }

    pub fn model(&self) -> &Arc<EmbeddingModel> {
        &self.model
    }
}

impl TextEmbedder for TextVectorizer {
    fn dimensions(&self) -> usize {
        self.model.dimensions()
    }

    fn embed(&self, text: &str) -> Result<WordVector> {
        self.vectorize(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingParams;

    fn vectorizer() -> TextVectorizer {
        let tokenizer = Arc::new(Tokenizer::default());
        let params = EmbeddingParams {
            vector_size: 8,
            ..Default::default()
        };
        let model =
            EmbeddingModel::build(["alpha beta", "gamma delta"], &tokenizer, &params).unwrap();
        TextVectorizer::new(Arc::new(model), tokenizer)
    }

    #[test]
    fn test_empty_and_unknown_text_is_zero() {
        let vectorizer = vectorizer();

        for text in ["", "   ", "unknown words only", "?!"] {
            let vector = vectorizer.vectorize(text).unwrap();
            assert_eq!(vector.dimensions(), 8);
            assert!(vector.is_zero(), "{:?} should vectorize to zero", text);
        }
    }

    #[test]
    fn test_single_known_word_returns_its_vector() {
        let vectorizer = vectorizer();
        let expected = vectorizer.model().vector("alpha").unwrap().clone();

        assert_eq!(vectorizer.vectorize("ALPHA!").unwrap(), expected);
    }

    #[test]
    fn test_unknown_tokens_do_not_dilute_mean() {
        let vectorizer = vectorizer();

        let known = vectorizer.vectorize("alpha gamma").unwrap();
        let mixed = vectorizer.vectorize("alpha zzz gamma qqq").unwrap();

        assert_eq!(known, mixed);
    }

    #[test]
    fn test_mean_of_two_words() {
        let vectorizer = vectorizer();
        let model = vectorizer.model().clone();
        let alpha = model.vector("alpha").unwrap().as_slice();
        let delta = model.vector("delta").unwrap().as_slice();

        let mean = vectorizer.embed("alpha delta").unwrap();
        for ((m, a), d) in mean.as_slice().iter().zip(alpha).zip(delta) {
            assert!((m - (a + d) / 2.0).abs() < 1e-6);
        }
    }
}
