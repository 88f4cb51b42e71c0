//! Fixed-length word vectors and cosine similarity

use serde::{Deserialize, Serialize};
use triage_core::{Error, Result};

/// Fixed-length dense vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordVector(Vec<f32>);

impl WordVector {
    /// All-zero vector of the given dimensionality
    pub fn zeros(dimensions: usize) -> Self {
        Self(vec![0.0; dimensions])
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Whether every component is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| *x == 0.0)
    }

    /// Euclidean magnitude
    pub fn norm(&self) -> f32 {
        self.0
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt() as f32
    }

    /// Dot product; both vectors must share a dimensionality
    pub fn dot(&self, other: &WordVector) -> Result<f32> {
        self.check_dimensions(other)?;
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| f64::from(*a) * f64::from(*b))
            .sum::<f64>() as f32)
    }

    /// Element-wise `self += other`
    pub fn add_assign(&mut self, other: &WordVector) -> Result<()> {
        self.add_scaled(other, 1.0)
    }

    /// Element-wise `self += weight * other`
    pub fn add_scaled(&mut self, other: &WordVector, weight: f32) -> Result<()> {
        self.check_dimensions(other)?;
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a += weight * b;
        }
        Ok(())
    }

    /// Multiply every component by `factor`
    pub fn scale(&mut self, factor: f32) {
        for x in &mut self.0 {
            *x *= factor;
        }
    }

    /// Rescale to unit length; the zero vector stays zero
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            self.scale(1.0 / norm);
        }
    }

    fn check_dimensions(&self, other: &WordVector) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::embedding(format!(
                "dimension mismatch: {} vs {}",
                self.dimensions(),
                other.dimensions()
            )));
        }
        Ok(())
    }
}

impl From<Vec<f32>> for WordVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Cosine of the angle between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude, and is clamped to
/// [-1, 1] against rounding error.
pub fn cosine_similarity(a: &WordVector, b: &WordVector) -> Result<f32> {
    let dot = a.dot(b)?;
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
