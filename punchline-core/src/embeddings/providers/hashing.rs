//! Deterministic feature-hashing embeddings.
//!
//! Words and adjacent word pairs are hashed with SHA-256 into signed buckets
//! of a fixed-length vector, which is then L2-normalized. Texts sharing
//! vocabulary get a positive dot product. No model download is needed,
//! which makes this provider suitable for offline runs and tests.

use crate::error::{PunchlineError, Result};
use sha2::{Digest, Sha256};

use super::EmbeddingProvider;

const BIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedding provider
#[derive(Debug, Clone)]
pub struct HashingEmbeddings {
    dimension: usize,
}

impl HashingEmbeddings {
    /// Create a provider producing vectors of `dimension` components.
    ///
    /// # Errors
    ///
    /// Returns an error if `dimension` is zero.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(PunchlineError::Configuration(
                "Hashing embeddings need a positive dimension".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let tokens = tokenize(text);

        for token in &tokens {
            self.accumulate(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            let feature = format!("{} {}", pair[0], pair[1]);
            self.accumulate(&mut vector, &feature, BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl EmbeddingProvider for HashingEmbeddings {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_deterministic_and_normalized() {
        let provider = HashingEmbeddings::new(64).unwrap();
        let a = provider.embed("Why did the chicken cross the road?").unwrap();
        let b = provider.embed("Why did the chicken cross the road?").unwrap();

        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let provider = HashingEmbeddings::new(128).unwrap();
        let vectors = provider
            .embed_batch(&["Racism.", "racism", "RACISM!"])
            .unwrap();

        assert_eq!(vectors[0], vectors[1]);
        assert_eq!(vectors[1], vectors[2]);
    }

    #[test]
    fn test_shared_words_are_closer() {
        let provider = HashingEmbeddings::new(384).unwrap();
        let vectors = provider
            .embed_batch(&[
                "the chicken crossed the road",
                "a chicken on the road",
                "quantum chromodynamics lecture",
            ])
            .unwrap();

        assert!(dot(&vectors[0], &vectors[1]) > dot(&vectors[0], &vectors[2]));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let provider = HashingEmbeddings::new(16).unwrap();
        let vector = provider.embed("").unwrap();
        assert!(vector.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingEmbeddings::new(0).is_err());
    }
}
