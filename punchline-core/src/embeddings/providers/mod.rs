//! Embedding provider implementations

use crate::error::Result;

/// Trait for embedding provider implementations.
///
/// Providers are deterministic per process and order-preserving. Calls block
/// until the vectors are available.
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts.
    ///
    /// # Arguments
    ///
    /// * `texts` - Slice of texts to embed
    ///
    /// # Returns
    ///
    /// Vector of embeddings, one per input text, in input order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| {
                crate::error::PunchlineError::Embedding(
                    "Embedding generation returned empty result".to_string(),
                )
            })
    }

    /// Get the dimension of embeddings produced by this provider.
    fn dimension(&self) -> usize;
}

pub mod hashing;

pub use hashing::HashingEmbeddings;

#[cfg(feature = "embeddings-local")]
pub mod local;

#[cfg(feature = "embeddings-local")]
pub use local::LocalEmbeddings;
