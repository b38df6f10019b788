//! Cross-call embedding cache.
//!
//! Providers are deterministic per string, so vectors can be kept for the
//! lifetime of the cache without invalidation. Only texts never seen before
//! are forwarded to the inner provider, in a single batched call.

use crate::embeddings::EmbeddingProvider;
use crate::error::{PunchlineError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Embedding provider wrapper that remembers every vector it has produced
pub struct CachedEmbeddings<P> {
    inner: P,
    vectors: Mutex<HashMap<String, Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachedEmbeddings<P> {
    /// Wrap a provider with an empty cache
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            vectors: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached texts
    pub fn len(&self) -> usize {
        self.vectors.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached vector
    pub fn clear(&self) {
        if let Ok(mut vectors) = self.vectors.lock() {
            vectors.clear();
        }
    }

    /// Access the wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbeddings<P> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = self.vectors.lock().map_err(|e| {
            PunchlineError::Embedding(format!("Failed to lock embedding cache: {}", e))
        })?;

        let mut seen = HashSet::new();
        let misses: Vec<&str> = texts
            .iter()
            .copied()
            .filter(|text| !vectors.contains_key(*text) && seen.insert(*text))
            .collect();

        if !misses.is_empty() {
            let fresh = self.inner.embed_batch(&misses)?;
            if fresh.len() != misses.len() {
                return Err(PunchlineError::Embedding(format!(
                    "Provider returned {} vectors for {} texts",
                    fresh.len(),
                    misses.len()
                )));
            }
            for (text, vector) in misses.iter().zip(fresh) {
                vectors.insert((*text).to_string(), vector);
            }
        }

        tracing::debug!(
            requested = texts.len(),
            computed = misses.len(),
            cached = vectors.len(),
            "Embedding cache lookup"
        );

        texts
            .iter()
            .map(|text| {
                vectors.get(*text).cloned().ok_or_else(|| {
                    PunchlineError::Embedding(format!("No cached vector for '{}'", text))
                })
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
