//! Factory for creating embedding providers from configuration

use crate::config::{EmbeddingProviderKind, EmbeddingsConfig};
use crate::embeddings::cache::CachedEmbeddings;
use crate::embeddings::providers::{EmbeddingProvider, HashingEmbeddings};
use crate::error::Result;
use std::sync::Arc;

#[cfg(feature = "embeddings-local")]
use crate::embeddings::providers::local::LocalEmbeddings;

/// Factory for creating embedding providers
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create an embedding provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created
    pub fn create(config: &EmbeddingsConfig) -> Result<Arc<dyn EmbeddingProvider>> {
        tracing::info!(
            provider = ?config.provider,
            model = %config.model,
            dimension = config.dimension,
            cache = config.cache,
            "Creating embedding provider"
        );

        match config.provider {
            #[cfg(feature = "embeddings-local")]
            EmbeddingProviderKind::Local => {
                let provider = LocalEmbeddings::new(config.model.clone())?;
                if provider.dimension() != config.dimension {
                    tracing::warn!(
                        model = %config.model,
                        configured = config.dimension,
                        actual = provider.dimension(),
                        "Configured dimension ignored; using the model's own"
                    );
                }
                Ok(Self::wrap(provider, config.cache))
            }

            #[cfg(not(feature = "embeddings-local"))]
            EmbeddingProviderKind::Local => Err(crate::error::PunchlineError::Configuration(
                "Local embeddings require 'embeddings-local' feature".to_string(),
            )),

            EmbeddingProviderKind::Hashing => {
                let provider = HashingEmbeddings::new(config.dimension)?;
                Ok(Self::wrap(provider, config.cache))
            }
        }
    }

    fn wrap<P: EmbeddingProvider + 'static>(
        provider: P,
        cache: bool,
    ) -> Arc<dyn EmbeddingProvider> {
        if cache {
            Arc::new(CachedEmbeddings::new(provider))
        } else {
            Arc::new(provider)
        }
    }
}
