//! Embedding provider implementations for turning text into vectors.
//!
//! The scoring core only relies on [`EmbeddingProvider::embed_batch`]:
//! one vector per input string, same order, fixed dimension.

pub mod cache;
pub mod factory;
pub mod providers;

pub use cache::CachedEmbeddings;
pub use factory::EmbeddingProviderFactory;
pub use providers::{EmbeddingProvider, HashingEmbeddings};

#[cfg(feature = "embeddings-local")]
pub use providers::LocalEmbeddings;

pub mod prelude {
    pub use crate::embeddings::{CachedEmbeddings, EmbeddingProvider, HashingEmbeddings};
    #[cfg(feature = "embeddings-local")]
    pub use crate::embeddings::providers::LocalEmbeddings;
}
