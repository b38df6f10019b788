//! Local sentence-embedding provider using fastembed

use crate::error::{PunchlineError, Result};
use std::sync::Mutex;

use super::EmbeddingProvider;

/// Local embedding provider using fastembed (runs in-process, no API needed).
pub struct LocalEmbeddings {
    model: Mutex<fastembed::TextEmbedding>,
    dimension: usize,
}

impl LocalEmbeddings {
    /// Create a new local embeddings provider with the specified model.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model (e.g., "all-MiniLM-L6-v2")
    ///
    /// # Errors
    ///
    /// Returns an error if the model name is unknown or the model cannot be loaded.
    pub fn new(model_name: impl Into<String>) -> Result<Self> {
        let model_name = model_name.into();
        let (embedding_model, dimension) = resolve_model(&model_name)?;

        // InitOptions is non-exhaustive, so we can't use struct literal syntax
        let mut init_options = fastembed::InitOptions::default();
        init_options.model_name = embedding_model;

        let model = fastembed::TextEmbedding::try_new(init_options).map_err(|e| {
            PunchlineError::Configuration(format!(
                "Failed to load embedding model '{}': {}",
                model_name, e
            ))
        })?;

        tracing::debug!(model = %model_name, dimension, "Loaded local embedding model");

        Ok(Self {
            model: Mutex::new(model),
            dimension,
        })
    }
}

fn resolve_model(name: &str) -> Result<(fastembed::EmbeddingModel, usize)> {
    use fastembed::EmbeddingModel;

    let resolved = match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" | "all_minilm_l6_v2" => (EmbeddingModel::AllMiniLML6V2, 384),
        "all-minilm-l12-v2" | "all_minilm_l12_v2" => (EmbeddingModel::AllMiniLML12V2, 384),
        "bge-small-en-v1.5" | "bge_small_en_v15" => (EmbeddingModel::BGESmallENV15, 384),
        "bge-base-en-v1.5" | "bge_base_en_v15" => (EmbeddingModel::BGEBaseENV15, 768),
        "bge-large-en-v1.5" | "bge_large_en_v15" => (EmbeddingModel::BGELargeENV15, 1024),
        _ => {
            let model = EmbeddingModel::try_from(name.to_string()).map_err(|e| {
                PunchlineError::Configuration(format!(
                    "Invalid model name '{}'. Supported: all-MiniLM-L6-v2, all-MiniLM-L12-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5. Error: {}",
                    name, e
                ))
            })?;
            let dimension = fastembed::TextEmbedding::get_model_info(&model)
                .map(|info| info.dim)
                .map_err(|e| PunchlineError::Configuration(e.to_string()))?;
            (model, dimension)
        }
    };
    Ok(resolved)
}

impl EmbeddingProvider for LocalEmbeddings {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let texts: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        let mut model = self.model.lock().map_err(|e| {
            PunchlineError::Embedding(format!("Failed to lock embedding model: {}", e))
        })?;

        model.embed(texts, None).map_err(|e| {
            PunchlineError::Embedding(format!("Failed to generate batch embeddings: {}", e))
        })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
