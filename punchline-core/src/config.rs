//! Configuration types for Punchline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for Punchline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PunchlineConfig {
    /// Embedding provider configuration
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Card deck configuration
    #[serde(default)]
    pub deck: DeckConfig,

    /// Game simulation configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Embedding provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Sentence-embedding model running in-process (fastembed)
    Local,
    /// Deterministic feature-hashing embeddings, no model download
    #[default]
    Hashing,
}

/// Embeddings configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Provider type
    #[serde(default)]
    pub provider: EmbeddingProviderKind,

    /// Model name (local provider)
    #[serde(default = "default_model")]
    pub model: String,

    /// Vector dimension (hashing provider)
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Keep vectors across scoring calls, keyed by exact text
    #[serde(default)]
    pub cache: bool,
}

fn default_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_dimension() -> usize {
    384
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: default_model(),
            dimension: default_dimension(),
            cache: false,
        }
    }
}

/// Card deck configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeckConfig {
    /// Path to a compact card file (`.json` or `.json.gz`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Game simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Cards held by each player
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,

    /// Stop after this many rounds (default: play until prompts run out)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,

    /// RNG seed for shuffling and sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_hand_size() -> usize {
    7
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hand_size: default_hand_size(),
            max_rounds: None,
            seed: None,
        }
    }
}

impl PunchlineConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (punchline.toml, then PUNCHLINE_CONFIG_PATH if set)
    /// 3. Environment variable overrides (`PUNCHLINE_EMBEDDINGS__PROVIDER=local`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid.
    pub fn load() -> crate::error::Result<Self> {
        Self::extract(Self::layered(None))
    }

    /// Like [`load`](Self::load), with `path` layered after the other
    /// configuration files and before environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or any layer is invalid.
    pub fn load_with(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::error::PunchlineError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        Self::extract(Self::layered(Some(path)))
    }

    fn layered(extra: Option<&std::path::Path>) -> figment::Figment {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(PunchlineConfig::default()))
            .merge(Toml::file("punchline.toml"));

        if let Ok(path) = std::env::var("PUNCHLINE_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed("PUNCHLINE_")
                .ignore(&["CONFIG_PATH"])
                .split("__"),
        )
    }

    fn extract(figment: figment::Figment) -> crate::error::Result<Self> {
        let config: PunchlineConfig = figment.extract().map_err(|e| {
            crate::error::PunchlineError::Configuration(format!(
                "Failed to load configuration: {}",
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::error::PunchlineError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: PunchlineConfig =
            Figment::from(Serialized::defaults(PunchlineConfig::default()))
                .merge(Toml::file(path))
                .extract()
                .map_err(|e| {
                    crate::error::PunchlineError::Configuration(format!(
                        "Failed to load configuration file: {}",
                        e
                    ))
                })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.embeddings.model.trim().is_empty() {
            return Err(crate::error::PunchlineError::Configuration(
                "embeddings.model must not be empty".to_string(),
            ));
        }
        if self.embeddings.dimension == 0 {
            return Err(crate::error::PunchlineError::Configuration(
                "embeddings.dimension must be positive".to_string(),
            ));
        }
        if self.simulation.hand_size == 0 {
            return Err(crate::error::PunchlineError::Configuration(
                "simulation.hand_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
