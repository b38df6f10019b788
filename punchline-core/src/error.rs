//! Error types for Punchline operations

/// Result type for Punchline operations
pub type Result<T> = std::result::Result<T, PunchlineError>;

/// Error types for the scoring core and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum PunchlineError {
    /// An agent looked up an encoding it never received
    #[error("Missing encoding key '{key}' for agent '{agent}'")]
    MissingEncodingKey {
        /// Agent that requested the lookup
        agent: String,
        /// Encoding name that was absent
        key: String,
    },

    /// Encodings of one agent disagree on their key sets
    #[error("Inconsistent encoding keys for agent '{agent}': {detail}")]
    InconsistentEncodingKeys {
        /// Agent whose encodings disagree
        agent: String,
        /// Which maps disagree and how
        detail: String,
    },

    /// A required collection was empty
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// Normalization produced a zero or non-finite sum
    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// Embedding provider failure
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Deck loading or dealing error
    #[error("Deck error: {0}")]
    Deck(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for PunchlineError {
    fn from(s: String) -> Self {
        PunchlineError::Other(s)
    }
}

impl From<&str> for PunchlineError {
    fn from(s: &str) -> Self {
        PunchlineError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for PunchlineError {
    fn from(err: anyhow::Error) -> Self {
        PunchlineError::Other(err.to_string())
    }
}
