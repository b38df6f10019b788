//! # Punchline - personality-driven answer scoring
//!
//! Punchline models the decisions in a card-matching party game: given a
//! prompt and a set of candidate answers, it estimates how well each answer
//! fits a synthetic personality, and can act as the judge that picks a
//! single winner.
//!
//! - **Agents** describe which strings they want embedded and turn the
//!   resulting vectors into a probability per answer
//! - **Embedding providers** turn text into fixed-length vectors
//! - **The scorer** embeds every string requested by every agent in one
//!   deduplicated batch, then lets each agent score or judge
//!
//! ## Quick Start
//!
//! ```rust
//! use punchline_core::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let scorer = Scorer::new(Arc::new(HashingEmbeddings::new(384)?));
//!
//!     let frat_boy = PersonalityAgent::new("a college frat boy").with_power(5.0);
//!     let baseline = RandomAgent::new();
//!     let answers = ["To get to the other side.", "Racism."];
//!
//!     let matrix = scorer.scores(
//!         "Why did the chicken cross the road?",
//!         &[&frat_boy, &baseline],
//!         &answers,
//!     )?;
//!     assert_eq!(matrix.shape(), (2, 2));
//!     assert_eq!(matrix.rows()[1], vec![0.5, 0.5]);
//!
//!     let winner = scorer.choose("Why did the chicken cross the road?", &frat_boy, &answers)?;
//!     assert!(winner < answers.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `embeddings-local`: in-process sentence-embedding models via fastembed

pub mod agent;
pub mod config;
pub mod deck;
pub mod embeddings;
pub mod error;
pub mod game;
pub mod math;
pub mod scorer;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::{
        Agent, AgentSpec, EncodingMap, LexicographicAgent, PersonalityAgent, RandomAgent, Vector,
        VectorMap,
    };
    pub use crate::config::{
        DeckConfig, EmbeddingProviderKind, EmbeddingsConfig, PunchlineConfig, SimulationConfig,
    };
    pub use crate::deck::{Deck, Prompt};
    pub use crate::embeddings::{
        CachedEmbeddings, EmbeddingProvider, EmbeddingProviderFactory, HashingEmbeddings,
    };
    pub use crate::error::{PunchlineError, Result};
    pub use crate::game::{GameSummary, RoundOutcome, Simulation, answer_combinations};
    pub use crate::scorer::{EmbeddingBatch, ScoreMatrix, Scorer};

    #[cfg(feature = "embeddings-local")]
    pub use crate::embeddings::LocalEmbeddings;
}
