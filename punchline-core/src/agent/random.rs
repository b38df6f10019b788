//! Uniform-random baseline agent

use super::{Agent, EncodingMap, VectorMap};
use crate::error::{PunchlineError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Agent with no preferences: every answer is equally likely.
///
/// Requests no embeddings. When judging, picks a uniformly random index.
pub struct RandomAgent {
    name: String,
    rng: Mutex<StdRng>,
}

impl RandomAgent {
    /// Create an agent seeded from system entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create an agent with a reproducible judging sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            name: "random".to_string(),
            rng: Mutex::new(rng),
        }
    }

    /// Override the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode_prompt(&self, _prompt: &str) -> EncodingMap {
        EncodingMap::new()
    }

    fn encode_answer(&self, _answer: &str) -> EncodingMap {
        EncodingMap::new()
    }

    fn score_answers(&self, _prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>> {
        if answers.is_empty() {
            return Err(PunchlineError::EmptyInput("answers"));
        }
        let p = 1.0 / answers.len() as f64;
        Ok(vec![p; answers.len()])
    }

    fn choose_answer(&self, _prompt: &VectorMap, answers: &[VectorMap]) -> Result<usize> {
        if answers.is_empty() {
            return Err(PunchlineError::EmptyInput("answers"));
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| PunchlineError::Other(format!("Failed to lock agent RNG: {}", e)))?;
        Ok(rng.gen_range(0..answers.len()))
    }
}
