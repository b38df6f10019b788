//! Scorer: the entry point that runs agents against a prompt.
//!
//! A scoring round asks each agent which strings it wants embedded,
//! embeds the union once through [`EmbeddingBatch`], and hands every agent
//! its own vectors to score or judge with. Nothing is kept between rounds
//! unless the provider itself caches (see
//! [`CachedEmbeddings`](crate::embeddings::CachedEmbeddings)).

pub mod batch;

pub use batch::{AgentRequest, AgentVectors, EmbeddingBatch};

use crate::agent::Agent;
use crate::config::EmbeddingsConfig;
use crate::embeddings::{EmbeddingProvider, EmbeddingProviderFactory};
use crate::error::{PunchlineError, Result};
use crate::math;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tolerance for a score row to count as a probability distribution
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Probabilities per agent (rows) and answer (columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMatrix(Vec<Vec<f64>>);

impl ScoreMatrix {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    pub fn row(&self, agent: usize) -> Option<&[f64]> {
        self.0.get(agent).map(Vec::as_slice)
    }

    /// `(agents, answers)`
    pub fn shape(&self) -> (usize, usize) {
        (self.0.len(), self.0.first().map_or(0, Vec::len))
    }

    /// Most probable answer for one agent, first occurrence on ties
    pub fn argmax(&self, agent: usize) -> Option<usize> {
        self.row(agent).and_then(math::argmax)
    }

    pub fn into_inner(self) -> Vec<Vec<f64>> {
        self.0
    }
}

impl From<ScoreMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ScoreMatrix) -> Self {
        matrix.0
    }
}

/// Runs scoring rounds against an embedding provider
#[derive(Clone)]
pub struct Scorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl Scorer {
    /// Create a scorer over an existing provider
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Create a scorer with a provider built from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created
    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self> {
        Ok(Self::new(EmbeddingProviderFactory::create(config)?))
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Probability of every answer for every agent.
    ///
    /// All agents share one embedding batch. Row `i` belongs to
    /// `agents[i]`; column `j` to `answers[j]`.
    ///
    /// # Errors
    ///
    /// - [`PunchlineError::EmptyInput`] when `agents` or `answers` is empty
    /// - [`PunchlineError::InconsistentEncodingKeys`] /
    ///   [`PunchlineError::MissingEncodingKey`] for malformed encodings
    /// - [`PunchlineError::DegenerateDistribution`] when a row cannot be
    ///   normalized or is not a distribution
    /// - provider failures, unchanged
    pub fn scores<S: AsRef<str>>(
        &self,
        prompt: &str,
        agents: &[&dyn Agent],
        answers: &[S],
    ) -> Result<ScoreMatrix> {
        if agents.is_empty() {
            return Err(PunchlineError::EmptyInput("agents"));
        }
        if answers.is_empty() {
            return Err(PunchlineError::EmptyInput("answers"));
        }

        let batch = EmbeddingBatch::collect(prompt, agents, answers)?;
        let vectors = batch.embed(self.provider.as_ref())?;

        let rows = agents
            .iter()
            .zip(&vectors)
            .map(|(agent, vectors)| {
                let row = agent.score_answers(&vectors.prompt, &vectors.answers)?;
                check_distribution(agent.name(), &row, answers.len())?;
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ScoreMatrix(rows))
    }

    /// Let a single agent judge the answers.
    ///
    /// Runs the same encode and embed pipeline as [`scores`](Self::scores)
    /// for one agent and returns its choice, an index into `answers`.
    ///
    /// # Errors
    ///
    /// Same as [`scores`](Self::scores); additionally fails if the agent
    /// returns an index out of range.
    pub fn choose<S: AsRef<str>>(
        &self,
        prompt: &str,
        agent: &dyn Agent,
        answers: &[S],
    ) -> Result<usize> {
        if answers.is_empty() {
            return Err(PunchlineError::EmptyInput("answers"));
        }

        let batch = EmbeddingBatch::collect(prompt, &[agent], answers)?;
        let vectors = batch.embed(self.provider.as_ref())?;
        let vectors = vectors
            .into_iter()
            .next()
            .ok_or(PunchlineError::EmptyInput("agents"))?;

        let choice = agent.choose_answer(&vectors.prompt, &vectors.answers)?;
        if choice >= answers.len() {
            return Err(PunchlineError::Other(format!(
                "agent '{}' chose answer {} of {}",
                agent.name(),
                choice,
                answers.len()
            )));
        }
        Ok(choice)
    }
}

fn check_distribution(agent: &str, row: &[f64], answers: usize) -> Result<()> {
    if row.len() != answers {
        return Err(PunchlineError::DegenerateDistribution(format!(
            "agent '{}' returned {} scores for {} answers",
            agent,
            row.len(),
            answers
        )));
    }
    if let Some(bad) = row.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(PunchlineError::DegenerateDistribution(format!(
            "agent '{}' returned probability {}",
            agent, bad
        )));
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
        return Err(PunchlineError::DegenerateDistribution(format!(
            "agent '{}' probabilities sum to {}",
            agent, sum
        )));
    }
    Ok(())
}
