//! Agents: policies that turn embedded text into judgments over answers.
//!
//! An agent takes part in a scoring round in two phases. First it names
//! the strings it wants embedded, once for the prompt and once per answer,
//! as an [`EncodingMap`] from encoding name to text. The scorer embeds the
//! union of every requested string and hands each agent back a
//! [`VectorMap`] with the same keys. Second, the agent turns those vectors
//! into a probability per answer, or picks a single winner when judging.
//!
//! Keys carry a semantic role: an agent that compares its prompt's
//! `"generic"` vector against each answer's `"generic"` vector relies on
//! every answer map using that key for the same purpose.

use crate::error::{PunchlineError, Result};
use crate::math;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod lexicographic;
pub mod personality;
pub mod random;
pub mod spec;

pub use lexicographic::LexicographicAgent;
pub use personality::PersonalityAgent;
pub use random::RandomAgent;
pub use spec::AgentSpec;

/// Immutable embedding vector, shared by every agent that requested its text
pub type Vector = Arc<[f32]>;

/// Encoding name -> text to embed
pub type EncodingMap = BTreeMap<String, String>;

/// Encoding name -> embedding of the requested text
pub type VectorMap = BTreeMap<String, Vector>;

/// A personality that scores candidate answers to a prompt.
///
/// # Example
///
/// ```rust
/// use punchline_core::agent::{Agent, RandomAgent, VectorMap};
///
/// let agent = RandomAgent::with_seed(7);
/// assert!(agent.encode_prompt("Why?").is_empty());
///
/// let answers = vec![VectorMap::new(); 4];
/// let probs = agent.score_answers(&VectorMap::new(), &answers).unwrap();
/// assert_eq!(probs, vec![0.25; 4]);
/// ```
pub trait Agent: Send + Sync {
    /// Human-readable name used in logs and errors
    fn name(&self) -> &str;

    /// Name the strings to embed for a prompt
    fn encode_prompt(&self, prompt: &str) -> EncodingMap;

    /// Name the strings to embed for one answer
    fn encode_answer(&self, answer: &str) -> EncodingMap;

    /// Probability of each answer, in input order, summing to 1.
    ///
    /// `prompt` and each entry of `answers` carry exactly the keys returned
    /// by [`encode_prompt`](Agent::encode_prompt) and
    /// [`encode_answer`](Agent::encode_answer).
    fn score_answers(&self, prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>>;

    /// Index of the single best answer when acting as judge.
    ///
    /// Defaults to the most probable answer from
    /// [`score_answers`](Agent::score_answers), first occurrence on ties.
    fn choose_answer(&self, prompt: &VectorMap, answers: &[VectorMap]) -> Result<usize> {
        let scores = self.score_answers(prompt, answers)?;
        math::argmax(&scores).ok_or_else(|| {
            PunchlineError::DegenerateDistribution(format!(
                "agent '{}' produced no comparable score",
                self.name()
            ))
        })
    }

    /// Whether every answer encoding of this agent uses the same key set.
    ///
    /// When true, the scorer rejects a round in which answer maps disagree
    /// before any embedding is computed. Agents keying encodings by literal
    /// text opt out.
    fn uniform_answer_keys(&self) -> bool {
        true
    }
}

/// Look up a named vector, failing with [`PunchlineError::MissingEncodingKey`].
pub fn lookup<'a>(vectors: &'a VectorMap, key: &str, agent: &str) -> Result<&'a Vector> {
    vectors
        .get(key)
        .ok_or_else(|| PunchlineError::MissingEncodingKey {
            agent: agent.to_string(),
            key: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAgent(Vec<f64>);

    impl Agent for FixedAgent {
        fn name(&self) -> &str {
            "fixed"
        }

        fn encode_prompt(&self, _prompt: &str) -> EncodingMap {
            EncodingMap::new()
        }

        fn encode_answer(&self, _answer: &str) -> EncodingMap {
            EncodingMap::new()
        }

        fn score_answers(&self, _prompt: &VectorMap, _answers: &[VectorMap]) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_default_choose_is_argmax() {
        let agent = FixedAgent(vec![0.1, 0.6, 0.3]);
        let answers = vec![VectorMap::new(); 3];
        assert_eq!(agent.choose_answer(&VectorMap::new(), &answers).unwrap(), 1);
    }

    #[test]
    fn test_default_choose_ties_take_first() {
        let agent = FixedAgent(vec![0.25, 0.5, 0.25, 0.5]);
        let answers = vec![VectorMap::new(); 4];
        assert_eq!(agent.choose_answer(&VectorMap::new(), &answers).unwrap(), 1);
    }

    #[test]
    fn test_default_choose_without_scores_fails() {
        let agent = FixedAgent(vec![]);
        let result = agent.choose_answer(&VectorMap::new(), &[]);
        assert!(matches!(
            result,
            Err(PunchlineError::DegenerateDistribution(_))
        ));
    }

    #[test]
    fn test_lookup_missing_key() {
        let mut vectors = VectorMap::new();
        vectors.insert("generic".to_string(), Vector::from(vec![1.0f32]));

        assert!(lookup(&vectors, "generic", "a").is_ok());
        match lookup(&vectors, "desc", "a") {
            Err(PunchlineError::MissingEncodingKey { agent, key }) => {
                assert_eq!(agent, "a");
                assert_eq!(key, "desc");
            }
            other => panic!("expected missing key error, got {:?}", other.map(|_| ())),
        }
    }
}
