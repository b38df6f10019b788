//! Embedding batcher: one provider call per scoring round.
//!
//! Every string requested by every agent, for the prompt and for each
//! answer, is deduplicated by exact text and embedded once. Two encodings
//! with identical text share one vector even when they serve different
//! roles, since identical text embeds identically.

use crate::agent::{Agent, EncodingMap, Vector, VectorMap};
use crate::embeddings::EmbeddingProvider;
use crate::error::{PunchlineError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Encodings requested by one agent for one round
#[derive(Debug, Clone)]
pub struct AgentRequest {
    /// Encodings of the prompt
    pub prompt: EncodingMap,
    /// Encodings of each answer, in answer order
    pub answers: Vec<EncodingMap>,
}

/// Vectors handed back to one agent, keyed as it requested
#[derive(Debug, Clone)]
pub struct AgentVectors {
    pub prompt: VectorMap,
    pub answers: Vec<VectorMap>,
}

/// The requests of every agent taking part in a round
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
    requests: Vec<AgentRequest>,
}

impl EmbeddingBatch {
    /// Ask every agent for its prompt and answer encodings.
    ///
    /// # Errors
    ///
    /// Fails with [`PunchlineError::InconsistentEncodingKeys`] when an agent
    /// that declares [`Agent::uniform_answer_keys`] returns answer maps with
    /// different key sets, or answer keys that neither contain nor are
    /// contained in its prompt keys.
    pub fn collect<S: AsRef<str>>(
        prompt: &str,
        agents: &[&dyn Agent],
        answers: &[S],
    ) -> Result<Self> {
        let requests = agents
            .iter()
            .map(|agent| {
                let request = AgentRequest {
                    prompt: agent.encode_prompt(prompt),
                    answers: answers
                        .iter()
                        .map(|answer| agent.encode_answer(answer.as_ref()))
                        .collect(),
                };
                if agent.uniform_answer_keys() {
                    check_keys(agent.name(), &request)?;
                }
                Ok(request)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { requests })
    }

    /// Per-agent requests, in agent order
    pub fn requests(&self) -> &[AgentRequest] {
        &self.requests
    }

    /// Every requested text, deduplicated, in first-requested order
    pub fn distinct_texts(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.all_texts().filter(|text| seen.insert(*text)).collect()
    }

    fn all_texts(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().flat_map(|request| {
            request
                .prompt
                .values()
                .chain(request.answers.iter().flat_map(|answer| answer.values()))
                .map(String::as_str)
        })
    }

    /// Embed the distinct texts in one provider call and redistribute the
    /// vectors to each agent under its own key names.
    ///
    /// The provider is not called when no agent requested anything.
    ///
    /// # Errors
    ///
    /// Provider failures propagate unchanged; the round either produces a
    /// vector for every requested string or fails as a whole.
    pub fn embed(&self, provider: &dyn EmbeddingProvider) -> Result<Vec<AgentVectors>> {
        let texts = self.distinct_texts();

        let mut table: HashMap<&str, Vector> = HashMap::with_capacity(texts.len());
        if !texts.is_empty() {
            let vectors = provider.embed_batch(&texts)?;
            if vectors.len() != texts.len() {
                return Err(PunchlineError::Embedding(format!(
                    "Provider returned {} vectors for {} texts",
                    vectors.len(),
                    texts.len()
                )));
            }
            table.extend(
                texts
                    .iter()
                    .copied()
                    .zip(vectors.into_iter().map(Vector::from)),
            );
        }

        tracing::debug!(
            agents = self.requests.len(),
            requested = self.all_texts().count(),
            distinct = texts.len(),
            "Embedded scoring batch"
        );

        let resolve = |encodings: &EncodingMap| -> Result<VectorMap> {
            encodings
                .iter()
                .map(|(key, text)| {
                    let vector = table.get(text.as_str()).ok_or_else(|| {
                        PunchlineError::Embedding(format!("No vector produced for '{}'", text))
                    })?;
                    Ok((key.clone(), Vector::clone(vector)))
                })
                .collect()
        };

        self.requests
            .iter()
            .map(|request| {
                Ok(AgentVectors {
                    prompt: resolve(&request.prompt)?,
                    answers: request
                        .answers
                        .iter()
                        .map(&resolve)
                        .collect::<Result<Vec<_>>>()?,
                })
            })
            .collect()
    }
}

fn check_keys(agent: &str, request: &AgentRequest) -> Result<()> {
    let Some(first) = request.answers.first() else {
        return Ok(());
    };
    let expected: BTreeSet<&String> = first.keys().collect();

    for (index, answer) in request.answers.iter().enumerate().skip(1) {
        let found: BTreeSet<&String> = answer.keys().collect();
        if found != expected {
            return Err(PunchlineError::InconsistentEncodingKeys {
                agent: agent.to_string(),
                detail: format!(
                    "answer {} has keys {:?}, answer 0 has {:?}",
                    index, found, expected
                ),
            });
        }
    }

    let prompt_keys: BTreeSet<&String> = request.prompt.keys().collect();
    if !expected.is_subset(&prompt_keys) && !expected.is_superset(&prompt_keys) {
        return Err(PunchlineError::InconsistentEncodingKeys {
            agent: agent.to_string(),
            detail: format!(
                "answer keys {:?} do not overlap prompt keys {:?}",
                expected, prompt_keys
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{LexicographicAgent, PersonalityAgent, RandomAgent};
    use crate::embeddings::HashingEmbeddings;

    struct OddAgent;

    impl Agent for OddAgent {
        fn name(&self) -> &str {
            "odd"
        }

        fn encode_prompt(&self, prompt: &str) -> EncodingMap {
            EncodingMap::from([("p".to_string(), prompt.to_string())])
        }

        fn encode_answer(&self, answer: &str) -> EncodingMap {
            // Key depends on the text, but the agent claims uniform keys
            EncodingMap::from([(answer.len().to_string(), answer.to_string())])
        }

        fn score_answers(&self, _prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>> {
            Ok(vec![1.0 / answers.len() as f64; answers.len()])
        }
    }

    struct DisjointAgent;

    impl Agent for DisjointAgent {
        fn name(&self) -> &str {
            "disjoint"
        }

        fn encode_prompt(&self, prompt: &str) -> EncodingMap {
            EncodingMap::from([("question".to_string(), prompt.to_string())])
        }

        fn encode_answer(&self, answer: &str) -> EncodingMap {
            EncodingMap::from([("reply".to_string(), answer.to_string())])
        }

        fn score_answers(&self, _prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>> {
            Ok(vec![1.0 / answers.len() as f64; answers.len()])
        }
    }

    #[test]
    fn test_distinct_texts_dedup_across_agents() {
        let a = PersonalityAgent::new("a pirate");
        let b = PersonalityAgent::new("a ninja");
        let agents: Vec<&dyn Agent> = vec![&a, &b];
        let batch = EmbeddingBatch::collect("Why?", &agents, &["Yes.", "No."]).unwrap();

        let texts = batch.distinct_texts();
        // two desc prompts, one shared generic prompt, two shared answers
        assert_eq!(texts.len(), 5);
        let unique: HashSet<&str> = texts.iter().copied().collect();
        assert_eq!(unique.len(), texts.len());
        assert_eq!(texts[0], "a pirate answer to Cards Against Humanity prompt, \"Why?\".");
    }

    #[test]
    fn test_embed_maps_keys_to_requested_text() {
        let provider = HashingEmbeddings::new(64).unwrap();
        let agent = PersonalityAgent::new("a pirate").with_guide(true);
        let agents: Vec<&dyn Agent> = vec![&agent];
        let batch = EmbeddingBatch::collect("Why?", &agents, &["Yes.", "No."]).unwrap();

        let vectors = batch.embed(&provider).unwrap();
        assert_eq!(vectors.len(), 1);

        let request = &batch.requests()[0];
        for (key, text) in &request.prompt {
            let expected = provider.embed(text).unwrap();
            assert_eq!(&*vectors[0].prompt[key], expected.as_slice());
        }
        assert_eq!(vectors[0].answers.len(), 2);
        assert_eq!(
            &*vectors[0].answers[1]["generic"],
            provider.embed("No.").unwrap().as_slice()
        );
    }

    #[test]
    fn test_shared_text_shares_vector() {
        let provider = HashingEmbeddings::new(16).unwrap();
        let a = PersonalityAgent::new("a pirate");
        let b = PersonalityAgent::new("a ninja");
        let agents: Vec<&dyn Agent> = vec![&a, &b];
        let batch = EmbeddingBatch::collect("Why?", &agents, &["Yes."]).unwrap();

        let vectors = batch.embed(&provider).unwrap();
        assert!(Vector::ptr_eq(
            &vectors[0].answers[0]["generic"],
            &vectors[1].answers[0]["generic"]
        ));
    }

    #[test]
    fn test_random_only_batch_is_empty() {
        let provider = HashingEmbeddings::new(16).unwrap();
        let agent = RandomAgent::with_seed(0);
        let agents: Vec<&dyn Agent> = vec![&agent];
        let batch = EmbeddingBatch::collect("Why?", &agents, &["a", "b"]).unwrap();

        assert!(batch.distinct_texts().is_empty());
        let vectors = batch.embed(&provider).unwrap();
        assert!(vectors[0].prompt.is_empty());
        assert_eq!(vectors[0].answers.len(), 2);
    }

    #[test]
    fn test_literal_keys_allowed_when_not_uniform() {
        let agent = LexicographicAgent::new();
        let agents: Vec<&dyn Agent> = vec![&agent];
        let batch = EmbeddingBatch::collect("Why?", &agents, &["b", "a"]).unwrap();

        // every encoding asks for the empty string
        assert_eq!(batch.distinct_texts(), vec![""]);
    }

    #[test]
    fn test_inconsistent_answer_keys_rejected() {
        let agents: Vec<&dyn Agent> = vec![&OddAgent];
        let result = EmbeddingBatch::collect("Why?", &agents, &["a", "bb"]);
        assert!(matches!(
            result,
            Err(PunchlineError::InconsistentEncodingKeys { .. })
        ));
    }

    #[test]
    fn test_disjoint_prompt_and_answer_keys_rejected() {
        let agents: Vec<&dyn Agent> = vec![&DisjointAgent];
        let result = EmbeddingBatch::collect("Why?", &agents, &["a"]);
        assert!(matches!(
            result,
            Err(PunchlineError::InconsistentEncodingKeys { .. })
        ));
    }
}
