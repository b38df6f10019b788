//! Deterministic agent that prefers the alphabetically first answer

use super::{Agent, EncodingMap, VectorMap};
use crate::error::{PunchlineError, Result};

/// Agent that always picks the lexicographically smallest answer text.
///
/// Encodings are keyed by the literal prompt or answer text with an empty
/// value, so the answer text travels through the scorer as the key of its
/// vector map. The vectors themselves are ignored, which makes this agent
/// useful for exercising the scoring plumbing without a meaningful
/// embedding space.
#[derive(Debug, Clone)]
pub struct LexicographicAgent {
    name: String,
}

impl LexicographicAgent {
    pub fn new() -> Self {
        Self {
            name: "lexicographic".to_string(),
        }
    }

    fn smallest(&self, answers: &[VectorMap]) -> Result<usize> {
        let mut best: Option<(usize, &str)> = None;
        for (i, answer) in answers.iter().enumerate() {
            let text = answer.keys().next().ok_or_else(|| PunchlineError::MissingEncodingKey {
                agent: self.name.clone(),
                key: format!("<answer {} text>", i),
            })?;
            match best {
                Some((_, current)) if current <= text.as_str() => {}
                _ => best = Some((i, text)),
            }
        }
        best.map(|(i, _)| i).ok_or(PunchlineError::EmptyInput("answers"))
    }
}

impl Default for LexicographicAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for LexicographicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode_prompt(&self, prompt: &str) -> EncodingMap {
        EncodingMap::from([(prompt.to_string(), String::new())])
    }

    fn encode_answer(&self, answer: &str) -> EncodingMap {
        EncodingMap::from([(answer.to_string(), String::new())])
    }

    fn score_answers(&self, _prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>> {
        let winner = self.smallest(answers)?;
        Ok((0..answers.len())
            .map(|i| if i == winner { 1.0 } else { 0.0 })
            .collect())
    }

    fn choose_answer(&self, _prompt: &VectorMap, answers: &[VectorMap]) -> Result<usize> {
        self.smallest(answers)
    }

    fn uniform_answer_keys(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Vector;

    fn keyed(texts: &[&str]) -> Vec<VectorMap> {
        texts
            .iter()
            .map(|t| VectorMap::from([(t.to_string(), Vector::from(vec![0.0f32]))]))
            .collect()
    }

    #[test]
    fn test_encodings_keyed_by_text() {
        let agent = LexicographicAgent::new();
        let prompt = agent.encode_prompt("Why?");
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt.get("Why?"), Some(&String::new()));

        let answer = agent.encode_answer("Racism.");
        assert_eq!(answer.get("Racism."), Some(&String::new()));
    }

    #[test]
    fn test_picks_smallest() {
        let agent = LexicographicAgent::new();
        let answers = keyed(&["banana", "apple", "cherry"]);

        assert_eq!(agent.choose_answer(&VectorMap::new(), &answers).unwrap(), 1);
        assert_eq!(
            agent.score_answers(&VectorMap::new(), &answers).unwrap(),
            vec![0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_duplicate_texts_take_first() {
        let agent = LexicographicAgent::new();
        let answers = keyed(&["b", "a", "a"]);
        assert_eq!(agent.choose_answer(&VectorMap::new(), &answers).unwrap(), 1);
    }

    #[test]
    fn test_uppercase_sorts_before_lowercase() {
        let agent = LexicographicAgent::new();
        let answers = keyed(&["apple", "Zebra"]);
        assert_eq!(agent.choose_answer(&VectorMap::new(), &answers).unwrap(), 1);
    }

    #[test]
    fn test_missing_text_fails() {
        let agent = LexicographicAgent::new();
        let answers = vec![VectorMap::new()];
        assert!(matches!(
            agent.score_answers(&VectorMap::new(), &answers),
            Err(PunchlineError::MissingEncodingKey { .. })
        ));
    }
}
