//! Description-driven personality agent

use super::{Agent, EncodingMap, VectorMap, lookup};
use crate::error::Result;
use crate::math;

/// Encoding of the prompt conditioned on the personality description
pub const DESC_KEY: &str = "desc";

/// Neutral encoding, used for both the prompt baseline and every answer
pub const GENERIC_KEY: &str = "generic";

/// Floor applied to similarities before the logarithm and to the temperature
pub const SCORE_FLOOR: f64 = 1e-5;

/// Agent whose taste is described by free text.
///
/// Each answer is compared against two encodings of the prompt: one prefixed
/// with the description and one neutral. The two log-similarities are
/// blended as `generic + power * (desc - generic)`, divided by the
/// temperature, and normalized into a distribution.
///
/// - `power = 1.0`: the description-conditioned score alone
/// - `power = 0.0`: the neutral score; the description has no effect
/// - `power > 1.0`: the description's influence is amplified
/// - `power < 0.0`: the description's influence is inverted
///
/// A temperature above 1 flattens the distribution, below 1 sharpens it.
#[derive(Debug, Clone)]
pub struct PersonalityAgent {
    description: String,
    power: f64,
    temperature: f64,
    guide: bool,
}

impl PersonalityAgent {
    /// Create an agent with power 1.0, temperature 1.0 and the raw prompt
    /// as neutral baseline
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            power: 1.0,
            temperature: 1.0,
            guide: false,
        }
    }

    /// Set the personality power
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Use the templated prompt without the description as the neutral
    /// baseline instead of the raw prompt text
    pub fn with_guide(mut self, guide: bool) -> Self {
        self.guide = guide;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn guide(&self) -> bool {
        self.guide
    }

    fn template(prompt: &str) -> String {
        format!("answer to Cards Against Humanity prompt, \"{}\".", prompt)
    }

    /// Log-score per answer before normalization
    fn blended_log_scores(&self, prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>> {
        let desc = lookup(prompt, DESC_KEY, &self.description)?;
        let generic = lookup(prompt, GENERIC_KEY, &self.description)?;
        let temperature = self.temperature.max(SCORE_FLOOR);

        answers
            .iter()
            .map(|answer| {
                let answer = lookup(answer, GENERIC_KEY, &self.description)?;
                let desc_log = math::dot(desc, answer).max(SCORE_FLOOR).ln();
                let generic_log = math::dot(generic, answer).max(SCORE_FLOOR).ln();
                let blended = generic_log + self.power * (desc_log - generic_log);
                Ok(blended / temperature)
            })
            .collect()
    }
}

impl Agent for PersonalityAgent {
    fn name(&self) -> &str {
        &self.description
    }

    fn encode_prompt(&self, prompt: &str) -> EncodingMap {
        let templated = Self::template(prompt);
        let generic = if self.guide {
            templated.clone()
        } else {
            prompt.to_string()
        };
        EncodingMap::from([
            (DESC_KEY.to_string(), format!("{} {}", self.description, templated)),
            (GENERIC_KEY.to_string(), generic),
        ])
    }

    fn encode_answer(&self, answer: &str) -> EncodingMap {
        EncodingMap::from([(GENERIC_KEY.to_string(), answer.to_string())])
    }

    fn score_answers(&self, prompt: &VectorMap, answers: &[VectorMap]) -> Result<Vec<f64>> {
        let log_scores = self.blended_log_scores(prompt, answers)?;
        math::normalize_log_scores(&log_scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Vector;
    use crate::error::PunchlineError;

    fn v(values: &[f32]) -> Vector {
        Vector::from(values.to_vec())
    }

    fn prompt_vectors(desc: &[f32], generic: &[f32]) -> VectorMap {
        VectorMap::from([
            (DESC_KEY.to_string(), v(desc)),
            (GENERIC_KEY.to_string(), v(generic)),
        ])
    }

    fn answer_vectors(answers: &[&[f32]]) -> Vec<VectorMap> {
        answers
            .iter()
            .map(|a| VectorMap::from([(GENERIC_KEY.to_string(), v(a))]))
            .collect()
    }

    fn assert_distribution(probs: &[f64]) {
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum was {}", sum);
        assert!(probs.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn test_encode_prompt_raw_baseline() {
        let agent = PersonalityAgent::new("a college frat boy");
        let encodings = agent.encode_prompt("Why?");

        assert_eq!(
            encodings[DESC_KEY],
            "a college frat boy answer to Cards Against Humanity prompt, \"Why?\"."
        );
        assert_eq!(encodings[GENERIC_KEY], "Why?");
    }

    #[test]
    fn test_encode_prompt_guided_differs_only_by_prefix() {
        let agent = PersonalityAgent::new("a middle-aged man").with_guide(true);
        let encodings = agent.encode_prompt("Why?");

        let desc = &encodings[DESC_KEY];
        let generic = &encodings[GENERIC_KEY];
        assert_eq!(desc, &format!("a middle-aged man {}", generic));
    }

    #[test]
    fn test_encode_answer() {
        let agent = PersonalityAgent::new("anyone");
        let encodings = agent.encode_answer("Racism.");
        assert_eq!(encodings.len(), 1);
        assert_eq!(encodings[GENERIC_KEY], "Racism.");
    }

    #[test]
    fn test_power_one_uses_desc_similarity() {
        let agent = PersonalityAgent::new("x");
        let prompt = prompt_vectors(&[1.0, 0.0], &[0.0, 1.0]);
        let answers = answer_vectors(&[&[0.8, 0.2], &[0.2, 0.8]]);

        let probs = agent.score_answers(&prompt, &answers).unwrap();
        assert_distribution(&probs);
        // exp(ln 0.8) : exp(ln 0.2)
        assert!((probs[0] - 0.8).abs() < 1e-9);
        assert!((probs[1] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_power_zero_uses_generic_similarity() {
        let agent = PersonalityAgent::new("x").with_power(0.0);
        let prompt = prompt_vectors(&[1.0, 0.0], &[0.0, 1.0]);
        let answers = answer_vectors(&[&[0.8, 0.2], &[0.2, 0.8]]);

        let probs = agent.score_answers(&prompt, &answers).unwrap();
        assert!((probs[0] - 0.2).abs() < 1e-9);
        assert!((probs[1] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_power_amplifies() {
        let prompt = prompt_vectors(&[1.0, 0.0], &[0.5, 0.5]);
        let answers = answer_vectors(&[&[0.8, 0.2], &[0.2, 0.8]]);

        let base = PersonalityAgent::new("x")
            .score_answers(&prompt, &answers)
            .unwrap();
        let amplified = PersonalityAgent::new("x")
            .with_power(5.0)
            .score_answers(&prompt, &answers)
            .unwrap();

        assert!(amplified[0] > base[0]);
        assert_distribution(&amplified);
    }

    #[test]
    fn test_negative_power_inverts() {
        let agent = PersonalityAgent::new("x").with_power(-1.0);
        let prompt = prompt_vectors(&[1.0, 0.0], &[0.5, 0.5]);
        let answers = answer_vectors(&[&[0.8, 0.2], &[0.2, 0.8]]);

        let probs = agent.score_answers(&prompt, &answers).unwrap();
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn test_temperature_shapes_distribution() {
        let prompt = prompt_vectors(&[1.0, 0.0], &[1.0, 0.0]);
        let answers = answer_vectors(&[&[0.9, 0.1], &[0.3, 0.7]]);

        let neutral = PersonalityAgent::new("x")
            .score_answers(&prompt, &answers)
            .unwrap();
        let hot = PersonalityAgent::new("x")
            .with_temperature(10.0)
            .score_answers(&prompt, &answers)
            .unwrap();
        let cold = PersonalityAgent::new("x")
            .with_temperature(0.1)
            .score_answers(&prompt, &answers)
            .unwrap();

        assert!(hot[0] < neutral[0]);
        assert!(cold[0] > neutral[0]);
        assert!(hot[0] > 0.5);
    }

    #[test]
    fn test_zero_temperature_is_floored() {
        let agent = PersonalityAgent::new("x").with_temperature(0.0);
        let prompt = prompt_vectors(&[1.0, 0.0], &[1.0, 0.0]);
        let answers = answer_vectors(&[&[0.9, 0.1], &[0.3, 0.7]]);

        let probs = agent.score_answers(&prompt, &answers).unwrap();
        assert_distribution(&probs);
        assert!((probs[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_similarity_is_clamped() {
        let agent = PersonalityAgent::new("x");
        let prompt = prompt_vectors(&[1.0, 0.0], &[1.0, 0.0]);
        let answers = answer_vectors(&[&[-0.5, 0.0], &[0.0, 1.0], &[0.5, 0.0]]);

        let probs = agent.score_answers(&prompt, &answers).unwrap();
        assert_distribution(&probs);
        assert!((probs[0] - probs[1]).abs() < 1e-12);
        assert!(probs[2] > 0.99);
    }

    #[test]
    fn test_choose_is_argmax() {
        let agent = PersonalityAgent::new("x");
        let prompt = prompt_vectors(&[0.0, 1.0], &[1.0, 0.0]);
        let answers = answer_vectors(&[&[0.9, 0.1], &[0.1, 0.9], &[0.5, 0.5]]);

        assert_eq!(agent.choose_answer(&prompt, &answers).unwrap(), 1);
    }

    #[test]
    fn test_missing_keys_fail_fast() {
        let agent = PersonalityAgent::new("x");
        let mut prompt = prompt_vectors(&[1.0], &[1.0]);
        prompt.remove(DESC_KEY);
        let answers = answer_vectors(&[&[1.0]]);

        assert!(matches!(
            agent.score_answers(&prompt, &answers),
            Err(PunchlineError::MissingEncodingKey { ref key, .. }) if key == DESC_KEY
        ));

        let prompt = prompt_vectors(&[1.0], &[1.0]);
        let answers = vec![VectorMap::from([("other".to_string(), v(&[1.0]))])];
        assert!(matches!(
            agent.score_answers(&prompt, &answers),
            Err(PunchlineError::MissingEncodingKey { ref key, .. }) if key == GENERIC_KEY
        ));
    }

    #[test]
    fn test_nan_power_is_degenerate() {
        let agent = PersonalityAgent::new("x").with_power(f64::NAN);
        let prompt = prompt_vectors(&[1.0], &[1.0]);
        let answers = answer_vectors(&[&[1.0], &[0.5]]);

        assert!(matches!(
            agent.score_answers(&prompt, &answers),
            Err(PunchlineError::DegenerateDistribution(_))
        ));
    }
}
