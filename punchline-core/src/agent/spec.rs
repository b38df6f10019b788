//! Textual agent specifications, e.g. for command-line flags.
//!
//! Grammar:
//!
//! - `random`
//! - `lex`
//! - `desc:<description>[@<power>[:<temperature>]]`: raw prompt as baseline
//! - `guided:<description>[@<power>[:<temperature>]]`: templated baseline

use super::{Agent, LexicographicAgent, PersonalityAgent, RandomAgent};
use crate::error::PunchlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parsed description of an agent to construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentSpec {
    /// Uniform-random baseline
    Random,
    /// Alphabetical chooser
    Lexicographic,
    /// Description-driven personality
    Personality {
        description: String,
        power: f64,
        temperature: f64,
        guide: bool,
    },
}

impl AgentSpec {
    /// Build the agent. `seed` only affects [`RandomAgent`].
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            AgentSpec::Random => Box::new(match seed {
                Some(seed) => RandomAgent::with_seed(seed),
                None => RandomAgent::new(),
            }),
            AgentSpec::Lexicographic => Box::new(LexicographicAgent::new()),
            AgentSpec::Personality {
                description,
                power,
                temperature,
                guide,
            } => Box::new(
                PersonalityAgent::new(description.clone())
                    .with_power(*power)
                    .with_temperature(*temperature)
                    .with_guide(*guide),
            ),
        }
    }
}

impl FromStr for AgentSpec {
    type Err = PunchlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "random" => return Ok(AgentSpec::Random),
            "lex" | "lexicographic" => return Ok(AgentSpec::Lexicographic),
            _ => {}
        }

        let (guide, rest) = if let Some(rest) = s.strip_prefix("desc:") {
            (false, rest)
        } else if let Some(rest) = s.strip_prefix("guided:") {
            (true, rest)
        } else {
            return Err(PunchlineError::Configuration(format!(
                "Unknown agent spec '{}': expected random, lex, desc:<text> or guided:<text>",
                s
            )));
        };

        // A trailing `@...` that does not parse as parameters is part of the description
        let (description, power, temperature) = match rest
            .rsplit_once('@')
            .and_then(|(description, params)| parse_params(params).ok().map(|p| (description, p)))
        {
            Some((description, (power, temperature))) => (description, power, temperature),
            None => (rest, 1.0, 1.0),
        };

        let description = description.trim();
        if description.is_empty() {
            return Err(PunchlineError::Configuration(format!(
                "Agent spec '{}' has an empty description",
                s
            )));
        }

        Ok(AgentSpec::Personality {
            description: description.to_string(),
            power,
            temperature,
            guide,
        })
    }
}

fn parse_params(params: &str) -> Result<(f64, f64), std::num::ParseFloatError> {
    match params.split_once(':') {
        Some((power, temperature)) => Ok((power.trim().parse()?, temperature.trim().parse()?)),
        None => Ok((params.trim().parse()?, 1.0)),
    }
}

impl fmt::Display for AgentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentSpec::Random => write!(f, "random"),
            AgentSpec::Lexicographic => write!(f, "lex"),
            AgentSpec::Personality {
                description,
                power,
                temperature,
                guide,
            } => {
                let prefix = if *guide { "guided" } else { "desc" };
                write!(f, "{}:{}@{}:{}", prefix, description, power, temperature)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!("random".parse::<AgentSpec>().unwrap(), AgentSpec::Random);
        assert_eq!("lex".parse::<AgentSpec>().unwrap(), AgentSpec::Lexicographic);
    }

    #[test]
    fn test_parse_personality_defaults() {
        let spec: AgentSpec = "desc:a college frat boy".parse().unwrap();
        assert_eq!(
            spec,
            AgentSpec::Personality {
                description: "a college frat boy".to_string(),
                power: 1.0,
                temperature: 1.0,
                guide: false,
            }
        );
    }

    #[test]
    fn test_parse_personality_params() {
        let spec: AgentSpec = "guided:an old lady@5:0.5".parse().unwrap();
        assert_eq!(
            spec,
            AgentSpec::Personality {
                description: "an old lady".to_string(),
                power: 5.0,
                temperature: 0.5,
                guide: true,
            }
        );

        let spec: AgentSpec = "desc:someone @ home@2".parse().unwrap();
        match spec {
            AgentSpec::Personality { description, power, .. } => {
                assert_eq!(description, "someone @ home");
                assert_eq!(power, 2.0);
            }
            other => panic!("unexpected spec {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!("robot".parse::<AgentSpec>().is_err());
        assert!("desc:".parse::<AgentSpec>().is_err());
        assert!("desc:@2".parse::<AgentSpec>().is_err());
    }

    #[test]
    fn test_unparsed_suffix_stays_in_description() {
        let spec: AgentSpec = "desc:someone @ home".parse().unwrap();
        match spec {
            AgentSpec::Personality { description, power, .. } => {
                assert_eq!(description, "someone @ home");
                assert_eq!(power, 1.0);
            }
            other => panic!("unexpected spec {:?}", other),
        }
    }

    #[test]
    fn test_display_round_trips() {
        let spec: AgentSpec = "guided:a pirate@3:2".parse().unwrap();
        assert_eq!(spec.to_string().parse::<AgentSpec>().unwrap(), spec);
    }

    #[test]
    fn test_build() {
        let agent = "desc:a pirate".parse::<AgentSpec>().unwrap().build(None);
        assert_eq!(agent.name(), "a pirate");
        assert_eq!(agent.encode_prompt("Why?").len(), 2);

        let agent = AgentSpec::Random.build(Some(1));
        assert_eq!(agent.name(), "random");
    }
}
