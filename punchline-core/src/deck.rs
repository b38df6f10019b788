//! Card deck loading and dealing.
//!
//! Reads the compact card format:
//!
//! ```json
//! { "black": [{ "text": "Why?", "pick": 1 }], "white": ["Racism."] }
//! ```
//!
//! Files ending in `.gz` are gunzipped first.

use crate::config::DeckConfig;
use crate::error::{PunchlineError, Result};
use flate2::read::GzDecoder;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// File name used when no deck path is configured
pub const DEFAULT_DECK_FILE: &str = "cah-cards-compact.json.gz";

/// A prompt card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Question or fill-in-the-blank text
    pub text: String,
    /// Number of answer cards played together
    pub pick: usize,
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [pick {}]", self.text, self.pick)
    }
}

/// Prompts and answers in play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub prompts: Vec<Prompt>,
    pub answers: Vec<String>,
}

#[derive(Deserialize)]
struct CompactCards {
    black: Vec<Prompt>,
    white: Vec<String>,
}

impl Deck {
    /// Load a deck from a compact card file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, decompressed or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PunchlineError::Deck(format!("Failed to open deck '{}': {}", path.display(), e))
        })?;

        let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let deck = Self::from_reader(reader)?;
        tracing::debug!(
            path = %path.display(),
            prompts = deck.prompts.len(),
            answers = deck.answers.len(),
            "Loaded deck"
        );
        Ok(deck)
    }

    /// Load the configured deck, or [`DEFAULT_DECK_FILE`] from the working
    /// directory when no path is configured.
    pub fn load_default(config: &DeckConfig) -> Result<Self> {
        let path = match &config.path {
            Some(path) => path.clone(),
            None => {
                tracing::warn!(
                    file = DEFAULT_DECK_FILE,
                    "No deck.path configured; using the default card file"
                );
                PathBuf::from(DEFAULT_DECK_FILE)
            }
        };
        Self::load(path)
    }

    /// Parse uncompressed compact JSON
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let cards: CompactCards = serde_json::from_reader(reader)?;
        if let Some(prompt) = cards.black.iter().find(|p| p.pick == 0) {
            return Err(PunchlineError::Deck(format!(
                "Prompt '{}' picks zero cards",
                prompt.text
            )));
        }
        Ok(Self {
            prompts: cards.black,
            answers: cards.white,
        })
    }

    /// Shuffle prompts and answers independently
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.prompts.shuffle(rng);
        self.answers.shuffle(rng);
    }

    /// Take `count` answers from the top of the pile
    ///
    /// # Errors
    ///
    /// Fails without dealing anything if fewer than `count` answers remain.
    pub fn deal(&mut self, count: usize) -> Result<Vec<String>> {
        if count > self.answers.len() {
            return Err(PunchlineError::Deck(format!(
                "Cannot deal {} answers, {} left",
                count,
                self.answers.len()
            )));
        }
        Ok(self.answers.drain(..count).collect())
    }

    /// Return answers to the bottom of the pile
    pub fn discard(&mut self, cards: impl IntoIterator<Item = String>) {
        self.answers.extend(cards);
    }

    /// The prompt [`draw_prompt`](Self::draw_prompt) would return
    pub fn peek_prompt(&self) -> Option<&Prompt> {
        self.prompts.last()
    }

    /// Take the next prompt, if any
    pub fn draw_prompt(&mut self) -> Option<Prompt> {
        self.prompts.pop()
    }
}
