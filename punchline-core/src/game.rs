//! Game simulation: deal hands, rotate the judge, tally wins.
//!
//! Each round one prompt is drawn. Every player except the judge scores
//! every way of filling the prompt from their hand and samples a play from
//! the resulting distribution. The judge then picks the winning play.

use crate::agent::Agent;
use crate::config::SimulationConfig;
use crate::deck::{Deck, Prompt};
use crate::error::{PunchlineError, Result};
use crate::scorer::Scorer;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use serde::Serialize;

/// One way to answer a prompt from a hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Card texts joined with a single space
    pub text: String,
    /// Hand positions used, in play order
    pub indices: Vec<usize>,
}

/// Every ordered selection of `pick` distinct cards from `hand`.
///
/// Selections come out in lexicographic order of their indices.
pub fn answer_combinations(hand: &[String], pick: usize) -> Vec<Combination> {
    fn extend(
        hand: &[String],
        pick: usize,
        current: &mut Vec<usize>,
        out: &mut Vec<Combination>,
    ) {
        if current.len() == pick {
            let text = current
                .iter()
                .map(|&i| hand[i].as_str())
                .collect::<Vec<_>>()
                .join(" ");
            out.push(Combination {
                text,
                indices: current.clone(),
            });
            return;
        }
        for i in 0..hand.len() {
            if current.contains(&i) {
                continue;
            }
            current.push(i);
            extend(hand, pick, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if pick == 0 || pick > hand.len() {
        return out;
    }
    extend(hand, pick, &mut Vec::with_capacity(pick), &mut out);
    out
}

/// A seat at the table
pub struct Player {
    agent: Box<dyn Agent>,
    hand: Vec<String>,
}

impl Player {
    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    pub fn hand(&self) -> &[String] {
        &self.hand
    }
}

/// A card combination played by one player
#[derive(Debug, Clone, Serialize)]
pub struct Play {
    pub player: usize,
    pub answer: String,
}

/// What happened in one round
#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub prompt: Prompt,
    pub judge: usize,
    pub plays: Vec<Play>,
    /// Index of the winning player
    pub winner: usize,
}

/// Final results of a simulation
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub rounds: usize,
    /// Player names, in seat order
    pub players: Vec<String>,
    /// Rounds won per player
    pub tally: Vec<usize>,
}

/// A running game
pub struct Simulation {
    scorer: Scorer,
    players: Vec<Player>,
    deck: Deck,
    rng: StdRng,
    hand_size: usize,
    judge: usize,
    tally: Vec<usize>,
    rounds: usize,
}

impl Simulation {
    /// Shuffle the deck and deal a hand to every agent.
    ///
    /// # Errors
    ///
    /// Fails with fewer than two agents, a zero hand size, or a deck too
    /// small to deal every hand.
    pub fn new(
        scorer: Scorer,
        agents: Vec<Box<dyn Agent>>,
        mut deck: Deck,
        config: &SimulationConfig,
    ) -> Result<Self> {
        if agents.len() < 2 {
            return Err(PunchlineError::Configuration(format!(
                "A game needs at least two players, got {}",
                agents.len()
            )));
        }
        if config.hand_size == 0 {
            return Err(PunchlineError::Configuration(
                "simulation.hand_size must be positive".to_string(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        deck.shuffle(&mut rng);

        let players = agents
            .into_iter()
            .map(|agent| {
                Ok(Player {
                    agent,
                    hand: deck.deal(config.hand_size)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let tally = vec![0; players.len()];
        Ok(Self {
            scorer,
            players,
            deck,
            rng,
            hand_size: config.hand_size,
            judge: 0,
            tally,
            rounds: 0,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn tally(&self) -> &[usize] {
        &self.tally
    }

    /// Seat of the current judge
    pub fn judge(&self) -> usize {
        self.judge
    }

    /// Play one round. Returns `None` once the prompts run out.
    ///
    /// Every play and the judge's pick are decided before any card moves,
    /// so a failed round leaves hands, deck, tally and judge untouched.
    ///
    /// # Errors
    ///
    /// Scoring failures propagate; a hand smaller than the prompt's pick
    /// count is a [`PunchlineError::Deck`] error.
    pub fn play_round(&mut self) -> Result<Option<RoundOutcome>> {
        let Some(prompt) = self.deck.peek_prompt().cloned() else {
            return Ok(None);
        };

        let seats: Vec<usize> = (0..self.players.len())
            .filter(|&seat| seat != self.judge)
            .collect();
        if let Some(&seat) = seats
            .iter()
            .find(|&&seat| self.players[seat].hand.len() < prompt.pick)
        {
            return Err(PunchlineError::Deck(format!(
                "Seat {} holds {} cards and cannot answer a pick-{} prompt",
                seat,
                self.players[seat].hand.len(),
                prompt.pick
            )));
        }

        let mut chosen = Vec::with_capacity(seats.len());
        for &seat in &seats {
            let player = &self.players[seat];
            let mut combos = answer_combinations(&player.hand, prompt.pick);
            let texts: Vec<&str> = combos.iter().map(|c| c.text.as_str()).collect();

            let matrix = self
                .scorer
                .scores(&prompt.text, &[player.agent.as_ref()], &texts)?;
            let row = matrix.row(0).ok_or(PunchlineError::EmptyInput("agents"))?;
            let weights = WeightedIndex::new(row)
                .map_err(|e| PunchlineError::DegenerateDistribution(e.to_string()))?;
            let combo = combos.swap_remove(weights.sample(&mut self.rng));

            tracing::debug!(seat, answer = %combo.text, "Player played");
            chosen.push((seat, combo));
        }

        let answers: Vec<&str> = chosen.iter().map(|(_, c)| c.text.as_str()).collect();
        let judge = self.judge;
        let choice = self
            .scorer
            .choose(&prompt.text, self.players[judge].agent.as_ref(), &answers)?;

        self.deck.draw_prompt();
        let mut plays = Vec::with_capacity(chosen.len());
        for (seat, combo) in chosen {
            let player = &mut self.players[seat];
            let mut used = combo.indices;
            used.sort_unstable_by(|a, b| b.cmp(a));
            let discarded: Vec<String> = used.into_iter().map(|i| player.hand.remove(i)).collect();
            self.deck.discard(discarded);
            let missing = self.hand_size.saturating_sub(player.hand.len());
            player.hand.extend(self.deck.deal(missing)?);

            plays.push(Play {
                player: seat,
                answer: combo.text,
            });
        }

        let winner = plays[choice].player;
        self.tally[winner] += 1;
        self.rounds += 1;
        self.judge = (self.judge + 1) % self.players.len();

        tracing::info!(
            round = self.rounds,
            prompt = %prompt.text,
            judge,
            winner,
            answer = %plays[choice].answer,
            "Round complete"
        );

        Ok(Some(RoundOutcome {
            prompt,
            judge,
            plays,
            winner,
        }))
    }

    /// Play until the prompts run out or `max_rounds` rounds have been played
    pub fn run(&mut self, max_rounds: Option<usize>) -> Result<GameSummary> {
        while max_rounds.is_none_or(|max| self.rounds < max) {
            if self.play_round()?.is_none() {
                break;
            }
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            rounds: self.rounds,
            players: self
                .players
                .iter()
                .map(|p| p.agent.name().to_string())
                .collect(),
            tally: self.tally.clone(),
        }
    }
}
