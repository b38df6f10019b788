//! Punchline CLI - score answers, judge rounds, simulate games

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use punchline_core::prelude::*;
use std::path::PathBuf;

/// Personalities seated when `simulate` is given no agents
const DEFAULT_TABLE: [&str; 4] = [
    "desc:a college frat boy@5",
    "desc:a middle-aged man@5",
    "desc:an old racist southern lady@5",
    "random",
];

#[derive(Parser)]
#[command(name = "punchline")]
#[command(about = "Personality-driven answer scoring for card-matching party games", long_about = None)]
#[command(version)]
struct Cli {
    /// Extra configuration file, layered before PUNCHLINE_* env overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print each agent's probability for every answer as JSON
    Score {
        /// Prompt text
        #[arg(short, long)]
        prompt: String,
        /// Candidate answer (repeatable)
        #[arg(short, long = "answer", required = true)]
        answers: Vec<String>,
        /// Agent spec: random, lex, desc:<text>[@power[:temp]], guided:<text>[@power[:temp]]
        #[arg(short = 'g', long = "agent", required = true)]
        agents: Vec<AgentSpec>,
    },
    /// Let one agent pick the winning answer
    Judge {
        /// Prompt text
        #[arg(short, long)]
        prompt: String,
        /// Candidate answer (repeatable)
        #[arg(short, long = "answer", required = true)]
        answers: Vec<String>,
        /// Judging agent spec
        #[arg(short = 'g', long = "agent")]
        agent: AgentSpec,
    },
    /// Play a full game and report the win tally
    Simulate {
        /// Card file (.json or .json.gz)
        #[arg(short, long)]
        deck: Option<PathBuf>,
        /// RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Stop after this many rounds
        #[arg(short, long)]
        rounds: Option<usize>,
        /// Cards per hand
        #[arg(long)]
        hand_size: Option<usize>,
        /// Player spec (repeatable)
        #[arg(short = 'g', long = "agent")]
        agents: Vec<AgentSpec>,
    },
    /// Version information
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("punchline {}", env!("CARGO_PKG_VERSION"));
            println!("punchline-core {}", punchline_core::VERSION);
        }
        Commands::Score {
            prompt,
            answers,
            agents,
        } => {
            let (_, scorer) = setup(cli.config.as_ref())?;
            let agents: Vec<Box<dyn Agent>> = agents.iter().map(|spec| spec.build(None)).collect();
            let refs: Vec<&dyn Agent> = agents.iter().map(|a| a.as_ref()).collect();
            let matrix = scorer.scores(&prompt, &refs, answers.as_slice())?;

            let output = serde_json::json!({
                "prompt": prompt,
                "answers": answers,
                "agents": refs.iter().map(|a| a.name()).collect::<Vec<_>>(),
                "scores": matrix,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Judge {
            prompt,
            answers,
            agent,
        } => {
            let (_, scorer) = setup(cli.config.as_ref())?;
            let agent = agent.build(None);
            let choice = scorer.choose(&prompt, agent.as_ref(), answers.as_slice())?;
            println!("{}\t{}", choice, answers[choice]);
        }
        Commands::Simulate {
            deck,
            seed,
            rounds,
            hand_size,
            agents,
        } => {
            let (config, scorer) = setup(cli.config.as_ref())?;
            let mut sim_config = config.simulation.clone();
            if seed.is_some() {
                sim_config.seed = seed;
            }
            if rounds.is_some() {
                sim_config.max_rounds = rounds;
            }
            if let Some(hand_size) = hand_size {
                sim_config.hand_size = hand_size;
            }

            let specs = if agents.is_empty() {
                DEFAULT_TABLE
                    .iter()
                    .map(|s| s.parse::<AgentSpec>())
                    .collect::<std::result::Result<Vec<_>, _>>()?
            } else {
                agents
            };
            if specs.len() < 2 {
                bail!("A game needs at least two agents");
            }

            let deck = match deck {
                Some(path) => Deck::load(path),
                None => Deck::load_default(&config.deck),
            }
            .context("Failed to load deck")?;

            let players: Vec<Box<dyn Agent>> = specs
                .iter()
                .enumerate()
                .map(|(i, spec)| spec.build(sim_config.seed.map(|s| s.wrapping_add(i as u64 + 1))))
                .collect();

            tracing::info!(
                players = players.len(),
                prompts = deck.prompts.len(),
                answers = deck.answers.len(),
                "Starting simulation"
            );

            let mut simulation = Simulation::new(scorer, players, deck, &sim_config)?;
            let summary = simulation.run(sim_config.max_rounds)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn setup(config_path: Option<&PathBuf>) -> Result<(PunchlineConfig, Scorer)> {
    let config = match config_path {
        Some(path) => PunchlineConfig::load_with(path),
        None => PunchlineConfig::load(),
    }
    .context("Failed to load configuration")?;

    let scorer = Scorer::from_config(&config.embeddings).context("Failed to create scorer")?;
    Ok((config, scorer))
}
