//! Score a handful of answers with several personalities.
//!
//! Uses the offline hashing provider unless built with `embeddings-local`:
//!
//! ```sh
//! cargo run -p punchline-core --example chicken --features embeddings-local
//! ```

use punchline_core::prelude::*;

fn main() -> Result<()> {
    let mut embeddings = EmbeddingsConfig::default();
    if cfg!(feature = "embeddings-local") {
        embeddings.provider = EmbeddingProviderKind::Local;
    }
    let scorer = Scorer::from_config(&embeddings)?;

    let prompt = "Why did the chicken cross the road?";
    let answers = [
        "To get to the other side.",
        "A keg stand.",
        "Grandma's secret recipe.",
        "Student loans.",
    ];

    let agents: Vec<Box<dyn Agent>> = vec![
        Box::new(PersonalityAgent::new("a college frat boy").with_power(5.0)),
        Box::new(PersonalityAgent::new("a sweet old grandmother").with_power(5.0)),
        Box::new(LexicographicAgent::new()),
        Box::new(RandomAgent::new()),
    ];
    let refs: Vec<&dyn Agent> = agents.iter().map(|a| a.as_ref()).collect();

    let matrix = scorer.scores(prompt, &refs, &answers)?;

    println!("{}", prompt);
    for (agent, row) in refs.iter().zip(matrix.rows()) {
        println!("\n{}:", agent.name());
        for (answer, p) in answers.iter().zip(row) {
            println!("  {:>6.2}%  {}", p * 100.0, answer);
        }
    }

    let judge = PersonalityAgent::new("a college frat boy").with_power(5.0);
    let winner = scorer.choose(prompt, &judge, &answers)?;
    println!("\nThe frat boy judge picks: {}", answers[winner]);

    Ok(())
}
