//! Command line driver for the catalog simulator and the canned demo scenarios.

use anyhow::{bail, Context};
use bibcat::simulation::{self, Simulation, SimulationConfig};
use bibcat::{Book, BookCollection, Library};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Exercise an in-memory library catalog
#[derive(Parser, Debug)]
#[command(name = "bibcat", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a randomized add/remove/search simulation
    Simulate {
        /// Number of events to run
        #[arg(short, long, default_value_t = 20)]
        steps: usize,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Probability that a generated book is digital
        #[arg(long, default_value_t = 0.5)]
        digital_ratio: f64,
    },
    /// Run one of the canned demo scenarios (1-5)
    Scenario {
        /// Scenario number
        number: u8,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Simulate {
            steps,
            seed,
            digital_ratio,
        } => {
            let config = SimulationConfig {
                steps,
                seed,
                digital_ratio,
                ..SimulationConfig::default()
            };
            config.validate()?;
            simulate(config)
        },
        Command::Scenario { number } => run_scenario(number),
    }
}

fn simulate(config: SimulationConfig) -> anyhow::Result<()> {
    let mut simulation = Simulation::new(config.clone());
    for step in 1..=config.steps {
        let report = simulation
            .step()
            .with_context(|| format!("simulation failed at step {step}"))?;
        println!("\nStep {step}");
        println!("{report}");
    }
    Ok(())
}

fn run_scenario(number: u8) -> anyhow::Result<()> {
    match number {
        1 => simulate(SimulationConfig {
            steps: 1,
            seed: Some(42),
            ..SimulationConfig::default()
        }),
        2 => {
            let mut library = Library::new();
            library.add_book(Book::printed("ISBN-1", "Test", "Author", 2000, "novel", 100))?;
            let result = library.find_by_genre("novel");
            println!("Found: {}", result.len());
            Ok(())
        },
        3 => {
            let mut rng = StdRng::seed_from_u64(1);
            let mut library = Library::new();
            println!("{}", simulation::remove_book_event(&mut library, &mut rng)?);
            Ok(())
        },
        4 => {
            let mut first = BookCollection::new();
            let second = BookCollection::new();
            first.add(Book::printed("ISBN-A", "A", "Author", 2000, "novel", 100));
            println!("len(first) = {}", first.len());
            println!("len(second) = {}", second.len());
            println!(
                "same_storage = {}",
                std::ptr::eq(first.as_slice(), second.as_slice())
            );
            Ok(())
        },
        5 => {
            let mut rng = StdRng::seed_from_u64(17);
            let config = SimulationConfig::default();
            let mut library = Library::new();
            println!("{}", simulation::add_book_event(&mut library, &mut rng, &config)?);
            println!("{}", simulation::search_year_event(&library, &mut rng, &config));
            println!("{}", simulation::search_genre_event(&library, &mut rng));
            Ok(())
        },
        other => bail!("unknown scenario {other}, expected 1-5"),
    }
}
