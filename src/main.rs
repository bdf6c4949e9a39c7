//! Scale Loop - demo driver
//!
//! Builds a universe with one observer and a handful of plain entities,
//! registers the five built-in rules, runs it for a few ticks and prints what
//! happened and what the observer made of it.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use scale_loop::core::error::Result;
use scale_loop::{Entity, PatternReport, SimulationConfig, Universe, WorldSnapshot};

/// Run a small scale-loop universe and report the observer's patterns
#[derive(Parser, Debug)]
#[command(name = "scale_loop")]
#[command(about = "Simulate entities interacting on the loop of scale")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 10)]
    ticks: u64,

    /// Plain entities to spawn alongside the observer
    #[arg(long, default_value_t = 4)]
    entities: usize,

    /// Random seed for deterministic runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with simulation constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final world snapshot as JSON instead of the tick log
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scale_loop=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    tracing::info!("Starting universe with seed {}", seed);

    let mut universe = Universe::with_standard_rules(config)?;

    // Entities come from their own stream so the roster is replayable too
    let mut spawn_rng = ChaCha8Rng::seed_from_u64(seed);
    let observer = universe.add_entity(Entity::observer_from_rng(&mut spawn_rng));
    for _ in 0..args.entities {
        universe.add_entity(Entity::from_rng(&mut spawn_rng));
    }

    let top_k = universe.config().pattern_top_k;

    for tick in 1..=args.ticks {
        let produced = universe.tick();
        if args.json {
            continue;
        }

        println!("\n--- Tick {} ---", tick);
        if produced.is_empty() {
            println!("No new interactions.");
        } else {
            println!("Generated {} interactions:", produced.len());
            for interaction in &produced {
                let names: Vec<String> = interaction
                    .participants()
                    .iter()
                    .filter_map(|id| universe.entity(*id))
                    .map(|e| e.to_string().replace('\n', " "))
                    .collect();
                println!("  - {} between {}", interaction, names.join(" and "));
            }
        }

        if let Some(report) = universe.entity(observer).and_then(|o| o.find_patterns_top(top_k)) {
            print_patterns(&report);
        }
    }

    if args.json {
        println!("{}", WorldSnapshot::capture(&universe).to_json()?);
    } else {
        println!("\nSimulation finished.");
    }

    Ok(())
}

fn print_patterns(report: &PatternReport) {
    println!("Observer's perceived patterns:");
    println!("  - num_perceived_entities: {}", report.num_perceived_entities);
    println!(
        "  - num_perceived_relationships: {}",
        report.num_perceived_relationships
    );
    println!(
        "  - most_frequent_interactions: {:?}",
        report.most_frequent_interactions
    );
    let hubs: Vec<String> = report
        .highly_connected_entities
        .iter()
        .map(|(id, c)| format!("{}={:.2}", id.short(), c))
        .collect();
    println!("  - highly_connected_entities: [{}]", hubs.join(", "));
    println!("  - num_perceived_clusters: {}", report.num_perceived_clusters);
    let groups: Vec<String> = report
        .perceived_groups
        .iter()
        .map(|(g, n)| format!("{}: {}", g, n))
        .collect();
    println!("  - perceived_groups: {{{}}}", groups.join(", "));
}
