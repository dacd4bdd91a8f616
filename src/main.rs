use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cavern::cli::commands::{self, RunOptions};
use cavern::config::generation::{DungeonParams, GladeParams};
use cavern::config::simulation::SimulationConfig;
use cavern::dungeon::{generate_dungeon, generate_glade, Dungeon};
use cavern::util::random::Random;

type Generator = Box<dyn Fn(u64) -> Dungeon + Sync>;

#[derive(Parser)]
#[command(name = "cavern")]
#[command(about = "A turn-based roguelike simulation: scheduler, creature AI, pathfinding and dungeon generation")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Write logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a level and print a summary
    Generate {
        /// Path to dungeon generation config file
        #[arg(short, long, default_value = "dungeon.toml")]
        dungeon: String,

        /// Generate an organic glade from this config file instead
        #[arg(long)]
        glade: Option<String>,

        /// Print the generated map
        #[arg(long)]
        map: bool,

        /// Generate this many consecutive seeds and summarize them
        #[arg(long)]
        samples: Option<usize>,
    },

    /// Run the simulation
    Run {
        /// Zone to start in (overrides start_zone)
        #[arg(short, long)]
        zone: Option<String>,

        /// Read commands from stdin instead of using the autopilot
        #[arg(short, long)]
        interactive: bool,

        /// Print world events as JSON lines
        #[arg(long)]
        json_events: bool,
    },

    /// Build a world and show its initial state
    Inspect {
        /// Zone to build (overrides start_zone)
        #[arg(short, long)]
        zone: Option<String>,

        /// Print the world view as JSON
        #[arg(long)]
        json: bool,

        /// Print the map
        #[arg(long)]
        map: bool,
    },
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn load_config(path: &str) -> SimulationConfig {
    match SimulationConfig::from_file(Path::new(path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            dungeon,
            glade,
            map,
            samples,
        } => {
            init_logging("warn", cli.json_logs);

            let (seed, generate): (u64, Generator) = match &glade {
                Some(path) => {
                    let params = match GladeParams::from_file(Path::new(path)) {
                        Ok(p) => p,
                        Err(e) => {
                            eprintln!("Error loading generation config: {}", e);
                            std::process::exit(1);
                        }
                    };
                    println!("Generating glade from {}...", path);
                    let seed = params.seed;
                    let generate: Generator =
                        Box::new(move |seed| generate_glade(&GladeParams { seed, ..params.clone() }));
                    (seed, generate)
                }
                None => {
                    let params = match DungeonParams::from_file(Path::new(&dungeon)) {
                        Ok(p) => p,
                        Err(e) => {
                            eprintln!("Error loading generation config: {}", e);
                            std::process::exit(1);
                        }
                    };
                    println!("Generating dungeon from {}...", dungeon);
                    let seed = params.seed;
                    let generate: Generator =
                        Box::new(move |seed| generate_dungeon(&DungeonParams { seed, ..params.clone() }));
                    (seed, generate)
                }
            };

            match samples {
                Some(count) => {
                    let first = Random::resolve_seed(seed);
                    match commands::sample_layouts(first, count, generate) {
                        Some(summary) => commands::print_sample_summary(&summary),
                        None => {
                            eprintln!("--samples must be at least 1");
                            std::process::exit(1);
                        }
                    }
                }
                None => {
                    let layout = generate(seed);
                    commands::show_layout(&layout, map);
                }
            }
        }

        Commands::Run {
            zone,
            interactive,
            json_events,
        } => {
            let config = load_config(&cli.config);
            init_logging(&config.log_level, cli.json_logs);

            let options = RunOptions {
                interactive,
                json_events,
            };
            if let Err(e) = commands::run_simulation(&config, zone.as_deref(), options).await {
                eprintln!("Simulation error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Inspect { zone, json, map } => {
            let config = load_config(&cli.config);
            init_logging(&config.log_level, cli.json_logs);

            if let Err(e) = commands::inspect(&config, zone.as_deref(), json, map) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
