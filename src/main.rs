#![warn(non_snake_case)]
//! # BSP Dungeon Entry Point
//!
//! Builds a dungeon from a JSON config (or the defaults) and either opens the
//! egui viewer or prints the layout as text. `RUST_LOG=debug` shows every
//! split decision.
//!
//! ## License
//! Licensed under the MIT License.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use bsp_dungeon::bsp::{render_text, GenerationStats, GeneratorConfig, ProceduralGenerator};

#[derive(Parser, Debug)]
#[command(name = "bsp_dungeon")]
#[command(author, version, about = "Procedural BSP dungeon generator", long_about = None)]
struct Args {
    /// JSON file with generator settings; missing keys use defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Seed for a reproducible layout
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Print the layout as text instead of opening the viewer
    #[arg(short = 't', long = "text")]
    text: bool,

    /// Draw leaf borders in text output
    #[arg(short = 'p', long = "partitions")]
    partitions: bool,

    /// Generate this many layouts (seeds counting up from --seed) and print their stats
    #[arg(long = "sample")]
    sample: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    info!("Using {:?}", config);
    let mut generator = ProceduralGenerator::new(config)?;

    if let Some(count) = args.sample {
        let first = args.seed.unwrap_or(0);
        let seeds: Vec<u64> = (first..first.saturating_add(count)).collect();
        for (seed, dungeon) in seeds.iter().zip(generator.sample(&seeds)) {
            let stats = GenerationStats::measure(&dungeon, 0.0);
            println!(
                "seed {:>6}: {:>3} leaves {:>3} rooms {:>3} corridors {:>5.1}% covered",
                seed,
                stats.leaf_count,
                stats.room_count,
                stats.corridor_count,
                stats.room_coverage * 100.0
            );
        }
        return Ok(());
    }

    generator.regenerate(args.seed);

    // Without the viewer compiled in, text output is the only mode.
    if cfg!(feature = "gui") && !args.text {
        #[cfg(feature = "gui")]
        return bsp_dungeon::ui::run_main_window(generator);
    }

    let current = generator.current();
    print!("{}", render_text(&current.read(), args.partitions));
    Ok(())
}
