//! Command-line argument parsing for the `loam` generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Loam terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "loam", about = "Procedural terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generate every chunk within this many chunks of the origin.
    #[arg(long, default_value_t = 1)]
    pub radius: u32,

    /// Center chunk X coordinate.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub center_x: i32,

    /// Center chunk Z coordinate.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub center_z: i32,

    /// Force a single biome for every column.
    #[arg(long)]
    pub forced_biome: Option<String>,

    /// Worker thread count.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ref biome) = args.forced_biome {
            self.world.forced_biome = Some(biome.clone());
        }
        if let Some(threads) = args.threads {
            self.workers.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
