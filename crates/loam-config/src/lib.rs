//! Configuration for the Loam terrain generator.
//!
//! Settings persist to disk as RON. The world-generation schema (noise
//! modules, biomes, decorators, climate classification) lives alongside the
//! runtime settings so a whole world is described by one `config.ron`.
//! CLI overrides are applied via clap.

mod cli;
mod config;
mod error;
mod worldgen;

pub use cli::CliArgs;
pub use config::{ClimateConfig, Config, DebugConfig, WorkerConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
pub use worldgen::{
    BiomeConfig, ClassifierConfig, DecoratorConfig, NamedNoise, NoiseBasis, NoiseSpec,
    OreVeinConfig, RegionConfig, TreeKind, default_biomes, default_classifier, default_noise,
    default_ore_veins,
};
