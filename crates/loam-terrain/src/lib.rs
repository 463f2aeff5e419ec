//! Procedural terrain: noise fields, climate-driven biome selection, column
//! layering, and per-biome decoration passes.

mod async_generation;
mod column;
mod error;
mod generator;
mod setup;

pub mod biome;
pub mod decorator;
pub mod noise_field;
pub mod seed;

pub use async_generation::{AsyncChunkGenerator, GeneratedChunk, default_thread_count};
pub use biome::{
    Biome, BiomeClassifier, BiomeId, BiomeRegistry, BiomeSelector, ClimateRegion, ClimateSample,
    ClimateSampler, HeightShape, SurfacePalette,
};
pub use column::{ColumnGenerator, ColumnInfo, surface_height};
pub use decorator::{Decorator, decorate_chunk};
pub use error::{DecorateError, GenerationError, RegistryError};
pub use generator::TerrainGenerator;
pub use noise_field::{NoiseField, NoiseLibrary};
pub use seed::{derive_chunk_seed, generate_and_hash, hash_chunk};
