//! Error types for registry construction and chunk generation.

use loam_voxel::ChunkPos;

/// Configuration problems detected while building the generation registry.
///
/// These are startup-time and fatal: a generator is never built from an
/// invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate biome name: {0}")]
    DuplicateBiome(String),

    #[error("duplicate noise module name: {0}")]
    DuplicateNoise(String),

    #[error("noise module `{referenced}` used by {by} is not registered")]
    UnknownNoise { by: String, referenced: String },

    #[error("block `{block}` used by {by} is not registered")]
    UnknownBlock { by: String, block: String },

    #[error("biome `{biome}` used by {by} is not registered")]
    UnknownBiome { by: String, biome: String },

    #[error("biome `{0}` appears more than once in the classifier priority list")]
    DuplicatePriority(String),

    #[error("biome `{0}` is classified but missing from the priority list")]
    MissingPriority(String),

    #[error("invalid climate region for biome `{biome}`: {reason}")]
    InvalidRegion { biome: String, reason: String },

    #[error("invalid {decorator} decorator in biome `{biome}`: {reason}")]
    InvalidDecorator {
        biome: String,
        decorator: &'static str,
        reason: String,
    },

    #[error("invalid height shaping for biome `{biome}`: {reason}")]
    InvalidHeight { biome: String, reason: String },

    #[error("invalid noise module `{name}`: {reason}")]
    InvalidNoise { name: String, reason: String },

    #[error("sea level {0} is outside the world height")]
    InvalidSeaLevel(usize),

    #[error("no biomes registered")]
    NoBiomes,

    #[error("biome registry is full (max 65536 biomes)")]
    TooManyBiomes,
}

/// Failure reported by a single decorator invocation.
#[derive(Debug, thiserror::Error)]
pub enum DecorateError {
    #[error("column ({x}, {z}) is outside the chunk")]
    ColumnOutOfBounds { x: usize, z: usize },

    #[error("{0}")]
    Failed(String),
}

/// Failure of one chunk-generation call. The chunk buffer is discarded.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("decorator `{decorator}` failed in chunk ({}, {}): {source}", .pos.x, .pos.z)]
    Decorator {
        decorator: &'static str,
        pos: ChunkPos,
        #[source]
        source: DecorateError,
    },

    #[error("section {section} is outside the chunk ({count} sections)")]
    SectionOutOfRange { section: usize, count: usize },

    #[error("column ({x}, {z}) is outside the chunk")]
    ColumnOutOfRange { x: usize, z: usize },

    #[error("biome id {0} is not registered")]
    UnknownBiome(u16),
}
