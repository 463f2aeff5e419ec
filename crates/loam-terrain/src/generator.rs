//! Chunk generation entry point: base terrain followed by decoration.

use std::sync::Arc;
use std::time::Instant;

use loam_config::Config;
use loam_voxel::{CHUNK_WIDTH, ChunkBuffer, ChunkPos};

use crate::biome::BiomeRegistry;
use crate::column::ColumnGenerator;
use crate::decorator::decorate_chunk;
use crate::error::{GenerationError, RegistryError};
use crate::seed::chunk_rng;
use crate::setup::build_generator;

/// Generates complete chunks for one world seed.
///
/// Immutable after construction and shared across worker threads; every
/// call to [`TerrainGenerator::generate_chunk`] owns its own buffer and
/// random stream, so output never depends on call order or thread.
pub struct TerrainGenerator {
    seed: u64,
    columns: ColumnGenerator,
}

impl TerrainGenerator {
    pub fn new(seed: u64, columns: ColumnGenerator) -> Self {
        Self { seed, columns }
    }

    /// Builds a generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for any unresolved name or invalid
    /// parameter in `config`.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        build_generator(config)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn biomes(&self) -> &Arc<BiomeRegistry> {
        self.columns.biomes()
    }

    pub fn columns(&self) -> &ColumnGenerator {
        &self.columns
    }

    /// Base terrain only: every column filled, no decoration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if a column cannot be generated.
    pub fn generate_terrain(&self, chunk_x: i32, chunk_z: i32) -> Result<ChunkBuffer, GenerationError> {
        let mut chunk = ChunkBuffer::new_air(ChunkPos::new(chunk_x, chunk_z));
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                self.columns.generate_full_column(&mut chunk, x, z)?;
            }
        }
        Ok(chunk)
    }

    /// Generates the complete chunk at `(chunk_x, chunk_z)`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if base terrain or any decorator fails; no
    /// partial chunk is returned.
    pub fn generate_chunk(&self, chunk_x: i32, chunk_z: i32) -> Result<ChunkBuffer, GenerationError> {
        let _span = tracing::debug_span!("generate_chunk", x = chunk_x, z = chunk_z).entered();
        let start = Instant::now();

        let mut chunk = self.generate_terrain(chunk_x, chunk_z)?;
        let mut rng = chunk_rng(self.seed, chunk.pos());
        decorate_chunk(&mut chunk, self.columns.biomes(), &mut rng)?;

        tracing::debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            overflow = chunk.overflow().len(),
            "chunk generated"
        );
        Ok(chunk)
    }
}
