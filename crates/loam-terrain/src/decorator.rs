//! Decoration: per-column feature placement after base terrain.
//!
//! Decoration runs pass-major: pass `k` invokes the `k`-th decorator of each
//! column's biome over every column of the chunk (z outer, x inner) before
//! pass `k + 1` starts. Within a biome the configured decorator order is
//! therefore the order in which whole-chunk effects become visible, so a
//! pond decorated before trees never floods a trunk.

mod cactus;
mod grass;
mod ore;
mod pond;
mod tree;

use std::sync::Arc;

use loam_config::DecoratorConfig;
use loam_voxel::{
    BleedPolicy, BlockRegistry, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_WIDTH, ChunkBuffer, blocks,
};
use rand::Rng;

pub use cactus::CactusDecorator;
pub use grass::GrassDecorator;
pub use ore::{OreDecorator, OreVein};
pub use pond::PondDecorator;
pub use tree::TreeDecorator;

use crate::biome::{Biome, BiomeId, BiomeRegistry};
use crate::error::{DecorateError, GenerationError, RegistryError};
use crate::seed::RandomSource;

/// A feature placer invoked once per column per pass.
///
/// Decorators are shared across worker threads and must not hold mutable
/// state; all randomness comes from the `rng` argument.
pub trait Decorator: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// How writes outside the chunk's horizontal bounds are handled.
    fn bleed_policy(&self) -> BleedPolicy {
        BleedPolicy::Contained
    }

    /// Decorate column `(column_x, column_z)` of `chunk`.
    ///
    /// # Errors
    ///
    /// Any error aborts generation of the whole chunk.
    fn decorate(
        &self,
        chunk: &mut ChunkBuffer,
        column_x: usize,
        column_z: usize,
        biome: &Biome,
        rng: &mut RandomSource,
    ) -> Result<(), DecorateError>;
}

/// Run every biome's decorators over `chunk` in pass-major order.
///
/// # Errors
///
/// Returns [`GenerationError::Decorator`] for the first failing decorator and
/// [`GenerationError::UnknownBiome`] if a column holds an unregistered biome.
pub fn decorate_chunk(
    chunk: &mut ChunkBuffer,
    biomes: &BiomeRegistry,
    rng: &mut RandomSource,
) -> Result<(), GenerationError> {
    let pos = chunk.pos();
    let mut column_biomes = Vec::with_capacity(CHUNK_AREA);
    for z in 0..CHUNK_WIDTH {
        for x in 0..CHUNK_WIDTH {
            let id = BiomeId(chunk.biome(x, z));
            let biome = biomes.get(id).ok_or(GenerationError::UnknownBiome(id.0))?;
            column_biomes.push(biome);
        }
    }

    let passes = column_biomes
        .iter()
        .map(|b| b.decorators().len())
        .max()
        .unwrap_or(0);

    for pass in 0..passes {
        for (index, biome) in column_biomes.iter().enumerate() {
            let Some(decorator) = biome.decorators().get(pass) else {
                continue;
            };
            let (x, z) = (index % CHUNK_WIDTH, index / CHUNK_WIDTH);
            decorator
                .decorate(chunk, x, z, biome, rng)
                .map_err(|source| GenerationError::Decorator {
                    decorator: decorator.name(),
                    pos,
                    source,
                })?;
        }
    }
    Ok(())
}

/// Instantiate a configured decorator for `biome`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownBlock`] for unregistered ore blocks and
/// [`RegistryError::InvalidDecorator`] for out-of-range parameters.
pub fn from_config(
    biome: &str,
    config: &DecoratorConfig,
    block_registry: &BlockRegistry,
) -> Result<Arc<dyn Decorator>, RegistryError> {
    let invalid = |decorator: &'static str, reason: String| RegistryError::InvalidDecorator {
        biome: biome.to_string(),
        decorator,
        reason,
    };
    let decorator: Arc<dyn Decorator> = match config {
        DecoratorConfig::Pond { one_in } => Arc::new(PondDecorator::new(*one_in)),
        DecoratorConfig::Tree { one_in, kind } => Arc::new(TreeDecorator::new(*one_in, *kind)),
        DecoratorConfig::Grass {
            one_in,
            flower_one_in,
        } => Arc::new(GrassDecorator::new(*one_in, *flower_one_in)),
        DecoratorConfig::Cactus { one_in, max_height } => {
            if *max_height == 0 || *max_height as usize >= CHUNK_HEIGHT {
                return Err(invalid("cactus", format!("max_height {max_height} out of range")));
            }
            Arc::new(CactusDecorator::new(*one_in, *max_height as usize))
        }
        DecoratorConfig::Ore { veins } => {
            let mut resolved = Vec::with_capacity(veins.len());
            for vein in veins {
                let block = block_registry.lookup_by_name(&vein.block).ok_or_else(|| {
                    RegistryError::UnknownBlock {
                        by: format!("ore decorator of biome `{biome}`"),
                        block: vein.block.clone(),
                    }
                })?;
                if vein.min_y > vein.max_y || vein.max_y as usize >= CHUNK_HEIGHT {
                    return Err(invalid(
                        "ore",
                        format!("{}: y range {}..={} out of range", vein.block, vein.min_y, vein.max_y),
                    ));
                }
                if vein.size == 0 {
                    return Err(invalid("ore", format!("{}: vein size must be positive", vein.block)));
                }
                resolved.push(OreVein {
                    block,
                    one_in: vein.one_in,
                    min_y: vein.min_y as usize,
                    max_y: vein.max_y as usize,
                    size: vein.size as usize,
                });
            }
            Arc::new(OreDecorator::new(resolved))
        }
    };
    Ok(decorator)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `true` with probability `1 / n`; never for `n == 0`.
pub(crate) fn one_in(rng: &mut RandomSource, n: u32) -> bool {
    n > 0 && rng.random_ratio(1, n)
}

/// Highest block of column `(x, z)` that features can stand on.
///
/// Leaves and small plants are skipped.
pub(crate) fn ground_level(chunk: &ChunkBuffer, x: usize, z: usize) -> Option<usize> {
    chunk.highest_where(x, z, |b| {
        b != blocks::AIR && b != blocks::LEAVES && !blocks::is_plant(b)
    })
}

pub(crate) fn check_column(x: usize, z: usize) -> Result<(), DecorateError> {
    if x >= CHUNK_WIDTH || z >= CHUNK_WIDTH {
        return Err(DecorateError::ColumnOutOfBounds { x, z });
    }
    Ok(())
}
