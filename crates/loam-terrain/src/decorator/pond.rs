//! Small circular water basins carved into flat ground.

use loam_voxel::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkBuffer, blocks};
use rand::Rng;

use super::{Decorator, check_column, ground_level, one_in};
use crate::biome::Biome;
use crate::error::DecorateError;
use crate::seed::RandomSource;

/// Carves a pond of radius 2..=3 and depth 1..=2 centered on the column.
///
/// A pond is only placed when every basin column has the same ground level,
/// a soil surface and air above it, and the whole basin fits in the chunk.
#[derive(Clone, Debug)]
pub struct PondDecorator {
    one_in: u32,
}

impl PondDecorator {
    pub fn new(one_in: u32) -> Self {
        Self { one_in }
    }
}

impl Decorator for PondDecorator {
    fn name(&self) -> &'static str {
        "pond"
    }

    fn decorate(
        &self,
        chunk: &mut ChunkBuffer,
        x: usize,
        z: usize,
        biome: &Biome,
        rng: &mut RandomSource,
    ) -> Result<(), DecorateError> {
        check_column(x, z)?;
        if !one_in(rng, self.one_in) {
            return Ok(());
        }
        let radius: usize = rng.random_range(2..=3);
        let depth: usize = rng.random_range(1..=2);

        if x < radius || z < radius || x + radius >= CHUNK_WIDTH || z + radius >= CHUNK_WIDTH {
            return Ok(());
        }
        let Some(level) = ground_level(chunk, x, z) else {
            return Ok(());
        };
        if level <= depth {
            return Ok(());
        }

        let r = radius as i32;
        let basin: Vec<(usize, usize)> = (-r..=r)
            .flat_map(|dz| (-r..=r).map(move |dx| (dx, dz)))
            .filter(|(dx, dz)| dx * dx + dz * dz <= r * r)
            .map(|(dx, dz)| ((x as i32 + dx) as usize, (z as i32 + dz) as usize))
            .collect();

        let suitable = basin.iter().all(|&(bx, bz)| {
            ground_level(chunk, bx, bz) == Some(level)
                && matches!(chunk.get(bx, level, bz), blocks::GRASS | blocks::DIRT | blocks::SAND)
        });
        if !suitable {
            return Ok(());
        }

        let floor = level - depth;
        let filler = biome.palette().filler;
        for &(bx, bz) in &basin {
            chunk.set(bx, floor, bz, filler);
            for y in floor + 1..=level {
                chunk.set(bx, y, bz, blocks::WATER);
            }
            // Plants above the basin would float on the water.
            if level + 1 < CHUNK_HEIGHT && blocks::is_plant(chunk.get(bx, level + 1, bz)) {
                chunk.set(bx, level + 1, bz, blocks::AIR);
            }
        }
        tracing::trace!(x, z, radius, depth, level, "pond carved");
        Ok(())
    }
}
