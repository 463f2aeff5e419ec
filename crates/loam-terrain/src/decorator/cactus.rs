//! Cacti on sand, never touching another block horizontally.

use loam_voxel::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkBuffer, blocks};
use rand::Rng;

use super::{Decorator, check_column, ground_level, one_in};
use crate::biome::Biome;
use crate::error::DecorateError;
use crate::seed::RandomSource;

#[derive(Clone, Debug)]
pub struct CactusDecorator {
    one_in: u32,
    max_height: usize,
}

impl CactusDecorator {
    pub fn new(one_in: u32, max_height: usize) -> Self {
        Self { one_in, max_height }
    }
}

impl Decorator for CactusDecorator {
    fn name(&self) -> &'static str {
        "cactus"
    }

    fn decorate(
        &self,
        chunk: &mut ChunkBuffer,
        x: usize,
        z: usize,
        _biome: &Biome,
        rng: &mut RandomSource,
    ) -> Result<(), DecorateError> {
        check_column(x, z)?;
        if !one_in(rng, self.one_in) {
            return Ok(());
        }
        // Neighbors must be readable inside this chunk.
        if x == 0 || z == 0 || x + 1 >= CHUNK_WIDTH || z + 1 >= CHUNK_WIDTH {
            return Ok(());
        }
        let Some(ground) = ground_level(chunk, x, z) else {
            return Ok(());
        };
        if chunk.get(x, ground, z) != blocks::SAND {
            return Ok(());
        }

        let height = rng.random_range(1..=self.max_height);
        for y in ground + 1..=ground + height {
            if y >= CHUNK_HEIGHT || chunk.get(x, y, z) != blocks::AIR {
                break;
            }
            let neighbors_clear = [(x - 1, z), (x + 1, z), (x, z - 1), (x, z + 1)]
                .iter()
                .all(|&(nx, nz)| chunk.get(nx, y, nz) == blocks::AIR);
            if !neighbors_clear {
                break;
            }
            chunk.set(x, y, z, blocks::CACTUS);
        }
        Ok(())
    }
}
