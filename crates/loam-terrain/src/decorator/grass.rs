//! Tall grass and flowers on grass blocks.

use loam_voxel::{CHUNK_HEIGHT, ChunkBuffer, blocks};
use rand::Rng;

use super::{Decorator, check_column, ground_level, one_in};
use crate::biome::Biome;
use crate::error::DecorateError;
use crate::seed::RandomSource;

#[derive(Clone, Debug)]
pub struct GrassDecorator {
    one_in: u32,
    /// Chance that a placed plant is a flower instead of tall grass.
    flower_one_in: u32,
}

impl GrassDecorator {
    pub fn new(one_in: u32, flower_one_in: u32) -> Self {
        Self {
            one_in,
            flower_one_in,
        }
    }
}

impl Decorator for GrassDecorator {
    fn name(&self) -> &'static str {
        "grass"
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
        let Some(ground) = ground_level(chunk, x, z) else {
            return Ok(());
        };
        if chunk.get(x, ground, z) != blocks::GRASS
            || ground + 1 >= CHUNK_HEIGHT
            || chunk.get(x, ground + 1, z) != blocks::AIR
        {
            return Ok(());
        }

        let (plant, data) = if one_in(rng, self.flower_one_in) {
            if rng.random_bool(0.5) {
                (blocks::DANDELION, 0)
            } else {
                (blocks::ROSE, 0)
            }
        } else {
            (blocks::TALL_GRASS, blocks::TALL_GRASS_DATA_GRASS)
        };
        chunk.set(x, ground + 1, z, plant);
        chunk.set_data(x, ground + 1, z, data);
        Ok(())
    }
}
