//! Ore veins: short random walks through stone.

use loam_voxel::{BleedPolicy, BlockId, ChunkBuffer, blocks};
use rand::Rng;

use super::{Decorator, check_column, one_in};
use crate::biome::Biome;
use crate::error::DecorateError;
use crate::seed::RandomSource;

/// One ore type with its placement parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OreVein {
    pub block: BlockId,
    /// One column in `one_in` starts a vein.
    pub one_in: u32,
    pub min_y: usize,
    pub max_y: usize,
    /// Maximum blocks visited by the walk.
    pub size: usize,
}

/// Places every configured vein type, common first.
#[derive(Clone, Debug)]
pub struct OreDecorator {
    veins: Vec<OreVein>,
}

impl OreDecorator {
    pub fn new(veins: Vec<OreVein>) -> Self {
        Self { veins }
    }

    pub fn veins(&self) -> &[OreVein] {
        &self.veins
    }
}

impl Decorator for OreDecorator {
    fn name(&self) -> &'static str {
        "ore"
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
        for vein in &self.veins {
            if !one_in(rng, vein.one_in) {
                continue;
            }
            let y = rng.random_range(vein.min_y..=vein.max_y);
            let length = rng.random_range(1..=vein.size);
            let (mut px, mut py, mut pz) = (x as i32, y as i32, z as i32);
            for _ in 0..length {
                if chunk.get_local(px, py, pz) == Some(blocks::STONE) {
                    chunk.place(px, py, pz, vein.block, 0, BleedPolicy::Contained);
                }
                px += rng.random_range(-1..=1);
                py += rng.random_range(-1..=1);
                pz += rng.random_range(-1..=1);
            }
        }
        Ok(())
    }
}
