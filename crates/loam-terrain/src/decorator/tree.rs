//! Oak and spruce trees.
//!
//! Canopies may extend past the chunk edge; those leaves are recorded as
//! overflow for the host to apply to the neighboring chunk.

use loam_config::TreeKind;
use loam_voxel::{BleedPolicy, CHUNK_HEIGHT, ChunkBuffer, blocks};
use rand::Rng;

use super::{Decorator, check_column, ground_level, one_in};
use crate::biome::Biome;
use crate::error::DecorateError;
use crate::seed::RandomSource;

/// Minimum horizontal distance between two trunks inside one chunk.
const TRUNK_SPACING: i32 = 2;

#[derive(Clone, Debug)]
pub struct TreeDecorator {
    one_in: u32,
    kind: TreeKind,
}

impl TreeDecorator {
    pub fn new(one_in: u32, kind: TreeKind) -> Self {
        Self { one_in, kind }
    }

    fn trunk_height(&self, rng: &mut RandomSource) -> usize {
        match self.kind {
            TreeKind::Oak => rng.random_range(4..=6),
            TreeKind::Spruce => rng.random_range(6..=8),
        }
    }

    fn wood_data(&self) -> u8 {
        match self.kind {
            TreeKind::Oak => blocks::WOOD_DATA_OAK,
            TreeKind::Spruce => blocks::WOOD_DATA_SPRUCE,
        }
    }
}

impl Decorator for TreeDecorator {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn bleed_policy(&self) -> BleedPolicy {
        BleedPolicy::Spill
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
        if !matches!(chunk.get(x, ground, z), blocks::GRASS | blocks::DIRT) {
            return Ok(());
        }
        let trunk = self.trunk_height(rng);
        let top = ground + trunk;
        // Room for the canopy cap above the last log.
        if top + 2 >= CHUNK_HEIGHT {
            return Ok(());
        }
        let trunk_clear = (ground + 1..=top).all(|y| {
            let b = chunk.get(x, y, z);
            b == blocks::AIR || blocks::is_plant(b)
        });
        if !trunk_clear || log_nearby(chunk, x as i32, ground as i32, top as i32, z as i32) {
            return Ok(());
        }

        let data = self.wood_data();
        chunk.set(x, ground, z, blocks::DIRT);
        let (cx, cz) = (x as i32, z as i32);
        match self.kind {
            TreeKind::Oak => oak_canopy(chunk, cx, top as i32, cz, data, rng),
            TreeKind::Spruce => spruce_canopy(chunk, cx, top as i32, cz, trunk as i32, data),
        }
        for y in ground + 1..=top {
            chunk.set(x, y, z, blocks::LOG);
            chunk.set_data(x, y, z, data);
        }
        tracing::trace!(x, z, ground, trunk, kind = ?self.kind, "tree placed");
        Ok(())
    }
}

fn log_nearby(chunk: &ChunkBuffer, x: i32, ground: i32, top: i32, z: i32) -> bool {
    for dz in -TRUNK_SPACING..=TRUNK_SPACING {
        for dx in -TRUNK_SPACING..=TRUNK_SPACING {
            if dx == 0 && dz == 0 {
                continue;
            }
            for y in ground - 4..=top {
                if chunk.get_local(x + dx, y, z + dz) == Some(blocks::LOG) {
                    return true;
                }
            }
        }
    }
    false
}

/// Places a leaf unless something solid already occupies the cell.
fn place_leaf(chunk: &mut ChunkBuffer, x: i32, y: i32, z: i32, data: u8) {
    match chunk.get_local(x, y, z) {
        Some(b) if b != blocks::AIR && !blocks::is_plant(b) => {}
        _ => {
            chunk.place(x, y, z, blocks::LEAVES, data, BleedPolicy::Spill);
        }
    }
}

/// Two wide layers below the top log, two narrow layers above, corners
/// randomly trimmed.
fn oak_canopy(chunk: &mut ChunkBuffer, x: i32, top: i32, z: i32, data: u8, rng: &mut RandomSource) {
    for dy in -2..=1 {
        let radius: i32 = if dy < 0 { 2 } else { 1 };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 && dy <= 0 {
                    continue;
                }
                let corner = dx.abs() == radius && dz.abs() == radius;
                if corner && (dy == 1 || !rng.random_bool(0.5)) {
                    continue;
                }
                place_leaf(chunk, x + dx, top + dy, z + dz, data);
            }
        }
    }
}

/// Alternating radius 1 and 2 rings narrowing to a single leaf above the top.
fn spruce_canopy(chunk: &mut ChunkBuffer, x: i32, top: i32, z: i32, trunk: i32, data: u8) {
    let layers = trunk - 2;
    for i in 0..layers {
        let y = top + 1 - i;
        let radius: i32 = match i {
            0 => 0,
            i if i % 2 == 1 => 1,
            _ => 2,
        };
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 && i > 0 {
                    continue;
                }
                if radius == 2 && dx.abs() == 2 && dz.abs() == 2 {
                    continue;
                }
                place_leaf(chunk, x + dx, y, z + dz, data);
            }
        }
    }
}
