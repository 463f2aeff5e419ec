//! Well-known block ids.
//!
//! These match the registration order of [`BlockRegistry::with_defaults`](crate::BlockRegistry::with_defaults).

use crate::registry::BlockId;

pub const AIR: BlockId = BlockId(0);
pub const BEDROCK: BlockId = BlockId(1);
pub const STONE: BlockId = BlockId(2);
pub const DIRT: BlockId = BlockId(3);
pub const GRASS: BlockId = BlockId(4);
pub const SAND: BlockId = BlockId(5);
pub const GRAVEL: BlockId = BlockId(6);
pub const WATER: BlockId = BlockId(7);
pub const LOG: BlockId = BlockId(8);
pub const LEAVES: BlockId = BlockId(9);
pub const TALL_GRASS: BlockId = BlockId(10);
pub const DANDELION: BlockId = BlockId(11);
pub const ROSE: BlockId = BlockId(12);
pub const CACTUS: BlockId = BlockId(13);
pub const CLAY: BlockId = BlockId(14);
pub const SNOW: BlockId = BlockId(15);
pub const COAL_ORE: BlockId = BlockId(16);
pub const IRON_ORE: BlockId = BlockId(17);
pub const GOLD_ORE: BlockId = BlockId(18);
pub const DIAMOND_ORE: BlockId = BlockId(19);

/// Sub-data value for the grass variant of [`TALL_GRASS`].
pub const TALL_GRASS_DATA_GRASS: u8 = 1;

/// Sub-data values for [`LOG`] and [`LEAVES`] wood species.
pub const WOOD_DATA_OAK: u8 = 0;
pub const WOOD_DATA_SPRUCE: u8 = 1;

/// Returns `true` for small plants that never count as ground.
pub fn is_plant(id: BlockId) -> bool {
    matches!(id, TALL_GRASS | DANDELION | ROSE)
}
