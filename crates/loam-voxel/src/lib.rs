//! Block storage for generated terrain: block ids, the block registry, and the
//! dense chunk and column buffers handed between the generator and its host.

pub mod blocks;
pub mod chunk;
pub mod column;
pub mod registry;

pub use chunk::{
    BleedPolicy, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH, ChunkBuffer, ChunkPos,
    Placement, SECTION_COUNT, SECTION_HEIGHT, SpilledBlock,
};
pub use column::ColumnBuffer;
pub use registry::{BlockDef, BlockId, BlockRegistry, RegistryError};
