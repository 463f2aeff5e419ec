//! Single-column block buffer.

use crate::blocks;
use crate::chunk::{CHUNK_HEIGHT, SECTION_HEIGHT};
use crate::registry::BlockId;

/// Block ids for one (x, z) column, indexed by `y` from the chunk floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnBuffer {
    blocks: [BlockId; CHUNK_HEIGHT],
}

impl ColumnBuffer {
    /// Creates a column of air.
    pub fn new_air() -> Self {
        Self {
            blocks: [blocks::AIR; CHUNK_HEIGHT],
        }
    }

    /// Returns the block at `y`. Panics if `y >= CHUNK_HEIGHT`.
    pub fn get(&self, y: usize) -> BlockId {
        self.blocks[y]
    }

    /// Sets the block at `y`. Panics if `y >= CHUNK_HEIGHT`.
    pub fn set(&mut self, y: usize, block: BlockId) {
        self.blocks[y] = block;
    }

    /// Fills `[from, to)` with `block`, clamped to the column.
    pub fn fill(&mut self, from: usize, to: usize, block: BlockId) {
        let to = to.min(CHUNK_HEIGHT);
        if from < to {
            self.blocks[from..to].fill(block);
        }
    }

    /// Returns the slice belonging to vertical section `section`.
    pub fn section(&self, section: usize) -> &[BlockId] {
        let start = section * SECTION_HEIGHT;
        &self.blocks[start..start + SECTION_HEIGHT]
    }

    /// All blocks bottom-up.
    pub fn as_slice(&self) -> &[BlockId] {
        &self.blocks
    }
}

impl Default for ColumnBuffer {
    fn default() -> Self {
        Self::new_air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_clamps_to_height() {
        let mut column = ColumnBuffer::new_air();
        column.fill(CHUNK_HEIGHT - 2, CHUNK_HEIGHT + 10, blocks::STONE);
        assert_eq!(column.get(CHUNK_HEIGHT - 1), blocks::STONE);
        assert_eq!(column.get(CHUNK_HEIGHT - 3), blocks::AIR);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut column = ColumnBuffer::new_air();
        column.fill(10, 4, blocks::DIRT);
        assert!(column.as_slice().iter().all(|&b| b == blocks::AIR));
    }

    #[test]
    fn test_section_slices() {
        let mut column = ColumnBuffer::new_air();
        column.set(SECTION_HEIGHT, blocks::GRASS);
        assert_eq!(column.section(1)[0], blocks::GRASS);
        assert_eq!(column.section(0).len(), SECTION_HEIGHT);
    }
}
