//! Dense chunk storage for 16×128×16 block volumes.
//!
//! A [`ChunkBuffer`] holds one block id and one sub-data byte per cell, the
//! biome of every column, and the list of blocks a decorator placed outside
//! the chunk's horizontal bounds (see [`BleedPolicy`]).

use serde::{Deserialize, Serialize};

use crate::blocks;
use crate::column::ColumnBuffer;
use crate::registry::BlockId;

/// Side length of a chunk along X and Z.
pub const CHUNK_WIDTH: usize = 16;

/// Height of a chunk in blocks.
pub const CHUNK_HEIGHT: usize = 128;

/// Height of one vertical section.
pub const SECTION_HEIGHT: usize = 16;

/// Number of vertical sections in a chunk.
pub const SECTION_COUNT: usize = CHUNK_HEIGHT / SECTION_HEIGHT;

/// Number of columns in a chunk.
pub const CHUNK_AREA: usize = CHUNK_WIDTH * CHUNK_WIDTH;

/// Number of cells in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_HEIGHT;

/// Horizontal chunk coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World coordinates of the chunk's (0, 0) column.
    ///
    /// Computed in `i64` so the extreme `i32` chunk coordinates do not wrap.
    pub fn origin(&self) -> (i64, i64) {
        (
            i64::from(self.x) * CHUNK_WIDTH as i64,
            i64::from(self.z) * CHUNK_WIDTH as i64,
        )
    }
}

/// How a feature write outside the chunk's horizontal bounds is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BleedPolicy {
    /// The write is dropped; the feature is clipped at the chunk edge.
    Contained,
    /// The write is recorded in [`ChunkBuffer::overflow`] for the host to
    /// apply to the neighboring chunk.
    Spill,
}

/// Result of [`ChunkBuffer::place`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Written into this chunk.
    Placed,
    /// Recorded as overflow for a neighboring chunk.
    Spilled,
    /// Discarded (outside the chunk with [`BleedPolicy::Contained`], or
    /// above/below the world).
    Dropped,
}

/// A block a decorator placed beyond this chunk, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpilledBlock {
    pub x: i64,
    pub y: i32,
    pub z: i64,
    pub block: BlockId,
    pub data: u8,
}

/// Dense block storage for one chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkBuffer {
    pos: ChunkPos,
    blocks: Vec<BlockId>,
    data: Vec<u8>,
    biomes: Vec<u16>,
    overflow: Vec<SpilledBlock>,
}

impl ChunkBuffer {
    /// Creates an all-air chunk at `pos`.
    pub fn new_air(pos: ChunkPos) -> Self {
        Self {
            pos,
            blocks: vec![blocks::AIR; CHUNK_VOLUME],
            data: vec![0; CHUNK_VOLUME],
            biomes: vec![0; CHUNK_AREA],
            overflow: Vec::new(),
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Returns the block at local `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if a coordinate is outside the chunk.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[Self::linear_index(x, y, z)]
    }

    /// Sets the block at local `(x, y, z)` and clears its sub-data.
    ///
    /// # Panics
    ///
    /// Panics if a coordinate is outside the chunk.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        let index = Self::linear_index(x, y, z);
        self.blocks[index] = block;
        self.data[index] = 0;
    }

    /// Returns the sub-data byte at local `(x, y, z)`.
    pub fn get_data(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[Self::linear_index(x, y, z)]
    }

    /// Sets the sub-data byte at local `(x, y, z)`.
    pub fn set_data(&mut self, x: usize, y: usize, z: usize, data: u8) {
        self.data[Self::linear_index(x, y, z)] = data;
    }

    /// Bounds-checked read with signed local coordinates.
    ///
    /// Returns `None` for positions outside this chunk.
    pub fn get_local(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        let (x, y, z) = Self::checked_local(x, y, z)?;
        Some(self.get(x, y, z))
    }

    /// Places a block at signed local coordinates under the given policy.
    ///
    /// Positions above or below the world are always dropped. Positions
    /// beyond the horizontal bounds are dropped or spilled per `policy`.
    pub fn place(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block: BlockId,
        data: u8,
        policy: BleedPolicy,
    ) -> Placement {
        if y < 0 || y >= CHUNK_HEIGHT as i32 {
            return Placement::Dropped;
        }
        if let Some((lx, ly, lz)) = Self::checked_local(x, y, z) {
            self.set(lx, ly, lz, block);
            self.set_data(lx, ly, lz, data);
            return Placement::Placed;
        }
        match policy {
            BleedPolicy::Contained => Placement::Dropped,
            BleedPolicy::Spill => {
                let (origin_x, origin_z) = self.pos.origin();
                self.overflow.push(SpilledBlock {
                    x: origin_x + i64::from(x),
                    y,
                    z: origin_z + i64::from(z),
                    block,
                    data,
                });
                Placement::Spilled
            }
        }
    }

    /// Blocks placed beyond this chunk, in placement order.
    pub fn overflow(&self) -> &[SpilledBlock] {
        &self.overflow
    }

    /// Raw biome id of column `(x, z)`.
    pub fn biome(&self, x: usize, z: usize) -> u16 {
        self.biomes[Self::column_index(x, z)]
    }

    pub fn set_biome(&mut self, x: usize, z: usize, biome: u16) {
        self.biomes[Self::column_index(x, z)] = biome;
    }

    /// Biome id per column, x fastest.
    pub fn column_biomes(&self) -> &[u16] {
        &self.biomes
    }

    /// Copies column `(x, z)` into a [`ColumnBuffer`].
    pub fn column(&self, x: usize, z: usize) -> ColumnBuffer {
        let mut column = ColumnBuffer::new_air();
        for y in 0..CHUNK_HEIGHT {
            column.set(y, self.get(x, y, z));
        }
        column
    }

    /// Writes an entire column into the chunk.
    pub fn write_column(&mut self, x: usize, z: usize, column: &ColumnBuffer) {
        for (y, &block) in column.as_slice().iter().enumerate() {
            self.set(x, y, z, block);
        }
    }

    /// Writes only vertical section `section` of `column` into the chunk.
    ///
    /// # Panics
    ///
    /// Panics if `section >= SECTION_COUNT`.
    pub fn write_section(&mut self, x: usize, section: usize, z: usize, column: &ColumnBuffer) {
        let base = section * SECTION_HEIGHT;
        for (offset, &block) in column.section(section).iter().enumerate() {
            self.set(x, base + offset, z, block);
        }
    }

    /// Highest `y` in column `(x, z)` whose block satisfies `pred`.
    pub fn highest_where(
        &self,
        x: usize,
        z: usize,
        pred: impl Fn(BlockId) -> bool,
    ) -> Option<usize> {
        (0..CHUNK_HEIGHT).rev().find(|&y| pred(self.get(x, y, z)))
    }

    /// Number of cells holding `block`.
    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }

    /// All block ids in storage order (x fastest, then z, then y).
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// All sub-data bytes in storage order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Converts `(x, y, z)` to a linear index (x varies fastest, y slowest).
    fn linear_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_WIDTH && y < CHUNK_HEIGHT && z < CHUNK_WIDTH);
        x + z * CHUNK_WIDTH + y * CHUNK_AREA
    }

    fn column_index(x: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_WIDTH && z < CHUNK_WIDTH);
        x + z * CHUNK_WIDTH
    }

    fn checked_local(x: i32, y: i32, z: i32) -> Option<(usize, usize, usize)> {
        let width = CHUNK_WIDTH as i32;
        if (0..width).contains(&x) && (0..CHUNK_HEIGHT as i32).contains(&y) && (0..width).contains(&z)
        {
            Some((x as usize, y as usize, z as usize))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
