//! Block registry: maps compact [`BlockId`] values to [`BlockDef`] metadata.
//!
//! The registry is built once at startup. Air is always ID 0 so that a
//! zero-initialized chunk buffer represents empty space.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blocks;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored in every chunk cell (2 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u16);

/// Descriptor for a block type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Registry name (e.g. "stone", "grass", "water").
    pub name: String,
}

impl BlockDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors that can occur during block registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block with the same name has already been registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// All 65 536 slots have been consumed.
    #[error("block registry is full (max 65536 blocks)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockId`] to [`BlockDef`] with O(1) lookup by index and by name.
#[derive(Debug)]
pub struct BlockRegistry {
    /// Dense array where `index == BlockId.0`.
    defs: Vec<BlockDef>,
    name_to_id: FxHashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Creates a registry with only air registered, as ID 0.
    pub fn new() -> Self {
        let mut name_to_id = FxHashMap::default();
        name_to_id.insert("air".to_string(), blocks::AIR);
        Self {
            defs: vec![BlockDef::new("air")],
            name_to_id,
        }
    }

    /// Creates a registry holding every block the terrain pipeline places.
    ///
    /// Registration order matches the constants in [`blocks`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            "bedrock",
            "stone",
            "dirt",
            "grass",
            "sand",
            "gravel",
            "water",
            "log",
            "leaves",
            "tall_grass",
            "dandelion",
            "rose",
            "cactus",
            "clay",
            "snow",
            "coal_ore",
            "iron_ore",
            "gold_ore",
            "diamond_ore",
        ];
        for def in defaults {
            // Names above are unique and far below the id limit.
            if let Err(err) = registry.register(BlockDef::new(def)) {
                tracing::error!(%err, "default block registration failed");
            }
        }
        registry
    }

    /// Registers a new block and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken, or
    /// [`RegistryError::RegistryFull`] once all IDs are consumed.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.defs.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = BlockId(self.defs.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.defs.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID, or `None` if unregistered.
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.defs.get(id.0 as usize)
    }

    /// Returns the ID for a named block, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns the total number of registered blocks (including air).
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.defs.len() <= 1
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_id_zero() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.lookup_by_name("air"), Some(BlockId(0)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_defaults_match_constants() {
        let registry = BlockRegistry::with_defaults();
        let expected = [
            ("air", blocks::AIR),
            ("bedrock", blocks::BEDROCK),
            ("stone", blocks::STONE),
            ("dirt", blocks::DIRT),
            ("grass", blocks::GRASS),
            ("sand", blocks::SAND),
            ("gravel", blocks::GRAVEL),
            ("water", blocks::WATER),
            ("log", blocks::LOG),
            ("leaves", blocks::LEAVES),
            ("tall_grass", blocks::TALL_GRASS),
            ("dandelion", blocks::DANDELION),
            ("rose", blocks::ROSE),
            ("cactus", blocks::CACTUS),
            ("clay", blocks::CLAY),
            ("snow", blocks::SNOW),
            ("coal_ore", blocks::COAL_ORE),
            ("iron_ore", blocks::IRON_ORE),
            ("gold_ore", blocks::GOLD_ORE),
            ("diamond_ore", blocks::DIAMOND_ORE),
        ];
        assert_eq!(registry.len(), expected.len());
        for (name, id) in expected {
            assert_eq!(registry.lookup_by_name(name), Some(id), "id mismatch for {name}");
            assert_eq!(registry.get(id).map(|d| d.name.as_str()), Some(name));
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BlockRegistry::with_defaults();
        let result = registry.register(BlockDef::new("stone"));
        assert!(matches!(result, Err(RegistryError::DuplicateName(name)) if name == "stone"));
    }

    #[test]
    fn test_register_assigns_next_id() {
        let mut registry = BlockRegistry::with_defaults();
        let before = registry.len();
        let id = registry.register(BlockDef::new("obsidian")).unwrap();
        assert_eq!(id, BlockId(before as u16));
        assert_eq!(registry.lookup_by_name("obsidian"), Some(id));
    }

    #[test]
    fn test_unknown_id_returns_none() {
        let registry = BlockRegistry::new();
        assert!(registry.get(BlockId(500)).is_none());
    }
}
