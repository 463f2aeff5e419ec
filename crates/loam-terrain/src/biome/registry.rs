//! Biome registry: maps [`BiomeId`] to [`Biome`] with name-based lookup.

use hashbrown::HashMap;

use super::Biome;
use crate::error::RegistryError;

/// Unique identifier for a biome. Stored per column in chunk buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

/// Stores all registered biomes with O(1) lookup by ID.
///
/// Read-only once generation starts; shared across workers behind an `Arc`.
#[derive(Debug)]
pub struct BiomeRegistry {
    biomes: Vec<Biome>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            biomes: Vec::new(),
            name_to_id: HashMap::new(),
        }
    }

    /// Registers a biome, returning its assigned [`BiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateBiome`] if the name is taken,
    /// [`RegistryError::TooManyBiomes`] when ids are exhausted, and any
    /// height-shaping error from [`Biome::validate`].
    pub fn register(&mut self, biome: Biome) -> Result<BiomeId, RegistryError> {
        if self.name_to_id.contains_key(biome.name()) {
            return Err(RegistryError::DuplicateBiome(biome.name().to_string()));
        }
        biome.validate()?;
        let id = u16::try_from(self.biomes.len())
            .map(BiomeId)
            .map_err(|_| RegistryError::TooManyBiomes)?;
        self.name_to_id.insert(biome.name().to_string(), id);
        self.biomes.push(biome);
        Ok(id)
    }

    /// Returns the biome for the given ID, or `None` if it is not registered.
    pub fn get(&self, id: BiomeId) -> Option<&Biome> {
        self.biomes.get(usize::from(id.0))
    }

    /// Looks up a biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// Name of a registered biome, or `#<id>` for an unknown one.
    pub fn display_name(&self, id: BiomeId) -> String {
        self.get(id)
            .map(|b| b.name().to_string())
            .unwrap_or_else(|| format!("#{}", id.0))
    }

    /// Iterates biomes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &Biome)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, b)| (BiomeId(i as u16), b))
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
