//! Base terrain for one column: biome selection, density scan and layering.
//!
//! The surface height is the highest `y` with positive density
//! `base_height - y + height_variation * noise(x, y, z)`. Below it the column
//! is bedrock at `y = 0`, stone, then `topsoil_depth` layers of filler and the
//! surface block. Columns whose surface lies below sea level get the
//! underwater block and water up to sea level.

use std::sync::Arc;

use loam_voxel::{
    CHUNK_HEIGHT, CHUNK_WIDTH, ChunkBuffer, ColumnBuffer, SECTION_COUNT, blocks,
};

use crate::biome::{Biome, BiomeId, BiomeRegistry, BiomeSelector, ClimateSampler};
use crate::error::{GenerationError, RegistryError};

/// Summary of a generated column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub biome: BiomeId,
    pub surface_height: usize,
    /// `true` when the surface lies below sea level.
    pub submerged: bool,
}

/// Generates base terrain columns. Stateless after construction.
pub struct ColumnGenerator {
    biomes: Arc<BiomeRegistry>,
    climate: ClimateSampler,
    selector: BiomeSelector,
    sea_level: usize,
}

impl ColumnGenerator {
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSeaLevel`] unless
    /// `1 <= sea_level < CHUNK_HEIGHT`, and [`RegistryError::UnknownBiome`]
    /// when a forced biome is not registered.
    pub fn new(
        biomes: Arc<BiomeRegistry>,
        climate: ClimateSampler,
        selector: BiomeSelector,
        sea_level: usize,
    ) -> Result<Self, RegistryError> {
        if !(1..CHUNK_HEIGHT).contains(&sea_level) {
            return Err(RegistryError::InvalidSeaLevel(sea_level));
        }
        if let BiomeSelector::Forced(id) = selector
            && biomes.get(id).is_none()
        {
            return Err(RegistryError::UnknownBiome {
                by: "forced biome".to_string(),
                biome: biomes.display_name(id),
            });
        }
        if biomes.is_empty() {
            return Err(RegistryError::NoBiomes);
        }
        Ok(Self {
            biomes,
            climate,
            selector,
            sea_level,
        })
    }

    pub fn biomes(&self) -> &Arc<BiomeRegistry> {
        &self.biomes
    }

    pub fn sea_level(&self) -> usize {
        self.sea_level
    }

    /// Biome of world column `(x, z)`.
    pub fn biome_at(&self, world_x: i64, world_z: i64) -> BiomeId {
        self.selector
            .select(|| self.climate.sample(world_x as f64, world_z as f64))
    }

    /// Builds the full base-terrain column at world `(x, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::UnknownBiome`] if the selector yields an
    /// unregistered biome.
    pub fn fill_column(
        &self,
        world_x: i64,
        world_z: i64,
    ) -> Result<(ColumnBuffer, ColumnInfo), GenerationError> {
        let biome_id = self.biome_at(world_x, world_z);
        let biome = self
            .biomes
            .get(biome_id)
            .ok_or(GenerationError::UnknownBiome(biome_id.0))?;

        let height = surface_height(biome, world_x as f64, world_z as f64);
        let palette = biome.palette();
        let submerged = height < self.sea_level;

        let mut column = ColumnBuffer::new_air();
        let soil_bottom = height.saturating_sub(palette.topsoil_depth).max(1);
        column.fill(1, soil_bottom, blocks::STONE);
        column.fill(soil_bottom, height, palette.filler);
        column.set(
            height,
            if submerged {
                palette.underwater
            } else {
                palette.surface
            },
        );
        if submerged {
            column.fill(height + 1, self.sea_level + 1, blocks::WATER);
        }
        column.set(0, blocks::BEDROCK);

        Ok((
            column,
            ColumnInfo {
                biome: biome_id,
                surface_height: height,
                submerged,
            },
        ))
    }

    /// Fills vertical section `chunk_y` of column `(local_x, local_z)` and
    /// records the column's biome.
    ///
    /// Writing every section of a column yields the same blocks as
    /// [`ColumnGenerator::generate_full_column`].
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::SectionOutOfRange`] or
    /// [`GenerationError::ColumnOutOfRange`] for coordinates outside the chunk.
    pub fn generate_column(
        &self,
        chunk: &mut ChunkBuffer,
        local_x: usize,
        chunk_y: usize,
        local_z: usize,
    ) -> Result<ColumnInfo, GenerationError> {
        if chunk_y >= SECTION_COUNT {
            return Err(GenerationError::SectionOutOfRange {
                section: chunk_y,
                count: SECTION_COUNT,
            });
        }
        let (column, info) = self.column_for(chunk, local_x, local_z)?;
        chunk.write_section(local_x, chunk_y, local_z, &column);
        chunk.set_biome(local_x, local_z, info.biome.0);
        Ok(info)
    }

    /// Fills every section of column `(local_x, local_z)`.
    ///
    /// # Errors
    ///
    /// Same as [`ColumnGenerator::generate_column`].
    pub fn generate_full_column(
        &self,
        chunk: &mut ChunkBuffer,
        local_x: usize,
        local_z: usize,
    ) -> Result<ColumnInfo, GenerationError> {
        let (column, info) = self.column_for(chunk, local_x, local_z)?;
        chunk.write_column(local_x, local_z, &column);
        chunk.set_biome(local_x, local_z, info.biome.0);
        Ok(info)
    }

    fn column_for(
        &self,
        chunk: &ChunkBuffer,
        local_x: usize,
        local_z: usize,
    ) -> Result<(ColumnBuffer, ColumnInfo), GenerationError> {
        if local_x >= CHUNK_WIDTH || local_z >= CHUNK_WIDTH {
            return Err(GenerationError::ColumnOutOfRange {
                x: local_x,
                z: local_z,
            });
        }
        let (origin_x, origin_z) = chunk.pos().origin();
        self.fill_column(origin_x + local_x as i64, origin_z + local_z as i64)
    }
}

/// Highest `y` with positive density, clamped to `[1, CHUNK_HEIGHT - 1]`.
///
/// Scans down from the top of the chunk, so fields that leave `[-1, 1]`
/// still land where their density crosses zero.
pub fn surface_height(biome: &Biome, world_x: f64, world_z: f64) -> usize {
    let shape = biome.shape();
    (1..CHUNK_HEIGHT)
        .rev()
        .find(|&y| {
            let noise = biome.noise().sample(world_x, y as f64, world_z);
            shape.base_height - y as f64 + shape.height_variation * noise > 0.0
        })
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeClassifier, ClimateRegion, HeightShape, SurfacePalette};
    use crate::noise_field::{ConstantField, NoiseField, OctaveNoise};
    use loam_config::NoiseBasis;
    use loam_voxel::{ChunkPos, SECTION_HEIGHT};

    fn biome(name: &str, base: f64, variation: f64, noise: Arc<NoiseField>) -> Biome {
        Biome::new(
            name,
            noise,
            SurfacePalette {
                surface: blocks::GRASS,
                filler: blocks::DIRT,
                underwater: blocks::SAND,
                topsoil_depth: 4,
            },
            HeightShape {
                base_height: base,
                height_variation: variation,
            },
        )
    }

    fn constant(v: f64) -> Arc<NoiseField> {
        Arc::new(NoiseField::new("constant", Arc::new(ConstantField(v))))
    }

    fn rolling() -> Arc<NoiseField> {
        Arc::new(NoiseField::new(
            "rolling",
            Arc::new(OctaveNoise::new(NoiseBasis::Perlin, 9, 4, 0.03, 2.0, 0.5)),
        ))
    }

    fn forced(biome: Biome, sea_level: usize) -> ColumnGenerator {
        let mut reg = BiomeRegistry::new();
        let id = reg.register(biome).unwrap();
        ColumnGenerator::new(
            Arc::new(reg),
            ClimateSampler::new(1, 0.002, 0.0025),
            BiomeSelector::Forced(id),
            sea_level,
        )
        .unwrap()
    }

    #[test]
    fn test_flat_surface_height() {
        let b = biome("flat", 68.0, 8.0, constant(0.0));
        // density(67) = 1 > 0, density(68) = 0.
        assert_eq!(surface_height(&b, 0.0, 0.0), 67);
    }

    #[test]
    fn test_surface_height_clamped() {
        let low = biome("low", 1.0, 0.0, constant(0.0));
        assert_eq!(surface_height(&low, 0.0, 0.0), 1);
        let high = biome("high", 127.0, 40.0, constant(1.0));
        assert_eq!(surface_height(&high, 0.0, 0.0), CHUNK_HEIGHT - 1);
    }

    #[test]
    fn test_surface_height_for_noise_above_unit_range() {
        // density(y) = 68 - y + 16: positive up to 83.
        let b = biome("tall", 68.0, 8.0, constant(2.0));
        assert_eq!(surface_height(&b, 0.0, 0.0), 83);
        let deep = biome("deep", 68.0, 8.0, constant(-2.0));
        assert_eq!(surface_height(&deep, 0.0, 0.0), 51);
        let info = forced(biome("tall", 68.0, 8.0, constant(2.0)), 64)
            .fill_column(0, 0)
            .unwrap()
            .1;
        assert_eq!(info.surface_height, 83);
    }

    #[test]
    fn test_column_layers_above_sea() {
        let generator = forced(biome("flat", 68.0, 8.0, constant(0.0)), 64);
        let (column, info) = generator.fill_column(5, -9).unwrap();
        assert_eq!(info.surface_height, 67);
        assert!(!info.submerged);
        assert_eq!(column.get(0), blocks::BEDROCK);
        for y in 1..63 {
            assert_eq!(column.get(y), blocks::STONE, "y={y}");
        }
        for y in 63..67 {
            assert_eq!(column.get(y), blocks::DIRT, "y={y}");
        }
        assert_eq!(column.get(67), blocks::GRASS);
        for y in 68..CHUNK_HEIGHT {
            assert_eq!(column.get(y), blocks::AIR, "y={y}");
        }
    }

    #[test]
    fn test_column_below_sea_filled_with_water() {
        let generator = forced(biome("basin", 50.0, 4.0, constant(0.0)), 64);
        let (column, info) = generator.fill_column(0, 0).unwrap();
        assert_eq!(info.surface_height, 49);
        assert!(info.submerged);
        assert_eq!(column.get(49), blocks::SAND);
        for y in 50..=64 {
            assert_eq!(column.get(y), blocks::WATER, "y={y}");
        }
        assert_eq!(column.get(65), blocks::AIR);
    }

    #[test]
    fn test_surface_at_sea_level_is_dry() {
        let generator = forced(biome("shore", 65.0, 4.0, constant(0.0)), 64);
        let (column, info) = generator.fill_column(0, 0).unwrap();
        assert_eq!(info.surface_height, 64);
        assert!(!info.submerged);
        assert_eq!(column.get(64), blocks::GRASS);
        assert!(!column.as_slice().contains(&blocks::WATER));
    }

    #[test]
    fn test_section_writes_match_full_column() {
        let generator = forced(biome("hills", 70.0, 12.0, rolling()), 64);
        let pos = ChunkPos::new(-3, 11);
        let mut sectioned = ChunkBuffer::new_air(pos);
        let mut full = ChunkBuffer::new_air(pos);
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                // Reverse order: sections are independent.
                for section in (0..SECTION_COUNT).rev() {
                    generator.generate_column(&mut sectioned, x, section, z).unwrap();
                }
                generator.generate_full_column(&mut full, x, z).unwrap();
            }
        }
        assert_eq!(sectioned, full);
    }

    #[test]
    fn test_section_write_touches_only_its_section() {
        let generator = forced(biome("flat", 68.0, 8.0, constant(0.0)), 64);
        let mut chunk = ChunkBuffer::new_air(ChunkPos::new(0, 0));
        generator.generate_column(&mut chunk, 2, 4, 3).unwrap();
        for y in 0..CHUNK_HEIGHT {
            let in_section = (4 * SECTION_HEIGHT..5 * SECTION_HEIGHT).contains(&y);
            if !in_section {
                assert_eq!(chunk.get(2, y, 3), blocks::AIR, "y={y}");
            }
        }
        assert_eq!(chunk.get(2, 64, 3), blocks::DIRT);
        assert_eq!(chunk.get(2, 67, 3), blocks::GRASS);
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let generator = forced(biome("flat", 68.0, 8.0, constant(0.0)), 64);
        let mut chunk = ChunkBuffer::new_air(ChunkPos::new(0, 0));
        assert!(matches!(
            generator.generate_column(&mut chunk, 0, SECTION_COUNT, 0),
            Err(GenerationError::SectionOutOfRange { .. })
        ));
        assert!(matches!(
            generator.generate_column(&mut chunk, CHUNK_WIDTH, 0, 0),
            Err(GenerationError::ColumnOutOfRange { .. })
        ));
        assert_eq!(chunk, ChunkBuffer::new_air(ChunkPos::new(0, 0)));
    }

    #[test]
    fn test_invalid_sea_level_rejected() {
        let mut reg = BiomeRegistry::new();
        let id = reg.register(biome("flat", 68.0, 8.0, constant(0.0))).unwrap();
        let reg = Arc::new(reg);
        for sea in [0, CHUNK_HEIGHT, 500] {
            let result = ColumnGenerator::new(
                Arc::clone(&reg),
                ClimateSampler::new(0, 0.002, 0.0025),
                BiomeSelector::Forced(id),
                sea,
            );
            assert!(matches!(result, Err(RegistryError::InvalidSeaLevel(s)) if s == sea));
        }
    }

    #[test]
    fn test_unknown_forced_biome_rejected() {
        let mut reg = BiomeRegistry::new();
        reg.register(biome("flat", 68.0, 8.0, constant(0.0))).unwrap();
        let result = ColumnGenerator::new(
            Arc::new(reg),
            ClimateSampler::new(0, 0.002, 0.0025),
            BiomeSelector::Forced(BiomeId(4)),
            64,
        );
        assert!(matches!(result, Err(RegistryError::UnknownBiome { .. })));
    }

    #[test]
    fn test_climate_selection_per_column() {
        let mut reg = BiomeRegistry::new();
        let low = reg.register(biome("low", 60.0, 4.0, constant(0.0))).unwrap();
        let high = reg.register(biome("high", 90.0, 4.0, constant(0.0))).unwrap();
        let classifier = BiomeClassifier::new(
            vec![
                ClimateRegion {
                    biome: low,
                    temperature: (0.0, 0.5),
                    humidity: (0.0, 1.0),
                },
                ClimateRegion {
                    biome: high,
                    temperature: (0.5, 1.0),
                    humidity: (0.0, 1.0),
                },
            ],
            &[low, high],
            low,
            &reg,
        )
        .unwrap();
        let generator = ColumnGenerator::new(
            Arc::new(reg),
            ClimateSampler::new(3, 0.01, 0.01),
            BiomeSelector::Climate(classifier),
            64,
        )
        .unwrap();
        let mut seen = [false; 2];
        for i in 0..400 {
            let (_, info) = generator.fill_column(i * 37, i * -53).unwrap();
            let expected = if info.biome == low { 59 } else { 89 };
            assert_eq!(info.surface_height, expected);
            seen[usize::from(info.biome.0)] = true;
        }
        assert!(seen[0] && seen[1], "both biomes should appear");
    }

    #[test]
    fn test_extreme_world_coordinates() {
        let generator = forced(biome("hills", 70.0, 12.0, rolling()), 64);
        let edge = i64::from(i32::MAX) * 16 + 15;
        for (x, z) in [(edge, edge), (-edge - 1, -edge - 1), (edge, -edge - 1)] {
            let (_, info) = generator.fill_column(x, z).unwrap();
            assert!((1..CHUNK_HEIGHT).contains(&info.surface_height));
        }
    }
}
