//! Builds the generation registry from configuration.
//!
//! All names are resolved and all parameters validated here, once, before
//! any chunk is generated.

use std::sync::Arc;

use loam_config::{BiomeConfig, ClassifierConfig, Config};
use loam_voxel::{BlockId, BlockRegistry};

use crate::biome::{
    Biome, BiomeClassifier, BiomeId, BiomeRegistry, BiomeSelector, ClimateRegion, ClimateSampler,
    HeightShape, SurfacePalette,
};
use crate::column::ColumnGenerator;
use crate::decorator;
use crate::error::RegistryError;
use crate::generator::TerrainGenerator;
use crate::noise_field::NoiseLibrary;

/// Resolve `config` into a ready generator.
pub(crate) fn build_generator(config: &Config) -> Result<TerrainGenerator, RegistryError> {
    let seed = config.world.seed;
    let blocks = BlockRegistry::with_defaults();
    let noise = NoiseLibrary::build(seed, &config.noise)?;

    let mut biomes = BiomeRegistry::new();
    for biome in &config.biomes {
        biomes.register(build_biome(biome, &noise, &blocks)?)?;
    }
    if biomes.is_empty() {
        return Err(RegistryError::NoBiomes);
    }

    let classifier = build_classifier(&config.classifier, &biomes)?;
    let selector = match &config.world.forced_biome {
        Some(name) => BiomeSelector::Forced(resolve_biome(&biomes, name, "world.forced_biome")?),
        None => BiomeSelector::Climate(classifier),
    };

    let climate = &config.climate;
    for (name, frequency) in [
        ("climate.temperature_frequency", climate.temperature_frequency),
        ("climate.humidity_frequency", climate.humidity_frequency),
    ] {
        if !frequency.is_finite() {
            return Err(RegistryError::InvalidNoise {
                name: name.to_string(),
                reason: format!("frequency {frequency} is not finite"),
            });
        }
    }
    let sampler = ClimateSampler::new(
        seed,
        climate.temperature_frequency,
        climate.humidity_frequency,
    );

    let biome_count = biomes.len();
    let columns = ColumnGenerator::new(
        Arc::new(biomes),
        sampler,
        selector,
        config.world.sea_level as usize,
    )?;

    tracing::info!(
        seed,
        biomes = biome_count,
        noise_modules = noise.len(),
        sea_level = config.world.sea_level,
        forced_biome = ?config.world.forced_biome,
        "terrain registry built"
    );
    Ok(TerrainGenerator::new(seed, columns))
}

fn build_biome(
    config: &BiomeConfig,
    noise: &NoiseLibrary,
    blocks: &BlockRegistry,
) -> Result<Biome, RegistryError> {
    let field = noise
        .get(&config.noise)
        .ok_or_else(|| RegistryError::UnknownNoise {
            by: format!("biome `{}`", config.name),
            referenced: config.noise.clone(),
        })?;
    let block = |name: &str| resolve_block(blocks, name, &config.name);
    let palette = SurfacePalette {
        surface: block(&config.surface)?,
        filler: block(&config.filler)?,
        underwater: block(&config.underwater)?,
        topsoil_depth: config.topsoil_depth as usize,
    };
    let shape = HeightShape {
        base_height: config.base_height,
        height_variation: config.height_variation,
    };

    let mut biome = Biome::new(config.name.clone(), field, palette, shape);
    for stage in &config.decorators {
        biome = biome.with_decorator(decorator::from_config(&config.name, stage, blocks)?);
    }
    Ok(biome)
}

fn build_classifier(
    config: &ClassifierConfig,
    biomes: &BiomeRegistry,
) -> Result<BiomeClassifier, RegistryError> {
    let regions = config
        .regions
        .iter()
        .map(|region| {
            Ok(ClimateRegion {
                biome: resolve_biome(biomes, &region.biome, "classifier region")?,
                temperature: region.temperature,
                humidity: region.humidity,
            })
        })
        .collect::<Result<Vec<_>, RegistryError>>()?;
    let priority = config
        .priority
        .iter()
        .map(|name| resolve_biome(biomes, name, "classifier priority"))
        .collect::<Result<Vec<_>, _>>()?;
    let fallback = resolve_biome(biomes, &config.fallback, "classifier fallback")?;
    BiomeClassifier::new(regions, &priority, fallback, biomes)
}

fn resolve_block(blocks: &BlockRegistry, name: &str, biome: &str) -> Result<BlockId, RegistryError> {
    blocks
        .lookup_by_name(name)
        .ok_or_else(|| RegistryError::UnknownBlock {
            by: format!("biome `{biome}`"),
            block: name.to_string(),
        })
}

fn resolve_biome(biomes: &BiomeRegistry, name: &str, by: &str) -> Result<BiomeId, RegistryError> {
    biomes
        .lookup_by_name(name)
        .ok_or_else(|| RegistryError::UnknownBiome {
            by: by.to_string(),
            biome: name.to_string(),
        })
}
