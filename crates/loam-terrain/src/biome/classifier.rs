//! Climate classifier: maps a [`ClimateSample`] to a [`BiomeId`].
//!
//! Regions are rectangles in climate space. Where several regions contain a
//! point, the biome listed earliest in the priority order wins. Points no
//! region covers resolve to the fallback biome.

use hashbrown::HashMap;

use super::{BiomeId, BiomeRegistry, ClimateSample};
use crate::error::RegistryError;

/// A rectangular region in temperature–humidity space mapped to a biome.
///
/// Each axis range is half-open `[min, max)`, except that a `max` of `1.0`
/// includes `1.0` so the unit square can be covered exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateRegion {
    pub biome: BiomeId,
    pub temperature: (f64, f64),
    pub humidity: (f64, f64),
}

impl ClimateRegion {
    pub fn contains(&self, sample: ClimateSample) -> bool {
        in_range(sample.temperature, self.temperature) && in_range(sample.humidity, self.humidity)
    }
}

fn in_range(v: f64, (min, max): (f64, f64)) -> bool {
    v >= min && (v < max || (max >= 1.0 && v <= max))
}

fn valid_range((min, max): (f64, f64)) -> bool {
    min.is_finite() && max.is_finite() && 0.0 <= min && min < max && max <= 1.0
}

/// Total, deterministic climate-to-biome mapping.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    regions: Vec<ClimateRegion>,
    rank: HashMap<BiomeId, usize>,
    fallback: BiomeId,
}

impl BiomeClassifier {
    /// Builds a classifier, validating it against the registry.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownBiome`] if a region, priority entry or the
    ///   fallback names an unregistered biome.
    /// - [`RegistryError::DuplicatePriority`] if a biome is listed twice.
    /// - [`RegistryError::MissingPriority`] if a region's biome (or the
    ///   fallback) is absent from the priority list.
    /// - [`RegistryError::InvalidRegion`] for ranges outside `[0, 1]` or empty.
    pub fn new(
        regions: Vec<ClimateRegion>,
        priority: &[BiomeId],
        fallback: BiomeId,
        registry: &BiomeRegistry,
    ) -> Result<Self, RegistryError> {
        let unknown = |id: BiomeId, by: &str| RegistryError::UnknownBiome {
            by: by.to_string(),
            biome: registry.display_name(id),
        };

        let mut rank = HashMap::with_capacity(priority.len());
        for (i, &id) in priority.iter().enumerate() {
            if registry.get(id).is_none() {
                return Err(unknown(id, "classifier priority"));
            }
            if rank.insert(id, i).is_some() {
                return Err(RegistryError::DuplicatePriority(registry.display_name(id)));
            }
        }

        for region in &regions {
            if registry.get(region.biome).is_none() {
                return Err(unknown(region.biome, "classifier region"));
            }
            if !valid_range(region.temperature) || !valid_range(region.humidity) {
                return Err(RegistryError::InvalidRegion {
                    biome: registry.display_name(region.biome),
                    reason: format!(
                        "ranges must satisfy 0 <= min < max <= 1, got temperature {:?}, humidity {:?}",
                        region.temperature, region.humidity
                    ),
                });
            }
            if !rank.contains_key(&region.biome) {
                return Err(RegistryError::MissingPriority(registry.display_name(region.biome)));
            }
        }

        if registry.get(fallback).is_none() {
            return Err(unknown(fallback, "classifier fallback"));
        }
        if !rank.contains_key(&fallback) {
            return Err(RegistryError::MissingPriority(registry.display_name(fallback)));
        }

        Ok(Self {
            regions,
            rank,
            fallback,
        })
    }

    /// Classifies a climate sample.
    ///
    /// Inputs are clamped to `[0, 1]`; a NaN on either axis yields the
    /// fallback biome.
    pub fn classify(&self, sample: ClimateSample) -> BiomeId {
        if sample.temperature.is_nan() || sample.humidity.is_nan() {
            return self.fallback;
        }
        let sample = ClimateSample::new(
            sample.temperature.clamp(0.0, 1.0),
            sample.humidity.clamp(0.0, 1.0),
        );
        self.regions
            .iter()
            .filter(|region| region.contains(sample))
            .filter_map(|region| self.rank.get(&region.biome).map(|&r| (r, region.biome)))
            .min()
            .map_or(self.fallback, |(_, biome)| biome)
    }

    pub fn fallback(&self) -> BiomeId {
        self.fallback
    }

    pub fn regions(&self) -> &[ClimateRegion] {
        &self.regions
    }
}

/// How columns pick their biome.
#[derive(Clone, Debug)]
pub enum BiomeSelector {
    /// Classify sampled climate.
    Climate(BiomeClassifier),
    /// Every column uses one biome.
    Forced(BiomeId),
}

impl BiomeSelector {
    pub fn select(&self, sample: impl FnOnce() -> ClimateSample) -> BiomeId {
        match self {
            BiomeSelector::Climate(classifier) => classifier.classify(sample()),
            BiomeSelector::Forced(id) => *id,
        }
    }
}
