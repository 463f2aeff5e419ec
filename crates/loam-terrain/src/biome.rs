//! Biome system: definitions, registry, climate sampling and classification.
//!
//! Each column is assigned a biome by sampling temperature and humidity noise
//! and resolving the point against a set of climate regions with an explicit
//! priority order for overlaps.

mod classifier;
mod climate;
mod def;
mod registry;

pub use classifier::{BiomeClassifier, BiomeSelector, ClimateRegion};
pub use climate::{ClimateSample, ClimateSampler};
pub use def::{Biome, HeightShape, SurfacePalette};
pub use registry::{BiomeId, BiomeRegistry};
