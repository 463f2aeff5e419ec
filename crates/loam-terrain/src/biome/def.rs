//! Biome definition: noise, surface palette, height shaping and decorators.

use std::sync::Arc;

use loam_voxel::{BlockId, CHUNK_HEIGHT};

use crate::decorator::Decorator;
use crate::error::RegistryError;
use crate::noise_field::NoiseField;

/// Blocks laid down at the top of each column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfacePalette {
    /// Block at the surface height.
    pub surface: BlockId,
    /// Topsoil beneath the surface.
    pub filler: BlockId,
    /// Replaces `surface` where the surface lies below sea level.
    pub underwater: BlockId,
    /// Number of filler layers beneath the surface.
    pub topsoil_depth: usize,
}

/// Density parameters: `density(y) = base_height - y + height_variation * noise`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightShape {
    pub base_height: f64,
    pub height_variation: f64,
}

/// A fully resolved biome.
///
/// Decorators run in the order they were added.
pub struct Biome {
    name: String,
    noise: Arc<NoiseField>,
    palette: SurfacePalette,
    shape: HeightShape,
    decorators: Vec<Arc<dyn Decorator>>,
}

impl Biome {
    pub fn new(
        name: impl Into<String>,
        noise: Arc<NoiseField>,
        palette: SurfacePalette,
        shape: HeightShape,
    ) -> Self {
        Self {
            name: name.into(),
            noise,
            palette,
            shape,
            decorators: Vec::new(),
        }
    }

    /// Appends a decorator to the end of the execution order.
    pub fn with_decorator(mut self, decorator: Arc<dyn Decorator>) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn palette(&self) -> &SurfacePalette {
        &self.palette
    }

    pub fn shape(&self) -> HeightShape {
        self.shape
    }

    pub fn decorators(&self) -> &[Arc<dyn Decorator>] {
        &self.decorators
    }

    /// Checks the height shaping against the world height.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidHeight`] for non-finite values, a
    /// negative variation, or a base height outside `[1, CHUNK_HEIGHT)`.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidHeight {
            biome: self.name.clone(),
            reason: reason.to_string(),
        };
        let HeightShape {
            base_height,
            height_variation,
        } = self.shape;
        if !base_height.is_finite() || !height_variation.is_finite() {
            return Err(invalid("values must be finite"));
        }
        if height_variation < 0.0 {
            return Err(invalid("height variation must not be negative"));
        }
        if !(1.0..CHUNK_HEIGHT as f64).contains(&base_height) {
            return Err(invalid("base height must lie inside the world"));
        }
        if self.palette.topsoil_depth >= CHUNK_HEIGHT {
            return Err(invalid("topsoil depth exceeds the world height"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decorators: Vec<_> = self.decorators.iter().map(|d| d.name()).collect();
        f.debug_struct("Biome")
            .field("name", &self.name)
            .field("noise", &self.noise.name())
            .field("palette", &self.palette)
            .field("shape", &self.shape)
            .field("decorators", &decorators)
            .finish()
    }
}
