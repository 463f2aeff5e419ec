//! Named, composable 3D noise modules.
//!
//! Every module implements [`noise::NoiseFn`] so it composes with the
//! `noise` crate's own generators. A [`NoiseField`] wraps a module with a
//! name and sanitizes non-finite inputs and outputs to `0.0`, logging the
//! first occurrence per field.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::DVec3;
use hashbrown::HashMap;
use loam_config::{NamedNoise, NoiseBasis, NoiseSpec};
use noise::{NoiseFn, Perlin, Simplex};

use crate::error::RegistryError;
use crate::seed::fbm_fixed_point;

/// Shared, thread-safe noise module.
pub type NoiseModule = Arc<dyn NoiseFn<f64, 3> + Send + Sync>;

/// Upper bound on octave count.
const MAX_OCTAVES: u32 = 32;

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

enum Basis {
    Perlin(Perlin),
    Simplex(Simplex),
}

impl NoiseFn<f64, 3> for Basis {
    fn get(&self, point: [f64; 3]) -> f64 {
        match self {
            Basis::Perlin(p) => p.get(point),
            Basis::Simplex(s) => s.get(point),
        }
    }
}

/// Fractal sum of one basis function, normalized by the total amplitude so
/// the output stays within the basis range.
pub struct OctaveNoise {
    basis: Basis,
    octaves: u32,
    frequency: f64,
    lacunarity: f64,
    persistence: f64,
    total_amplitude: f64,
}

impl OctaveNoise {
    pub fn new(
        basis: NoiseBasis,
        seed: u32,
        octaves: u32,
        frequency: f64,
        lacunarity: f64,
        persistence: f64,
    ) -> Self {
        let basis = match basis {
            NoiseBasis::Perlin => Basis::Perlin(Perlin::new(seed)),
            NoiseBasis::Simplex => Basis::Simplex(Simplex::new(seed)),
        };
        let total_amplitude = (0..octaves)
            .map(|i| persistence.powi(i as i32))
            .sum::<f64>();
        Self {
            basis,
            octaves,
            frequency,
            lacunarity,
            persistence,
            total_amplitude,
        }
    }
}

impl NoiseFn<f64, 3> for OctaveNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        if self.total_amplitude == 0.0 {
            return 0.0;
        }
        let sum = fbm_fixed_point(
            &self.basis,
            DVec3::from_array(point),
            self.octaves,
            self.lacunarity,
            self.persistence,
            self.frequency,
            1.0,
        );
        sum.to_f64() / self.total_amplitude
    }
}

/// The same value at every point.
pub struct ConstantField(pub f64);

impl NoiseFn<f64, 3> for ConstantField {
    fn get(&self, _point: [f64; 3]) -> f64 {
        self.0
    }
}

/// Samples `source` at the input point multiplied per axis.
pub struct Scaled {
    pub source: NoiseModule,
    pub scale: DVec3,
}

impl NoiseFn<f64, 3> for Scaled {
    fn get(&self, point: [f64; 3]) -> f64 {
        let p = DVec3::from_array(point) * self.scale;
        self.source.get(p.to_array())
    }
}

/// Samples `source` at the input point offset per axis.
pub struct Translated {
    pub source: NoiseModule,
    pub offset: DVec3,
}

impl NoiseFn<f64, 3> for Translated {
    fn get(&self, point: [f64; 3]) -> f64 {
        let p = DVec3::from_array(point) + self.offset;
        self.source.get(p.to_array())
    }
}

pub struct Sum(pub NoiseModule, pub NoiseModule);

impl NoiseFn<f64, 3> for Sum {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.0.get(point) + self.1.get(point)
    }
}

pub struct Product(pub NoiseModule, pub NoiseModule);

impl NoiseFn<f64, 3> for Product {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.0.get(point) * self.1.get(point)
    }
}

// ---------------------------------------------------------------------------
// NoiseField
// ---------------------------------------------------------------------------

/// A named noise module, safe to sample from any thread.
pub struct NoiseField {
    name: String,
    module: NoiseModule,
    warned: AtomicBool,
}

impl NoiseField {
    pub fn new(name: impl Into<String>, module: NoiseModule) -> Self {
        Self {
            name: name.into(),
            module,
            warned: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample the field at a world point.
    ///
    /// Non-finite coordinates are replaced by `0.0` before sampling and a
    /// non-finite result is returned as `0.0`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let point = [x, y, z];
        let finite_input = point.iter().all(|c| c.is_finite());
        let point = if finite_input {
            point
        } else {
            point.map(|c| if c.is_finite() { c } else { 0.0 })
        };

        let value = self.module.get(point);
        if finite_input && value.is_finite() {
            return value;
        }

        if self.first_non_finite() {
            tracing::warn!(
                field = %self.name,
                x, y, z, value,
                "non-finite noise sample replaced with 0.0"
            );
        }
        if value.is_finite() { value } else { 0.0 }
    }

    /// `true` only for the first non-finite sample of this field.
    fn first_non_finite(&self) -> bool {
        !self.warned.swap(true, Ordering::Relaxed)
    }
}

impl NoiseFn<f64, 3> for NoiseField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("name", &self.name).finish()
    }
}

// ---------------------------------------------------------------------------
// NoiseLibrary
// ---------------------------------------------------------------------------

/// All named noise fields of a world, built once from configuration.
pub struct NoiseLibrary {
    fields: HashMap<String, Arc<NoiseField>>,
}

impl NoiseLibrary {
    /// Instantiate every module in declaration order.
    ///
    /// A [`NoiseSpec::Ref`] may only name a module declared earlier, so
    /// reference cycles are impossible.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on duplicate names, unknown or forward
    /// references, and invalid parameters.
    pub fn build(world_seed: u64, modules: &[NamedNoise]) -> Result<Self, RegistryError> {
        let mut fields: HashMap<String, Arc<NoiseField>> = HashMap::new();
        for entry in modules {
            if fields.contains_key(&entry.name) {
                return Err(RegistryError::DuplicateNoise(entry.name.clone()));
            }
            let module = instantiate(world_seed, &entry.name, &entry.spec, &fields)?;
            fields.insert(
                entry.name.clone(),
                Arc::new(NoiseField::new(entry.name.clone(), module)),
            );
        }
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<Arc<NoiseField>> {
        self.fields.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn instantiate(
    world_seed: u64,
    owner: &str,
    spec: &NoiseSpec,
    fields: &HashMap<String, Arc<NoiseField>>,
) -> Result<NoiseModule, RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidNoise {
        name: owner.to_string(),
        reason,
    };
    let module: NoiseModule = match spec {
        NoiseSpec::Octaves {
            basis,
            octaves,
            frequency,
            lacunarity,
            persistence,
            seed_offset,
        } => {
            if !(1..=MAX_OCTAVES).contains(octaves) {
                return Err(invalid(format!("octaves must be in 1..={MAX_OCTAVES}, got {octaves}")));
            }
            if ![*frequency, *lacunarity, *persistence].iter().all(|v| v.is_finite()) {
                return Err(invalid("octave parameters must be finite".to_string()));
            }
            // Truncation to the basis seed width is part of the seeding contract.
            let seed = world_seed.wrapping_add(*seed_offset) as u32;
            Arc::new(OctaveNoise::new(
                *basis,
                seed,
                *octaves,
                *frequency,
                *lacunarity,
                *persistence,
            ))
        }
        NoiseSpec::Constant(value) => {
            if !value.is_finite() {
                return Err(invalid(format!("constant {value} is not finite")));
            }
            Arc::new(ConstantField(*value))
        }
        NoiseSpec::Scale { source, x, y, z } => Arc::new(Scaled {
            source: instantiate(world_seed, owner, source, fields)?,
            scale: finite_vec(*x, *y, *z).ok_or_else(|| invalid("scale must be finite".into()))?,
        }),
        NoiseSpec::Translate { source, x, y, z } => Arc::new(Translated {
            source: instantiate(world_seed, owner, source, fields)?,
            offset: finite_vec(*x, *y, *z)
                .ok_or_else(|| invalid("translation must be finite".into()))?,
        }),
        NoiseSpec::Add(a, b) => Arc::new(Sum(
            instantiate(world_seed, owner, a, fields)?,
            instantiate(world_seed, owner, b, fields)?,
        )),
        NoiseSpec::Multiply(a, b) => Arc::new(Product(
            instantiate(world_seed, owner, a, fields)?,
            instantiate(world_seed, owner, b, fields)?,
        )),
        NoiseSpec::Ref(name) => {
            let field = fields.get(name).ok_or_else(|| RegistryError::UnknownNoise {
                by: format!("noise module `{owner}`"),
                referenced: name.clone(),
            })?;
            Arc::clone(field) as NoiseModule
        }
    };
    Ok(module)
}

fn finite_vec(x: f64, y: f64, z: f64) -> Option<DVec3> {
    let v = DVec3::new(x, y, z);
    v.is_finite().then_some(v)
}
