//! Climate sampler: simplex noise fields for temperature and humidity.

use noise::{NoiseFn, Simplex};

/// Temperature and humidity at a column, nominally in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    pub temperature: f64,
    pub humidity: f64,
}

impl ClimateSample {
    pub const fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}

/// Samples climate at world columns from two decorrelated simplex fields.
pub struct ClimateSampler {
    temperature_noise: Simplex,
    humidity_noise: Simplex,
    /// Frequency for temperature noise. Lower values produce broader zones.
    pub temperature_frequency: f64,
    /// Frequency for humidity noise.
    pub humidity_frequency: f64,
}

impl ClimateSampler {
    /// Creates a sampler for the given world seed.
    ///
    /// The humidity field is seeded with an offset so the two fields are
    /// decorrelated.
    pub fn new(seed: u64, temperature_frequency: f64, humidity_frequency: f64) -> Self {
        Self {
            temperature_noise: Simplex::new(seed as u32),
            humidity_noise: Simplex::new(seed.wrapping_add(0xDEAD_BEEF) as u32),
            temperature_frequency,
            humidity_frequency,
        }
    }

    /// Samples the climate at world column `(x, z)`, normalized to `[0.0, 1.0]`.
    pub fn sample(&self, x: f64, z: f64) -> ClimateSample {
        let temperature_raw = self.temperature_noise.get([
            x * self.temperature_frequency,
            z * self.temperature_frequency,
        ]);
        let humidity_raw = self
            .humidity_noise
            .get([x * self.humidity_frequency, z * self.humidity_frequency]);

        // Normalize from [-1, 1] to [0, 1].
        ClimateSample {
            temperature: (temperature_raw + 1.0) * 0.5,
            humidity: (humidity_raw + 1.0) * 0.5,
        }
    }
}
