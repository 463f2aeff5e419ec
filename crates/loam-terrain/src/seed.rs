//! Deterministic seeded generation utilities.
//!
//! Provides per-chunk RNG derivation from a world seed and chunk position, a
//! fixed-point octave accumulator for cross-platform bit-exact noise sums,
//! and a stable content digest for determinism checks.

use std::hash::{Hash, Hasher};

use loam_voxel::{ChunkBuffer, ChunkPos};
use noise::NoiseFn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

use crate::TerrainGenerator;
use crate::error::GenerationError;

/// Random stream handed to decorators. One per chunk-generation call.
pub type RandomSource = ChaCha8Rng;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

const CHUNK_X_MULTIPLIER: u64 = 341_873_128_712;
const CHUNK_Z_MULTIPLIER: u64 = 132_897_987_541;

/// Derive a u64 seed for a chunk from the world seed and chunk position.
///
/// `seed ^ (x * 341873128712 + z * 132897987541)` in wrapping `u64`
/// arithmetic over the sign-extended coordinates, followed by the SplitMix64
/// finalizer. The formula is fixed so any chunk's stream can be rebuilt
/// independently of the generator.
pub fn derive_chunk_seed(world_seed: u64, pos: ChunkPos) -> u64 {
    let x = i64::from(pos.x) as u64;
    let z = i64::from(pos.z) as u64;
    let mixed = world_seed
        ^ x.wrapping_mul(CHUNK_X_MULTIPLIER)
            .wrapping_add(z.wrapping_mul(CHUNK_Z_MULTIPLIER));
    splitmix64(mixed)
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive the deterministic random source for a specific chunk.
///
/// The returned RNG produces an identical sequence for the same
/// `(world_seed, pos)` pair, regardless of thread or platform.
pub fn chunk_rng(world_seed: u64, pos: ChunkPos) -> RandomSource {
    ChaCha8Rng::seed_from_u64(derive_chunk_seed(world_seed, pos))
}

// ---------------------------------------------------------------------------
// Fixed-point arithmetic
// ---------------------------------------------------------------------------

/// 64-bit fixed-point number with 32 integer bits and 32 fractional bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint64(i64);

impl FixedPoint64 {
    pub const ZERO: Self = Self(0);

    const FRAC_BITS: u32 = 32;

    /// Convert from `f64` (saturating on overflow, NaN becomes zero).
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        let scaled = v * (1_i64 << Self::FRAC_BITS) as f64;
        Self(scaled as i64)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1_i64 << Self::FRAC_BITS) as f64
    }
}

impl std::ops::Add for FixedPoint64 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl std::ops::Mul for FixedPoint64 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        // 128-bit intermediate to avoid overflow.
        let wide = (self.0 as i128) * (rhs.0 as i128);
        Self((wide >> Self::FRAC_BITS) as i64)
    }
}

/// Accumulate noise octaves using fixed-point arithmetic.
///
/// The per-octave samples are `f64`; the summation is fixed-point so the
/// total is bit-exact across platforms.
pub fn fbm_fixed_point(
    noise_fn: &impl NoiseFn<f64, 3>,
    point: glam::DVec3,
    octaves: u32,
    lacunarity: f64,
    persistence: f64,
    base_frequency: f64,
    amplitude: f64,
) -> FixedPoint64 {
    let mut total = FixedPoint64::ZERO;
    let mut freq = base_frequency;
    let mut amp = FixedPoint64::from_f64(amplitude);
    let pers = FixedPoint64::from_f64(persistence);

    for _ in 0..octaves {
        let noise_val = noise_fn.get([point.x * freq, point.y * freq, point.z * freq]);
        total = total + FixedPoint64::from_f64(noise_val) * amp;
        freq *= lacunarity;
        amp = amp * pers;
    }

    total
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Stable digest of a chunk's blocks, sub-data and overflow.
pub fn hash_chunk(chunk: &ChunkBuffer) -> u64 {
    let mut hasher = FxHasher::default();
    chunk.pos().hash(&mut hasher);
    chunk.blocks().hash(&mut hasher);
    chunk.data().hash(&mut hasher);
    chunk.overflow().hash(&mut hasher);
    hasher.finish()
}

/// Generate a chunk and return its digest.
pub fn generate_and_hash(
    generator: &TerrainGenerator,
    chunk_x: i32,
    chunk_z: i32,
) -> Result<u64, GenerationError> {
    let chunk = generator.generate_chunk(chunk_x, chunk_z)?;
    Ok(hash_chunk(&chunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_config::Config;
    use rand::RngCore;

    fn generator(seed: u64) -> TerrainGenerator {
        let mut config = Config::default();
        config.world.seed = seed;
        TerrainGenerator::from_config(&config).unwrap()
    }

    #[test]
    fn test_derive_chunk_seed_deterministic() {
        let pos = ChunkPos::new(42, -13);
        assert_eq!(derive_chunk_seed(999, pos), derive_chunk_seed(999, pos));
    }

    #[test]
    fn test_derive_chunk_seed_different_positions() {
        let base = derive_chunk_seed(42, ChunkPos::new(0, 0));
        assert_ne!(base, derive_chunk_seed(42, ChunkPos::new(1, 0)));
        assert_ne!(base, derive_chunk_seed(42, ChunkPos::new(0, 1)));
        assert_ne!(
            derive_chunk_seed(42, ChunkPos::new(1, 0)),
            derive_chunk_seed(42, ChunkPos::new(0, 1))
        );
    }

    #[test]
    fn test_derive_chunk_seed_different_world_seeds() {
        let pos = ChunkPos::new(5, 5);
        assert_ne!(derive_chunk_seed(0, pos), derive_chunk_seed(1, pos));
    }

    #[test]
    fn test_derive_chunk_seed_matches_formula() {
        let pos = ChunkPos::new(-3, 7);
        let mixed = 42u64
            ^ ((-3_i64) as u64)
                .wrapping_mul(341_873_128_712)
                .wrapping_add(7u64.wrapping_mul(132_897_987_541));
        assert_eq!(derive_chunk_seed(42, pos), splitmix64(mixed));
    }

    #[test]
    fn test_extreme_positions_have_distinct_seeds() {
        let corners = [
            ChunkPos::new(i32::MIN, i32::MIN),
            ChunkPos::new(i32::MIN, i32::MAX),
            ChunkPos::new(i32::MAX, i32::MIN),
            ChunkPos::new(i32::MAX, i32::MAX),
        ];
        let seeds: Vec<_> = corners.iter().map(|&p| derive_chunk_seed(7, p)).collect();
        for i in 0..seeds.len() {
            for j in i + 1..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
    }

    #[test]
    fn test_chacha8_rng_deterministic() {
        let pos = ChunkPos::new(10, 20);
        let mut rng_a = chunk_rng(42, pos);
        let mut rng_b = chunk_rng(42, pos);
        for _ in 0..1000 {
            assert_eq!(rng_a.next_u64(), rng_b.next_u64());
        }
    }

    #[test]
    fn test_fixed_point_round_trip() {
        for v in [0.0, 1.0, -1.0, 0.5, 123.456, -99.99] {
            let back = FixedPoint64::from_f64(v).to_f64();
            assert!((back - v).abs() < 1e-6, "Round-trip failed for {v}: got {back}");
        }
    }

    #[test]
    fn test_fixed_point_arithmetic() {
        let a = FixedPoint64::from_f64(2.5);
        let b = FixedPoint64::from_f64(3.0);
        assert!(((a + b).to_f64() - 5.5).abs() < 1e-6);
        assert!(((a * b).to_f64() - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_point_nan_is_zero() {
        assert_eq!(FixedPoint64::from_f64(f64::NAN), FixedPoint64::ZERO);
    }

    #[test]
    fn test_fbm_fixed_point_deterministic() {
        let noise = noise::Perlin::new(42);
        let point = glam::DVec3::new(1.5, 2.5, 3.5);
        let a = fbm_fixed_point(&noise, point, 4, 2.0, 0.5, 0.02, 16.0);
        let b = fbm_fixed_point(&noise, point, 4, 2.0, 0.5, 0.02, 16.0);
        assert_eq!(a, b, "Fixed-point fBm must be bit-exact");
    }

    #[test]
    fn test_generate_same_chunk_twice_identical() {
        let generator = generator(12345);
        let a = generate_and_hash(&generator, 10, 20).unwrap();
        let b = generate_and_hash(&generator, 10, 20).unwrap();
        assert_eq!(a, b, "Generating the same chunk twice must produce identical data");
    }

    #[test]
    fn test_independent_generators_identical() {
        let a = generate_and_hash(&generator(777), -4, 9).unwrap();
        let b = generate_and_hash(&generator(777), -4, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_on_different_threads_identical() {
        let shared = std::sync::Arc::new(generator(67890));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let generator = std::sync::Arc::clone(&shared);
                std::thread::spawn(move || generate_and_hash(&generator, 3, 7).unwrap())
            })
            .collect();
        let hashes: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(hashes[0], hashes[1]);
    }

    #[test]
    fn test_different_chunks_different_data() {
        let generator = generator(42);
        assert_ne!(
            generate_and_hash(&generator, 0, 0).unwrap(),
            generate_and_hash(&generator, 10, 10).unwrap()
        );
    }

    #[test]
    fn test_different_seeds_different_worlds() {
        assert_ne!(
            generate_and_hash(&generator(0), 0, 0).unwrap(),
            generate_and_hash(&generator(9999), 0, 0).unwrap()
        );
    }
}
