//! `loam`: generate a square of chunks and print one fingerprint per chunk.
//!
//! Run with: `cargo run -p loam-cli -- --seed 42 --radius 2`

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use loam_config::{CliArgs, Config, default_config_dir};
use loam_terrain::{AsyncChunkGenerator, GeneratedChunk, TerrainGenerator, hash_chunk};
use loam_voxel::{CHUNK_WIDTH, ChunkPos};
use tracing::{error, info, warn};

/// How long to wait for workers before giving up on outstanding chunks.
const RESULT_TIMEOUT: Duration = Duration::from_secs(120);

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    let log_file =
        loam_log::init_logging(Some(log_dir.as_path()), cfg!(debug_assertions), Some(&config));
    if let Some(path) = log_file {
        info!("Logging to {}", path.display());
    }

    let generator = match TerrainGenerator::from_config(&config) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            error!(%e, "invalid world configuration");
            return ExitCode::FAILURE;
        }
    };

    let positions = chunk_positions(args.center_x, args.center_z, args.radius);
    info!(
        seed = config.world.seed,
        chunks = positions.len(),
        radius = args.radius,
        "generating"
    );

    let pool = match AsyncChunkGenerator::from_config(Arc::clone(&generator), &config.workers) {
        Ok(pool) => pool,
        Err(e) => {
            error!(%e, "failed to start chunk workers");
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    let mut results = generate_all(&pool, &positions);
    results.sort_by_key(|chunk| (chunk.pos.z, chunk.pos.x));

    let mut failures = 0usize;
    for chunk in &results {
        match &chunk.result {
            Ok(buffer) => {
                let (x, z) = buffer.pos().origin();
                let center = CHUNK_WIDTH as i64 / 2;
                let biome = generator.columns().biome_at(x + center, z + center);
                println!(
                    "{:>6} {:>6}  {:016x}  {:<10} {:>6}us",
                    chunk.pos.x,
                    chunk.pos.z,
                    hash_chunk(buffer),
                    generator.biomes().display_name(biome),
                    chunk.generation_time_us,
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:>6} {:>6}  error: {e}", chunk.pos.x, chunk.pos.z);
            }
        }
    }

    let missing = positions.len() - results.len();
    if missing > 0 {
        warn!(missing, "chunks did not complete before the timeout");
    }
    info!(
        generated = results.len() - failures,
        failures,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );

    if failures == 0 && missing == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Every chunk within `radius` of the center, row by row.
fn chunk_positions(center_x: i32, center_z: i32, radius: u32) -> Vec<ChunkPos> {
    let r = radius.min(i32::MAX as u32) as i32;
    let mut positions = Vec::new();
    for z in center_z.saturating_sub(r)..=center_z.saturating_add(r) {
        for x in center_x.saturating_sub(r)..=center_x.saturating_add(r) {
            positions.push(ChunkPos::new(x, z));
        }
    }
    positions
}

/// Feed `positions` to the pool, retrying when the queue is full, and
/// collect every result.
fn generate_all(pool: &AsyncChunkGenerator, positions: &[ChunkPos]) -> Vec<GeneratedChunk> {
    let mut results = Vec::with_capacity(positions.len());
    let mut queue = positions.iter().copied();
    let mut next = queue.next();
    let deadline = Instant::now() + RESULT_TIMEOUT;

    while results.len() < positions.len() && Instant::now() < deadline {
        while let Some(pos) = next {
            if pool.submit(pos).is_err() {
                break;
            }
            next = queue.next();
        }
        if let Some(chunk) = pool.recv_timeout(Duration::from_millis(50)) {
            results.push(chunk);
        }
        results.extend(pool.drain_results());
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_positions_square() {
        let positions = chunk_positions(0, 0, 1);
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], ChunkPos::new(-1, -1));
        assert_eq!(positions[8], ChunkPos::new(1, 1));
    }

    #[test]
    fn test_chunk_positions_radius_zero() {
        assert_eq!(chunk_positions(5, -3, 0), vec![ChunkPos::new(5, -3)]);
    }

    #[test]
    fn test_generate_all_collects_every_chunk() {
        let generator = Arc::new(TerrainGenerator::from_config(&Config::default()).unwrap());
        // A tiny queue forces the submit/retry path.
        let pool = AsyncChunkGenerator::new(generator, 2, 1, 4).unwrap();
        let positions = chunk_positions(0, 0, 1);
        let results = generate_all(&pool, &positions);
        assert_eq!(results.len(), positions.len());
        assert!(results.iter().all(|r| r.result.is_ok()));
    }
}
