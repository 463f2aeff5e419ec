//! Background chunk generation on a worker pool.
//!
//! Offloads [`TerrainGenerator::generate_chunk`] to named worker threads,
//! supports cancellation, and delivers completed chunks (or their errors)
//! through bounded channels.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use loam_config::WorkerConfig;
use loam_voxel::{ChunkBuffer, ChunkPos};

use crate::error::GenerationError;
use crate::generator::TerrainGenerator;

/// A finished generation request.
#[derive(Debug)]
pub struct GeneratedChunk {
    pub pos: ChunkPos,
    /// The chunk, or why it could not be generated.
    pub result: Result<ChunkBuffer, GenerationError>,
    /// Generation time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Internal wrapper that carries the request and its cancellation flag.
struct PendingTask {
    pos: ChunkPos,
    cancelled: Arc<AtomicBool>,
}

/// Manages asynchronous chunk generation across a thread pool.
pub struct AsyncChunkGenerator {
    /// Sender for submitting generation tasks.
    task_sender: Sender<PendingTask>,
    /// Receiver for collecting completed chunks.
    result_receiver: Receiver<GeneratedChunk>,
    /// Shared cancellation flag per task.
    active_tasks: Arc<DashMap<ChunkPos, Arc<AtomicBool>>>,
    /// Current number of in-flight tasks.
    in_flight: Arc<AtomicU64>,
}

impl AsyncChunkGenerator {
    /// Create a pool of `thread_count` workers sharing `generator`.
    ///
    /// # Arguments
    /// - `thread_count`: Number of worker threads (at least one is spawned).
    /// - `max_in_flight`: Task queue capacity. Excess submissions are rejected.
    /// - `result_capacity`: Bounded channel capacity for completed chunks.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new(
        generator: Arc<TerrainGenerator>,
        thread_count: usize,
        max_in_flight: usize,
        result_capacity: usize,
    ) -> io::Result<Self> {
        let (task_sender, task_receiver) = bounded::<PendingTask>(max_in_flight.max(1));
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let generator = Arc::clone(&generator);

            std::thread::Builder::new()
                .name("chunk-gen-worker".into())
                .spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        // Check cancellation before starting work.
                        if task.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let result = generator.generate_chunk(task.pos.x, task.pos.z);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if let Err(err) = &result {
                            tracing::warn!(x = task.pos.x, z = task.pos.z, %err, "chunk generation failed");
                        }

                        // Check cancellation after generation.
                        if !task.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedChunk {
                                pos: task.pos,
                                result,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        tracing::debug!(threads = thread_count.max(1), max_in_flight, "chunk workers started");

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Create a pool sized from the worker config.
    ///
    /// A thread count of `0` leaves two cores for the host.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn from_config(generator: Arc<TerrainGenerator>, config: &WorkerConfig) -> io::Result<Self> {
        let threads = match config.threads {
            0 => default_thread_count(),
            n => n,
        };
        Self::new(generator, threads, config.max_in_flight, config.result_capacity)
    }

    /// Create a pool with a thread count based on CPU cores.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn with_defaults(generator: Arc<TerrainGenerator>) -> io::Result<Self> {
        Self::from_config(generator, &WorkerConfig::default())
    }

    /// Submit a chunk for background generation.
    ///
    /// Returns `Err(pos)` if the queue is full or `pos` is still pending,
    /// including a finished result that has not been collected yet.
    pub fn submit(&self, pos: ChunkPos) -> Result<(), ChunkPos> {
        let cancelled = Arc::new(AtomicBool::new(false));
        match self.active_tasks.entry(pos) {
            Entry::Occupied(_) => return Err(pos),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&cancelled));
            }
        }
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(PendingTask { pos, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let task = e.into_inner();
                self.active_tasks
                    .remove_if(&task.pos, |_, flag| Arc::ptr_eq(flag, &task.cancelled));
                task.pos
            })
    }

    /// Cancel a pending or in-progress generation task.
    ///
    /// If the task has already completed, this is a no-op.
    pub fn cancel(&self, pos: &ChunkPos) {
        if let Some((_, cancelled)) = self.active_tasks.remove(pos) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Drain all completed chunks from the result channel without blocking.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(chunk) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&chunk.pos);
            results.push(chunk);
        }
        results
    }

    /// Wait up to `timeout` for the next completed chunk.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<GeneratedChunk> {
        let chunk = self.result_receiver.recv_timeout(timeout).ok()?;
        self.active_tasks.remove(&chunk.pos);
        Some(chunk)
    }

    /// Number of tasks currently in flight (queued or executing).
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a task for the given position is currently pending.
    pub fn is_pending(&self, pos: &ChunkPos) -> bool {
        self.active_tasks.contains_key(pos)
    }
}

/// Worker count for `threads = 0`: all cores but two, at least one.
pub fn default_thread_count() -> usize {
    let cpus = num_cpus::get().max(2);
    (cpus - 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Biome, BiomeRegistry, BiomeSelector, ClimateSampler, HeightShape, SurfacePalette};
    use crate::column::ColumnGenerator;
    use crate::decorator::Decorator;
    use crate::error::DecorateError;
    use crate::noise_field::{ConstantField, NoiseField};
    use crate::seed::{RandomSource, hash_chunk};
    use loam_config::Config;
    use loam_voxel::blocks;

    fn generator() -> Arc<TerrainGenerator> {
        let mut config = Config::default();
        config.world.seed = 42;
        Arc::new(TerrainGenerator::from_config(&config).unwrap())
    }

    fn collect(pool: &AsyncChunkGenerator, expected: usize) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(60);
        while results.len() < expected && std::time::Instant::now() < deadline {
            if let Some(chunk) = pool.recv_timeout(Duration::from_millis(50)) {
                results.push(chunk);
            }
        }
        results
    }

    #[test]
    fn test_concurrent_generation_is_safe() {
        let pool = AsyncChunkGenerator::new(generator(), 4, 64, 64).unwrap();

        let mut submitted = 0;
        for x in 0..4 {
            for z in 0..4 {
                if pool.submit(ChunkPos::new(x, z)).is_ok() {
                    submitted += 1;
                }
            }
        }

        let results = collect(&pool, submitted);
        assert_eq!(
            results.len(),
            submitted,
            "Should receive all submitted chunks: got {}/{submitted}",
            results.len()
        );
        assert!(results.iter().all(|r| r.result.is_ok()));
    }

    #[test]
    fn test_worker_output_matches_direct_generation() {
        let shared = generator();
        let pool = AsyncChunkGenerator::new(Arc::clone(&shared), 2, 16, 16).unwrap();
        let positions = [ChunkPos::new(-1, 2), ChunkPos::new(7, -3)];
        for pos in positions {
            pool.submit(pos).unwrap();
        }
        for result in collect(&pool, positions.len()) {
            let direct = shared.generate_chunk(result.pos.x, result.pos.z).unwrap();
            assert_eq!(hash_chunk(result.result.as_ref().unwrap()), hash_chunk(&direct));
        }
    }

    /// Parks the worker on the first column of `hold` until `release` fires.
    struct Gate {
        hold: ChunkPos,
        started: Sender<()>,
        release: Receiver<()>,
    }

    impl Decorator for Gate {
        fn name(&self) -> &'static str {
            "gate"
        }

        fn decorate(
            &self,
            chunk: &mut ChunkBuffer,
            x: usize,
            z: usize,
            _biome: &Biome,
            _rng: &mut RandomSource,
        ) -> Result<(), DecorateError> {
            if chunk.pos() == self.hold && x == 0 && z == 0 {
                let _ = self.started.send(());
                let _ = self.release.recv();
            }
            Ok(())
        }
    }

    fn gated_generator(hold: ChunkPos) -> (Arc<TerrainGenerator>, Receiver<()>, Sender<()>) {
        let (started_tx, started_rx) = bounded(1);
        let (release_tx, release_rx) = bounded(1);
        let biome = Biome::new(
            "flat",
            Arc::new(NoiseField::new("flat", Arc::new(ConstantField(0.0)))),
            SurfacePalette {
                surface: blocks::GRASS,
                filler: blocks::DIRT,
                underwater: blocks::DIRT,
                topsoil_depth: 4,
            },
            HeightShape {
                base_height: 68.0,
                height_variation: 8.0,
            },
        )
        .with_decorator(Arc::new(Gate {
            hold,
            started: started_tx,
            release: release_rx,
        }));
        let mut registry = BiomeRegistry::new();
        let id = registry.register(biome).unwrap();
        let columns = ColumnGenerator::new(
            Arc::new(registry),
            ClimateSampler::new(0, 0.002, 0.0025),
            BiomeSelector::Forced(id),
            64,
        )
        .unwrap();
        (Arc::new(TerrainGenerator::new(0, columns)), started_rx, release_tx)
    }

    #[test]
    fn test_cancellation_stops_generation() {
        let busy = ChunkPos::new(0, 0);
        let queued = ChunkPos::new(50, 50);
        let (generator, started, release) = gated_generator(busy);
        let pool = AsyncChunkGenerator::new(generator, 1, 8, 8).unwrap();

        pool.submit(busy).unwrap();
        started.recv_timeout(Duration::from_secs(10)).unwrap();
        // The only worker is parked inside `busy`, so `queued` cannot start yet.
        pool.submit(queued).unwrap();
        pool.cancel(&queued);
        assert!(!pool.is_pending(&queued));
        release.send(()).unwrap();

        let first = pool.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(first.pos, busy);
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while pool.in_flight_count() > 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(pool.in_flight_count(), 0);
        assert!(pool.recv_timeout(Duration::from_millis(200)).is_none());
    }

    #[test]
    fn test_duplicate_submit_rejected_while_pending() {
        let busy = ChunkPos::new(0, 0);
        let (generator, started, release) = gated_generator(busy);
        let pool = AsyncChunkGenerator::new(generator, 1, 8, 8).unwrap();

        pool.submit(busy).unwrap();
        started.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(pool.submit(busy), Err(busy));
        assert_eq!(pool.in_flight_count(), 1);
        // The rejected duplicate leaves the original request cancellable.
        assert!(pool.is_pending(&busy));
        release.send(()).unwrap();

        let done = pool.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(done.pos, busy);
        assert!(done.result.is_ok());
        assert!(!pool.is_pending(&busy));
        assert!(pool.recv_timeout(Duration::from_millis(200)).is_none());
        // Collected, so the position may be requested again.
        assert!(pool.submit(busy).is_ok());
    }

    #[test]
    fn test_in_flight_count() {
        let pool = AsyncChunkGenerator::new(generator(), 1, 64, 64).unwrap();
        assert_eq!(pool.in_flight_count(), 0);

        for i in 0..5 {
            let _ = pool.submit(ChunkPos::new(i, 0));
        }
        assert!(pool.in_flight_count() > 0, "Should have in-flight tasks after submission");

        let _ = collect(&pool, 5);
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while pool.in_flight_count() > 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(pool.in_flight_count(), 0);
    }

    #[test]
    fn test_full_queue_rejects_submission() {
        // One worker, one queue slot: at most two requests can be accepted
        // before the worker drains one.
        let pool = AsyncChunkGenerator::new(generator(), 1, 1, 64).unwrap();
        let rejected = (0..32)
            .map(|i| pool.submit(ChunkPos::new(i, i)))
            .filter(|r| r.is_err())
            .count();
        assert!(rejected > 0);
    }

    #[test]
    fn test_default_thread_count_positive() {
        assert!(default_thread_count() >= 1);
    }
}
