//! Background chunk generation with a priority-ordered request stream
//!
//! Worker threads build chunks ahead of the observer so the streaming
//! controller can later activate them without paying for generation on the
//! tick thread. Results only become visible when the controller drains them.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError, bounded};
use rustc_hash::FxHashSet;

use crate::constants::{PREFETCH_QUEUE_CAPACITY, PREFETCH_RESULT_CAPACITY};
use crate::core::chunk::Chunk;
use crate::core::coord::ChunkCoord;
use crate::world::terrain::TerrainGenerator;

/// Request for chunk generation with priority
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkGenRequest {
    pub coord: ChunkCoord,
    pub priority: i32, // Lower = higher priority (distance to observer)
}

/// Result of background chunk generation
pub struct ChunkGenResult {
    pub coord: ChunkCoord,
    pub chunk: Chunk,
}

/// Manages background chunk generation with worker threads
pub struct ChunkLoader {
    request_tx: Option<Sender<ChunkGenRequest>>,
    // Kept so shutdown can discard queued work
    request_rx: Receiver<ChunkGenRequest>,
    result_rx: Receiver<ChunkGenResult>,
    pending: FxHashSet<ChunkCoord>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkLoader {
    /// Create a ChunkLoader whose workers each own a copy of `generator`
    pub fn new(generator: &TerrainGenerator, num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        // Bounded channels prevent unbounded memory growth
        let (request_tx, request_rx) = bounded::<ChunkGenRequest>(PREFETCH_QUEUE_CAPACITY);
        let (result_tx, result_rx) = bounded::<ChunkGenResult>(PREFETCH_RESULT_CAPACITY);

        let mut workers = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let generator = generator.clone();

            let spawned = thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    while let Ok(req) = rx.recv() {
                        let chunk = Chunk::new(req.coord, generator.dimensions(), &generator);
                        if tx
                            .send(ChunkGenResult {
                                coord: req.coord,
                                chunk,
                            })
                            .is_err()
                        {
                            // Controller has gone away
                            break;
                        }
                    }
                });

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    tracing::warn!("Failed to spawn chunk generation worker {}: {}", worker_id, e)
                }
            }
        }

        tracing::debug!("Chunk loader started with {} workers", workers.len());

        ChunkLoader {
            request_tx: Some(request_tx),
            request_rx,
            result_rx,
            pending: FxHashSet::default(),
            workers,
        }
    }

    /// Request a chunk; returns false if it is already in flight or the queue is full
    pub fn request_chunk(&mut self, coord: ChunkCoord, priority: i32) -> bool {
        if self.pending.contains(&coord) {
            return false;
        }

        let Some(request_tx) = self.request_tx.as_ref() else {
            return false;
        };

        match request_tx.try_send(ChunkGenRequest { coord, priority }) {
            Ok(()) => {
                self.pending.insert(coord);
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Prefetch queue full, skipping {:?}", coord);
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!("Chunk workers are gone, dropping request for {:?}", coord);
                false
            }
        }
    }

    /// Request multiple chunks, lowest priority value first
    pub fn request_chunks(&mut self, requests: &[(ChunkCoord, i32)]) -> usize {
        let mut sorted: Vec<_> = requests
            .iter()
            .filter(|(coord, _)| !self.pending.contains(coord))
            .collect();
        sorted.sort_by_key(|(coord, priority)| (*priority, *coord));

        let mut sent = 0;
        for (coord, priority) in sorted {
            if self.pending.len() >= PREFETCH_QUEUE_CAPACITY {
                break; // Don't overwhelm the queue
            }
            if self.request_chunk(*coord, *priority) {
                sent += 1;
            }
        }
        sent
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Poll for completed chunks (non-blocking)
    pub fn poll_results(&mut self, max_results: usize) -> Vec<ChunkGenResult> {
        let mut results = Vec::with_capacity(max_results);

        for _ in 0..max_results {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    self.pending.remove(&result.coord);
                    results.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        results
    }

    /// Block until every pending request has completed or `timeout` elapses
    /// waiting for the next one
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<ChunkGenResult> {
        let mut results = Vec::with_capacity(self.pending.len());

        while !self.pending.is_empty() {
            match self.result_rx.recv_timeout(timeout) {
                Ok(result) => {
                    self.pending.remove(&result.coord);
                    results.push(result);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        results
    }

    /// Block until `coord` has been generated, collecting every result that
    /// arrives in the meantime. Gives up after `timeout`, leaving `coord`
    /// pending.
    pub fn wait_for(&mut self, coord: ChunkCoord, timeout: Duration) -> Vec<ChunkGenResult> {
        let deadline = Instant::now() + timeout;
        let mut results = Vec::new();

        while self.pending.contains(&coord) {
            match self.result_rx.recv_deadline(deadline) {
                Ok(result) => {
                    self.pending.remove(&result.coord);
                    results.push(result);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!("Timed out waiting for background chunk {:?}", coord);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        results
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ChunkLoader {
    fn drop(&mut self) {
        // Discard queued requests, then close the queue so workers stop
        // after their current chunk
        while self.request_rx.try_recv().is_ok() {}
        self.request_tx.take();

        // Keep receiving so no worker stays blocked on a full result channel;
        // this ends once every worker has dropped its sender
        while self.result_rx.recv().is_ok() {}

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("Chunk generation worker panicked");
            }
        }
    }
}
