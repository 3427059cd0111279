//! Observer-driven chunk streaming
//!
//! `ChunkStreamer` keeps a square window of chunks active around the
//! observer. It is driven by explicit `tick` calls carrying the latest
//! observer position and only recomputes the window when the observer
//! crosses into a different chunk.

use std::time::Duration;

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::constants::{PREFETCH_WAIT_TIMEOUT_SECS, SPAWN_HEIGHT_OFFSET};
use crate::core::block::BlockType;
use crate::core::chunk::Chunk;
use crate::core::coord::{ChunkCoord, WorldDimensions};
use crate::utils::settings::WorldSettings;
use crate::world::index::{ChunkIndex, ChunkState};
use crate::world::loader::{ChunkGenResult, ChunkLoader};
use crate::world::terrain::TerrainGenerator;

/// Chunk transitions caused by one recompute.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    pub created: Vec<ChunkCoord>,
    pub activated: Vec<ChunkCoord>,
    pub deactivated: Vec<ChunkCoord>,
}

impl StreamUpdate {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.activated.is_empty() && self.deactivated.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub ticks: u64,
    pub recomputes: u64,
    pub created: u64,
    pub activated: u64,
    pub deactivated: u64,
    pub prefetched: u64,
}

pub struct ChunkStreamer {
    generator: TerrainGenerator,
    dims: WorldDimensions,
    index: ChunkIndex,
    view_distance: i32,
    prefetch_distance: i32,
    max_results_per_tick: usize,
    loader: Option<ChunkLoader>,
    last_coord: ChunkCoord,
    current_coord: ChunkCoord,
    stats: StreamStats,
}

impl ChunkStreamer {
    pub fn new(settings: &WorldSettings) -> Self {
        let dims = settings.world;
        let generator = TerrainGenerator::new(settings.seed, settings.biome.clone(), dims);

        let prefetch_distance = settings.streaming.prefetch_distance.max(0);
        let loader = if prefetch_distance > 0 {
            Some(ChunkLoader::new(&generator, settings.streaming.worker_count))
        } else {
            None
        };

        let spawn = dims.center_chunk();
        ChunkStreamer {
            generator,
            dims,
            index: ChunkIndex::new(dims.world_size_in_chunks),
            view_distance: settings.view_distance,
            prefetch_distance,
            max_results_per_tick: settings.streaming.max_results_per_tick.max(1),
            loader,
            last_coord: spawn,
            current_coord: spawn,
            stats: StreamStats::default(),
        }
    }

    pub fn spawn_position(&self) -> Vec3 {
        let center = self.dims.world_size_in_voxels() as f32 / 2.0;
        Vec3::new(
            center,
            self.dims.chunk_height as f32 + SPAWN_HEIGHT_OFFSET,
            center,
        )
    }

    pub fn chunk_coord_for(&self, position: Vec3) -> ChunkCoord {
        ChunkCoord::from_world_position(position, self.dims.chunk_width)
    }

    /// Populate the window around the world center and place the observer
    /// at spawn.
    pub fn generate_world(&mut self) -> StreamUpdate {
        let center = self.dims.center_chunk();
        tracing::info!(
            "Generating world (seed {}, {}x{} chunks, view distance {})",
            self.generator.seed(),
            self.dims.world_size_in_chunks,
            self.dims.world_size_in_chunks,
            self.view_distance
        );

        let mut update = StreamUpdate::default();
        for x in (center.x - self.view_distance)..(center.x + self.view_distance) {
            for z in (center.z - self.view_distance)..(center.z + self.view_distance) {
                let coord = ChunkCoord::new(x, z);
                if self.index.is_in_world(coord) && !self.index.exists(coord) {
                    self.create_chunk(coord);
                    update.created.push(coord);
                }
            }
        }

        let spawn = self.chunk_coord_for(self.spawn_position());
        self.last_coord = spawn;
        self.current_coord = spawn;
        self.request_prefetch(spawn);

        tracing::info!("World generated! {} chunks around {:?}", update.created.len(), spawn);
        update
    }

    /// Per-tick entry point. Returns `None` when the observer stayed in the
    /// same chunk, in which case nothing changed.
    pub fn tick(&mut self, observer: Vec3) -> Option<StreamUpdate> {
        self.stats.ticks += 1;
        self.drain_prefetched();

        self.current_coord = self.chunk_coord_for(observer);
        if self.current_coord == self.last_coord {
            return None;
        }

        let update = self.check_view_distance(self.current_coord);
        self.last_coord = self.current_coord;
        self.request_prefetch(self.current_coord);
        Some(update)
    }

    /// Recompute the active window around `center`.
    pub fn check_view_distance(&mut self, center: ChunkCoord) -> StreamUpdate {
        self.stats.recomputes += 1;
        let mut previously_active: FxHashSet<ChunkCoord> = self.index.active_coords().collect();
        let mut update = StreamUpdate::default();

        for x in (center.x - self.view_distance)..(center.x + self.view_distance) {
            for z in (center.z - self.view_distance)..(center.z + self.view_distance) {
                let coord = ChunkCoord::new(x, z);

                if !self.index.is_in_world(coord) {
                    tracing::trace!("Skipping {:?}, outside the world", coord);
                } else if !self.index.exists(coord) && !self.await_prefetched(coord) {
                    self.create_chunk(coord);
                    update.created.push(coord);
                } else if self.index.activate(coord) {
                    self.stats.activated += 1;
                    tracing::trace!("Activated {:?}", coord);
                    update.activated.push(coord);
                }

                // Still wanted
                previously_active.remove(&coord);
            }
        }

        let mut leaving: Vec<ChunkCoord> = previously_active.into_iter().collect();
        leaving.sort();
        for coord in leaving {
            if self.index.deactivate(coord) {
                self.stats.deactivated += 1;
                tracing::trace!("Deactivated {:?}", coord);
                update.deactivated.push(coord);
            }
        }

        tracing::debug!(
            "Recomputed view around {:?}: {} created, {} activated, {} deactivated",
            center,
            update.created.len(),
            update.activated.len(),
            update.deactivated.len()
        );
        update
    }

    fn create_chunk(&mut self, coord: ChunkCoord) {
        let chunk = Chunk::new(coord, &self.dims, &self.generator);
        self.index.insert(coord, chunk, ChunkState::Active);
        self.stats.created += 1;
        tracing::trace!("Created {:?}", coord);
    }

    /// Move finished background chunks into the index as inactive. Runs
    /// before any window diff on the same thread.
    fn drain_prefetched(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };

        let results = loader.poll_results(self.max_results_per_tick);
        self.store_prefetched(results);
    }

    /// A chunk entering the window while a worker still owns it is waited
    /// for rather than built twice. Returns whether `coord` now exists.
    fn await_prefetched(&mut self, coord: ChunkCoord) -> bool {
        let Some(loader) = self.loader.as_mut() else {
            return false;
        };
        if !loader.is_pending(coord) {
            return false;
        }

        tracing::trace!("Waiting for background chunk {:?}", coord);
        let results = loader.wait_for(coord, Duration::from_secs(PREFETCH_WAIT_TIMEOUT_SECS));
        self.store_prefetched(results);
        self.index.exists(coord)
    }

    fn store_prefetched(&mut self, results: Vec<ChunkGenResult>) {
        for result in results {
            // Only after a timed-out wait fell back to building it here
            if self.index.exists(result.coord) {
                tracing::warn!("Dropping prefetched {:?}, already created", result.coord);
                continue;
            }
            self.index.insert(result.coord, result.chunk, ChunkState::Inactive);
            self.stats.prefetched += 1;
        }
    }

    fn request_prefetch(&mut self, center: ChunkCoord) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };

        let reach = self.view_distance + self.prefetch_distance;
        let mut requests = Vec::new();
        for x in (center.x - reach)..(center.x + reach) {
            for z in (center.z - reach)..(center.z + reach) {
                let coord = ChunkCoord::new(x, z);
                if self.index.is_in_world(coord)
                    && !self.index.exists(coord)
                    && !loader.is_pending(coord)
                {
                    requests.push((coord, coord.distance(&center)));
                }
            }
        }

        let sent = loader.request_chunks(&requests);
        if sent > 0 {
            tracing::debug!("Queued {} chunks for background generation", sent);
        }
    }

    /// Block until outstanding background work lands in the index.
    pub fn flush_prefetch(&mut self, timeout: Duration) -> usize {
        let Some(loader) = self.loader.as_mut() else {
            return 0;
        };

        let results = loader.wait_all(timeout);
        let before = self.stats.prefetched;
        self.store_prefetched(results);
        (self.stats.prefetched - before) as usize
    }

    /// Material at a world position; air outside the world.
    pub fn get_voxel(&self, position: Vec3) -> BlockType {
        self.generator.get_voxel(position)
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn current_coord(&self) -> ChunkCoord {
        self.current_coord
    }

    pub fn view_distance(&self) -> i32 {
        self.view_distance
    }

    pub fn pending_prefetch(&self) -> usize {
        self.loader.as_ref().map_or(0, |loader| loader.pending_count())
    }

    pub fn is_prefetch_pending(&self, coord: ChunkCoord) -> bool {
        self.loader.as_ref().is_some_and(|loader| loader.is_pending(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::biome::BiomeAttributes;

    fn settings(size: i32, view: i32) -> WorldSettings {
        let mut settings = WorldSettings::default();
        settings.seed = 42;
        settings.view_distance = view;
        settings.world = WorldDimensions {
            world_size_in_chunks: size,
            chunk_width: 4,
            chunk_height: 8,
        };
        settings.biome = BiomeAttributes::flat("Flat", 3);
        settings.streaming.prefetch_distance = 0;
        settings
    }

    fn chunk_center(x: i32, z: i32) -> Vec3 {
        Vec3::new(x as f32 * 4.0 + 2.0, 10.0, z as f32 * 4.0 + 2.0)
    }

    #[test]
    fn test_spawn_is_world_center() {
        let streamer = ChunkStreamer::new(&settings(10, 2));
        assert_eq!(streamer.spawn_position(), Vec3::new(20.0, 10.0, 20.0));
        assert_eq!(
            streamer.chunk_coord_for(streamer.spawn_position()),
            ChunkCoord::new(5, 5)
        );
    }

    #[test]
    fn test_generate_world_window() {
        let mut streamer = ChunkStreamer::new(&settings(10, 2));
        let update = streamer.generate_world();

        assert_eq!(update.created.len(), 16);
        let expected: Vec<_> = (3..7)
            .flat_map(|x| (3..7).map(move |z| ChunkCoord::new(x, z)))
            .collect();
        assert_eq!(streamer.index().sorted_active_coords(), expected);
        assert_eq!(streamer.current_coord(), ChunkCoord::new(5, 5));
    }

    #[test]
    fn test_tick_throttles_within_chunk() {
        let mut streamer = ChunkStreamer::new(&settings(10, 2));
        streamer.generate_world();

        assert!(streamer.tick(Vec3::new(20.0, 10.0, 20.0)).is_none());
        assert!(streamer.tick(Vec3::new(23.9, 0.0, 20.5)).is_none());
        assert!(streamer.tick(Vec3::new(20.1, 50.0, 23.99)).is_none());
        assert_eq!(streamer.stats().recomputes, 0);
        assert_eq!(streamer.stats().ticks, 3);
    }

    #[test]
    fn test_step_in_x_moves_columns() {
        let mut streamer = ChunkStreamer::new(&settings(10, 2));
        streamer.generate_world();

        let mut update = streamer.tick(chunk_center(6, 5)).unwrap();
        update.created.sort();
        update.deactivated.sort();

        let leading: Vec<_> = (3..7).map(|z| ChunkCoord::new(7, z)).collect();
        let trailing: Vec<_> = (3..7).map(|z| ChunkCoord::new(3, z)).collect();
        assert_eq!(update.created, leading);
        assert!(update.activated.is_empty());
        assert_eq!(update.deactivated, trailing);
    }

    #[test]
    fn test_window_clipped_at_world_edge() {
        let mut streamer = ChunkStreamer::new(&settings(10, 2));
        streamer.generate_world();
        streamer.tick(chunk_center(1, 1));

        let expected: Vec<_> = (1..3)
            .flat_map(|x| (1..3).map(move |z| ChunkCoord::new(x, z)))
            .collect();
        assert_eq!(streamer.index().sorted_active_coords(), expected);
    }

    #[test]
    fn test_observer_outside_world_does_not_panic() {
        let mut streamer = ChunkStreamer::new(&settings(10, 2));
        streamer.generate_world();

        let update = streamer.tick(Vec3::new(-500.0, 0.0, 9000.0)).unwrap();
        assert!(update.created.is_empty());
        assert_eq!(update.deactivated.len(), 16);
        assert_eq!(streamer.index().active_count(), 0);
        assert_eq!(streamer.index().chunk_count(), 16);
    }

    #[test]
    fn test_get_voxel_delegates() {
        let streamer = ChunkStreamer::new(&settings(10, 2));
        assert_eq!(streamer.get_voxel(Vec3::new(5.0, 0.0, 5.0)), BlockType::Bedrock);
        assert_eq!(streamer.get_voxel(Vec3::new(5.0, 3.0, 5.0)), BlockType::Grass);
        assert_eq!(streamer.get_voxel(Vec3::new(-5.0, 3.0, 5.0)), BlockType::Air);
    }
}
