//! World generation and streaming modules
//! Contains noise sampling, terrain classification, the chunk index and the
//! observer-driven streaming controller.

pub mod index;
pub mod loader;
pub mod noise;
pub mod streaming;
pub mod terrain;

// Re-export commonly used types
pub use index::{ChunkIndex, ChunkState};
pub use loader::{ChunkGenRequest, ChunkGenResult, ChunkLoader};
pub use noise::NoiseSampler;
pub use streaming::{ChunkStreamer, StreamStats, StreamUpdate};
pub use terrain::{TerrainGenerator, VoxelSource};
