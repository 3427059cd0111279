// Core module with fundamental types
pub mod core;

// World module with generation, indexing and streaming
pub mod world;

// Settings loaded once at startup
pub mod utils;

pub mod constants;

// Re-exports
pub use constants::*;
pub use crate::core::{BiomeAttributes, BlockType, Chunk, ChunkCoord, Lode, WorldDimensions};
pub use utils::{SettingsError, StreamingSettings, WorldSettings};
pub use world::{
    ChunkIndex, ChunkLoader, ChunkState, ChunkStreamer, NoiseSampler, StreamStats, StreamUpdate,
    TerrainGenerator, VoxelSource,
};
