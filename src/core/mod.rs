//! Core data structures for the world
//! Contains fundamental types like blocks, biomes, coordinates and chunks.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod coord;

// Re-export commonly used types
pub use biome::{BiomeAttributes, Lode};
pub use block::BlockType;
pub use chunk::Chunk;
pub use coord::{ChunkCoord, WorldDimensions};
