use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Integer (x, z) address of a chunk in the world grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Chunk containing a world-space position.
    pub fn from_world_position(position: Vec3, chunk_width: i32) -> Self {
        let width = chunk_width as f32;
        ChunkCoord {
            x: (position.x / width).floor() as i32,
            z: (position.z / width).floor() as i32,
        }
    }

    /// Chebyshev distance, the metric of the square view window.
    pub fn distance(&self, other: &ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Fixed world size, read once at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDimensions {
    pub world_size_in_chunks: i32,
    pub chunk_width: i32,
    pub chunk_height: i32,
}

impl Default for WorldDimensions {
    fn default() -> Self {
        Self {
            world_size_in_chunks: WORLD_SIZE_IN_CHUNKS,
            chunk_width: CHUNK_WIDTH,
            chunk_height: CHUNK_HEIGHT,
        }
    }
}

impl WorldDimensions {
    pub fn world_size_in_voxels(&self) -> i32 {
        self.world_size_in_chunks * self.chunk_width
    }

    pub fn center_chunk(&self) -> ChunkCoord {
        let mid = self.world_size_in_chunks / 2;
        ChunkCoord::new(mid, mid)
    }

    pub fn is_voxel_in_world(&self, x: i32, y: i32, z: i32) -> bool {
        let size = self.world_size_in_voxels();
        x >= 0 && x < size && y >= 0 && y < self.chunk_height && z >= 0 && z < size
    }
}
