use glam::Vec3;

use crate::core::block::BlockType;
use crate::core::coord::{ChunkCoord, WorldDimensions};
use crate::world::terrain::VoxelSource;

/// Voxel contents of one chunk column.
///
/// Visibility is tracked by the chunk index, not here.
pub struct Chunk {
    coord: ChunkCoord,
    width: i32,
    height: i32,
    blocks: Vec<BlockType>,
    solid_count: usize,
}

impl Chunk {
    /// Fill a chunk by sampling `source` at every voxel it covers.
    pub fn new(coord: ChunkCoord, dims: &WorldDimensions, source: &impl VoxelSource) -> Self {
        let width = dims.chunk_width;
        let height = dims.chunk_height;
        let base_x = coord.x * width;
        let base_z = coord.z * width;

        let mut blocks = vec![BlockType::Air; (width * height * width) as usize];
        let mut solid_count = 0;

        for lx in 0..width {
            for ly in 0..height {
                for lz in 0..width {
                    let position = Vec3::new((base_x + lx) as f32, ly as f32, (base_z + lz) as f32);
                    let block = source.voxel_at(position);
                    if block.is_solid() {
                        solid_count += 1;
                    }
                    blocks[Self::index(width, height, lx, ly, lz)] = block;
                }
            }
        }

        Chunk {
            coord,
            width,
            height,
            blocks,
            solid_count,
        }
    }

    fn index(width: i32, height: i32, x: i32, y: i32, z: i32) -> usize {
        ((x * height + y) * width + z) as usize
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if x >= 0 && x < self.width && y >= 0 && y < self.height && z >= 0 && z < self.width {
            self.blocks[Self::index(self.width, self.height, x, y, z)]
        } else {
            BlockType::Air
        }
    }

    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    pub fn solid_count(&self) -> usize {
        self.solid_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Layered;

    impl VoxelSource for Layered {
        fn voxel_at(&self, position: Vec3) -> BlockType {
            if position.y < 2.0 {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        }
    }

    #[test]
    fn test_chunk_samples_source() {
        let dims = WorldDimensions {
            world_size_in_chunks: 4,
            chunk_width: 4,
            chunk_height: 8,
        };
        let chunk = Chunk::new(ChunkCoord::new(1, 2), &dims, &Layered);

        assert_eq!(chunk.coord(), ChunkCoord::new(1, 2));
        assert_eq!(chunk.get_block(0, 0, 0), BlockType::Stone);
        assert_eq!(chunk.get_block(3, 1, 3), BlockType::Stone);
        assert_eq!(chunk.get_block(3, 2, 3), BlockType::Air);
        assert_eq!(chunk.get_block(-1, 0, 0), BlockType::Air);
        assert_eq!(chunk.solid_count(), 4 * 2 * 4);
        assert!(!chunk.is_empty());
    }
}
