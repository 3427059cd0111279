//! Terrain classification
//!
//! Maps a world-space voxel position to a single material using a 2D
//! height map plus ordered lode overrides sampled from 3D noise.

use glam::{Vec2, Vec3};

use crate::constants::DIRT_DEPTH;
use crate::core::biome::BiomeAttributes;
use crate::core::block::BlockType;
use crate::core::coord::WorldDimensions;
use crate::world::noise::NoiseSampler;

/// Anything a chunk can be filled from.
pub trait VoxelSource {
    fn voxel_at(&self, position: Vec3) -> BlockType;
}

pub struct TerrainGenerator {
    sampler: NoiseSampler,
    biome: BiomeAttributes,
    dims: WorldDimensions,
}

impl TerrainGenerator {
    pub fn new(seed: u32, biome: BiomeAttributes, dims: WorldDimensions) -> Self {
        TerrainGenerator {
            sampler: NoiseSampler::new(seed, dims.chunk_width),
            biome,
            dims,
        }
    }

    pub fn seed(&self) -> u32 {
        self.sampler.seed()
    }

    pub fn biome(&self) -> &BiomeAttributes {
        &self.biome
    }

    pub fn dimensions(&self) -> &WorldDimensions {
        &self.dims
    }

    pub fn terrain_height(&self, x: i32, z: i32) -> i32 {
        let noise = self.sampler.sample_2d(
            Vec2::new(x as f32, z as f32),
            0.0,
            self.biome.terrain_scale,
        );
        (self.biome.terrain_height as f32 * noise).floor() as i32 + self.biome.solid_ground_height
    }

    /// Material at a world position. Total: anything outside the world is air.
    pub fn get_voxel(&self, position: Vec3) -> BlockType {
        if !position.is_finite() {
            return BlockType::Air;
        }

        let x = position.x.floor() as i32;
        let y = position.y.floor() as i32;
        let z = position.z.floor() as i32;

        if !self.dims.is_voxel_in_world(x, y, z) {
            return BlockType::Air;
        }

        if y == 0 {
            return BlockType::Bedrock;
        }

        let surface = self.terrain_height(x, z);
        let block = if y == surface {
            BlockType::Grass
        } else if y < surface && y > surface - DIRT_DEPTH {
            BlockType::Dirt
        } else if y > surface {
            return BlockType::Air;
        } else {
            BlockType::Stone
        };

        if block != BlockType::Stone {
            return block;
        }

        // Every matching lode is evaluated; the last hit wins
        let voxel = Vec3::new(x as f32, y as f32, z as f32);
        self.biome
            .lodes
            .iter()
            .filter(|lode| lode.contains_height(y))
            .fold(block, |current, lode| {
                if self
                    .sampler
                    .sample_3d(voxel, lode.noise_offset, lode.scale, lode.threshold)
                {
                    lode.block
                } else {
                    current
                }
            })
    }
}

impl VoxelSource for TerrainGenerator {
    fn voxel_at(&self, position: Vec3) -> BlockType {
        self.get_voxel(position)
    }
}

// Allow cloning for worker threads
impl Clone for TerrainGenerator {
    fn clone(&self) -> Self {
        TerrainGenerator::new(self.seed(), self.biome.clone(), self.dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::biome::Lode;

    fn small_dims() -> WorldDimensions {
        WorldDimensions {
            world_size_in_chunks: 10,
            chunk_width: 16,
            chunk_height: 64,
        }
    }

    fn lode(block: BlockType, threshold: f32) -> Lode {
        Lode {
            name: format!("{:?}", block),
            block,
            min_height: 0,
            max_height: 64,
            noise_offset: 0.0,
            scale: 0.5,
            threshold,
        }
    }

    #[test]
    fn test_surface_layers() {
        let generator = TerrainGenerator::new(42, BiomeAttributes::flat("Flat", 10), small_dims());
        let column = |y: f32| generator.get_voxel(Vec3::new(40.0, y, 40.0));

        assert_eq!(generator.terrain_height(40, 40), 10);
        assert_eq!(column(10.0), BlockType::Grass);
        assert_eq!(column(9.0), BlockType::Dirt);
        assert_eq!(column(8.0), BlockType::Dirt);
        assert_eq!(column(7.0), BlockType::Dirt);
        assert_eq!(column(6.0), BlockType::Stone);
        assert_eq!(column(5.0), BlockType::Stone);
        assert_eq!(column(11.0), BlockType::Air);
        assert_eq!(column(0.0), BlockType::Bedrock);
    }

    #[test]
    fn test_out_of_bounds_is_air() {
        let generator = TerrainGenerator::new(42, BiomeAttributes::flat("Flat", 10), small_dims());
        let size = small_dims().world_size_in_voxels() as f32;

        assert_eq!(generator.get_voxel(Vec3::new(-1.0, 5.0, 5.0)), BlockType::Air);
        assert_eq!(generator.get_voxel(Vec3::new(5.0, -0.5, 5.0)), BlockType::Air);
        assert_eq!(generator.get_voxel(Vec3::new(5.0, 64.0, 5.0)), BlockType::Air);
        assert_eq!(generator.get_voxel(Vec3::new(5.0, 5.0, size)), BlockType::Air);
        assert_eq!(generator.get_voxel(Vec3::new(f32::NAN, 5.0, 5.0)), BlockType::Air);
        assert_eq!(
            generator.get_voxel(Vec3::new(f32::INFINITY, 5.0, 5.0)),
            BlockType::Air
        );
        assert_eq!(generator.get_voxel(Vec3::new(1e30, 5.0, -1e30)), BlockType::Air);
    }

    #[test]
    fn test_bedrock_floor_everywhere() {
        let generator = TerrainGenerator::new(42, BiomeAttributes::default(), small_dims());
        for x in (0..160).step_by(7) {
            for z in (0..160).step_by(11) {
                assert_eq!(
                    generator.get_voxel(Vec3::new(x as f32, 0.0, z as f32)),
                    BlockType::Bedrock
                );
            }
        }
    }

    #[test]
    fn test_later_lode_wins() {
        // threshold below zero always matches
        let mut biome = BiomeAttributes::flat("Ores", 30);
        biome.lodes = vec![lode(BlockType::CoalOre, -1.0), lode(BlockType::IronOre, -1.0)];
        let generator = TerrainGenerator::new(42, biome, small_dims());

        assert_eq!(generator.get_voxel(Vec3::new(20.0, 12.0, 20.0)), BlockType::IronOre);

        let mut reversed = BiomeAttributes::flat("Ores", 30);
        reversed.lodes = vec![lode(BlockType::IronOre, -1.0), lode(BlockType::CoalOre, -1.0)];
        let generator = TerrainGenerator::new(42, reversed, small_dims());

        assert_eq!(generator.get_voxel(Vec3::new(20.0, 12.0, 20.0)), BlockType::CoalOre);
    }

    #[test]
    fn test_failed_lode_keeps_earlier_match() {
        let mut biome = BiomeAttributes::flat("Ores", 30);
        biome.lodes = vec![lode(BlockType::GoldOre, -1.0), lode(BlockType::IronOre, 2.0)];
        let generator = TerrainGenerator::new(42, biome, small_dims());

        assert_eq!(generator.get_voxel(Vec3::new(20.0, 12.0, 20.0)), BlockType::GoldOre);
    }

    #[test]
    fn test_lodes_only_replace_stone() {
        let mut biome = BiomeAttributes::flat("Ores", 30);
        biome.lodes = vec![lode(BlockType::DiamondOre, -1.0)];
        let generator = TerrainGenerator::new(42, biome, small_dims());

        assert_eq!(generator.get_voxel(Vec3::new(3.0, 30.0, 3.0)), BlockType::Grass);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 28.0, 3.0)), BlockType::Dirt);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 0.0, 3.0)), BlockType::Bedrock);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 40.0, 3.0)), BlockType::Air);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 20.0, 3.0)), BlockType::DiamondOre);
    }

    #[test]
    fn test_lode_band_edges_excluded() {
        let mut biome = BiomeAttributes::flat("Ores", 30);
        biome.lodes = vec![Lode {
            min_height: 10,
            max_height: 20,
            ..lode(BlockType::Gravel, -1.0)
        }];
        let generator = TerrainGenerator::new(42, biome, small_dims());

        assert_eq!(generator.get_voxel(Vec3::new(3.0, 10.0, 3.0)), BlockType::Stone);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 11.0, 3.0)), BlockType::Gravel);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 19.0, 3.0)), BlockType::Gravel);
        assert_eq!(generator.get_voxel(Vec3::new(3.0, 20.0, 3.0)), BlockType::Stone);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = TerrainGenerator::new(2137, BiomeAttributes::default(), small_dims());
        let b = a.clone();
        for x in (0..160).step_by(13) {
            for y in 0..64 {
                let p = Vec3::new(x as f32, y as f32, (x / 2) as f32);
                assert_eq!(a.get_voxel(p), b.get_voxel(p));
            }
        }
    }
}
