use serde::{Deserialize, Serialize};

use crate::core::block::BlockType;

/// Height-banded, noise-gated override applied over stone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lode {
    pub name: String,
    pub block: BlockType,
    pub min_height: i32,
    pub max_height: i32,
    #[serde(default)]
    pub noise_offset: f32,
    pub scale: f32,
    pub threshold: f32,
}

impl Lode {
    /// Both ends are exclusive.
    pub fn contains_height(&self, y: i32) -> bool {
        y > self.min_height && y < self.max_height
    }
}

/// Terrain shape and ore parameters, fixed for the lifetime of a world.
///
/// Lode order matters: when several lodes match the same stone voxel the
/// last one in the list wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeAttributes {
    pub name: String,
    pub solid_ground_height: i32,
    pub terrain_height: i32,
    pub terrain_scale: f32,
    #[serde(default)]
    pub lodes: Vec<Lode>,
}

impl Default for BiomeAttributes {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            solid_ground_height: 42,
            terrain_height: 42,
            terrain_scale: 0.25,
            lodes: vec![
                Lode {
                    name: "Dirt".to_string(),
                    block: BlockType::Dirt,
                    min_height: 1,
                    max_height: 255,
                    noise_offset: 0.0,
                    scale: 0.1,
                    threshold: 0.5,
                },
                Lode {
                    name: "Sand".to_string(),
                    block: BlockType::Sand,
                    min_height: 30,
                    max_height: 60,
                    noise_offset: 500.0,
                    scale: 0.2,
                    threshold: 0.6,
                },
                Lode {
                    name: "Caves".to_string(),
                    block: BlockType::Air,
                    min_height: 5,
                    max_height: 60,
                    noise_offset: 43534.0,
                    scale: 0.1,
                    threshold: 0.55,
                },
                Lode {
                    name: "Coal".to_string(),
                    block: BlockType::CoalOre,
                    min_height: 8,
                    max_height: 80,
                    noise_offset: 1200.0,
                    scale: 0.3,
                    threshold: 0.7,
                },
                Lode {
                    name: "Iron".to_string(),
                    block: BlockType::IronOre,
                    min_height: 4,
                    max_height: 40,
                    noise_offset: 2750.0,
                    scale: 0.35,
                    threshold: 0.75,
                },
            ],
        }
    }
}

impl BiomeAttributes {
    /// Flat terrain with no lodes, mostly useful for tests and tooling.
    pub fn flat(name: &str, solid_ground_height: i32) -> Self {
        Self {
            name: name.to_string(),
            solid_ground_height,
            terrain_height: 0,
            terrain_scale: 1.0,
            lodes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lode_band_is_exclusive() {
        let lode = Lode {
            name: "Test".to_string(),
            block: BlockType::Gravel,
            min_height: 5,
            max_height: 10,
            noise_offset: 0.0,
            scale: 1.0,
            threshold: 0.5,
        };
        assert!(!lode.contains_height(5));
        assert!(lode.contains_height(6));
        assert!(lode.contains_height(9));
        assert!(!lode.contains_height(10));
    }

    #[test]
    fn test_default_biome_lodes() {
        let biome = BiomeAttributes::default();
        assert_eq!(biome.lodes.len(), 5);
        assert!(biome.lodes.iter().all(|l| l.min_height < l.max_height));
    }
}
