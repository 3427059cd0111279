use serde::{Deserialize, Serialize};

/// Material identifier produced by the terrain classifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Air,
    Stone,
    Grass,
    Bedrock,
    Sand,
    Dirt,
    Gravel,
    CoalOre,
    IronOre,
    GoldOre,
    DiamondOre,
}

impl BlockType {
    pub const ALL: [BlockType; 11] = [
        BlockType::Air,
        BlockType::Stone,
        BlockType::Grass,
        BlockType::Bedrock,
        BlockType::Sand,
        BlockType::Dirt,
        BlockType::Gravel,
        BlockType::CoalOre,
        BlockType::IronOre,
        BlockType::GoldOre,
        BlockType::DiamondOre,
    ];

    pub fn id(&self) -> u8 {
        match self {
            BlockType::Air => 0,
            BlockType::Stone => 1,
            BlockType::Grass => 2,
            BlockType::Bedrock => 3,
            BlockType::Sand => 4,
            BlockType::Dirt => 5,
            BlockType::Gravel => 6,
            BlockType::CoalOre => 7,
            BlockType::IronOre => 8,
            BlockType::GoldOre => 9,
            BlockType::DiamondOre => 10,
        }
    }

    pub fn from_id(id: u8) -> Option<BlockType> {
        Self::ALL.iter().copied().find(|block| block.id() == id)
    }

    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockType::Air)
    }
}
