use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::constants::*;
use crate::core::biome::BiomeAttributes;
use crate::core::coord::WorldDimensions;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorldSettings {
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default = "default_view_distance")]
    pub view_distance: i32,
    #[serde(default)]
    pub world: WorldDimensions,
    #[serde(default)]
    pub streaming: StreamingSettings,
    #[serde(default)]
    pub biome: BiomeAttributes,
}

fn default_seed() -> u32 {
    DEFAULT_SEED
}

fn default_view_distance() -> i32 {
    VIEW_DISTANCE_IN_CHUNKS
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            view_distance: default_view_distance(),
            world: WorldDimensions::default(),
            streaming: StreamingSettings::default(),
            biome: BiomeAttributes::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StreamingSettings {
    /// Extra ring of chunks generated in the background; 0 disables workers
    pub prefetch_distance: i32,
    pub worker_count: usize,
    pub max_results_per_tick: usize,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            prefetch_distance: 0,
            worker_count: num_cpus::get().saturating_sub(1).max(1),
            max_results_per_tick: MAX_CHUNKS_PER_TICK,
        }
    }
}

impl WorldSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: WorldSettings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.world.world_size_in_chunks < 3 {
            return Err(SettingsError::Invalid(format!(
                "world_size_in_chunks must be at least 3, got {}",
                self.world.world_size_in_chunks
            )));
        }
        if self.world.chunk_width < 1 || self.world.chunk_height < 1 {
            return Err(SettingsError::Invalid(format!(
                "chunk dimensions must be positive, got {}x{}",
                self.world.chunk_width, self.world.chunk_height
            )));
        }
        if self.view_distance < 1 {
            return Err(SettingsError::Invalid(format!(
                "view_distance must be at least 1, got {}",
                self.view_distance
            )));
        }
        if self.streaming.prefetch_distance < 0 {
            return Err(SettingsError::Invalid(format!(
                "prefetch_distance cannot be negative, got {}",
                self.streaming.prefetch_distance
            )));
        }
        if let Some(lode) = self
            .biome
            .lodes
            .iter()
            .find(|lode| lode.min_height >= lode.max_height)
        {
            return Err(SettingsError::Invalid(format!(
                "lode '{}' has an empty height band {}..{}",
                lode.name, lode.min_height, lode.max_height
            )));
        }
        Ok(())
    }
}
