// src/bsp/bsp_config.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bsp::{ConfigError, LeafSelection};

/// Every knob of a dungeon generation run.
///
/// Missing fields in a JSON config fall back to [`GeneratorConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    /// Number of split attempts per generation.
    pub max_iterations: usize,
    /// Smallest extent a child may have along the split axis.
    pub min_split_size: i32,
    /// Leaves smaller than this are never split again.
    pub min_area: i64,
    pub min_room_size: i32,
    /// Gap kept between a leaf's edges and its room.
    pub margin: i32,
    pub selection: LeafSelection,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            width: 128,
            height: 128,
            max_iterations: 8,
            min_split_size: 16,
            min_area: 32,
            min_room_size: 8,
            margin: 2,
            selection: LeafSelection::LargestFirst,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would make generation meaningless. Configurations
    /// that merely never split (e.g. `min_area` larger than the region) pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 || self.height < 1 {
            return Err(ConfigError::InvalidRegion {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_split_size < 1 {
            return Err(ConfigError::InvalidMinSplitSize(self.min_split_size));
        }
        if self.min_area < 1 {
            return Err(ConfigError::InvalidMinArea(self.min_area));
        }
        if self.min_room_size < 1 {
            return Err(ConfigError::InvalidMinRoomSize(self.min_room_size));
        }
        if self.margin < 0 || self.margin > self.min_split_size / 2 {
            return Err(ConfigError::MarginTooLarge {
                margin: self.margin,
                min_split_size: self.min_split_size,
            });
        }
        Ok(())
    }
}
