// src/bsp/bsp_error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Rejected generator configuration. Raised before any generation starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Region must be at least 1x1, got {width}x{height}")]
    InvalidRegion { width: i32, height: i32 },

    #[error("min_split_size must be >= 1, got {0}")]
    InvalidMinSplitSize(i32),

    #[error("min_area must be >= 1, got {0}")]
    InvalidMinArea(i64),

    #[error("min_room_size must be >= 1, got {0}")]
    InvalidMinRoomSize(i32),

    #[error("Room margin {margin} must be between 0 and half of min_split_size ({min_split_size})")]
    MarginTooLarge { margin: i32, min_split_size: i32 },

    #[error("Could not read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
