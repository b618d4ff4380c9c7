// src/bsp/mod.rs
pub mod bsp_config;
pub mod bsp_error;
pub mod bsp_node;
pub mod bsp_procedural;
pub mod bsp_text;
pub mod bsp_tree;
mod bsp_util;
#[cfg(feature = "gui")]
pub mod debug_viz;

pub use bsp_config::GeneratorConfig;
pub use bsp_error::ConfigError;
pub use bsp_node::{BspNode, NodeId, NodeKind};
pub use bsp_procedural::{Dungeon, GenerationStats, ProceduralGenerator};
pub use bsp_text::render_text;
pub use bsp_tree::{LeafSelection, PartitionTree, SplitRejection, SplitReport};
pub use bsp_util::{Corridor, Point, Rect, Room, Segment, SplitAxis}; // Re-export geometry types
