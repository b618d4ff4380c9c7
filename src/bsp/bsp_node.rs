//! src/bsp/bsp_node.rs

use crate::bsp::{Rect, Room};

/// Index of a node inside a [`PartitionTree`](crate::bsp::PartitionTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a node is. A leaf may carry a room; an internal node always owns
/// exactly two children and never a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf {
        room: Option<Room>,
    },
    Internal {
        left: NodeId,
        right: NodeId,
    },
}

/// A node in the BSP tree: a rectangle of the dungeon region plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BspNode {
    pub rect: Rect,
    pub kind: NodeKind,
}

impl BspNode {
    /// Create a roomless leaf covering `rect`.
    pub fn create_leaf(rect: Rect) -> Self {
        BspNode {
            rect,
            kind: NodeKind::Leaf { room: None },
        }
    }

    /// Returns `true` if `self` has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn room(&self) -> Option<Room> {
        match self.kind {
            NodeKind::Leaf { room } => room,
            NodeKind::Internal { .. } => None,
        }
    }

    /// `(left, right)` for an internal node.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub fn area(&self) -> i64 {
        self.rect.area()
    }
}
