//! Node element - a user-specified point in the frame plane

use serde::{Deserialize, Serialize};

/// User-facing frame node identifier
pub type NodeId = i64;

/// A 2D node in the frame model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl FrameNode {
    /// Create a new node at the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}
