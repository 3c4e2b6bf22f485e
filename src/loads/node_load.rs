//! Node loads - forces and moments applied directly to frame nodes

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;

/// A load applied directly to a frame node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Loaded node id
    pub node: NodeId,
    /// Force in X direction
    #[serde(default)]
    pub fx: f64,
    /// Force in Y direction
    #[serde(default)]
    pub fy: f64,
    /// Moment about Z axis
    #[serde(default)]
    pub m: f64,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(node: NodeId, fx: f64, fy: f64, m: f64) -> Self {
        Self { node, fx, fy, m }
    }

    /// Create a force-only node load
    pub fn force(node: NodeId, fx: f64, fy: f64) -> Self {
        Self::new(node, fx, fy, 0.0)
    }

    /// Get the load as an array [FX, FY, MZ]
    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.m]
    }
}
