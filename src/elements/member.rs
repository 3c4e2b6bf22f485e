//! Member element - plane frame element (beam/column)

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::error::{FEAError, FEAResult};

/// A plane frame member connecting two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameElement {
    /// Element identifier
    pub id: i64,
    /// Start node id
    pub n1: NodeId,
    /// End node id
    pub n2: NodeId,
    /// Modulus of elasticity
    #[serde(rename = "E")]
    pub e: f64,
    /// Cross-sectional area
    #[serde(rename = "A")]
    pub a: f64,
    /// Moment of inertia
    #[serde(rename = "I")]
    pub i: f64,
}

impl FrameElement {
    /// Create a new member
    pub fn new(id: i64, n1: NodeId, n2: NodeId, e: f64, a: f64, i: f64) -> Self {
        Self { id, n1, n2, e, a, i }
    }

    /// Reject non-physical section or material properties
    pub fn validate(&self) -> FEAResult<()> {
        let props = [("E", self.e), ("A", self.a), ("I", self.i)];
        for (name, value) in props {
            if !(value.is_finite() && value > 0.0) {
                return Err(FEAError::InvalidInput(format!(
                    "element {} must have positive {} (received {})",
                    self.id, name, value
                )));
            }
        }
        Ok(())
    }
}
