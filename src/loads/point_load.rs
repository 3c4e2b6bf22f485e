//! Point loads on a beam

use serde::{Deserialize, Serialize};

/// A concentrated transverse force at a position along the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Distance from the left end of the beam
    pub pos: f64,
    /// Load magnitude (positive upward)
    pub magnitude: f64,
}

impl PointLoad {
    /// Create a new point load
    pub fn new(pos: f64, magnitude: f64) -> Self {
        Self { pos, magnitude }
    }

    /// Create a downward point load
    pub fn downward(pos: f64, magnitude: f64) -> Self {
        Self::new(pos, -magnitude.abs())
    }
}
