//! Uniform distributed loads on a beam

use serde::{Deserialize, Serialize};

/// A uniform line load over [start, end]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Start position (distance from the left end)
    pub start: f64,
    /// End position (distance from the left end)
    pub end: f64,
    /// Intensity, force per unit length (positive upward)
    pub magnitude: f64,
}

impl DistributedLoad {
    /// Create a new distributed load
    pub fn new(start: f64, end: f64, magnitude: f64) -> Self {
        Self {
            start,
            end,
            magnitude,
        }
    }

    /// Create a uniform downward load
    pub fn uniform_downward(start: f64, end: f64, w: f64) -> Self {
        Self::new(start, end, -w.abs())
    }

    /// Loaded length
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Get the total force from this load
    pub fn total_force(&self) -> f64 {
        self.magnitude * self.length()
    }

    /// Whether the load acts on the point `x` (closed interval)
    pub fn covers(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }

    /// Resultant and centroid of the part of this load left of a cut at `x`
    ///
    /// Returns `None` when no part of the load lies left of the cut.
    pub fn resultant_left_of(&self, x: f64) -> Option<(f64, f64)> {
        if self.start >= x {
            return None;
        }
        let length = x.min(self.end) - self.start;
        if length <= 0.0 {
            return None;
        }
        Some((self.magnitude * length, self.start + length / 2.0))
    }
}
