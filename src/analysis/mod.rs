//! Analysis options and the shared assemble/solve pipeline

mod system;

use serde::{Deserialize, Serialize};

pub use system::{GlobalSystem, LinearSolution};

/// Options for a beam or frame analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Number of evenly spaced diagram samples along a beam (including both ends)
    pub num_samples: usize,
    /// Reaction components with a smaller magnitude are reported as exactly zero
    pub reaction_tolerance: f64,
    /// Beam positions closer than this fraction of the span share one node
    pub position_tolerance: f64,
    /// Check global equilibrium of a frame after solving
    pub check_statics: bool,
    /// Relative residual above which the statics check warns
    pub statics_tolerance: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            num_samples: 500,
            reaction_tolerance: 1e-8,
            position_tolerance: 1e-9,
            check_statics: false,
            statics_tolerance: 1e-6,
        }
    }
}

impl AnalysisOptions {
    /// Create options for a standard linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Set the number of diagram samples
    ///
    /// Any value of 2 or more is accepted; fewer than the default 500 gives
    /// visibly coarse diagrams. The HTTP service never goes below 500
    /// (see [`crate::api::service_options`]).
    pub fn with_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Set the reaction clipping threshold
    pub fn with_reaction_tolerance(mut self, tol: f64) -> Self {
        self.reaction_tolerance = tol;
        self
    }

    /// Set the relative tolerance used to merge beam positions
    pub fn with_position_tolerance(mut self, tol: f64) -> Self {
        self.position_tolerance = tol;
        self
    }

    /// Enable the post-solve equilibrium check
    pub fn with_statics_check(mut self) -> Self {
        self.check_statics = true;
        self
    }

    /// Set the relative residual the statics check tolerates
    pub fn with_statics_tolerance(mut self, tol: f64) -> Self {
        self.statics_tolerance = tol;
        self
    }
}
