//! Stiffness Solver - direct stiffness analysis of beams and plane frames
//!
//! This library provides small, exact structural solvers built on the direct
//! stiffness method:
//! - 1D Euler-Bernoulli beams with point and uniform distributed loads,
//!   sampled into deflection, shear and moment diagrams
//! - 2D frames of axial + bending members with nodal loads
//! - Euler column buckling
//!
//! ## Example
//! ```rust
//! use stiffness_solver::prelude::*;
//!
//! // Portal frame: fixed bases, lateral load at the left knee
//! let model = FrameModel::builder()
//!     .node(1, FrameNode::new(0.0, 0.0))
//!     .node(2, FrameNode::new(0.0, 3.0))
//!     .node(3, FrameNode::new(4.0, 3.0))
//!     .node(4, FrameNode::new(4.0, 0.0))
//!     .element(FrameElement::new(1, 1, 2, 200e9, 0.01, 1e-4))
//!     .element(FrameElement::new(2, 2, 3, 200e9, 0.01, 1e-4))
//!     .element(FrameElement::new(3, 3, 4, 200e9, 0.01, 1e-4))
//!     .support(1, SupportKind::Fixed)
//!     .support(4, SupportKind::Fixed)
//!     .load(NodeLoad::force(2, 10_000.0, 0.0))
//!     .build()
//!     .unwrap();
//!
//! let results = model.analyze(&AnalysisOptions::linear()).unwrap();
//! let sway = results.node(2).unwrap().u;
//! assert!(sway > 0.0);
//! ```

pub mod analysis;
pub mod api;
pub mod beam;
pub mod column;
pub mod elements;
pub mod error;
pub mod frame;
pub mod loads;
pub mod math;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::beam::{BeamModel, BeamSupport};
    pub use crate::column::{BucklingResults, ColumnModel, EndCondition};
    pub use crate::elements::{FrameElement, FrameNode, NodeId, SupportKind};
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::frame::FrameModel;
    pub use crate::loads::{DistributedLoad, NodeLoad, PointLoad};
    pub use crate::results::{
        BeamResults, FrameResults, MemberForces, NodeDisplacement, Reactions, SupportReaction,
    };
}

#[cfg(feature = "wasm")]
pub mod wasm;
