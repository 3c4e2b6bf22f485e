//! Beam post-processing: method-of-sections statics and Hermite deflection
//!
//! Shear and moment are summed from the actions left of each cut rather than
//! differentiated from the element shape functions, so a uniform load gives
//! an exact parabolic moment diagram.

use super::mesh::BeamMesh;
use crate::error::{FEAError, FEAResult};
use crate::loads::{DistributedLoad, PointLoad};
use crate::math::{self, Vec as FEVec};
use crate::results::SupportReaction;

/// Actions at a position up to this far right of a cut count as left of it
pub const SECTION_TOLERANCE: f64 = 1e-9;

/// Internal forces at a cut from the external actions on the left of it
#[derive(Debug, Clone, Copy)]
pub struct SectionStatics<'a> {
    reactions: &'a [SupportReaction],
    point_loads: &'a [PointLoad],
    dist_loads: &'a [DistributedLoad],
}

impl<'a> SectionStatics<'a> {
    pub fn new(
        reactions: &'a [SupportReaction],
        point_loads: &'a [PointLoad],
        dist_loads: &'a [DistributedLoad],
    ) -> Self {
        Self {
            reactions,
            point_loads,
            dist_loads,
        }
    }

    /// Sum of transverse forces left of the cut at `x`
    pub fn shear(&self, x: f64) -> f64 {
        let reactions: f64 = self
            .reactions
            .iter()
            .filter(|r| r.pos <= x + SECTION_TOLERANCE)
            .map(|r| r.fy)
            .sum();

        let point_loads: f64 = self
            .point_loads
            .iter()
            .filter(|p| p.pos <= x + SECTION_TOLERANCE)
            .map(|p| p.magnitude)
            .sum();

        let dist_loads: f64 = self
            .dist_loads
            .iter()
            .filter_map(|d| d.resultant_left_of(x))
            .map(|(force, _)| force)
            .sum();

        reactions + point_loads + dist_loads
    }

    /// Bending moment at the cut at `x` (sagging positive)
    pub fn moment(&self, x: f64) -> f64 {
        let reactions: f64 = self
            .reactions
            .iter()
            .filter(|r| r.pos <= x + SECTION_TOLERANCE)
            .map(|r| r.fy * (x - r.pos) - r.mz)
            .sum();

        let point_loads: f64 = self
            .point_loads
            .iter()
            .filter(|p| p.pos <= x + SECTION_TOLERANCE)
            .map(|p| p.magnitude * (x - p.pos))
            .sum();

        let dist_loads: f64 = self
            .dist_loads
            .iter()
            .filter_map(|d| d.resultant_left_of(x))
            .map(|(force, centroid)| force * (x - centroid))
            .sum();

        reactions + point_loads + dist_loads
    }
}

/// `n` evenly spaced positions from 0 to `length` inclusive
pub fn sample_positions(length: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| length * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Deflection at `x` from the nodal solution of the owning element
pub fn deflection_at(mesh: &BeamMesh, displacements: &FEVec, x: f64) -> FEAResult<f64> {
    let element = mesh.element_containing(x).ok_or_else(|| {
        FEAError::AnalysisFailed(format!("no beam element contains sample position {}", x))
    })?;

    let n = math::hermite_shape_functions(x - element.x1, element.length());
    let dofs = element.dofs();

    Ok(n.iter()
        .zip(dofs.iter())
        .map(|(ni, &dof)| ni * displacements[dof])
        .sum())
}
