//! Result types for beam and frame analysis

use serde::{Deserialize, Serialize};

use crate::elements::{NodeId, SupportKind};
use crate::math::Vec6;

/// Reaction at a beam support
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportReaction {
    /// Support position along the beam
    pub pos: f64,
    /// Support category
    #[serde(rename = "type")]
    pub kind: SupportKind,
    /// Transverse reaction force
    #[serde(rename = "Fy")]
    pub fy: f64,
    /// Reaction moment (zero unless the support is fixed)
    #[serde(rename = "Mz")]
    pub mz: f64,
}

/// Peak values of the beam diagrams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamSummary {
    /// Maximum absolute deflection
    pub max_deflection: f64,
    /// Position of the maximum deflection
    pub max_deflection_x: f64,
    /// Maximum absolute shear
    pub max_shear: f64,
    /// Position of the maximum shear
    pub max_shear_x: f64,
    /// Maximum absolute moment
    pub max_moment: f64,
    /// Position of the maximum moment
    pub max_moment_x: f64,
    /// Number of discretized nodes
    pub num_nodes: usize,
    /// Number of generated elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
}

/// Sampled diagrams and reactions of a beam analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamResults {
    /// Sample positions
    pub x: Vec<f64>,
    /// Transverse deflection at each sample
    pub deflection: Vec<f64>,
    /// Shear force at each sample
    pub shear: Vec<f64>,
    /// Bending moment at each sample
    pub moment: Vec<f64>,
    /// One reaction per support, in input order
    pub reactions: Vec<SupportReaction>,
    /// Peak values
    pub summary: BeamSummary,
}

/// Index and absolute value of the largest-magnitude entry
pub(crate) fn peak(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i, v.abs()))
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

/// Displacement results at a frame node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Node id
    pub id: NodeId,
    /// Undeformed X coordinate
    pub x: f64,
    /// Undeformed Y coordinate
    pub y: f64,
    /// Displacement in X direction
    pub u: f64,
    /// Displacement in Y direction
    pub v: f64,
    /// Rotation about Z axis
    pub theta: f64,
}

impl NodeDisplacement {
    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.u.powi(2) + self.v.powi(2)).sqrt()
    }
}

/// Reaction forces at a supported frame node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Supported node id
    pub node: NodeId,
    /// Reaction force in X direction
    #[serde(rename = "Rx")]
    pub rx: f64,
    /// Reaction force in Y direction
    #[serde(rename = "Ry")]
    pub ry: f64,
    /// Reaction moment about Z axis
    #[serde(rename = "Mz")]
    pub mz: f64,
}

impl Reactions {
    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2)).sqrt()
    }
}

/// End actions of a frame member in its local axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    /// Element id
    pub id: i64,
    /// Start node id
    pub n1: NodeId,
    /// End node id
    pub n2: NodeId,
    /// Member length
    pub length: f64,
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Local transverse force at the start node
    pub shear_i: f64,
    /// Moment at the start node
    pub moment_i: f64,
    /// Local transverse force at the end node
    pub shear_j: f64,
    /// Moment at the end node
    pub moment_j: f64,
}

impl MemberForces {
    /// Create from the local end-force vector [N1, V1, M1, N2, V2, M2]
    pub fn from_local_forces(id: i64, n1: NodeId, n2: NodeId, length: f64, f: &Vec6) -> Self {
        Self {
            id,
            n1,
            n2,
            length,
            axial: -f[0],
            shear_i: f[1],
            moment_i: f[2],
            shear_j: f[4],
            moment_j: f[5],
        }
    }
}

/// Summary of frame results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Node with maximum translation
    pub max_disp_node: Option<NodeId>,
    /// Maximum reaction force magnitude
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: Option<NodeId>,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Number of elements that contributed stiffness
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
}

/// Displacements, member forces and reactions of a frame analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResults {
    /// Nodal displacements in ascending id order
    pub nodes: Vec<NodeDisplacement>,
    /// End actions of every non-degenerate member
    pub elements: Vec<MemberForces>,
    /// Reactions of supported nodes in ascending id order
    pub reactions: Vec<Reactions>,
    /// Peak values
    pub summary: FrameSummary,
    /// Global equilibrium residual [ΣFx, ΣFy, ΣMz about the origin]
    #[serde(skip)]
    pub statics_residual: [f64; 3],
}

impl FrameResults {
    /// Displacement of node `id`
    pub fn node(&self, id: NodeId) -> Option<&NodeDisplacement> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Reactions at node `id`
    pub fn reaction(&self, id: NodeId) -> Option<&Reactions> {
        self.reactions.iter().find(|r| r.node == id)
    }

    /// End actions of element `id`
    pub fn element(&self, id: i64) -> Option<&MemberForces> {
        self.elements.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_picks_largest_magnitude() {
        assert_eq!(peak(&[1.0, -4.0, 3.0]), Some((1, 4.0)));
        assert_eq!(peak(&[]), None);
    }

    #[test]
    fn test_reaction_field_names() {
        let rxn = SupportReaction {
            pos: 0.0,
            kind: SupportKind::Fixed,
            fy: 10.0,
            mz: -2.0,
        };
        let json = serde_json::to_value(rxn).unwrap();
        assert_eq!(json["type"], "fixed");
        assert_eq!(json["Fy"], 10.0);
        assert_eq!(json["Mz"], -2.0);

        let frame = Reactions {
            node: 4,
            rx: 1.0,
            ry: 2.0,
            mz: 0.0,
        };
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json["Rx"], 1.0);
        assert_eq!(json["node"], 4);
    }
}
