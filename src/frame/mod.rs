//! Frame engine - 2D frame of axial + bending members with nodal loads
//!
//! Nodes are keyed by user id and numbered in ascending id order; node `k` in
//! that order owns global DOFs `3k..3k+3` as (u, v, θ).

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, GlobalSystem};
use crate::elements::{restrained_dofs, FrameElement, FrameNode, NodeId, SupportKind};
use crate::error::{FEAError, FEAResult};
use crate::loads::NodeLoad;
use crate::math::{self, Mat, Mat6, Vec as FEVec, Vec6};
use crate::results::{FrameResults, FrameSummary, MemberForces, NodeDisplacement, Reactions};

/// DOFs per frame node: u, v, θ
pub const DOFS_PER_NODE: usize = 3;

/// A validated frame model, ready for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameModel {
    nodes: BTreeMap<NodeId, FrameNode>,
    elements: Vec<FrameElement>,
    supports: BTreeMap<NodeId, SupportKind>,
    loads: Vec<NodeLoad>,
}

/// Collects nodes, members, supports and loads for a [`FrameModel`]
#[derive(Debug, Clone, Default)]
pub struct FrameModelBuilder {
    nodes: Vec<(NodeId, FrameNode)>,
    elements: Vec<FrameElement>,
    supports: Vec<(NodeId, SupportKind)>,
    loads: Vec<NodeLoad>,
}

/// Geometry of a member that contributes stiffness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberGeometry {
    /// Index into [`FrameModel::elements`]
    pub element: usize,
    /// Global DOFs [u1, v1, θ1, u2, v2, θ2]
    pub dofs: [usize; 6],
    /// Member length
    pub length: f64,
    /// Direction cosine with the X axis
    pub c: f64,
    /// Direction cosine with the Y axis
    pub s: f64,
}

/// A frame assembled, before boundary conditions are applied
#[derive(Debug, Clone)]
pub struct FrameAssembly {
    /// Global K and F
    pub system: GlobalSystem,
    /// Members that contributed stiffness, in input order
    pub members: Vec<MemberGeometry>,
    /// Restrained DOFs
    pub fixed_dofs: BTreeSet<usize>,
}

impl FrameModelBuilder {
    /// Add a node
    pub fn node(mut self, id: NodeId, node: FrameNode) -> Self {
        self.nodes.push((id, node));
        self
    }

    /// Add a member
    pub fn element(mut self, element: FrameElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Add a support at node `node`
    pub fn support(mut self, node: NodeId, kind: SupportKind) -> Self {
        self.supports.push((node, kind));
        self
    }

    /// Add a nodal load; loads on the same node accumulate
    pub fn load(mut self, load: NodeLoad) -> Self {
        self.loads.push(load);
        self
    }

    /// Validate references and properties and freeze the model
    pub fn build(self) -> FEAResult<FrameModel> {
        if self.nodes.is_empty() {
            return Err(FEAError::InvalidInput("frame has no nodes".to_string()));
        }

        let mut nodes = BTreeMap::new();
        for (id, node) in self.nodes {
            if !(node.x.is_finite() && node.y.is_finite()) {
                return Err(FEAError::InvalidInput(format!(
                    "node {} has non-finite coordinates",
                    id
                )));
            }
            if nodes.insert(id, node).is_some() {
                return Err(FEAError::DuplicateId(format!("node {}", id)));
            }
        }

        let mut element_ids = BTreeSet::new();
        for element in &self.elements {
            if !element_ids.insert(element.id) {
                return Err(FEAError::DuplicateId(format!("element {}", element.id)));
            }
            for node in [element.n1, element.n2] {
                if !nodes.contains_key(&node) {
                    return Err(FEAError::NodeNotFound(node));
                }
            }
            element.validate()?;
        }

        let mut supports = BTreeMap::new();
        for (node, kind) in self.supports {
            if !nodes.contains_key(&node) {
                return Err(FEAError::NodeNotFound(node));
            }
            if supports.insert(node, kind).is_some() {
                return Err(FEAError::DuplicateId(format!("support at node {}", node)));
            }
        }

        for load in &self.loads {
            if !nodes.contains_key(&load.node) {
                return Err(FEAError::NodeNotFound(load.node));
            }
            if load.as_array().iter().any(|v| !v.is_finite()) {
                return Err(FEAError::InvalidInput(format!(
                    "load at node {} has a non-finite component",
                    load.node
                )));
            }
        }

        Ok(FrameModel {
            nodes,
            elements: self.elements,
            supports,
            loads: self.loads,
        })
    }
}

impl FrameModel {
    /// Start an empty frame
    pub fn builder() -> FrameModelBuilder {
        FrameModelBuilder::default()
    }

    /// Nodes by id
    pub fn nodes(&self) -> &BTreeMap<NodeId, FrameNode> {
        &self.nodes
    }

    /// Members in input order
    pub fn elements(&self) -> &[FrameElement] {
        &self.elements
    }

    /// Supports by node id
    pub fn supports(&self) -> &BTreeMap<NodeId, SupportKind> {
        &self.supports
    }

    /// Nodal loads in input order
    pub fn loads(&self) -> &[NodeLoad] {
        &self.loads
    }

    /// Total DOFs
    pub fn num_dofs(&self) -> usize {
        self.nodes.len() * DOFS_PER_NODE
    }

    /// Sequential index of node `id` in ascending id order
    pub fn node_index(&self, id: NodeId) -> FEAResult<usize> {
        if !self.nodes.contains_key(&id) {
            return Err(FEAError::NodeNotFound(id));
        }
        Ok(self.nodes.range(..id).count())
    }

    fn index_map(&self) -> BTreeMap<NodeId, usize> {
        self.nodes.keys().enumerate().map(|(k, &id)| (id, k)).collect()
    }

    fn node_dofs(index: usize) -> [usize; 3] {
        let base = index * DOFS_PER_NODE;
        [base, base + 1, base + 2]
    }

    fn coords_of(&self, id: NodeId) -> FEAResult<[f64; 2]> {
        self.nodes
            .get(&id)
            .map(FrameNode::coords)
            .ok_or(FEAError::NodeNotFound(id))
    }

    /// Assemble the global system
    ///
    /// Zero-length members are skipped with a warning. A node left without
    /// any stiffness connection is an error.
    pub fn assemble(&self) -> FEAResult<FrameAssembly> {
        let index = self.index_map();
        let lookup = |id: NodeId| index.get(&id).copied().ok_or(FEAError::NodeNotFound(id));

        let mut system = GlobalSystem::new(self.num_dofs());
        let mut members = Vec::with_capacity(self.elements.len());
        let mut connected = BTreeSet::new();

        for (k, element) in self.elements.iter().enumerate() {
            let (i_idx, j_idx) = (lookup(element.n1)?, lookup(element.n2)?);
            let Some((length, c, s)) =
                math::direction_cosines(&self.coords_of(element.n1)?, &self.coords_of(element.n2)?)
            else {
                warn!(
                    "Skipping element {}: zero length between nodes {} and {}",
                    element.id, element.n1, element.n2
                );
                continue;
            };

            let [u1, v1, r1] = Self::node_dofs(i_idx);
            let [u2, v2, r2] = Self::node_dofs(j_idx);
            let dofs = [u1, v1, r1, u2, v2, r2];

            let k_local = math::frame_local_stiffness(element.e, element.a, element.i, length);
            let t = math::frame_transformation_matrix(c, s);
            let k_global: Mat6 = t.transpose() * k_local * t;
            system.add_stiffness(&dofs, &k_global);

            connected.insert(element.n1);
            connected.insert(element.n2);
            members.push(MemberGeometry {
                element: k,
                dofs,
                length,
                c,
                s,
            });
        }

        if let Some(id) = self.nodes.keys().find(|id| !connected.contains(id)) {
            return Err(FEAError::InvalidGeometry(format!(
                "node {} is not connected to any member",
                id
            )));
        }

        for load in &self.loads {
            let dofs = Self::node_dofs(lookup(load.node)?);
            for (dof, value) in dofs.into_iter().zip(load.as_array()) {
                system.add_force(dof, value);
            }
        }

        let mut fixed_dofs = BTreeSet::new();
        for (&node, kind) in &self.supports {
            let dofs = Self::node_dofs(lookup(node)?);
            for local in restrained_dofs(&kind.frame_restraints()) {
                fixed_dofs.insert(dofs[local]);
            }
        }

        debug!(
            "Frame assembled: {} nodes, {} of {} elements, {} DOFs ({} fixed)",
            self.nodes.len(),
            members.len(),
            self.elements.len(),
            self.num_dofs(),
            fixed_dofs.len()
        );

        Ok(FrameAssembly {
            system,
            members,
            fixed_dofs,
        })
    }

    /// Check that every connected part of the frame is held against
    /// rigid-body motion
    ///
    /// Members join rigidly, so a connected group of nodes moves as one body
    /// unless its supports restrain both translations and the rotation.
    fn check_restraints(&self, assembly: &FrameAssembly) -> FEAResult<()> {
        fn root(parent: &mut [usize], mut a: usize) -> usize {
            while parent[a] != a {
                parent[a] = parent[parent[a]];
                a = parent[a];
            }
            a
        }

        let coords: Vec<[f64; 2]> = self.nodes.values().map(FrameNode::coords).collect();
        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();

        let mut parent: Vec<usize> = (0..coords.len()).collect();
        for member in &assembly.members {
            let a = root(&mut parent, member.dofs[0] / DOFS_PER_NODE);
            let b = root(&mut parent, member.dofs[3] / DOFS_PER_NODE);
            parent[a] = b;
        }
        let mut parts: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for k in 0..coords.len() {
            let r = root(&mut parent, k);
            parts.entry(r).or_default().push(k);
        }

        for part in parts.values() {
            let count = part.len() as f64;
            let (sx, sy) = part
                .iter()
                .fold((0.0, 0.0), |(sx, sy), &k| (sx + coords[k][0], sy + coords[k][1]));
            let (cx, cy) = (sx / count, sy / count);
            let radius = part
                .iter()
                .map(|&k| (coords[k][0] - cx).hypot(coords[k][1] - cy))
                .fold(0.0_f64, f64::max);
            let scale = if radius > 0.0 { radius } else { 1.0 };

            // Modes: translation in X, translation in Y, rotation about the centroid
            let mut rows = Vec::new();
            for &k in part {
                let (xi, eta) = ((coords[k][0] - cx) / scale, (coords[k][1] - cy) / scale);
                let [u, v, theta] = Self::node_dofs(k);
                if assembly.fixed_dofs.contains(&u) {
                    rows.push([1.0, 0.0, -eta]);
                }
                if assembly.fixed_dofs.contains(&v) {
                    rows.push([0.0, 1.0, xi]);
                }
                if assembly.fixed_dofs.contains(&theta) {
                    rows.push([0.0, 0.0, 1.0]);
                }
            }

            let modes = Mat::from_fn(rows.len(), 3, |r, c| rows[r][c]);
            if !math::restrains_rigid_modes(&modes) {
                return Err(FEAError::Unstable(format!(
                    "supports do not prevent rigid-body motion of the part containing node {}",
                    ids[part[0]]
                )));
            }
        }
        Ok(())
    }

    /// Run the linear analysis
    pub fn analyze(&self, options: &AnalysisOptions) -> FEAResult<FrameResults> {
        let assembly = self.assemble()?;
        self.check_restraints(&assembly)?;
        let solution = assembly.system.solve(&assembly.fixed_dofs)?;
        let d = &solution.displacements;

        let nodes: Vec<NodeDisplacement> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(k, (&id, node))| {
                let [u, v, theta] = Self::node_dofs(k);
                NodeDisplacement {
                    id,
                    x: node.x,
                    y: node.y,
                    u: d[u],
                    v: d[v],
                    theta: d[theta],
                }
            })
            .collect();

        let elements: Vec<MemberForces> = assembly
            .members
            .iter()
            .map(|geom| self.member_forces(geom, d))
            .collect();

        let index = self.index_map();
        let tol = options.reaction_tolerance;
        let reactions = self
            .supports
            .iter()
            .map(|(&node, kind)| -> FEAResult<Reactions> {
                let k = index.get(&node).copied().ok_or(FEAError::NodeNotFound(node))?;
                let dofs = Self::node_dofs(k);
                let restraints = kind.frame_restraints();
                let component = |local: usize| {
                    if restraints[local] {
                        math::clip_small(solution.reactions[dofs[local]], tol)
                    } else {
                        0.0
                    }
                };
                Ok(Reactions {
                    node,
                    rx: component(0),
                    ry: component(1),
                    mz: component(2),
                })
            })
            .collect::<FEAResult<Vec<Reactions>>>()?;

        let mut summary = FrameSummary {
            num_nodes: self.nodes.len(),
            num_elements: assembly.members.len(),
            total_dofs: self.num_dofs(),
            free_dofs: solution.free_dofs.len(),
            ..Default::default()
        };
        for n in &nodes {
            let mag = n.translation_magnitude();
            if summary.max_disp_node.is_none() || mag > summary.max_displacement {
                summary.max_displacement = mag;
                summary.max_disp_node = Some(n.id);
            }
        }
        for r in &reactions {
            let mag = r.force_magnitude();
            if summary.max_reaction_node.is_none() || mag > summary.max_reaction {
                summary.max_reaction = mag;
                summary.max_reaction_node = Some(r.node);
            }
        }

        let statics_residual = self.statics_residual(&reactions)?;
        if options.check_statics {
            self.check_statics(&statics_residual, options.statics_tolerance)?;
        }

        debug!(
            "Frame solved: max displacement {:.6e} at node {:?}",
            summary.max_displacement, summary.max_disp_node
        );

        Ok(FrameResults {
            nodes,
            elements,
            reactions,
            summary,
            statics_residual,
        })
    }

    /// Local end actions k_local·T·d_e of one member
    fn member_forces(&self, geom: &MemberGeometry, d: &FEVec) -> MemberForces {
        let element = &self.elements[geom.element];
        let d_global = Vec6::from_fn(|r, _| d[geom.dofs[r]]);
        let t = math::frame_transformation_matrix(geom.c, geom.s);
        let k_local = math::frame_local_stiffness(element.e, element.a, element.i, geom.length);
        let f_local = k_local * (t * d_global);

        MemberForces::from_local_forces(element.id, element.n1, element.n2, geom.length, &f_local)
    }

    /// Applied loads plus reactions: [ΣFx, ΣFy, ΣMz about the origin]
    fn statics_residual(&self, reactions: &[Reactions]) -> FEAResult<[f64; 3]> {
        let mut sum = [0.0; 3];
        let mut add = |[x, y]: [f64; 2], fx: f64, fy: f64, m: f64| {
            sum[0] += fx;
            sum[1] += fy;
            sum[2] += m + x * fy - y * fx;
        };

        for load in &self.loads {
            add(self.coords_of(load.node)?, load.fx, load.fy, load.m);
        }
        for r in reactions {
            add(self.coords_of(r.node)?, r.rx, r.ry, r.mz);
        }
        Ok(sum)
    }

    /// Warn when the equilibrium residual is large relative to the applied loads
    fn check_statics(&self, residual: &[f64; 3], tolerance: f64) -> FEAResult<()> {
        let mut scale = 0.0_f64;
        for load in &self.loads {
            let [x, y] = self.coords_of(load.node)?;
            scale = scale
                .max(load.fx.abs())
                .max(load.fy.abs())
                .max((load.m + x * load.fy - y * load.fx).abs());
        }
        let scale = scale.max(1.0);

        let relative = residual.iter().fold(0.0_f64, |acc, r| acc.max(r.abs())) / scale;
        if relative > tolerance {
            warn!(
                "Statics check failed: residual [Fx={:.3e}, Fy={:.3e}, Mz={:.3e}] (relative {:.3e})",
                residual[0], residual[1], residual[2], relative
            );
        } else {
            debug!("Statics check passed (relative residual {:.3e})", relative);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn portal() -> FrameModelBuilder {
        FrameModel::builder()
            .node(1, FrameNode::new(0.0, 0.0))
            .node(2, FrameNode::new(0.0, 3.0))
            .node(3, FrameNode::new(4.0, 3.0))
            .node(4, FrameNode::new(4.0, 0.0))
            .element(FrameElement::new(1, 1, 2, 200e9, 0.01, 1e-4))
            .element(FrameElement::new(2, 2, 3, 200e9, 0.01, 1e-4))
            .element(FrameElement::new(3, 3, 4, 200e9, 0.01, 1e-4))
            .support(1, SupportKind::Fixed)
            .support(4, SupportKind::Fixed)
    }

    #[test]
    fn test_portal_frame_equilibrium() {
        let model = portal()
            .load(NodeLoad::force(2, 10_000.0, 0.0))
            .load(NodeLoad::force(3, 0.0, -20_000.0))
            .build()
            .unwrap();
        let results = model.analyze(&AnalysisOptions::default().with_statics_check()).unwrap();

        let rx: f64 = results.reactions.iter().map(|r| r.rx).sum();
        let ry: f64 = results.reactions.iter().map(|r| r.ry).sum();
        assert_relative_eq!(rx, -10_000.0, epsilon = 1e-6);
        assert_relative_eq!(ry, 20_000.0, epsilon = 1e-6);
        for r in results.statics_residual {
            assert!(r.abs() < 1e-6);
        }

        // Sway to the right under the lateral load
        assert!(results.node(2).unwrap().u > 0.0);
        assert_eq!(results.summary.num_elements, 3);
        assert_eq!(results.summary.free_dofs, 6);
    }

    #[test]
    fn test_member_forces_on_axial_bar() {
        // Horizontal bar pinned at 1, roller at 2, pulled along its axis
        let model = FrameModel::builder()
            .node(1, FrameNode::new(0.0, 0.0))
            .node(2, FrameNode::new(2.0, 0.0))
            .element(FrameElement::new(1, 1, 2, 200e9, 0.01, 1e-4))
            .support(1, SupportKind::Pinned)
            .support(2, SupportKind::Roller)
            .load(NodeLoad::force(2, 5_000.0, 0.0))
            .build()
            .unwrap();
        let results = model.analyze(&AnalysisOptions::default()).unwrap();

        let bar = results.element(1).unwrap();
        assert_relative_eq!(bar.axial, 5_000.0, epsilon = 1e-6);
        assert_relative_eq!(bar.length, 2.0);
        assert_relative_eq!(
            results.node(2).unwrap().u,
            5_000.0 * 2.0 / (200e9 * 0.01),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_reference_errors() {
        let missing = FrameModel::builder()
            .node(1, FrameNode::new(0.0, 0.0))
            .element(FrameElement::new(1, 1, 9, 200e9, 0.01, 1e-4))
            .build();
        assert!(matches!(missing, Err(FEAError::NodeNotFound(9))));

        let duplicate = FrameModel::builder()
            .node(1, FrameNode::new(0.0, 0.0))
            .node(1, FrameNode::new(1.0, 0.0))
            .build();
        assert!(matches!(duplicate, Err(FEAError::DuplicateId(_))));

        let double_support = portal().support(1, SupportKind::Pinned).build();
        assert!(matches!(double_support, Err(FEAError::DuplicateId(_))));
    }

    #[test]
    fn test_zero_length_member_is_skipped() {
        let model = portal()
            .node(5, FrameNode::new(4.0, 3.0))
            .element(FrameElement::new(4, 3, 5, 200e9, 0.01, 1e-4))
            .build()
            .unwrap();
        // Node 5 only touches the degenerate member
        let err = model.analyze(&AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, FEAError::InvalidGeometry(_)));

        let model = portal()
            .element(FrameElement::new(4, 3, 3, 200e9, 0.01, 1e-4))
            .build()
            .unwrap();
        let results = model.analyze(&AnalysisOptions::default()).unwrap();
        assert_eq!(results.elements.len(), 3);
        assert!(results.element(4).is_none());
    }

    #[test]
    fn test_mechanisms_are_unstable() {
        // A single pin: free to rotate about it
        let model = FrameModel::builder()
            .node(1, FrameNode::new(0.0, 0.0))
            .node(2, FrameNode::new(4.0, 0.0))
            .element(FrameElement::new(1, 1, 2, 200e9, 0.01, 1e-4))
            .support(1, SupportKind::Pinned)
            .load(NodeLoad::force(2, 0.0, -1000.0))
            .build()
            .unwrap();
        assert!(model.analyze(&AnalysisOptions::default()).unwrap_err().is_unstable());

        // Rollers only: nothing holds X
        let model = FrameModel::builder()
            .node(1, FrameNode::new(0.0, 0.0))
            .node(2, FrameNode::new(4.0, 0.0))
            .element(FrameElement::new(1, 1, 2, 200e9, 0.01, 1e-4))
            .support(1, SupportKind::Roller)
            .support(2, SupportKind::Roller)
            .build()
            .unwrap();
        assert!(model.analyze(&AnalysisOptions::default()).unwrap_err().is_unstable());

        // Second, unsupported part next to a held portal
        let model = portal()
            .node(5, FrameNode::new(10.0, 0.0))
            .node(6, FrameNode::new(12.0, 0.0))
            .element(FrameElement::new(4, 5, 6, 200e9, 0.01, 1e-4))
            .build()
            .unwrap();
        let err = model.analyze(&AnalysisOptions::default()).unwrap_err();
        assert!(err.is_unstable());
        assert!(err.to_string().contains("node 5"));
    }

    #[test]
    fn test_node_index_follows_id_order() {
        let model = FrameModel::builder()
            .node(30, FrameNode::new(0.0, 0.0))
            .node(10, FrameNode::new(1.0, 0.0))
            .element(FrameElement::new(1, 10, 30, 200e9, 0.01, 1e-4))
            .build()
            .unwrap();
        assert_eq!(model.node_index(10).unwrap(), 0);
        assert_eq!(model.node_index(30).unwrap(), 1);
        assert!(model.node_index(20).is_err());
    }
}
