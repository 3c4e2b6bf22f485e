//! Beam engine - 1D Euler-Bernoulli beam under point and uniform loads
//!
//! The span is discretized at every support, load and load boundary, so each
//! input position is a mesh node and every distributed load covers whole
//! elements. Positions are resolved to node indices once, in
//! [`BeamModel::assemble`], and only indices are used from then on.
//!
//! The assembled K is kept in nodal (v, θ) form for inspection; the solve runs
//! in element-relative coordinates ([`relative`]) so closely spaced positions
//! keep full precision.
//!
//! ## Example
//! ```rust
//! use stiffness_solver::prelude::*;
//!
//! let model = BeamModel::builder(10.0, 200e9, 1e-4)
//!     .support(0.0, SupportKind::Pinned)
//!     .support(10.0, SupportKind::Roller)
//!     .point_load(PointLoad::new(5.0, -1000.0))
//!     .build()
//!     .unwrap();
//!
//! let results = model.analyze(&AnalysisOptions::default()).unwrap();
//! assert!((results.reactions[0].fy - 500.0).abs() < 1e-6);
//! ```

pub mod diagrams;
pub mod mesh;
pub mod relative;

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, GlobalSystem};
use crate::elements::{restrained_dofs, SupportKind};
use crate::error::{FEAError, FEAResult};
use crate::loads::{DistributedLoad, PointLoad};
use crate::math;
use crate::results::{peak, BeamResults, BeamSummary, SupportReaction};

use diagrams::SectionStatics;
use mesh::{BeamMesh, DOFS_PER_NODE};

/// A support at a position along the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSupport {
    /// Distance from the left end
    pub pos: f64,
    /// Support category
    #[serde(rename = "type")]
    pub kind: SupportKind,
}

/// A validated beam model, ready for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamModel {
    length: f64,
    e: f64,
    i: f64,
    supports: Vec<BeamSupport>,
    point_loads: Vec<PointLoad>,
    dist_loads: Vec<DistributedLoad>,
}

/// Collects supports and loads for a [`BeamModel`]
#[derive(Debug, Clone)]
pub struct BeamModelBuilder {
    model: BeamModel,
}

/// A beam discretized and assembled, before boundary conditions are applied
#[derive(Debug, Clone)]
pub struct BeamAssembly {
    /// Node set
    pub mesh: BeamMesh,
    /// Global K and F
    pub system: GlobalSystem,
    /// Node index of each support, in support order
    pub support_nodes: Vec<usize>,
    /// Restrained DOFs
    pub fixed_dofs: BTreeSet<usize>,
}

impl BeamModelBuilder {
    /// Add a support at `pos`
    pub fn support(mut self, pos: f64, kind: SupportKind) -> Self {
        self.model.supports.push(BeamSupport { pos, kind });
        self
    }

    /// Add a concentrated load
    pub fn point_load(mut self, load: PointLoad) -> Self {
        self.model.point_loads.push(load);
        self
    }

    /// Add a uniform distributed load
    pub fn distributed_load(mut self, load: DistributedLoad) -> Self {
        self.model.dist_loads.push(load);
        self
    }

    /// Validate and freeze the model
    pub fn build(self) -> FEAResult<BeamModel> {
        let model = self.model;

        for (name, value) in [("length", model.length), ("E", model.e), ("I", model.i)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FEAError::InvalidInput(format!(
                    "beam {} must be positive (received {})",
                    name, value
                )));
            }
        }

        let in_span = |what: &str, x: f64| -> FEAResult<()> {
            if x.is_finite() && (0.0..=model.length).contains(&x) {
                Ok(())
            } else {
                Err(FEAError::InvalidInput(format!(
                    "{} position {} lies outside the span [0, {}]",
                    what, x, model.length
                )))
            }
        };

        for support in &model.supports {
            in_span("support", support.pos)?;
        }
        for load in &model.point_loads {
            in_span("point load", load.pos)?;
            if !load.magnitude.is_finite() {
                return Err(FEAError::InvalidInput(format!(
                    "point load at {} has a non-finite magnitude",
                    load.pos
                )));
            }
        }
        for load in &model.dist_loads {
            in_span("distributed load start", load.start)?;
            in_span("distributed load end", load.end)?;
            if load.start >= load.end {
                return Err(FEAError::InvalidInput(format!(
                    "distributed load must start before it ends (start {}, end {})",
                    load.start, load.end
                )));
            }
            if !load.magnitude.is_finite() {
                return Err(FEAError::InvalidInput(
                    "distributed load has a non-finite magnitude".to_string(),
                ));
            }
        }

        Ok(model)
    }
}

impl BeamModel {
    /// Start a beam of span `length` with modulus `e` and moment of inertia `i`
    pub fn builder(length: f64, e: f64, i: f64) -> BeamModelBuilder {
        BeamModelBuilder {
            model: Self {
                length,
                e,
                i,
                supports: Vec::new(),
                point_loads: Vec::new(),
                dist_loads: Vec::new(),
            },
        }
    }

    /// Span length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Supports in input order
    pub fn supports(&self) -> &[BeamSupport] {
        &self.supports
    }

    /// Point loads in input order
    pub fn point_loads(&self) -> &[PointLoad] {
        &self.point_loads
    }

    /// Distributed loads in input order
    pub fn dist_loads(&self) -> &[DistributedLoad] {
        &self.dist_loads
    }

    /// Discretize the span and assemble the global system
    pub fn assemble(&self, options: &AnalysisOptions) -> FEAResult<BeamAssembly> {
        if !(options.position_tolerance.is_finite() && options.position_tolerance >= 0.0) {
            return Err(FEAError::InvalidInput(format!(
                "position tolerance must be non-negative (received {})",
                options.position_tolerance
            )));
        }

        let positions = self
            .supports
            .iter()
            .map(|s| s.pos)
            .chain(self.point_loads.iter().map(|p| p.pos))
            .chain(self.dist_loads.iter().flat_map(|d| [d.start, d.end]));

        let mesh = BeamMesh::discretize(self.length, positions, options.position_tolerance);
        debug!(
            "Beam discretized: {} nodes, {} elements, {} DOFs",
            mesh.num_nodes(),
            mesh.num_elements(),
            mesh.num_dofs()
        );

        let resolve = |x: f64| {
            mesh.node_index(x).ok_or_else(|| {
                FEAError::AnalysisFailed(format!("position {} did not resolve to a mesh node", x))
            })
        };

        let support_nodes = self
            .supports
            .iter()
            .map(|s| resolve(s.pos))
            .collect::<FEAResult<Vec<usize>>>()?;
        let load_nodes = self
            .point_loads
            .iter()
            .map(|p| resolve(p.pos))
            .collect::<FEAResult<Vec<usize>>>()?;

        let mut seen = BTreeSet::new();
        for (support, &node) in self.supports.iter().zip(&support_nodes) {
            if !seen.insert(node) {
                return Err(FEAError::InvalidInput(format!(
                    "more than one support at position {}",
                    support.pos
                )));
            }
        }

        let mut system = GlobalSystem::new(mesh.num_dofs());

        for element in mesh.elements() {
            let length = element.length();
            let dofs = element.dofs();
            system.add_stiffness(&dofs, &math::beam_local_stiffness(self.e, self.i, length));

            // Load boundaries are nodes, so coverage is all-or-nothing per element
            let mid = element.midpoint();
            for load in self.dist_loads.iter().filter(|d| d.covers(mid)) {
                system.add_forces(&dofs, &math::fer_uniform_load(load.magnitude, length));
            }
        }

        for (load, &node) in self.point_loads.iter().zip(&load_nodes) {
            system.add_force(node * DOFS_PER_NODE, load.magnitude);
        }

        let mut fixed_dofs = BTreeSet::new();
        for (support, &node) in self.supports.iter().zip(&support_nodes) {
            for local in restrained_dofs(&support.kind.beam_restraints()) {
                fixed_dofs.insert(node * DOFS_PER_NODE + local);
            }
        }

        Ok(BeamAssembly {
            mesh,
            system,
            support_nodes,
            fixed_dofs,
        })
    }

    /// Run the linear analysis and build the sampled diagrams
    pub fn analyze(&self, options: &AnalysisOptions) -> FEAResult<BeamResults> {
        if options.num_samples < 2 {
            return Err(FEAError::InvalidInput(format!(
                "at least 2 diagram samples are required (received {})",
                options.num_samples
            )));
        }

        let assembly = self.assemble(options)?;
        let solution = relative::solve(
            &assembly.mesh,
            self.e,
            self.i,
            assembly.system.forces(),
            &assembly.fixed_dofs,
        )?;

        let tol = options.reaction_tolerance;
        let reactions: Vec<SupportReaction> = self
            .supports
            .iter()
            .zip(&assembly.support_nodes)
            .map(|(support, &node)| {
                let [fix_v, fix_theta] = support.kind.beam_restraints();
                let base = node * DOFS_PER_NODE;
                let component = |fixed: bool, dof: usize| {
                    if fixed {
                        math::clip_small(solution.reactions[dof], tol)
                    } else {
                        0.0
                    }
                };
                SupportReaction {
                    pos: support.pos,
                    kind: support.kind,
                    fy: component(fix_v, base),
                    mz: component(fix_theta, base + 1),
                }
            })
            .collect();

        let statics = SectionStatics::new(&reactions, &self.point_loads, &self.dist_loads);
        let x = diagrams::sample_positions(self.length, options.num_samples);

        let shear: Vec<f64> = x.iter().map(|&xi| statics.shear(xi)).collect();
        let moment: Vec<f64> = x.iter().map(|&xi| statics.moment(xi)).collect();
        let deflection = x
            .iter()
            .map(|&xi| diagrams::deflection_at(&assembly.mesh, &solution.displacements, xi))
            .collect::<FEAResult<Vec<f64>>>()?;

        let mut summary = BeamSummary {
            num_nodes: assembly.mesh.num_nodes(),
            num_elements: assembly.mesh.num_elements(),
            total_dofs: assembly.mesh.num_dofs(),
            free_dofs: solution.free_dofs.len(),
            ..Default::default()
        };
        if let Some((idx, value)) = peak(&deflection) {
            summary.max_deflection = value;
            summary.max_deflection_x = x[idx];
        }
        if let Some((idx, value)) = peak(&shear) {
            summary.max_shear = value;
            summary.max_shear_x = x[idx];
        }
        if let Some((idx, value)) = peak(&moment) {
            summary.max_moment = value;
            summary.max_moment_x = x[idx];
        }

        debug!(
            "Beam solved: max deflection {:.6e} at x={}, max moment {:.6e} at x={}",
            summary.max_deflection, summary.max_deflection_x, summary.max_moment, summary.max_moment_x
        );

        Ok(BeamResults {
            x,
            deflection,
            shear,
            moment,
            reactions,
            summary,
        })
    }
}
