//! Beam solve in element-relative coordinates
//!
//! Node DOFs are written relative to the rigid extension of the node on their
//! left:
//!
//! ```text
//! w_j = v_j − v_(j−1) − ℓ_j·θ_(j−1)
//! φ_j = θ_j − θ_(j−1)
//! ```
//!
//! with (v_0, θ_0) as the base. Each element then carries stiffness on its own
//! (w_j, φ_j) pair only, so a very short element next to long ones never has
//! its neighbours' stiffness rounded away in a shared diagonal entry. Supports
//! become constraint rows and their multipliers are the reactions.

use std::collections::BTreeSet;

use log::debug;
use nalgebra::Matrix2;

use crate::analysis::{GlobalSystem, LinearSolution};
use crate::error::{FEAError, FEAResult};
use crate::math::{self, Mat, Vec as FEVec};

use super::mesh::{BeamMesh, DOFS_PER_NODE};

/// Transformation T with d = T·q, from relative to nodal DOFs
///
/// ```text
/// v_j = v_0 + x_j·θ_0 + Σ_(i≤j) [w_i + (x_j − x_i)·φ_i]
/// θ_j = θ_0 + Σ_(i≤j) φ_i
/// ```
pub fn transformation(mesh: &BeamMesh) -> Mat {
    let x = mesh.coords();
    let n = mesh.num_dofs();
    let mut t = Mat::zeros(n, n);

    for j in 0..x.len() {
        let (v, theta) = (j * DOFS_PER_NODE, j * DOFS_PER_NODE + 1);
        for i in 0..=j {
            let (w, phi) = (i * DOFS_PER_NODE, i * DOFS_PER_NODE + 1);
            // For i = 0 these are v_0 and θ_0
            t[(v, w)] = 1.0;
            t[(v, phi)] = x[j] - x[i];
            t[(theta, phi)] = 1.0;
        }
    }
    t
}

/// Whether the restrained DOFs hold both rigid-body modes of the span
///
/// Modes are a unit translation and a rotation about x = 0; a transverse
/// restraint at x contributes the row [1, x/L], a rotational one [0, 1].
pub fn holds_rigid_body(mesh: &BeamMesh, fixed: &BTreeSet<usize>) -> bool {
    let x = mesh.coords();
    let span = x.last().copied().unwrap_or(0.0);
    let scale = if span > 0.0 { span } else { 1.0 };

    let rows: Vec<[f64; 2]> = fixed
        .iter()
        .map(|&dof| match dof % DOFS_PER_NODE {
            0 => [1.0, x[dof / DOFS_PER_NODE] / scale],
            _ => [0.0, 1.0],
        })
        .collect();

    let modes = Mat::from_fn(rows.len(), 2, |r, c| rows[r][c]);
    math::restrains_rigid_modes(&modes)
}

/// Solve the beam for nodal displacements and support reactions
///
/// `forces` is the global nodal force vector in (v, θ) order and `fixed` the
/// restrained DOFs. Reactions are zero away from `fixed`.
pub fn solve(
    mesh: &BeamMesh,
    e: f64,
    i: f64,
    forces: &FEVec,
    fixed: &BTreeSet<usize>,
) -> FEAResult<LinearSolution> {
    if !holds_rigid_body(mesh, fixed) {
        return Err(FEAError::Unstable(
            "supports do not prevent rigid-body motion; add a fixed support or a second support"
                .to_string(),
        ));
    }

    let n = mesh.num_dofs();
    let t = transformation(mesh);

    let mut system = GlobalSystem::new(n);
    for element in mesh.elements() {
        // Start node held: the end-node block of the element matrix
        let k = math::beam_local_stiffness(e, i, element.length());
        let k_end: Matrix2<f64> = k.fixed_view::<2, 2>(2, 2).into_owned();
        let [_, end] = element.nodes();
        system.add_stiffness(&[end * DOFS_PER_NODE, end * DOFS_PER_NODE + 1], &k_end);
    }

    let generalized = t.transpose() * forces;
    for (dof, value) in generalized.iter().enumerate() {
        system.add_force(dof, *value);
    }

    let fixed_list: Vec<usize> = fixed.iter().copied().collect();
    let constraints = Mat::from_fn(fixed_list.len(), n, |r, c| t[(fixed_list[r], c)]);

    let (q, multipliers) = system.solve_constrained(&constraints)?;
    let mut displacements = &t * &q;

    let mut reactions = FEVec::zeros(n);
    for (r, &dof) in fixed_list.iter().enumerate() {
        // Held DOFs are zero up to round-off in T·q
        displacements[dof] = 0.0;
        reactions[dof] = -multipliers[r];
    }

    let free_dofs: Vec<usize> = (0..n).filter(|dof| !fixed.contains(dof)).collect();
    debug!(
        "Beam solved in relative coordinates: {} DOFs, {} restrained",
        n,
        fixed_list.len()
    );

    Ok(LinearSolution {
        displacements,
        reactions,
        free_dofs,
    })
}
