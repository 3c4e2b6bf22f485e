//! Global stiffness system: assembly, boundary-condition reduction and solve

use std::collections::BTreeSet;

use log::debug;
use nalgebra::{SMatrix, SVector};

use crate::error::{FEAError, FEAResult};
use crate::math::{self, Mat, Vec as FEVec};

/// Assembled global stiffness matrix K and force vector F
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    k: Mat,
    f: FEVec,
}

/// Solved state of a [`GlobalSystem`]
#[derive(Debug, Clone)]
pub struct LinearSolution {
    /// Full displacement vector d (zero at fixed DOFs)
    pub displacements: FEVec,
    /// Full reaction vector R = K·d − F, zero at free DOFs up to round-off
    pub reactions: FEVec,
    /// Free DOF indices, ascending
    pub free_dofs: Vec<usize>,
}

impl GlobalSystem {
    /// Create an empty system with `num_dofs` degrees of freedom
    pub fn new(num_dofs: usize) -> Self {
        Self {
            k: Mat::zeros(num_dofs, num_dofs),
            f: FEVec::zeros(num_dofs),
        }
    }

    /// Total number of degrees of freedom
    pub fn num_dofs(&self) -> usize {
        self.f.len()
    }

    /// Global stiffness matrix
    pub fn stiffness(&self) -> &Mat {
        &self.k
    }

    /// Global force vector
    pub fn forces(&self) -> &FEVec {
        &self.f
    }

    /// Scatter-add an element stiffness matrix at the given global DOFs
    pub fn add_stiffness<const N: usize>(&mut self, dofs: &[usize; N], k: &SMatrix<f64, N, N>) {
        for (a, &da) in dofs.iter().enumerate() {
            for (b, &db) in dofs.iter().enumerate() {
                self.k[(da, db)] += k[(a, b)];
            }
        }
    }

    /// Scatter-add element nodal forces at the given global DOFs
    pub fn add_forces<const N: usize>(&mut self, dofs: &[usize; N], f: &SVector<f64, N>) {
        for (a, &da) in dofs.iter().enumerate() {
            self.f[da] += f[a];
        }
    }

    /// Add a single nodal force component
    pub fn add_force(&mut self, dof: usize, value: f64) {
        self.f[dof] += value;
    }

    /// Complement of `fixed` over [0, num_dofs)
    pub fn free_dofs(&self, fixed: &BTreeSet<usize>) -> Vec<usize> {
        (0..self.num_dofs()).filter(|d| !fixed.contains(d)).collect()
    }

    /// Extract the free×free partition K_ff
    pub fn reduced_stiffness(&self, free: &[usize]) -> Mat {
        Mat::from_fn(free.len(), free.len(), |i, j| self.k[(free[i], free[j])])
    }

    /// Solve K_ff·d_f = F_f, rebuild d and recover R = K·d − F
    ///
    /// Fixed DOFs are rigid supports with zero displacement. An exactly
    /// singular K_ff is reported as [`FEAError::Unstable`]; mechanisms are
    /// caught before this by the models' rigid-body restraint checks.
    pub fn solve(&self, fixed: &BTreeSet<usize>) -> FEAResult<LinearSolution> {
        let free_dofs = self.free_dofs(fixed);
        let n_free = free_dofs.len();

        debug!(
            "Solving system: {} DOFs ({} free, {} fixed)",
            self.num_dofs(),
            n_free,
            self.num_dofs() - n_free
        );

        let k_ff = self.reduced_stiffness(&free_dofs);
        let f_f = FEVec::from_fn(n_free, |i, _| self.f[free_dofs[i]]);

        let d_f = math::solve_linear_system(&k_ff, &f_f).ok_or_else(|| {
            FEAError::Unstable(
                "reduced stiffness matrix is singular; check supports and connectivity".to_string(),
            )
        })?;

        let mut displacements = FEVec::zeros(self.num_dofs());
        for (i, &di) in free_dofs.iter().enumerate() {
            displacements[di] = d_f[i];
        }

        let reactions = &self.k * &displacements - &self.f;

        Ok(LinearSolution {
            displacements,
            reactions,
            free_dofs,
        })
    }

    /// Solve K·q = F with the DOFs tied by C·q = 0
    ///
    /// Returns q and the constraint forces λ, where K·q + Cᵀ·λ = F. For a row
    /// of C that holds a single DOF, −λ is the reaction at that DOF.
    pub fn solve_constrained(&self, c: &Mat) -> FEAResult<(FEVec, FEVec)> {
        debug!(
            "Solving constrained system: {} DOFs, {} constraints",
            self.num_dofs(),
            c.nrows()
        );

        math::solve_saddle_point(&self.k, c, &self.f).ok_or_else(|| {
            FEAError::Unstable("constrained stiffness system is singular".to_string())
        })
    }
}
