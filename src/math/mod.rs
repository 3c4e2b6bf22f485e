//! Mathematical utilities for beam and frame stiffness calculations

use nalgebra::{DMatrix, DVector, Matrix4, Matrix6, Vector4, Vector6};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 4x4 matrix for beam element stiffness (v1, θ1, v2, θ2)
pub type Mat4 = Matrix4<f64>;
/// 4-element vector for beam element forces/displacements
pub type Vec4 = Vector4<f64>;
/// 6x6 matrix for plane frame element stiffness (u1, v1, θ1, u2, v2, θ2)
pub type Mat6 = Matrix6<f64>;
/// 6-element vector for plane frame element forces/displacements
pub type Vec6 = Vector6<f64>;

/// Singular values below this fraction of the largest count as zero in
/// [`restrains_rigid_modes`]
pub const RANK_TOLERANCE: f64 = 1e-10;

/// Compute the local stiffness matrix for an Euler-Bernoulli beam element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `i` - Moment of inertia
/// * `length` - Element length
///
/// # Returns
/// 4x4 stiffness matrix ordered [v1, θ1, v2, θ2]
pub fn beam_local_stiffness(e: f64, i: f64, length: f64) -> Mat4 {
    let l = length;
    let l2 = l * l;
    let ei_l3 = e * i / (l2 * l);

    #[rustfmt::skip]
    let data = [
        12.0,     6.0 * l,   -12.0,     6.0 * l,
        6.0 * l,  4.0 * l2,  -6.0 * l,  2.0 * l2,
        -12.0,    -6.0 * l,  12.0,      -6.0 * l,
        6.0 * l,  2.0 * l2,  -6.0 * l,  4.0 * l2,
    ];

    Mat4::from_row_slice(&data) * ei_l3
}

/// Compute the local stiffness matrix for a plane frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `i` - Moment of inertia
/// * `length` - Member length
///
/// # Returns
/// 6x6 local stiffness matrix ordered [u1, v1, θ1, u2, v2, θ2]
pub fn frame_local_stiffness(e: f64, a: f64, i: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let k1 = 12.0 * e * i / l3;
    let k2 = 6.0 * e * i / l2;
    let k3 = 4.0 * e * i / l;
    let k4 = 2.0 * e * i / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,   0.0,  0.0,  -ea_l,  0.0,  0.0,
        // Row 1: shear at i
        0.0,    k1,   k2,   0.0,    -k1,  k2,
        // Row 2: moment at i
        0.0,    k2,   k3,   0.0,    -k2,  k4,
        // Row 3: axial at j
        -ea_l,  0.0,  0.0,  ea_l,   0.0,  0.0,
        // Row 4: shear at j
        0.0,    -k1,  -k2,  0.0,    k1,   -k2,
        // Row 5: moment at j
        0.0,    k2,   k4,   0.0,    -k2,  k3,
    ];

    Mat6::from_row_slice(&data)
}

/// Length and direction cosines of the line from `i_node` to `j_node`
///
/// Returns `(length, c, s)` or `None` when the two points coincide.
pub fn direction_cosines(i_node: &[f64; 2], j_node: &[f64; 2]) -> Option<(f64, f64, f64)> {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    let length = (dx * dx + dy * dy).sqrt();

    if length < 1e-12 {
        return None;
    }

    Some((length, dx / length, dy / length))
}

/// Compute the transformation matrix for a plane frame element
///
/// Two independent in-plane rotations by (c, s); the rotational DOF is unrotated.
///
/// # Returns
/// 6x6 transformation matrix from global to local coordinates
pub fn frame_transformation_matrix(c: f64, s: f64) -> Mat6 {
    let mut t = Mat6::zeros();

    for node in 0..2 {
        let offset = node * 3;
        t[(offset, offset)] = c;
        t[(offset, offset + 1)] = s;
        t[(offset + 1, offset)] = -s;
        t[(offset + 1, offset + 1)] = c;
        t[(offset + 2, offset + 2)] = 1.0;
    }

    t
}

/// Equivalent nodal loads for a uniform load over a beam element
///
/// # Arguments
/// * `w` - Load intensity (force per unit length, positive along +v)
/// * `length` - Element length
///
/// # Returns
/// [f1, m1, f2, m2] to add into the global force vector
pub fn fer_uniform_load(w: f64, length: f64) -> Vec4 {
    let l = length;
    let l2 = l * l;

    Vec4::new(w * l / 2.0, w * l2 / 12.0, w * l / 2.0, -w * l2 / 12.0)
}

/// Cubic Hermite shape functions at distance `xi` from the element start
///
/// Returns [N1, N2, N3, N4] weighting [v1, θ1, v2, θ2].
pub fn hermite_shape_functions(xi: f64, length: f64) -> [f64; 4] {
    let r = xi / length;
    let r2 = r * r;
    let r3 = r2 * r;

    [
        1.0 - 3.0 * r2 + 2.0 * r3,
        xi * (1.0 - 2.0 * r + r2),
        3.0 * r2 - 2.0 * r3,
        xi * (r2 - r),
    ]
}

/// Replace values smaller than `tolerance` in magnitude with exactly zero
pub fn clip_small(value: f64, tolerance: f64) -> f64 {
    if value.abs() < tolerance {
        0.0
    } else {
        value
    }
}

/// Solve a linear system using fully pivoted LU decomposition
///
/// Returns `None` when a diagonal entry is not positive (a DOF with no
/// stiffness), a pivot vanishes or the solution is not finite. An empty system
/// has the empty solution.
///
/// Near-mechanisms are not detected here; see [`restrains_rigid_modes`].
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    if a.nrows() == 0 {
        return Some(Vec::zeros(0));
    }
    if a.diagonal().iter().any(|d| !(d.is_finite() && *d > 0.0)) {
        return None;
    }

    let x = a.clone().full_piv_lu().solve(b)?;
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Solve K·x + Cᵀ·λ = f subject to C·x = 0
///
/// Factors the bordered (saddle-point) matrix with full pivoting and returns
/// `(x, λ)`, or `None` when a pivot vanishes or the result is not finite.
pub fn solve_saddle_point(k: &Mat, c: &Mat, f: &Vec) -> Option<(Vec, Vec)> {
    let (n, m) = (k.nrows(), c.nrows());
    if n + m == 0 {
        return Some((Vec::zeros(0), Vec::zeros(0)));
    }

    let mut a = Mat::zeros(n + m, n + m);
    a.view_mut((0, 0), (n, n)).copy_from(k);
    a.view_mut((n, 0), (m, n)).copy_from(c);
    a.view_mut((0, n), (n, m)).copy_from(&c.transpose());

    let mut rhs = Vec::zeros(n + m);
    rhs.rows_mut(0, n).copy_from(f);

    let sol = a.full_piv_lu().solve(&rhs)?;
    if !sol.iter().all(|v| v.is_finite()) {
        return None;
    }
    Some((sol.rows(0, n).into_owned(), sol.rows(n, m).into_owned()))
}

/// Whether a set of restrained DOFs holds every rigid-body mode of a body
///
/// `modes` has one row per restrained DOF and one column per rigid-body mode;
/// entry (r, m) is the displacement mode `m` gives that DOF. Rows may be scaled
/// freely. The body is held when the rows have full column rank, judged on
/// singular values relative to the largest with [`RANK_TOLERANCE`].
pub fn restrains_rigid_modes(modes: &Mat) -> bool {
    let n = modes.ncols();
    if n == 0 {
        return true;
    }
    if modes.nrows() < n {
        return false;
    }

    let sv = modes.singular_values();
    let largest = sv.iter().fold(0.0_f64, |max, s| max.max(*s));
    largest > 0.0 && sv.iter().filter(|s| **s > largest * RANK_TOLERANCE).count() == n
}
