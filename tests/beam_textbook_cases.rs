//! Beam solutions checked against closed-form textbook results
//!
//! E = 200 GPa, I = 1e-4 m⁴ throughout, so EI = 2e7 N·m².

use approx::assert_relative_eq;
use stiffness_solver::prelude::*;

const E: f64 = 200e9;
const I: f64 = 1e-4;
const EI: f64 = E * I;

fn simply_supported_point_load() -> BeamModel {
    BeamModel::builder(10.0, E, I)
        .support(0.0, SupportKind::Pinned)
        .support(10.0, SupportKind::Pinned)
        .point_load(PointLoad::new(5.0, -1000.0))
        .build()
        .unwrap()
}

#[test]
fn simply_supported_midspan_point_load() {
    let options = AnalysisOptions::default().with_samples(501);
    let results = simply_supported_point_load().analyze(&options).unwrap();

    assert_eq!(results.x.len(), 501);
    assert_relative_eq!(results.x[250], 5.0);

    for r in &results.reactions {
        assert_relative_eq!(r.fy, 500.0, epsilon = 1e-6);
        assert_eq!(r.mz, 0.0);
    }

    // M(5) = PL/4
    assert_relative_eq!(results.moment[250].abs(), 2500.0, epsilon = 1e-6);
    assert_relative_eq!(results.summary.max_moment, 2500.0, epsilon = 1e-6);
    assert_relative_eq!(results.summary.max_moment_x, 5.0);

    // Shear changes sign exactly at the load
    assert!(results.shear[249] > 0.0);
    assert!(results.shear[250] < 0.0);
    assert_relative_eq!(results.shear[249], 500.0, epsilon = 1e-6);
    assert_relative_eq!(results.shear[250], -500.0, epsilon = 1e-6);

    // δ = PL³/48EI
    let expected = 1000.0 * 10.0_f64.powi(3) / (48.0 * EI);
    assert_relative_eq!(results.deflection[250], -expected, max_relative = 1e-9);
    assert_relative_eq!(results.summary.max_deflection, expected, max_relative = 1e-9);

    // Ends of a simply supported span
    assert_eq!(results.deflection[0], 0.0);
    assert_relative_eq!(results.deflection[500], 0.0, epsilon = 1e-15);
    assert_relative_eq!(results.moment[500], 0.0, epsilon = 1e-6);
}

#[test]
fn cantilever_tip_load() {
    let p = 1000.0;
    let length = 4.0;
    let model = BeamModel::builder(length, E, I)
        .support(0.0, SupportKind::Fixed)
        .point_load(PointLoad::new(length, -p))
        .build()
        .unwrap();

    let results = model.analyze(&AnalysisOptions::default()).unwrap();

    // δ_tip = PL³/3EI
    let tip = results.deflection.last().copied().unwrap();
    assert_relative_eq!(tip.abs(), p * length.powi(3) / (3.0 * EI), max_relative = 1e-9);

    let root = &results.reactions[0];
    assert_relative_eq!(root.fy, p, epsilon = 1e-6);
    assert_relative_eq!(root.mz, p * length, epsilon = 1e-6);

    // Hogging moment at the root, zero at the free end
    assert_relative_eq!(results.moment[0], -p * length, epsilon = 1e-6);
    assert_relative_eq!(results.moment.last().copied().unwrap(), 0.0, epsilon = 1e-6);
}

#[test]
fn fixed_fixed_uniform_load() {
    let w = 1000.0;
    let length = 10.0;

    // Two load segments put a node at midspan
    let model = BeamModel::builder(length, E, I)
        .support(0.0, SupportKind::Fixed)
        .support(length, SupportKind::Fixed)
        .distributed_load(DistributedLoad::uniform_downward(0.0, 5.0, w))
        .distributed_load(DistributedLoad::uniform_downward(5.0, length, w))
        .build()
        .unwrap();

    let results = model.analyze(&AnalysisOptions::default().with_samples(501)).unwrap();

    let end_moment = w * length * length / 12.0;
    assert_relative_eq!(results.reactions[0].fy, w * length / 2.0, epsilon = 1e-6);
    assert_relative_eq!(results.reactions[0].mz, end_moment, epsilon = 1e-6);
    assert_relative_eq!(results.reactions[1].mz, -end_moment, epsilon = 1e-6);

    assert_relative_eq!(results.moment[0], -end_moment, epsilon = 1e-6);
    assert_relative_eq!(results.moment[250], w * length * length / 24.0, epsilon = 1e-6);

    // δ_mid = wL⁴/384EI
    let expected = w * length.powi(4) / (384.0 * EI);
    assert_relative_eq!(results.deflection[250], -expected, max_relative = 1e-9);
}

#[test]
fn fully_restrained_beam_needs_no_solve() {
    let w = 1000.0;
    let length = 10.0;
    let model = BeamModel::builder(length, E, I)
        .support(0.0, SupportKind::Fixed)
        .support(length, SupportKind::Fixed)
        .distributed_load(DistributedLoad::uniform_downward(0.0, length, w))
        .build()
        .unwrap();

    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    assert_eq!(results.summary.free_dofs, 0);
    assert!(results.deflection.iter().all(|&d| d == 0.0));
    assert_relative_eq!(results.reactions[0].fy, w * length / 2.0, epsilon = 1e-9);
    assert_relative_eq!(results.reactions[0].mz, w * length * length / 12.0, epsilon = 1e-9);
}

#[test]
fn distributed_load_is_statically_equivalent() {
    let w = -1000.0;
    let model = BeamModel::builder(10.0, E, I)
        .support(0.0, SupportKind::Pinned)
        .support(10.0, SupportKind::Roller)
        .point_load(PointLoad::new(3.0, 0.0))
        .distributed_load(DistributedLoad::new(2.0, 7.0, w))
        .build()
        .unwrap();

    let assembly = model.assemble(&AnalysisOptions::default()).unwrap();
    let f = assembly.system.forces();
    let transverse: f64 = (0..f.len()).step_by(2).map(|dof| f[dof]).sum();
    assert_relative_eq!(transverse, w * 5.0, epsilon = 1e-9);

    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    let total: f64 = results.reactions.iter().map(|r| r.fy).sum();
    assert_relative_eq!(total, -w * 5.0, epsilon = 1e-6);
}

#[test]
fn reduced_stiffness_is_symmetric_and_solves_are_deterministic() {
    let model = BeamModel::builder(12.0, E, I)
        .support(0.0, SupportKind::Fixed)
        .support(7.0, SupportKind::Roller)
        .point_load(PointLoad::new(3.0, -500.0))
        .point_load(PointLoad::new(12.0, -250.0))
        .distributed_load(DistributedLoad::new(4.0, 10.0, -800.0))
        .build()
        .unwrap();
    let options = AnalysisOptions::default();

    let assembly = model.assemble(&options).unwrap();
    let free = assembly.system.free_dofs(&assembly.fixed_dofs);
    let k_ff = assembly.system.reduced_stiffness(&free);
    for i in 0..k_ff.nrows() {
        for j in 0..k_ff.ncols() {
            assert_relative_eq!(k_ff[(i, j)], k_ff[(j, i)], max_relative = 1e-12);
        }
    }

    let first = model.analyze(&options).unwrap();
    let second = model.analyze(&options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn beam_without_supports_is_unstable() {
    let model = BeamModel::builder(10.0, E, I)
        .point_load(PointLoad::new(5.0, -1000.0))
        .build()
        .unwrap();
    let err = model.analyze(&AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, FEAError::Unstable(_)));
}

#[test]
fn small_reactions_are_reported_as_zero() {
    // Load directly over the left pin: the right support carries nothing
    let model = BeamModel::builder(10.0, E, I)
        .support(0.0, SupportKind::Pinned)
        .support(10.0, SupportKind::Roller)
        .point_load(PointLoad::new(0.0, -1000.0))
        .build()
        .unwrap();
    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    assert_relative_eq!(results.reactions[0].fy, 1000.0, epsilon = 1e-9);
    assert_eq!(results.reactions[1].fy, 0.0);

    // A coarse threshold clips everything
    let results = simply_supported_point_load()
        .analyze(&AnalysisOptions::default().with_reaction_tolerance(1e3))
        .unwrap();
    assert!(results.reactions.iter().all(|r| r.fy == 0.0 && r.mz == 0.0));
}

#[test]
fn near_duplicate_positions_share_a_node() {
    let model = BeamModel::builder(10.0, E, I)
        .support(0.0, SupportKind::Pinned)
        .support(10.0, SupportKind::Pinned)
        .point_load(PointLoad::new(5.0, -600.0))
        .point_load(PointLoad::new(5.0 + 1e-12, -400.0))
        .build()
        .unwrap();

    let results = model.analyze(&AnalysisOptions::default().with_samples(501)).unwrap();
    assert_eq!(results.summary.num_nodes, 3);
    assert_relative_eq!(results.reactions[0].fy, 500.0, epsilon = 1e-6);
    assert_relative_eq!(results.moment[250], 2500.0, epsilon = 1e-6);
}

#[test]
fn closely_spaced_loads_keep_exact_reactions() {
    for gap in [1e-2, 1e-3, 1e-4, 1e-5, 1e-6] {
        let model = BeamModel::builder(10.0, E, I)
            .support(0.0, SupportKind::Pinned)
            .support(10.0, SupportKind::Roller)
            .point_load(PointLoad::new(5.0, -1000.0))
            .point_load(PointLoad::new(5.0 + gap, -1000.0))
            .build()
            .unwrap();

        let results = model.analyze(&AnalysisOptions::default()).unwrap();
        assert_eq!(results.summary.num_nodes, 4, "gap {}", gap);

        // Moments about the left pin
        let right = 1000.0 * (5.0 + 5.0 + gap) / 10.0;
        assert_relative_eq!(results.reactions[1].fy, right, epsilon = 1e-6);
        assert_relative_eq!(results.reactions[0].fy, 2000.0 - right, epsilon = 1e-6);

        // Close to 2P at midspan: 2PL³/48EI
        let expected = 2000.0 * 10.0_f64.powi(3) / (48.0 * EI);
        assert_relative_eq!(results.summary.max_deflection, expected, max_relative = 1e-2);
    }
}

#[test]
fn load_next_to_a_fixed_root() {
    let (p, a, length) = (1000.0, 0.001, 10.0);
    let model = BeamModel::builder(length, E, I)
        .support(0.0, SupportKind::Fixed)
        .point_load(PointLoad::new(a, -p))
        .point_load(PointLoad::new(length, -p))
        .build()
        .unwrap();

    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    let root = &results.reactions[0];
    assert_relative_eq!(root.fy, 2.0 * p, epsilon = 1e-6);
    assert_relative_eq!(root.mz, p * a + p * length, epsilon = 1e-6);

    // PL³/3EI from the tip load plus Pa²(3L − a)/6EI from the one near the root
    let tip = results.deflection.last().copied().unwrap();
    let expected = p * length.powi(3) / (3.0 * EI) + p * a * a * (3.0 * length - a) / (6.0 * EI);
    assert_relative_eq!(tip, -expected, max_relative = 1e-9);
}
