//! Stiffness Solver Example - beam, portal frame and column

use anyhow::Context;
use stiffness_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let options = AnalysisOptions::linear().with_statics_check();

    println!("=== Stiffness Solver Example: Simply Supported Beam ===\n");

    // 10 m span, 20 kN at midspan, 5 kN/m over the right half
    let beam = BeamModel::builder(10.0, 200e9, 1e-4)
        .support(0.0, SupportKind::Pinned)
        .support(10.0, SupportKind::Roller)
        .point_load(PointLoad::downward(5.0, 20_000.0))
        .distributed_load(DistributedLoad::uniform_downward(5.0, 10.0, 5_000.0))
        .build()
        .context("building beam")?;

    let results = beam.analyze(&options).context("analyzing beam")?;

    println!("Support Reactions:");
    for r in &results.reactions {
        println!("  {:>6} at x={:5.2}m: Fy={:10.2}kN  Mz={:10.2}kN·m", r.kind, r.pos, r.fy / 1000.0, r.mz / 1000.0);
    }
    let s = &results.summary;
    println!("\nSummary:");
    println!("  Max deflection: {:.4}mm at x={:.2}m", s.max_deflection * 1000.0, s.max_deflection_x);
    println!("  Max shear: {:.2}kN at x={:.2}m", s.max_shear / 1000.0, s.max_shear_x);
    println!("  Max moment: {:.2}kN·m at x={:.2}m", s.max_moment / 1000.0, s.max_moment_x);
    println!("  Mesh: {} nodes, {} elements, {} of {} DOFs free\n", s.num_nodes, s.num_elements, s.free_dofs, s.total_dofs);

    println!("=== Portal Frame ===\n");

    // 4 m wide, 3 m tall, fixed bases
    let frame = FrameModel::builder()
        .node(1, FrameNode::new(0.0, 0.0))
        .node(2, FrameNode::new(0.0, 3.0))
        .node(3, FrameNode::new(4.0, 3.0))
        .node(4, FrameNode::new(4.0, 0.0))
        .element(FrameElement::new(1, 1, 2, 200e9, 4.94e-3, 8.49e-5))
        .element(FrameElement::new(2, 2, 3, 200e9, 4.94e-3, 8.49e-5))
        .element(FrameElement::new(3, 3, 4, 200e9, 4.94e-3, 8.49e-5))
        .support(1, SupportKind::Fixed)
        .support(4, SupportKind::Fixed)
        .load(NodeLoad::force(2, 10_000.0, -50_000.0))
        .load(NodeLoad::force(3, 0.0, -50_000.0))
        .build()
        .context("building frame")?;

    let results = frame.analyze(&options).context("analyzing frame")?;

    println!("Node Displacements:");
    for n in &results.nodes {
        println!(
            "  Node {}: u={:.4}mm, v={:.4}mm, θ={:.6}rad",
            n.id,
            n.u * 1000.0,
            n.v * 1000.0,
            n.theta
        );
    }

    println!("\nSupport Reactions:");
    for r in &results.reactions {
        println!(
            "  Node {}: Rx={:.2}kN, Ry={:.2}kN, Mz={:.2}kN·m",
            r.node,
            r.rx / 1000.0,
            r.ry / 1000.0,
            r.mz / 1000.0
        );
    }

    println!("\nMember Forces:");
    for m in &results.elements {
        println!(
            "  Element {} ({}-{}): N={:.2}kN, Mi={:.2}kN·m, Mj={:.2}kN·m",
            m.id,
            m.n1,
            m.n2,
            m.axial / 1000.0,
            m.moment_i / 1000.0,
            m.moment_j / 1000.0
        );
    }

    println!("\n=== Column Buckling ===\n");

    for condition in [
        EndCondition::PinPin,
        EndCondition::FixedFree,
        EndCondition::FixedFixed,
        EndCondition::FixedPin,
    ] {
        let column = ColumnModel::new(3.0, 200e9, 8.49e-5, 4.94e-3, condition);
        let b = column.analyze().context("analyzing column")?;
        println!(
            "  {:<12} K={:.1}: P_cr={:.1}kN, σ_cr={:.1}MPa, λ={:.1}",
            condition,
            b.k,
            b.p_cr / 1000.0,
            b.sigma_cr / 1e6,
            b.slenderness
        );
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
