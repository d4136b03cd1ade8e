//! Integration tests for weft-solver.

use weft_contact::{Collider, GroundPlane, SphereCollider};
use weft_math::Vec3;
use weft_mesh::generators::{lay_flat, quad_grid, top_row};
use weft_solver::{ClothParams, ClothSolver, SolverConfig, SolverKind};
use weft_types::WeftError;

const DT: f32 = 1.0 / 60.0;

fn quad() -> (Vec<Vec3>, Vec<u32>) {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
    ];
    (positions, vec![0, 1, 2, 2, 1, 3])
}

fn zero_gravity() -> ClothParams {
    ClothParams {
        gravity: [0.0; 3],
        ..Default::default()
    }
}

/// A `cols × cols` grid with its top row pinned.
fn hanging_sheet(cols: usize, params: &ClothParams) -> (ClothSolver, Vec<Vec3>, Vec<Vec3>) {
    let mesh = quad_grid(cols, cols, 1.0, 1.0);
    let mut solver = ClothSolver::initialize(&mesh.positions, &mesh.indices, params).unwrap();
    solver.pin_vertices(&top_row(cols)).unwrap();
    let velocities = vec![Vec3::ZERO; mesh.vertex_count()];
    (solver, mesh.positions, velocities)
}

fn run(solver: &mut ClothSolver, x: &mut [Vec3], v: &mut [Vec3], steps: usize) {
    for _ in 0..steps {
        solver.step(DT, x, v).unwrap();
    }
}

/// Post-step stretch violation of a free grid scaled by 1.2 about the origin.
fn perturbed_violation(params: &ClothParams, steps: usize) -> f32 {
    let mesh = quad_grid(8, 8, 1.0, 1.0);
    let mut solver = ClothSolver::initialize(&mesh.positions, &mesh.indices, params).unwrap();
    let mut x: Vec<Vec3> = mesh.positions.iter().map(|&p| p * 1.2).collect();
    let mut v = vec![Vec3::ZERO; x.len()];
    run(&mut solver, &mut x, &mut v, steps);
    solver.max_stretch_violation(&x).unwrap()
}

// ─── Initialize ───────────────────────────────────────────────

#[test]
fn initialize_builds_quad_topology() {
    let (x, tris) = quad();
    let solver = ClothSolver::initialize(&x, &tris, &ClothParams::default()).unwrap();

    assert_eq!(solver.vertex_count(), 4);
    assert_eq!(solver.edge_count(), 5);
    assert_eq!(solver.bend_count(), 1);
    assert_eq!(solver.solver_kind(), SolverKind::VelocityImpulse);
    assert_eq!(solver.solver_name(), "velocity_impulse");
    assert!(solver.inverse_masses().iter().all(|&w| (w - 100.0).abs() < 1e-3));

    let counts = solver.batch_counts();
    assert!(counts.edges >= 3);
    assert_eq!(counts.bends, 1);
    assert_eq!(counts.tethers, 0);
}

#[test]
fn initialize_rejects_out_of_range_triangle() {
    let (x, _) = quad();
    let err = ClothSolver::initialize(&x, &[0, 1, 4], &ClothParams::default())
        .err()
        .unwrap();
    assert!(err.is_range_error(), "got {err}");
}

#[test]
fn initialize_rejects_empty_positions() {
    let err = ClothSolver::initialize(&[], &[], &ClothParams::default())
        .err()
        .unwrap();
    assert!(matches!(err, WeftError::InvalidArgument(_)));
}

#[test]
fn initialize_rejects_ragged_triangle_list() {
    let (x, _) = quad();
    let err = ClothSolver::initialize(&x, &[0, 1], &ClothParams::default())
        .err()
        .unwrap();
    assert!(matches!(err, WeftError::InvalidArgument(_)));
}

// ─── Step Preconditions ───────────────────────────────────────

#[test]
fn step_rejects_bad_timestep_without_mutation() {
    let (x0, tris) = quad();
    let mut solver = ClothSolver::initialize(&x0, &tris, &ClothParams::default()).unwrap();
    let mut x = x0.clone();
    let mut v = vec![Vec3::X; 4];

    for dt in [0.0, -0.1, f32::NAN, f32::INFINITY] {
        let err = solver.step(dt, &mut x, &mut v).err().unwrap();
        assert!(matches!(err, WeftError::InvalidTimestep(_)));
    }
    assert_eq!(x, x0);
    assert_eq!(v, vec![Vec3::X; 4]);
}

#[test]
fn step_rejects_length_mismatch() {
    let (x0, tris) = quad();
    let mut solver = ClothSolver::initialize(&x0, &tris, &ClothParams::default()).unwrap();

    let mut x = x0.clone();
    let mut v = vec![Vec3::ZERO; 3];
    let err = solver.step(DT, &mut x, &mut v).err().unwrap();
    assert!(matches!(
        err,
        WeftError::LengthMismatch {
            what: "velocities",
            expected: 4,
            actual: 3
        }
    ));

    let mut short = x0[..2].to_vec();
    let mut v = vec![Vec3::ZERO; 4];
    assert!(solver.step(DT, &mut short, &mut v).is_err());
    assert_eq!(x, x0);
}

// ─── Determinism ──────────────────────────────────────────────

#[test]
fn identical_runs_are_deterministic() {
    let params = ClothParams {
        jitter: 0.5,
        seed: 42,
        ..Default::default()
    };
    let (mut a, mut xa, mut va) = hanging_sheet(6, &params);
    let (mut b, mut xb, mut vb) = hanging_sheet(6, &params);

    for step in 0..200 {
        a.step(DT, &mut xa, &mut va).unwrap();
        b.step(DT, &mut xb, &mut vb).unwrap();
        for i in 0..xa.len() {
            assert!(
                (xa[i] - xb[i]).abs().max_element() <= 1e-6,
                "position {} diverged at step {}",
                i,
                step
            );
            assert!((va[i] - vb[i]).abs().max_element() <= 1e-6);
        }
    }
}

#[test]
fn different_seeds_diverge() {
    let base = ClothParams {
        jitter: 0.5,
        ..Default::default()
    };
    let (mut a, mut xa, mut va) = hanging_sheet(4, &ClothParams { seed: 1, ..base.clone() });
    let (mut b, mut xb, mut vb) = hanging_sheet(4, &ClothParams { seed: 2, ..base });
    run(&mut a, &mut xa, &mut va, 10);
    run(&mut b, &mut xb, &mut vb, 10);
    assert_ne!(xa, xb);
}

#[test]
fn reset_rest_state_reseeds_jitter() {
    let params = ClothParams {
        jitter: 1.0,
        seed: 9,
        ..zero_gravity()
    };
    let (mut solver, x0, v0) = hanging_sheet(3, &params);

    let (mut x1, mut v1) = (x0.clone(), v0.clone());
    run(&mut solver, &mut x1, &mut v1, 5);

    solver.reset_rest_state(&x0).unwrap();
    let (mut x2, mut v2) = (x0.clone(), v0.clone());
    run(&mut solver, &mut x2, &mut v2, 5);

    assert_eq!(x1, x2);
    assert_eq!(v1, v2);
}

// ─── Stability & Convergence ──────────────────────────────────

#[test]
fn no_force_speeds_never_increase() {
    let params = ClothParams {
        stretch_stiffness: 0.0,
        bend_stiffness: 0.0,
        tether_stiffness: 0.0,
        ..zero_gravity()
    };
    let mesh = quad_grid(5, 5, 1.0, 1.0);
    let mut solver = ClothSolver::initialize(&mesh.positions, &mesh.indices, &params).unwrap();
    let mut x = mesh.positions.clone();
    let mut v = vec![Vec3::new(0.3, 0.0, -0.1); x.len()];

    for _ in 0..50 {
        let before: Vec<f32> = v.iter().map(|v| v.length()).collect();
        solver.step(DT, &mut x, &mut v).unwrap();
        for (i, s) in v.iter().map(|v| v.length()).enumerate() {
            assert!(s <= before[i] + 1e-5, "vertex {} sped up: {} > {}", i, s, before[i]);
        }
    }
}

#[test]
fn more_iterations_reduce_violation() {
    let with_iterations = |iterations| ClothParams {
        iterations,
        substeps: 1,
        ..zero_gravity()
    };
    let v1 = perturbed_violation(&with_iterations(1), 1);
    let v2 = perturbed_violation(&with_iterations(2), 1);
    let v16 = perturbed_violation(&with_iterations(16), 1);
    assert!(v16 < v1, "16 iterations: {}, 1 iteration: {}", v16, v1);
    assert!(v16 <= v2, "16 iterations: {}, 2 iterations: {}", v16, v2);
}

#[test]
fn higher_stiffness_reduces_violation() {
    let with_stiffness = |stretch_stiffness| ClothParams {
        stretch_stiffness,
        ..zero_gravity()
    };
    let soft = perturbed_violation(&with_stiffness(0.2), 5);
    let stiff = perturbed_violation(&with_stiffness(1.0), 5);
    assert!(stiff < soft, "stiff: {}, soft: {}", stiff, soft);
}

#[test]
fn single_step_is_monotonic_in_iterations_and_stiffness() {
    let with_iterations = |iterations| ClothParams {
        iterations,
        substeps: 1,
        ..zero_gravity()
    };
    let start = perturbed_violation(&with_iterations(1), 0);
    let mut last = start;
    for iterations in [1, 4, 8, 16] {
        let v = perturbed_violation(&with_iterations(iterations), 1);
        assert!(v <= last + 1e-6, "{} iterations: {} > {}", iterations, v, last);
        last = v;
    }
    assert!(last < 0.5 * start);

    let with_stiffness = |stretch_stiffness| ClothParams {
        stretch_stiffness,
        ..zero_gravity()
    };
    let mut last = start;
    for stiffness in [0.0, 0.2, 0.6, 1.0] {
        let v = perturbed_violation(&with_stiffness(stiffness), 1);
        assert!(v < last, "stiffness {}: {} >= {}", stiffness, v, last);
        last = v;
    }
}

#[test]
fn stretched_sheet_settles_without_overshoot() {
    let params = ClothParams {
        stretch_stiffness: 1.0,
        ..zero_gravity()
    };
    let mut last = perturbed_violation(&params, 0);
    for steps in [1, 2, 5, 20] {
        let v = perturbed_violation(&params, steps);
        assert!(v < last, "after {} steps: {} >= {}", steps, v, last);
        last = v;
    }
}

#[test]
fn hanging_sheet_comes_to_rest() {
    let (mut solver, mut x, mut v) = hanging_sheet(10, &ClothParams::default());
    run(&mut solver, &mut x, &mut v, 120);
    let top_speed = v.iter().map(|v| v.length()).fold(0.0, f32::max);
    assert!(top_speed < 0.05, "still moving at {}", top_speed);
    assert!(solver.max_stretch_violation(&x).unwrap() < 0.01);
}

#[test]
fn quad_constraint_beats_unconstrained_prediction() {
    let (x0, tris) = quad();
    let params = ClothParams {
        stretch_stiffness: 1.0,
        iterations: 20,
        ..zero_gravity()
    };
    let mut solver = ClothSolver::initialize(&x0, &tris, &params).unwrap();
    let mut x = x0.clone();
    let mut v = vec![Vec3::ZERO; 4];
    v[1] = Vec3::new(5.0, 0.0, 0.0);

    let free = (x0[0].distance(x0[1] + v[1] * 0.01) - 1.0).abs();
    solver.step(0.01, &mut x, &mut v).unwrap();
    let constrained = (x[0].distance(x[1]) - 1.0).abs();

    assert!(constrained < free, "constrained {} vs free {}", constrained, free);
}

// ─── Pinning ──────────────────────────────────────────────────

#[test]
fn pinned_vertices_are_bit_identical() {
    let params = ClothParams {
        jitter: 2.0,
        external_acceleration: [3.0, 0.0, 1.0],
        ..Default::default()
    };
    let (mut solver, mut x, mut v) = hanging_sheet(6, &params);
    let pinned = top_row(6);
    for &i in &pinned {
        v[i as usize] = Vec3::new(1.0, 2.0, 3.0);
    }
    let before: Vec<Vec3> = pinned.iter().map(|&i| x[i as usize]).collect();
    let corner = x[x.len() - 1];

    for _ in 0..50 {
        solver.step(DT, &mut x, &mut v).unwrap();
        for (k, &i) in pinned.iter().enumerate() {
            let i = i as usize;
            assert_eq!(
                x[i].to_array().map(f32::to_bits),
                before[k].to_array().map(f32::to_bits)
            );
            assert_eq!(v[i], Vec3::ZERO);
        }
    }
    // The rest of the sheet did move.
    assert!(x[x.len() - 1].distance(corner) > 1e-3);
}

#[test]
fn unpin_restores_mass_and_motion() {
    let (mut solver, mut x, mut v) = hanging_sheet(2, &ClothParams::default());
    assert_eq!(solver.pinned_count(), 3);
    assert!(solver.is_pinned(0));

    solver.unpin_vertices(&[0]).unwrap();
    assert!(!solver.is_pinned(0));
    assert!((solver.inverse_masses()[0] - 100.0).abs() < 1e-3);

    solver.clear_pins();
    assert_eq!(solver.pinned_count(), 0);
    let y0 = x[0].y;
    run(&mut solver, &mut x, &mut v, 5);
    assert!(x[0].y < y0);
}

#[test]
fn pin_rejects_bad_index_without_mutation() {
    let (mut solver, _, _) = hanging_sheet(2, &ClothParams::default());
    let err = solver.pin_vertices(&[4, 99]).err().unwrap();
    assert!(err.is_range_error());
    assert!(!solver.is_pinned(4));
    assert!(solver.unpin_vertices(&[0, 99]).is_err());
    assert!(solver.is_pinned(0));
}

#[test]
fn set_inverse_masses_clamps_and_keeps_pins() {
    let (mut solver, _, _) = hanging_sheet(1, &ClothParams::default());
    solver.set_inverse_masses(&[1.0, 1.0, -2.0, 4.0]).unwrap();
    assert_eq!(solver.inverse_masses(), &[0.0, 0.0, 0.0, 4.0]);

    let err = solver.set_inverse_masses(&[1.0; 3]).err().unwrap();
    assert!(matches!(err, WeftError::LengthMismatch { .. }));
    assert_eq!(solver.inverse_masses(), &[0.0, 0.0, 0.0, 4.0]);
}

// ─── Tethers ──────────────────────────────────────────────────

#[test]
fn tether_pulls_vertex_toward_anchor() {
    let (x0, tris) = quad();
    let params = ClothParams {
        tether_stiffness: 1.0,
        ..zero_gravity()
    };
    let mut solver = ClothSolver::initialize(&x0, &tris, &params).unwrap();
    solver.pin_vertices(&[0]).unwrap();
    solver.set_tether_anchors(&[0]).unwrap();

    let binding = solver.tether_bindings()[3];
    assert_eq!(binding.anchor, Some(0));
    assert!((binding.target_length - 2.0_f32.sqrt()).abs() < 1e-6);

    let mut x = x0.clone();
    x[3] = Vec3::new(3.0, -3.0, 0.0);
    let mut v = vec![Vec3::ZERO; 4];
    let before = x[3].distance(x[0]);
    solver.step(DT, &mut x, &mut v).unwrap();
    assert!(x[3].distance(x[0]) < before);
}

#[test]
fn empty_anchor_list_clears_tethers() {
    let (mut solver, _, _) = hanging_sheet(3, &ClothParams::default());
    solver.set_tether_anchors(&[0, 3]).unwrap();
    assert_eq!(solver.tether_bindings().len(), 16);
    assert!(solver.batch_counts().tethers > 0);

    solver.set_tether_anchors(&[]).unwrap();
    assert!(solver.tether_bindings().is_empty());
    assert_eq!(solver.batch_counts().tethers, 0);
}

#[test]
fn shared_anchor_uses_two_tether_batches() {
    let (mut solver, _, _) = hanging_sheet(40, &ClothParams::default());
    solver.set_tether_anchors(&[0]).unwrap();
    assert_eq!(solver.batch_counts().tethers, 2);

    solver.set_tether_anchors(&top_row(40)).unwrap();
    assert_eq!(solver.batch_counts().tethers, 2);
}

#[test]
fn bad_anchor_keeps_previous_binding() {
    let (mut solver, _, _) = hanging_sheet(3, &ClothParams::default());
    solver.set_tether_anchors(&[0]).unwrap();
    let before = solver.tether_bindings().to_vec();

    let err = solver.set_tether_anchors(&[1, 16]).err().unwrap();
    assert!(err.is_range_error());
    assert_eq!(solver.tether_bindings(), &before[..]);
}

#[test]
fn tether_scale_update_retargets() {
    let (x0, tris) = quad();
    let mut solver = ClothSolver::initialize(&x0, &tris, &ClothParams::default()).unwrap();
    solver.set_tether_anchors(&[0]).unwrap();

    solver.update_parameters(&ClothParams {
        tether_scale: 2.0,
        ..Default::default()
    });
    assert!((solver.tether_bindings()[1].target_length - 2.0).abs() < 1e-6);
}

// ─── Collisions ───────────────────────────────────────────────

#[test]
fn draped_sheet_stays_outside_colliders() {
    let mut mesh = quad_grid(10, 10, 1.0, 1.0);
    lay_flat(&mut mesh, 0.3);
    let params = ClothParams::default();
    let mut solver = ClothSolver::initialize(&mesh.positions, &mesh.indices, &params).unwrap();

    let sphere = SphereCollider::new(Vec3::ZERO, 0.25);
    let ground = GroundPlane::new(-0.5);
    solver.set_colliders(vec![Box::new(sphere), Box::new(ground)]);
    assert_eq!(solver.collider_count(), 2);

    let thickness = solver.config().collision_thickness;
    let mut x = mesh.positions.clone();
    let mut v = vec![Vec3::ZERO; x.len()];
    let mut contacts = 0;

    for _ in 0..90 {
        contacts += solver.step(DT, &mut x, &mut v).unwrap().contacts;
        for p in &x {
            for collider in [&sphere as &dyn Collider, &ground] {
                let hit = collider.surface(*p);
                assert!(
                    hit.distance >= thickness - 1e-4,
                    "{} penetrated: {}",
                    collider.name(),
                    hit.distance
                );
            }
        }
    }
    assert!(contacts > 0);
}

// ─── Rest State & Parameters ──────────────────────────────────

#[test]
fn reset_rest_state_rescales_constraints() {
    let (mut solver, x0, _) = hanging_sheet(4, &ClothParams::default());
    let bigger: Vec<Vec3> = x0.iter().map(|&p| p * 2.0).collect();
    assert!(solver.max_stretch_violation(&bigger).unwrap() > 0.1);

    solver.reset_rest_state(&bigger).unwrap();
    assert!(solver.max_stretch_violation(&bigger).unwrap() < 1e-5);
    assert_eq!(solver.rest_positions(), &bigger[..]);
    assert_eq!(solver.pinned_count(), 5);
    assert_eq!(solver.edge_count(), 56);

    let err = solver.reset_rest_state(&x0[..3]).err().unwrap();
    assert!(matches!(err, WeftError::LengthMismatch { .. }));
    assert_eq!(solver.rest_positions(), &bigger[..]);
}

#[test]
fn update_parameters_clamps_and_keeps_solver_kind() {
    let (x0, tris) = quad();
    let mut solver = ClothSolver::initialize(&x0, &tris, &ClothParams::default()).unwrap();

    solver.update_parameters(&ClothParams {
        solver: SolverKind::Xpbd,
        stretch_stiffness: 5.0,
        damping: 2.0,
        iterations: -3,
        substeps: 0,
        ..Default::default()
    });

    let config = solver.config();
    assert_eq!(solver.solver_kind(), SolverKind::VelocityImpulse);
    assert_eq!(config.solver, SolverKind::VelocityImpulse);
    assert_eq!(config.stretch_stiffness, 1.0);
    assert!((config.damping - 0.999).abs() < 1e-6);
    assert_eq!(config.iterations, 1);
    assert_eq!(config.substeps, 1);
}

#[test]
fn vertex_mass_update_rescales_inverse_masses() {
    let (mut solver, _, _) = hanging_sheet(1, &ClothParams::default());
    solver.update_parameters(&ClothParams {
        vertex_mass: 0.02,
        ..Default::default()
    });

    let w = solver.inverse_masses();
    assert_eq!(&w[..2], &[0.0, 0.0]);
    assert!((w[2] - 50.0).abs() < 1e-3);

    let c = &solver.constraints().edges;
    assert!(c.iter().all(|c| c.wsum <= 100.0 + 1e-3));
}

#[test]
fn kinetic_energy_counts_movable_vertices() {
    let (solver, _, _) = hanging_sheet(1, &ClothParams::default());
    let v = vec![Vec3::new(2.0, 0.0, 0.0); 4];
    // Two free vertices of 0.01 kg at 2 m/s.
    let ke = solver.kinetic_energy(&v).unwrap();
    assert!((ke - 0.04).abs() < 1e-6);
    assert!(solver.kinetic_energy(&v[..1]).is_err());
}

// ─── Config Mapper ────────────────────────────────────────────

#[test]
fn config_clamps_raw_values() {
    let raw = ClothParams {
        damping: -1.0,
        friction: 3.0,
        bend_stiffness: f32::NAN,
        vertex_mass: 0.0,
        collision_thickness: -0.1,
        gravity: [0.0, f32::INFINITY, 0.0],
        ..Default::default()
    };
    let c = SolverConfig::from_params(&raw);
    assert_eq!(c.damping, 0.0);
    assert_eq!(c.friction, 1.0);
    assert_eq!(c.bend_stiffness, ClothParams::default().bend_stiffness);
    assert!(c.vertex_mass > 0.0);
    assert_eq!(c.collision_thickness, 0.0);
    assert_eq!(c.gravity, [0.0; 3]);
}

#[test]
fn beta_is_bounded_and_monotonic() {
    for iterations in [1, 2, 4, 8, 50] {
        let c = SolverConfig::from_params(&ClothParams {
            iterations,
            ..Default::default()
        });
        let mut last = -1.0;
        for k in 0..=10 {
            let b = c.beta(k as f32 / 10.0);
            assert!(b > last);
            assert!(b <= 0.6);
            last = b;
        }
    }

    let low = SolverConfig::from_params(&ClothParams::draft());
    let high = SolverConfig::from_params(&ClothParams::default());
    assert!(low.beta(0.9) < high.beta(0.9));
    assert!((high.bend_beta() - 0.5 * high.beta(high.bend_stiffness)).abs() < 1e-7);
}

#[test]
fn compliance_falls_with_stiffness() {
    let c = SolverConfig::default();
    assert!(c.compliance(0.2) > c.compliance(0.8));
    assert_eq!(c.compliance(1.0), 0.0);
}

#[test]
fn params_load_from_partial_toml() {
    let params: ClothParams = toml::from_str(
        r#"
        solver = "xpbd"
        stretch_stiffness = 0.5
        gravity = [0.0, -1.0, 0.0]
        "#,
    )
    .unwrap();
    assert_eq!(params.solver, SolverKind::Xpbd);
    assert_eq!(params.stretch_stiffness, 0.5);
    assert_eq!(params.gravity, [0.0, -1.0, 0.0]);
    assert_eq!(params.iterations, ClothParams::default().iterations);

    let json = serde_json::to_string(&params).unwrap();
    assert!(json.contains("\"xpbd\""));
}

// ─── Concurrency ──────────────────────────────────────────────

#[test]
fn solver_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<ClothSolver>();
}

#[test]
fn independent_solvers_on_two_threads() {
    let params = ClothParams {
        jitter: 0.3,
        seed: 5,
        ..Default::default()
    };
    let simulate = || {
        let (mut solver, mut x, mut v) = hanging_sheet(5, &params);
        run(&mut solver, &mut x, &mut v, 60);
        x
    };

    let (a, b) = std::thread::scope(|s| {
        let ha = s.spawn(simulate);
        let hb = s.spawn(simulate);
        (ha.join().unwrap(), hb.join().unwrap())
    });
    assert_eq!(a, b);
}
