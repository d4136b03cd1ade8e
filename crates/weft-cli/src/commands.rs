//! CLI command implementations.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use weft_bench::metrics::BenchmarkMetrics;
use weft_bench::runner::BenchmarkRunner;
use weft_bench::scenarios::{Scenario, ScenarioKind};
use weft_math::Vec3;
use weft_mesh::TriangleMesh;
use weft_solver::{ClothSolver, SolverKind};

use crate::scene::SimulationFile;

/// Final state written by `weft simulate --output`.
#[derive(Serialize)]
struct SimulationOutput {
    solver: String,
    steps: u32,
    sim_time: f32,
    positions: Vec<[f32; 3]>,
    velocities: Vec<[f32; 3]>,
}

/// Run a simulation from config file.
pub fn simulate(
    config_path: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Weft Simulation");
    println!("───────────────");
    println!("Config: {config_path}");
    println!();

    let text = std::fs::read_to_string(config_path)?;
    let file = SimulationFile::from_toml(&text)?;
    let mesh = file.mesh();

    let mut solver = ClothSolver::initialize(&mesh.positions, &mesh.indices, &file.params)?;
    solver.pin_vertices(&file.pinned())?;
    solver.set_tether_anchors(&file.anchors())?;
    solver.set_colliders(file.scene.colliders.iter().map(|c| c.build()).collect());

    println!(
        "Mesh:    {} verts, {} tris ({} edges, {} bends)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        solver.edge_count(),
        solver.bend_count()
    );
    println!("Solver:  {}", solver.solver_name());
    println!("Frames:  {} × {:.4}s", file.scene.steps, file.scene.dt);
    println!();

    let mut positions = mesh.positions.clone();
    let mut velocities = vec![Vec3::ZERO; positions.len()];
    let mut contacts: u64 = 0;
    let start = Instant::now();

    for frame in 0..file.scene.steps {
        let report = solver.step(file.scene.dt, &mut positions, &mut velocities)?;
        contacts += u64::from(report.contacts);
        debug!(frame, contacts = report.contacts, "frame done");
    }

    let elapsed = start.elapsed().as_secs_f64();
    println!("  Wall time:     {:.3}s", elapsed);
    println!("  Contacts:      {}", contacts);
    println!("  Final KE:      {:.6e}", solver.kinetic_energy(&velocities)?);
    println!("  Max stretch:   {:.6}m", solver.max_stretch_violation(&positions)?);
    println!();

    if let Some(path) = output_path {
        let output = SimulationOutput {
            solver: solver.solver_name().to_string(),
            steps: file.scene.steps,
            sim_time: file.scene.dt * file.scene.steps as f32,
            positions: positions.iter().map(|p| p.to_array()).collect(),
            velocities: velocities.iter().map(|v| v.to_array()).collect(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&output)?)?;
        println!("State written to: {path}");
    }

    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(
    scenario_name: &str,
    solver: SolverKind,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Weft Benchmark Suite");
    println!("════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                let available: Vec<&str> =
                    ScenarioKind::all().iter().map(|k| k.name()).collect();
                eprintln!("Unknown scenario: {scenario_name}");
                eprintln!("Available: {}, all", available.join(", "));
                return Err("Unknown scenario".into());
            }
        }
    };

    let mut all_metrics = Vec::new();

    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind).with_solver(solver);

        println!(
            "Running: {} ({} verts, {} tris, {} steps, {})",
            kind.name(),
            scenario.garment.vertex_count(),
            scenario.garment.triangle_count(),
            scenario.timesteps,
            solver.name(),
        );

        let metrics =
            BenchmarkRunner::run(&scenario).map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Final KE:      {:.6e}", metrics.final_kinetic_energy);
        println!("  Max displace:  {:.4}m", metrics.max_displacement);
        println!("  Max stretch:   {:.6}m", metrics.max_stretch_violation);
        println!();

        all_metrics.push(metrics);
    }

    // Output CSV
    if let Some(path) = output_path {
        let csv = BenchmarkMetrics::to_csv(&all_metrics);
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{}", BenchmarkMetrics::to_csv(&all_metrics));
    }

    Ok(())
}

/// Validate a simulation file or mesh.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Weft Validator");
    println!("──────────────");
    println!();

    if path.ends_with(".toml") {
        println!("Validating simulation file: {path}");
        let content = std::fs::read_to_string(path)?;
        let file = SimulationFile::from_toml(&content)?;
        let mesh = file.mesh();
        let mut solver = ClothSolver::initialize(&mesh.positions, &mesh.indices, &file.params)?;
        solver.pin_vertices(&file.pinned())?;
        solver.set_tether_anchors(&file.anchors())?;
        info!(path, "simulation file is valid");
        println!(
            "✅ Simulation file is valid ({} verts, {} colliders, solver {}).",
            mesh.vertex_count(),
            file.scene.colliders.len(),
            solver.solver_name()
        );
    } else if path.ends_with(".json") {
        println!("Validating mesh: {path}");
        let content = std::fs::read_to_string(path)?;
        let mesh: TriangleMesh = serde_json::from_str(&content)?;
        match mesh.validate() {
            Ok(()) => println!(
                "✅ Mesh is valid ({} verts, {} tris).",
                mesh.vertex_count(),
                mesh.triangle_count()
            ),
            Err(e) => {
                println!("❌ Mesh validation failed: {e}");
                return Err(e.into());
            }
        }
    } else {
        println!("Unsupported file format. Use .toml (simulation) or .json (mesh).");
    }

    Ok(())
}
