//! Benchmark runner — executes scenarios with a solver and collects metrics.

use std::time::Instant;

use tracing::info;
use weft_math::Vec3;
use weft_solver::{ClothSolver, SolverKind};
use weft_types::WeftResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario.
    ///
    /// Returns metrics for the completed run.
    pub fn run(scenario: &Scenario) -> WeftResult<BenchmarkMetrics> {
        let rest = &scenario.garment.positions;
        let mut solver =
            ClothSolver::initialize(rest, &scenario.garment.indices, &scenario.params)?;
        solver.pin_vertices(&scenario.pinned)?;
        solver.set_tether_anchors(&scenario.anchors)?;
        solver.set_colliders(scenario.colliders.iter().map(|c| c.build()).collect());

        let mut positions = rest.clone();
        let mut velocities = vec![Vec3::ZERO; rest.len()];

        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.timesteps as usize);
        let mut total_contacts: u64 = 0;

        let total_start = Instant::now();

        for _ in 0..scenario.timesteps {
            let report = solver.step(scenario.dt, &mut positions, &mut velocities)?;
            step_times.push(report.wall_time);
            total_contacts += u64::from(report.contacts);
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();

        let max_displacement = positions
            .iter()
            .zip(rest)
            .map(|(p, q)| p.distance(*q))
            .fold(0.0f32, f32::max);

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);

        let metrics = BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            solver: solver.solver_name().to_string(),
            total_wall_time,
            timesteps: scenario.timesteps,
            avg_step_time: avg_step,
            min_step_time: if step_times.is_empty() { 0.0 } else { min_step },
            max_step_time: max_step,
            final_kinetic_energy: f64::from(solver.kinetic_energy(&velocities)?),
            max_displacement,
            max_stretch_violation: solver.max_stretch_violation(&positions)?,
            total_contacts,
            vertex_count: scenario.garment.vertex_count(),
            triangle_count: scenario.garment.triangle_count(),
        };

        info!(
            scenario = %metrics.scenario,
            solver = %metrics.solver,
            wall_time = metrics.total_wall_time,
            "benchmark finished"
        );
        Ok(metrics)
    }

    /// Run all scenarios with one solver body and return metrics for each.
    pub fn run_all(solver: SolverKind) -> WeftResult<Vec<BenchmarkMetrics>> {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&Scenario::from_kind(kind).with_solver(solver)))
            .collect()
    }
}
