//! Weft CLI — simulation, benchmarking, and validation.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use weft_solver::SolverKind;

mod commands;
mod scene;

#[derive(Parser)]
#[command(name = "weft")]
#[command(version, about = "Weft — constrained-dynamics cloth solver")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Solver body selectable from the command line.
#[derive(Clone, Copy, ValueEnum)]
enum SolverArg {
    VelocityImpulse,
    Xpbd,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::VelocityImpulse => SolverKind::VelocityImpulse,
            SolverArg::Xpbd => SolverKind::Xpbd,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a simulation file.
    Simulate {
        /// Path to simulation file (TOML).
        #[arg(short, long, default_value = "simulation.toml")]
        config: String,

        /// Write the final positions and velocities as JSON.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (hanging_sheet, sphere_drape, capsule_drape, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Solver body.
        #[arg(long, value_enum, default_value = "velocity-impulse")]
        solver: SolverArg,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a simulation file (.toml) or mesh (.json).
    Validate {
        /// Path to simulation file or mesh.
        path: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Simulate { config, output } => commands::simulate(&config, output.as_deref()),
        Commands::Benchmark {
            scenario,
            solver,
            output,
        } => commands::benchmark(&scenario, solver.into(), output.as_deref()),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
