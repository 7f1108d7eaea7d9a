//! Classical Shadow Tomography CLI
//!
//! A command-line interface for the two halves of the classical-shadow
//! protocol: planning which Pauli bases to measure, and predicting
//! properties from a recorded measurement log.
//!
//! Features:
//! - Modern CLI with clap derive macros
//! - Structured logging with tracing
//! - Progress indicators
//! - Colored output

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use qshadow_core::{ObservableRegistry, SubsystemRegistry};
use qshadow_estimator::{estimate_entropy, estimate_observables};
use qshadow_io::{write_estimate_line, write_shot_line, MeasurementLog};
use qshadow_planner::{DerandomizedPlanner, RandomizedPlanner};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Classical shadow tomography: plan Pauli measurements, predict
/// properties from the recorded outcomes.
#[derive(Parser)]
#[command(name = "qshadow")]
#[command(version)]
#[command(about = "Classical shadow tomography toolkit", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for numeric results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Derandomized planner: greedy Pauli measurement settings that
    /// guarantee per-observable coverage (component C5)
    PlanDerandomized {
        /// Per-observable measurement budget K
        #[arg(long)]
        k: u64,

        /// Observable file (see file format docs)
        #[arg(long)]
        observables: PathBuf,

        /// Multiplicative-weight-update hyperparameter η
        #[arg(long, default_value_t = 0.9)]
        eta: f64,

        /// Safety limit on the number of shots before giving up
        #[arg(long)]
        max_shots: Option<u64>,

        /// Write shots here instead of standard output
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Randomized planner: i.i.d. uniform Pauli measurement settings
    /// (component C4)
    PlanRandomized {
        /// Total number of shots to emit
        #[arg(long)]
        shots: u64,

        /// System size (number of qubits)
        #[arg(long)]
        qubits: usize,

        /// Explicit RNG seed; omit for a fresh seed each run
        #[arg(long)]
        seed: Option<u64>,

        /// Write shots here instead of standard output
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Predict k-local Pauli observable expectation values (component C6)
    PredictObservables {
        /// Measurement log file
        #[arg(long)]
        measurements: PathBuf,

        /// Observable file
        #[arg(long)]
        observables: PathBuf,
    },

    /// Predict Rényi-2 entanglement entropy per subsystem (component C7)
    PredictEntropy {
        /// Measurement log file
        #[arg(long)]
        measurements: PathBuf,

        /// Subsystem file
        #[arg(long)]
        subsystems: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}", "warning: tracing subscriber already set".yellow());
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::PlanDerandomized {
            k,
            observables,
            eta,
            max_shots,
            out,
        } => run_plan_derandomized(&observables, k, eta, max_shots, out.as_deref()),
        Commands::PlanRandomized {
            shots,
            qubits,
            seed,
            out,
        } => run_plan_randomized(shots, qubits, seed, out.as_deref()),
        Commands::PredictObservables {
            measurements,
            observables,
        } => run_predict_observables(&measurements, &observables, &cli.format),
        Commands::PredictEntropy {
            measurements,
            subsystems,
        } => run_predict_entropy(&measurements, &subsystems, &cli.format),
    }
}

fn open_sink(out: Option<&std::path::Path>) -> anyhow::Result<Box<dyn Write>> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("failed to create \"{}\": {e}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn run_plan_derandomized(
    observables_path: &std::path::Path,
    k: u64,
    eta: f64,
    max_shots: Option<u64>,
    out: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let registry = ObservableRegistry::from_path(observables_path)?;
    let mut planner = DerandomizedPlanner::new(&registry, k, eta);
    let mut sink = open_sink(out)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] planning shot {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let mut write_err = None;
    let result = planner.plan(max_shots, None, |shot_index, axes, satisfied, total| {
        pb.set_message(format!("{shot_index} ({satisfied}/{total} satisfied)"));
        if let Err(e) = write_shot_line(&mut sink, axes) {
            write_err.get_or_insert(e);
        }
    });
    if let Some(e) = write_err {
        return Err(e.into());
    }
    pb.finish_and_clear();
    sink.flush()?;

    let shots = result?;
    tracing::info!(shots, "derandomized planning complete");
    Ok(())
}

fn run_plan_randomized(
    shots: u64,
    qubits: usize,
    seed: Option<u64>,
    out: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let mut planner = match seed {
        Some(seed) => RandomizedPlanner::seeded(seed),
        None => RandomizedPlanner::fresh(),
    };
    let mut sink = open_sink(out)?;

    for _ in 0..shots {
        let shot = planner.next_shot(qubits);
        write_shot_line(&mut sink, &shot)?;
    }
    sink.flush()?;

    tracing::info!(shots, qubits, "randomized planning complete");
    Ok(())
}

fn run_predict_observables(
    measurements_path: &std::path::Path,
    observables_path: &std::path::Path,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let log = MeasurementLog::from_path(measurements_path)?;
    let registry = ObservableRegistry::from_path(observables_path)?;
    if log.system_size != registry.system_size {
        anyhow::bail!(
            "system size mismatch: measurements have {}, observables have {}",
            log.system_size,
            registry.system_size
        );
    }

    let estimates = estimate_observables(&log, &registry);
    let values: Vec<f64> = estimates.iter().map(|e| e.value).collect();

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for value in &values {
                write_estimate_line(&mut stdout, *value)?;
            }
        }
        OutputFormat::Json => {
            writeln!(stdout, "{}", qshadow_io::estimates_to_json(&values))?;
        }
    }
    Ok(())
}

fn run_predict_entropy(
    measurements_path: &std::path::Path,
    subsystems_path: &std::path::Path,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let log = MeasurementLog::from_path(measurements_path)?;
    let registry = SubsystemRegistry::from_path(subsystems_path)?;
    if log.system_size != registry.system_size {
        anyhow::bail!(
            "system size mismatch: measurements have {}, subsystems have {}",
            log.system_size,
            registry.system_size
        );
    }

    let mut values = Vec::with_capacity(registry.subsystems().len());
    for subsystem in registry.subsystems() {
        values.push(estimate_entropy(&log, subsystem)?);
    }

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for value in &values {
                write_estimate_line(&mut stdout, *value)?;
            }
        }
        OutputFormat::Json => {
            writeln!(stdout, "{}", qshadow_io::estimates_to_json(&values))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
