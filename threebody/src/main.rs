use threebody::{bench_integrators, load_initial_conditions, trajectory_path};
use threebody::{IntegratorOrder, RunConfig, RunFileConfig, RunOutcome, RunSummary, SimulationDriver, TrajectoryWriter};

use anyhow::{Context, Result};
use clap::Parser;

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Compare Euler, Verlet and symplectic integrators on few-body gravity")]
struct Args {
    /// Run file; relative names are looked up in scenarios/ when not found
    #[arg(short, long = "file", default_value = "run.yaml")]
    file_name: String,

    /// Override the number of output intervals to simulate
    #[arg(long)]
    steps: Option<usize>,

    /// Override the integration step (at most 0.05)
    #[arg(long)]
    dt: Option<f64>,

    /// Integrator order 1-4; repeat to run several
    #[arg(short, long = "method")]
    methods: Vec<u8>,

    /// Override the initial-condition file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the trajectory output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the proximity threshold
    #[arg(long)]
    proximity: Option<f64>,

    /// Time every integrator on each configuration instead of writing trajectories
    #[arg(long)]
    bench: bool,
}

fn resolve_run_file(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() || direct.is_absolute() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_run_file(args: &Args) -> Result<RunFileConfig> {
    let path = resolve_run_file(&args.file_name);
    let mut cfg = RunFileConfig::load(&path)
        .with_context(|| format!("failed to load run file {}", path.display()))?;

    if let Some(steps) = args.steps {
        cfg.parameters.output_steps = steps;
    }
    if let Some(dt) = args.dt {
        cfg.parameters.dt = dt;
    }
    if let Some(threshold) = args.proximity {
        cfg.parameters.proximity_threshold = threshold;
    }
    if let Some(input) = &args.input {
        cfg.initial_conditions = input.clone();
    }
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = dir.clone();
    }
    if !args.methods.is_empty() {
        cfg.integrators = args
            .methods
            .iter()
            .map(|&m| IntegratorOrder::try_from(m))
            .collect::<threebody::Result<_>>()?;
    }
    Ok(cfg)
}

fn print_statistics(summary: &RunSummary, path: &Path) {
    println!("\nStatistics for {} ({}):", summary.name, summary.order);
    if let RunOutcome::Terminated { step, time, breach } = summary.outcome {
        println!(
            "Terminated at step {} (t = {:.4}): particles {} and {} at distance {:.6e}",
            step, time, breach.i, breach.j, breach.distance
        );
    }
    println!("Energy Deviation: {:.6e}", summary.stats.energy_deviation);
    println!("Maximum Difference in Momentum (x-direction): {:.6e}", summary.stats.momentum_spread_x);
    println!("Maximum Difference in Momentum (y-direction): {:.6e}", summary.stats.momentum_spread_y);
    println!("Data saved to {}", path.display());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let run_file = load_run_file(&args)?;

    // every configuration is validated before any stepping starts
    let configs: Vec<RunConfig> = run_file
        .integrators
        .iter()
        .map(|&order| run_file.run_config(order))
        .collect::<threebody::Result<_>>()
        .context("invalid run parameters")?;

    let conditions = load_initial_conditions(&run_file.initial_conditions)?;

    let start = Instant::now();
    println!(
        "Found {} configurations in {}",
        conditions.len(),
        run_file.initial_conditions.display()
    );
    if let Some(cfg) = configs.first() {
        println!("Will simulate for {} time units", cfg.total_time());
        println!("Using {} integration steps with dt={}", cfg.integration_steps(), cfg.dt());
    }

    if args.bench {
        let base = run_file.run_config(IntegratorOrder::Euler)?;
        for initial in &conditions {
            println!("\n{}", initial.name);
            bench_integrators(initial, &base)?;
        }
        return Ok(());
    }

    for initial in &conditions {
        for cfg in &configs {
            let path = trajectory_path(&run_file.output_dir, cfg.order(), &initial.name);
            let mut writer = TrajectoryWriter::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;

            let summary = SimulationDriver::new(cfg.clone())
                .run(initial, &mut writer)
                .with_context(|| format!("run of {} with {} failed", initial.name, cfg.order()))?;
            print_statistics(&summary, &path);
        }
    }

    println!("\nTotal run time: {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}
