use std::time::Instant;

use crate::configuration::initial_conditions::InitialCondition;
use crate::error::Result;
use crate::output::trajectory::MemorySink;
use crate::simulation::engine::{RunOutcome, SimulationDriver};
use crate::simulation::integrator::IntegratorOrder;
use crate::simulation::params::RunConfig;

/// One row of the integrator comparison
#[derive(Debug, Clone, PartialEq)]
pub struct BenchRow {
    pub order: IntegratorOrder,
    pub steps: usize,
    pub ms_per_step: f64,
    pub energy_deviation: f64,
    pub terminated: bool,
}

/// Time a full run of `initial` for every integrator order.
/// Paste the printed CSV straight into a spreadsheet to compare.
pub fn bench_integrators(initial: &InitialCondition, base: &RunConfig) -> Result<Vec<BenchRow>> {
    println!("order,steps,ms_per_step,energy_deviation,terminated");

    let mut rows = Vec::with_capacity(IntegratorOrder::ALL.len());
    for order in IntegratorOrder::ALL {
        let driver = SimulationDriver::new(base.clone().with_order(order));
        let mut sink = MemorySink::new();

        let t0 = Instant::now();
        let summary = driver.run(initial, &mut sink)?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

        // a run that stops on the first step still took one step
        let steps = summary.steps_taken.max(1);
        let row = BenchRow {
            order,
            steps: summary.steps_taken,
            ms_per_step: elapsed_ms / steps as f64,
            energy_deviation: summary.stats.energy_deviation,
            terminated: matches!(summary.outcome, RunOutcome::Terminated { .. }),
        };

        println!(
            "{},{},{:.6},{:.6e},{}",
            order.order(),
            row.steps,
            row.ms_per_step,
            row.energy_deviation,
            row.terminated
        );
        rows.push(row);
    }
    Ok(rows)
}
