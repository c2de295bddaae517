//! Output sinks for simulation runs
//!
//! - [`TrajectoryWriter`] writes the plain-text trajectory format
//! - [`MemorySink`] keeps records and the final summary in memory
//!
//! Trajectory record layout:
//!
//! ```text
//! dMomentum = <dpx> <dpy> <dpz>
//! dEnergy = <dE>
//! <label> <x> <y> <z> <vx> <vy> <vz>     (one line per particle)
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::simulation::conservation::{ConservationSample, ConservationTracker};
use crate::simulation::engine::{OutputSink, RunSummary, StateRecord};
use crate::simulation::integrator::IntegratorOrder;

/// `<output_dir>/<order>/<name>.txt`
pub fn trajectory_path(output_dir: &Path, order: IntegratorOrder, name: &str) -> PathBuf {
    output_dir
        .join(order.order().to_string())
        .join(format!("{}.txt", name))
}

/// Writes records to any `Write` in the trajectory format
pub struct TrajectoryWriter<W: Write> {
    out: W,
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TrajectoryWriter<BufWriter<File>> {
    /// Create the file (and its parent directories) for one run
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> OutputSink for TrajectoryWriter<W> {
    fn write_record(&mut self, record: &StateRecord) -> Result<()> {
        writeln!(
            self.out,
            "dMomentum = {:.6e} {:.6e} {:.6e}",
            record.d_momentum.x, record.d_momentum.y, record.d_momentum.z
        )?;
        writeln!(self.out, "dEnergy = {:.6e}", record.d_energy)?;
        for p in &record.particles {
            writeln!(
                self.out,
                "{} {} {} {} {} {} {}",
                p.label,
                p.position.x,
                p.position.y,
                p.position.z,
                p.velocity.x,
                p.velocity.y,
                p.velocity.z
            )?;
        }
        Ok(())
    }

    fn diagnostics(&mut self, _summary: &RunSummary, _history: &ConservationTracker) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Collects everything a run produces
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub records: Vec<StateRecord>,
    pub summary: Option<RunSummary>,
    pub history: Vec<ConservationSample>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for MemorySink {
    fn write_record(&mut self, record: &StateRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn diagnostics(&mut self, summary: &RunSummary, history: &ConservationTracker) -> Result<()> {
        self.summary = Some(summary.clone());
        self.history = history.history().to_vec();
        Ok(())
    }
}
