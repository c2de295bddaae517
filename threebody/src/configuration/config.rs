//! Run-file configuration loaded from YAML.
//!
//! A thin, `serde`-deserializable description of a batch of runs:
//!
//! - [`RunParametersConfig`] – step size, output cadence and guard threshold
//! - [`RunFileConfig`]       – top-level wrapper: parameters, integrators to
//!   sweep, the initial-condition file and the output directory
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   output_steps: 1000         # number of output intervals to simulate
//!   dt: 0.01                   # integration step, at most 0.05
//!   output_interval: 0.1       # simulated time between records
//!   proximity_threshold: 100.0 # stop when any pair is further apart
//!
//! integrators: [euler, verlet, symplectic3, symplectic4]
//! initial_conditions: initial_conditions.txt
//! output_dir: position_files
//! ```
//!
//! Relative paths are resolved against the directory holding the YAML file.
//! The runtime [`RunConfig`] is built from this with [`RunFileConfig::run_config`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::simulation::integrator::IntegratorOrder;
use crate::simulation::params::{RunConfig, DEFAULT_OUTPUT_INTERVAL, DEFAULT_PROXIMITY_THRESHOLD};

fn default_output_interval() -> f64 {
    DEFAULT_OUTPUT_INTERVAL
}

fn default_proximity_threshold() -> f64 {
    DEFAULT_PROXIMITY_THRESHOLD
}

fn default_integrators() -> Vec<IntegratorOrder> {
    IntegratorOrder::ALL.to_vec()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("position_files")
}

/// Numerical parameters shared by every run in the file
#[derive(Deserialize, Debug, Clone)]
pub struct RunParametersConfig {
    pub output_steps: usize, // requested output intervals
    pub dt: f64, // integration step
    #[serde(default = "default_output_interval")]
    pub output_interval: f64, // simulated time between records
    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold: f64, // divergence distance
}

/// Top-level run file
#[derive(Deserialize, Debug, Clone)]
pub struct RunFileConfig {
    pub parameters: RunParametersConfig,
    #[serde(default = "default_integrators")]
    pub integrators: Vec<IntegratorOrder>, // swept in the listed order
    pub initial_conditions: PathBuf, // particle file
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf, // trajectories land in <output_dir>/<order>/<name>.txt
}

impl RunFileConfig {
    /// Read a run file and resolve its relative paths against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SimError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: RunFileConfig = serde_yaml::from_reader(BufReader::new(file))?;

        if let Some(base) = path.parent() {
            cfg.initial_conditions = base.join(&cfg.initial_conditions);
            cfg.output_dir = base.join(&cfg.output_dir);
        }
        Ok(cfg)
    }

    /// Parse a run file from a string; paths are left as written
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Validated runtime configuration for one integrator
    pub fn run_config(&self, order: IntegratorOrder) -> Result<RunConfig> {
        let p = &self.parameters;
        RunConfig::new(p.output_steps, p.dt, order)?
            .with_output_interval(p.output_interval)?
            .with_proximity_threshold(p.proximity_threshold)
    }
}
