//! Error types for threebody.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("initial-condition source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed particle record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("time step {dt} exceeds the allowed maximum {max}")]
    TimeStepTooLarge { dt: f64, max: f64 },

    #[error("unknown integrator order {0}, expected 1, 2, 3 or 4")]
    UnknownIntegratorOrder(u8),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("cannot run a simulation with no particles")]
    EmptySystem,

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("run file parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
