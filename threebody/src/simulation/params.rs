//! Numerical parameters for a single run
//!
//! `RunConfig` holds runtime settings:
//! - integration step size `dt` and the integrator order,
//! - proximity threshold for the divergence guard,
//! - output cadence in simulated time,
//! - the derived total time and integration step count
//!
//! The derived values follow the run-file convention: the user asks for a
//! number of output steps, so `total_time = requested_steps * output_interval`
//! and `integration_steps = floor(total_time / dt)`.

use crate::error::{Result, SimError};
use crate::simulation::integrator::IntegratorOrder;

/// Largest accepted integration step
pub const MAX_TIME_STEP: f64 = 0.05;

/// Pair distance beyond which a run is considered divergent
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 100.0;

/// Simulated time between two output records
pub const DEFAULT_OUTPUT_INTERVAL: f64 = 0.1;

/// Upper bound on integration steps per run. The conservation history keeps
/// one sample per step, so this caps it at a few gigabytes.
pub const MAX_INTEGRATION_STEPS: usize = 50_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    dt: f64, // integration step
    order: IntegratorOrder, // integrator used for the whole run
    proximity_threshold: f64, // divergence distance
    output_interval: f64, // simulated time between records
    requested_steps: usize, // number of output intervals asked for
}

impl RunConfig {
    /// Build and validate a run configuration with the default threshold
    /// and output interval
    pub fn new(requested_steps: usize, dt: f64, order: IntegratorOrder) -> Result<Self> {
        let cfg = Self {
            dt,
            order,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            output_interval: DEFAULT_OUTPUT_INTERVAL,
            requested_steps,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_proximity_threshold(mut self, threshold: f64) -> Result<Self> {
        self.proximity_threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    pub fn with_output_interval(mut self, interval: f64) -> Result<Self> {
        self.output_interval = interval;
        self.validate()?;
        Ok(self)
    }

    /// Same parameters, different integrator
    pub fn with_order(mut self, order: IntegratorOrder) -> Self {
        self.order = order;
        self
    }

    /// Reject anything that would make the step loop meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidTimeStep(self.dt));
        }
        if self.dt > MAX_TIME_STEP {
            return Err(SimError::TimeStepTooLarge {
                dt: self.dt,
                max: MAX_TIME_STEP,
            });
        }
        if !self.proximity_threshold.is_finite() || self.proximity_threshold <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "proximity threshold must be positive, got {}",
                self.proximity_threshold
            )));
        }
        if !self.output_interval.is_finite() || self.output_interval <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "output interval must be positive, got {}",
                self.output_interval
            )));
        }
        if self.requested_steps == 0 {
            return Err(SimError::InvalidParameter(
                "requested output steps must be at least 1".to_string(),
            ));
        }
        // in f64 so a huge request cannot saturate the usize conversion
        let steps = (self.total_time() / self.dt).floor();
        if steps > MAX_INTEGRATION_STEPS as f64 {
            return Err(SimError::InvalidParameter(format!(
                "{} output steps at dt = {} need {:e} integration steps, at most {} allowed",
                self.requested_steps, self.dt, steps, MAX_INTEGRATION_STEPS
            )));
        }
        Ok(())
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn order(&self) -> IntegratorOrder {
        self.order
    }

    pub fn proximity_threshold(&self) -> f64 {
        self.proximity_threshold
    }

    pub fn output_interval(&self) -> f64 {
        self.output_interval
    }

    pub fn requested_steps(&self) -> usize {
        self.requested_steps
    }

    /// requested_steps * output_interval
    pub fn total_time(&self) -> f64 {
        self.requested_steps as f64 * self.output_interval
    }

    /// floor(total_time / dt)
    pub fn integration_steps(&self) -> usize {
        (self.total_time() / self.dt).floor() as usize
    }
}
