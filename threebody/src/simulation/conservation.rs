//! Conservation history for a run.
//!
//! Records total energy and linear momentum once per integration step so
//! the drift of each integrator can be measured after the run. The
//! statistics are read-only queries over the stored history.

use crate::simulation::states::{NVec3, Particle};

/// One row of the conservation history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationSample {
    pub time: f64,
    pub total_energy: f64, // kinetic + potential
    pub momentum_x: f64,
    pub momentum_y: f64,
    pub momentum_z: f64,
    pub momentum_total: f64, // m_x + m_y + m_z
}

impl ConservationSample {
    /// Measure the current state of `particles` with the given potential
    pub fn measure(time: f64, particles: &[Particle], potential: f64) -> Self {
        let p = Particle::total_momentum(particles);
        Self {
            time,
            total_energy: Particle::total_kinetic_energy(particles) + potential,
            momentum_x: p.x,
            momentum_y: p.y,
            momentum_z: p.z,
            momentum_total: p.x + p.y + p.z,
        }
    }

    pub fn momentum(&self) -> NVec3 {
        NVec3::new(self.momentum_x, self.momentum_y, self.momentum_z)
    }
}

/// Post-run conservation statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationStats {
    /// |E_max - E_min| / |E_0|
    pub energy_deviation: f64,
    /// |max - min| of the x momentum
    pub momentum_spread_x: f64,
    /// |max - min| of the y momentum
    pub momentum_spread_y: f64,
}

/// Append-only energy and momentum history.
///
/// The baseline is the state at t = 0, after the centre-of-mass correction.
/// It is the reference value for the relative energy deviation and takes
/// part in the min/max ranges.
#[derive(Debug, Clone)]
pub struct ConservationTracker {
    baseline: ConservationSample,
    history: Vec<ConservationSample>,
}

impl ConservationTracker {
    pub fn new(baseline: ConservationSample) -> Self {
        Self {
            baseline,
            history: Vec::new(),
        }
    }

    /// Append the measurement for one integration step
    pub fn record(&mut self, time: f64, particles: &[Particle], potential: f64) -> ConservationSample {
        let sample = ConservationSample::measure(time, particles, potential);
        self.history.push(sample);
        sample
    }

    pub fn baseline(&self) -> &ConservationSample {
        &self.baseline
    }

    /// One sample per executed step, in step order
    pub fn history(&self) -> &[ConservationSample] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn last(&self) -> Option<&ConservationSample> {
        self.history.last()
    }

    /// (min, max) of a field over the baseline and every recorded step
    fn range(&self, field: impl Fn(&ConservationSample) -> f64) -> (f64, f64) {
        let first = field(&self.baseline);
        self.history
            .iter()
            .map(field)
            .fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    pub fn energy_range(&self) -> (f64, f64) {
        self.range(|s| s.total_energy)
    }

    pub fn momentum_x_range(&self) -> (f64, f64) {
        self.range(|s| s.momentum_x)
    }

    pub fn momentum_y_range(&self) -> (f64, f64) {
        self.range(|s| s.momentum_y)
    }

    /// |E_max - E_min| / |E_0|. A zero baseline energy gives the absolute spread.
    pub fn energy_deviation(&self) -> f64 {
        let (lo, hi) = self.energy_range();
        let initial = self.baseline.total_energy.abs();
        if initial > 0.0 {
            (hi - lo).abs() / initial
        } else {
            (hi - lo).abs()
        }
    }

    pub fn momentum_spread_x(&self) -> f64 {
        let (lo, hi) = self.momentum_x_range();
        (hi - lo).abs()
    }

    pub fn momentum_spread_y(&self) -> f64 {
        let (lo, hi) = self.momentum_y_range();
        (hi - lo).abs()
    }

    pub fn stats(&self) -> ConservationStats {
        ConservationStats {
            energy_deviation: self.energy_deviation(),
            momentum_spread_x: self.momentum_spread_x(),
            momentum_spread_y: self.momentum_spread_y(),
        }
    }
}
