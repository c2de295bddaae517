//! Divergence guard
//!
//! Scans every unordered pair of a separation matrix and reports the first
//! pair whose distance strictly exceeds the threshold. A breach ends the run
//! as `Terminated`; it is an outcome, not an error.

use crate::simulation::separations::SeparationMatrix;

/// The pair that tripped the guard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityBreach {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityGuard {
    threshold: f64,
}

impl ProximityGuard {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// First pair (in row order) with `|S[i][j]| > threshold`, if any
    pub fn check(&self, seps: &SeparationMatrix) -> Option<ProximityBreach> {
        seps.pairs().find_map(|(i, j)| {
            let distance = seps.distance(i, j);
            (distance > self.threshold).then_some(ProximityBreach { i, j, distance })
        })
    }
}
