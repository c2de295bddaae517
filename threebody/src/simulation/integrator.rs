//! Fixed-step time integrators for the few-body system
//!
//! Four interchangeable schemes, selected once per run through
//! [`IntegratorOrder`]:
//! - order 1: explicit Euler
//! - order 2: velocity Verlet
//! - order 3: 3-stage symplectic composition (Ruth)
//! - order 4: 4-stage symplectic composition (triple jump)
//!
//! Every scheme receives the net forces at the current positions and mutates
//! the particles in place. A stage is always applied to every particle before
//! the next stage starts. A scheme that already evaluated the forces at the
//! final positions hands that evaluation back so the driver can skip its own.

use std::fmt;

use serde::Deserialize;

use crate::error::SimError;
use crate::simulation::forces::ForceEvaluation;
use crate::simulation::states::{NVec3, Particle};

/// Which integrator a run uses.
/// Config names: "euler", "verlet", "symplectic3", "symplectic4"
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegratorOrder {
    #[serde(rename = "euler")] // 1st order, unbounded energy drift
    Euler,

    #[serde(rename = "verlet")] // 2nd order, time symmetric
    Verlet,

    #[serde(rename = "symplectic3")] // 3rd order, 3 force evaluations per step
    Symplectic3,

    #[serde(rename = "symplectic4")] // 4th order, 4 force evaluations per step
    Symplectic4,
}

impl IntegratorOrder {
    pub const ALL: [IntegratorOrder; 4] = [
        IntegratorOrder::Euler,
        IntegratorOrder::Verlet,
        IntegratorOrder::Symplectic3,
        IntegratorOrder::Symplectic4,
    ];

    /// Numeric selector, 1 to 4
    pub fn order(self) -> u8 {
        match self {
            IntegratorOrder::Euler => 1,
            IntegratorOrder::Verlet => 2,
            IntegratorOrder::Symplectic3 => 3,
            IntegratorOrder::Symplectic4 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IntegratorOrder::Euler => "euler",
            IntegratorOrder::Verlet => "verlet",
            IntegratorOrder::Symplectic3 => "symplectic3",
            IntegratorOrder::Symplectic4 => "symplectic4",
        }
    }

    /// Build the step procedure for this order
    pub fn integrator(self) -> Box<dyn Integrator> {
        match self {
            IntegratorOrder::Euler => Box::new(Euler),
            IntegratorOrder::Verlet => Box::new(VelocityVerlet),
            IntegratorOrder::Symplectic3 => Box::new(Symplectic::third_order()),
            IntegratorOrder::Symplectic4 => Box::new(Symplectic::fourth_order()),
        }
    }
}

impl TryFrom<u8> for IntegratorOrder {
    type Error = SimError;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        match order {
            1 => Ok(IntegratorOrder::Euler),
            2 => Ok(IntegratorOrder::Verlet),
            3 => Ok(IntegratorOrder::Symplectic3),
            4 => Ok(IntegratorOrder::Symplectic4),
            other => Err(SimError::UnknownIntegratorOrder(other)),
        }
    }
}

impl fmt::Display for IntegratorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (order {})", self.name(), self.order())
    }
}

/// A single-step time integrator
pub trait Integrator {
    /// Advance every particle by one step of size `dt`.
    ///
    /// `forces[i]` is the net force on particle `i` at the current positions.
    /// Returns the force evaluation at the new positions when the step
    /// computed one anyway, `None` otherwise.
    fn step(&self, particles: &mut [Particle], dt: f64, forces: &[NVec3]) -> Option<ForceEvaluation>;
}

/// Explicit Euler (1st order)
///
/// Positions move with the old velocities, then velocities take the
/// pre-update forces. Not symmetric in time; energy drifts without bound.
/// Included for comparison only.
pub struct Euler;

impl Integrator for Euler {
    fn step(&self, particles: &mut [Particle], dt: f64, forces: &[NVec3]) -> Option<ForceEvaluation> {
        // x_n+1 = x_n + dt v_n
        for p in particles.iter_mut() {
            p.update_position_euler(dt);
        }

        // v_n+1 = v_n + dt F_n / m, using the same forces as the drift
        for (p, f) in particles.iter_mut().zip(forces.iter()) {
            p.update_velocity_euler(dt, f);
        }
        None
    }
}

/// Velocity Verlet (2nd order)
///
/// 1. x_n+1 = x_n + dt v_n + dt^2 F_n / (2m)
/// 2. F_n+1 from x_n+1
/// 3. v_n+1 = v_n + dt (F_n + F_n+1) / (2m)
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn step(&self, particles: &mut [Particle], dt: f64, forces: &[NVec3]) -> Option<ForceEvaluation> {
        for (p, f) in particles.iter_mut().zip(forces.iter()) {
            p.update_position_2nd(dt, f);
        }

        // forces at the new positions; the velocity update leaves them valid
        let eval = ForceEvaluation::at(particles);

        for ((p, f_old), f_new) in particles.iter_mut().zip(forces.iter()).zip(eval.forces.iter()) {
            p.update_velocity_2nd(dt, f_old, f_new);
        }
        Some(eval)
    }
}

/// Symplectic composition of kick/drift stages.
///
/// Stage k, applied to all particles before stage k+1:
/// 1. forces from the current positions
/// 2. kick: v += c_k dt F / m
/// 3. drift: x += d_k dt v
#[derive(Debug, Clone, PartialEq)]
pub struct Symplectic {
    c: Vec<f64>, // kick coefficients
    d: Vec<f64>, // drift coefficients
}

impl Symplectic {
    /// Ruth's 3rd order scheme
    pub fn third_order() -> Self {
        Self {
            c: vec![7.0 / 24.0, 3.0 / 4.0, -1.0 / 24.0],
            d: vec![2.0 / 3.0, -2.0 / 3.0, 1.0],
        }
    }

    /// 4th order triple jump. The last drift coefficient is exactly zero,
    /// so a step ends on a kick.
    pub fn fourth_order() -> Self {
        let cbrt2 = 2.0_f64.cbrt();
        let alpha = 1.0 / (2.0 * (2.0 - cbrt2));
        let beta = (1.0 - cbrt2) * alpha;
        let w1 = 1.0 / (2.0 - cbrt2);
        let w0 = -cbrt2 / (2.0 - cbrt2);

        Self {
            c: vec![alpha, beta, beta, alpha],
            d: vec![w1, w0, w1, 0.0],
        }
    }

    pub fn stages(&self) -> usize {
        self.c.len()
    }

    /// Kick coefficients c_k
    pub fn kick_coefficients(&self) -> &[f64] {
        &self.c
    }

    /// Drift coefficients d_k
    pub fn drift_coefficients(&self) -> &[f64] {
        &self.d
    }
}

impl Integrator for Symplectic {
    fn step(&self, particles: &mut [Particle], dt: f64, _forces: &[NVec3]) -> Option<ForceEvaluation> {
        let mut last = None;
        for (&c, &d) in self.c.iter().zip(self.d.iter()) {
            // every stage starts from freshly computed forces
            let eval = ForceEvaluation::at(particles);

            for (p, f) in particles.iter_mut().zip(eval.forces.iter()) {
                p.update_velocity_symplectic(dt, f, c);
            }

            for p in particles.iter_mut() {
                p.update_position_symplectic(dt, d);
            }
            last = Some((eval, d));
        }

        // a zero final drift leaves the last stage's positions in place
        match last {
            Some((eval, d)) if d == 0.0 => Some(eval),
            _ => None,
        }
    }
}
