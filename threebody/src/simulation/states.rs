//! Core particle state for the few-body simulation.
//!
//! Defines the 3d point mass `Particle` using `NVec3`, plus the
//! system-wide helpers the driver needs:
//! - total kinetic energy and total momentum of a particle set
//! - centre-of-mass velocity, used to zero the net momentum before a run
//!
//! Positions and velocities only change through the `update_*` methods,
//! one pair per integrator family.

use std::fmt;

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    label: String, // name from the initial condition file
    mass: f64, // fixed after construction
    x: NVec3, // position
    v: NVec3, // velocity
}

impl Particle {
    /// Create a particle. Callers guarantee `mass > 0`.
    pub fn new(label: impl Into<String>, mass: f64, x: NVec3, v: NVec3) -> Self {
        Self {
            label: label.into(),
            mass,
            x,
            v,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> NVec3 {
        self.x
    }

    pub fn velocity(&self) -> NVec3 {
        self.v
    }

    /// 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.v.norm_squared()
    }

    /// m v
    pub fn momentum(&self) -> NVec3 {
        self.mass * self.v
    }

    // =====================================================================
    // 1st order (Euler)
    // =====================================================================

    /// r <- r + dt v
    pub fn update_position_euler(&mut self, dt: f64) {
        self.x += dt * self.v;
    }

    /// v <- v + dt F / m
    pub fn update_velocity_euler(&mut self, dt: f64, force: &NVec3) {
        self.v += dt * *force / self.mass;
    }

    // =====================================================================
    // 2nd order (velocity Verlet)
    // =====================================================================

    /// r <- r + dt v + dt^2 F / (2m)
    pub fn update_position_2nd(&mut self, dt: f64, force: &NVec3) {
        self.x += dt * self.v + (dt * dt) * *force / (2.0 * self.mass);
    }

    /// Verlet completion: v <- v + dt (F_old + F_new) / (2m)
    pub fn update_velocity_2nd(&mut self, dt: f64, force_old: &NVec3, force_new: &NVec3) {
        self.v += dt * (*force_old + *force_new) / (2.0 * self.mass);
    }

    // =====================================================================
    // Symplectic stages
    // =====================================================================

    /// Drift stage: r <- r + d_k dt v
    pub fn update_position_symplectic(&mut self, dt: f64, d_coeff: f64) {
        self.x += d_coeff * dt * self.v;
    }

    /// Kick stage: v <- v + c_k dt F / m
    pub fn update_velocity_symplectic(&mut self, dt: f64, force: &NVec3, c_coeff: f64) {
        self.v += c_coeff * dt * *force / self.mass;
    }

    /// Used by the driver to remove the centre-of-mass drift at start-up.
    pub(crate) fn subtract_velocity(&mut self, dv: &NVec3) {
        self.v -= *dv;
    }

    // =====================================================================
    // Whole-system helpers
    // =====================================================================

    /// Sum of 1/2 m v^2 over every particle
    pub fn total_kinetic_energy(particles: &[Particle]) -> f64 {
        particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Sum of m v over every particle
    pub fn total_momentum(particles: &[Particle]) -> NVec3 {
        particles
            .iter()
            .fold(NVec3::zeros(), |acc, p| acc + p.momentum())
    }

    /// Mass-weighted mean velocity of the set.
    /// An empty set has no centre of mass; zero is returned.
    pub fn com_velocity(particles: &[Particle]) -> NVec3 {
        let total_mass: f64 = particles.iter().map(Particle::mass).sum();
        if total_mass == 0.0 {
            return NVec3::zeros();
        }
        Particle::total_momentum(particles) / total_mass
    }
}

/// XYZ-style line: `label    x y z`
impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}    {} {} {}", self.label, self.x.x, self.x.y, self.x.z)
    }
}
