//! Newtonian gravity between every pair of particles
//!
//! Consumes a [`SeparationMatrix`] and the particle masses and produces:
//! - the net force on each particle (row sum of the pair force matrix)
//! - the total potential energy, each unordered pair counted once
//!
//! No softening is applied. Two particles at the same position make the
//! force undefined; particle sets must never contain coincident positions.

use crate::simulation::separations::SeparationMatrix;
use crate::simulation::states::{NVec3, Particle};

/// Gravitational constant in simulation units
pub const G: f64 = 1.0;

/// Net forces and potential for one particle configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ForcePotential {
    pub forces: Vec<NVec3>, // net force on each particle
    pub potential: f64, // total potential energy
}

/// Separations, net forces and potential, all at the same positions
#[derive(Debug, Clone, PartialEq)]
pub struct ForceEvaluation {
    pub separations: SeparationMatrix,
    pub forces: Vec<NVec3>,
    pub potential: f64,
}

impl ForceEvaluation {
    /// Evaluate everything at the particles' current positions
    pub fn at(particles: &[Particle]) -> Self {
        let separations = SeparationMatrix::compute(particles);
        let ForcePotential { forces, potential } = compute_forces_potential(particles, &separations);
        Self {
            separations,
            forces,
            potential,
        }
    }
}

/// Force exerted on particle `i` by particle `j`:
/// `F[i][j] = G m_i m_j S[i][j] / |S[i][j]|^3`
pub fn pair_force(particles: &[Particle], seps: &SeparationMatrix, i: usize, j: usize) -> NVec3 {
    let r = seps.get(i, j);
    let d = r.norm();
    G * particles[i].mass() * particles[j].mass() * r / (d * d * d)
}

/// Compute the net force on every particle and the total potential.
/// Every unordered pair is evaluated exactly once.
pub fn compute_forces_potential(particles: &[Particle], seps: &SeparationMatrix) -> ForcePotential {
    let n = particles.len();
    let mut forces = vec![NVec3::zeros(); n];
    let mut potential = 0.0;

    // Loop over each unordered pair (i, j) with i < j
    for (i, j) in seps.pairs() {
        let mi = particles[i].mass();
        let mj = particles[j].mass();

        // r points from i to j, so i is pulled along +r and j along -r
        let r = seps.get(i, j);
        let d = r.norm();

        // G m_i m_j / |r|^3
        let coef = G * mi * mj / (d * d * d);
        let f = coef * r;

        // equal and opposite
        forces[i] += f;
        forces[j] -= f;

        potential += -G * mi * mj / d;
    }

    ForcePotential { forces, potential }
}

/// Full n x n pair force matrix, kept for inspection of the
/// antisymmetry `F[i][j] == -F[j][i]`
#[derive(Debug, Clone, PartialEq)]
pub struct ForceMatrix {
    n: usize,
    data: Vec<NVec3>,
}

impl ForceMatrix {
    /// Upper triangle from [`pair_force`], lower triangle by negation
    pub fn compute(particles: &[Particle], seps: &SeparationMatrix) -> Self {
        let n = particles.len();
        let mut data = vec![NVec3::zeros(); n * n];

        for (i, j) in seps.pairs() {
            let f = pair_force(particles, seps, i, j);
            data[i * n + j] = f;
            data[j * n + i] = -f;
        }

        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Force on `i` due to `j`
    pub fn get(&self, i: usize, j: usize) -> NVec3 {
        self.data[i * self.n + j]
    }

    /// Net force on particle `i`: the sum of row `i`
    pub fn net_force(&self, i: usize) -> NVec3 {
        self.data[i * self.n..(i + 1) * self.n]
            .iter()
            .fold(NVec3::zeros(), |acc, f| acc + f)
    }

    /// Row sums for every particle
    pub fn net_forces(&self) -> Vec<NVec3> {
        (0..self.n).map(|i| self.net_force(i)).collect()
    }
}
