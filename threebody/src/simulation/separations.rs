//! Pairwise separation matrix
//!
//! `S[i][j] = x_j - x_i` for every ordered pair. Only the upper triangle is
//! computed; the lower triangle is filled by negating it, so
//! `S[j][i] == -S[i][j]` holds bit for bit. The matrix is always rebuilt from
//! the current positions and never updated incrementally.

use super::states::{NVec3, Particle};

#[derive(Debug, Clone, PartialEq)]
pub struct SeparationMatrix {
    n: usize, // number of particles
    data: Vec<NVec3>, // row-major n x n
}

impl SeparationMatrix {
    /// Build the full n x n displacement matrix for `particles`
    pub fn compute(particles: &[Particle]) -> Self {
        let n = particles.len();
        let mut data = vec![NVec3::zeros(); n * n];

        for i in 0..n {
            let xi = particles[i].position();
            for j in (i + 1)..n {
                // r points from i to j
                let r = particles[j].position() - xi;
                data[i * n + j] = r;
                data[j * n + i] = -r;
            }
        }

        Self { n, data }
    }

    /// Number of particles the matrix was built for
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Displacement from particle `i` to particle `j`
    pub fn get(&self, i: usize, j: usize) -> NVec3 {
        self.data[i * self.n + j]
    }

    /// |S[i][j]|
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).norm()
    }

    /// Every unordered pair `(i, j)` with `i < j`, in row order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.n;
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }
}
