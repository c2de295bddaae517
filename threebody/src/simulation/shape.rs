//! Shape-sphere projection for three-body configurations
//!
//! A configuration of three particles is reduced to its Jacobi vectors
//! `z1 = (x3 - x2) / sqrt(2)` and `z2 = sqrt(2/3) (x1 - (x2 + x3) / 2)`, then
//! sent through the Hopf map
//! `u = (|z1|^2 - |z2|^2, 2 z1.z2, 2 (z1 x z2)_z)` and normalised onto the
//! unit sphere. Translations and uniform scaling drop out, as do rotations in
//! the xy plane, so periodic choreographies trace closed curves that can be
//! compared across integrators.
//!
//! The `u3` term only uses the z component of the cross product: the map
//! assumes motion in the xy plane.

use crate::simulation::engine::StateRecord;
use crate::simulation::states::{NVec3, Particle};

/// Project three positions onto the shape sphere.
/// `None` for a triple collision, where the shape is undefined.
pub fn shape_sphere_point(x1: &NVec3, x2: &NVec3, x3: &NVec3) -> Option<NVec3> {
    let z1 = (x3 - x2) / 2.0_f64.sqrt();
    let z2 = (2.0_f64 / 3.0).sqrt() * (x1 - (x2 + x3) / 2.0);

    let u = NVec3::new(
        z1.norm_squared() - z2.norm_squared(),
        2.0 * z1.dot(&z2),
        2.0 * (z1.x * z2.y - z1.y * z2.x),
    );
    let norm = u.norm();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(u / norm)
}

pub fn shape_sphere(particles: &[Particle; 3]) -> Option<NVec3> {
    shape_sphere_point(&particles[0].position(), &particles[1].position(), &particles[2].position())
}

/// Same projection for an emitted record; `None` unless it holds exactly
/// three particles in a non-degenerate configuration
pub fn record_shape(record: &StateRecord) -> Option<NVec3> {
    match record.particles.as_slice() {
        [a, b, c] => shape_sphere_point(&a.position, &b.position, &c.position),
        _ => None,
    }
}

/// Shape-sphere curve of a whole run, skipping records that do not project
pub fn shape_curve(records: &[StateRecord]) -> Vec<NVec3> {
    records.iter().filter_map(record_shape).collect()
}
