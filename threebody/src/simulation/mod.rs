pub mod states;
pub mod separations;
pub mod forces;
pub mod integrator;
pub mod conservation;
pub mod guard;
pub mod shape;
pub mod params;
pub mod engine;
