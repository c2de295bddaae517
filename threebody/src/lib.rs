pub mod error;
pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use error::{Result, SimError};
pub use simulation::states::{Particle, NVec3};
pub use simulation::separations::SeparationMatrix;
pub use simulation::forces::{compute_forces_potential, pair_force, ForceEvaluation, ForceMatrix, ForcePotential, G};
pub use simulation::integrator::{Integrator, IntegratorOrder, Euler, VelocityVerlet, Symplectic};
pub use simulation::conservation::{ConservationSample, ConservationStats, ConservationTracker};
pub use simulation::guard::{ProximityBreach, ProximityGuard};
pub use simulation::shape::{record_shape, shape_curve, shape_sphere, shape_sphere_point};
pub use simulation::params::{RunConfig, MAX_INTEGRATION_STEPS, MAX_TIME_STEP, DEFAULT_OUTPUT_INTERVAL, DEFAULT_PROXIMITY_THRESHOLD};
pub use simulation::engine::{
    OutputSink, ParticleState, RunOutcome, RunState, RunSummary, Simulation, SimulationDriver, StateRecord, StepOutcome,
};
pub use configuration::config::{RunFileConfig, RunParametersConfig};
pub use configuration::initial_conditions::{
    format_initial_conditions, format_particle_record, load_initial_conditions, parse_initial_conditions,
    parse_particle_record, InitialCondition,
};
pub use output::trajectory::{trajectory_path, MemorySink, TrajectoryWriter};
pub use benchmark::benchmark::{bench_integrators, BenchRow};
