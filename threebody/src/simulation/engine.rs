//! Run driver
//!
//! A [`Simulation`] owns its own copy of the particles for one initial
//! condition and one integrator. It moves through
//! `Initializing -> Stepping -> {Completed | Terminated}`:
//! - start-up removes the centre-of-mass velocity and evaluates the initial
//!   separations, forces and potential, then emits the t = 0 record
//! - each step integrates, takes the separations and forces at the new
//!   positions (reusing the integrator's own evaluation when it has one),
//!   checks the proximity guard, records conservation data and, when the next
//!   point of the `k * output_interval` grid is reached, emits a state record
//! - both terminal states produce a [`RunSummary`]
//!
//! Output goes through an [`OutputSink`]; the driver knows nothing about
//! files or display.

use log::{debug, info, warn};

use crate::configuration::initial_conditions::InitialCondition;
use crate::error::{Result, SimError};
use crate::simulation::conservation::{ConservationSample, ConservationStats, ConservationTracker};
use crate::simulation::forces::ForceEvaluation;
use crate::simulation::guard::{ProximityBreach, ProximityGuard};
use crate::simulation::integrator::{Integrator, IntegratorOrder};
use crate::simulation::params::RunConfig;
use crate::simulation::separations::SeparationMatrix;
use crate::simulation::states::{NVec3, Particle};

/// Rounding slack, in units of the step, when comparing against the output grid
const OUTPUT_TIME_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Stepping,
    Completed,
    Terminated,
}

/// Result of a single call to [`Simulation::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Continue,
    Completed,
    Terminated(ProximityBreach),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    Completed,
    Terminated {
        step: usize,
        time: f64,
        breach: ProximityBreach,
    },
}

/// Snapshot of one particle inside a [`StateRecord`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    pub label: String,
    pub position: NVec3,
    pub velocity: NVec3,
}

/// One emitted output record. Deltas are relative to the previous record.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub step: usize,
    pub time: f64,
    pub d_momentum: NVec3,
    pub d_energy: f64,
    pub particles: Vec<ParticleState>,
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub name: String,
    pub order: IntegratorOrder,
    pub outcome: RunOutcome,
    pub steps_taken: usize,
    pub final_time: f64,
    pub records_emitted: usize,
    pub stats: ConservationStats,
}

/// Receiver for everything a run produces
pub trait OutputSink {
    /// Called at t = 0 and then at the output cadence, in time order
    fn write_record(&mut self, record: &StateRecord) -> Result<()>;

    /// Called once when the run reaches a terminal state
    fn diagnostics(&mut self, _summary: &RunSummary, _history: &ConservationTracker) -> Result<()> {
        Ok(())
    }
}

/// One run of one initial condition with one integrator
pub struct Simulation {
    name: String,
    config: RunConfig,
    integrator: Box<dyn Integrator>,
    guard: ProximityGuard,
    particles: Vec<Particle>,
    separations: SeparationMatrix,
    forces: Vec<NVec3>,
    potential: f64,
    tracker: ConservationTracker,
    state: RunState,
    step: usize,
    time: f64,
    next_output_time: f64,
    last_emitted: ConservationSample,
    records_emitted: usize,
    breach: Option<ProximityBreach>,
}

impl Simulation {
    /// Copy the initial condition, zero the centre-of-mass velocity and
    /// evaluate the initial forces and potential
    pub fn new(config: &RunConfig, initial: &InitialCondition) -> Result<Self> {
        config.validate()?;
        if initial.particles.is_empty() {
            return Err(SimError::EmptySystem);
        }

        // each run works on its own copy
        let mut particles = initial.particles.clone();
        let com = Particle::com_velocity(&particles);
        for p in particles.iter_mut() {
            p.subtract_velocity(&com);
        }

        let eval = ForceEvaluation::at(&particles);
        let baseline = ConservationSample::measure(0.0, &particles, eval.potential);

        Ok(Self {
            name: initial.name.clone(),
            config: config.clone(),
            integrator: config.order().integrator(),
            guard: ProximityGuard::new(config.proximity_threshold()),
            particles,
            separations: eval.separations,
            forces: eval.forces,
            potential: eval.potential,
            tracker: ConservationTracker::new(baseline),
            state: RunState::Initializing,
            step: 0,
            time: 0.0,
            next_output_time: 0.0,
            last_emitted: baseline,
            records_emitted: 0,
            breach: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn separations(&self) -> &SeparationMatrix {
        &self.separations
    }

    /// Net forces at the current positions
    pub fn forces(&self) -> &[NVec3] {
        &self.forces
    }

    pub fn potential(&self) -> f64 {
        self.potential
    }

    pub fn tracker(&self) -> &ConservationTracker {
        &self.tracker
    }

    /// Completed integration steps
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RunState::Completed | RunState::Terminated)
    }

    /// Emit the t = 0 record and enter `Stepping`
    fn start(&mut self, sink: &mut dyn OutputSink) -> Result<()> {
        info!(
            "{}: {} particles, {} with dt = {}, {} steps",
            self.name,
            self.particles.len(),
            self.config.order(),
            self.config.dt(),
            self.config.integration_steps()
        );

        let baseline = *self.tracker.baseline();
        self.emit(baseline, sink)?;

        self.state = if self.config.integration_steps() == 0 {
            RunState::Completed
        } else {
            RunState::Stepping
        };
        Ok(())
    }

    /// Advance exactly one integration step
    pub fn advance(&mut self, sink: &mut dyn OutputSink) -> Result<StepOutcome> {
        if self.state == RunState::Initializing {
            self.start(sink)?;
        }
        match self.state {
            RunState::Completed => return Ok(StepOutcome::Completed),
            RunState::Terminated => {
                if let Some(breach) = self.breach {
                    return Ok(StepOutcome::Terminated(breach));
                }
            }
            _ => {}
        }

        let dt = self.config.dt();
        let eval = match self.integrator.step(&mut self.particles, dt, &self.forces) {
            Some(eval) => eval,
            None => ForceEvaluation::at(&self.particles),
        };
        self.step += 1;
        self.time = self.step as f64 * dt;

        let breach = self.guard.check(&eval.separations);
        self.separations = eval.separations;
        self.forces = eval.forces;
        self.potential = eval.potential;

        // recorded before any cadence filtering, and also on the final step
        let sample = self.tracker.record(self.time, &self.particles, self.potential);

        if let Some(breach) = breach {
            warn!(
                "{}: particles {} and {} separated by {:.6e} > {} at t = {:.4}, stopping",
                self.name,
                breach.i,
                breach.j,
                breach.distance,
                self.guard.threshold(),
                self.time
            );
            self.breach = Some(breach);
            self.state = RunState::Terminated;
            return Ok(StepOutcome::Terminated(breach));
        }

        if self.time + OUTPUT_TIME_TOLERANCE * dt >= self.next_output_time {
            self.emit(sample, sink)?;
        }

        if self.step >= self.config.integration_steps() {
            self.state = RunState::Completed;
            return Ok(StepOutcome::Completed);
        }
        Ok(StepOutcome::Continue)
    }

    fn emit(&mut self, sample: ConservationSample, sink: &mut dyn OutputSink) -> Result<()> {
        let record = StateRecord {
            step: self.step,
            time: self.time,
            d_momentum: sample.momentum() - self.last_emitted.momentum(),
            d_energy: sample.total_energy - self.last_emitted.total_energy,
            particles: self
                .particles
                .iter()
                .map(|p| ParticleState {
                    label: p.label().to_string(),
                    position: p.position(),
                    velocity: p.velocity(),
                })
                .collect(),
        };
        debug!("{}: record at t = {:.4} (step {})", self.name, record.time, record.step);

        sink.write_record(&record)?;
        self.last_emitted = sample;
        // next point of the k * output_interval grid strictly after now
        let interval = self.config.output_interval();
        let k = (self.time / interval + OUTPUT_TIME_TOLERANCE).floor() + 1.0;
        self.next_output_time = k * interval;
        self.records_emitted += 1;
        Ok(())
    }

    /// Step until a terminal state, then report the summary to the sink
    pub fn run_to_end(mut self, sink: &mut dyn OutputSink) -> Result<RunSummary> {
        while !self.is_finished() {
            self.advance(sink)?;
        }

        let outcome = match self.breach {
            Some(breach) => RunOutcome::Terminated {
                step: self.step,
                time: self.time,
                breach,
            },
            None => RunOutcome::Completed,
        };

        let summary = RunSummary {
            name: self.name.clone(),
            order: self.config.order(),
            outcome,
            steps_taken: self.step,
            final_time: self.time,
            records_emitted: self.records_emitted,
            stats: self.tracker.stats(),
        };

        info!(
            "{}: {} after {} steps, energy deviation {:.6e}, momentum spread x {:.6e}, y {:.6e}",
            summary.name,
            match summary.outcome {
                RunOutcome::Completed => "completed",
                RunOutcome::Terminated { .. } => "terminated",
            },
            summary.steps_taken,
            summary.stats.energy_deviation,
            summary.stats.momentum_spread_x,
            summary.stats.momentum_spread_y
        );

        sink.diagnostics(&summary, &self.tracker)?;
        Ok(summary)
    }
}

/// Runs initial conditions under a fixed configuration
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    config: RunConfig,
}

impl SimulationDriver {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one initial condition from a fresh copy of its particles
    pub fn run(&self, initial: &InitialCondition, sink: &mut dyn OutputSink) -> Result<RunSummary> {
        Simulation::new(&self.config, initial)?.run_to_end(sink)
    }
}
