//! Initial-condition files.
//!
//! A file holds one or more named configurations:
//!
//! ```text
//! Figure8:
//! 0 1.0 -1.0 0.0 0.0  0.3471128135672417  0.532726851767674 0.0
//! 1 1.0  1.0 0.0 0.0  0.3471128135672417  0.532726851767674 0.0
//! 2 1.0  0.0 0.0 0.0 -0.6942256271344834 -1.065453703535348 0.0
//! ```
//!
//! A line whose first token is not a number starts a new configuration (a
//! trailing `:` is dropped from the name). Other non-blank lines are
//! particle records `label mass x y z vx vy vz`. A bad record rejects the
//! whole file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;

use crate::error::{Result, SimError};
use crate::simulation::states::{NVec3, Particle};

/// A named starting configuration
#[derive(Debug, Clone, PartialEq)]
pub struct InitialCondition {
    pub name: String,
    pub particles: Vec<Particle>,
}

impl InitialCondition {
    pub fn new(name: impl Into<String>, particles: Vec<Particle>) -> Self {
        Self {
            name: name.into(),
            particles,
        }
    }
}

/// Open and parse an initial-condition file
pub fn load_initial_conditions(path: impl AsRef<Path>) -> Result<Vec<InitialCondition>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SimError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_initial_conditions(BufReader::new(file))
}

/// Parse every configuration from `reader`
pub fn parse_initial_conditions(reader: impl BufRead) -> Result<Vec<InitialCondition>> {
    let mut conditions = Vec::new();
    let mut current: Option<InitialCondition> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| SimError::MalformedRecord {
            line: line_no,
            reason: format!("unreadable line: {}", e),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_header(trimmed) {
            if let Some(done) = current.take() {
                push_condition(&mut conditions, done);
            }
            let name = trimmed.strip_suffix(':').unwrap_or(trimmed).trim_end();
            current = Some(InitialCondition::new(name, Vec::new()));
            continue;
        }

        let particle = parse_particle_record(trimmed, line_no)?;
        match current.as_mut() {
            Some(cond) => cond.particles.push(particle),
            None => {
                return Err(SimError::MalformedRecord {
                    line: line_no,
                    reason: "particle record before any configuration header".to_string(),
                })
            }
        }
    }

    if let Some(done) = current.take() {
        push_condition(&mut conditions, done);
    }
    Ok(conditions)
}

fn push_condition(conditions: &mut Vec<InitialCondition>, cond: InitialCondition) {
    if cond.particles.is_empty() {
        warn!("configuration '{}' has no particles, skipping", cond.name);
    } else {
        conditions.push(cond);
    }
}

/// Headers are lines whose first token is not a finite number
fn is_header(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map_or(false, |tok| tok.parse::<f64>().map_or(true, |v| !v.is_finite()))
}

/// Parse `label mass x y z vx vy vz`
pub fn parse_particle_record(line: &str, line_no: usize) -> Result<Particle> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 8 {
        return Err(SimError::MalformedRecord {
            line: line_no,
            reason: format!("expected 8 fields, found {}", fields.len()),
        });
    }

    let mut values = [0.0_f64; 7];
    for (value, field) in values.iter_mut().zip(&fields[1..]) {
        *value = field.parse::<f64>().map_err(|_| SimError::MalformedRecord {
            line: line_no,
            reason: format!("'{}' is not a number", field),
        })?;
    }

    let mass = values[0];
    if !(mass > 0.0 && mass.is_finite()) {
        return Err(SimError::MalformedRecord {
            line: line_no,
            reason: format!("mass must be positive, got {}", mass),
        });
    }

    Ok(Particle::new(
        fields[0],
        mass,
        NVec3::new(values[1], values[2], values[3]),
        NVec3::new(values[4], values[5], values[6]),
    ))
}

/// Inverse of [`parse_particle_record`]; floats use shortest round-trip form
pub fn format_particle_record(p: &Particle) -> String {
    let x = p.position();
    let v = p.velocity();
    format!(
        "{} {} {} {} {} {} {} {}",
        p.label(),
        p.mass(),
        x.x,
        x.y,
        x.z,
        v.x,
        v.y,
        v.z
    )
}

/// Write configurations back out in the file format above
pub fn format_initial_conditions(conditions: &[InitialCondition]) -> String {
    let mut out = String::new();
    for cond in conditions {
        out.push_str(&cond.name);
        out.push_str(":\n");
        for p in &cond.particles {
            out.push_str(&format_particle_record(p));
            out.push('\n');
        }
    }
    out
}
