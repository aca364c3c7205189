//! Configuration for simulation execution
//!
//! Holds the shared timestep and the value every output port is seeded with
//! when a run starts.

use crate::core::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Smallest accepted timestep, in seconds
pub const MIN_TIMESTEP: f64 = 1e-6;

/// Default timestep, in seconds
pub const DEFAULT_TIMESTEP: f64 = 0.01;

/// Check a timestep against the lower bounds
pub fn validate_dt(dt: f64) -> SimResult<()> {
    if !dt.is_finite() || dt < MIN_TIMESTEP {
        return Err(SimError::InvalidTimestep(dt));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Shared timestep length in seconds
    pub dt: f64,
    /// Committed value of every output port right after `init()`
    pub output_seed: f64,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    pub fn new() -> Self {
        Self {
            dt: DEFAULT_TIMESTEP,
            output_seed: 0.0,
        }
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_output_seed(mut self, seed: f64) -> Self {
        self.output_seed = seed;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_dt(self.dt)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
