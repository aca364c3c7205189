pub mod config;
pub mod cycle_engine;

// Re-export commonly used types
pub use config::{SimulationConfig, DEFAULT_TIMESTEP, MIN_TIMESTEP};
pub use cycle_engine::{CycleEngine, Snapshot};
