//! Discrete-time signal-flow graph simulation.
//!
//! Build a graph of operations (sources, arithmetic, filters, integrators,
//! sinks), connect their ports, attach probes, then `init()` and `step()` or
//! `run()` a [`System`]. Evaluation is double-buffered, so feedback cycles are
//! allowed and results never depend on registration order.

pub mod blocks;
pub mod core;

// Re-export commonly used types
pub use crate::core::components::{OperationSpec, ParameterSpec, ParameterValue, TransferContext};
pub use crate::core::error::{SimError, SimResult};
pub use crate::core::execution::SimulationConfig;
pub use crate::core::probe::Report;
pub use crate::core::system::System;
pub use crate::core::types::{Connection, OperationId, Port, PortDirection};
