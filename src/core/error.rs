//! Error types for graph construction and simulation.

use thiserror::Error;

use crate::core::components::parameters::ParameterKind;
use crate::core::types::{OperationId, Port};

/// Result type for engine operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced synchronously by the call that caused them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// An operation with this id is already registered.
    #[error("Operation {0} already registered")]
    AlreadyRegistered(OperationId),

    /// The id counter has no unused value left.
    #[error("No operation ids left to allocate")]
    IdsExhausted,

    /// No operation with this id is registered.
    #[error("Operation {0} not found")]
    NotFound(OperationId),

    /// Timestep is non-positive or below the minimum.
    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f64),

    /// Structural mutation attempted while the system is initialized.
    #[error("System is initialized; call reset() before editing")]
    SystemFrozen,

    /// At least one port has no connection.
    #[error("Graph is incomplete: port {port} is not connected")]
    IncompleteGraph { port: Port },

    /// Stepping attempted before init().
    #[error("System is not initialized")]
    NotInitialized,

    /// Parameter key is not declared by the operation.
    #[error("Parameter '{key}' not found on operation {operation}")]
    ParameterNotFound { operation: OperationId, key: String },

    /// Parameter value has a different type than its declaration.
    #[error("Parameter '{key}' on operation {operation} expects {expected}, got {found}")]
    ParameterTypeMismatch {
        operation: OperationId,
        key: String,
        expected: ParameterKind,
        found: ParameterKind,
    },

    /// The output port already has a probe.
    #[error("Port {0} is already probed")]
    AlreadyProbed(Port),

    /// The port does not exist or has the wrong direction for this call.
    #[error("Invalid port: {0}")]
    InvalidPort(Port),

    /// Run duration is negative or not finite.
    #[error("Invalid run duration: {0}")]
    InvalidDuration(f64),

    /// A transfer function returned the wrong number of outputs.
    #[error("Operation {operation} produced {actual} outputs, expected {expected}")]
    TransferArity {
        operation: OperationId,
        expected: usize,
        actual: usize,
    },

    /// A transfer function was handed state of another type.
    #[error("Operation {operation} state does not match its transfer function")]
    StateMismatch { operation: OperationId },
}
