pub mod operation;
pub mod parameters;
pub mod registry;
pub mod spec;
pub mod state;

// Re-export commonly used types
pub use operation::{Operation, OperationInfo};
pub use parameters::{
    ParameterDescription, ParameterKind, ParameterSpec, ParameterValue, Parameters,
};
pub use registry::OperationRegistry;
pub use spec::{OperationSpec, TransferContext};
pub use state::OperationState;
