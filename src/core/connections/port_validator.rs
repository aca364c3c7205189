use crate::core::components::registry::OperationRegistry;
use crate::core::error::{SimError, SimResult};
use crate::core::types::Port;

/// Port validation utilities
pub struct PortValidator;

impl PortValidator {
    /// Validate that the port belongs to a registered operation
    pub fn validate_port(registry: &OperationRegistry, port: &Port) -> SimResult<()> {
        if registry.has_port(port) {
            Ok(())
        } else {
            Err(SimError::InvalidPort(*port))
        }
    }

    /// Validate that the port exists and is an output
    pub fn validate_source_port(registry: &OperationRegistry, port: &Port) -> SimResult<()> {
        if !port.is_output() {
            return Err(SimError::InvalidPort(*port));
        }
        Self::validate_port(registry, port)
    }
}
