use crate::core::components::parameters::{
    ParameterDescription, ParameterValue, ParameterWriteError, Parameters,
};
use crate::core::components::spec::OperationSpec;
use crate::core::components::state::OperationState;
use crate::core::error::{SimError, SimResult};
use crate::core::types::{OperationId, Port};
use serde::Serialize;
use std::sync::Arc;

/// Read-only view of an operation for enumeration and display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationInfo {
    pub id: OperationId,
    pub name: String,
    pub input_ports: Vec<Port>,
    pub output_ports: Vec<Port>,
}

impl OperationInfo {
    pub fn input_arity(&self) -> usize {
        self.input_ports.len()
    }

    pub fn output_arity(&self) -> usize {
        self.output_ports.len()
    }
}

/// A live operation instance: spec + private state + parameters.
///
/// Classified by arity only: no inputs makes a source, no outputs a sink.
pub struct Operation {
    id: OperationId,
    spec: Arc<OperationSpec>,
    state: Box<dyn OperationState>,
    parameters: Parameters,
}

impl Operation {
    pub fn new(id: OperationId, spec: impl Into<Arc<OperationSpec>>) -> Self {
        let spec = spec.into();
        Self {
            id,
            state: spec.fresh_state(),
            parameters: Parameters::from_specs(spec.parameters()),
            spec,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    pub fn input_arity(&self) -> usize {
        self.spec.inputs()
    }

    pub fn output_arity(&self) -> usize {
        self.spec.outputs()
    }

    pub fn is_source(&self) -> bool {
        self.input_arity() == 0
    }

    pub fn is_sink(&self) -> bool {
        self.output_arity() == 0
    }

    pub fn input_ports(&self) -> Vec<Port> {
        (0..self.input_arity()).map(|i| self.id.input(i)).collect()
    }

    pub fn output_ports(&self) -> Vec<Port> {
        (0..self.output_arity()).map(|i| self.id.output(i)).collect()
    }

    /// Inputs first, then outputs
    pub fn ports(&self) -> Vec<Port> {
        let mut ports = self.input_ports();
        ports.extend(self.output_ports());
        ports
    }

    /// Check whether a port structurally belongs to this operation
    pub fn has_port(&self, port: &Port) -> bool {
        if port.operation() != self.id {
            return false;
        }
        let arity = if port.is_input() {
            self.input_arity()
        } else {
            self.output_arity()
        };
        port.index() < arity
    }

    pub fn info(&self) -> OperationInfo {
        OperationInfo {
            id: self.id,
            name: self.name().to_string(),
            input_ports: self.input_ports(),
            output_ports: self.output_ports(),
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameter_descriptions(&self) -> Vec<ParameterDescription> {
        self.spec.parameter_descriptions()
    }

    pub fn set_parameter(&mut self, key: &str, value: ParameterValue) -> SimResult<()> {
        self.parameters.set(key, value).map_err(|e| match e {
            ParameterWriteError::Undeclared => SimError::ParameterNotFound {
                operation: self.id,
                key: key.to_string(),
            },
            ParameterWriteError::Mismatch { expected, found } => SimError::ParameterTypeMismatch {
                operation: self.id,
                key: key.to_string(),
                expected,
                found,
            },
        })
    }

    pub fn state(&self) -> &dyn OperationState {
        self.state.as_ref()
    }

    /// Replace the live state with a fresh copy of the spec's initial state
    pub(crate) fn reset_state(&mut self) {
        self.state = self.spec.fresh_state();
    }

    /// Run the transfer function once and check the output arity
    pub(crate) fn transfer(&mut self, dt: f64, inputs: &[f64]) -> SimResult<Vec<f64>> {
        let transfer = self.spec.transfer_fn();
        let outputs = transfer(dt, self.state.as_mut(), &self.parameters, inputs)
            .ok_or(SimError::StateMismatch { operation: self.id })?;

        if outputs.len() != self.output_arity() {
            return Err(SimError::TransferArity {
                operation: self.id,
                expected: self.output_arity(),
                actual: outputs.len(),
            });
        }
        Ok(outputs)
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
