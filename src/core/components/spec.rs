use crate::core::components::parameters::{ParameterDescription, ParameterSpec, Parameters};
use crate::core::components::state::{downcast_state_mut, OperationState};
use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;

/// Everything a transfer function may look at for one step.
///
/// `state` is the only thing it may mutate.
pub struct TransferContext<'a, S> {
    /// Shared timestep length in seconds
    pub dt: f64,
    /// The operation's private state
    pub state: &'a mut S,
    /// Current parameter values
    pub parameters: &'a Parameters,
    /// Input values read from the previous committed snapshot, one per input port
    pub inputs: &'a [f64],
}

impl<'a, S> TransferContext<'a, S> {
    /// Value at an input index, 0.0 if out of range
    pub fn input(&self, index: usize) -> f64 {
        self.inputs.get(index).copied().unwrap_or(0.0)
    }

    /// Numeric parameter, falling back to `default` when absent
    pub fn number(&self, key: &str, default: f64) -> f64 {
        self.parameters.number(key).unwrap_or(default)
    }
}

/// Type-erased transfer function; `None` means the state had the wrong type
pub(crate) type ErasedTransfer = Arc<
    dyn Fn(f64, &mut dyn OperationState, &Parameters, &[f64]) -> Option<Vec<f64>> + Send + Sync,
>;

fn erase<S, F>(transfer: F) -> ErasedTransfer
where
    S: Any + Send + Clone,
    F: Fn(TransferContext<'_, S>) -> Vec<f64> + Send + Sync + 'static,
{
    Arc::new(
        move |dt: f64, state: &mut dyn OperationState, parameters: &Parameters, inputs: &[f64]| {
            let state = downcast_state_mut::<S>(state)?;
            Some(transfer(TransferContext {
                dt,
                state,
                parameters,
                inputs,
            }))
        },
    )
}

/// Declarative description used to instantiate operations.
///
/// Exactly five things: a name, input/output arity, parameter declarations,
/// an initial state and a transfer function. Every operation instance gets
/// its own deep copy of the initial state.
pub struct OperationSpec {
    name: String,
    inputs: usize,
    outputs: usize,
    parameters: IndexMap<String, ParameterSpec>,
    initial_state: Box<dyn OperationState>,
    transfer: ErasedTransfer,
}

impl OperationSpec {
    /// Create a spec with no parameters.
    ///
    /// ```
    /// use sigflow::core::components::spec::OperationSpec;
    ///
    /// let add = OperationSpec::new("Add", 2, 1, (), |ctx| vec![ctx.inputs[0] + ctx.inputs[1]]);
    /// assert_eq!(add.inputs(), 2);
    /// ```
    pub fn new<S, F>(
        name: impl Into<String>,
        inputs: usize,
        outputs: usize,
        initial_state: S,
        transfer: F,
    ) -> Self
    where
        S: Any + Send + Clone,
        F: Fn(TransferContext<'_, S>) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inputs,
            outputs,
            parameters: IndexMap::new(),
            initial_state: Box::new(initial_state),
            transfer: erase(transfer),
        }
    }

    /// Declare a parameter; its default fixes the parameter's type
    pub fn with_parameter(mut self, key: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(key.into(), spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn parameters(&self) -> &IndexMap<String, ParameterSpec> {
        &self.parameters
    }

    pub fn initial_state(&self) -> &dyn OperationState {
        self.initial_state.as_ref()
    }

    pub fn parameter_descriptions(&self) -> Vec<ParameterDescription> {
        self.parameters
            .iter()
            .map(|(key, spec)| ParameterDescription {
                key: key.clone(),
                display_name: spec.display_name.clone(),
                description: spec.description.clone(),
                kind: spec.default_value.kind(),
            })
            .collect()
    }

    pub(crate) fn fresh_state(&self) -> Box<dyn OperationState> {
        self.initial_state.clone_state()
    }

    pub(crate) fn transfer_fn(&self) -> &ErasedTransfer {
        &self.transfer
    }
}

impl Clone for OperationSpec {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inputs: self.inputs,
            outputs: self.outputs,
            parameters: self.parameters.clone(),
            initial_state: self.initial_state.clone_state(),
            transfer: Arc::clone(&self.transfer),
        }
    }
}

impl std::fmt::Debug for OperationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationSpec")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("parameters", &self.parameters.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::state::downcast_state;

    #[test]
    fn builder_records_parameters_in_order() {
        let spec = OperationSpec::new("Gain", 1, 1, (), |ctx| {
            vec![ctx.input(0) * ctx.number("k", 1.0)]
        })
            .with_parameter("k", ParameterSpec::new("K", "Gain factor", 2.0))
            .with_parameter("unit", ParameterSpec::new("Unit", "Display unit", "V"));

        let descriptions = spec.parameter_descriptions();
        assert_eq!(descriptions.len(), 2);
        assert_eq!(descriptions[0].key, "k");
        assert_eq!(descriptions[1].display_name, "Unit");
    }

    #[test]
    fn fresh_state_never_aliases_the_default() {
        let spec = OperationSpec::new("Counter", 0, 1, 0_u32, |ctx| {
            *ctx.state += 1;
            vec![f64::from(*ctx.state)]
        });

        let mut state = spec.fresh_state();
        let params = Parameters::default();
        let out = (spec.transfer_fn())(0.1, state.as_mut(), &params, &[]);

        assert_eq!(out, Some(vec![1.0]));
        assert_eq!(downcast_state::<u32>(spec.initial_state()), Some(&0));
    }

    #[test]
    fn mismatched_state_is_reported() {
        let spec = OperationSpec::new("Counter", 0, 1, 0_u32, |_ctx| vec![0.0]);
        let mut wrong: Box<dyn OperationState> = Box::new(String::new());
        let params = Parameters::default();

        assert_eq!((spec.transfer_fn())(0.1, wrong.as_mut(), &params, &[]), None);
    }
}
