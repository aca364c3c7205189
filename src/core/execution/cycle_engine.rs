use crate::core::components::registry::OperationRegistry;
use crate::core::connections::manager::ConnectionManager;
use crate::core::error::{SimError, SimResult};
use crate::core::execution::config::SimulationConfig;
use crate::core::types::Port;
use log::{debug, trace, warn};
use std::collections::HashMap;

/// Output-port values produced by one completed step
pub type Snapshot = HashMap<Port, f64>;

/// Synchronous double-buffered evaluator.
///
/// Every step, each operation reads its inputs from the snapshot committed by
/// the previous step and writes into a fresh one; the fresh snapshot replaces
/// the committed one only after all operations ran. No operation can observe
/// a value produced in the same step, so iteration order never affects
/// results and feedback cycles need no special handling.
#[derive(Debug, Clone)]
pub struct CycleEngine {
    /// input port -> output port feeding it, frozen at init
    input_sources: HashMap<Port, Port>,
    /// Values committed by the last completed step
    committed: Snapshot,
    dt: f64,
    current_step: u64,
    non_finite_reported: bool,
}

impl CycleEngine {
    /// Reset every operation's state and seed all output ports.
    ///
    /// The caller guarantees the graph is complete.
    pub fn initialize(
        registry: &mut OperationRegistry,
        connections: &ConnectionManager,
        config: &SimulationConfig,
    ) -> Self {
        for operation in registry.iter_mut() {
            operation.reset_state();
        }

        let input_sources: HashMap<Port, Port> = connections
            .source_map()
            .iter()
            .map(|(to, from)| (*to, *from))
            .collect();

        let committed: Snapshot = registry
            .iter()
            .flat_map(|op| op.output_ports())
            .map(|port| (port, config.output_seed))
            .collect();

        let stats = connections.stats();
        debug!(
            "Initialized engine: {} operations, {} connections, {} outputs, fan-out {}, dt={}",
            registry.len(),
            stats.connections,
            committed.len(),
            stats.max_fan_out,
            config.dt
        );

        Self {
            input_sources,
            committed,
            dt: config.dt,
            current_step: 0,
            non_finite_reported: false,
        }
    }

    /// Advance one step: all read old, all write new, then swap
    pub fn step(&mut self, registry: &mut OperationRegistry) -> SimResult<()> {
        let mut next: Snapshot = HashMap::with_capacity(self.committed.len());

        for operation in registry.iter_mut() {
            let inputs = operation
                .input_ports()
                .iter()
                .map(|port| self.read_input(port))
                .collect::<SimResult<Vec<f64>>>()?;

            let outputs = operation.transfer(self.dt, &inputs)?;
            for (index, value) in outputs.into_iter().enumerate() {
                next.insert(operation.id().output(index), value);
            }
        }

        if !self.non_finite_reported && next.values().any(|v| !v.is_finite()) {
            warn!(
                "Non-finite value produced at step {}; it will propagate",
                self.current_step + 1
            );
            self.non_finite_reported = true;
        }

        self.committed = next;
        self.current_step += 1;
        trace!("Completed step {}", self.current_step);
        Ok(())
    }

    /// Committed value feeding an input port
    fn read_input(&self, port: &Port) -> SimResult<f64> {
        self.input_sources
            .get(port)
            .and_then(|source| self.committed.get(source))
            .copied()
            .ok_or(SimError::IncompleteGraph { port: *port })
    }

    /// Committed value at an output port
    pub fn value(&self, port: &Port) -> Option<f64> {
        self.committed.get(port).copied()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.committed
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulated time covered by the completed steps
    pub fn time(&self) -> f64 {
        self.current_step as f64 * self.dt
    }
}
