//! The system aggregate: the full call surface used by editors and batch runners.
//!
//! Lifecycle is `Building -> Initialized -> Building`. Registering, connecting,
//! probing and changing `dt` are refused while initialized; removing an
//! operation or releasing an input invalidates the run instead, so an editor
//! can keep deleting while a simulation is live and then re-`init()`.

use crate::core::components::operation::{Operation, OperationInfo};
use crate::core::components::parameters::{ParameterDescription, ParameterValue};
use crate::core::components::registry::OperationRegistry;
use crate::core::components::spec::OperationSpec;
use crate::core::connections::manager::ConnectionManager;
use crate::core::connections::port_validator::PortValidator;
use crate::core::error::{SimError, SimResult};
use crate::core::execution::config::{validate_dt, SimulationConfig};
use crate::core::execution::cycle_engine::CycleEngine;
use crate::core::probe::{ProbeSet, Report};
use crate::core::types::{Connection, OperationId, Port};
use log::{debug, info, warn};
use std::sync::Arc;

/// Relative slack applied to `duration / dt` before flooring in `run()`
const RUN_TOLERANCE: f64 = 1e-9;

/// Number of whole steps that fit into `duration`
pub fn step_count(duration: f64, dt: f64) -> SimResult<u64> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(SimError::InvalidDuration(duration));
    }
    let ratio = duration / dt;
    Ok((ratio + ratio * RUN_TOLERANCE).floor() as u64)
}

/// Owns operations, connections, probes and the simulation clock
#[derive(Debug, Default)]
pub struct System {
    config: SimulationConfig,
    registry: OperationRegistry,
    connections: ConnectionManager,
    probes: ProbeSet,
    /// Present only while initialized
    engine: Option<CycleEngine>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    fn ensure_building(&self) -> SimResult<()> {
        if self.is_initialized() {
            return Err(SimError::SystemFrozen);
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        if self.engine.take().is_some() {
            debug!("Graph edited; system returned to building state");
        }
    }

    // ---- operation registry -------------------------------------------

    /// Instantiate a spec under a freshly allocated id
    pub fn add_operation(&mut self, spec: impl Into<Arc<OperationSpec>>) -> SimResult<OperationId> {
        self.ensure_building()?;
        let id = self.registry.allocate_id()?;
        self.register(Operation::new(id, spec))
    }

    /// Register a pre-built operation under its own id
    pub fn register(&mut self, operation: Operation) -> SimResult<OperationId> {
        self.ensure_building()?;
        let name = operation.name().to_string();
        let id = self.registry.register(operation)?;
        debug!("Registered operation {} ({})", id, name);
        Ok(id)
    }

    /// Remove an operation with all of its connections and probes
    pub fn remove(&mut self, id: OperationId) -> SimResult<()> {
        let operation = self.registry.remove(id)?;
        let dropped_connections = self.connections.remove_operation(id);
        let dropped_probes = self.probes.remove_operation(id);
        self.invalidate();
        debug!(
            "Removed operation {} ({}); dropped {} connections, {} probes",
            id,
            operation.name(),
            dropped_connections,
            dropped_probes
        );
        Ok(())
    }

    pub fn get(&self, id: OperationId) -> SimResult<OperationInfo> {
        self.registry.get(id).map(Operation::info)
    }

    /// Every operation in registration order
    pub fn list(&self) -> Vec<OperationInfo> {
        self.registry.list()
    }

    pub fn operation(&self, id: OperationId) -> SimResult<&Operation> {
        self.registry.get(id)
    }

    pub fn operation_count(&self) -> usize {
        self.registry.len()
    }

    // ---- connection graph ---------------------------------------------

    /// Both ports exist, directions differ and the input side is free
    pub fn is_connectable(&self, a: &Port, b: &Port) -> bool {
        self.registry.has_port(a)
            && self.registry.has_port(b)
            && self.connections.is_connectable(a, b)
    }

    /// Connect two ports in either order; a non-connectable pair is a no-op
    pub fn connect(&mut self, a: Port, b: Port) -> SimResult<Option<Connection>> {
        self.ensure_building()?;
        if !self.is_connectable(&a, &b) {
            return Ok(None);
        }
        let connection = self.connections.connect(a, b);
        if let Some(connection) = &connection {
            debug!("Connected {} -> {}", connection.from, connection.to);
        }
        Ok(connection)
    }

    /// Release the connection ending at an input port; output ports are ignored
    pub fn disconnect(&mut self, input: &Port) -> Option<Connection> {
        let released = self.connections.disconnect(input);
        if let Some(connection) = &released {
            self.invalidate();
            debug!("Disconnected {} -> {}", connection.from, connection.to);
        }
        released
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.connections.connections()
    }

    /// Ports that are not an endpoint of any connection, in registration order
    pub fn unconnected_ports(&self) -> Vec<Port> {
        self.registry
            .ports()
            .filter(|port| !self.connections.is_connected(port))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.registry
            .ports()
            .all(|port| self.connections.is_connected(&port))
    }

    // ---- clock and evaluation -----------------------------------------

    pub fn set_dt(&mut self, dt: f64) -> SimResult<()> {
        self.ensure_building()?;
        validate_dt(dt)?;
        self.config.dt = dt;
        Ok(())
    }

    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    /// Validate completeness, reset state and seed the output snapshot.
    ///
    /// Calling it again restarts the run from scratch.
    pub fn init(&mut self) -> SimResult<()> {
        if let Some(port) = self.unconnected_ports().first() {
            return Err(SimError::IncompleteGraph { port: *port });
        }
        self.engine = Some(CycleEngine::initialize(
            &mut self.registry,
            &self.connections,
            &self.config,
        ));
        self.probes.clear();
        Ok(())
    }

    /// Leave the initialized state, keeping graph, parameters and probes
    pub fn reset(&mut self) {
        self.invalidate();
    }

    /// Evaluate every operation once and commit the new snapshot.
    ///
    /// A failed step leaves some operation states advanced past the committed
    /// snapshot, so the run is dropped and `init()` must be called again.
    pub fn step(&mut self) -> SimResult<()> {
        let engine = self.engine.as_mut().ok_or(SimError::NotInitialized)?;
        if let Err(err) = engine.step(&mut self.registry) {
            warn!("Step {} failed: {}", engine.current_step() + 1, err);
            self.invalidate();
            return Err(err);
        }
        self.probes.record(engine.snapshot());
        Ok(())
    }

    /// Execute `floor(duration / dt)` steps; a failing step ends the run as in `step()`
    pub fn run(&mut self, duration: f64) -> SimResult<u64> {
        if !self.is_initialized() {
            return Err(SimError::NotInitialized);
        }
        let steps = step_count(duration, self.config.dt)?;
        for _ in 0..steps {
            self.step()?;
        }
        info!(
            "Ran {} steps ({} s), now at t={}",
            steps,
            duration,
            self.time()
        );
        Ok(steps)
    }

    /// Steps completed since the last `init()`
    pub fn current_step(&self) -> u64 {
        self.engine.as_ref().map_or(0, CycleEngine::current_step)
    }

    pub fn time(&self) -> f64 {
        self.engine.as_ref().map_or(0.0, CycleEngine::time)
    }

    /// Committed value at an output port, if initialized
    pub fn output_value(&self, port: &Port) -> Option<f64> {
        self.engine.as_ref().and_then(|engine| engine.value(port))
    }

    // ---- parameters ---------------------------------------------------

    pub fn set_parameter(
        &mut self,
        id: OperationId,
        key: &str,
        value: impl Into<ParameterValue>,
    ) -> SimResult<()> {
        self.registry.get_mut(id)?.set_parameter(key, value.into())
    }

    pub fn parameter(&self, id: OperationId, key: &str) -> SimResult<&ParameterValue> {
        self.registry
            .get(id)?
            .parameters()
            .get(key)
            .ok_or_else(|| SimError::ParameterNotFound {
                operation: id,
                key: key.to_string(),
            })
    }

    pub fn parameter_descriptions(&self, id: OperationId) -> SimResult<Vec<ParameterDescription>> {
        Ok(self.registry.get(id)?.parameter_descriptions())
    }

    // ---- probes -------------------------------------------------------

    pub fn probe(&mut self, port: Port, title: impl Into<String>) -> SimResult<()> {
        self.ensure_building()?;
        PortValidator::validate_source_port(&self.registry, &port)?;
        let title = title.into();
        debug!("Probing {} as '{}'", port, title);
        self.probes.attach(port, title)
    }

    /// Recorded series of every probe, in attachment order
    pub fn report(&self) -> Vec<Report> {
        self.probes.report()
    }
}
