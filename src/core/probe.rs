//! Recorders bound to output ports.

use crate::core::error::{SimError, SimResult};
use crate::core::execution::cycle_engine::Snapshot;
use crate::core::types::{OperationId, Port};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recorded series of one probe, in step order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub data: Vec<f64>,
}

/// A titled, append-only recorder on one output port
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    title: String,
    port: Port,
    data: Vec<f64>,
}

impl Probe {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// All probes of a system, in attachment order
#[derive(Debug, Clone, Default)]
pub struct ProbeSet {
    probes: IndexMap<Port, Probe>,
}

impl ProbeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a probe; the caller has already checked the port is an output
    pub fn attach(&mut self, port: Port, title: impl Into<String>) -> SimResult<()> {
        if self.probes.contains_key(&port) {
            return Err(SimError::AlreadyProbed(port));
        }
        self.probes.insert(
            port,
            Probe {
                title: title.into(),
                port,
                data: Vec::new(),
            },
        );
        Ok(())
    }

    /// Drop probes on the operation's ports; returns how many went away
    pub fn remove_operation(&mut self, operation: OperationId) -> usize {
        let before = self.probes.len();
        self.probes.retain(|port, _| port.operation() != operation);
        before - self.probes.len()
    }

    /// Append the just-committed value at every probed port
    pub fn record(&mut self, snapshot: &Snapshot) {
        for (port, probe) in self.probes.iter_mut() {
            if let Some(value) = snapshot.get(port) {
                probe.data.push(*value);
            }
        }
    }

    /// Forget recorded data, keeping the probes
    pub fn clear(&mut self) {
        for probe in self.probes.values_mut() {
            probe.data.clear();
        }
    }

    pub fn is_probed(&self, port: &Port) -> bool {
        self.probes.contains_key(port)
    }

    pub fn get(&self, port: &Port) -> Option<&Probe> {
        self.probes.get(port)
    }

    pub fn report(&self) -> Vec<Report> {
        self.probes
            .values()
            .map(|probe| Report {
                title: probe.title.clone(),
                data: probe.data.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
