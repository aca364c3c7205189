use crate::core::types::{Connection, OperationId, Port};
use indexmap::IndexMap;

/// Directed single-producer connections between ports.
///
/// Keyed by the consuming input port, which makes "at most one connection per
/// input" structural. Outputs may appear as the source of any number of
/// entries (fan-out). Cycles are allowed and never inspected.
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    /// input port -> output port feeding it, in connection order
    sources: IndexMap<Port, Port>,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the ports have opposite directions and the input side is free.
    ///
    /// Symmetric in argument order.
    pub fn is_connectable(&self, a: &Port, b: &Port) -> bool {
        match Connection::oriented(*a, *b) {
            Some(connection) => !self.sources.contains_key(&connection.to),
            None => false,
        }
    }

    /// Record a connection oriented output -> input.
    ///
    /// Returns `None` without changing anything when the pair is not
    /// connectable.
    pub fn connect(&mut self, a: Port, b: Port) -> Option<Connection> {
        if !self.is_connectable(&a, &b) {
            return None;
        }
        let connection = Connection::oriented(a, b)?;
        self.sources.insert(connection.to, connection.from);
        Some(connection)
    }

    /// Release an input port. Output ports are ignored since they may fan out.
    pub fn disconnect(&mut self, input: &Port) -> Option<Connection> {
        if !input.is_input() {
            return None;
        }
        self.sources
            .shift_remove(input)
            .map(|from| Connection { from, to: *input })
    }

    /// Drop every connection touching the operation; returns how many went away
    pub fn remove_operation(&mut self, operation: OperationId) -> usize {
        let before = self.sources.len();
        self.sources
            .retain(|to, from| to.operation() != operation && from.operation() != operation);
        before - self.sources.len()
    }

    /// Check if a port is an endpoint of at least one connection
    pub fn is_connected(&self, port: &Port) -> bool {
        if port.is_input() {
            self.sources.contains_key(port)
        } else {
            self.sources.values().any(|from| from == port)
        }
    }

    /// All connections in the order they were made
    pub fn connections(&self) -> Vec<Connection> {
        self.sources
            .iter()
            .map(|(to, from)| Connection { from: *from, to: *to })
            .collect()
    }

    /// Input -> source lookup used by the evaluator
    pub fn source_map(&self) -> &IndexMap<Port, Port> {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Get connection statistics
    pub fn stats(&self) -> ConnectionStats {
        let mut fan_out: IndexMap<Port, usize> = IndexMap::new();
        for from in self.sources.values() {
            *fan_out.entry(*from).or_default() += 1;
        }
        ConnectionStats {
            connections: self.sources.len(),
            driving_outputs: fan_out.len(),
            max_fan_out: fan_out.values().copied().max().unwrap_or(0),
        }
    }
}

/// Connection statistics for debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    pub connections: usize,
    pub driving_outputs: usize,
    pub max_fan_out: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (OperationId, OperationId, OperationId) {
        (OperationId::new(0), OperationId::new(1), OperationId::new(2))
    }

    #[test]
    fn input_accepts_a_single_producer() {
        let (a, b, c) = ids();
        let mut manager = ConnectionManager::new();

        assert!(manager.connect(a.output(0), b.input(0)).is_some());
        assert!(!manager.is_connectable(&c.output(0), &b.input(0)));
        assert!(manager.connect(c.output(0), b.input(0)).is_none());
        assert_eq!(manager.source_map().get(&b.input(0)), Some(&a.output(0)));
    }

    #[test]
    fn outputs_fan_out() {
        let (a, b, c) = ids();
        let mut manager = ConnectionManager::new();

        manager.connect(a.output(0), b.input(0)).unwrap();
        manager.connect(c.input(0), a.output(0)).unwrap();

        assert_eq!(manager.source_map().get(&c.input(0)), Some(&a.output(0)));
        assert_eq!(
            manager.stats(),
            ConnectionStats {
                connections: 2,
                driving_outputs: 1,
                max_fan_out: 2,
            }
        );
    }

    #[test]
    fn same_direction_pairs_are_not_connectable() {
        let (a, b, _) = ids();
        let manager = ConnectionManager::new();

        assert!(!manager.is_connectable(&a.output(0), &b.output(0)));
        assert!(!manager.is_connectable(&a.input(0), &b.input(0)));
        assert!(manager.is_connectable(&b.input(0), &a.output(0)));
    }

    #[test]
    fn disconnect_ignores_output_ports() {
        let (a, b, _) = ids();
        let mut manager = ConnectionManager::new();
        manager.connect(a.output(0), b.input(0)).unwrap();

        assert!(manager.disconnect(&a.output(0)).is_none());
        assert_eq!(manager.len(), 1);

        let released = manager.disconnect(&b.input(0)).unwrap();
        assert_eq!(released.from, a.output(0));
        assert!(manager.is_empty());
    }

    #[test]
    fn self_loops_are_allowed() {
        let (a, _, _) = ids();
        let mut manager = ConnectionManager::new();

        assert!(manager.connect(a.output(0), a.input(0)).is_some());
        assert!(manager.is_connected(&a.output(0)));
        assert!(manager.is_connected(&a.input(0)));
    }

    #[test]
    fn removing_an_operation_drops_both_directions() {
        let (a, b, c) = ids();
        let mut manager = ConnectionManager::new();
        manager.connect(a.output(0), b.input(0)).unwrap();
        manager.connect(b.output(0), c.input(0)).unwrap();
        manager.connect(a.output(0), c.input(1)).unwrap();

        assert_eq!(manager.remove_operation(b), 2);
        assert_eq!(
            manager.connections(),
            vec![Connection {
                from: a.output(0),
                to: c.input(1),
            }]
        );
    }
}
