use serde::{Deserialize, Serialize};

/// Stable identifier of a registered operation.
///
/// Ids are handed out by the owning [`System`](crate::core::system::System)
/// and are never reused while the operation is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub(crate) u64);

impl OperationId {
    /// Create an operation ID from a raw value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Create an output port handle
    pub fn output(&self, index: usize) -> Port {
        Port::output(*self, index)
    }

    /// Create an input port handle
    pub fn input(&self, index: usize) -> Port {
        Port::input(*self, index)
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Direction of a port relative to its operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port - receives a value from exactly one output port
    Input,
    /// Output port - may feed any number of input ports
    Output,
}

impl PortDirection {
    /// Check if this direction can be wired to another direction
    pub fn can_connect_to(&self, other: &PortDirection) -> bool {
        self != other
    }
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

/// Handle for one scalar connection point on an operation.
///
/// Ports are structural: they are fully determined by the owning operation's
/// arity and are never allocated on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub(crate) operation: OperationId,
    pub(crate) direction: PortDirection,
    pub(crate) index: usize,
}

impl Port {
    pub fn new(operation: OperationId, direction: PortDirection, index: usize) -> Self {
        Self {
            operation,
            direction,
            index,
        }
    }

    pub fn input(operation: OperationId, index: usize) -> Self {
        Self::new(operation, PortDirection::Input, index)
    }

    pub fn output(operation: OperationId, index: usize) -> Self {
        Self::new(operation, PortDirection::Output, index)
    }

    pub fn operation(&self) -> OperationId {
        self.operation
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}[{}]", self.operation, self.direction, self.index)
    }
}

/// Directed edge from one output port to one input port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: Port,
    pub to: Port,
}

impl Connection {
    /// Orient a pair of ports as output -> input.
    ///
    /// Returns `None` when both ports share a direction.
    pub fn oriented(a: Port, b: Port) -> Option<Self> {
        match (a.direction, b.direction) {
            (PortDirection::Output, PortDirection::Input) => Some(Self { from: a, to: b }),
            (PortDirection::Input, PortDirection::Output) => Some(Self { from: b, to: a }),
            _ => None,
        }
    }

    /// Check whether either endpoint belongs to the given operation
    pub fn touches(&self, operation: OperationId) -> bool {
        self.from.operation == operation || self.to.operation == operation
    }
}
