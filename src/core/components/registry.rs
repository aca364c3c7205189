use crate::core::components::operation::{Operation, OperationInfo};
use crate::core::error::{SimError, SimResult};
use crate::core::types::{OperationId, Port};
use indexmap::IndexMap;

/// Owns every operation instance and hands out ids.
///
/// Insertion order is preserved so enumeration is deterministic. Ids come
/// from a counter owned by this registry, never from process-wide state, so
/// several systems can coexist.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: IndexMap<OperationId, Operation>,
    next_id: u64,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next free id, skipping ids taken by external registrations
    pub fn allocate_id(&mut self) -> SimResult<OperationId> {
        loop {
            let id = OperationId::new(self.next_id);
            self.next_id = self.next_id.checked_add(1).ok_or(SimError::IdsExhausted)?;
            if !self.contains(id) {
                return Ok(id);
            }
        }
    }

    /// Register an operation instance
    pub fn register(&mut self, operation: Operation) -> SimResult<OperationId> {
        let id = operation.id();
        if self.operations.contains_key(&id) {
            return Err(SimError::AlreadyRegistered(id));
        }

        // Externally chosen ids must never collide with later allocations
        if let Some(next) = id.raw().checked_add(1) {
            self.next_id = self.next_id.max(next);
        }
        self.operations.insert(id, operation);
        Ok(id)
    }

    /// Remove an operation, keeping the relative order of the rest
    pub fn remove(&mut self, id: OperationId) -> SimResult<Operation> {
        self.operations
            .shift_remove(&id)
            .ok_or(SimError::NotFound(id))
    }

    pub fn get(&self, id: OperationId) -> SimResult<&Operation> {
        self.operations.get(&id).ok_or(SimError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: OperationId) -> SimResult<&mut Operation> {
        self.operations.get_mut(&id).ok_or(SimError::NotFound(id))
    }

    pub fn contains(&self, id: OperationId) -> bool {
        self.operations.contains_key(&id)
    }

    /// Check whether a port belongs to a registered operation
    pub fn has_port(&self, port: &Port) -> bool {
        self.operations
            .get(&port.operation())
            .is_some_and(|op| op.has_port(port))
    }

    /// Snapshot of every operation in registration order
    pub fn list(&self) -> Vec<OperationInfo> {
        self.operations.values().map(Operation::info).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        self.operations.values_mut()
    }

    /// Every port of every operation, in registration order
    pub fn ports(&self) -> impl Iterator<Item = Port> + '_ {
        self.operations.values().flat_map(Operation::ports)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
