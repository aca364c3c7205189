use std::any::Any;

/// Private, opaque state owned by one operation instance.
///
/// Implemented for every `Clone + Send + 'static` type, so plain structs,
/// numbers, vectors and `()` all work as state. Cloning always produces an
/// independent value; two operations built from the same spec never alias.
pub trait OperationState: Send {
    /// Deep copy into a fresh box
    fn clone_state(&self) -> Box<dyn OperationState>;

    /// Returns a reference to the state as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to the state as Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> OperationState for T
where
    T: Any + Send + Clone,
{
    fn clone_state(&self) -> Box<dyn OperationState> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Downcast a boxed state to its concrete type
pub fn downcast_state<T: Any>(state: &dyn OperationState) -> Option<&T> {
    state.as_any().downcast_ref::<T>()
}

/// Downcast a boxed state mutably to its concrete type
pub fn downcast_state_mut<T: Any>(state: &mut dyn OperationState) -> Option<&mut T> {
    state.as_any_mut().downcast_mut::<T>()
}
