pub mod components;
pub mod connections;
pub mod error;
pub mod execution;
pub mod probe;
pub mod system;
pub mod types;

#[cfg(test)]
mod tests;
