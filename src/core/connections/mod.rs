pub mod manager;
pub mod port_validator;

pub use manager::{ConnectionManager, ConnectionStats};
pub use port_validator::PortValidator;
