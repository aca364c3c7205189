//! Built-in operation specs.
//!
//! Every function returns a fresh [`OperationSpec`]; register it with
//! [`System::add_operation`](crate::core::system::System::add_operation).
//! Time-based sources count steps in their state and derive `t = n * dt`, so
//! long runs do not accumulate rounding drift.

pub mod dynamics;
pub mod math;
pub mod nonlinear;
pub mod sinks;
pub mod sources;

use crate::core::components::spec::OperationSpec;

pub use dynamics::{delay, derivative, iir, integral};
pub use math::{add, divide, gain, multiply, subtract};
pub use nonlinear::{clamp, coulomb_friction, quadratic_friction, viscous_friction};
pub use sinks::output;
pub use sources::{constant, noise, sine, step, time};

/// All built-in specs in palette order
pub fn catalog() -> Vec<OperationSpec> {
    vec![
        constant(),
        time(),
        sine(),
        step(),
        noise(),
        add(),
        subtract(),
        multiply(),
        divide(),
        gain(),
        integral(),
        derivative(),
        iir(),
        delay(),
        clamp(),
        coulomb_friction(),
        viscous_friction(),
        quadratic_friction(),
        output(),
    ]
}
