//! Memoryless nonlinear blocks.

use crate::core::components::parameters::ParameterSpec;
use crate::core::components::spec::OperationSpec;

/// Saturate into `[min, max]`; `max` wins if the bounds cross
pub fn clamp() -> OperationSpec {
    OperationSpec::new("Clamp", 1, 1, (), |ctx| {
        let min = ctx.number("min", -1.0);
        let max = ctx.number("max", 1.0);
        vec![ctx.input(0).max(min).min(max)]
    })
    .with_parameter("min", ParameterSpec::new("Minimum", "Lower bound", -1.0))
    .with_parameter("max", ParameterSpec::new("Maximum", "Upper bound", 1.0))
}

/// Dead band below `static`, constant `kinetic` drag above it
pub fn coulomb_friction() -> OperationSpec {
    OperationSpec::new("Coulomb Friction", 1, 1, (), |ctx| {
        let stiction = ctx.number("static", 0.1);
        let kinetic = ctx.number("kinetic", 0.05);
        let x = ctx.input(0);
        let y = if x > stiction {
            x - kinetic
        } else if x < -stiction {
            x + kinetic
        } else {
            0.0
        };
        vec![y]
    })
    .with_parameter(
        "static",
        ParameterSpec::new("Static friction", "Magnitude that must be exceeded to move", 0.1),
    )
    .with_parameter(
        "kinetic",
        ParameterSpec::new("Kinetic friction", "Drag subtracted while moving", 0.05),
    )
}

pub fn viscous_friction() -> OperationSpec {
    OperationSpec::new("Viscous Friction", 1, 1, (), |ctx| {
        let c = ctx.number("coefficient", 0.1);
        let x = ctx.input(0);
        vec![x - c * x]
    })
    .with_parameter(
        "coefficient",
        ParameterSpec::new("Coefficient", "Drag proportional to the input", 0.1),
    )
}

/// Drag proportional to the square of the input, opposing its sign
pub fn quadratic_friction() -> OperationSpec {
    OperationSpec::new("Quadratic Friction", 1, 1, (), |ctx| {
        let c = ctx.number("coefficient", 0.1);
        let x = ctx.input(0);
        vec![x - c * x * x.abs()]
    })
    .with_parameter(
        "coefficient",
        ParameterSpec::new("Coefficient", "Drag proportional to the squared input", 0.1),
    )
}
