use crate::core::components::parameters::ParameterSpec;
use crate::core::components::spec::OperationSpec;

fn binary(name: &str, f: fn(f64, f64) -> f64) -> OperationSpec {
    OperationSpec::new(name, 2, 1, (), move |ctx| vec![f(ctx.input(0), ctx.input(1))])
}

pub fn add() -> OperationSpec {
    binary("Add", |a, b| a + b)
}

pub fn subtract() -> OperationSpec {
    binary("Subtract", |a, b| a - b)
}

pub fn multiply() -> OperationSpec {
    binary("Multiply", |a, b| a * b)
}

/// IEEE division; a zero divisor yields an infinity or NaN
pub fn divide() -> OperationSpec {
    binary("Divide", |a, b| a / b)
}

pub fn gain() -> OperationSpec {
    OperationSpec::new("Gain", 1, 1, (), |ctx| {
        vec![ctx.number("gain", 1.0) * ctx.input(0)]
    })
    .with_parameter("gain", ParameterSpec::new("Gain", "Multiplier applied to the input", 1.0))
}
