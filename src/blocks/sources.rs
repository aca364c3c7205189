//! Source blocks: no inputs, one output.

use crate::core::components::parameters::ParameterSpec;
use crate::core::components::spec::OperationSpec;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Emits a fixed value
pub fn constant() -> OperationSpec {
    OperationSpec::new("Constant", 0, 1, (), |ctx| vec![ctx.number("value", 1.0)])
        .with_parameter("value", ParameterSpec::new("Value", "Constant output value", 1.0))
}

/// Emits the simulated time of the current step, starting at 0
pub fn time() -> OperationSpec {
    OperationSpec::new("Time", 0, 1, 0_u64, |ctx| {
        let t = *ctx.state as f64 * ctx.dt;
        *ctx.state += 1;
        vec![t]
    })
}

/// `amplitude * sin(2π * frequency * t + phase)`
pub fn sine() -> OperationSpec {
    OperationSpec::new("Sine", 0, 1, 0_u64, |ctx| {
        let t = *ctx.state as f64 * ctx.dt;
        *ctx.state += 1;
        let amplitude = ctx.number("amplitude", 1.0);
        let frequency = ctx.number("frequency", 1.0);
        let phase = ctx.number("phase", 0.0);
        vec![amplitude * (2.0 * PI * frequency * t + phase).sin()]
    })
    .with_parameter(
        "amplitude",
        ParameterSpec::new("Amplitude", "Amplitude of the sine wave", 1.0),
    )
    .with_parameter(
        "frequency",
        ParameterSpec::new("Frequency", "Frequency of the sine wave in Hz", 1.0),
    )
    .with_parameter(
        "phase",
        ParameterSpec::new("Phase", "Phase offset in radians", 0.0),
    )
}

/// Switches from `initial` to `final` once `t >= time`
pub fn step() -> OperationSpec {
    OperationSpec::new("Step", 0, 1, 0_u64, |ctx| {
        let t = *ctx.state as f64 * ctx.dt;
        *ctx.state += 1;
        let value = if t >= ctx.number("time", 1.0) {
            ctx.number("final", 1.0)
        } else {
            ctx.number("initial", 0.0)
        };
        vec![value]
    })
    .with_parameter("time", ParameterSpec::new("Step time", "Switching time in seconds", 1.0))
    .with_parameter("initial", ParameterSpec::new("Initial", "Value before the step", 0.0))
    .with_parameter("final", ParameterSpec::new("Final", "Value after the step", 1.0))
}

/// Gaussian white noise.
///
/// The generator is seeded from the `seed` parameter on the first step after
/// `init()`, so every run with the same seed reproduces the same sequence.
/// A negative standard deviation is treated as its magnitude; a non-finite one
/// yields NaN samples.
pub fn noise() -> OperationSpec {
    OperationSpec::new("Noise", 0, 1, None::<StdRng>, |ctx| {
        let mean = ctx.number("mean", 0.0);
        let std_dev = ctx.number("std_dev", 1.0).abs();
        let seed = ctx.number("seed", 0.0);

        let rng = ctx
            .state
            .get_or_insert_with(|| StdRng::seed_from_u64(seed as u64));
        let sample = match Normal::new(mean, std_dev) {
            Ok(distribution) => distribution.sample(rng),
            Err(_) => f64::NAN,
        };
        vec![sample]
    })
    .with_parameter("mean", ParameterSpec::new("Mean", "Mean of the distribution", 0.0))
    .with_parameter(
        "std_dev",
        ParameterSpec::new("Standard deviation", "Spread of the distribution", 1.0),
    )
    .with_parameter("seed", ParameterSpec::new("Seed", "Random generator seed", 0.0))
}
