//! Stateful single-input blocks.

use crate::core::components::parameters::ParameterSpec;
use crate::core::components::spec::OperationSpec;

/// Forward-Euler accumulator: `sum += x * dt`
pub fn integral() -> OperationSpec {
    OperationSpec::new("Integral", 1, 1, 0.0_f64, |ctx| {
        let x = ctx.input(0);
        *ctx.state += x * ctx.dt;
        vec![*ctx.state]
    })
}

/// Backward difference against the previous input, which starts at 0
pub fn derivative() -> OperationSpec {
    OperationSpec::new("Derivative", 1, 1, 0.0_f64, |ctx| {
        let x = ctx.input(0);
        let slope = (x - *ctx.state) / ctx.dt;
        *ctx.state = x;
        vec![slope]
    })
}

/// First-order low-pass: `y = a * x + (1 - a) * y_prev`
pub fn iir() -> OperationSpec {
    OperationSpec::new("IIR", 1, 1, 0.0_f64, |ctx| {
        let a = ctx.number("a", 0.1);
        let x = ctx.input(0);
        let y = a * x + (1.0 - a) * *ctx.state;
        *ctx.state = y;
        vec![y]
    })
    .with_parameter(
        "a",
        ParameterSpec::new("Smoothing", "Weight of the new input, in [0, 1]", 0.1),
    )
}

#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    buffer: Vec<f64>,
    head: usize,
}

impl DelayLine {
    /// Push `x` and pop the sample written `len` pushes ago.
    ///
    /// The line is (re)filled with zeros whenever `len` changes.
    fn shift(&mut self, len: usize, x: f64) -> f64 {
        if self.buffer.len() != len {
            self.buffer = vec![0.0; len];
            self.head = 0;
        }
        let out = std::mem::replace(&mut self.buffer[self.head], x);
        self.head = (self.head + 1) % len;
        out
    }
}

/// Longest delay line, in samples
pub const MAX_DELAY_SAMPLES: usize = 1 << 20;

/// Line length for a delay, clamped to `1..=MAX_DELAY_SAMPLES`
fn delay_samples(delay: f64, dt: f64) -> usize {
    let samples = (delay / dt).round();
    if samples.is_nan() || samples < 1.0 {
        1
    } else if samples >= MAX_DELAY_SAMPLES as f64 {
        MAX_DELAY_SAMPLES
    } else {
        samples as usize
    }
}

/// Pure time delay of `round(delay / dt)` samples, at least one
pub fn delay() -> OperationSpec {
    OperationSpec::new("Delay", 1, 1, DelayLine::default(), |ctx| {
        let len = delay_samples(ctx.number("delay", 0.1), ctx.dt);
        let x = ctx.input(0);
        vec![ctx.state.shift(len, x)]
    })
    .with_parameter("delay", ParameterSpec::new("Delay", "Delay time in seconds", 0.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::operation::Operation;
    use crate::core::types::OperationId;

    fn feed(op: &mut Operation, dt: f64, inputs: &[f64]) -> Vec<f64> {
        inputs
            .iter()
            .map(|x| op.transfer(dt, &[*x]).unwrap()[0])
            .collect()
    }

    #[test]
    fn integral_of_constant_is_linear() {
        let mut op = Operation::new(OperationId::new(0), integral());
        let values = feed(&mut op, 0.5, &[2.0; 4]);
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn derivative_of_ramp_is_constant_after_first_step() {
        let mut op = Operation::new(OperationId::new(0), derivative());
        let values = feed(&mut op, 0.5, &[1.0, 2.0, 3.0]);
        assert_eq!(values, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn iir_smooths_towards_input() {
        let mut op = Operation::new(OperationId::new(0), iir());
        op.set_parameter("a", 0.5.into()).unwrap();
        let values = feed(&mut op, 0.01, &[1.0, 1.0, 1.0]);
        assert_eq!(values, vec![0.5, 0.75, 0.875]);
    }

    #[test]
    fn delay_shifts_by_whole_samples() {
        let mut op = Operation::new(OperationId::new(0), delay());
        op.set_parameter("delay", 0.2.into()).unwrap();
        let values = feed(&mut op, 0.1, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(values, vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn delay_shorter_than_dt_still_delays_one_step() {
        let mut op = Operation::new(OperationId::new(0), delay());
        op.set_parameter("delay", 0.0.into()).unwrap();
        let values = feed(&mut op, 0.1, &[1.0, 2.0]);
        assert_eq!(values, vec![0.0, 1.0]);
    }

    #[test]
    fn delay_length_is_bounded() {
        assert_eq!(delay_samples(0.3, 0.1), 3);
        assert_eq!(delay_samples(-1.0, 0.1), 1);
        assert_eq!(delay_samples(f64::NAN, 0.1), 1);
        assert_eq!(delay_samples(1e9, 1e-6), MAX_DELAY_SAMPLES);
        assert_eq!(delay_samples(f64::INFINITY, 0.1), MAX_DELAY_SAMPLES);
    }

    #[test]
    fn huge_delay_runs_on_a_capped_line() {
        let mut op = Operation::new(OperationId::new(0), delay());
        op.set_parameter("delay", 1e9.into()).unwrap();
        let values = feed(&mut op, 1e-6, &[1.0, 2.0]);
        assert_eq!(values, vec![0.0, 0.0]);
    }
}
