use sigflow::blocks;
use sigflow::{SimulationConfig, System};

/// Settings for the step response demo
#[derive(Debug, Clone)]
pub struct StepResponseConfig {
    pub dt: f64,
    pub duration: f64,
    pub step_time: f64,
    pub smoothing: f64,
    pub noise_std_dev: f64,
    pub seed: u64,
}

impl Default for StepResponseConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            duration: 10.0,
            step_time: 1.0,
            smoothing: 0.1,
            noise_std_dev: 0.05,
            seed: 42,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let config = StepResponseConfig::default();
    println!("Step response through a single-pole IIR filter");
    println!(
        "  dt={}, duration={}, step at t={}, a={}, noise std_dev={}",
        config.dt, config.duration, config.step_time, config.smoothing, config.noise_std_dev
    );
    println!();

    let mut system = System::with_config(SimulationConfig::default().with_dt(config.dt))?;

    // step + noise -> IIR -> output
    let step = system.add_operation(blocks::step())?;
    let noise = system.add_operation(blocks::noise())?;
    let sum = system.add_operation(blocks::add())?;
    let filter = system.add_operation(blocks::iir())?;
    let sink = system.add_operation(blocks::output())?;

    system.set_parameter(step, "time", config.step_time)?;
    system.set_parameter(noise, "std_dev", config.noise_std_dev)?;
    system.set_parameter(noise, "seed", config.seed as f64)?;
    system.set_parameter(filter, "a", config.smoothing)?;

    system.connect(step.output(0), sum.input(0))?;
    system.connect(noise.output(0), sum.input(1))?;
    system.connect(sum.output(0), filter.input(0))?;
    system.connect(filter.output(0), sink.input(0))?;

    system.probe(sum.output(0), "raw")?;
    system.probe(filter.output(0), "filtered")?;

    system.init()?;
    let steps = system.run(config.duration)?;

    println!("Completed {} steps, t={:.2}", steps, system.time());
    for report in system.report() {
        let last = report.data.last().copied().unwrap_or(f64::NAN);
        let peak = report.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {:<10} samples={} final={:.4} peak={:.4}",
            report.title,
            report.data.len(),
            last,
            peak
        );
    }

    Ok(())
}
