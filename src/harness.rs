use crate::adder::add_no_arithmetic;
use crate::config::DemoConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub a: i32,
    pub b: i32,
    pub sum: i32,
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {} = {}", self.a, self.b, self.sum)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoRun {
    pub started_at: DateTime<Utc>,
    /// Seed the run was drawn from; pass it back to replay the same pairs.
    pub seed: u64,
    pub max_operand: i32,
    pub samples: Vec<Sample>,
}

/// Add `iterations` random pairs from `[0, max_operand)` with the bitwise adder.
pub fn run_demo(config: &DemoConfig) -> Result<DemoRun> {
    config.validate()?;

    let started_at = Utc::now();
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(
        iterations = config.iterations,
        max_operand = config.max_operand,
        seed,
        "demo: starting"
    );

    let samples = (0..config.iterations)
        .map(|_| {
            let a = rng.random_range(0..config.max_operand);
            let b = rng.random_range(0..config.max_operand);
            let sample = Sample {
                a,
                b,
                sum: add_no_arithmetic(a, b),
            };
            debug!(%sample, "demo sample");
            sample
        })
        .collect();

    Ok(DemoRun {
        started_at,
        seed,
        max_operand: config.max_operand,
        samples,
    })
}
