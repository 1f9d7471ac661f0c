//! Check the bitwise adder against native wrapping addition.

use crate::adder::{BitWord, add_words};
use crate::config::VerifyConfig;
use crate::error::{Error, Result};
use crate::width::Width;
use chrono::{DateTime, Utc};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Mismatches kept in a report; the count is tracked past this.
pub const MAX_REPORTED_MISMATCHES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyMode {
    Exhaustive,
    Sampled,
}

impl std::fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::Sampled => write!(f, "sampled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub a: i64,
    pub b: i64,
    pub expected: i64,
    pub actual: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub width: Width,
    pub mode: VerifyMode,
    pub seed: Option<u64>,
    pub checked: u64,
    pub mismatch_count: u64,
    pub mismatches: Vec<Mismatch>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.mismatch_count == 0
    }
}

/// Native reference for one width, plus the boundary values worth crossing.
trait Reference: BitWord + Into<i64> {
    fn reference_add(self, other: Self) -> Self;
    fn edges() -> [Self; 5];
}

macro_rules! impl_reference {
    ($($t:ty),*) => {
        $(
            impl Reference for $t {
                fn reference_add(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }

                fn edges() -> [Self; 5] {
                    [<$t>::MIN, -1, 0, 1, <$t>::MAX]
                }
            }
        )*
    };
}

impl_reference!(i8, i16, i32, i64);

#[derive(Debug, Default)]
struct Tally {
    checked: u64,
    mismatch_count: u64,
    mismatches: Vec<Mismatch>,
}

impl Tally {
    fn check<T: Reference>(&mut self, a: T, b: T) {
        self.checked += 1;
        let actual = add_words(a, b);
        let expected = a.reference_add(b);
        if actual != expected {
            self.mismatch_count += 1;
            if self.mismatches.len() < MAX_REPORTED_MISMATCHES {
                self.mismatches.push(Mismatch {
                    a: a.into(),
                    b: b.into(),
                    expected: expected.into(),
                    actual: actual.into(),
                });
            }
        }
    }

    fn merge(&mut self, other: Tally) {
        self.checked += other.checked;
        self.mismatch_count += other.mismatch_count;
        let room = MAX_REPORTED_MISMATCHES.saturating_sub(self.mismatches.len());
        self.mismatches.extend(other.mismatches.into_iter().take(room));
    }
}

/// Every pair of 8-bit operands.
pub fn verify_exhaustive_w8() -> VerifyReport {
    let started_at = Utc::now();
    let timer = Instant::now();
    let mut tally = Tally::default();
    for a in i8::MIN..=i8::MAX {
        for b in i8::MIN..=i8::MAX {
            tally.check(a, b);
        }
    }
    info!(
        checked = tally.checked,
        mismatches = tally.mismatch_count,
        "verify: exhaustive 8-bit done"
    );
    report(Width::W8, VerifyMode::Exhaustive, None, tally, started_at, timer)
}

/// Random pairs over the full range of the configured width, split across worker tasks.
pub async fn verify_sampled(config: &VerifyConfig) -> Result<VerifyReport> {
    config.validate()?;
    match config.width {
        Width::W8 => run_sampled::<i8>(config).await,
        Width::W16 => run_sampled::<i16>(config).await,
        Width::W32 => run_sampled::<i32>(config).await,
        Width::W64 => run_sampled::<i64>(config).await,
    }
}

async fn run_sampled<T>(config: &VerifyConfig) -> Result<VerifyReport>
where
    T: Reference,
    StandardUniform: Distribution<T>,
{
    let started_at = Utc::now();
    let timer = Instant::now();
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    info!(
        width = %config.width,
        samples = config.samples,
        workers = config.workers,
        seed,
        "verify: sampling"
    );

    let mut tally = Tally::default();
    for a in T::edges() {
        for b in T::edges() {
            tally.check(a, b);
        }
    }

    let mut set = JoinSet::new();
    for (worker, count) in chunk_sizes(config.samples, config.workers)
        .into_iter()
        .enumerate()
    {
        if count == 0 {
            continue;
        }
        let worker_seed = worker_seed(seed, worker);
        set.spawn_blocking(move || {
            let mut rng = StdRng::seed_from_u64(worker_seed);
            let mut local = Tally::default();
            for _ in 0..count {
                let a: T = rng.random();
                let b: T = rng.random();
                local.check(a, b);
            }
            debug!(worker, checked = local.checked, "verify: worker done");
            local
        });
    }

    while let Some(joined) = set.join_next().await {
        let local = joined.map_err(|e| Error::worker(format!("verification task failed: {e}")))?;
        tally.merge(local);
    }

    if tally.mismatch_count > 0 {
        warn!(
            mismatches = tally.mismatch_count,
            "verify: adder disagrees with native addition"
        );
    }
    Ok(report(
        config.width,
        VerifyMode::Sampled,
        Some(seed),
        tally,
        started_at,
        timer,
    ))
}

/// Split `total` into `workers` near-equal chunks; earlier chunks take the remainder.
fn chunk_sizes(total: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let base = total / workers;
    let extra = total % workers;
    (0..workers)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

fn worker_seed(seed: u64, worker: usize) -> u64 {
    seed ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn report(
    width: Width,
    mode: VerifyMode,
    seed: Option<u64>,
    tally: Tally,
    started_at: DateTime<Utc>,
    timer: Instant,
) -> VerifyReport {
    VerifyReport {
        width,
        mode,
        seed,
        checked: tally.checked,
        mismatch_count: tally.mismatch_count,
        mismatches: tally.mismatches,
        started_at,
        elapsed_ms: u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_sizes_cover_total() {
        assert_eq!(chunk_sizes(10, 3), vec![4, 3, 3]);
        assert_eq!(chunk_sizes(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(chunk_sizes(0, 2), vec![0, 0]);
        assert_eq!(chunk_sizes(5, 0), vec![5]);
    }

    #[test]
    fn worker_seeds_differ() {
        assert_eq!(worker_seed(7, 0), 7);
        assert_ne!(worker_seed(7, 1), worker_seed(7, 2));
    }

    #[test]
    fn tally_caps_reported_mismatches() {
        let mut tally = Tally::default();
        let mut other = Tally::default();
        for i in 0..40 {
            other.mismatch_count += 1;
            other.mismatches.push(Mismatch {
                a: i,
                b: 0,
                expected: i,
                actual: -i,
            });
        }
        other.checked = 40;
        tally.merge(other);
        assert_eq!(tally.checked, 40);
        assert_eq!(tally.mismatch_count, 40);
        assert_eq!(tally.mismatches.len(), MAX_REPORTED_MISMATCHES);
    }

    #[test]
    fn exhaustive_w8_passes() {
        let report = verify_exhaustive_w8();
        assert!(report.passed());
        assert_eq!(report.checked, 65_536);
        assert_eq!(report.mode, VerifyMode::Exhaustive);
        assert!(report.seed.is_none());
    }

    #[tokio::test]
    async fn sampled_counts_edges_and_samples() {
        let config = VerifyConfig {
            width: Width::W32,
            samples: 1_000,
            workers: 3,
            seed: Some(5),
        };
        let report = verify_sampled(&config).await.unwrap();
        assert!(report.passed());
        assert_eq!(report.checked, 1_000 + 25);
        assert_eq!(report.seed, Some(5));
        assert_eq!(report.width, Width::W32);
    }

    #[tokio::test]
    async fn unseeded_sampling_records_drawn_seed() {
        let config = VerifyConfig {
            width: Width::W16,
            samples: 200,
            workers: 2,
            seed: None,
        };
        let report = verify_sampled(&config).await.unwrap();
        assert!(report.passed());
        let seed = report.seed.expect("drawn seed is recorded");

        let replay = verify_sampled(&VerifyConfig {
            seed: Some(seed),
            ..config
        })
        .await
        .unwrap();
        assert_eq!(replay.seed, Some(seed));
        assert_eq!(replay.checked, report.checked);
    }

    #[test]
    fn elapsed_is_reported_in_millis() {
        let report = report(
            Width::W8,
            VerifyMode::Exhaustive,
            None,
            Tally::default(),
            Utc::now(),
            Instant::now(),
        );
        assert!(report.elapsed_ms < 60_000);
    }

    #[tokio::test]
    async fn sampled_rejects_zero_workers() {
        let config = VerifyConfig {
            workers: 0,
            ..VerifyConfig::default()
        };
        assert!(verify_sampled(&config).await.is_err());
    }
}
