//! Outlier-filtered averaging of runtime samples.
//!
//! Each pass computes the mean and population standard deviation of the
//! still-active samples, then masks every sample further than `k·σ` from the
//! mean. Passes repeat until one masks nothing. Sums are accumulated in
//! sample order so the result and pass count are reproducible.

use tracing::debug;

use crate::error::{BenchError, Result};
use crate::runner::RunSet;

/// Default rejection multiplier.
pub const DEFAULT_STDEVS: f64 = 3.0;

/// Result of [`OutlierFilter::reduce`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustMean {
    /// Mean of the samples left active, in nanoseconds.
    pub average_ns: f64,
    /// Population standard deviation of the samples left active.
    pub std_dev_ns: f64,
    pub min_ns: u64,
    pub max_ns: u64,
    pub active: usize,
    /// Samples masked across all passes.
    pub masked: usize,
    /// Passes executed, including the final one that masked nothing.
    pub iterations: usize,
}

impl RobustMean {
    /// Average rounded to whole nanoseconds.
    pub fn average_nanos(&self) -> u64 {
        self.average_ns.round() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    n_stdevs: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            n_stdevs: DEFAULT_STDEVS,
        }
    }
}

struct PassStats {
    mean: f64,
    std_dev: f64,
    min: u64,
    max: u64,
    count: usize,
}

impl OutlierFilter {
    pub fn new(n_stdevs: f64) -> Result<Self> {
        if !n_stdevs.is_finite() || n_stdevs <= 0.0 {
            return Err(BenchError::InvalidThreshold(n_stdevs));
        }
        Ok(Self { n_stdevs })
    }

    pub fn n_stdevs(&self) -> f64 {
        self.n_stdevs
    }

    /// Masks outliers in `runs` and returns the mean of what remains.
    ///
    /// Masks left over from an earlier reduction are cleared first, so the
    /// reported `masked` count always covers the whole set.
    ///
    /// Runs at most `runs.len()` passes. A pass that would mask every
    /// remaining sample masks nothing instead, so at least one sample always
    /// stays active.
    pub fn reduce(&self, runs: &mut RunSet) -> Result<RobustMean> {
        if runs.is_empty() {
            return Err(BenchError::NoSamples);
        }

        runs.reset_mask();
        let max_passes = runs.len();
        let mut iterations = 0;

        let stats = loop {
            iterations += 1;
            let stats = pass_stats(runs).ok_or(BenchError::NoSamples)?;
            let limit = self.n_stdevs * stats.std_dev;

            let outliers: Vec<usize> = runs
                .samples()
                .iter()
                .enumerate()
                .filter(|(_, s)| s.active && (s.nanos as f64 - stats.mean).abs() > limit)
                .map(|(i, _)| i)
                .collect();

            let newly_masked = if outliers.len() >= stats.count {
                debug!(
                    pass = iterations,
                    candidates = outliers.len(),
                    "rejection would mask every sample, keeping them"
                );
                0
            } else {
                for &i in &outliers {
                    runs.mask(i);
                }
                outliers.len()
            };

            debug!(
                pass = iterations,
                std_dev = stats.std_dev,
                average = stats.mean,
                active = stats.count,
                masked = newly_masked,
                "statistics pass"
            );

            if newly_masked == 0 {
                break stats;
            }
            // Unreachable while every masking pass keeps one sample active;
            // bounds the loop should that ever change
            if iterations >= max_passes {
                break pass_stats(runs).ok_or(BenchError::NoSamples)?;
            }
        };

        Ok(RobustMean {
            average_ns: stats.mean,
            std_dev_ns: stats.std_dev,
            min_ns: stats.min,
            max_ns: stats.max,
            active: stats.count,
            masked: runs.masked_count(),
            iterations,
        })
    }
}

fn pass_stats(runs: &RunSet) -> Option<PassStats> {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut min = u64::MAX;
    let mut max = 0u64;
    for s in runs.active() {
        count += 1;
        sum += s.nanos as f64;
        min = min.min(s.nanos);
        max = max.max(s.nanos);
    }
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;

    let mut sq = 0.0f64;
    for s in runs.active() {
        let d = s.nanos as f64 - mean;
        sq += d * d;
    }
    let std_dev = (sq / count as f64).sqrt();

    Some(PassStats {
        mean,
        std_dev,
        min,
        max,
        count,
    })
}
