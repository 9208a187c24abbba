//! Timed execution of a kernel.

use std::hint::black_box;
use std::time::Instant;

use tracing::{debug, trace};

use crate::error::{BenchError, Result};
use crate::kernels::{Kernel, KernelArgs};

/// One timed kernel invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSample {
    /// Position in call order.
    pub index: usize,
    /// Wall-clock duration in nanoseconds.
    pub nanos: u64,
    /// False once outlier rejection has masked this sample.
    pub active: bool,
}

/// Ordered runtime samples of one benchmark.
///
/// The length and the durations are fixed at creation; only the `active`
/// flags change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSet {
    samples: Vec<RuntimeSample>,
}

impl RunSet {
    /// All samples start active.
    pub fn from_nanos<I: IntoIterator<Item = u64>>(nanos: I) -> Self {
        let samples = nanos
            .into_iter()
            .enumerate()
            .map(|(index, nanos)| RuntimeSample {
                index,
                nanos,
                active: true,
            })
            .collect();
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[RuntimeSample] {
        &self.samples
    }

    /// Durations in call order, masked ones included.
    pub fn nanos(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().map(|s| s.nanos)
    }

    pub fn active(&self) -> impl Iterator<Item = &RuntimeSample> {
        self.samples.iter().filter(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn masked_count(&self) -> usize {
        self.len() - self.active_count()
    }

    pub(crate) fn mask(&mut self, index: usize) {
        self.samples[index].active = false;
    }

    /// Marks every sample active again.
    pub fn reset_mask(&mut self) {
        for sample in &mut self.samples {
            sample.active = true;
        }
    }
}

/// Runs a kernel a fixed number of times and records each duration.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkRunner {
    runs: usize,
    warmup: usize,
}

impl BenchmarkRunner {
    pub fn new(runs: usize) -> Result<Self> {
        if runs == 0 {
            return Err(BenchError::InvalidRuns(runs));
        }
        Ok(Self { runs, warmup: 0 })
    }

    /// Untimed invocations executed before the timed loop.
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Invokes `kernel` `runs` times on `args`, timing each call.
    ///
    /// The output buffer is overwritten by every call; after return it holds
    /// the result of the last one.
    pub fn run(&self, kernel: Kernel, args: &mut KernelArgs<'_>) -> RunSet {
        for _ in 0..self.warmup {
            kernel.run(args);
            black_box(args.output());
        }
        if self.warmup > 0 {
            debug!(warmup = self.warmup, "warm-up finished");
        }

        let mut nanos = Vec::with_capacity(self.runs);
        for i in 0..self.runs {
            let start = Instant::now();
            kernel.run(args);
            let elapsed = start.elapsed();
            black_box(args.output());

            let ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
            trace!(run = i, ns, "kernel invocation");
            nanos.push(ns);
        }

        RunSet::from_nanos(nanos)
    }
}
