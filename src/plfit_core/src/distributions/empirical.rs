//! Empirical step distribution of an integer sample.

use crate::errors::{Error, PlfitResult};
use itertools::Itertools;

/// A run of consecutive integers `[start, end]` over which the empirical CDF is
/// constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First integer of the run.
    pub start: i64,

    /// Last integer of the run, inclusive.
    pub end: i64,

    /// Empirical CDF over the run.
    pub cdf: f64,
}

/// Discrete empirical distribution of a sample truncated to `[x_min, x_max]`.
///
/// The CDF is stored in survival form, `CDF(x)` is the fraction of the retained
/// sample which is `>= x`. As a result `CDF(x_min) == 1.0` and the CDF decreases
/// stepwise to `0.0` after `x_max`.
///
/// Only the distinct sample values are stored, the CDF between two of them is
/// constant, so a lookup is a binary search over the distinct values.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalDistribution {
    x_min: i64,
    x_max: i64,
    n_samples: usize,

    /// Distinct retained values in ascending order.
    values: Vec<i64>,

    /// Fraction of the retained sample `>= values[i]`.
    survival: Vec<f64>,
}

impl EmpiricalDistribution {
    /// Build the distribution of the full sample, bounds are inferred from the data.
    pub fn new(sample: &[i64]) -> PlfitResult<Self> {
        let (x_min, x_max) = sample
            .iter()
            .minmax()
            .into_option()
            .ok_or(Error::NoInput)?;
        Self::with_bounds(sample, *x_min, Some(*x_max))
    }

    /// Build the distribution of the sample truncated to `[x_min, x_max]`.
    ///
    /// If `x_max` is not provided, the largest sample value is used.
    pub fn with_bounds(sample: &[i64], x_min: i64, x_max: Option<i64>) -> PlfitResult<Self> {
        if sample.is_empty() {
            return Err(Error::NoInput);
        }
        let upper = x_max.unwrap_or(i64::MAX);
        let mut tail = sample
            .iter()
            .copied()
            .filter(|x| *x >= x_min && *x <= upper)
            .collect_vec();
        if tail.is_empty() {
            return Err(Error::InvalidInput(format!(
                "No sample values are contained within [{}, {}].",
                x_min, upper
            )));
        }
        tail.sort_unstable();

        let n_samples = tail.len();
        let x_max = x_max.unwrap_or(tail[n_samples - 1]);

        let mut values = Vec::new();
        let mut survival = Vec::new();
        let mut n_below = 0;
        for (value, group) in &tail.iter().chunk_by(|x| **x) {
            values.push(value);
            survival.push(1.0 - n_below as f64 / n_samples as f64);
            n_below += group.count();
        }

        Ok(EmpiricalDistribution {
            x_min,
            x_max,
            n_samples,
            values,
            survival,
        })
    }

    /// Lower bound of the distribution.
    pub fn x_min(&self) -> i64 {
        self.x_min
    }

    /// Upper bound of the distribution.
    pub fn x_max(&self) -> i64 {
        self.x_max
    }

    /// Number of sample values retained within the bounds.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Survival form CDF, the fraction of the retained sample `>= x`.
    pub fn cdf(&self, x: i64) -> f64 {
        if x <= self.x_min {
            return 1.0;
        }
        if x > self.x_max {
            return 0.0;
        }
        let idx = self.values.partition_point(|v| *v < x);
        self.survival.get(idx).copied().unwrap_or(0.0)
    }

    /// Split `[start, end]` into runs of constant CDF.
    pub fn segments(&self, start: i64, end: i64) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.values.len() + 1);
        let mut lo = start;
        for (value, cdf) in self.values.iter().zip(&self.survival) {
            if lo > end {
                break;
            }
            let hi = (*value).min(end);
            if hi >= lo {
                segments.push(Segment {
                    start: lo,
                    end: hi,
                    cdf: *cdf,
                });
            }
            match value.checked_add(1) {
                Some(next) => lo = lo.max(next),
                None => return segments,
            }
        }
        if lo <= end {
            segments.push(Segment {
                start: lo,
                end,
                cdf: 0.0,
            });
        }
        segments
    }
}
