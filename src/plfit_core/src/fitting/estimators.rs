//! # Estimators
//! Maximum likelihood estimation of the scaling exponent and test statistic
//! minimization for the cutoffs.

use super::{fit_with_bounds, FitConfig};
use crate::distributions::{normalization, DistributionType, TestStatisticType};
use crate::errors::{Error, PlfitResult};
use itertools::Itertools;
use log::{debug, trace};

/// First alpha value of the grid search.
pub const ALPHA_GRID_START: f64 = 1.5;

/// Alpha values of the grid search are strictly below this value.
pub const ALPHA_GRID_END: f64 = 3.51;

/// Number of tail values and the sum of their logarithms, which is all the log
/// likelihood needs from the data.
#[derive(Debug, Clone, Copy)]
struct TailSummary {
    n: usize,
    log_sum: f64,
}

impl TailSummary {
    fn new(data: &[i64], x_min: i64, x_max: Option<i64>) -> Self {
        let upper = x_max.unwrap_or(i64::MAX);
        data.iter()
            .filter(|x| **x >= x_min && **x <= upper)
            .fold(TailSummary { n: 0, log_sum: 0.0 }, |acc, x| TailSummary {
                n: acc.n + 1,
                log_sum: acc.log_sum + (*x as f64).ln(),
            })
    }

    fn log_likelihood(&self, alpha: f64, x_min: i64, x_max: Option<i64>) -> f64 {
        -(self.n as f64) * normalization(alpha, x_min, x_max).ln() - alpha * self.log_sum
    }
}

/// Number of sample values within `[x_min, x_max]`.
pub(crate) fn tail_size(data: &[i64], x_min: i64, x_max: Option<i64>) -> usize {
    TailSummary::new(data, x_min, x_max).n
}

/// Log likelihood of the sample under a power law.
///
/// Only values inside `[x_min, x_max]` contribute, if `x_max` is `None` the tail is
/// unbounded.
///
/// `L(α) = -n ln(ζ(α, xMin) - ζ(α, xMax + 1)) - α Σ ln(x)`
pub fn log_likelihood(data: &[i64], alpha: f64, x_min: i64, x_max: Option<i64>) -> f64 {
    TailSummary::new(data, x_min, x_max).log_likelihood(alpha, x_min, x_max)
}

/// Candidate values of the alpha grid search for the given step size.
pub fn alpha_grid(precision: f64) -> PlfitResult<Vec<f64>> {
    if !precision.is_finite() || precision <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "Alpha precision must be a positive step, got {}.",
            precision
        )));
    }
    let n_steps = (((ALPHA_GRID_END - ALPHA_GRID_START) / precision).round() as usize).max(1);
    Ok((0..n_steps)
        .map(|idx| ALPHA_GRID_START + idx as f64 * precision)
        .filter(|alpha| *alpha < ALPHA_GRID_END)
        .collect())
}

/// Estimate alpha by maximizing the log likelihood over a grid of candidates.
///
/// The grid covers `[1.50, 3.51)` with the provided step, ties resolve to the
/// smallest alpha.
///
/// ```
///     use plfit_core::fitting::estimate_alpha;
///     let data = [1, 1, 1, 1, 1, 1, 2, 2, 3, 4, 7];
///     let alpha = estimate_alpha(&data, 1, None, 0.01).unwrap();
///     assert!(alpha > 1.5 && alpha < 3.51);
/// ```
pub fn estimate_alpha(
    data: &[i64],
    x_min: i64,
    x_max: Option<i64>,
    precision: f64,
) -> PlfitResult<f64> {
    let tail = TailSummary::new(data, x_min, x_max);
    if tail.n == 0 {
        return Err(Error::InvalidInput(format!(
            "No sample values are at or above xMin ({}).",
            x_min
        )));
    }

    let mut best_alpha = ALPHA_GRID_START;
    let mut best_likelihood = f64::NEG_INFINITY;
    for alpha in alpha_grid(precision)? {
        let likelihood = tail.log_likelihood(alpha, x_min, x_max);
        if likelihood > best_likelihood {
            best_likelihood = likelihood;
            best_alpha = alpha;
        }
    }
    Ok(best_alpha)
}

/// Estimate alpha from the continuous approximation of the likelihood,
/// `α = 1 + n / Σ ln(x / (xMin - ½))`.
pub fn estimate_alpha_approximate(data: &[i64], x_min: i64, x_max: Option<i64>) -> PlfitResult<f64> {
    let upper = x_max.unwrap_or(i64::MAX);
    let shift = x_min as f64 - 0.5;
    let (n, sum) = data
        .iter()
        .filter(|x| **x >= x_min && **x <= upper)
        .fold((0_usize, 0.0), |(n, sum), x| {
            (n + 1, sum + (*x as f64 / shift).ln())
        });
    if n == 0 {
        return Err(Error::InvalidInput(format!(
            "No sample values are at or above xMin ({}).",
            x_min
        )));
    }
    Ok(1.0 + n as f64 / sum)
}

/// Estimate the lower cutoff by minimizing the Kolmogorov-Smirnov statistic.
///
/// Candidates are scanned upward from the smallest sample value, fitting a model at
/// each one. The scan stops at the first candidate whose statistic is larger than the
/// smallest seen so far, and the minimizing candidate is returned. This finds the
/// first local minimum of the statistic, not necessarily the global one.
///
/// The statistic is always Kolmogorov-Smirnov regardless of the configured one. For
/// bounded distributions with a known `x_max` the candidate models are bounded at
/// `x_max`, even when it lies above every sample value, otherwise candidates are
/// unbounded. Candidates never exceed the largest sample value.
pub fn estimate_lower_bound(data: &[i64], config: &FitConfig) -> PlfitResult<i64> {
    let (min, max) = data
        .iter()
        .copied()
        .minmax()
        .into_option()
        .ok_or(Error::NoInput)?;

    let (distribution, upper, scan_end) = match (config.distribution, config.x_max) {
        (DistributionType::LeftAndRightBounded, Some(x_max)) => {
            (DistributionType::LeftAndRightBounded, x_max, x_max.min(max))
        }
        _ => (DistributionType::LeftBounded, max, max),
    };
    let start = min.max(1);
    if start >= scan_end {
        return Err(Error::InvalidInput(format!(
            "No candidate xMin exists below {}.",
            scan_end
        )));
    }

    let mut best_x_min = start;
    let mut best_stat = f64::INFINITY;
    for x_min in start..scan_end {
        let candidate = FitConfig {
            x_min: Some(x_min),
            test_statistic: TestStatisticType::KolmogorovSmirnov,
            distribution,
            ..*config
        };
        let stat = fit_with_bounds(data, x_min, upper, &candidate)
            .ok()
            .and_then(|model| model.test_statistic())
            .unwrap_or(f64::INFINITY);
        trace!("xMin candidate {} has KS statistic {}", x_min, stat);

        if stat < best_stat {
            best_stat = stat;
            best_x_min = x_min;
        } else if stat > best_stat {
            break;
        }
    }

    let x_min = best_x_min.clamp(1, max);
    debug!("Estimated xMin = {} (KS statistic {})", x_min, best_stat);
    Ok(x_min)
}

/// Estimate the upper cutoff of a bounded distribution.
///
/// Every candidate in `[x_min + smallest_interval, max(data))` is fit and the global
/// minimizer of the Kolmogorov-Smirnov statistic is returned, ties resolve to the
/// smallest candidate. If there are no candidates the largest sample value is used.
pub fn estimate_upper_bound(data: &[i64], x_min: i64, config: &FitConfig) -> PlfitResult<i64> {
    let max = data.iter().copied().max().ok_or(Error::NoInput)?;
    let start = x_min.saturating_add(config.smallest_interval.max(1));

    let candidate = FitConfig {
        x_min: Some(x_min),
        test_statistic: TestStatisticType::KolmogorovSmirnov,
        distribution: DistributionType::LeftAndRightBounded,
        ..*config
    };

    let mut best_x_max = max;
    let mut best_stat = f64::INFINITY;
    for x_max in start..max {
        let stat = fit_with_bounds(data, x_min, x_max, &candidate)
            .ok()
            .and_then(|model| model.test_statistic())
            .unwrap_or(f64::INFINITY);
        trace!("xMax candidate {} has KS statistic {}", x_max, stat);

        if stat < best_stat {
            best_stat = stat;
            best_x_max = x_max;
        }
    }
    debug!("Estimated xMax = {} (KS statistic {})", best_x_max, best_stat);
    Ok(best_x_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{PowerLawModel, SampleMethod};
    use crate::random::RandomSource;

    #[test]
    fn test_alpha_grid() {
        let grid = alpha_grid(0.01).unwrap();
        assert_eq!(grid.len(), 201);
        assert_eq!(grid[0], 1.5);
        assert!((grid[200] - 3.5).abs() < 1e-12);

        let grid = alpha_grid(0.1).unwrap();
        assert_eq!(grid.len(), 20);
        assert!(alpha_grid(0.0).is_err());
        assert!(alpha_grid(f64::NAN).is_err());
    }

    #[test]
    fn test_log_likelihood() {
        // A single observation at xMin = 1 gives L = -ln ζ(α).
        let ll = log_likelihood(&[1], 2.0, 1, None);
        assert!((ll + (std::f64::consts::PI.powi(2) / 6.0).ln()).abs() < 1e-12);

        // Values outside the tail are ignored.
        assert_eq!(log_likelihood(&[1, 5, 0, -3], 2.0, 1, Some(4)), log_likelihood(&[1], 2.0, 1, Some(4)));
    }

    #[test]
    fn test_estimate_alpha_recovers() {
        let mut rng = RandomSource::new(Some(1234));
        let model = PowerLawModel::new(2.5, 1, 1000, DistributionType::LeftBounded).unwrap();
        let data = model.sample_n(20_000, &mut rng, SampleMethod::Precise);

        let alpha = estimate_alpha(&data, 1, None, 0.01).unwrap();
        assert!((alpha - 2.5).abs() < 0.05, "{alpha}");
    }

    #[test]
    fn test_estimate_alpha_approximate() {
        // The continuous approximation is only reasonable for larger xMin.
        let mut rng = RandomSource::new(Some(4321));
        let model = PowerLawModel::new(2.5, 6, 1000, DistributionType::LeftBounded).unwrap();
        let data = model.sample_n(20_000, &mut rng, SampleMethod::Precise);

        let approx = estimate_alpha_approximate(&data, 6, None).unwrap();
        assert!((approx - 2.5).abs() < 0.1, "{approx}");
    }

    #[test]
    fn test_estimate_alpha_bounded() {
        let mut rng = RandomSource::new(Some(99));
        let model = PowerLawModel::new(1.8, 2, 60, DistributionType::LeftAndRightBounded).unwrap();
        let data = model.sample_n(20_000, &mut rng, SampleMethod::Precise);
        let alpha = estimate_alpha(&data, 2, Some(60), 0.01).unwrap();
        assert!((alpha - 1.8).abs() < 0.05, "{alpha}");
    }

    #[test]
    fn test_estimate_alpha_empty_tail() {
        assert!(estimate_alpha(&[1, 2, 3], 10, None, 0.01).is_err());
        assert!(estimate_alpha_approximate(&[1, 2, 3], 10, None).is_err());
    }

    #[test]
    fn test_lower_bound_first_local_minimum() {
        // A flat bulk below 5 followed by a power law tail.
        let mut rng = RandomSource::new(Some(5));
        let model = PowerLawModel::new(2.5, 5, 1000, DistributionType::LeftBounded).unwrap();
        let mut data = model.sample_n(2_000, &mut rng, SampleMethod::Precise);
        for _ in 0..100 {
            data.extend([1, 2, 3, 4]);
        }
        let config = FitConfig::default();
        let x_min = estimate_lower_bound(&data, &config).unwrap();

        let max = *data.iter().max().unwrap();
        let stat = |x: i64| {
            let candidate = FitConfig {
                x_min: Some(x),
                ..config
            };
            fit_with_bounds(&data, x, max, &candidate)
                .unwrap()
                .test_statistic()
                .unwrap()
        };

        // Every earlier candidate decreased the statistic, the next one does not.
        for x in 1..x_min {
            assert!(stat(x + 1) < stat(x), "x={x}");
        }
        assert!(stat(x_min + 1) >= stat(x_min));
    }

    #[test]
    fn test_lower_bound_known_upper_cutoff() {
        // The known cutoff lies above every sample value.
        let mut rng = RandomSource::new(Some(8));
        let model = PowerLawModel::new(2.0, 4, 300, DistributionType::LeftAndRightBounded).unwrap();
        let mut data: Vec<i64> = model
            .sample_n(2_000, &mut rng, SampleMethod::Precise)
            .into_iter()
            .filter(|x| *x < 200)
            .collect();
        for _ in 0..100 {
            data.extend([1, 2, 3]);
        }
        let config = FitConfig::default()
            .with_distribution(DistributionType::LeftAndRightBounded)
            .with_x_max(300);
        let x_min = estimate_lower_bound(&data, &config).unwrap();
        assert!(x_min < 200);

        let stat = |x: i64| {
            let candidate = FitConfig {
                x_min: Some(x),
                ..config
            };
            fit_with_bounds(&data, x, 300, &candidate)
                .unwrap()
                .test_statistic()
                .unwrap()
        };
        for x in 1..x_min {
            assert!(stat(x + 1) < stat(x), "x={x}");
        }
        assert!(stat(x_min + 1) >= stat(x_min));
    }

    #[test]
    fn test_lower_bound_no_candidates() {
        assert!(estimate_lower_bound(&[3, 3, 3], &FitConfig::default()).is_err());
        assert_eq!(
            estimate_lower_bound(&[], &FitConfig::default()),
            Err(Error::NoInput)
        );
    }

    #[test]
    fn test_upper_bound() {
        let data = [1, 1, 1, 2, 2, 3, 4, 6, 9, 15, 400];
        let config = FitConfig::default()
            .with_distribution(DistributionType::LeftAndRightBounded)
            .with_smallest_interval(3);
        let x_max = estimate_upper_bound(&data, 1, &config).unwrap();
        assert!((4..400).contains(&x_max), "{x_max}");

        // No room for a candidate, fall back to the largest value.
        let x_max = estimate_upper_bound(&[1, 2, 3], 1, &config).unwrap();
        assert_eq!(x_max, 3);
    }
}
