//! # Test statistics
//! Discrepancy between the empirical distribution of a sample and a power law model.
//!
//! Both CDFs are in survival form. The empirical CDF is constant between sample
//! values, so statistics are evaluated per constant [`Segment`] instead of per
//! integer, which keeps sparse heavy tails cheap.

use crate::distributions::{EmpiricalDistribution, PowerLawModel, Segment, TestStatisticType};
use crate::fitting::PowerLawFit;

/// Number of integers at each end of a segment which are always summed exactly.
const EXACT_WINDOW: i64 = 1024;

/// Compute a test statistic of a model against a sample.
///
/// The sample is truncated to `[xMin, xMax]` of the model. If no sample values
/// remain, infinity is returned. [`TestStatisticType::None`] evaluates to NAN.
pub fn calculate_test_statistic(
    model: &PowerLawModel,
    data: &[i64],
    kind: TestStatisticType,
) -> f64 {
    if kind == TestStatisticType::None {
        return f64::NAN;
    }
    match EmpiricalDistribution::with_bounds(data, model.x_min(), Some(model.x_max())) {
        Ok(empirical) => test_statistic(&empirical, model, kind),
        Err(_) => f64::INFINITY,
    }
}

/// Kolmogorov-Smirnov statistic of a fit against the sample.
///
/// Invalid fits are maximally bad, and return infinity.
pub fn calculate_ks_statistic_of_fit(fit: &PowerLawFit, data: &[i64]) -> f64 {
    fit.model().map_or(f64::INFINITY, |model| {
        calculate_test_statistic(model, data, TestStatisticType::KolmogorovSmirnov)
    })
}

/// Compute a test statistic between an empirical distribution and a model over
/// `[xMin, xMax]` of the model.
pub fn test_statistic(
    empirical: &EmpiricalDistribution,
    model: &PowerLawModel,
    kind: TestStatisticType,
) -> f64 {
    if model.x_min() >= model.x_max() || empirical.n_samples() == 0 {
        return f64::INFINITY;
    }
    let segments = empirical.segments(model.x_min(), model.x_max());
    let n_samples = empirical.n_samples() as f64;
    match kind {
        TestStatisticType::KolmogorovSmirnov => ks_statistic(&segments, model),
        TestStatisticType::CramerVonMises => {
            n_samples
                * segments
                    .iter()
                    .map(|seg| weighted_sum(seg, model, cvm_summand))
                    .sum::<f64>()
        }
        TestStatisticType::AndersonDarling => {
            n_samples
                * segments
                    .iter()
                    .map(|seg| weighted_sum(seg, model, ad_summand))
                    .sum::<f64>()
        }
        TestStatisticType::None => f64::NAN,
    }
}

/// Largest absolute difference between the two CDFs.
///
/// The model CDF is monotone, so the largest difference over a segment of constant
/// empirical CDF is found at one of its ends.
fn ks_statistic(segments: &[Segment], model: &PowerLawModel) -> f64 {
    segments
        .iter()
        .map(|seg| {
            let first = (seg.cdf - model.cdf(seg.start)).abs();
            let last = (seg.cdf - model.cdf(seg.end)).abs();
            first.max(last)
        })
        .fold(0.0, f64::max)
}

#[inline]
fn cvm_summand(empirical: f64, model: f64) -> f64 {
    (empirical - model).powi(2)
}

#[inline]
fn ad_summand(empirical: f64, model: f64) -> f64 {
    let denominator = model * (1.0 - model);
    if denominator == 0.0 {
        return 0.0;
    }
    (empirical - model).powi(2) / denominator
}

/// Sum of `summand(E, S(x)) * PDF(x)` over the segment.
///
/// The ends of long segments are summed exactly. The interior is smooth in `x`, so
/// its sum is replaced by the integral over `[start - ½, end + ½]` of the continuous
/// extension of the model, see [`interior_integral`].
fn weighted_sum<F>(seg: &Segment, model: &PowerLawModel, summand: F) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let exact = |start: i64, end: i64| -> f64 {
        (start..=end)
            .map(|x| summand(seg.cdf, model.cdf(x)) * model.pdf(x))
            .sum()
    };

    if seg.end - seg.start < 2 * EXACT_WINDOW {
        return exact(seg.start, seg.end);
    }

    let head_end = seg.start + EXACT_WINDOW - 1;
    let tail_start = seg.end - EXACT_WINDOW + 1;
    let interior = interior_integral(seg.cdf, model, head_end + 1, tail_start - 1, &summand);
    exact(seg.start, head_end) + interior + exact(tail_start, seg.end)
}

/// Nodes and weights of 5 point Gauss-Legendre quadrature on `[-1, 1]`.
const GAUSS_LEGENDRE: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

/// Largest width of a quadrature panel in `ln(x)`.
const PANEL_WIDTH: f64 = 0.25;

/// Midpoint rule approximation `Σ_{x=start}^{end} g(x) ≈ ∫_{start-½}^{end+½} g(y) dy`
/// of the summand weighted by the PDF.
///
/// The integrand varies on the scale of `y`, so the integral is evaluated with
/// Gauss-Legendre panels of equal width in `ln(y)`.
fn interior_integral<F>(
    empirical: f64,
    model: &PowerLawModel,
    start: i64,
    end: i64,
    summand: &F,
) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let lo = (start as f64 - 0.5).ln();
    let hi = (end as f64 + 0.5).ln();
    let n_panels = ((hi - lo) / PANEL_WIDTH).ceil().max(1.0);
    let width = (hi - lo) / n_panels;

    (0..n_panels as usize)
        .map(|panel| {
            let mid = lo + (panel as f64 + 0.5) * width;
            let panel_sum: f64 = GAUSS_LEGENDRE
                .iter()
                .map(|(node, weight)| {
                    let y = (mid + 0.5 * width * node).exp();
                    weight
                        * summand(empirical, model.continuous_cdf(y))
                        * model.continuous_pdf(y)
                        * y
                })
                .sum();
            0.5 * width * panel_sum
        })
        .sum()
}
