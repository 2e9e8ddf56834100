//! # Inverse CDF search
//! Locate the integer whose survival form CDF step contains a target probability.
//!
//! A survival CDF `S(x) = P(X >= x)` is non-increasing, and a uniform draw `r` in
//! `(0, 1]` maps onto the unique integer `x` with `S(x) >= r > S(x + 1)`. These
//! functions depend only on CDF values, so they are independent of any model.

/// Position of a target probability relative to the CDF step of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPosition {
    /// The solution lies below the candidate.
    Below,

    /// The candidate is the solution.
    Within,

    /// The solution lies above the candidate.
    Above,
}

/// Classify a candidate `x` given `S(x)`, `S(x + 1)` and the target.
///
/// ```
///     use plfit_core::distributions::search::{step_position, StepPosition};
///     assert_eq!(step_position(0.5, 0.2, 0.3), StepPosition::Within);
///     assert_eq!(step_position(0.5, 0.2, 0.6), StepPosition::Below);
///     assert_eq!(step_position(0.5, 0.2, 0.1), StepPosition::Above);
/// ```
#[inline(always)]
pub fn step_position(cdf_at: f64, cdf_next: f64, target: f64) -> StepPosition {
    if cdf_at < target {
        StepPosition::Below
    } else if cdf_next >= target {
        StepPosition::Above
    } else {
        StepPosition::Within
    }
}

/// Binary search `[low, high]` for the integer `x` where `cdf(x) >= target > cdf(x + 1)`.
///
/// `cdf` must be non-increasing. Returns `None` if the solution is not contained in
/// the interval.
pub fn inverse_cdf_search<F>(mut low: i64, mut high: i64, target: f64, cdf: F) -> Option<i64>
where
    F: Fn(i64) -> f64,
{
    while low <= high {
        let mid = low + (high - low) / 2;
        match step_position(cdf(mid), cdf(mid.saturating_add(1)), target) {
            StepPosition::Within => return Some(mid),
            StepPosition::Below => high = mid - 1,
            StepPosition::Above => low = mid + 1,
        }
    }
    None
}

/// Find an interval `[low, high]` containing the solution for the target by repeated
/// doubling of the upper edge, starting from `start`.
///
/// The upper edge never exceeds `limit`. If the CDF at `limit` is still at or above
/// the target, `None` is returned.
pub fn bracket<F>(start: i64, limit: i64, target: f64, cdf: F) -> Option<(i64, i64)>
where
    F: Fn(i64) -> f64,
{
    let mut low = start;
    let mut high = start;
    while cdf(high) >= target {
        if high >= limit {
            return None;
        }
        low = high;
        high = high.saturating_mul(2).max(high.saturating_add(1)).min(limit);
    }
    Some((low, high))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometric_survival(x: i64) -> f64 {
        if x <= 1 {
            1.0
        } else {
            0.5_f64.powi(x as i32 - 1)
        }
    }

    #[test]
    fn test_step_position() {
        assert_eq!(step_position(1.0, 0.5, 1.0), StepPosition::Within);
        assert_eq!(step_position(1.0, 0.5, 0.5), StepPosition::Above);
        assert_eq!(step_position(0.4, 0.1, 0.5), StepPosition::Below);
    }

    #[test]
    fn test_inverse_search() {
        // S(1) = 1, S(2) = 0.5, S(3) = 0.25, S(4) = 0.125 ...
        assert_eq!(inverse_cdf_search(1, 20, 0.9, geometric_survival), Some(1));
        assert_eq!(inverse_cdf_search(1, 20, 0.5, geometric_survival), Some(2));
        assert_eq!(inverse_cdf_search(1, 20, 0.3, geometric_survival), Some(2));
        assert_eq!(inverse_cdf_search(1, 20, 0.2, geometric_survival), Some(3));
        assert_eq!(inverse_cdf_search(1, 20, 0.001, geometric_survival), Some(10));
        assert_eq!(inverse_cdf_search(1, 5, 0.001, geometric_survival), None);
    }

    #[test]
    fn test_bracket() {
        let (low, high) = bracket(1, 1 << 40, 0.001, geometric_survival).unwrap();
        assert!(geometric_survival(low) >= 0.001);
        assert!(geometric_survival(high) < 0.001);
        assert_eq!(inverse_cdf_search(low, high, 0.001, geometric_survival), Some(10));

        assert!(bracket(1, 4, 0.001, geometric_survival).is_none());
    }
}
