//! Discrete power law model.
//!
//! `P(X = x) = x^-α / Z` where the normalization `Z` is a difference of Hurwitz zeta
//! functions, `Z = ζ(α, xMin) - ζ(α, xMax + 1)`, with the second term dropped when
//! the distribution has no upper bound.

use super::search::{bracket, inverse_cdf_search};
use super::{DistributionType, SampleMethod, TestStatisticType};
use crate::errors::{Error, PlfitResult};
use crate::fitting::{log_likelihood, FitConfig};
use crate::stats::calculate_test_statistic;
use crate::zeta::hurwitz_zeta;
use rand::Rng;

/// Largest number of CDF values which are stored in the lookup table, values past
/// the end of the table are evaluated from the closed form.
pub const MAX_TABLE_LEN: usize = 1 << 16;

/// Largest value which may be drawn from a model without an upper bound.
///
/// Integers up to this value are exactly representable as `f64`.
pub const MAX_SAMPLE_VALUE: i64 = 1 << 53;

/// Normalization constant of the discrete power law.
///
/// ```
///     use plfit_core::distributions::normalization;
///     use plfit_core::zeta::hurwitz_zeta;
///     let z = normalization(2.5, 1, None);
///     assert_eq!(z, hurwitz_zeta(2.5, 1.0));
///     let z = normalization(2.0, 1, Some(1));
///     assert!((z - 1.0).abs() < 1e-14);
/// ```
pub fn normalization(alpha: f64, x_min: i64, x_max: Option<i64>) -> f64 {
    let upper = x_max.map_or(0.0, |x_max| hurwitz_zeta(alpha, x_max as f64 + 1.0));
    hurwitz_zeta(alpha, x_min as f64) - upper
}

/// Check that a set of power law parameters describes a proper distribution.
pub(crate) fn validate_parameters(alpha: f64, x_min: i64, x_max: i64) -> PlfitResult<()> {
    if !alpha.is_finite() || alpha <= 1.0 {
        return Err(Error::InvalidInput(format!(
            "Alpha must be finite and larger than 1, got {}.",
            alpha
        )));
    }
    if x_min < 1 {
        return Err(Error::InvalidInput(format!(
            "xMin must be at least 1, got {}.",
            x_min
        )));
    }
    if x_min >= x_max {
        return Err(Error::InvalidInput(format!(
            "xMin ({}) must be smaller than xMax ({}).",
            x_min, x_max
        )));
    }
    Ok(())
}

/// Discrete power law distribution with known parameters.
///
/// A model only exists in a valid state, fits which fail are represented by
/// [`crate::fitting::PowerLawFit`]. Models are immutable once constructed and are
/// cheap enough to clone that every bootstrap replica may hold its own copy.
///
/// The CDF is expressed in survival form, `CDF(x) = P(X >= x)`, matching
/// [`crate::distributions::EmpiricalDistribution`].
#[derive(Debug, Clone, PartialEq)]
pub struct PowerLawModel {
    alpha: f64,
    x_min: i64,
    x_max: i64,
    distribution: DistributionType,

    /// Number of sample values used during estimation, if any.
    sample_size: Option<usize>,

    /// Test statistic of the fit against its sample.
    test_statistic: Option<f64>,

    /// Configuration which produced this model.
    config: FitConfig,

    norm: f64,

    /// `ζ(α, xMax + 1)` for bounded models, otherwise zero.
    upper_zeta: f64,

    /// `CDF(x)` stored at index `x - xMin`.
    cdf: Vec<f64>,
}

impl PowerLawModel {
    /// Construct a model from known parameters, no data is involved.
    ///
    /// For a [`DistributionType::LeftBounded`] model, `x_max` only sets the extent of
    /// the precomputed CDF table, values past it are still part of the support.
    ///
    /// ```
    ///     use plfit_core::prelude::*;
    ///     let model = PowerLawModel::new(2.5, 1, 100, DistributionType::LeftBounded).unwrap();
    ///     assert_eq!(model.cdf(1), 1.0);
    ///     assert!(model.cdf(2) < 1.0);
    /// ```
    pub fn new(
        alpha: f64,
        x_min: i64,
        x_max: i64,
        distribution: DistributionType,
    ) -> PlfitResult<Self> {
        validate_parameters(alpha, x_min, x_max)?;
        let config = FitConfig::default()
            .with_alpha(alpha)
            .with_x_min(x_min)
            .with_x_max(x_max)
            .with_distribution(distribution)
            .with_test_statistic(TestStatisticType::None);
        Ok(Self::from_parameters(
            alpha,
            x_min,
            x_max,
            distribution,
            config,
        ))
    }

    /// Build the model and its CDF table, parameters must already be validated.
    pub(crate) fn from_parameters(
        alpha: f64,
        x_min: i64,
        x_max: i64,
        distribution: DistributionType,
        config: FitConfig,
    ) -> Self {
        let upper_zeta = match distribution {
            DistributionType::LeftBounded => 0.0,
            DistributionType::LeftAndRightBounded => hurwitz_zeta(alpha, x_max as f64 + 1.0),
        };

        let table_len = ((x_max - x_min + 1) as usize).min(MAX_TABLE_LEN);
        let table_end = x_min + table_len as i64 - 1;

        // Sum the zeta function backwards from the end of the table, every step adds a
        // positive term so the table is exactly non-increasing.
        let mut zetas = vec![0.0; table_len];
        let mut zeta = hurwitz_zeta(alpha, table_end as f64 + 1.0);
        for idx in (0..table_len).rev() {
            zeta += ((x_min + idx as i64) as f64).powf(-alpha);
            zetas[idx] = zeta;
        }
        let norm = zetas[0] - upper_zeta;
        let cdf = zetas.iter().map(|z| (z - upper_zeta) / norm).collect();

        PowerLawModel {
            alpha,
            x_min,
            x_max,
            distribution,
            sample_size: None,
            test_statistic: None,
            config,
            norm,
            upper_zeta,
            cdf,
        }
    }

    /// Record the sample this model was estimated from, computing the configured
    /// test statistic against it.
    pub(crate) fn with_sample(mut self, data: &[i64], sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self.test_statistic = match self.config.test_statistic {
            TestStatisticType::None => None,
            kind => Some(calculate_test_statistic(&self, data, kind)),
        };
        self
    }

    /// Scaling exponent.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Lower cutoff of the power law.
    pub fn x_min(&self) -> i64 {
        self.x_min
    }

    /// Upper cutoff for bounded models, otherwise the extent of the CDF table.
    pub fn x_max(&self) -> i64 {
        self.x_max
    }

    /// Upper bound of the support, if there is one.
    pub fn upper_bound(&self) -> Option<i64> {
        match self.distribution {
            DistributionType::LeftBounded => None,
            DistributionType::LeftAndRightBounded => Some(self.x_max),
        }
    }

    /// Support of the model.
    pub fn distribution(&self) -> DistributionType {
        self.distribution
    }

    /// Number of sample values used to estimate this model.
    pub fn sample_size(&self) -> Option<usize> {
        self.sample_size
    }

    /// Precision of the alpha estimate.
    pub fn precision(&self) -> f64 {
        self.config.precision
    }

    /// Kind of test statistic associated with the model.
    pub fn test_statistic_type(&self) -> TestStatisticType {
        self.config.test_statistic
    }

    /// Test statistic of the model against the sample it was fit to.
    pub fn test_statistic(&self) -> Option<f64> {
        self.test_statistic
    }

    /// Configuration which produced this model.
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Normalization constant of the PDF.
    pub fn normalization(&self) -> f64 {
        self.norm
    }

    /// The precomputed CDF values, starting at xMin.
    pub fn cdf_table(&self) -> &[f64] {
        &self.cdf
    }

    /// Standard error of alpha, `(α - 1) / n`.
    pub fn standard_error(&self) -> PlfitResult<f64> {
        match self.sample_size {
            Some(n) if n > 0 => Ok((self.alpha - 1.0) / n as f64),
            _ => Err(Error::ValueError(
                "Standard error requires the model to be estimated from a sample.".into(),
            )),
        }
    }

    /// Is the value inside the support of the model.
    #[inline]
    pub fn contains(&self, x: i64) -> bool {
        x >= self.x_min && self.upper_bound().map_or(true, |x_max| x <= x_max)
    }

    /// Probability mass at `x`.
    pub fn pdf(&self, x: i64) -> f64 {
        if !self.contains(x) {
            return 0.0;
        }
        (x as f64).powf(-self.alpha) / self.norm
    }

    /// Survival form CDF, `P(X >= x)`.
    pub fn cdf(&self, x: i64) -> f64 {
        if x < self.x_min {
            return 1.0;
        }
        if !self.contains(x) {
            return 0.0;
        }
        let idx = (x - self.x_min) as usize;
        match self.cdf.get(idx) {
            Some(cdf) => *cdf,
            None => (hurwitz_zeta(self.alpha, x as f64) - self.upper_zeta) / self.norm,
        }
    }

    /// Survival CDF extended to real arguments, `(ζ(α, y) - ζ(α, xMax + 1)) / Z`.
    ///
    /// Agrees with [`PowerLawModel::cdf`] at integers inside the support.
    pub(crate) fn continuous_cdf(&self, y: f64) -> f64 {
        (hurwitz_zeta(self.alpha, y) - self.upper_zeta) / self.norm
    }

    /// PDF extended to real arguments, `y^-α / Z`.
    pub(crate) fn continuous_pdf(&self, y: f64) -> f64 {
        y.powf(-self.alpha) / self.norm
    }

    /// Log likelihood of the sample under this model, only values inside the support
    /// contribute.
    pub fn log_likelihood(&self, data: &[i64]) -> f64 {
        log_likelihood(data, self.alpha, self.x_min, self.upper_bound())
    }

    /// Compute a test statistic of this model against a sample.
    pub fn test_statistic_of(&self, data: &[i64], kind: TestStatisticType) -> f64 {
        calculate_test_statistic(self, data, kind)
    }

    /// Largest value which may be drawn from the model.
    fn sample_limit(&self) -> i64 {
        self.upper_bound().unwrap_or(MAX_SAMPLE_VALUE)
    }

    /// Draw a single value from the model.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, method: SampleMethod) -> i64 {
        // Uniform in (0, 1], a zero would never be bracketed.
        let r = 1.0 - rng.gen::<f64>();
        match method {
            SampleMethod::Precise => self.sample_precise(r),
            SampleMethod::Approximate => self.sample_approximate(r),
        }
    }

    /// Draw `n` values from the model.
    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R, method: SampleMethod) -> Vec<i64> {
        (0..n).map(|_| self.sample(rng, method)).collect()
    }

    /// Invert the discrete CDF, the CDF is stepped through by doubling until the
    /// target is bracketed, then bisected.
    ///
    /// The result is the integer which straddles the target, `S(x) >= r > S(x + 1)`,
    /// so each `x` is drawn with probability `S(x) - S(x + 1) = PDF(x)`. Picking the
    /// nearest of the neighbouring CDF values instead would not: at α = 2.5 every
    /// `r` in `(0.255, 0.63)` would map to `x = 2` instead of `x = 1`.
    fn sample_precise(&self, r: f64) -> i64 {
        let limit = self.sample_limit();
        let cdf = |x| self.cdf(x);
        match bracket(self.x_min, limit.saturating_add(1), r, cdf) {
            Some((low, high)) => inverse_cdf_search(low, high, r, cdf).unwrap_or(low),
            None => limit,
        }
    }

    /// Continuous approximation, `x = ⌊(xMin - ½)(r)^(-1/(α-1)) + ½⌋`.
    fn sample_approximate(&self, r: f64) -> i64 {
        let t_min = self.x_min as f64 - 0.5;
        let r = match self.upper_bound() {
            None => r,
            Some(x_max) => {
                // Restrict the draw to values which round to at most xMax.
                let r_max = ((x_max as f64 + 0.5) / t_min).powf(1.0 - self.alpha);
                r_max + r * (1.0 - r_max)
            }
        };
        let t = t_min * r.powf(-1.0 / (self.alpha - 1.0));
        let x = (t + 0.5).floor().min(self.sample_limit() as f64);
        (x as i64).max(self.x_min)
    }
}
