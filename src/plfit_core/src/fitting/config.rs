//! Configuration of a power law fit.

use crate::distributions::{DistributionType, PowerLawModel, TestStatisticType};
use serde::{Deserialize, Serialize};

/// Default step of the alpha grid search.
pub const DEFAULT_PRECISION: f64 = 0.01;

/// Estimator used for the scaling exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlphaEstimator {
    /// Grid search maximizing the exact discrete log likelihood.
    #[default]
    GridSearch,

    /// Closed form estimate of the continuous approximation,
    /// `α = 1 + n / Σ ln(x / (xMin - ½))`.
    Approximate,
}

/// Parameters of a fit.
///
/// Any parameter which is left as `None` is estimated from the sample, so the same
/// configuration covers fully parametric models, fits with a known cutoff and fits
/// where every parameter is estimated.
///
/// ```
///     use plfit_core::prelude::*;
///     let config = FitConfig::default()
///         .with_x_min(3)
///         .with_test_statistic(TestStatisticType::AndersonDarling);
///     assert_eq!(config.x_min, Some(3));
///     assert_eq!(config.alpha, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Known scaling exponent.
    pub alpha: Option<f64>,

    /// Known lower cutoff.
    pub x_min: Option<i64>,

    /// Known upper cutoff, only used by bounded distributions.
    pub x_max: Option<i64>,

    /// Step size of the alpha grid search.
    pub precision: f64,

    /// Test statistic computed for the fitted model.
    pub test_statistic: TestStatisticType,

    /// Support of the power law.
    pub distribution: DistributionType,

    /// Smallest allowed `xMax - xMin` when estimating the upper cutoff.
    pub smallest_interval: i64,

    /// Estimator used for alpha.
    pub alpha_estimator: AlphaEstimator,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            alpha: None,
            x_min: None,
            x_max: None,
            precision: DEFAULT_PRECISION,
            test_statistic: TestStatisticType::KolmogorovSmirnov,
            distribution: DistributionType::LeftBounded,
            smallest_interval: 1,
            alpha_estimator: AlphaEstimator::GridSearch,
        }
    }
}

impl FitConfig {
    /// Set a known scaling exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set a known lower cutoff.
    pub fn with_x_min(mut self, x_min: i64) -> Self {
        self.x_min = Some(x_min);
        self
    }

    /// Set a known upper cutoff.
    pub fn with_x_max(mut self, x_max: i64) -> Self {
        self.x_max = Some(x_max);
        self
    }

    /// Set the step size of the alpha grid search.
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Set the test statistic.
    pub fn with_test_statistic(mut self, test_statistic: TestStatisticType) -> Self {
        self.test_statistic = test_statistic;
        self
    }

    /// Set the support of the power law.
    pub fn with_distribution(mut self, distribution: DistributionType) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the smallest allowed `xMax - xMin`.
    pub fn with_smallest_interval(mut self, smallest_interval: i64) -> Self {
        self.smallest_interval = smallest_interval;
        self
    }

    /// Set the alpha estimator.
    pub fn with_alpha_estimator(mut self, alpha_estimator: AlphaEstimator) -> Self {
        self.alpha_estimator = alpha_estimator;
        self
    }

    /// Configuration used to refit a synthetic replica of a model fit with this
    /// configuration.
    ///
    /// Alpha is always re-estimated. Cutoffs which were known for the original fit
    /// stay fixed at the model values, cutoffs which were estimated are estimated
    /// again. If no statistic was requested, Kolmogorov-Smirnov is used.
    pub fn for_replica(&self, model: &PowerLawModel) -> FitConfig {
        let test_statistic = match self.test_statistic {
            TestStatisticType::None => TestStatisticType::KolmogorovSmirnov,
            kind => kind,
        };
        FitConfig {
            alpha: None,
            x_min: self.x_min.map(|_| model.x_min()),
            x_max: self.x_max.and(model.upper_bound()),
            test_statistic,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = FitConfig::default()
            .with_alpha(2.1)
            .with_x_min(2)
            .with_x_max(40)
            .with_precision(0.001)
            .with_distribution(DistributionType::LeftAndRightBounded)
            .with_smallest_interval(5)
            .with_alpha_estimator(AlphaEstimator::Approximate);
        assert_eq!(config.alpha, Some(2.1));
        assert_eq!(config.x_min, Some(2));
        assert_eq!(config.x_max, Some(40));
        assert_eq!(config.precision, 0.001);
        assert_eq!(config.smallest_interval, 5);
        assert_eq!(config.test_statistic, TestStatisticType::KolmogorovSmirnov);
    }

    #[test]
    fn test_for_replica() {
        let model =
            PowerLawModel::new(2.2, 3, 80, DistributionType::LeftAndRightBounded).unwrap();

        let config = FitConfig::default()
            .with_x_min(1)
            .with_distribution(DistributionType::LeftAndRightBounded)
            .with_test_statistic(TestStatisticType::CramerVonMises);
        let replica = config.for_replica(&model);
        assert_eq!(replica.alpha, None);
        assert_eq!(replica.x_min, Some(3));
        assert_eq!(replica.x_max, None);
        assert_eq!(replica.test_statistic, TestStatisticType::CramerVonMises);

        let replica = model.config().for_replica(&model);
        assert_eq!(replica.alpha, None);
        assert_eq!(replica.x_min, Some(3));
        assert_eq!(replica.x_max, Some(80));
        assert_eq!(replica.test_statistic, TestStatisticType::KolmogorovSmirnov);
    }
}
