//! # Fitting
//! Estimation of discrete power law models from integer samples.
//!
//! [`fit`] is the single entry point, which parameters are estimated is decided by
//! which fields of the [`FitConfig`] are left empty.
mod config;
mod estimators;

pub use config::{AlphaEstimator, FitConfig, DEFAULT_PRECISION};
pub use estimators::{
    alpha_grid, estimate_alpha, estimate_alpha_approximate, estimate_lower_bound,
    estimate_upper_bound, log_likelihood, ALPHA_GRID_END, ALPHA_GRID_START,
};

use crate::distributions::{validate_parameters, DistributionType, PowerLawModel, MAX_SAMPLE_VALUE};
use crate::errors::{Error, PlfitResult};
use estimators::tail_size;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

/// Validity of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelState {
    /// The fit produced a model.
    Valid,

    /// The sample was empty.
    NoInput,

    /// Supplied parameters were incompatible with the sample.
    InvalidInput,
}

/// Outcome of a fit.
///
/// Invalid fits carry no numeric values, every accessor returns an error for them
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerLawFit {
    /// Successfully fit model.
    Valid(PowerLawModel),

    /// No sample data was provided.
    NoInput,

    /// Supplied parameters were incompatible with the sample, with the reason.
    InvalidInput(String),
}

impl PowerLawFit {
    /// State of the fit.
    pub fn state(&self) -> ModelState {
        match self {
            PowerLawFit::Valid(_) => ModelState::Valid,
            PowerLawFit::NoInput => ModelState::NoInput,
            PowerLawFit::InvalidInput(_) => ModelState::InvalidInput,
        }
    }

    /// Did the fit produce a model.
    pub fn is_valid(&self) -> bool {
        matches!(self, PowerLawFit::Valid(_))
    }

    /// The fit model.
    pub fn model(&self) -> PlfitResult<&PowerLawModel> {
        match self {
            PowerLawFit::Valid(model) => Ok(model),
            PowerLawFit::NoInput => Err(Error::NoInput),
            PowerLawFit::InvalidInput(reason) => Err(Error::InvalidInput(reason.clone())),
        }
    }

    /// Consume the fit, returning the model.
    pub fn into_model(self) -> PlfitResult<PowerLawModel> {
        match self {
            PowerLawFit::Valid(model) => Ok(model),
            PowerLawFit::NoInput => Err(Error::NoInput),
            PowerLawFit::InvalidInput(reason) => Err(Error::InvalidInput(reason)),
        }
    }

    /// Scaling exponent.
    pub fn alpha(&self) -> PlfitResult<f64> {
        Ok(self.model()?.alpha())
    }

    /// Standard error of the scaling exponent.
    pub fn standard_error(&self) -> PlfitResult<f64> {
        self.model()?.standard_error()
    }

    /// Lower cutoff.
    pub fn x_min(&self) -> PlfitResult<i64> {
        Ok(self.model()?.x_min())
    }

    /// Upper cutoff, or the largest sample value for unbounded models.
    pub fn x_max(&self) -> PlfitResult<i64> {
        Ok(self.model()?.x_max())
    }

    /// Test statistic of the model against the sample it was fit to.
    pub fn test_statistic(&self) -> PlfitResult<f64> {
        self.model()?
            .test_statistic()
            .ok_or(Error::ValueError("No test statistic was computed for this fit.".into()))
    }

    /// Log likelihood of the sample under the fit model.
    pub fn log_likelihood(&self, data: &[i64]) -> PlfitResult<f64> {
        Ok(self.model()?.log_likelihood(data))
    }
}

impl From<PlfitResult<PowerLawModel>> for PowerLawFit {
    fn from(value: PlfitResult<PowerLawModel>) -> Self {
        match value {
            Ok(model) => PowerLawFit::Valid(model),
            Err(Error::NoInput) => PowerLawFit::NoInput,
            Err(Error::InvalidInput(reason)) => PowerLawFit::InvalidInput(reason),
            Err(err) => PowerLawFit::InvalidInput(err.to_string()),
        }
    }
}

/// Fit a discrete power law to the sample.
///
/// Parameters set in the config are used as is, the rest are estimated:
///
/// * `xMin` by minimizing the Kolmogorov-Smirnov statistic, see [`estimate_lower_bound`].
/// * `xMax` for bounded distributions, see [`estimate_upper_bound`]. Unbounded
///   distributions use the largest sample value as the extent of the CDF table.
/// * `alpha` by maximum likelihood, see [`estimate_alpha`].
///
/// Failures are reported through the returned [`PowerLawFit`], this never panics on
/// bad input.
///
/// ```
///     use plfit_core::prelude::*;
///     let sample = [1, 1, 2, 2, 2, 3, 4, 5, 10, 27];
///     let fit = fit(&sample, &FitConfig::default());
///     assert!(fit.is_valid());
///     assert!(fit.alpha().unwrap() > 1.0);
///
///     let fit = plfit_core::fitting::fit(&[], &FitConfig::default());
///     assert_eq!(fit.state(), ModelState::NoInput);
/// ```
pub fn fit(sample: &[i64], config: &FitConfig) -> PowerLawFit {
    try_fit(sample, config).into()
}

/// Fit a discrete power law to the sample, see [`fit`].
pub fn try_fit(sample: &[i64], config: &FitConfig) -> PlfitResult<PowerLawModel> {
    let (min, max) = sample
        .iter()
        .copied()
        .minmax()
        .into_option()
        .ok_or(Error::NoInput)?;

    if max > MAX_SAMPLE_VALUE || config.x_max.map_or(false, |x_max| x_max > MAX_SAMPLE_VALUE) {
        return Err(Error::InvalidInput(format!(
            "Values must not exceed {}, largest sample value is {}.",
            MAX_SAMPLE_VALUE, max
        )));
    }
    if !config.precision.is_finite() || config.precision <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "Alpha precision must be a positive step, got {}.",
            config.precision
        )));
    }
    if let Some(x_min) = config.x_min {
        if x_min < 1 || x_min >= max {
            return Err(Error::InvalidInput(format!(
                "xMin ({}) must be at least 1 and smaller than the largest sample value ({}).",
                x_min, max
            )));
        }
    }

    let bounded = config.distribution == DistributionType::LeftAndRightBounded;
    if let (true, Some(x_max)) = (bounded, config.x_max) {
        if x_max <= min {
            return Err(Error::InvalidInput(format!(
                "xMax ({}) must be larger than the smallest sample value ({}).",
                x_max, min
            )));
        }
    }

    let x_min = match config.x_min {
        Some(x_min) => x_min,
        None => estimate_lower_bound(sample, config)?,
    };
    let x_max = match (bounded, config.x_max) {
        (false, _) => max,
        (true, Some(x_max)) => x_max,
        (true, None) => estimate_upper_bound(sample, x_min, config)?,
    };

    let model = fit_with_bounds(sample, x_min, x_max, config)?;
    debug!(
        "Fit power law: alpha = {}, xMin = {}, xMax = {}, n = {:?}, statistic = {:?}",
        model.alpha(),
        model.x_min(),
        model.x_max(),
        model.sample_size(),
        model.test_statistic()
    );
    Ok(model)
}

/// Fit alpha with both cutoffs already decided.
pub(crate) fn fit_with_bounds(
    data: &[i64],
    x_min: i64,
    x_max: i64,
    config: &FitConfig,
) -> PlfitResult<PowerLawModel> {
    if x_min < 1 || x_min >= x_max {
        return Err(Error::InvalidInput(format!(
            "xMin ({}) must be at least 1 and smaller than xMax ({}).",
            x_min, x_max
        )));
    }
    let bound = match config.distribution {
        DistributionType::LeftBounded => None,
        DistributionType::LeftAndRightBounded => Some(x_max),
    };
    let alpha = match (config.alpha, config.alpha_estimator) {
        (Some(alpha), _) => alpha,
        (None, AlphaEstimator::GridSearch) => estimate_alpha(data, x_min, bound, config.precision)?,
        (None, AlphaEstimator::Approximate) => estimate_alpha_approximate(data, x_min, bound)?,
    };
    validate_parameters(alpha, x_min, x_max)?;

    let n = tail_size(data, x_min, bound);
    Ok(
        PowerLawModel::from_parameters(alpha, x_min, x_max, config.distribution, *config)
            .with_sample(data, n),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{SampleMethod, TestStatisticType};
    use crate::random::RandomSource;

    const SAMPLE: [i64; 10] = [1, 1, 2, 2, 2, 3, 4, 5, 10, 27];

    #[test]
    fn test_fit_small_sample() {
        let fit = fit(&SAMPLE, &FitConfig::default());
        assert_eq!(fit.state(), ModelState::Valid);
        let x_min = fit.x_min().unwrap();
        assert!(x_min == 1 || x_min == 2, "{x_min}");
        assert!(fit.alpha().unwrap() > 1.0);
        assert_eq!(fit.x_max().unwrap(), 27);
        let ks = fit.test_statistic().unwrap();
        assert!(ks.is_finite() && ks <= 1.0);
        assert!(fit.standard_error().unwrap() > 0.0);
        assert!(fit.log_likelihood(&SAMPLE).unwrap().is_finite());
    }

    #[test]
    fn test_fit_empty() {
        let fit = fit(&[], &FitConfig::default());
        assert_eq!(fit.state(), ModelState::NoInput);
        assert!(!fit.is_valid());
        assert_eq!(fit.alpha(), Err(Error::NoInput));
        assert_eq!(fit.x_min(), Err(Error::NoInput));
    }

    #[test]
    fn test_fit_invalid_bounds() {
        let fit = fit(&SAMPLE, &FitConfig::default().with_x_min(27));
        assert_eq!(fit.state(), ModelState::InvalidInput);
        assert!(matches!(fit.alpha(), Err(Error::InvalidInput(_))));

        let config = FitConfig::default()
            .with_distribution(DistributionType::LeftAndRightBounded)
            .with_x_max(1);
        assert_eq!(super::fit(&SAMPLE, &config).state(), ModelState::InvalidInput);

        let config = FitConfig::default().with_precision(-0.1);
        assert_eq!(super::fit(&SAMPLE, &config).state(), ModelState::InvalidInput);

        let config = FitConfig::default().with_x_min(2).with_alpha(0.5);
        assert_eq!(super::fit(&SAMPLE, &config).state(), ModelState::InvalidInput);

        // Values past the exactly representable integers.
        let huge = [1, 1, 2, 3, i64::MAX];
        assert_eq!(super::fit(&huge, &FitConfig::default()).state(), ModelState::InvalidInput);
        let config = FitConfig::default()
            .with_distribution(DistributionType::LeftAndRightBounded)
            .with_x_max(i64::MAX);
        assert_eq!(super::fit(&SAMPLE, &config).state(), ModelState::InvalidInput);

        // No spread at all leaves no room for a cutoff.
        assert_eq!(super::fit(&[4, 4, 4], &FitConfig::default()).state(), ModelState::InvalidInput);
    }

    #[test]
    fn test_fit_known_parameters() {
        let config = FitConfig::default().with_x_min(2).with_alpha(2.2);
        let model = try_fit(&SAMPLE, &config).unwrap();
        assert_eq!(model.alpha(), 2.2);
        assert_eq!(model.x_min(), 2);
        assert_eq!(model.sample_size(), Some(8));
    }

    #[test]
    fn test_fit_known_x_min() {
        let model = try_fit(&SAMPLE, &FitConfig::default().with_x_min(2)).unwrap();
        assert_eq!(model.x_min(), 2);
        assert_eq!(model.sample_size(), Some(8));
        assert!(model.alpha() >= ALPHA_GRID_START && model.alpha() < ALPHA_GRID_END);
    }

    #[test]
    fn test_fit_statistic_types() {
        for kind in [
            TestStatisticType::KolmogorovSmirnov,
            TestStatisticType::CramerVonMises,
            TestStatisticType::AndersonDarling,
        ] {
            let config = FitConfig::default().with_test_statistic(kind);
            let model = try_fit(&SAMPLE, &config).unwrap();
            let stat = model.test_statistic().unwrap();
            assert!(stat.is_finite() && stat >= 0.0, "{kind:?} {stat}");
        }
        let config = FitConfig::default().with_test_statistic(TestStatisticType::None);
        let fit = fit(&SAMPLE, &config);
        assert!(fit.is_valid());
        assert!(matches!(fit.test_statistic(), Err(Error::ValueError(_))));
    }

    #[test]
    fn test_fit_bounded() {
        let mut rng = RandomSource::new(Some(21));
        let truth = PowerLawModel::new(1.7, 2, 300, DistributionType::LeftAndRightBounded).unwrap();
        let sample = truth.sample_n(5_000, &mut rng, SampleMethod::Precise);

        let config = FitConfig::default()
            .with_x_min(2)
            .with_x_max(300)
            .with_distribution(DistributionType::LeftAndRightBounded);
        let model = try_fit(&sample, &config).unwrap();
        assert_eq!(model.upper_bound(), Some(300));
        assert!((model.alpha() - 1.7).abs() < 0.05, "{}", model.alpha());
    }

    #[test]
    fn test_fit_recovers_parameters() {
        let mut rng = RandomSource::new(Some(2024));
        let truth = PowerLawModel::new(2.5, 1, 1000, DistributionType::LeftBounded).unwrap();
        let sample = truth.sample_n(100_000, &mut rng, SampleMethod::Precise);

        let model = try_fit(&sample, &FitConfig::default().with_x_min(1)).unwrap();
        assert!((model.alpha() - 2.5).abs() < 0.05, "{}", model.alpha());
        assert_eq!(model.sample_size(), Some(100_000));
    }

    #[test]
    fn test_fit_recovers_x_min() {
        for (x_min, seed) in [(1, 2024), (5, 77)] {
            let mut rng = RandomSource::new(Some(seed));
            let truth = PowerLawModel::new(2.5, x_min, 1000, DistributionType::LeftBounded).unwrap();
            let sample = truth.sample_n(100_000, &mut rng, SampleMethod::Precise);

            let model = try_fit(&sample, &FitConfig::default()).unwrap();
            assert!(
                (x_min..=x_min + 1).contains(&model.x_min()),
                "xMin {} recovered as {}",
                x_min,
                model.x_min()
            );
            assert!((model.alpha() - 2.5).abs() < 0.05, "{}", model.alpha());
        }
    }
}
