//! # Goodness of fit
//! Parametric bootstrap of the test statistic of a fit.
//!
//! Synthetic replicas are drawn from the fitted model, each replica is refit with
//! the configuration of the original fit, and the p-value is the fraction of replica
//! statistics which are strictly larger than the statistic observed on the sample.
//!
//! Replica `i` always draws from stream `i` of the seeded [`RandomSource`], so a
//! fixed seed gives identical results in single and multi-threaded mode.
use super::synthetic::{GeneratorMode, SyntheticReplicaGenerator};
use crate::distributions::{SampleMethod, TestStatisticType};
use crate::errors::{Error, PlfitResult};
use crate::fitting::{try_fit, FitConfig, PowerLawFit};
use crate::random::RandomSource;
use log::{debug, trace, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default number of bootstrap replicas.
pub const DEFAULT_REPLICAS: usize = 1000;

/// How replicas are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RuntimeMode {
    /// Sequential loop on the calling thread.
    SingleThread,

    /// Replicas are spread over a thread pool.
    #[default]
    MultiThread,
}

/// Parameters of a bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GofConfig {
    /// Number of synthetic replicas.
    pub replicas: usize,

    /// How replicas are constructed.
    pub generator_mode: GeneratorMode,

    /// How replicas are executed.
    pub runtime_mode: RuntimeMode,

    /// Seed of the random source, drawn from entropy if not provided.
    pub seed: Option<u64>,

    /// Method used to draw values from the model.
    pub sample_method: SampleMethod,

    /// Number of worker threads of the pool built by [`GofEngine::new`], all available
    /// cores if not provided.
    pub threads: Option<usize>,
}

impl Default for GofConfig {
    fn default() -> Self {
        GofConfig {
            replicas: DEFAULT_REPLICAS,
            generator_mode: GeneratorMode::SemiParametric,
            runtime_mode: RuntimeMode::MultiThread,
            seed: None,
            sample_method: SampleMethod::Precise,
            threads: None,
        }
    }
}

impl GofConfig {
    /// Set the number of replicas.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Set the generator mode.
    pub fn with_generator_mode(mut self, generator_mode: GeneratorMode) -> Self {
        self.generator_mode = generator_mode;
        self
    }

    /// Set the runtime mode.
    pub fn with_runtime_mode(mut self, runtime_mode: RuntimeMode) -> Self {
        self.runtime_mode = runtime_mode;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the sampling method.
    pub fn with_sample_method(mut self, sample_method: SampleMethod) -> Self {
        self.sample_method = sample_method;
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Result of a bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GofReport {
    /// Fraction of replica statistics strictly larger than the observed statistic.
    pub p_value: f64,

    /// Statistic of the fit against the original sample.
    pub observed_statistic: f64,

    /// Statistic used.
    pub statistic_type: TestStatisticType,

    /// Statistics of the replicas which could be refit, in replica order.
    pub replica_statistics: Vec<f64>,

    /// Number of replicas which could not be refit.
    pub failed_replicas: usize,

    /// Seed the random source was constructed with.
    pub seed: u64,
}

/// Bootstrap goodness of fit engine.
///
/// The engine owns the thread pool replicas run on. Several engines may share one
/// pool through [`GofEngine::with_pool`].
#[derive(Debug, Clone)]
pub struct GofEngine {
    config: GofConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl GofEngine {
    /// Construct an engine, building a thread pool if the config is multi-threaded.
    pub fn new(config: GofConfig) -> PlfitResult<Self> {
        let pool = match config.runtime_mode {
            RuntimeMode::SingleThread => None,
            RuntimeMode::MultiThread => Some(Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(config.threads.unwrap_or(0))
                    .build()?,
            )),
        };
        Ok(GofEngine { config, pool })
    }

    /// Construct an engine which runs on an existing thread pool.
    pub fn with_pool(config: GofConfig, pool: Arc<ThreadPool>) -> Self {
        GofEngine {
            config,
            pool: Some(pool),
        }
    }

    /// Construct an engine whose multi-threaded replicas run on rayon's global pool.
    ///
    /// `threads` of the config is ignored.
    pub fn on_global_pool(config: GofConfig) -> Self {
        GofEngine { config, pool: None }
    }

    /// Configuration of the engine.
    pub fn config(&self) -> &GofConfig {
        &self.config
    }

    /// Bootstrap the statistic of the fit against the sample.
    pub fn bootstrap(&self, fit: &PowerLawFit, sample: &[i64]) -> PlfitResult<GofReport> {
        let model = fit.model()?;
        if self.config.replicas == 0 {
            return Err(Error::ValueError(
                "At least one bootstrap replica is required.".into(),
            ));
        }

        let replica_config = model.config().for_replica(model);
        let statistic_type = replica_config.test_statistic;
        let observed_statistic = model.test_statistic_of(sample, statistic_type);
        if !observed_statistic.is_finite() {
            return Err(Error::ValueError(format!(
                "Observed {:?} statistic is not finite.",
                statistic_type
            )));
        }

        let generator = SyntheticReplicaGenerator::new(model, sample, self.config.generator_mode)?
            .with_sample_method(self.config.sample_method);
        let source = RandomSource::new(self.config.seed);
        let run = |idx: usize| replica_statistic(&generator, &replica_config, &source, idx);

        let n = self.config.replicas;
        let statistics: Vec<Option<f64>> = match (self.config.runtime_mode, &self.pool) {
            (RuntimeMode::SingleThread, _) => (0..n).map(run).collect(),
            (RuntimeMode::MultiThread, Some(pool)) => {
                pool.install(|| (0..n).into_par_iter().map(run).collect())
            }
            (RuntimeMode::MultiThread, None) => (0..n).into_par_iter().map(run).collect(),
        };

        let replica_statistics: Vec<f64> = statistics.into_iter().flatten().collect();
        let failed_replicas = n - replica_statistics.len();
        if failed_replicas > 0 {
            warn!("{} of {} bootstrap replicas could not be refit.", failed_replicas, n);
        }

        let p_value = if replica_statistics.is_empty() {
            0.0
        } else {
            let larger = replica_statistics
                .iter()
                .filter(|stat| **stat > observed_statistic)
                .count();
            larger as f64 / replica_statistics.len() as f64
        };
        debug!(
            "Bootstrap: p = {}, observed {:?} = {}, replicas = {}, seed = {}",
            p_value,
            statistic_type,
            observed_statistic,
            replica_statistics.len(),
            source.seed()
        );

        Ok(GofReport {
            p_value,
            observed_statistic,
            statistic_type,
            replica_statistics,
            failed_replicas,
            seed: source.seed(),
        })
    }

    /// Bootstrap p-value of the fit.
    ///
    /// Fits which cannot be tested, including invalid fits, give a p-value of 0.0.
    /// Use [`GofEngine::bootstrap`] to tell these cases apart.
    pub fn calculate_gof(&self, fit: &PowerLawFit, sample: &[i64]) -> f64 {
        match self.bootstrap(fit, sample) {
            Ok(report) => report.p_value,
            Err(err) => {
                warn!("Goodness of fit could not be computed: {}", err);
                0.0
            }
        }
    }
}

/// Generate and refit a single replica, returning its statistic.
fn replica_statistic(
    generator: &SyntheticReplicaGenerator,
    config: &FitConfig,
    source: &RandomSource,
    idx: usize,
) -> Option<f64> {
    let mut rng = source.replica_stream(idx as u64);
    let replica = generator.generate(&mut rng);
    match try_fit(&replica, config) {
        Ok(model) => {
            let stat = model.test_statistic().filter(|stat| stat.is_finite());
            trace!("Replica {}: statistic = {:?}", idx, stat);
            stat
        }
        Err(err) => {
            trace!("Replica {} could not be refit: {}", idx, err);
            None
        }
    }
}

/// Bootstrap p-value of the fit with the default configuration, the given number of
/// replicas and runtime mode. Multi-threaded replicas run on rayon's global pool.
///
/// ```
///     use plfit_core::prelude::*;
///     let sample = [1, 1, 2, 2, 2, 3, 4, 5, 10, 27];
///     let fit = fit(&sample, &FitConfig::default());
///     let p = calculate_gof(&fit, &sample, 50, RuntimeMode::SingleThread);
///     assert!((0.0..=1.0).contains(&p));
/// ```
pub fn calculate_gof(fit: &PowerLawFit, sample: &[i64], replicas: usize, mode: RuntimeMode) -> f64 {
    let config = GofConfig::default()
        .with_replicas(replicas)
        .with_runtime_mode(mode);
    GofEngine::on_global_pool(config).calculate_gof(fit, sample)
}
