//! # Synthetic replicas
//! Bootstrap replicas drawn from a fitted model, optionally mixed with values
//! resampled from the part of the sample the model does not describe.

use crate::distributions::{PowerLawModel, SampleMethod};
use crate::errors::{Error, PlfitResult};
use crate::fitting::PowerLawFit;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How replicas are constructed from the fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeneratorMode {
    /// Values inside the support of the model are drawn from it, the rest are
    /// resampled from the original sample.
    #[default]
    SemiParametric,

    /// Every value is drawn from the model.
    FullParametric,
}

/// Generator of bootstrap replicas.
///
/// Owns its own copy of the model, so generators may be shared freely between
/// threads while replicas are refit.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticReplicaGenerator {
    model: PowerLawModel,
    bulk: Vec<i64>,
    tail_probability: f64,
    replica_size: usize,
    method: SampleMethod,
}

impl SyntheticReplicaGenerator {
    /// Construct a generator in the given mode.
    pub fn new(model: &PowerLawModel, sample: &[i64], mode: GeneratorMode) -> PlfitResult<Self> {
        match mode {
            GeneratorMode::SemiParametric => Self::semi_parametric(model, sample),
            GeneratorMode::FullParametric => {
                if sample.is_empty() {
                    return Err(Error::NoInput);
                }
                Ok(Self::full_parametric(model, sample.len()))
            }
        }
    }

    /// Replicas the size of the sample, where values outside the support of the model
    /// are resampled from the sample itself.
    pub fn semi_parametric(model: &PowerLawModel, sample: &[i64]) -> PlfitResult<Self> {
        if sample.is_empty() {
            return Err(Error::NoInput);
        }
        let bulk: Vec<i64> = sample
            .iter()
            .copied()
            .filter(|x| !model.contains(*x))
            .collect();
        let tail_probability = 1.0 - bulk.len() as f64 / sample.len() as f64;
        Ok(SyntheticReplicaGenerator {
            model: model.clone(),
            bulk,
            tail_probability,
            replica_size: sample.len(),
            method: SampleMethod::default(),
        })
    }

    /// Replicas of the given size drawn entirely from the model.
    pub fn full_parametric(model: &PowerLawModel, replica_size: usize) -> Self {
        SyntheticReplicaGenerator {
            model: model.clone(),
            bulk: Vec::new(),
            tail_probability: 1.0,
            replica_size,
            method: SampleMethod::default(),
        }
    }

    /// Use the given method when drawing from the model.
    pub fn with_sample_method(mut self, method: SampleMethod) -> Self {
        self.method = method;
        self
    }

    /// Model the replicas are drawn from.
    pub fn model(&self) -> &PowerLawModel {
        &self.model
    }

    /// Values of the sample outside the support of the model.
    pub fn bulk(&self) -> &[i64] {
        &self.bulk
    }

    /// Fraction of each replica drawn from the model.
    pub fn tail_probability(&self) -> f64 {
        self.tail_probability
    }

    /// Number of values in each replica.
    pub fn replica_size(&self) -> usize {
        self.replica_size
    }

    /// Number of values of each replica which are drawn from the model.
    pub fn tail_count(&self) -> usize {
        if self.bulk.is_empty() {
            return self.replica_size;
        }
        // Tolerance keeps exact products like 0.7 * 10 from rounding down.
        let count = (self.tail_probability * self.replica_size as f64 + 1e-9).floor() as usize;
        count.min(self.replica_size)
    }

    /// Draw one replica.
    ///
    /// Model values come first, followed by the values resampled from the bulk.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<i64> {
        let n_tail = self.tail_count();
        let mut replica = self.model.sample_n(n_tail, rng, self.method);
        replica.extend(
            (n_tail..self.replica_size).map(|_| self.bulk[rng.gen_range(0..self.bulk.len())]),
        );
        replica
    }
}

/// Shape of a synthetic sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplicaTemplate<'a> {
    /// Semi-parametric replica of the sample.
    Sample(&'a [i64]),

    /// Full-parametric replica of the given size.
    Size(usize),
}

/// Draw a single synthetic sample from a fit.
///
/// ```
///     use plfit_core::prelude::*;
///     use plfit_core::stats::{generate_synthetic_sample, ReplicaTemplate};
///     let sample = [1, 1, 2, 2, 2, 3, 4, 5, 10, 27];
///     let fit = fit(&sample, &FitConfig::default());
///     let mut rng = RandomSource::new(Some(7));
///     let replica = generate_synthetic_sample(&fit, ReplicaTemplate::Sample(&sample), &mut rng).unwrap();
///     assert_eq!(replica.len(), sample.len());
/// ```
pub fn generate_synthetic_sample<R: Rng + ?Sized>(
    fit: &PowerLawFit,
    template: ReplicaTemplate<'_>,
    rng: &mut R,
) -> PlfitResult<Vec<i64>> {
    let model = fit.model()?;
    let generator = match template {
        ReplicaTemplate::Sample(sample) => SyntheticReplicaGenerator::semi_parametric(model, sample)?,
        ReplicaTemplate::Size(size) => SyntheticReplicaGenerator::full_parametric(model, size),
    };
    Ok(generator.generate(rng))
}
