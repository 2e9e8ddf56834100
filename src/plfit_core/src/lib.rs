//! # plfit Core
//! Fitting of discrete power law distributions to integer samples.
//!
//! The scaling exponent is estimated by maximum likelihood, the lower and upper
//! cutoffs by minimizing the Kolmogorov-Smirnov distance between the sample and the
//! model, and the quality of the fit is evaluated with a parametric bootstrap of a
//! test statistic (Kolmogorov-Smirnov, Cramér-von Mises or Anderson-Darling).
//!
//! This crate has no knowledge of any command line or language bridge, those are
//! thin adapters around [`fitting::fit`] and [`stats::GofEngine`].
//!

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

pub mod distributions;
pub mod errors;
pub mod fitting;
pub mod io;
pub mod random;
pub mod stats;
pub mod zeta;

/// Common useful imports
pub mod prelude {
    pub use crate::distributions::{
        DistributionType, EmpiricalDistribution, PowerLawModel, SampleMethod, TestStatisticType,
    };
    pub use crate::errors::{Error, PlfitResult};
    pub use crate::fitting::{fit, try_fit, AlphaEstimator, FitConfig, ModelState, PowerLawFit};
    pub use crate::random::RandomSource;
    pub use crate::stats::{
        calculate_gof, calculate_ks_statistic_of_fit, GeneratorMode, GofConfig, GofEngine,
        GofReport, RuntimeMode,
    };
}
