//! # Distributions
//! Discrete distributions used during fitting: the empirical step distribution of a
//! sample and the discrete power law model itself.
//!
//! Both distributions express their CDF in survival form, `CDF(x) = P(X >= x)`, so
//! they may be compared against one another directly.

mod empirical;
mod power_law;
pub mod search;

pub use empirical::{EmpiricalDistribution, Segment};
pub use power_law::{normalization, PowerLawModel, MAX_SAMPLE_VALUE, MAX_TABLE_LEN};
pub(crate) use power_law::validate_parameters;

use serde::{Deserialize, Serialize};

/// Support of the power law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistributionType {
    /// `P(X = x) ∝ x^-α` for `x >= xMin`.
    #[default]
    LeftBounded,

    /// `P(X = x) ∝ x^-α` for `xMin <= x <= xMax`.
    LeftAndRightBounded,
}

/// Discrepancy metric between the empirical and the model CDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestStatisticType {
    /// Largest absolute difference between the two CDFs.
    #[default]
    KolmogorovSmirnov,

    /// Squared CDF difference weighted by the model PDF.
    CramerVonMises,

    /// Cramér-von Mises with additional weight on both tails.
    AndersonDarling,

    /// No statistic is computed.
    None,
}

/// Method used to draw random values from a power law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleMethod {
    /// Exact inversion of the discrete CDF.
    #[default]
    Precise,

    /// Rounded draw from the continuous power law with the same exponent.
    Approximate,
}
