//! # Statistics
//! Test statistics, synthetic replicas and the bootstrap goodness of fit test.
mod gof;
mod synthetic;
mod test_statistic;

pub use gof::{calculate_gof, GofConfig, GofEngine, GofReport, RuntimeMode, DEFAULT_REPLICAS};
pub use synthetic::{
    generate_synthetic_sample, GeneratorMode, ReplicaTemplate, SyntheticReplicaGenerator,
};
pub use test_statistic::{calculate_ks_statistic_of_fit, calculate_test_statistic, test_statistic};
