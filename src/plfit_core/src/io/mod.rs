//! # IO
//! Reading integer samples from text.
//!
//! Samples are stored as a single comma separated list of integers, the format used
//! by command line and language bridge adapters.

use crate::errors::{Error, PlfitResult};
use std::fs;
use std::path::Path;

/// Parse a comma separated list of integers.
///
/// Whitespace around values and a trailing newline are ignored. An empty string is
/// an empty sample.
///
/// ```
///     use plfit_core::io::parse_sample;
///     assert_eq!(parse_sample("1, 2,3\n").unwrap(), vec![1, 2, 3]);
///     assert!(parse_sample("1,,3").is_err());
/// ```
pub fn parse_sample(text: &str) -> PlfitResult<Vec<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .enumerate()
        .map(|(idx, value)| {
            value.trim().parse::<i64>().map_err(|err| {
                Error::IOError(format!("Value {} ({:?}) is not an integer: {}", idx, value, err))
            })
        })
        .collect()
}

/// Read a comma separated sample from a file, see [`parse_sample`].
pub fn read_sample<P: AsRef<Path>>(path: P) -> PlfitResult<Vec<i64>> {
    parse_sample(&fs::read_to_string(path)?)
}

/// Format a sample as a comma separated list.
pub fn format_sample(sample: &[i64]) -> String {
    itertools::join(sample, ",")
}
