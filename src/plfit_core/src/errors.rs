//! # Errors
//! Errors emitted by plfit_core

/// Define all errors which may be raised by this crate, wrappers for other languages
/// convert these into their own exception types.
use std::{error, fmt, io};

/// plfit specific result.
pub type PlfitResult<T> = Result<T, Error>;

/// Possible Errors which may be raised by this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No sample data was provided to a fit.
    NoInput,

    /// Supplied bounds or parameters are incompatible with the sample data.
    InvalidInput(String),

    /// Input or variable exceeded expected or allowed bounds.
    ValueError(String),

    /// Error related to IO, including parsing of textual samples.
    IOError(String),

    /// The worker pool used for bootstrapping could not be constructed.
    ThreadPool(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NoInput => {
                write!(f, "No sample data was provided.")
            }
            Error::InvalidInput(s) => {
                write!(f, "Invalid input: {}", s)
            }
            Error::ValueError(s) => {
                write!(f, "{}", s)
            }
            Error::IOError(s) => {
                write!(f, "{}", s)
            }
            Error::ThreadPool(s) => {
                write!(f, "Failed to build thread pool: {}", s)
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::IOError(error.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(value: std::num::ParseIntError) -> Self {
        Error::IOError(value.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_conversion() {
        let err: Error = "12a".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, Error::IOError(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::NoInput.to_string(), "No sample data was provided.");
        assert_eq!(
            Error::InvalidInput("xMin too large".into()).to_string(),
            "Invalid input: xMin too large"
        );
    }
}
