//! Error types for displacement series analysis
//!
//! Provides a unified error type for all displacement crates. The variants
//! map onto the failure policy of the batch job: data errors abort a dataset
//! load, insufficient data and model-fit errors abort a single series, and
//! render errors are recovered where they occur.

use thiserror::Error;

/// Core error type for displacement analysis
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input data
    #[error("Data error: {0}")]
    Data(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A forecasting model failed to fit (non-convergence or degenerate input)
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// A value could not be rendered into an output document
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Data(format!("{context} contains NaN or infinite values"))
    }

    /// Create a model-fit error for an optimizer that ran out of iterations
    pub fn not_converged(model: &str, iterations: usize) -> Self {
        Self::ModelFit(format!("{model} did not converge after {iterations} iterations"))
    }

    /// Whether the error only affects the series being processed
    ///
    /// Data and IO errors concern a whole dataset or the run itself.
    pub fn is_series_local(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. }
                | Self::ModelFit(_)
                | Self::Render(_)
                | Self::Computation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Data("unparsable date '31/02/2021'".to_string());
        assert_eq!(err.to_string(), "Data error: unparsable date '31/02/2021'");

        let err = Error::InsufficientData { expected: 15, actual: 10 };
        assert_eq!(err.to_string(), "Insufficient data: expected at least 15 samples, got 10");

        let err = Error::ModelFit("singular normal equations".to_string());
        assert_eq!(err.to_string(), "Model fit error: singular normal equations");

        let err = Error::Render("p-value is NaN".to_string());
        assert_eq!(err.to_string(), "Render error: p-value is NaN");

        let err = Error::InvalidParameter("period must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: period must be positive");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::non_finite("series A1_TOT");
        assert_eq!(err.to_string(), "Data error: series A1_TOT contains NaN or infinite values");

        let err = Error::not_converged("SARIMA", 5000);
        assert_eq!(err.to_string(), "Model fit error: SARIMA did not converge after 5000 iterations");
    }

    #[test]
    fn test_series_local_classification() {
        assert!(Error::InsufficientData { expected: 12, actual: 3 }.is_series_local());
        assert!(Error::ModelFit("x".into()).is_series_local());
        assert!(Error::Render("x".into()).is_series_local());
        assert!(!Error::Data("x".into()).is_series_local());

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!Error::from(io_err).is_series_local());
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {
                assert!(err.to_string().contains("file not found"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => {
                assert!(err.to_string().contains("custom error message"));
            }
            _ => panic!("Wrong error type"),
        }
    }
}
