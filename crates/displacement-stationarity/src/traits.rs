//! Traits implemented by stationarity tests

use crate::types::StationarityResult;
use displacement_core::{Result, Series};

/// Intrinsic properties of a stationarity test
pub trait StationarityTestProperties {
    /// Minimum number of samples the test can work with
    fn minimum_samples(&self) -> usize;

    /// Name of the test
    fn method_name(&self) -> &str;

    /// Check if the test can handle the given sample size
    fn can_handle_size(&self, size: usize) -> bool {
        size >= self.minimum_samples()
    }
}

/// A unit-root / stationarity test
pub trait StationarityTest: StationarityTestProperties {
    /// Test a chronologically ordered sequence of values
    fn analyze(&self, values: &[f64]) -> Result<StationarityResult>;

    /// Test the values of a series
    fn analyze_series(&self, series: &Series) -> Result<StationarityResult> {
        self.analyze(&series.values())
    }
}

impl<T: StationarityTestProperties + ?Sized> StationarityTestProperties for &T {
    fn minimum_samples(&self) -> usize {
        (**self).minimum_samples()
    }

    fn method_name(&self) -> &str {
        (**self).method_name()
    }
}

impl<T: StationarityTest + ?Sized> StationarityTest for &T {
    fn analyze(&self, values: &[f64]) -> Result<StationarityResult> {
        (**self).analyze(values)
    }
}
