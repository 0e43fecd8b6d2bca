//! Time-indexed measurement series

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

/// A single measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Date of the measurement
    pub timestamp: NaiveDate,
    /// Measured value
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDate, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A named, chronologically ordered measurement stream
///
/// Built once by the loader and shared read-only by every downstream stage.
/// Timestamps are unique and strictly increasing; no fixed frequency is
/// assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: String,
    observations: Vec<Observation>,
}

impl Series {
    /// Create a series, sorting observations chronologically
    ///
    /// Fails with [`Error::Data`] on duplicate timestamps or non-finite values.
    pub fn new(id: impl Into<String>, mut observations: Vec<Observation>) -> Result<Self> {
        let id = id.into();

        if observations.iter().any(|o| !o.value.is_finite()) {
            return Err(Error::non_finite(&format!("series {id}")));
        }

        observations.sort_by_key(|o| o.timestamp);
        if let Some(pair) = observations
            .windows(2)
            .find(|pair| pair[0].timestamp == pair[1].timestamp)
        {
            return Err(Error::Data(format!(
                "series {id} has duplicate timestamp {}",
                pair[0].timestamp
            )));
        }

        Ok(Self { id, observations })
    }

    /// Create a series from parallel date/value slices
    pub fn from_parts(id: impl Into<String>, timestamps: &[NaiveDate], values: &[f64]) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(Error::InvalidParameter(format!(
                "timestamps ({}) and values ({}) differ in length",
                timestamps.len(),
                values.len()
            )));
        }
        let observations = timestamps
            .iter()
            .zip(values)
            .map(|(&timestamp, &value)| Observation::new(timestamp, value))
            .collect();
        Self::new(id, observations)
    }

    /// Series identifier (the column name it was read from)
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Values in chronological order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Timestamps in chronological order
    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.timestamp)
    }

    /// Check that the series carries at least `minimum` observations
    pub fn require_len(&self, minimum: usize) -> Result<()> {
        if self.len() < minimum {
            return Err(Error::InsufficientData {
                expected: minimum,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first_timestamp(), self.last_timestamp()) {
            (Some(first), Some(last)) => write!(
                f,
                "{} ({} observations, {} to {})",
                self.id,
                self.len(),
                first,
                last
            ),
            _ => write!(f, "{} (empty)", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_is_sorted_on_construction() {
        let series = Series::new(
            "P1_TOT",
            vec![
                Observation::new(date(2023, 3, 1), 3.0),
                Observation::new(date(2023, 1, 1), 1.0),
                Observation::new(date(2023, 2, 1), 2.0),
            ],
        )
        .unwrap();

        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first_timestamp(), Some(date(2023, 1, 1)));
        assert_eq!(series.last_timestamp(), Some(date(2023, 3, 1)));
    }

    #[test]
    fn test_duplicate_timestamps_rejected() {
        let result = Series::new(
            "P1_TOT",
            vec![
                Observation::new(date(2023, 1, 1), 1.0),
                Observation::new(date(2023, 1, 1), 2.0),
            ],
        );
        assert!(matches!(result, Err(Error::Data(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = Series::from_parts("P1_HOR", &[date(2023, 1, 1)], &[f64::NAN]);
        assert!(matches!(result, Err(Error::Data(_))));
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let result = Series::from_parts("P1_HOR", &[date(2023, 1, 1)], &[1.0, 2.0]);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_require_len() {
        let series = Series::from_parts("A", &[date(2023, 1, 1)], &[1.0]).unwrap();
        assert!(series.require_len(1).is_ok());
        match series.require_len(15) {
            Err(Error::InsufficientData { expected, actual }) => {
                assert_eq!(expected, 15);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let series = Series::from_parts("A", &[date(2023, 1, 1), date(2023, 2, 1)], &[1.0, 2.0]).unwrap();
        assert_eq!(series.to_string(), "A (2 observations, 2023-01-01 to 2023-02-01)");
        let empty = Series::new("B", Vec::new()).unwrap();
        assert_eq!(empty.to_string(), "B (empty)");
    }
}
