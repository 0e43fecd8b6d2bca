//! Series extraction from delimited monitoring files
//!
//! A monitoring file has one date column and one column per measured series.
//! Every remaining column becomes an independent [`Series`]; rows with a
//! missing value are dropped per column, so series from the same file may end
//! up with different lengths and timestamps.
//!
//! Series are indexed by day. When a column holds several readings on the
//! same day, the latest reading of that day is kept.

use crate::dates::parse_day_first_datetime;
use displacement_core::constants::VERIFICATION_SUFFIX;
use displacement_core::{Error, Observation, Result, Series};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Tokens treated as a missing value
const MISSING_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Options controlling how a monitoring file is parsed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Field delimiter
    pub separator: char,
    /// Decimal separator used by the value columns
    pub decimal: char,
    /// Header of the date column
    pub date_column: String,
    /// Columns whose header ends with this suffix are skipped
    pub verification_suffix: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            separator: ';',
            decimal: '.',
            date_column: "date".to_string(),
            verification_suffix: VERIFICATION_SUFFIX.to_string(),
        }
    }
}

/// All series read from one monitoring file
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Dataset name (the monitored structure)
    pub name: String,
    /// One series per eligible column, in column order
    pub series: Vec<Series>,
}

impl Dataset {
    pub fn series_ids(&self) -> Vec<&str> {
        self.series.iter().map(Series::id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.id() == id)
    }
}

/// Reads monitoring files into per-column series
#[derive(Debug, Clone, Default)]
pub struct SeriesLoader {
    options: LoaderOptions,
}

impl SeriesLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load a file; the dataset is named after the file stem
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_path(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path)
            .map_err(|e| Error::Data(format!("cannot open {}: {e}", path.display())))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_reader(&name, BufReader::new(file))
    }

    /// Load delimited content from any reader
    pub fn load_reader<R: Read>(&self, name: &str, reader: R) -> Result<Dataset> {
        let delimiter = u8::try_from(self.options.separator).map_err(|_| {
            Error::InvalidParameter(format!(
                "separator '{}' is not a single-byte character",
                self.options.separator
            ))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::Data(format!("{name}: cannot read header: {e}")))?
            .clone();

        let date_idx = headers
            .iter()
            .position(|h| h == self.options.date_column)
            .ok_or_else(|| {
                Error::Data(format!(
                    "{name}: missing date column '{}'",
                    self.options.date_column
                ))
            })?;

        let value_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| {
                *idx != date_idx && !header.ends_with(self.options.verification_suffix.as_str())
            })
            .map(|(idx, header)| (idx, header.to_string()))
            .collect();

        let excluded = headers.len() - value_columns.len() - 1;
        debug!(
            dataset = name,
            columns = value_columns.len(),
            excluded,
            "resolved value columns"
        );

        let mut columns: Vec<Vec<(NaiveDateTime, f64)>> = vec![Vec::new(); value_columns.len()];

        for (row_idx, record) in reader.records().enumerate() {
            // Header is line 1
            let line = row_idx + 2;
            let record = record.map_err(|e| Error::Data(format!("{name}: line {line}: {e}")))?;

            let raw_date = record.get(date_idx).unwrap_or_default();
            let timestamp = parse_day_first_datetime(raw_date)
                .ok_or_else(|| Error::Data(format!("{name}: line {line}: unparsable date '{raw_date}'")))?;

            for (slot, (col_idx, header)) in value_columns.iter().enumerate() {
                let raw = record.get(*col_idx).unwrap_or_default();
                if let Some(value) = self.parse_value(raw).map_err(|_| {
                    Error::Data(format!(
                        "{name}: line {line}: column {header}: invalid number '{raw}'"
                    ))
                })? {
                    columns[slot].push((timestamp, value));
                }
            }
        }

        let series = value_columns
            .into_iter()
            .zip(columns)
            .map(|((_, header), readings)| {
                let observations = daily_observations(name, &header, readings);
                Series::new(header, observations)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(dataset = name, series = series.len(), "dataset loaded");

        Ok(Dataset {
            name: name.to_string(),
            series,
        })
    }

    /// Parse one value cell; `Ok(None)` marks a missing value
    fn parse_value(&self, raw: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
        let raw = raw.trim();
        if MISSING_TOKENS.contains(&raw) {
            return Ok(None);
        }
        let value = if self.options.decimal == '.' {
            raw.parse::<f64>()?
        } else {
            raw.replace(self.options.decimal, ".").parse::<f64>()?
        };
        Ok(Some(value))
    }
}

/// Order readings by time and keep the latest reading of each day
fn daily_observations(dataset: &str, column: &str, mut readings: Vec<(NaiveDateTime, f64)>) -> Vec<Observation> {
    readings.sort_by_key(|(timestamp, _)| *timestamp);

    let total = readings.len();
    let mut observations: Vec<Observation> = Vec::with_capacity(total);
    for (timestamp, value) in readings {
        let observation = Observation::new(timestamp.date(), value);
        match observations.last_mut() {
            Some(last) if last.timestamp == observation.timestamp => *last = observation,
            _ => observations.push(observation),
        }
    }

    let merged = total - observations.len();
    if merged > 0 {
        warn!(
            dataset,
            column,
            merged,
            "several readings on the same day, keeping the latest of each day"
        );
    }
    observations
}
