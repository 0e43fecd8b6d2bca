//! Run configuration
//!
//! Every field has a default, so a configuration file only needs to carry
//! what differs. Analysis constants live in
//! [`displacement_core::constants`] and are not configurable.

use anyhow::Context;
use displacement_data::LoaderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Structures analysed when none are named explicitly
pub const DEFAULT_STRUCTURES: [&str; 6] = [
    "dd_abra",
    "dd_hidro",
    "dd_brunilda",
    "dd_gayco_630",
    "dd_gayco_580",
    "dd_gerencia",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Monitored structures, one `<name>.csv` per structure
    pub structures: Vec<String>,
    /// Directory holding the input files
    pub data_dir: PathBuf,
    /// Root of the per-structure output trees
    pub output_dir: PathBuf,
    /// Parsing options shared by every input file
    pub loader: LoaderOptions,
    /// Draw decomposition and forecast charts
    pub charts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            structures: DEFAULT_STRUCTURES.iter().map(|s| s.to_string()).collect(),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            loader: LoaderOptions::default(),
            charts: true,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing configuration {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Input file of a structure
    pub fn dataset_path(&self, structure: &str) -> PathBuf {
        self.data_dir.join(format!("{structure}.csv"))
    }
}
