//! JSON run manifest.
//!
//! A self-contained record of one run: when it ran, how the search was
//! configured, and every city's series, model, forecast and summary.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CityResult, ForecastConfig, InfoCriterion, SearchMode};
use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub criterion: InfoCriterion,
    pub mode: SearchMode,
    pub horizon: usize,
    pub cities: Vec<CityResult>,
}

impl RunManifest {
    pub fn new(config: &ForecastConfig, results: &[CityResult]) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: Utc::now(),
            seed: config.seed,
            criterion: config.search.criterion,
            mode: config.search.mode,
            horizon: config.horizon,
            cities: results.to_vec(),
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    serde_json::to_writer_pretty(BufWriter::new(file), manifest).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_manifest(path: &Path) -> Result<RunManifest, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(file).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })
}
