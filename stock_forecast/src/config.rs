//! Engine configuration and the instrument catalog

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Window length the bundled models were trained with
pub const DEFAULT_WINDOW_SIZE: usize = 25;

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

/// Settings consumed by the forecast engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of observations per window; must match the regressor's input length
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl ForecastConfig {
    /// Create a validated configuration
    pub fn new(window_size: usize) -> Result<Self> {
        let config = Self { window_size };
        config.validate()?;
        Ok(config)
    }

    /// Check the settings
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ForecastError::ConfigError(
                "window_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file, missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| ForecastError::ConfigError(format!("Invalid forecast config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

/// One tradable instrument and where its artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Short display key, e.g. "BBCA"
    pub key: String,
    /// Market ticker, e.g. "BBCA.JK"
    pub ticker: String,
    /// Explicit model file; defaults to `<ticker>_model.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_file: Option<PathBuf>,
    /// Explicit scaler file; defaults to `<ticker>_scaler.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_file: Option<PathBuf>,
}

impl Instrument {
    pub fn new(key: &str, ticker: &str) -> Self {
        Self {
            key: key.to_string(),
            ticker: ticker.to_string(),
            model_file: None,
            scaler_file: None,
        }
    }

    /// Path of the serialized regressor inside `dir`
    pub fn model_path(&self, dir: &Path) -> PathBuf {
        match &self.model_file {
            Some(file) => dir.join(file),
            None => dir.join(format!("{}_model.json", self.ticker)),
        }
    }

    /// Path of the serialized scaler inside `dir`
    pub fn scaler_path(&self, dir: &Path) -> PathBuf {
        match &self.scaler_file {
            Some(file) => dir.join(file),
            None => dir.join(format!("{}_scaler.json", self.ticker)),
        }
    }
}

/// Instruments with artifacts available for forecasting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    /// Directory holding model and scaler files
    pub artifacts_dir: PathBuf,
    pub instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    /// The five IDX blue chips with bundled models
    pub fn blue_chips<P: Into<PathBuf>>(artifacts_dir: P) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
            instruments: vec![
                Instrument::new("BBCA", "BBCA.JK"),
                Instrument::new("BBRI", "BBRI.JK"),
                Instrument::new("TLKM", "TLKM.JK"),
                Instrument::new("BMRI", "BMRI.JK"),
                Instrument::new("ASII", "ASII.JK"),
            ],
        }
    }

    /// Load from a JSON file.
    ///
    /// A relative `artifacts_dir` is resolved against the file's own directory.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut catalog: Self = serde_json::from_str(&text)
            .map_err(|e| ForecastError::ConfigError(format!("Invalid catalog: {}", e)))?;

        if catalog.artifacts_dir.is_relative() {
            if let Some(parent) = path.parent() {
                catalog.artifacts_dir = parent.join(&catalog.artifacts_dir);
            }
        }

        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the catalog is non-empty and keys are unique
    pub fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            return Err(ForecastError::ConfigError(
                "Catalog lists no instruments".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.key.trim().is_empty() || instrument.ticker.trim().is_empty() {
                return Err(ForecastError::ConfigError(
                    "Instrument key and ticker must not be empty".to_string(),
                ));
            }
            if !seen.insert(instrument.key.to_uppercase()) {
                return Err(ForecastError::ConfigError(format!(
                    "Duplicate instrument key: {}",
                    instrument.key
                )));
            }
        }
        Ok(())
    }

    /// Look up an instrument by key or ticker, ignoring case
    pub fn get(&self, name: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| {
            i.key.eq_ignore_ascii_case(name) || i.ticker.eq_ignore_ascii_case(name)
        })
    }

    /// Instrument keys in catalog order
    pub fn keys(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.key.as_str()).collect()
    }
}
