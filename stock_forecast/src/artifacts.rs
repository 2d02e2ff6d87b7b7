//! Per-instrument model and scaler artifacts
//!
//! Artifacts are loaded by a provider and handed to the engine already warm.
//! Load failures never reach the engine; they surface as
//! [`ForecastError::MissingArtifact`].

use crate::config::{Instrument, InstrumentCatalog};
use crate::error::{ForecastError, Result};
use crate::normalizer::{Normalizer, ScalerArtifact};
use crate::regressor::{ModelArtifact, Regressor};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Normalizer shared read-only across forecasts
pub type SharedNormalizer = Arc<dyn Normalizer + Send + Sync>;

/// Regressor shared read-only across forecasts
pub type SharedRegressor = Arc<dyn Regressor + Send + Sync>;

/// The fitted scaler and regressor of one instrument
#[derive(Clone)]
pub struct InstrumentArtifacts {
    instrument: String,
    normalizer: SharedNormalizer,
    regressor: SharedRegressor,
}

impl InstrumentArtifacts {
    pub fn new(instrument: &str, normalizer: SharedNormalizer, regressor: SharedRegressor) -> Self {
        Self {
            instrument: instrument.to_string(),
            normalizer,
            regressor,
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn normalizer(&self) -> &(dyn Normalizer + Send + Sync) {
        self.normalizer.as_ref()
    }

    pub fn regressor(&self) -> &(dyn Regressor + Send + Sync) {
        self.regressor.as_ref()
    }
}

impl fmt::Debug for InstrumentArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentArtifacts")
            .field("instrument", &self.instrument)
            .field("input_len", &self.regressor.input_len())
            .finish_non_exhaustive()
    }
}

/// Source of ready-to-use artifacts keyed by instrument
pub trait ArtifactProvider {
    /// Artifacts for `instrument`, or `MissingArtifact`
    fn artifacts(&self, instrument: &str) -> Result<Arc<InstrumentArtifacts>>;
}

/// Provider over artifacts built in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryArtifacts {
    entries: HashMap<String, Arc<InstrumentArtifacts>>,
}

impl InMemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register artifacts under their instrument name
    pub fn insert(&mut self, artifacts: InstrumentArtifacts) {
        self.entries
            .insert(artifacts.instrument().to_uppercase(), Arc::new(artifacts));
    }
}

impl ArtifactProvider for InMemoryArtifacts {
    fn artifacts(&self, instrument: &str) -> Result<Arc<InstrumentArtifacts>> {
        self.entries
            .get(&instrument.to_uppercase())
            .cloned()
            .ok_or_else(|| ForecastError::MissingArtifact {
                instrument: instrument.to_string(),
                reason: "not registered".to_string(),
            })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Provider reading JSON artifacts from the catalog's directory.
///
/// Each instrument is loaded at most once for the lifetime of the store; later
/// requests share the cached artifacts.
#[derive(Debug)]
pub struct FileArtifactStore {
    catalog: InstrumentCatalog,
    cache: Mutex<HashMap<String, Arc<InstrumentArtifacts>>>,
}

impl FileArtifactStore {
    pub fn new(catalog: InstrumentCatalog) -> Self {
        Self {
            catalog,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    /// Number of instruments loaded so far
    pub fn loaded(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn load(&self, instrument: &Instrument) -> Result<InstrumentArtifacts> {
        let dir = &self.catalog.artifacts_dir;
        let missing = |reason: String| ForecastError::MissingArtifact {
            instrument: instrument.key.clone(),
            reason,
        };

        let scaler: ScalerArtifact = read_json(&instrument.scaler_path(dir)).map_err(missing)?;
        let model: ModelArtifact = read_json(&instrument.model_path(dir)).map_err(missing)?;

        let scaler = scaler.build().map_err(|e| missing(e.to_string()))?;
        let model = model.build().map_err(|e| missing(e.to_string()))?;

        info!(
            instrument = %instrument.key,
            input_len = model.weights().len(),
            "loaded model and scaler"
        );
        Ok(InstrumentArtifacts::new(
            &instrument.key,
            Arc::new(scaler),
            Arc::new(model),
        ))
    }
}

impl ArtifactProvider for FileArtifactStore {
    fn artifacts(&self, name: &str) -> Result<Arc<InstrumentArtifacts>> {
        let instrument = self
            .catalog
            .get(name)
            .ok_or_else(|| ForecastError::MissingArtifact {
                instrument: name.to_string(),
                reason: "not in catalog".to_string(),
            })?;

        // The lock is held across the load so concurrent callers never load twice
        let mut cache = self.cache.lock().map_err(|_| ForecastError::MissingArtifact {
            instrument: instrument.key.clone(),
            reason: "artifact cache poisoned".to_string(),
        })?;

        if let Some(hit) = cache.get(&instrument.key) {
            debug!(instrument = %instrument.key, "artifact cache hit");
            return Ok(Arc::clone(hit));
        }

        let loaded = self.load(instrument).map_err(|e| {
            warn!(instrument = %instrument.key, error = %e, "artifact load failed");
            e
        })?;
        let loaded = Arc::new(loaded);
        cache.insert(instrument.key.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }
}
