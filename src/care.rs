//! Static plant care reference data, loaded from a JSON file

use crate::error::{ConfigError, GalleryError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    /// System prompt used when chatting as this plant
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Care record for one species
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareInfo {
    pub name: String,
    #[serde(default)]
    pub light: Option<String>,
    #[serde(default)]
    pub water: Option<String>,
    #[serde(default)]
    pub humidity: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub feeding: Option<String>,
    #[serde(default)]
    pub toxicity: Option<String>,
    #[serde(default)]
    pub personality: Personality,
}

impl CareInfo {
    /// Labelled care fields that are present, in display order
    pub fn care_lines(&self) -> Vec<(&'static str, &str)> {
        [
            ("Light", &self.light),
            ("Water", &self.water),
            ("Humidity", &self.humidity),
            ("Temperature", &self.temperature),
            ("Feeding", &self.feeding),
            ("Toxicity", &self.toxicity),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// The reference list care info is looked up in
#[derive(Debug, Clone, Default)]
pub struct CareCatalog {
    records: Vec<CareInfo>,
}

impl CareCatalog {
    pub fn new(records: Vec<CareInfo>) -> Self {
        Self { records }
    }

    /// Loads the catalog from a JSON array. A missing file gives an empty
    /// catalog so identification still works without care data.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("[care] Care data not found at {:?}; continuing without care info", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records: Vec<CareInfo> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.display().to_string(),
                source,
            })?;
        info!("[care] Loaded {} care records from {:?}", records.len(), path);
        Ok(Self { records })
    }

    /// Case-insensitive exact match on the record name
    pub fn lookup(&self, species: &str) -> Result<&CareInfo, GalleryError> {
        let wanted = species.trim().to_lowercase();
        self.records
            .iter()
            .find(|record| record.name.to_lowercase() == wanted)
            .ok_or_else(|| GalleryError::NotFound(species.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
