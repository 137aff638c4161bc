use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::EngineError, geom::Crs};

/// Full tool configuration. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub boundaries: BoundaryConfig,
    pub points: PointColumns,
    pub map: MapView,
}

/// Grid generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell side length, in units of the planar CRS.
    pub step: f64,
    pub projection: Crs,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { step: 200.0, projection: Crs::WebMercator }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(EngineError::InvalidConfiguration(
                format!("grid step must be a positive number, got {}", self.step)
            ))
        }
        Ok(())
    }
}

/// How boundary features are labelled and split into regions and exclusion zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub label_field: String,
    pub exclusion_prefix: String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self { label_field: "Name".into(), exclusion_prefix: "ZM".into() }
    }
}

/// Column names used when reading endpoint tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointColumns {
    pub latitude: String,
    pub longitude: String,
    pub priority: Option<String>,
    pub label: Option<String>,
    pub separator: char,
}

impl Default for PointColumns {
    fn default() -> Self {
        Self {
            latitude: "LAT".into(),
            longitude: "LNG".into(),
            priority: Some("EP_NETPARK".into()),
            label: Some("NOME".into()),
            separator: ',',
        }
    }
}

/// Initial map viewport and basemap. Only the renderer reads this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: String,
    pub attribution: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [-23.561684, -46.655981],
            zoom: 14,
            tiles: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".into(),
            attribution: "&copy; OpenStreetMap contributors &copy; CARTO".into(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("[config] Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Check every section for values the engine or loaders cannot work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.grid.validate()?;

        if self.boundaries.label_field.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration("boundary label field is empty".into()))
        }
        if self.boundaries.exclusion_prefix.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration("exclusion prefix is empty".into()))
        }
        if self.points.latitude.trim().is_empty() || self.points.longitude.trim().is_empty() {
            return Err(EngineError::InvalidConfiguration("latitude/longitude column names are required".into()))
        }
        if !self.points.separator.is_ascii() {
            return Err(EngineError::InvalidConfiguration(
                format!("CSV separator must be a single ASCII character, got {:?}", self.points.separator)
            ))
        }
        Ok(())
    }
}
