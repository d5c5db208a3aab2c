//! Event input schema.
//!
//! Event JSON follows `calosplit.event.v1`: one detector description
//! (module-grid parameters and an optional recalibration table) followed
//! by a list of events, each carrying raw cell readings, clusters with
//! optional truth tags and an optional vertex.

use std::path::Path;

use nalgebra::Point3;

use crate::calib::{CaloCells, RecalibrationMap};
use crate::cluster::Cluster;
use crate::geometry::{ModuleGridGeometry, ModuleGridParams};

pub const EVENT_SCHEMA_V1: &str = "calosplit.event.v1";

/// One calorimeter event.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaloEvent {
    #[serde(default)]
    pub cells: CaloCells,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    /// Event vertex (x, y, z); absent means the global origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex: Option<[f64; 3]>,
}

impl CaloEvent {
    pub fn vertex_point(&self) -> Option<Point3<f64>> {
        self.vertex.map(|[x, y, z]| Point3::new(x, y, z))
    }
}

/// Parsed and validated event file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventFile {
    pub schema: String,
    #[serde(default)]
    pub geometry: ModuleGridParams,
    #[serde(default)]
    pub recalibration: RecalibrationMap,
    pub events: Vec<CaloEvent>,
}

impl EventFile {
    /// Empty file on the given geometry.
    pub fn new(geometry: ModuleGridParams) -> Self {
        Self {
            schema: EVENT_SCHEMA_V1.to_string(),
            geometry,
            recalibration: RecalibrationMap::default(),
            events: Vec::new(),
        }
    }

    /// Load an event file from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse and validate event JSON.
    pub fn from_json_str(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file: Self = serde_json::from_str(data)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), String> {
        if self.schema != EVENT_SCHEMA_V1 {
            return Err(format!(
                "unsupported event schema '{}' (expected '{}')",
                self.schema, EVENT_SCHEMA_V1
            ));
        }
        self.geometry.validate()?;
        if let Some((cell, factor)) = self
            .recalibration
            .factors
            .iter()
            .find(|(_, f)| !f.is_finite())
        {
            return Err(format!(
                "recalibration factor of cell {} is not finite ({})",
                cell, factor
            ));
        }
        for (i, event) in self.events.iter().enumerate() {
            if let Some(v) = event.vertex {
                if v.iter().any(|c| !c.is_finite()) {
                    return Err(format!("event {}: vertex is not finite", i));
                }
            }
        }
        Ok(())
    }

    /// Geometry described by the file.
    pub fn build_geometry(&self) -> Result<ModuleGridGeometry, String> {
        ModuleGridGeometry::new(self.geometry)
    }
}
