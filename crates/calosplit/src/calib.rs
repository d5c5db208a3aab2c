//! Cell amplitudes and per-channel recalibration.

use std::collections::HashMap;

use crate::geometry::CellId;

/// Calibrated energy lookup for the cells of one event.
///
/// Amplitudes can be zero or negative after pedestal subtraction; callers
/// must tolerate that. Implementations are shared read-only across
/// concurrently decomposed clusters.
pub trait AmplitudeSource: Sync {
    /// Calibrated energy of `cell`. Cells without a reading report zero.
    fn calibrated_amplitude(&self, cell: CellId) -> f64;
}

/// One cell reading as stored in event files.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CellReading {
    pub id: CellId,
    /// Raw (uncalibrated) amplitude.
    pub amplitude: f64,
}

/// Raw cell amplitudes of one event.
///
/// Serialized as a list of [`CellReading`]s sorted by cell id.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<CellReading>", into = "Vec<CellReading>")]
pub struct CaloCells {
    amplitudes: HashMap<CellId, f64>,
}

impl CaloCells {
    /// Empty cell container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) the raw amplitude of a cell.
    pub fn insert(&mut self, cell: CellId, amplitude: f64) {
        self.amplitudes.insert(cell, amplitude);
    }

    /// Raw amplitude, zero for cells without a reading.
    pub fn raw_amplitude(&self, cell: CellId) -> f64 {
        self.amplitudes.get(&cell).copied().unwrap_or(0.0)
    }

    /// Number of cells with a reading.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Returns `true` when no cell has a reading.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// View these amplitudes through a recalibration table.
    pub fn recalibrated<'a>(&'a self, table: &'a RecalibrationMap) -> Recalibrated<'a> {
        Recalibrated { cells: self, table }
    }
}

impl FromIterator<(CellId, f64)> for CaloCells {
    fn from_iter<I: IntoIterator<Item = (CellId, f64)>>(iter: I) -> Self {
        Self {
            amplitudes: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<CellReading>> for CaloCells {
    fn from(readings: Vec<CellReading>) -> Self {
        readings.into_iter().map(|r| (r.id, r.amplitude)).collect()
    }
}

impl From<CaloCells> for Vec<CellReading> {
    fn from(cells: CaloCells) -> Self {
        let mut readings: Vec<CellReading> = cells
            .amplitudes
            .into_iter()
            .map(|(id, amplitude)| CellReading { id, amplitude })
            .collect();
        readings.sort_unstable_by_key(|r| r.id);
        readings
    }
}

impl AmplitudeSource for CaloCells {
    fn calibrated_amplitude(&self, cell: CellId) -> f64 {
        self.raw_amplitude(cell)
    }
}

/// Multiplicative per-cell correction factors.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecalibrationMap {
    /// Apply the factors; when `false` every factor reads as 1.
    pub enabled: bool,
    /// Factor per cell; cells not listed use 1.
    pub factors: HashMap<CellId, f64>,
}

impl RecalibrationMap {
    /// Enabled table from explicit factors.
    pub fn from_factors(factors: HashMap<CellId, f64>) -> Self {
        Self {
            enabled: true,
            factors,
        }
    }

    /// Factor applied to the raw amplitude of `cell`.
    pub fn factor(&self, cell: CellId) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        self.factors.get(&cell).copied().unwrap_or(1.0)
    }
}

/// Raw amplitudes with recalibration applied on read.
#[derive(Debug, Clone, Copy)]
pub struct Recalibrated<'a> {
    cells: &'a CaloCells,
    table: &'a RecalibrationMap,
}

impl AmplitudeSource for Recalibrated<'_> {
    fn calibrated_amplitude(&self, cell: CellId) -> f64 {
        self.cells.raw_amplitude(cell) * self.table.factor(cell)
    }
}
