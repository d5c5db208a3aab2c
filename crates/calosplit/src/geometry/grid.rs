//! Reference barrel layout built from rectangular supermodules.
//!
//! Modules come in side-by-side pairs along the beam axis: the odd module of
//! a pair covers negative `z`, the even module positive `z`, so the pair
//! reads as one contiguous column range. Pairs are stacked in azimuth on a
//! cylinder of radius `radius`.

use nalgebra::Point3;

use super::{CellGeometry, CellId, CellIndex};

const DEFAULT_N_MODULES: u32 = 10;
const DEFAULT_ROWS: i32 = 24;
const DEFAULT_COLS: i32 = 48;
const DEFAULT_CELL_SIZE: f64 = 6.0;
const DEFAULT_RADIUS: f64 = 450.0;
const DEFAULT_PHI_START: f64 = 80.0 * std::f64::consts::PI / 180.0;

/// Layout parameters of [`ModuleGridGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModuleGridParams {
    /// Total number of modules (two per azimuthal slot).
    pub n_modules: u32,
    /// Cell rows per module (azimuthal direction).
    pub rows: i32,
    /// Cell columns per module (beam direction).
    pub cols: i32,
    /// Cell pitch, same unit as `radius`.
    pub cell_size: f64,
    /// Distance of the cell centres from the beam axis.
    pub radius: f64,
    /// Azimuth of the lower edge of the first module pair (radians).
    pub phi_start: f64,
}

impl Default for ModuleGridParams {
    fn default() -> Self {
        Self {
            n_modules: DEFAULT_N_MODULES,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_size: DEFAULT_CELL_SIZE,
            radius: DEFAULT_RADIUS,
            phi_start: DEFAULT_PHI_START,
        }
    }
}

impl ModuleGridParams {
    /// Reject empty layouts and layouts that overflow the id range.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_modules == 0 {
            return Err("n_modules must be >= 1".to_string());
        }
        if self.rows <= 0 || self.cols <= 0 {
            return Err("rows and cols must be >= 1".to_string());
        }
        let n_cells = self.n_modules as u64 * self.rows as u64 * self.cols as u64;
        if n_cells > CellId::MAX as u64 {
            return Err(format!("layout has {} cells, exceeding the id range", n_cells));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err("cell_size must be finite and > 0".to_string());
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err("radius must be finite and > 0".to_string());
        }
        if !self.phi_start.is_finite() {
            return Err("phi_start must be finite".to_string());
        }
        Ok(())
    }
}

/// Cell ids are `module * rows * cols + row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGridGeometry {
    params: ModuleGridParams,
    cells_per_module: u32,
}

impl Default for ModuleGridGeometry {
    fn default() -> Self {
        Self::new(ModuleGridParams::default()).expect("default grid parameters must be valid")
    }
}

impl ModuleGridGeometry {
    /// Build a geometry after validating its parameters.
    pub fn new(params: ModuleGridParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self {
            params,
            // Fits: validation bounds the whole layout by the id range.
            cells_per_module: params.rows as u32 * params.cols as u32,
        })
    }

    /// Layout parameters.
    pub fn params(&self) -> &ModuleGridParams {
        &self.params
    }

    /// Total number of cells in the layout.
    pub fn n_cells(&self) -> u32 {
        self.params.n_modules * self.cells_per_module
    }

    /// Inverse of [`CellGeometry::cell_index`].
    pub fn cell_id(&self, index: CellIndex) -> Option<CellId> {
        let p = &self.params;
        if index.module >= p.n_modules
            || !(0..p.rows).contains(&index.row)
            || !(0..p.cols).contains(&index.col)
        {
            return None;
        }
        let local = index.row as u32 * p.cols as u32 + index.col as u32;
        Some(index.module * self.cells_per_module + local)
    }

    fn pair_span_rad(&self) -> f64 {
        self.params.rows as f64 * self.params.cell_size / self.params.radius
    }
}

impl CellGeometry for ModuleGridGeometry {
    fn cell_index(&self, cell: CellId) -> Option<CellIndex> {
        let module = cell / self.cells_per_module;
        if module >= self.params.n_modules {
            return None;
        }
        let local = cell % self.cells_per_module;
        let cols = self.params.cols as u32;
        Some(CellIndex {
            module,
            row: (local / cols) as i32,
            col: (local % cols) as i32,
        })
    }

    fn global_position(&self, cell: CellId) -> Option<Point3<f64>> {
        let index = self.cell_index(cell)?;
        let p = &self.params;
        let pair = (index.module / 2) as f64;
        let phi = p.phi_start
            + pair * self.pair_span_rad()
            + (index.row as f64 + 0.5) * p.cell_size / p.radius;
        // Column relative to the pair boundary; even modules sit past it.
        let offset = if index.module % 2 == 0 {
            0.0
        } else {
            -(p.cols as f64)
        };
        let z = (index.col as f64 + offset + 0.5) * p.cell_size;
        Some(Point3::new(p.radius * phi.cos(), p.radius * phi.sin(), z))
    }

    fn module_cols(&self) -> i32 {
        self.params.cols
    }
}
