//! Calorimeter cell geometry: grid indices, spatial positions and adjacency.

mod grid;

pub use grid::{ModuleGridGeometry, ModuleGridParams};

use nalgebra::Point3;

/// Detector-wide cell identifier.
pub type CellId = u32;

/// Discrete position of a cell inside its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CellIndex {
    /// Module (supermodule) number.
    pub module: u32,
    /// Row within the module.
    pub row: i32,
    /// Column within the module.
    pub col: i32,
}

impl CellIndex {
    /// Column in the space shared by two modules of a side-by-side pair.
    ///
    /// Odd modules occupy the first `module_cols` columns, even modules the
    /// next `module_cols`. Within one module the column is returned as is.
    #[inline]
    fn shared_col(self, other_module: u32, module_cols: i32) -> i64 {
        if self.module != other_module && self.module % 2 == 0 {
            self.col as i64 + module_cols as i64
        } else {
            self.col as i64
        }
    }

    /// Returns `true` when the two cells share a side or a corner.
    ///
    /// A cell is never its own neighbor.
    #[inline]
    pub fn is_neighbor_of(&self, other: &CellIndex, module_cols: i32) -> bool {
        let col_a = self.shared_col(other.module, module_cols);
        let col_b = other.shared_col(self.module, module_cols);
        let row_diff = (self.row as i64 - other.row as i64).abs();
        let col_diff = (col_a - col_b).abs();
        row_diff <= 1 && col_diff <= 1 && row_diff + col_diff > 0
    }
}

/// Read-only access to the detector layout.
///
/// Implementations are shared across concurrently decomposed clusters and
/// must therefore be `Sync`; lookups are expected to be constant time.
pub trait CellGeometry: Sync {
    /// Module/row/column of `cell`, or `None` for an unknown id.
    fn cell_index(&self, cell: CellId) -> Option<CellIndex>;
    /// Cell centre in global detector coordinates.
    fn global_position(&self, cell: CellId) -> Option<Point3<f64>>;
    /// Column count of one module, used to bridge module boundaries.
    fn module_cols(&self) -> i32;
}

/// Neighbor test on raw cell ids.
///
/// Unknown ids are never neighbors of anything.
pub fn are_neighbors(geometry: &dyn CellGeometry, a: CellId, b: CellId) -> bool {
    if a == b {
        return false;
    }
    match (geometry.cell_index(a), geometry.cell_index(b)) {
        (Some(ia), Some(ib)) => ia.is_neighbor_of(&ib, geometry.module_cols()),
        _ => false,
    }
}
