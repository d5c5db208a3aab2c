//! Cluster input record and the per-cluster resolved cell arena.

use crate::calib::AmplitudeSource;
use crate::error::ClusterError;
use crate::geometry::{CellGeometry, CellId, CellIndex};
use crate::truth::OriginTag;

/// One reconstructed calorimeter cluster, as produced upstream.
///
/// Read-only input: decomposition never mutates it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cluster {
    /// Cell ids belonging to the cluster.
    pub cells: Vec<CellId>,
    /// Total reconstructed cluster energy.
    pub energy: f64,
    /// Shower-shape width (long axis second moment).
    pub m02: f64,
    /// Monte-Carlo truth flags, when simulated truth is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truth: Option<OriginTag>,
}

impl Cluster {
    /// Cluster without truth information.
    pub fn new(cells: Vec<CellId>, energy: f64, m02: f64) -> Self {
        Self {
            cells,
            energy,
            m02,
            truth: None,
        }
    }

    /// Number of cells in the cluster.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }
}

/// A cluster cell with its geometry and calibrated energy resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Detector-wide id.
    pub id: CellId,
    /// Module/row/column position.
    pub index: CellIndex,
    /// Calibrated amplitude.
    pub energy: f64,
}

/// Cells of one cluster, resolved once and indexed by position in the
/// cluster's cell list.
///
/// All scratch state of a decomposition (suppression flags, assignment
/// flags) is sized to this arena and lives only as long as one cluster.
#[derive(Debug, Clone)]
pub struct ClusterCells {
    cells: Vec<Cell>,
    module_cols: i32,
}

impl ClusterCells {
    /// Resolve every cell id of a cluster against geometry and calibration.
    pub fn resolve(
        cell_ids: &[CellId],
        geometry: &dyn CellGeometry,
        amplitudes: &dyn AmplitudeSource,
    ) -> Result<Self, ClusterError> {
        if cell_ids.is_empty() {
            return Err(ClusterError::EmptyCluster);
        }
        let cells = cell_ids
            .iter()
            .map(|&id| {
                let index = geometry
                    .cell_index(id)
                    .ok_or(ClusterError::UnknownCell { cell: id })?;
                Ok(Cell {
                    id,
                    index,
                    energy: amplitudes.calibrated_amplitude(id),
                })
            })
            .collect::<Result<Vec<_>, ClusterError>>()?;
        Ok(Self {
            cells,
            module_cols: geometry.module_cols(),
        })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` for an empty arena.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in cluster order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Position of `id` in the arena.
    pub fn position_of(&self, id: CellId) -> Option<usize> {
        self.cells.iter().position(|c| c.id == id)
    }

    /// Neighbor test between two arena positions.
    #[inline]
    pub fn are_neighbors(&self, i: usize, j: usize) -> bool {
        i != j
            && self.cells[i]
                .index
                .is_neighbor_of(&self.cells[j].index, self.module_cols)
    }

    /// Sum of calibrated energies over all cells.
    pub fn total_energy(&self) -> f64 {
        self.cells.iter().map(|c| c.energy).sum()
    }
}

impl std::ops::Index<usize> for ClusterCells {
    type Output = Cell;

    fn index(&self, i: usize) -> &Cell {
        &self.cells[i]
    }
}
