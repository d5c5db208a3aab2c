//! Shared test utilities for cluster-level unit tests.
//!
//! Tests describe a cluster as `(row, col, amplitude)` triples inside one
//! module of the default grid and get back ids, resolved cells and a
//! ready-made [`Cluster`].

use crate::calib::CaloCells;
use crate::cluster::{Cluster, ClusterCells};
use crate::geometry::{CellId, CellIndex, ModuleGridGeometry};

/// A hand-built cluster on the default module grid.
#[derive(Debug, Clone)]
pub(crate) struct GridPatch {
    pub geometry: ModuleGridGeometry,
    pub module: u32,
    /// Cluster cell list in declaration order (tests may reorder it).
    pub cells: Vec<CellId>,
    pub amplitudes: CaloCells,
}

impl GridPatch {
    /// Id of `(row, col)` in the patch module, whether or not it is a member.
    pub fn id(&self, row: i32, col: i32) -> CellId {
        self.id_in(self.module, row, col)
    }

    /// Id of `(row, col)` in another module.
    pub fn id_in(&self, module: u32, row: i32, col: i32) -> CellId {
        self.geometry
            .cell_id(CellIndex { module, row, col })
            .expect("test cell inside the default grid")
    }

    /// Add a member cell, possibly in another module.
    pub fn push(&mut self, module: u32, row: i32, col: i32, amplitude: f64) {
        let id = self.id_in(module, row, col);
        self.cells.push(id);
        self.amplitudes.insert(id, amplitude);
    }

    /// Resolve the member cells against the patch geometry.
    pub fn resolve(&self) -> ClusterCells {
        ClusterCells::resolve(&self.cells, &self.geometry, &self.amplitudes)
            .expect("patch cells resolve")
    }

    /// Cluster record whose energy is the sum of member amplitudes.
    pub fn cluster(&self, m02: f64) -> Cluster {
        let energy = self
            .cells
            .iter()
            .map(|&c| self.amplitudes.raw_amplitude(c))
            .sum();
        Cluster::new(self.cells.clone(), energy, m02)
    }
}

/// Build a patch in `module` from `(row, col, amplitude)` triples.
pub(crate) fn patch(module: u32, layout: &[(i32, i32, f64)]) -> GridPatch {
    let mut p = GridPatch {
        geometry: ModuleGridGeometry::default(),
        module,
        cells: Vec::with_capacity(layout.len()),
        amplitudes: CaloCells::new(),
    };
    for &(row, col, amplitude) in layout {
        p.push(module, row, col, amplitude);
    }
    p
}
