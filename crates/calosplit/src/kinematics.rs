//! Massless four-momenta of cells and sub-clusters, and pair invariant mass.

use std::ops::Add;

use nalgebra::{Point3, Vector3};

use crate::calib::AmplitudeSource;
use crate::error::ClusterError;
use crate::geometry::{CellGeometry, CellId};

/// Energy-momentum four-vector `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FourMomentum {
    /// Momentum along the global x axis.
    pub px: f64,
    /// Momentum along the global y axis.
    pub py: f64,
    /// Momentum along the beam axis.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// Massless four-momentum of energy `energy` along `direction`.
    ///
    /// `direction` must be a unit vector.
    pub fn massless(energy: f64, direction: &Vector3<f64>) -> Self {
        Self {
            px: energy * direction.x,
            py: energy * direction.y,
            pz: energy * direction.z,
            e: energy,
        }
    }

    /// Spatial part.
    pub fn momentum(&self) -> Vector3<f64> {
        Vector3::new(self.px, self.py, self.pz)
    }

    /// Minkowski square `E^2 - |p|^2`.
    pub fn mass_squared(&self) -> f64 {
        self.e * self.e - self.momentum().norm_squared()
    }

    /// Minkowski norm.
    ///
    /// Round-off can push the square of a (nearly) massless vector slightly
    /// below zero; such values are reported as zero mass. Pairs built by the
    /// pipeline only carry positive energies, so a clamp there is round-off.
    pub fn mass(&self) -> f64 {
        self.mass_squared().max(0.0).sqrt()
    }

    /// Invariant mass of the pair `self + other`.
    pub fn invariant_mass(&self, other: &FourMomentum) -> f64 {
        (*self + *other).mass()
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

/// Massless four-momentum of energy `energy` pointing from `vertex` (or the
/// global origin) to the centre of `cell`.
pub fn momentum_from_energy(
    geometry: &dyn CellGeometry,
    cell: CellId,
    energy: f64,
    vertex: Option<&Point3<f64>>,
) -> Result<FourMomentum, ClusterError> {
    let position = geometry
        .global_position(cell)
        .ok_or(ClusterError::UnknownCell { cell })?;
    let origin = vertex.copied().unwrap_or_else(Point3::origin);
    let offset = position - origin;
    let r = offset.norm();
    if !r.is_finite() || r <= 0.0 {
        return Err(ClusterError::DegenerateDirection { cell });
    }
    Ok(FourMomentum::massless(energy, &(offset / r)))
}

/// Like [`momentum_from_energy`], using the cell's own calibrated amplitude.
pub fn momentum_from_cell(
    geometry: &dyn CellGeometry,
    amplitudes: &dyn AmplitudeSource,
    cell: CellId,
    vertex: Option<&Point3<f64>>,
) -> Result<FourMomentum, ClusterError> {
    momentum_from_energy(geometry, cell, amplitudes.calibrated_amplitude(cell), vertex)
}
