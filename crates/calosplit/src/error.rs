//! Per-cluster failure modes.

use serde::{Deserialize, Serialize};

use crate::geometry::CellId;

/// Errors that abandon the decomposition of one cluster.
///
/// None of these is fatal to an event: the pipeline records the error in
/// the cluster outcome and moves on to the next cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterError {
    /// The cluster carries no cells.
    EmptyCluster,
    /// A cluster cell is unknown to the geometry.
    UnknownCell {
        /// Offending cell id.
        cell: CellId,
    },
    /// Every cell of a non-empty cluster was suppressed.
    NoMaximaFound {
        /// Number of cells in the cluster.
        n_cells: usize,
    },
    /// One maximum was found but no other cell can seed the second sub-cluster.
    NoSecondSeed {
        /// The sole maximum.
        seed: CellId,
    },
    /// Both seeds of a split name the same cell.
    InvalidSeedPair {
        /// The duplicated seed.
        cell: CellId,
    },
    /// Neither a sub-cluster nor its seed cell carries positive energy.
    NonPositiveEnergy {
        /// Seed of the sub-cluster.
        cell: CellId,
    },
    /// Vertex-to-cell distance is zero or not finite.
    DegenerateDirection {
        /// Cell whose direction could not be normalized.
        cell: CellId,
    },
}

impl ClusterError {
    /// Returns `true` for outcomes that mean "no mass can be formed" rather
    /// than a fault in the inputs.
    pub fn is_missing_maximum(&self) -> bool {
        matches!(self, Self::NoMaximaFound { .. } | Self::NoSecondSeed { .. })
    }
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCluster => write!(f, "cluster has no cells"),
            Self::UnknownCell { cell } => write!(f, "cell {} is not known to the geometry", cell),
            Self::NoMaximaFound { n_cells } => {
                write!(f, "no local maximum found among {} cells", n_cells)
            }
            Self::NoSecondSeed { seed } => {
                write!(f, "no second seed besides sole maximum {}", seed)
            }
            Self::InvalidSeedPair { cell } => write!(f, "both seeds are cell {}", cell),
            Self::NonPositiveEnergy { cell } => {
                write!(f, "no positive energy around seed {}", cell)
            }
            Self::DegenerateDirection { cell } => {
                write!(f, "zero vertex distance for cell {}", cell)
            }
        }
    }
}

impl std::error::Error for ClusterError {}
