//! Partition of a cluster between two seeds by downhill basin growth.
//!
//! Each sub-cluster grows from its seed. A growth pass takes the most
//! recently added cell as the front and claims every still-unassigned
//! neighbor whose energy is strictly below the front's. Passes repeat until
//! one claims nothing. The first seed grows to completion before the second
//! starts, so the first sub-cluster has priority on contested cells. Cells
//! that no front reaches downhill stay unassigned and their energy is
//! attributed to neither sub-cluster.

use crate::cluster::ClusterCells;
use crate::error::ClusterError;
use crate::geometry::CellId;

use super::seeds::SeedPair;

/// One side of a split.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubCluster {
    /// Anchor cell.
    pub seed: CellId,
    /// Claimed cells in claim order, seed first.
    pub cells: Vec<CellId>,
    /// Summed calibrated energy of the claimed cells.
    pub energy: f64,
}

impl SubCluster {
    /// Number of claimed cells, seed included.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }
}

/// Both sub-clusters of a split plus the count of unclaimed cells.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplitResult {
    /// Sub-cluster grown from [`SeedPair::first`].
    pub first: SubCluster,
    /// Sub-cluster grown from [`SeedPair::second`].
    pub second: SubCluster,
    /// Cells reached by neither sub-cluster.
    pub n_unassigned: usize,
}

impl SplitResult {
    /// Energy attributed to the two sub-clusters together.
    pub fn assigned_energy(&self) -> f64 {
        self.first.energy + self.second.energy
    }
}

/// Grow one sub-cluster from `seed`, consuming cells from `unassigned`.
fn grow(cells: &ClusterCells, seed: usize, unassigned: &mut [bool]) -> SubCluster {
    let mut members = vec![seed];
    let mut energy = cells[seed].energy;

    loop {
        let front = members[members.len() - 1];
        let front_energy = cells[front].energy;
        let mut added = false;

        for k in 0..cells.len() {
            if !unassigned[k] || !cells.are_neighbors(front, k) {
                continue;
            }
            if cells[k].energy < front_energy {
                unassigned[k] = false;
                members.push(k);
                energy += cells[k].energy;
                added = true;
            }
        }

        if !added {
            break;
        }
    }

    tracing::trace!(
        "sub-cluster from cell {}: {} cells, energy {:.4}",
        cells[seed].id,
        members.len(),
        energy
    );

    SubCluster {
        seed: cells[seed].id,
        cells: members.into_iter().map(|k| cells[k].id).collect(),
        energy,
    }
}

/// Split a cluster between two distinct seeds.
///
/// Both seeds must belong to the cluster. Equal seeds are a caller error
/// reported as [`ClusterError::InvalidSeedPair`].
pub fn split_energy(cells: &ClusterCells, seeds: SeedPair) -> Result<SplitResult, ClusterError> {
    if seeds.first == seeds.second {
        return Err(ClusterError::InvalidSeedPair { cell: seeds.first });
    }
    let first = cells
        .position_of(seeds.first)
        .ok_or(ClusterError::UnknownCell { cell: seeds.first })?;
    let second = cells
        .position_of(seeds.second)
        .ok_or(ClusterError::UnknownCell { cell: seeds.second })?;

    let mut unassigned = vec![true; cells.len()];
    unassigned[first] = false;
    unassigned[second] = false;

    let first = grow(cells, first, &mut unassigned);
    let second = grow(cells, second, &mut unassigned);
    let n_unassigned = unassigned.iter().filter(|&&u| u).count();

    Ok(SplitResult {
        first,
        second,
        n_unassigned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::patch;
    use rand::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn equal_seeds_are_rejected() {
        let p = patch(0, &[(0, 0, 5.0), (0, 1, 3.0)]);
        let seeds = SeedPair {
            first: p.id(0, 0),
            second: p.id(0, 0),
        };
        let err = split_energy(&p.resolve(), seeds).unwrap_err();
        assert_eq!(err, ClusterError::InvalidSeedPair { cell: p.id(0, 0) });
    }

    #[test]
    fn seeds_outside_the_cluster_are_rejected() {
        let p = patch(0, &[(0, 0, 5.0), (0, 1, 3.0)]);
        let seeds = SeedPair {
            first: p.id(0, 0),
            second: p.id(9, 9),
        };
        let err = split_energy(&p.resolve(), seeds).unwrap_err();
        assert_eq!(err, ClusterError::UnknownCell { cell: p.id(9, 9) });
    }

    #[test]
    fn two_cell_cluster_collapses_to_the_seeds() {
        let p = patch(0, &[(0, 0, 5.0), (0, 1, 3.0)]);
        let seeds = SeedPair {
            first: p.id(0, 0),
            second: p.id(0, 1),
        };
        let split = split_energy(&p.resolve(), seeds).expect("valid seeds");
        assert_eq!(split.first.cells, vec![p.id(0, 0)]);
        assert_eq!(split.second.cells, vec![p.id(0, 1)]);
        assert_eq!(split.first.energy, 5.0);
        assert_eq!(split.second.energy, 3.0);
        assert_eq!(split.n_unassigned, 0);
    }

    #[test]
    fn contested_valley_cell_goes_to_the_first_seed() {
        // Two peaks with one valley cell between them.
        let p = patch(0, &[(2, 2, 6.0), (2, 3, 1.0), (2, 4, 8.0)]);
        let seeds = SeedPair {
            first: p.id(2, 2),
            second: p.id(2, 4),
        };
        let split = split_energy(&p.resolve(), seeds).expect("valid seeds");
        assert_eq!(split.first.cells, vec![p.id(2, 2), p.id(2, 3)]);
        assert_eq!(split.second.cells, vec![p.id(2, 4)]);
        assert!((split.first.energy - 7.0).abs() < 1e-12);
        assert!((split.second.energy - 8.0).abs() < 1e-12);
    }

    #[test]
    fn growth_expands_from_the_most_recent_cell_only() {
        // Seed at col 2 claims cols 1 and 3 in one pass; only col 3 becomes
        // the next front, so col 0 (a neighbor of col 1 only) is never reached.
        let p = patch(
            0,
            &[
                (0, 2, 10.0),
                (0, 1, 6.0),
                (0, 3, 7.0),
                (0, 0, 3.0),
                (0, 4, 4.0),
                (0, 9, 5.0),
            ],
        );
        let seeds = SeedPair {
            first: p.id(0, 2),
            second: p.id(0, 9),
        };
        let split = split_energy(&p.resolve(), seeds).expect("valid seeds");
        assert_eq!(
            split.first.cells,
            vec![p.id(0, 2), p.id(0, 1), p.id(0, 3), p.id(0, 4)]
        );
        assert_eq!(split.second.cells, vec![p.id(0, 9)]);
        assert_eq!(split.n_unassigned, 1);
        assert!((split.first.energy - 27.0).abs() < 1e-12);
    }

    #[test]
    fn uphill_cells_stay_unassigned() {
        // A third peak next to the first seed is higher than its front.
        let p = patch(0, &[(4, 4, 5.0), (4, 5, 9.0), (4, 10, 6.0), (4, 11, 2.0)]);
        let seeds = SeedPair {
            first: p.id(4, 4),
            second: p.id(4, 10),
        };
        let cells = p.resolve();
        let split = split_energy(&cells, seeds).expect("valid seeds");
        assert_eq!(split.first.cells, vec![p.id(4, 4)]);
        assert_eq!(split.second.cells, vec![p.id(4, 10), p.id(4, 11)]);
        assert_eq!(split.n_unassigned, 1);
        assert!(split.assigned_energy() < cells.total_energy());
    }

    #[test]
    fn split_is_disjoint_and_never_exceeds_cluster_energy() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut layout = Vec::new();
            for row in 0..4 {
                for col in 0..6 {
                    if rng.gen_bool(0.8) {
                        layout.push((row, col, rng.gen_range(0.0..4.0)));
                    }
                }
            }
            if layout.len() < 2 {
                continue;
            }
            let p = patch(0, &layout);
            let cells = p.resolve();
            let a = rng.gen_range(0..cells.len());
            let mut b = rng.gen_range(0..cells.len());
            if a == b {
                b = (b + 1) % cells.len();
            }
            let seeds = SeedPair {
                first: cells[a].id,
                second: cells[b].id,
            };
            let split = split_energy(&cells, seeds).expect("valid seeds");

            let first: HashSet<_> = split.first.cells.iter().copied().collect();
            let second: HashSet<_> = split.second.cells.iter().copied().collect();
            assert_eq!(first.len(), split.first.cells.len());
            assert_eq!(second.len(), split.second.cells.len());
            assert!(first.is_disjoint(&second));

            let total = cells.total_energy();
            assert!(split.assigned_energy() <= total + 1e-9);
            assert_eq!(
                split.first.n_cells() + split.second.n_cells() + split.n_unassigned,
                cells.len()
            );
            if split.n_unassigned == 0 {
                assert!((split.assigned_energy() - total).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn split_is_deterministic() {
        let p = patch(
            0,
            &[(1, 1, 4.0), (1, 2, 2.0), (2, 2, 1.0), (1, 4, 3.5), (2, 4, 1.2), (1, 3, 0.4)],
        );
        let cells = p.resolve();
        let seeds = SeedPair {
            first: p.id(1, 1),
            second: p.id(1, 4),
        };
        let a = split_energy(&cells, seeds).expect("valid seeds");
        let b = split_energy(&cells, seeds).expect("valid seeds");
        assert_eq!(a, b);
        assert_eq!(a.first.energy.to_bits(), b.first.energy.to_bits());
    }
}
