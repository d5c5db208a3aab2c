//! Local-maximum search inside one cluster.
//!
//! Every pair of neighboring cells is compared once; the lower-energy cell
//! loses maximum status. Cells of equal energy both lose, as does the
//! winner of a pair whose energy gap is below `local_max_cut`. The outcome
//! therefore depends only on the cell set, never on the order of the
//! cluster's cell list.

use crate::cluster::ClusterCells;
use crate::geometry::CellId;

/// Configuration for local-maximum suppression.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LocalMaximaConfig {
    /// Minimum energy gap a cell must keep over each neighbor.
    ///
    /// A winner closer than this to a neighbor is suppressed along with it.
    pub local_max_cut: f64,
    /// Survivors below this calibrated energy are not reported.
    pub min_seed_energy: f64,
}

impl Default for LocalMaximaConfig {
    fn default() -> Self {
        Self {
            local_max_cut: 0.0,
            min_seed_energy: 0.1,
        }
    }
}

/// A cell that survived suppression.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocalMaximum {
    /// Cell id.
    pub cell: CellId,
    /// Calibrated energy of the cell.
    pub energy: f64,
}

/// Find the local maxima of a cluster.
///
/// Returns maxima in cluster order. An empty result means every cell was
/// suppressed or below the seed-energy floor.
pub fn find_local_maxima(cells: &ClusterCells, config: &LocalMaximaConfig) -> Vec<LocalMaximum> {
    let n = cells.len();
    let mut alive = vec![true; n];

    for i in 0..n {
        let e_i = cells[i].energy;
        for j in (i + 1)..n {
            if !cells.are_neighbors(i, j) {
                continue;
            }
            let e_j = cells[j].energy;
            let (winner, loser) = if e_i > e_j {
                (i, j)
            } else if e_j > e_i {
                (j, i)
            } else {
                alive[i] = false;
                alive[j] = false;
                continue;
            };
            alive[loser] = false;
            if (cells[winner].energy - cells[loser].energy) < config.local_max_cut {
                alive[winner] = false;
            }
        }
    }

    let maxima: Vec<LocalMaximum> = cells
        .iter()
        .zip(&alive)
        .filter(|(cell, &alive)| alive && cell.energy >= config.min_seed_energy)
        .map(|(cell, _)| LocalMaximum {
            cell: cell.id,
            energy: cell.energy,
        })
        .collect();

    tracing::trace!(
        "local maxima: {} of {} cells survive ({:?})",
        maxima.len(),
        n,
        maxima.iter().map(|m| m.cell).collect::<Vec<_>>()
    );
    maxima
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{patch, GridPatch};
    use rand::prelude::*;

    fn maxima_ids(p: &GridPatch, config: &LocalMaximaConfig) -> Vec<CellId> {
        find_local_maxima(&p.resolve(), config)
            .iter()
            .map(|m| m.cell)
            .collect()
    }

    #[test]
    fn adjacent_pair_keeps_the_higher_cell() {
        let p = patch(0, &[(0, 0, 5.0), (0, 1, 3.0)]);
        let maxima = find_local_maxima(&p.resolve(), &LocalMaximaConfig::default());
        assert_eq!(maxima.len(), 1);
        assert_eq!(maxima[0].cell, p.id(0, 0));
        assert_eq!(maxima[0].energy, 5.0);
    }

    #[test]
    fn centre_of_a_line_suppresses_both_sides() {
        let p = patch(0, &[(4, 4, 6.0), (4, 5, 10.0), (4, 6, 6.0)]);
        let ids = maxima_ids(&p, &LocalMaximaConfig::default());
        assert_eq!(ids, vec![p.id(4, 5)]);
    }

    #[test]
    fn separated_peaks_are_both_found_in_cluster_order() {
        let p = patch(
            0,
            &[
                (5, 8, 1.0),
                (5, 9, 4.0),
                (5, 10, 2.0),
                (5, 11, 0.8),
                (5, 12, 1.5),
                (5, 13, 6.0),
                (5, 14, 2.5),
            ],
        );
        let ids = maxima_ids(&p, &LocalMaximaConfig::default());
        assert_eq!(ids, vec![p.id(5, 9), p.id(5, 13)]);
    }

    #[test]
    fn suppressed_neighbor_still_suppresses_lower_cells() {
        // 10 -> 9 -> 8 along a line: the 8 must lose to the 9 even though
        // the 9 itself already lost to the 10.
        let p = patch(0, &[(2, 2, 10.0), (2, 3, 9.0), (2, 4, 8.0)]);
        let ids = maxima_ids(&p, &LocalMaximaConfig::default());
        assert_eq!(ids, vec![p.id(2, 2)]);
    }

    #[test]
    fn equal_neighbors_both_lose() {
        let p = patch(0, &[(1, 1, 3.0), (1, 2, 3.0)]);
        assert!(maxima_ids(&p, &LocalMaximaConfig::default()).is_empty());
    }

    #[test]
    fn local_max_cut_suppresses_near_degenerate_peaks() {
        let p = patch(0, &[(1, 1, 3.0), (1, 2, 2.9), (1, 6, 1.0)]);
        let loose = LocalMaximaConfig::default();
        assert_eq!(maxima_ids(&p, &loose), vec![p.id(1, 1), p.id(1, 6)]);

        let strict = LocalMaximaConfig {
            local_max_cut: 0.5,
            ..Default::default()
        };
        assert_eq!(maxima_ids(&p, &strict), vec![p.id(1, 6)]);
    }

    #[test]
    fn seed_energy_floor_drops_faint_survivors() {
        let p = patch(0, &[(3, 3, 2.0), (3, 9, 0.05), (3, 12, -0.4)]);
        let ids = maxima_ids(&p, &LocalMaximaConfig::default());
        assert_eq!(ids, vec![p.id(3, 3)]);
    }

    #[test]
    fn negative_amplitudes_are_tolerated() {
        let p = patch(0, &[(3, 3, 2.0), (3, 4, -0.3), (4, 4, 0.0)]);
        let ids = maxima_ids(&p, &LocalMaximaConfig::default());
        assert_eq!(ids, vec![p.id(3, 3)]);
    }

    #[test]
    fn maxima_set_is_independent_of_cell_order() {
        let mut rng = StdRng::seed_from_u64(2024);
        let config = LocalMaximaConfig::default();
        for _ in 0..50 {
            let mut layout = Vec::new();
            for row in 0..5 {
                for col in 0..5 {
                    layout.push((row, col, rng.gen_range(-0.2..5.0)));
                }
            }
            let p = patch(0, &layout);
            let mut reference = maxima_ids(&p, &config);
            reference.sort_unstable();

            for _ in 0..5 {
                let mut shuffled = p.clone();
                shuffled.cells.shuffle(&mut rng);
                let mut ids = maxima_ids(&shuffled, &config);
                ids.sort_unstable();
                assert_eq!(ids, reference);
            }
        }
    }
}
