//! Choice of the two dominant cells that anchor a split.

use crate::cluster::ClusterCells;
use crate::error::ClusterError;
use crate::geometry::CellId;

use super::maxima::LocalMaximum;

/// The two anchor cells of a split. Always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeedPair {
    /// Anchor of the first sub-cluster (growth priority).
    pub first: CellId,
    /// Anchor of the second sub-cluster.
    pub second: CellId,
}

/// Highest-energy candidate; the first one encountered wins ties.
fn first_highest(candidates: impl Iterator<Item = (CellId, f64)>) -> Option<(CellId, f64)> {
    candidates.fold(None, |best, (cell, energy)| match best {
        Some((_, best_energy)) if energy <= best_energy => best,
        _ => Some((cell, energy)),
    })
}

/// Pick the two dominant seeds from the local maxima of a cluster.
///
/// - one maximum: it is the first seed; the second is the most energetic
///   other cell of the whole cluster with positive energy;
/// - two maxima: both, in discovery order;
/// - more: the two most energetic maxima.
pub fn select_dominant_pair(
    maxima: &[LocalMaximum],
    cells: &ClusterCells,
) -> Result<SeedPair, ClusterError> {
    match maxima {
        [] => Err(ClusterError::NoMaximaFound {
            n_cells: cells.len(),
        }),
        [only] => {
            let (second, _) = first_highest(
                cells
                    .iter()
                    .filter(|c| c.id != only.cell && c.energy > 0.0)
                    .map(|c| (c.id, c.energy)),
            )
            .ok_or(ClusterError::NoSecondSeed { seed: only.cell })?;
            Ok(SeedPair {
                first: only.cell,
                second,
            })
        }
        [a, b] => Ok(SeedPair {
            first: a.cell,
            second: b.cell,
        }),
        _ => {
            let (first, _) = first_highest(maxima.iter().map(|m| (m.cell, m.energy)))
                .ok_or(ClusterError::NoMaximaFound {
                    n_cells: cells.len(),
                })?;
            let (second, _) = first_highest(
                maxima
                    .iter()
                    .filter(|m| m.cell != first)
                    .map(|m| (m.cell, m.energy)),
            )
            .ok_or(ClusterError::NoSecondSeed { seed: first })?;
            Ok(SeedPair { first, second })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::patch;

    fn max(cell: CellId, energy: f64) -> LocalMaximum {
        LocalMaximum { cell, energy }
    }

    #[test]
    fn single_maximum_rescans_the_whole_cluster() {
        let p = patch(0, &[(0, 0, 5.0), (0, 1, 3.0), (1, 1, 2.0)]);
        let cells = p.resolve();
        let seeds = select_dominant_pair(&[max(p.id(0, 0), 5.0)], &cells).expect("two seeds");
        assert_eq!(seeds.first, p.id(0, 0));
        assert_eq!(seeds.second, p.id(0, 1));
    }

    #[test]
    fn single_maximum_rescan_skips_non_positive_cells() {
        let p = patch(0, &[(0, 0, 5.0), (0, 1, 0.0), (1, 1, -1.0)]);
        let cells = p.resolve();
        let err = select_dominant_pair(&[max(p.id(0, 0), 5.0)], &cells).unwrap_err();
        assert_eq!(err, ClusterError::NoSecondSeed { seed: p.id(0, 0) });
    }

    #[test]
    fn single_cell_cluster_has_no_second_seed() {
        let p = patch(0, &[(7, 7, 4.0)]);
        let cells = p.resolve();
        let err = select_dominant_pair(&[max(p.id(7, 7), 4.0)], &cells).unwrap_err();
        assert!(err.is_missing_maximum());
    }

    #[test]
    fn two_maxima_keep_discovery_order() {
        let p = patch(0, &[(0, 0, 2.0), (0, 5, 9.0)]);
        let cells = p.resolve();
        let maxima = [max(p.id(0, 0), 2.0), max(p.id(0, 5), 9.0)];
        let seeds = select_dominant_pair(&maxima, &cells).expect("two seeds");
        assert_eq!(seeds.first, p.id(0, 0));
        assert_eq!(seeds.second, p.id(0, 5));
    }

    #[test]
    fn many_maxima_pick_the_two_highest_first_encountered() {
        let p = patch(0, &[(0, 0, 2.0), (0, 4, 7.0), (0, 8, 5.0), (0, 12, 7.0)]);
        let cells = p.resolve();
        let maxima = [
            max(p.id(0, 0), 2.0),
            max(p.id(0, 4), 7.0),
            max(p.id(0, 8), 5.0),
            max(p.id(0, 12), 7.0),
        ];
        let seeds = select_dominant_pair(&maxima, &cells).expect("two seeds");
        assert_eq!(seeds.first, p.id(0, 4));
        assert_eq!(seeds.second, p.id(0, 12));
    }

    #[test]
    fn no_maxima_is_reported() {
        let p = patch(0, &[(0, 0, 1.0), (0, 1, 1.0)]);
        let err = select_dominant_pair(&[], &p.resolve()).unwrap_err();
        assert_eq!(err, ClusterError::NoMaximaFound { n_cells: 2 });
    }
}
