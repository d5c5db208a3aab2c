//! Per-cluster orchestrator: gates → maxima → seeds → split → mass.

use nalgebra::Point3;

use crate::calib::AmplitudeSource;
use crate::cluster::{Cluster, ClusterCells};
use crate::config::DecomposeConfig;
use crate::error::ClusterError;
use crate::geometry::CellGeometry;
use crate::kinematics::{momentum_from_cell, momentum_from_energy, FourMomentum};
use crate::sink::ResultSink;
use crate::splitter::{
    find_local_maxima, select_dominant_pair, split_energy, LocalMaximum, SubCluster,
};
use crate::truth::{OriginCategory, TruthClassifier};

use super::result::{ClusterOutcome, ClusterStatus, EventReport, PairReconstruction};

/// Read-only collaborators shared by every cluster of one event.
#[derive(Clone, Copy)]
pub struct EventContext<'a> {
    /// Cell layout used for adjacency and directions.
    pub geometry: &'a dyn CellGeometry,
    /// Calibrated amplitudes of the event.
    pub amplitudes: &'a dyn AmplitudeSource,
    /// Event vertex; the global origin when absent.
    pub vertex: Option<Point3<f64>>,
    /// Origin classifier; outcomes go to `Inclusive` only when absent.
    pub truth: Option<&'a dyn TruthClassifier>,
}

impl<'a> EventContext<'a> {
    /// Context without vertex or truth.
    pub fn new(geometry: &'a dyn CellGeometry, amplitudes: &'a dyn AmplitudeSource) -> Self {
        Self {
            geometry,
            amplitudes,
            vertex: None,
            truth: None,
        }
    }
}

/// Full decomposition of one cluster.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Decomposition {
    pub maxima: Vec<LocalMaximum>,
    pub pair: PairReconstruction,
}

/// Momentum of one sub-cluster.
///
/// Negative cells can drag a basin sum to zero or below; the seed cell's
/// own amplitude is used then, so the pair mass squared stays non-negative.
fn sub_cluster_momentum(
    ctx: &EventContext<'_>,
    sub: &SubCluster,
) -> Result<FourMomentum, ClusterError> {
    let vertex = ctx.vertex.as_ref();
    if sub.energy > 0.0 {
        return momentum_from_energy(ctx.geometry, sub.seed, sub.energy, vertex);
    }
    let seed_energy = ctx.amplitudes.calibrated_amplitude(sub.seed);
    tracing::debug!(
        "sub-cluster of seed {} has energy {:.3}, using seed amplitude {:.3}",
        sub.seed,
        sub.energy,
        seed_energy
    );
    if !seed_energy.is_finite() || seed_energy <= 0.0 {
        return Err(ClusterError::NonPositiveEnergy { cell: sub.seed });
    }
    momentum_from_cell(ctx.geometry, ctx.amplitudes, sub.seed, vertex)
}

fn reconstruct_pair(
    cells: &ClusterCells,
    maxima: &[LocalMaximum],
    ctx: &EventContext<'_>,
    config: &DecomposeConfig,
) -> Result<PairReconstruction, ClusterError> {
    let seeds = select_dominant_pair(maxima, cells)?;
    let split = split_energy(cells, seeds)?;

    let first_momentum = sub_cluster_momentum(ctx, &split.first)?;
    let second_momentum = sub_cluster_momentum(ctx, &split.second)?;
    let mass = first_momentum.invariant_mass(&second_momentum);
    let class = config.mass_windows.classify(mass);

    tracing::debug!(
        "pair seeds {}/{}: E1={:.3} E2={:.3} (unassigned {}) m={:.4} -> {:?}",
        seeds.first,
        seeds.second,
        split.first.energy,
        split.second.energy,
        split.n_unassigned,
        mass,
        class
    );

    Ok(PairReconstruction {
        seeds,
        first: split.first,
        second: split.second,
        n_unassigned: split.n_unassigned,
        first_momentum,
        second_momentum,
        mass,
        class,
    })
}

/// Decompose a cluster without applying selection gates.
pub(crate) fn decompose_cluster(
    cluster: &Cluster,
    ctx: &EventContext<'_>,
    config: &DecomposeConfig,
) -> Result<Decomposition, ClusterError> {
    let cells = ClusterCells::resolve(&cluster.cells, ctx.geometry, ctx.amplitudes)?;
    let maxima = find_local_maxima(&cells, &config.local_maxima);
    if maxima.is_empty() {
        return Err(ClusterError::NoMaximaFound {
            n_cells: cells.len(),
        });
    }
    let pair = reconstruct_pair(&cells, &maxima, ctx, config)?;
    Ok(Decomposition { maxima, pair })
}

fn log_failure(index: usize, error: &ClusterError) {
    if error.is_missing_maximum() {
        tracing::debug!("cluster {}: skipped, {}", index, error);
    } else {
        tracing::warn!("cluster {}: decomposition failed: {}", index, error);
    }
}

/// Run every stage on one cluster and record how far it got.
pub(crate) fn evaluate_cluster(
    index: usize,
    cluster: &Cluster,
    ctx: &EventContext<'_>,
    config: &DecomposeConfig,
) -> ClusterOutcome {
    let origin = if config.use_truth {
        ctx.truth.and_then(|t| t.classify(cluster))
    } else {
        None
    };
    let mut outcome = ClusterOutcome {
        index,
        energy: cluster.energy,
        m02: cluster.m02,
        n_cells: cluster.n_cells(),
        origin,
        n_maxima: None,
        maxima: Vec::new(),
        status: ClusterStatus::Reconstructed,
        reconstruction: None,
    };

    if let Err(reason) = config.selection.check(cluster) {
        tracing::debug!("cluster {}: rejected ({:?})", index, reason);
        outcome.status = ClusterStatus::Rejected { reason };
        return outcome;
    }

    let cells = match ClusterCells::resolve(&cluster.cells, ctx.geometry, ctx.amplitudes) {
        Ok(cells) => cells,
        Err(error) => {
            log_failure(index, &error);
            outcome.status = ClusterStatus::Failed { error };
            return outcome;
        }
    };

    let maxima = find_local_maxima(&cells, &config.local_maxima);
    outcome.n_maxima = Some(maxima.len());
    outcome.maxima = maxima;

    if outcome.maxima.is_empty() {
        let error = ClusterError::NoMaximaFound {
            n_cells: cells.len(),
        };
        log_failure(index, &error);
        outcome.status = ClusterStatus::Failed { error };
        return outcome;
    }

    if !config.selection.is_wide(cluster) {
        tracing::debug!(
            "cluster {}: m02 {:.3} below cut, {} maxima",
            index,
            cluster.m02,
            outcome.maxima.len()
        );
        outcome.status = ClusterStatus::NarrowShower;
        return outcome;
    }

    match reconstruct_pair(&cells, &outcome.maxima, ctx, config) {
        Ok(pair) => {
            outcome.reconstruction = Some(pair);
            outcome.status = ClusterStatus::Reconstructed;
        }
        Err(error) => {
            log_failure(index, &error);
            outcome.status = ClusterStatus::Failed { error };
        }
    }
    outcome
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    clusters: &[Cluster],
    ctx: &EventContext<'_>,
    config: &DecomposeConfig,
) -> Vec<ClusterOutcome> {
    use rayon::prelude::*;

    clusters
        .par_iter()
        .enumerate()
        .map(|(i, c)| evaluate_cluster(i, c, ctx, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    clusters: &[Cluster],
    ctx: &EventContext<'_>,
    config: &DecomposeConfig,
) -> Vec<ClusterOutcome> {
    clusters
        .iter()
        .enumerate()
        .map(|(i, c)| evaluate_cluster(i, c, ctx, config))
        .collect()
}

/// Evaluate every cluster, then feed the sink in cluster order.
pub(crate) fn process_event(
    clusters: &[Cluster],
    ctx: &EventContext<'_>,
    config: &DecomposeConfig,
    sink: &mut dyn ResultSink,
) -> EventReport {
    let outcomes = evaluate_all(clusters, ctx, config);

    for outcome in &outcomes {
        sink.record(OriginCategory::Inclusive, outcome);
        if let Some(origin) = outcome.origin {
            sink.record(origin, outcome);
        }
    }

    let report = EventReport { clusters: outcomes };
    tracing::debug!(
        "event: {} clusters, {} reconstructed",
        report.clusters.len(),
        report.reconstructed().count()
    );
    report
}
