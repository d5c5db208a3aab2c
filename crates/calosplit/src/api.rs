//! High-level decomposition API.
//!
//! [`Decomposer`] is the primary entry point. It holds the detector
//! geometry, the recalibration table and a [`DecomposeConfig`], and runs
//! single clusters or whole events.

use nalgebra::Point3;

use crate::calib::{AmplitudeSource, RecalibrationMap};
use crate::cluster::{Cluster, ClusterCells};
use crate::config::DecomposeConfig;
use crate::error::ClusterError;
use crate::event::{CaloEvent, EventFile};
use crate::geometry::{self, CellGeometry, CellId, ModuleGridGeometry};
use crate::pipeline::{self, ClusterOutcome, Decomposition, EventContext, EventReport};
use crate::sink::ResultSink;
use crate::splitter::{find_local_maxima, LocalMaximum};
use crate::truth::{TagTruthClassifier, TruthClassifier};

/// Primary decomposition interface.
///
/// Create once per detector setup, then feed events or clusters.
///
/// # Examples
///
/// ```
/// use calosplit::{CaloEvent, CategoryTally, Cluster, Decomposer, ModuleGridGeometry};
///
/// let decomposer = Decomposer::new(ModuleGridGeometry::default());
/// let event = CaloEvent {
///     cells: [(0, 5.0), (1, 3.0), (4, 4.0), (5, 1.0)].into_iter().collect(),
///     clusters: vec![Cluster::new(vec![0, 1, 4, 5], 13.0, 0.4)],
///     vertex: None,
/// };
/// let mut tally = CategoryTally::new();
/// let report = decomposer.process_event(&event, &mut tally);
/// assert_eq!(report.clusters.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Decomposer<G: CellGeometry = ModuleGridGeometry> {
    geometry: G,
    recalibration: RecalibrationMap,
    config: DecomposeConfig,
}

impl<G: CellGeometry> Decomposer<G> {
    /// Decomposer with default configuration and no recalibration.
    pub fn new(geometry: G) -> Self {
        Self::with_config(geometry, DecomposeConfig::default())
    }

    /// Create with full config control.
    pub fn with_config(geometry: G, config: DecomposeConfig) -> Self {
        Self {
            geometry,
            recalibration: RecalibrationMap::default(),
            config,
        }
    }

    /// Apply `table` to the raw amplitudes of every processed event.
    pub fn with_recalibration(mut self, table: RecalibrationMap) -> Self {
        self.recalibration = table;
        self
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn recalibration(&self) -> &RecalibrationMap {
        &self.recalibration
    }

    /// Access the current configuration.
    pub fn config(&self) -> &DecomposeConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut DecomposeConfig {
        &mut self.config
    }

    /// Neighbor test on the decomposer's geometry.
    pub fn are_neighbors(&self, a: CellId, b: CellId) -> bool {
        geometry::are_neighbors(&self.geometry, a, b)
    }

    fn context<'a>(
        &'a self,
        amplitudes: &'a dyn AmplitudeSource,
        vertex: Option<&Point3<f64>>,
        truth: Option<&'a dyn TruthClassifier>,
    ) -> EventContext<'a> {
        EventContext {
            geometry: &self.geometry,
            amplitudes,
            vertex: vertex.copied(),
            truth,
        }
    }

    /// Local maxima of one cluster, in cluster order.
    pub fn find_maxima(
        &self,
        cluster: &Cluster,
        amplitudes: &dyn AmplitudeSource,
    ) -> Result<Vec<LocalMaximum>, ClusterError> {
        let cells = ClusterCells::resolve(&cluster.cells, &self.geometry, amplitudes)?;
        Ok(find_local_maxima(&cells, &self.config.local_maxima))
    }

    /// Decompose one cluster, ignoring the selection gates.
    pub fn decompose(
        &self,
        cluster: &Cluster,
        amplitudes: &dyn AmplitudeSource,
        vertex: Option<&Point3<f64>>,
    ) -> Result<Decomposition, ClusterError> {
        let ctx = self.context(amplitudes, vertex, None);
        pipeline::decompose_cluster(cluster, &ctx, &self.config)
    }

    /// Gate and decompose one cluster, recording how far it got.
    pub fn evaluate_cluster(
        &self,
        cluster: &Cluster,
        amplitudes: &dyn AmplitudeSource,
        vertex: Option<&Point3<f64>>,
    ) -> ClusterOutcome {
        let ctx = self.context(amplitudes, vertex, None);
        pipeline::evaluate_cluster(0, cluster, &ctx, &self.config)
    }

    /// Process a cluster list with explicit collaborators.
    pub fn process_clusters(
        &self,
        clusters: &[Cluster],
        amplitudes: &dyn AmplitudeSource,
        vertex: Option<&Point3<f64>>,
        truth: Option<&dyn TruthClassifier>,
        sink: &mut dyn ResultSink,
    ) -> EventReport {
        let ctx = self.context(amplitudes, vertex, truth);
        pipeline::process_event(clusters, &ctx, &self.config, sink)
    }

    /// Process one event: recalibrate its cells, decompose every cluster and
    /// route outcomes into `sink` using the clusters' own truth tags.
    pub fn process_event(&self, event: &CaloEvent, sink: &mut dyn ResultSink) -> EventReport {
        let amplitudes = event.cells.recalibrated(&self.recalibration);
        let vertex = event.vertex_point();
        let truth = TagTruthClassifier;
        self.process_clusters(
            &event.clusters,
            &amplitudes,
            vertex.as_ref(),
            Some(&truth),
            sink,
        )
    }
}

impl Decomposer<ModuleGridGeometry> {
    /// Decomposer for the geometry and recalibration described by an event file.
    pub fn from_event_file(
        file: &EventFile,
        config: DecomposeConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        let geometry = file.build_geometry()?;
        Ok(Self::with_config(geometry, config).with_recalibration(file.recalibration.clone()))
    }
}
