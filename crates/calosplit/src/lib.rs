//! calosplit: merged calorimeter cluster decomposition.
//!
//! When the two photons of a boosted neutral meson decay land close
//! together, their showers merge into one broad cluster. The stages here
//! take such a cluster apart:
//!
//! 1. **Gates** – cluster energy, cell count and shower width cuts.
//! 2. **Maxima** – order-independent local-maximum suppression over the
//!    8-connected cell grid, bridging side-by-side module pairs.
//! 3. **Seeds** – the two dominant cells that anchor the split.
//! 4. **Split** – downhill basin growth from each seed into two disjoint
//!    sub-clusters.
//! 5. **Mass** – massless four-momenta from the vertex to each seed, pair
//!    invariant mass and conversion / pi0 / eta window matching.
//!
//! # Public API
//! - [`Decomposer`] as the primary entry point
//! - [`DecomposeConfig`] for tuning
//! - collaborator traits ([`CellGeometry`], [`AmplitudeSource`],
//!   [`TruthClassifier`], [`ResultSink`]) with reference implementations
//! - result records and the `calosplit.event.v1` input schema
//!
//! With the `parallel` feature, clusters of one event are decomposed on the
//! rayon thread pool; sink records still arrive in cluster order.

mod api;
mod calib;
mod cluster;
mod config;
mod error;
mod event;
mod geometry;
mod kinematics;
mod mass;
mod pipeline;
mod sink;
mod splitter;
mod truth;

#[cfg(test)]
mod test_utils;

pub use api::Decomposer;
pub use calib::{AmplitudeSource, CaloCells, CellReading, Recalibrated, RecalibrationMap};
pub use cluster::{Cell, Cluster, ClusterCells};
pub use config::{ClusterSelection, DecomposeConfig, RejectReason};
pub use error::ClusterError;
pub use event::{CaloEvent, EventFile, EVENT_SCHEMA_V1};
pub use geometry::{
    are_neighbors, CellGeometry, CellId, CellIndex, ModuleGridGeometry, ModuleGridParams,
};
pub use kinematics::{momentum_from_cell, momentum_from_energy, FourMomentum};
pub use mass::{MassClass, MassWindow, MassWindows};
pub use pipeline::{
    ClusterOutcome, ClusterStatus, Decomposition, EventContext, EventReport, MaximaMultiplicity,
    PairReconstruction, StatusKind,
};
pub use sink::{CategoryCounts, CategoryTally, ResultSink};
pub use splitter::{
    find_local_maxima, select_dominant_pair, split_energy, LocalMaximaConfig, LocalMaximum,
    SeedPair, SplitResult, SubCluster,
};
pub use truth::{OriginCategory, OriginTag, TagTruthClassifier, TruthClassifier};
