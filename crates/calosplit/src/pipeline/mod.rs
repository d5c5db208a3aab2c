//! Event-level decomposition pipeline.
//!
//! This module is the glue layer that wires the splitter stages together:
//! selection gates -> local maxima -> dominant pair -> split -> momenta ->
//! mass window. Algorithmic primitives live in `crate::splitter` and
//! `crate::kinematics`; this layer owns call order, per-cluster failure
//! isolation and sink routing.

mod result;
mod run;

pub use result::{
    ClusterOutcome, ClusterStatus, EventReport, MaximaMultiplicity, PairReconstruction,
    StatusKind,
};
pub use run::{Decomposition, EventContext};

pub(crate) use run::{decompose_cluster, evaluate_cluster, process_event};
