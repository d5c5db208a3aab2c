//! Cluster decomposition primitives independent of orchestration.
//!
//! The `pipeline` module owns the call order (gates, maxima, seeds, split,
//! kinematics). This module provides the algorithmic building blocks.

mod maxima;
mod seeds;
mod split;

pub use maxima::{find_local_maxima, LocalMaximaConfig, LocalMaximum};
pub use seeds::{select_dominant_pair, SeedPair};
pub use split::{split_energy, SplitResult, SubCluster};
