use crate::config::RejectReason;
use crate::error::ClusterError;
use crate::kinematics::FourMomentum;
use crate::mass::MassClass;
use crate::splitter::{LocalMaximum, SeedPair, SubCluster};
use crate::truth::OriginCategory;

/// Local-maxima multiplicity bin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MaximaMultiplicity {
    One,
    Two,
    /// Three or more maxima.
    Many,
}

impl MaximaMultiplicity {
    /// Bin for `n` maxima; `None` when there are none.
    pub fn from_count(n: usize) -> Option<Self> {
        match n {
            0 => None,
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => Some(Self::Many),
        }
    }
}

/// How far a cluster got through the decomposition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClusterStatus {
    /// Failed an input gate; nothing was computed.
    Rejected { reason: RejectReason },
    /// Shower too narrow for a pair: maxima counted, mass not computed.
    NarrowShower,
    /// Pair mass computed.
    Reconstructed,
    /// Decomposition abandoned for this cluster.
    Failed { error: ClusterError },
}

/// Payload-free status key, used for tallies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Rejected,
    NarrowShower,
    Reconstructed,
    Failed,
}

impl ClusterStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Rejected { .. } => StatusKind::Rejected,
            Self::NarrowShower => StatusKind::NarrowShower,
            Self::Reconstructed => StatusKind::Reconstructed,
            Self::Failed { .. } => StatusKind::Failed,
        }
    }
}

/// Two-photon hypothesis built from a split cluster.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PairReconstruction {
    pub seeds: SeedPair,
    pub first: SubCluster,
    pub second: SubCluster,
    /// Cells attributed to neither sub-cluster.
    pub n_unassigned: usize,
    /// Massless momentum of the first sub-cluster, along its seed direction.
    pub first_momentum: FourMomentum,
    /// Massless momentum of the second sub-cluster.
    pub second_momentum: FourMomentum,
    /// Invariant mass of the pair.
    pub mass: f64,
    /// First matching mass window.
    pub class: MassClass,
}

impl PairReconstruction {
    /// Energy of the summed pair four-momentum.
    pub fn pair_energy(&self) -> f64 {
        (self.first_momentum + self.second_momentum).e
    }
}

/// Per-cluster result of event processing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClusterOutcome {
    /// Position of the cluster in the event's cluster list.
    pub index: usize,
    /// Reconstructed cluster energy (input value).
    pub energy: f64,
    pub m02: f64,
    pub n_cells: usize,
    /// Truth category, when truth routing is on and the cluster is classified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginCategory>,
    /// Local-maxima count; `None` when maxima finding did not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_maxima: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maxima: Vec<LocalMaximum>,
    #[serde(flatten)]
    pub status: ClusterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconstruction: Option<PairReconstruction>,
}

impl ClusterOutcome {
    /// Multiplicity bin of the maxima count.
    pub fn multiplicity(&self) -> Option<MaximaMultiplicity> {
        self.n_maxima.and_then(MaximaMultiplicity::from_count)
    }

    /// Pair mass, if one was computed.
    pub fn mass(&self) -> Option<f64> {
        self.reconstruction.as_ref().map(|r| r.mass)
    }

    /// Matched mass window, if a mass was computed.
    pub fn mass_class(&self) -> Option<MassClass> {
        self.reconstruction.as_ref().map(|r| r.class)
    }

    pub fn is_reconstructed(&self) -> bool {
        matches!(self.status, ClusterStatus::Reconstructed)
    }
}

/// Outcomes of every cluster of one event, in input order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventReport {
    pub clusters: Vec<ClusterOutcome>,
}

impl EventReport {
    /// Number of clusters with the given status.
    pub fn count(&self, kind: StatusKind) -> usize {
        self.clusters
            .iter()
            .filter(|c| c.status.kind() == kind)
            .count()
    }

    /// Reconstructed outcomes only.
    pub fn reconstructed(&self) -> impl Iterator<Item = &ClusterOutcome> {
        self.clusters.iter().filter(|c| c.is_reconstructed())
    }
}
