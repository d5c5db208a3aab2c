//! Monte-Carlo truth origin categories used to route results.

use std::ops::BitOr;

use crate::cluster::Cluster;

/// Bit set of generator-level truth flags attached to a cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OriginTag(pub u32);

impl OriginTag {
    /// Deposit produced by a photon.
    pub const PHOTON: Self = Self(1 << 0);
    /// The photon converted into an e+e- pair before the calorimeter.
    pub const CONVERSION: Self = Self(1 << 1);
    /// Decay product of a neutral pion.
    pub const PI0: Self = Self(1 << 2);
    /// Decay product of an eta meson.
    pub const ETA: Self = Self(1 << 3);
    /// Deposit produced by an electron or positron.
    pub const ELECTRON: Self = Self(1 << 4);

    /// Returns `true` if every bit of `flag` is set.
    pub fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl BitOr for OriginTag {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Output routing key.
///
/// `Inclusive` receives every cluster; the remaining keys are filled only
/// when truth information classifies the cluster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OriginCategory {
    Inclusive,
    Photon,
    Conversion,
    Pion,
    Eta,
    Electron,
    Hadron,
}

impl OriginCategory {
    /// All categories, inclusive first.
    pub const ALL: [Self; 7] = [
        Self::Inclusive,
        Self::Photon,
        Self::Conversion,
        Self::Pion,
        Self::Eta,
        Self::Electron,
        Self::Hadron,
    ];

    /// Classify truth flags.
    ///
    /// Meson parentage wins over the photon flags, and anything that is
    /// neither a photon nor an electron counts as a hadron.
    pub fn from_tag(tag: OriginTag) -> Self {
        if tag.contains(OriginTag::PI0) {
            Self::Pion
        } else if tag.contains(OriginTag::ETA) {
            Self::Eta
        } else if tag.contains(OriginTag::PHOTON) {
            if tag.contains(OriginTag::CONVERSION) {
                Self::Conversion
            } else {
                Self::Photon
            }
        } else if tag.contains(OriginTag::ELECTRON) {
            Self::Electron
        } else {
            Self::Hadron
        }
    }

    /// Short display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Inclusive => "inclusive",
            Self::Photon => "photon",
            Self::Conversion => "conversion",
            Self::Pion => "pi0",
            Self::Eta => "eta",
            Self::Electron => "electron",
            Self::Hadron => "hadron",
        }
    }
}

/// Maps a cluster to its truth origin.
pub trait TruthClassifier: Sync {
    /// Category of `cluster`, or `None` when no truth is attached.
    fn classify(&self, cluster: &Cluster) -> Option<OriginCategory>;
}

/// Classifier reading the [`OriginTag`] carried by each cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagTruthClassifier;

impl TruthClassifier for TagTruthClassifier {
    fn classify(&self, cluster: &Cluster) -> Option<OriginCategory> {
        cluster.truth.map(OriginCategory::from_tag)
    }
}
