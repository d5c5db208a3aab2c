//! Output routing of cluster outcomes by origin category.

use std::collections::BTreeMap;

use crate::mass::MassClass;
use crate::pipeline::{ClusterOutcome, MaximaMultiplicity, StatusKind};
use crate::truth::OriginCategory;

/// Consumer of per-cluster outcomes.
///
/// The pipeline calls [`ResultSink::record`] from a single thread, in
/// cluster order: once with [`OriginCategory::Inclusive`] and once more
/// with the truth category when the cluster has one.
pub trait ResultSink {
    fn record(&mut self, category: OriginCategory, outcome: &ClusterOutcome);
}

/// Per-category counters.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CategoryCounts {
    /// Clusters recorded, whatever their status.
    pub n_clusters: usize,
    /// Clusters per final status.
    pub by_status: BTreeMap<StatusKind, usize>,
    /// Clusters per maxima multiplicity, for clusters that reached maxima finding.
    pub by_multiplicity: BTreeMap<MaximaMultiplicity, usize>,
    /// Reconstructed pairs per matched mass window.
    pub by_mass_class: BTreeMap<MassClass, usize>,
    /// Reconstructed pairs per mass window, within each multiplicity bin.
    pub by_multiplicity_mass_class: BTreeMap<MaximaMultiplicity, BTreeMap<MassClass, usize>>,
    /// Number of computed masses.
    pub n_mass: usize,
    /// Sum of the computed masses.
    pub mass_sum: f64,
}

impl CategoryCounts {
    /// Mean of the computed masses.
    pub fn mean_mass(&self) -> Option<f64> {
        (self.n_mass > 0).then(|| self.mass_sum / self.n_mass as f64)
    }

    fn add(&mut self, outcome: &ClusterOutcome) {
        self.n_clusters += 1;
        *self.by_status.entry(outcome.status.kind()).or_default() += 1;
        let multiplicity = outcome.multiplicity();
        if let Some(m) = multiplicity {
            *self.by_multiplicity.entry(m).or_default() += 1;
        }
        if let Some(r) = &outcome.reconstruction {
            *self.by_mass_class.entry(r.class).or_default() += 1;
            if let Some(m) = multiplicity {
                *self
                    .by_multiplicity_mass_class
                    .entry(m)
                    .or_default()
                    .entry(r.class)
                    .or_default() += 1;
            }
            self.n_mass += 1;
            self.mass_sum += r.mass;
        }
    }
}

/// Reference sink: counts per category.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CategoryTally {
    categories: BTreeMap<OriginCategory, CategoryCounts>,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of `category`, if anything was recorded there.
    pub fn get(&self, category: OriginCategory) -> Option<&CategoryCounts> {
        self.categories.get(&category)
    }

    /// Categories with at least one record, in [`OriginCategory`] order.
    pub fn iter(&self) -> impl Iterator<Item = (OriginCategory, &CategoryCounts)> {
        self.categories.iter().map(|(k, v)| (*k, v))
    }
}

impl ResultSink for CategoryTally {
    fn record(&mut self, category: OriginCategory, outcome: &ClusterOutcome) {
        self.categories.entry(category).or_default().add(outcome);
    }
}
