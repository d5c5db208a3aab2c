//! Decomposition configuration and input-selection gates.

use std::path::Path;

use crate::cluster::Cluster;
use crate::mass::MassWindows;
use crate::splitter::LocalMaximaConfig;

/// Why a cluster was not decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Total energy outside `[min_energy, max_energy]`.
    EnergyOutOfRange,
    /// Fewer cells than `min_cells`.
    TooFewCells,
}

/// Gates applied to clusters before decomposition.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClusterSelection {
    /// Minimum total cluster energy.
    pub min_energy: f64,
    /// Maximum total cluster energy.
    pub max_energy: f64,
    /// Minimum number of cells.
    pub min_cells: usize,
    /// Clusters narrower than this (m02) get a maxima count but no mass.
    pub m02_cut: f64,
}

impl Default for ClusterSelection {
    fn default() -> Self {
        Self {
            min_energy: 0.0,
            max_energy: 1000.0,
            min_cells: 4,
            m02_cut: 0.26,
        }
    }
}

impl ClusterSelection {
    /// Accept everything; handy for exercising the decomposition directly.
    pub fn permissive() -> Self {
        Self {
            min_energy: f64::NEG_INFINITY,
            max_energy: f64::INFINITY,
            min_cells: 0,
            m02_cut: f64::NEG_INFINITY,
        }
    }

    /// Energy and cell-count gates.
    pub fn check(&self, cluster: &Cluster) -> Result<(), RejectReason> {
        if !(cluster.energy >= self.min_energy && cluster.energy <= self.max_energy) {
            return Err(RejectReason::EnergyOutOfRange);
        }
        if cluster.n_cells() < self.min_cells {
            return Err(RejectReason::TooFewCells);
        }
        Ok(())
    }

    /// Shower-width gate.
    pub fn is_wide(&self, cluster: &Cluster) -> bool {
        cluster.m02 >= self.m02_cut
    }
}

/// Top-level decomposition configuration.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecomposeConfig {
    /// Input gates.
    pub selection: ClusterSelection,
    /// Local-maximum suppression.
    pub local_maxima: LocalMaximaConfig,
    /// Mass windows.
    pub mass_windows: MassWindows,
    /// Route outcomes into truth categories when a classifier is available.
    pub use_truth: bool,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            selection: ClusterSelection::default(),
            local_maxima: LocalMaximaConfig::default(),
            mass_windows: MassWindows::default(),
            use_truth: true,
        }
    }
}

impl DecomposeConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), String> {
        let s = &self.selection;
        if s.min_energy.is_nan() || s.max_energy.is_nan() || s.min_energy > s.max_energy {
            return Err(format!(
                "selection energy range is empty ([{}, {}])",
                s.min_energy, s.max_energy
            ));
        }
        if s.m02_cut.is_nan() {
            return Err("m02_cut must not be NaN".to_string());
        }
        let lm = &self.local_maxima;
        if !lm.min_seed_energy.is_finite() {
            return Err("min_seed_energy must be finite".to_string());
        }
        if !lm.local_max_cut.is_finite() || lm.local_max_cut < 0.0 {
            return Err("local_max_cut must be finite and >= 0".to_string());
        }
        self.mass_windows.validate()
    }
}

impl std::fmt::Display for DecomposeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = &self.selection;
        writeln!(f, "--- calosplit analysis cuts ---")?;
        writeln!(f, "cluster energy:   {} <= E <= {}", s.min_energy, s.max_energy)?;
        writeln!(f, "min cells:        {}", s.min_cells)?;
        writeln!(f, "m02 cut:          {:.3}", s.m02_cut)?;
        writeln!(f, "local max cut:    {:.3}", self.local_maxima.local_max_cut)?;
        writeln!(f, "min seed energy:  {:.3}", self.local_maxima.min_seed_energy)?;
        writeln!(f, "conv: {}", self.mass_windows.conversion)?;
        writeln!(f, "pi0 : {}", self.mass_windows.pion)?;
        writeln!(f, "eta : {}", self.mass_windows.eta)?;
        write!(f, "truth routing:    {}", if self.use_truth { "on" } else { "off" })
    }
}
