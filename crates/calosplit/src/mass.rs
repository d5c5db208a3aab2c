//! Invariant-mass windows for conversion / pi0 / eta tagging.

/// Half-open mass interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MassWindow {
    /// Inclusive lower edge.
    pub min: f64,
    /// Exclusive upper edge.
    pub max: f64,
}

impl MassWindow {
    /// Window `[min, max)`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `mass` lies in `[min, max)`.
    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.min && mass < self.max
    }

    fn validate(&self, name: &str) -> Result<(), String> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(format!(
                "{} window must be finite with min <= max (got [{}, {}))",
                name, self.min, self.max
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for MassWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} <= m < {:.3}", self.min, self.max)
    }
}

/// Mass hypothesis matched by a pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MassClass {
    /// Photon conversion (near-zero mass).
    Conversion,
    /// Neutral pion.
    Pion,
    /// Eta meson.
    Eta,
    /// No window matched.
    Unmatched,
}

/// Mass windows, evaluated conversion first, then pion, then eta.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MassWindows {
    /// Photon conversion window, matched first.
    pub conversion: MassWindow,
    /// Neutral pion window.
    pub pion: MassWindow,
    /// Eta window.
    pub eta: MassWindow,
}

impl Default for MassWindows {
    fn default() -> Self {
        Self {
            conversion: MassWindow::new(0.0, 0.05),
            pion: MassWindow::new(0.08, 0.20),
            eta: MassWindow::new(0.4, 0.6),
        }
    }
}

impl MassWindows {
    /// First window containing `mass`, in priority order.
    pub fn classify(&self, mass: f64) -> MassClass {
        if self.conversion.contains(mass) {
            MassClass::Conversion
        } else if self.pion.contains(mass) {
            MassClass::Pion
        } else if self.eta.contains(mass) {
            MassClass::Eta
        } else {
            MassClass::Unmatched
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        self.conversion.validate("conversion")?;
        self.pion.validate("pion")?;
        self.eta.validate("eta")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_windows_classify_typical_masses() {
        let w = MassWindows::default();
        assert_eq!(w.classify(0.01), MassClass::Conversion);
        assert_eq!(w.classify(0.135), MassClass::Pion);
        assert_eq!(w.classify(0.548), MassClass::Eta);
        assert_eq!(w.classify(0.3), MassClass::Unmatched);
        assert_eq!(w.classify(0.065), MassClass::Unmatched);
    }

    #[test]
    fn windows_are_half_open() {
        let w = MassWindows::default();
        assert_eq!(w.classify(0.0), MassClass::Conversion);
        assert_eq!(w.classify(0.05), MassClass::Unmatched);
        assert_eq!(w.classify(0.08), MassClass::Pion);
        assert_eq!(w.classify(0.20), MassClass::Unmatched);
        assert_eq!(w.classify(0.6), MassClass::Unmatched);
    }

    #[test]
    fn overlapping_windows_resolve_by_priority() {
        let w = MassWindows {
            conversion: MassWindow::new(0.0, 0.1),
            pion: MassWindow::new(0.05, 0.2),
            eta: MassWindow::new(0.15, 0.6),
        };
        assert_eq!(w.classify(0.07), MassClass::Conversion);
        assert_eq!(w.classify(0.17), MassClass::Pion);
        assert_eq!(w.classify(0.25), MassClass::Eta);
    }

    #[test]
    fn invalid_window_fails_validation() {
        let w = MassWindows {
            pion: MassWindow::new(0.2, 0.1),
            ..Default::default()
        };
        let err = w.validate().expect_err("expected error");
        assert!(err.contains("pion"));
    }
}
