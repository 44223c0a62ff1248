//! Analytic Liouville pathway descriptors consumed by the mock calculator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::Complex64;

/// Rephasing or non-rephasing character of a pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathwayKind {
    /// `R`.
    #[serde(rename = "R")]
    Rephasing,
    /// `NR`.
    #[serde(rename = "NR")]
    NonRephasing,
}

impl FromStr for PathwayKind {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(PathwayKind::Rephasing),
            "NR" => Ok(PathwayKind::NonRephasing),
            other => Err(TwodError::UnknownPathwayType(
                ErrorInfo::new("unknown-pathway-type", "pathway type must be R or NR")
                    .with_context("pathway_type", other),
            )),
        }
    }
}

impl fmt::Display for PathwayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathwayKind::Rephasing => f.write_str("R"),
            PathwayKind::NonRephasing => f.write_str("NR"),
        }
    }
}

/// Immutable description of one Liouville pathway.
///
/// `widths` and `dephs` are indexed by interaction interval; negative
/// entries select the calculator defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LiouvillePathway {
    /// Rephasing character.
    pub pathway_type: PathwayKind,
    /// Number of light-matter interactions before detection.
    pub order: usize,
    /// Number of relaxation events.
    pub relax_order: usize,
    /// Centre frequency of every interval between events.
    pub frequency: Vec<f64>,
    /// Complex prefactor.
    pub pref: Complex64,
    /// Gaussian widths per interval.
    pub widths: Vec<f64>,
    /// Lorentzian dephasings per interval.
    pub dephs: Vec<f64>,
}

impl LiouvillePathway {
    /// Third-order pathway without relaxation and with default widths.
    pub fn new(pathway_type: PathwayKind, frequency: Vec<f64>, pref: Complex64) -> Self {
        Self {
            pathway_type,
            order: 3,
            relax_order: 0,
            frequency,
            pref,
            widths: vec![-1.0; 4],
            dephs: vec![-1.0; 4],
        }
    }

    /// Sets interaction and relaxation orders.
    pub fn with_orders(mut self, order: usize, relax_order: usize) -> Self {
        self.order = order;
        self.relax_order = relax_order;
        self
    }

    /// Sets per-interval Gaussian widths.
    pub fn with_widths(mut self, widths: Vec<f64>) -> Self {
        self.widths = widths;
        self
    }

    /// Sets per-interval Lorentzian dephasings.
    pub fn with_dephs(mut self, dephs: Vec<f64>) -> Self {
        self.dephs = dephs;
        self
    }

    /// Number of events `1 + order + relax_order`.
    pub fn event_count(&self) -> usize {
        1 + self.order + self.relax_order
    }

    /// Peak centres: the first interval frequency and the frequency of the
    /// last interval before detection.
    pub fn peak_centres(&self) -> Result<(f64, f64), TwodError> {
        let noe = self.event_count();
        let last = noe.checked_sub(2).filter(|idx| *idx < self.frequency.len());
        match (self.frequency.first(), last) {
            (Some(cen1), Some(idx)) => Ok((*cen1, self.frequency[idx])),
            _ => Err(TwodError::InvalidPathway(
                ErrorInfo::new("missing-frequencies", "pathway lists too few interval frequencies")
                    .with_context("events", noe.to_string())
                    .with_context("frequencies", self.frequency.len().to_string()),
            )),
        }
    }
}
