//! Closed-form peak shapes rendering one Liouville pathway into a 2D array.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::ComplexGrid;
use twod_core::FrequencyAxis;

use crate::pathway::{LiouvillePathway, PathwayKind};

/// Peak profile used by the mock calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineShape {
    /// `exp(-((w - c) / width)^2)`.
    #[default]
    Gaussian,
    /// `deph / ((w - c)^2 + deph^2)`.
    Lorentzian,
}

impl FromStr for LineShape {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gaussian" => Ok(LineShape::Gaussian),
            "Lorentzian" => Ok(LineShape::Lorentzian),
            other => Err(TwodError::UnknownShape(
                ErrorInfo::new("unknown-shape", "unknown line shape")
                    .with_context("shape", other)
                    .with_hint("use Gaussian or Lorentzian"),
            )),
        }
    }
}

impl fmt::Display for LineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineShape::Gaussian => f.write_str("Gaussian"),
            LineShape::Lorentzian => f.write_str("Lorentzian"),
        }
    }
}

/// Width and dephasing parameters along omega_1 (`x`) and omega_3 (`y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakParameters {
    /// Gaussian width along omega_1.
    pub width_x: f64,
    /// Gaussian width along omega_3.
    pub width_y: f64,
    /// Lorentzian dephasing along omega_1.
    pub deph_x: f64,
    /// Lorentzian dephasing along omega_3.
    pub deph_y: f64,
}

impl PeakParameters {
    /// Same width and dephasing on both axes.
    pub fn uniform(width: f64, deph: f64) -> Self {
        Self {
            width_x: width,
            width_y: width,
            deph_x: deph,
            deph_y: deph,
        }
    }

    /// Parameters of `pathway`: entries 1 and 3 of its widths and dephasings
    /// when present and non-negative, the defaults in `self` otherwise.
    pub fn resolve(&self, pathway: &LiouvillePathway) -> Self {
        let pick = |values: &[f64], idx: usize, default: f64| match values.get(idx) {
            Some(value) if *value >= 0.0 => *value,
            _ => default,
        };
        Self {
            width_x: pick(&pathway.widths, 1, self.width_x),
            width_y: pick(&pathway.widths, 3, self.width_y),
            deph_x: pick(&pathway.dephs, 1, self.deph_x),
            deph_y: pick(&pathway.dephs, 3, self.deph_y),
        }
    }
}

fn profile(shape: LineShape, offset: f64, width: f64, deph: f64) -> f64 {
    match shape {
        LineShape::Gaussian => (-(offset / width).powi(2)).exp(),
        LineShape::Lorentzian => deph / (offset * offset + deph * deph),
    }
}

/// Renders `pathway` over the `oa1 x oa3` grid.
///
/// The peak sits at the first interval frequency along omega_1 and at the
/// last coherence frequency along omega_3. Rephasing pathways are evaluated
/// at `-omega_1`.
pub fn render_pathway(
    pathway: &LiouvillePathway,
    shape: LineShape,
    oa1: &FrequencyAxis,
    oa3: &FrequencyAxis,
    defaults: &PeakParameters,
    all_positive: bool,
) -> Result<ComplexGrid, TwodError> {
    let (cen1, cen3) = pathway.peak_centres()?;
    let params = defaults.resolve(pathway);
    let pref = if all_positive {
        pathway.pref.norm().into()
    } else {
        pathway.pref
    };
    let sign = match pathway.pathway_type {
        PathwayKind::Rephasing => -1.0,
        PathwayKind::NonRephasing => 1.0,
    };
    let fx: Vec<f64> = oa1
        .data()
        .into_iter()
        .map(|o1| profile(shape, sign * o1 - cen1, params.width_x, params.deph_x))
        .collect();
    let fy: Vec<f64> = oa3
        .data()
        .into_iter()
        .map(|o3| profile(shape, o3 - cen3, params.width_y, params.deph_y))
        .collect();
    Ok(ComplexGrid::from_shape_fn((fx.len(), fy.len()), |(i1, i3)| {
        pref * (fx[i1] * fy[i3])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twod_core::Complex64;

    #[test]
    fn negative_entries_fall_back_to_defaults() {
        let defaults = PeakParameters::uniform(1.0, 2.0);
        let pathway = LiouvillePathway::new(PathwayKind::Rephasing, vec![0.0, 0.0, 0.0], Complex64::new(1.0, 0.0))
            .with_widths(vec![-1.0, 5.0, -1.0, -1.0])
            .with_dephs(vec![-1.0, -1.0, -1.0, 7.0]);
        let params = defaults.resolve(&pathway);
        assert_eq!(params.width_x, 5.0);
        assert_eq!(params.width_y, 1.0);
        assert_eq!(params.deph_x, 2.0);
        assert_eq!(params.deph_y, 7.0);
    }

    #[test]
    fn short_parameter_lists_use_defaults() {
        let defaults = PeakParameters::uniform(3.0, 4.0);
        let pathway = LiouvillePathway::new(PathwayKind::NonRephasing, vec![0.0, 0.0, 0.0], Complex64::new(1.0, 0.0))
            .with_widths(vec![-1.0, 6.0])
            .with_dephs(Vec::new());
        let params = defaults.resolve(&pathway);
        assert_eq!(params.width_x, 6.0);
        assert_eq!(params.width_y, 3.0);
        assert_eq!(params.deph_y, 4.0);
    }
}
