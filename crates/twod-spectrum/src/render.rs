//! Plot-ready frames: the selected part of a spectrum over a window, with a
//! symmetric colour scale and contour levels. Drawing is left to the caller.

use std::str::FromStr;

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};

use crate::kind::DataKind;
use crate::spectrum::{window_indices, TwoDSpectrum};

/// Which combination of signals to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectrumType {
    /// Rephasing plus non-rephasing.
    Total,
    /// Rephasing only.
    Rephasing,
    /// Non-rephasing only.
    NonRephasing,
}

/// Which scalar part of the complex data to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectrumPart {
    /// Real part.
    Real,
    /// Imaginary part.
    Imaginary,
    /// Modulus.
    Abs,
}

impl FromStr for SpectrumType {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(SpectrumType::Total),
            "rephasing" => Ok(SpectrumType::Rephasing),
            "non-rephasing" | "nonrephasing" => Ok(SpectrumType::NonRephasing),
            other => Err(TwodError::InvalidDataType(
                ErrorInfo::new("unknown-spectrum-type", "undefined spectrum type")
                    .with_context("stype", other),
            )),
        }
    }
}

impl FromStr for SpectrumPart {
    type Err = TwodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "real" => Ok(SpectrumPart::Real),
            "imaginary" => Ok(SpectrumPart::Imaginary),
            "abs" => Ok(SpectrumPart::Abs),
            other => Err(TwodError::InvalidDataType(
                ErrorInfo::new("unknown-spectrum-part", "undefined part of the spectrum")
                    .with_context("spart", other),
            )),
        }
    }
}

fn default_vmin_ratio() -> f64 {
    0.5
}

fn default_npos_contours() -> usize {
    10
}

/// Options of [`TwoDSpectrum::plot_frame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// `[x_min, x_max, y_min, y_max]` in internal units.
    #[serde(default)]
    pub window: Option<[f64; 4]>,
    /// Upper end of the colour scale; the data maximum when absent.
    #[serde(default)]
    pub vmax: Option<f64>,
    /// Lower end of the scale as a fraction of `-vmax`.
    #[serde(default = "default_vmin_ratio")]
    pub vmin_ratio: f64,
    /// Number of contour intervals on each side of zero.
    #[serde(default = "default_npos_contours")]
    pub npos_contours: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            window: None,
            vmax: None,
            vmin_ratio: default_vmin_ratio(),
            npos_contours: default_npos_contours(),
        }
    }
}

/// Plot-ready slice of a spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    /// Values indexed `[i1, i3]`.
    pub values: Array2<f64>,
    /// omega_1 samples of the rows.
    pub x: Vec<f64>,
    /// omega_3 samples of the columns.
    pub y: Vec<f64>,
    /// Lower end of the colour scale.
    pub vmin: f64,
    /// Upper end of the colour scale.
    pub vmax: f64,
    /// Positive contour levels, ascending.
    pub positive_levels: Vec<f64>,
    /// Negative contour levels, ascending.
    pub negative_levels: Vec<f64>,
}

/// Symmetric colour scale: `vmin = -ratio * vmax` unless the data go lower,
/// in which case `vmax` mirrors the data minimum.
pub fn color_scale(values: &Array2<f64>, vmax: Option<f64>, vmin_ratio: f64) -> (f64, f64) {
    let mut vmax = vmax.unwrap_or_else(|| values.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    let mut vmin = values.iter().copied().fold(f64::INFINITY, f64::min);
    if vmin < -vmax * vmin_ratio {
        vmax = -vmin;
    } else {
        vmin = -vmax * vmin_ratio;
    }
    (vmin, vmax)
}

/// Contour levels `i * vmax / n` for `i = 1..n-1` and their negatives for
/// `i = n..2`.
pub fn contour_levels(vmax: f64, npos: usize) -> (Vec<f64>, Vec<f64>) {
    let n = npos as f64;
    let positive = (1..npos).map(|i| i as f64 * vmax / n).collect();
    let negative = (2..=npos).rev().map(|i| -(i as f64) * vmax / n).collect();
    (positive, negative)
}

impl TwoDSpectrum {
    /// Builds a plot frame of the selected signal combination and part.
    pub fn plot_frame(
        &self,
        stype: SpectrumType,
        spart: SpectrumPart,
        options: &PlotOptions,
    ) -> Result<PlotFrame, TwodError> {
        let (xaxis, yaxis) = self.axes()?;
        let complex = match stype {
            SpectrumType::Total => self.total()?,
            SpectrumType::Rephasing => self.part(DataKind::Reph)?,
            SpectrumType::NonRephasing => self.part(DataKind::Nonr)?,
        };
        let (rows, cols) = match options.window {
            Some(window) => (
                window_indices(xaxis, window[0], window[1], 0)?,
                window_indices(yaxis, window[2], window[3], 0)?,
            ),
            None => ((0, xaxis.length - 1), (0, yaxis.length - 1)),
        };
        let view = complex.slice(s![rows.0..=rows.1, cols.0..=cols.1]);
        let values = match spart {
            SpectrumPart::Real => view.mapv(|z| z.re),
            SpectrumPart::Imaginary => view.mapv(|z| z.im),
            SpectrumPart::Abs => view.mapv(|z| z.norm()),
        };
        let (vmin, vmax) = color_scale(&values, options.vmax, options.vmin_ratio);
        let (positive_levels, negative_levels) = contour_levels(vmax, options.npos_contours);
        let xdata = xaxis.data();
        let ydata = yaxis.data();
        Ok(PlotFrame {
            values,
            x: xdata[rows.0..=rows.1].to_vec(),
            y: ydata[cols.0..=cols.1].to_vec(),
            vmin,
            vmax,
            positive_levels,
            negative_levels,
        })
    }

    fn part(&self, kind: DataKind) -> Result<twod_core::ComplexGrid, TwodError> {
        self.data(kind).cloned().ok_or_else(|| {
            TwodError::NoData(
                ErrorInfo::new("missing-array", "requested part of the spectrum is empty")
                    .with_context("dtype", kind.label()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_exclude_zero_and_full_scale() {
        let (pos, neg) = contour_levels(10.0, 5);
        assert_eq!(pos, vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(neg, vec![-10.0, -8.0, -6.0, -4.0]);
    }

    #[test]
    fn deep_minimum_mirrors_the_scale() {
        let values = Array2::from_shape_vec((1, 3), vec![-4.0, 0.0, 2.0]).unwrap();
        assert_eq!(color_scale(&values, None, 0.5), (-4.0, 4.0));
        let shallow = Array2::from_shape_vec((1, 2), vec![-0.5, 2.0]).unwrap();
        assert_eq!(color_scale(&shallow, None, 0.5), (-1.0, 2.0));
    }
}
