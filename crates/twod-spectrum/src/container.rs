//! Collections of spectra keyed by waiting time.

use serde::{Deserialize, Serialize};
use twod_core::errors::{ErrorInfo, TwodError};

use crate::spectrum::TwoDSpectrum;

/// How a container was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerStatus {
    /// Every requested spectrum was calculated.
    #[default]
    Complete,
    /// The pathway engine was unavailable; the container is empty.
    EngineUnavailable,
}

/// Spectra ordered by t2. Inserting a spectrum at an existing t2 replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumContainer {
    spectra: Vec<TwoDSpectrum>,
    status: ContainerStatus,
}

impl SpectrumContainer {
    /// Empty, complete container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty container marked as produced without a pathway engine.
    pub fn unavailable() -> Self {
        Self {
            spectra: Vec::new(),
            status: ContainerStatus::EngineUnavailable,
        }
    }

    /// Production status.
    pub fn status(&self) -> ContainerStatus {
        self.status
    }

    /// Inserts `spectrum` under its t2.
    pub fn set_spectrum(&mut self, spectrum: TwoDSpectrum) {
        let t2 = spectrum.t2();
        match self
            .spectra
            .binary_search_by(|existing| existing.t2().total_cmp(&t2))
        {
            Ok(idx) => self.spectra[idx] = spectrum,
            Err(idx) => self.spectra.insert(idx, spectrum),
        }
    }

    /// Spectrum stored at exactly `t2`.
    pub fn get_spectrum(&self, t2: f64) -> Result<&TwoDSpectrum, TwodError> {
        self.spectra
            .binary_search_by(|existing| existing.t2().total_cmp(&t2))
            .map(|idx| &self.spectra[idx])
            .map_err(|_| {
                TwodError::NoData(
                    ErrorInfo::new("no-spectrum", "no spectrum stored at this waiting time")
                        .with_context("t2", t2.to_string()),
                )
            })
    }

    /// Stored waiting times, ascending.
    pub fn t2_values(&self) -> Vec<f64> {
        self.spectra.iter().map(TwoDSpectrum::t2).collect()
    }

    /// Number of stored spectra.
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    /// Whether the container holds no spectra.
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Spectra in t2 order.
    pub fn iter(&self) -> impl Iterator<Item = &TwoDSpectrum> {
        self.spectra.iter()
    }
}

impl<'a> IntoIterator for &'a SpectrumContainer {
    type Item = &'a TwoDSpectrum;
    type IntoIter = std::slice::Iter<'a, TwoDSpectrum>;

    fn into_iter(self) -> Self::IntoIter {
        self.spectra.iter()
    }
}

impl FromIterator<TwoDSpectrum> for SpectrumContainer {
    fn from_iter<I: IntoIterator<Item = TwoDSpectrum>>(iter: I) -> Self {
        let mut container = Self::new();
        for spectrum in iter {
            container.set_spectrum(spectrum);
        }
        container
    }
}
