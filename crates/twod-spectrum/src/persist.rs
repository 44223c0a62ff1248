//! Persistence of spectra as JSON documents or compact binary payloads.
//!
//! The layout mirrors the classic group structure: a `spectrum` group with
//! `t2`/`keeps` attributes, the `reph2D`/`nonr2D` or `data` datasets and the
//! `xaxis`/`yaxis` metadata. Datasets are protected by a SHA-256 digest.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::ComplexGrid;
use twod_core::{AxisType, Complex64, EnergyUnits, FrequencyAxis, SchemaVersion};

use crate::kind::DataKind;
use crate::spectrum::TwoDSpectrum;

/// Schema written by this crate.
pub const SPECTRUM_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Complex 2D dataset stored as separate real and imaginary planes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    /// `(rows, cols)` of the dataset.
    pub shape: [usize; 2],
    /// Real parts in row-major order.
    pub re: Vec<f64>,
    /// Imaginary parts in row-major order.
    pub im: Vec<f64>,
}

/// Axis metadata in the units recorded in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRecord {
    /// First sample.
    pub start: f64,
    /// Number of samples.
    pub length: usize,
    /// Sample spacing.
    pub step: f64,
    /// Sampling convention.
    #[serde(default)]
    pub atype: AxisType,
    /// Start of the conjugate time axis.
    #[serde(default)]
    pub time_start: f64,
}

/// Attributes of the `spectrum` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumAttrs {
    /// Waiting time.
    pub t2: f64,
    /// `[keep_pathways, keep_stypes]` as 0/1 flags.
    pub keeps: [u8; 2],
}

/// The `spectrum` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumGroup {
    /// Group attributes.
    pub attrs: SpectrumAttrs,
    /// Selected data type.
    #[serde(default)]
    pub dtype: Option<DataKind>,
    /// Rephasing dataset.
    #[serde(rename = "reph2D", default)]
    pub reph2d: Option<GridRecord>,
    /// Non-rephasing dataset.
    #[serde(rename = "nonr2D", default)]
    pub nonr2d: Option<GridRecord>,
    /// Combined dataset.
    #[serde(default)]
    pub data: Option<GridRecord>,
    /// omega_1 axis.
    pub xaxis: AxisRecord,
    /// omega_3 axis.
    pub yaxis: AxisRecord,
}

/// Complete persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumFile {
    /// Schema of the document.
    pub schema_version: SchemaVersion,
    /// Units of the axis metadata.
    pub units: EnergyUnits,
    /// Spectrum group.
    pub spectrum: SpectrumGroup,
    /// Hex SHA-256 of the serialized spectrum group.
    pub digest: String,
}

fn serde_error(code: &str, err: impl ToString) -> TwodError {
    TwodError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn digest(group: &SpectrumGroup) -> Result<String, TwodError> {
    let json = serde_json::to_vec(group).map_err(|err| serde_error("serialize", err))?;
    let mut hasher = Sha256::new();
    hasher.update(json);
    Ok(format!("{:x}", hasher.finalize()))
}

fn grid_to_record(grid: &ComplexGrid) -> GridRecord {
    let (rows, cols) = grid.dim();
    GridRecord {
        shape: [rows, cols],
        re: grid.iter().map(|z| z.re).collect(),
        im: grid.iter().map(|z| z.im).collect(),
    }
}

fn record_to_grid(record: &GridRecord) -> Result<ComplexGrid, TwodError> {
    let [rows, cols] = record.shape;
    if record.re.len() != rows * cols || record.im.len() != rows * cols {
        return Err(TwodError::Serde(
            ErrorInfo::new("dataset-length", "dataset length disagrees with its shape")
                .with_context("shape", format!("{rows}x{cols}"))
                .with_context("re", record.re.len().to_string())
                .with_context("im", record.im.len().to_string()),
        ));
    }
    let values = record
        .re
        .iter()
        .zip(&record.im)
        .map(|(re, im)| Complex64::new(*re, *im))
        .collect();
    ComplexGrid::from_shape_vec((rows, cols), values).map_err(|err| serde_error("dataset-shape", err))
}

fn axis_to_record(axis: &FrequencyAxis, units: EnergyUnits) -> AxisRecord {
    AxisRecord {
        start: units.from_internal(axis.start),
        length: axis.length,
        step: units.from_internal(axis.step),
        atype: axis.atype,
        time_start: axis.time_start,
    }
}

fn record_to_axis(record: &AxisRecord, units: EnergyUnits) -> Result<FrequencyAxis, TwodError> {
    let mut axis = FrequencyAxis::new(
        units.to_internal(record.start),
        record.length,
        units.to_internal(record.step),
    )?;
    axis.atype = record.atype;
    axis.time_start = record.time_start;
    Ok(axis)
}

impl SpectrumFile {
    /// Captures `spectrum` with axis metadata expressed in `units`.
    ///
    /// Spectra keeping signal types store whichever of `reph2D`/`nonr2D`
    /// exist; the others store `data`.
    pub fn from_spectrum(spectrum: &TwoDSpectrum, units: EnergyUnits) -> Result<Self, TwodError> {
        let (xaxis, yaxis) = spectrum.axes()?;
        let (reph2d, nonr2d, data) = if spectrum.keep_stypes() {
            (
                spectrum.data(DataKind::Reph).map(grid_to_record),
                spectrum.data(DataKind::Nonr).map(grid_to_record),
                None,
            )
        } else {
            (None, None, spectrum.data(DataKind::Tot).map(grid_to_record))
        };
        let group = SpectrumGroup {
            attrs: SpectrumAttrs {
                t2: spectrum.t2(),
                keeps: [
                    u8::from(spectrum.keep_pathways()),
                    u8::from(spectrum.keep_stypes()),
                ],
            },
            dtype: spectrum.data_type(),
            reph2d,
            nonr2d,
            data,
            xaxis: axis_to_record(xaxis, units),
            yaxis: axis_to_record(yaxis, units),
        };
        let digest = digest(&group)?;
        Ok(Self {
            schema_version: SPECTRUM_SCHEMA,
            units,
            spectrum: group,
            digest,
        })
    }

    /// Verifies the document and rebuilds the spectrum. Axis metadata is
    /// converted from the recorded units to internal units.
    pub fn to_spectrum(&self) -> Result<TwoDSpectrum, TwodError> {
        if !SPECTRUM_SCHEMA.reads(&self.schema_version) {
            return Err(TwodError::Serde(
                ErrorInfo::new("schema-version", "unsupported spectrum schema")
                    .with_context("found", format!("{:?}", self.schema_version)),
            ));
        }
        let expected = digest(&self.spectrum)?;
        if expected != self.digest {
            return Err(TwodError::Serde(
                ErrorInfo::new("digest-mismatch", "spectrum datasets do not match their digest")
                    .with_context("expected", expected)
                    .with_context("found", self.digest.clone()),
            ));
        }
        let group = &self.spectrum;
        let mut spectrum = TwoDSpectrum::new(group.attrs.keeps[0] == 1, group.attrs.keeps[1] == 1);
        spectrum.set_t2(group.attrs.t2);
        spectrum.set_axes(
            record_to_axis(&group.xaxis, self.units)?,
            record_to_axis(&group.yaxis, self.units)?,
        )?;
        let load = |record: &Option<GridRecord>| record.as_ref().map(record_to_grid).transpose();
        let data = load(&group.data)?;
        let reph2d = load(&group.reph2d)?;
        let nonr2d = load(&group.nonr2d)?;
        let dtype = group.dtype.or(if reph2d.is_some() {
            Some(DataKind::Reph)
        } else if nonr2d.is_some() {
            Some(DataKind::Nonr)
        } else {
            data.as_ref().map(|_| DataKind::Tot)
        });
        for array in [&data, &reph2d, &nonr2d].into_iter().flatten() {
            twod_core::grid::ensure_shape(
                array,
                (group.xaxis.length, group.yaxis.length),
            )?;
        }
        spectrum.restore_parts(dtype, data, reph2d, nonr2d);
        Ok(spectrum)
    }

    /// Serializes the document to pretty JSON.
    pub fn to_json(&self) -> Result<String, TwodError> {
        serde_json::to_string_pretty(self).map_err(|err| serde_error("json-serialize", err))
    }

    /// Parses a JSON document.
    pub fn from_json(data: &str) -> Result<Self, TwodError> {
        serde_json::from_str(data).map_err(|err| serde_error("json-deserialize", err))
    }

    /// Encodes the document as a compact binary payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TwodError> {
        bincode::serialize(self).map_err(|err| serde_error("binary-serialize", err))
    }

    /// Decodes a binary payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TwodError> {
        bincode::deserialize(bytes).map_err(|err| serde_error("binary-deserialize", err))
    }
}

impl TwoDSpectrum {
    /// Writes the spectrum as JSON with axis metadata in `units`.
    pub fn save(&self, path: &Path, units: EnergyUnits) -> Result<(), TwodError> {
        let json = SpectrumFile::from_spectrum(self, units)?.to_json()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                TwodError::Serde(
                    ErrorInfo::new("spectrum-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        fs::write(path, json).map_err(|err| {
            TwodError::Serde(
                ErrorInfo::new("spectrum-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        debug!(path = %path.display(), t2 = self.t2(), "saved spectrum");
        Ok(())
    }

    /// Reads a spectrum written by [`save`](Self::save). The document must
    /// have been written in `units`.
    pub fn load(path: &Path, units: EnergyUnits) -> Result<Self, TwodError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            TwodError::Serde(
                ErrorInfo::new("spectrum-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let file = SpectrumFile::from_json(&contents)?;
        if file.units != units {
            return Err(TwodError::Serde(
                ErrorInfo::new("units-mismatch", "file was written in different energy units")
                    .with_context("expected", units.label())
                    .with_context("found", file.units.label()),
            ));
        }
        file.to_spectrum()
    }
}
