//! A single two-dimensional spectrum at one waiting time.

use ndarray::s;
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::{self, ComplexGrid};
use twod_core::{Complex64, FrequencyAxis};
use twod_store::{LiouvilleType, Resolution, ResolutionAwareStore, SpectrumStore};

use crate::kind::DataKind;

/// Two-dimensional spectrum over the (omega_1, omega_3) grid.
///
/// Holds either separate rephasing/non-rephasing arrays or one combined
/// array. The first write fixes the data family; later writes of the other
/// family fail with `DataTypeConflict`.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDSpectrum {
    xaxis: Option<FrequencyAxis>,
    yaxis: Option<FrequencyAxis>,
    t2: f64,
    dtype: Option<DataKind>,
    data: Option<ComplexGrid>,
    reph2d: Option<ComplexGrid>,
    nonr2d: Option<ComplexGrid>,
    keep_pathways: bool,
    keep_stypes: bool,
    store: Option<SpectrumStore>,
}

impl Default for TwoDSpectrum {
    fn default() -> Self {
        Self::new(false, true)
    }
}

fn no_data(code: &str, message: &str) -> TwodError {
    TwodError::NoData(ErrorInfo::new(code, message))
}

/// Inclusive index range covering `[a, b]` on `axis`, widened by `margin`
/// samples and clamped to the axis. Window values outside the axis are
/// clamped to its ends first.
pub(crate) fn window_indices(
    axis: &FrequencyAxis,
    a: f64,
    b: f64,
    margin: usize,
) -> Result<(usize, usize), TwodError> {
    let clamp = |value: f64| value.clamp(axis.start, axis.end());
    let (ia, _) = axis.locate(clamp(a))?;
    let (ib, _) = axis.locate(clamp(b))?;
    let lo = ia.min(ib).saturating_sub(margin);
    let hi = (ia.max(ib) + margin).min(axis.length - 1);
    Ok((lo, hi))
}

fn slice(grid: &ComplexGrid, rows: (usize, usize), cols: (usize, usize)) -> ComplexGrid {
    grid.slice(s![rows.0..=rows.1, cols.0..=cols.1]).to_owned()
}

impl TwoDSpectrum {
    /// Creates an empty spectrum. A pathway store is attached when either
    /// flag is set.
    pub fn new(keep_pathways: bool, keep_stypes: bool) -> Self {
        Self {
            xaxis: None,
            yaxis: None,
            t2: -1.0,
            dtype: None,
            data: None,
            reph2d: None,
            nonr2d: None,
            keep_pathways,
            keep_stypes,
            store: (keep_pathways || keep_stypes).then(SpectrumStore::new),
        }
    }

    /// Sets both frequency axes. Existing arrays must match their lengths.
    pub fn set_axes(&mut self, xaxis: FrequencyAxis, yaxis: FrequencyAxis) -> Result<(), TwodError> {
        let shape = (xaxis.length, yaxis.length);
        for existing in [&self.data, &self.reph2d, &self.nonr2d].into_iter().flatten() {
            grid::ensure_shape(existing, shape)?;
        }
        if let Some(store) = &self.store {
            match store.shape() {
                Some(stored) if stored != shape => {
                    return Err(TwodError::TypeMismatch(
                        ErrorInfo::new("shape-mismatch", "stored pathways disagree with the axes")
                            .with_context("expected", format!("{}x{}", shape.0, shape.1))
                            .with_context("actual", format!("{}x{}", stored.0, stored.1)),
                    ));
                }
                Some(_) => {}
                None if !store.is_initialized() => {
                    let resolution = store.resolution();
                    let mut fresh = SpectrumStore::with_shape(shape);
                    lower_to(&mut fresh, resolution)?;
                    self.store = Some(fresh);
                }
                None => {}
            }
        }
        self.xaxis = Some(xaxis);
        self.yaxis = Some(yaxis);
        Ok(())
    }

    /// The omega_1 axis.
    pub fn xaxis(&self) -> Option<&FrequencyAxis> {
        self.xaxis.as_ref()
    }

    /// The omega_3 axis.
    pub fn yaxis(&self) -> Option<&FrequencyAxis> {
        self.yaxis.as_ref()
    }

    /// Sets the waiting time.
    pub fn set_t2(&mut self, t2: f64) {
        self.t2 = t2;
    }

    /// Waiting time; `-1.0` when unset.
    pub fn t2(&self) -> f64 {
        self.t2
    }

    /// Whether individual pathways are retained.
    pub fn keep_pathways(&self) -> bool {
        self.keep_pathways
    }

    /// Whether rephasing and non-rephasing parts are kept separately.
    pub fn keep_stypes(&self) -> bool {
        self.keep_stypes
    }

    /// Selected data type, if any data has been written or selected.
    pub fn data_type(&self) -> Option<DataKind> {
        self.dtype
    }

    fn check_family(&self, kind: DataKind) -> Result<(), TwodError> {
        match self.dtype {
            Some(fixed) if fixed.family() != kind.family() => Err(TwodError::DataTypeConflict(
                ErrorInfo::new(
                    "data-type-conflict",
                    "data type differs from the one already fixed",
                )
                .with_context("fixed", fixed.label())
                .with_context("requested", kind.label()),
            )),
            _ => Ok(()),
        }
    }

    fn check_axes_shape(&self, array: &ComplexGrid) -> Result<(), TwodError> {
        if let (Some(x), Some(y)) = (&self.xaxis, &self.yaxis) {
            grid::ensure_shape(array, (x.length, y.length))?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, kind: DataKind) -> &mut Option<ComplexGrid> {
        match kind {
            DataKind::Tot => &mut self.data,
            DataKind::Reph => &mut self.reph2d,
            DataKind::Nonr => &mut self.nonr2d,
        }
    }

    /// Selects the array read by [`value_at`](Self::value_at).
    pub fn set_data_type(&mut self, kind: DataKind) -> Result<(), TwodError> {
        self.check_family(kind)?;
        self.dtype = Some(kind);
        Ok(())
    }

    /// Replaces the array of `kind`.
    ///
    /// Kinds come in two families: `Tot` alone, and `Reph` with `Nonr`.
    /// The first write fixes the family, so `Reph` followed by `Nonr` is
    /// accepted while any write outside the fixed family fails with
    /// [`TwodError::DataTypeConflict`].
    pub fn set_data(&mut self, array: ComplexGrid, kind: DataKind) -> Result<(), TwodError> {
        self.check_family(kind)?;
        self.check_axes_shape(&array)?;
        *self.slot_mut(kind) = Some(array);
        self.dtype.get_or_insert(kind);
        Ok(())
    }

    /// Adds `array` into the accumulator of `kind`, creating a zero
    /// accumulator of the incoming shape on first use. Follows the same
    /// family rule as [`set_data`](Self::set_data).
    pub fn add_data(&mut self, array: &ComplexGrid, kind: DataKind) -> Result<(), TwodError> {
        self.check_family(kind)?;
        self.check_axes_shape(array)?;
        let slot = self.slot_mut(kind);
        let acc = slot.get_or_insert_with(|| ComplexGrid::zeros(array.dim()));
        grid::accumulate(acc, array)?;
        self.dtype.get_or_insert(kind);
        Ok(())
    }

    /// Array of `kind`, if present.
    pub fn data(&self, kind: DataKind) -> Option<&ComplexGrid> {
        match kind {
            DataKind::Tot => self.data.as_ref(),
            DataKind::Reph => self.reph2d.as_ref(),
            DataKind::Nonr => self.nonr2d.as_ref(),
        }
    }

    /// Total spectrum: the combined array if present, else the sum of the
    /// rephasing and non-rephasing parts that exist.
    pub fn total(&self) -> Result<ComplexGrid, TwodError> {
        if let Some(data) = &self.data {
            return Ok(data.clone());
        }
        match (&self.reph2d, &self.nonr2d) {
            (Some(reph), Some(nonr)) => {
                let mut total = reph.clone();
                grid::accumulate(&mut total, nonr)?;
                Ok(total)
            }
            (Some(part), None) | (None, Some(part)) => Ok(part.clone()),
            (None, None) => Err(no_data("empty-spectrum", "no data in the spectrum")),
        }
    }

    /// Value of the selected array at the grid point nearest `(x, y)`.
    pub fn value_at(&self, x: f64, y: f64) -> Result<Complex64, TwodError> {
        let kind = self
            .dtype
            .ok_or_else(|| no_data("no-data-type", "no data in the spectrum"))?;
        let (xaxis, yaxis) = self.axes()?;
        let (ix, _) = xaxis.locate(x)?;
        let (iy, _) = yaxis.locate(y)?;
        let value = match kind {
            DataKind::Tot => self.total()?[[ix, iy]],
            other => self
                .data(other)
                .map(|array| array[[ix, iy]])
                .ok_or_else(|| no_data("missing-array", "selected array is empty"))?,
        };
        Ok(value)
    }

    /// Maximum of the real part of the total of both parts.
    pub fn max_value(&self) -> Result<f64, TwodError> {
        let (Some(reph), Some(nonr)) = (&self.reph2d, &self.nonr2d) else {
            return Err(no_data(
                "missing-parts",
                "maximum needs both rephasing and non-rephasing parts",
            ));
        };
        let mut total = reph.clone();
        grid::accumulate(&mut total, nonr)?;
        Ok(total
            .iter()
            .map(|value| value.re)
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// Divides every present array by `value`.
    pub fn divide_by(&mut self, value: f64) {
        for array in [&mut self.data, &mut self.reph2d, &mut self.nonr2d]
            .into_iter()
            .flatten()
        {
            array.mapv_inplace(|z| z / value);
        }
    }

    pub(crate) fn axes(&self) -> Result<(&FrequencyAxis, &FrequencyAxis), TwodError> {
        match (&self.xaxis, &self.yaxis) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(no_data("no-axes", "spectrum axes are not set")),
        }
    }

    /// Trims the spectrum to `window = [x0, x1, y0, y1]` with one extra
    /// sample on each side (clamped at the axis ends). Axes, arrays and the
    /// pathway store are cut consistently.
    pub fn trim_to(&mut self, window: [f64; 4]) -> Result<(), TwodError> {
        let (xaxis, yaxis) = self.axes()?;
        let rows = window_indices(xaxis, window[0], window[1], 1)?;
        let cols = window_indices(yaxis, window[2], window[3], 1)?;
        let xaxis = xaxis.sub_range(rows.0, rows.1)?;
        let yaxis = yaxis.sub_range(cols.0, cols.1)?;

        for array in [&mut self.data, &mut self.reph2d, &mut self.nonr2d]
            .into_iter()
            .flatten()
        {
            *array = slice(array, rows, cols);
        }
        if let Some(store) = &mut self.store {
            store.trim(rows, cols)?;
        }
        self.xaxis = Some(xaxis);
        self.yaxis = Some(yaxis);
        Ok(())
    }

    /// Stores one tagged Liouville pathway contribution.
    pub fn add_pathway(
        &mut self,
        ty: LiouvilleType,
        tag: &str,
        array: ComplexGrid,
    ) -> Result<(), TwodError> {
        self.check_axes_shape(&array)?;
        let store = self.store.as_mut().ok_or_else(|| {
            TwodError::UnsupportedConversion(
                ErrorInfo::new("pathways-not-kept", "spectrum does not keep pathway data")
                    .with_hint("create the spectrum with keep_pathways or keep_stypes"),
            )
        })?;
        store.write(ty, tag, array)
    }

    /// Lowers the resolution of the pathway store.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), TwodError> {
        match &mut self.store {
            Some(store) => store.set_resolution(resolution),
            None => Err(TwodError::UnsupportedConversion(ErrorInfo::new(
                "pathways-not-kept",
                "spectrum does not keep pathway data",
            ))),
        }
    }

    /// Pathway store, when pathways or signal types are kept.
    pub fn store(&self) -> Option<&SpectrumStore> {
        self.store.as_ref()
    }

    /// Mutable access to the pathway store.
    pub fn store_mut(&mut self) -> Option<&mut SpectrumStore> {
        self.store.as_mut()
    }

    pub(crate) fn restore_parts(
        &mut self,
        dtype: Option<DataKind>,
        data: Option<ComplexGrid>,
        reph2d: Option<ComplexGrid>,
        nonr2d: Option<ComplexGrid>,
    ) {
        self.data = data;
        self.reph2d = reph2d;
        self.nonr2d = nonr2d;
        self.dtype = dtype;
    }
}

fn lower_to(store: &mut SpectrumStore, target: Resolution) -> Result<(), TwodError> {
    let steps: &[Resolution] = match target {
        Resolution::Pathways => &[],
        Resolution::Types => &[Resolution::Types],
        Resolution::Processes => &[Resolution::Types, Resolution::Processes],
        Resolution::Signals => &[Resolution::Types, Resolution::Signals],
        Resolution::Off => &[Resolution::Types, Resolution::Signals, Resolution::Off],
    };
    for step in steps {
        store.set_resolution(*step)?;
    }
    Ok(())
}
