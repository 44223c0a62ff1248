//! Mock calculator: 2D spectra synthesised from analytic pathway
//! descriptors, without any physical system.

use tracing::{debug, info};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::{accumulate, ComplexGrid};
use twod_core::{EnergyUnits, FrequencyAxis, TimeAxis};
use twod_spectrum::{DataKind, SpectrumContainer, TwoDSpectrum};

use crate::axes::output_axes;
use crate::config::MockConfig;
use crate::lineshape::{render_pathway, LineShape, PeakParameters};
use crate::pathway::{LiouvillePathway, PathwayKind};

const DEFAULT_WIDTH_CM: f64 = 300.0;

/// Calculator rendering Liouville pathway descriptors as closed-form peaks.
#[derive(Debug, Clone)]
pub struct MockSpectrumCalculator {
    t1axis: TimeAxis,
    t2axis: TimeAxis,
    t3axis: TimeAxis,
    width: f64,
    deph: f64,
    pathways: Vec<LiouvillePathway>,
    shape: LineShape,
    all_positive: bool,
    verbose: bool,
    axes: Option<(FrequencyAxis, FrequencyAxis)>,
}

impl MockSpectrumCalculator {
    /// Calculator with default width and dephasing of 300 1/cm.
    pub fn new(t1axis: TimeAxis, t2axis: TimeAxis, t3axis: TimeAxis) -> Self {
        let default = EnergyUnits::InverseCm.to_internal(DEFAULT_WIDTH_CM);
        Self {
            t1axis,
            t2axis,
            t3axis,
            width: default,
            deph: default,
            pathways: Vec::new(),
            shape: LineShape::Gaussian,
            all_positive: false,
            verbose: false,
            axes: None,
        }
    }

    /// Default Gaussian width in internal units.
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Default Gaussian width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Default Lorentzian dephasing in internal units.
    pub fn set_deph(&mut self, deph: f64) {
        self.deph = deph;
    }

    /// Default Lorentzian dephasing.
    pub fn deph(&self) -> f64 {
        self.deph
    }

    /// Replaces the pathway list.
    pub fn set_pathways(&mut self, pathways: Vec<LiouvillePathway>) {
        self.pathways = pathways;
    }

    /// Current pathways.
    pub fn pathways(&self) -> &[LiouvillePathway] {
        &self.pathways
    }

    /// Output axes once bootstrapped.
    pub fn output_axes(&self) -> Option<(&FrequencyAxis, &FrequencyAxis)> {
        self.axes.as_ref().map(|(x, y)| (x, y))
    }

    /// Builds the output axes and stores the pathways and rendering options.
    pub fn bootstrap(
        &mut self,
        rwa: f64,
        pathways: Vec<LiouvillePathway>,
        shape: LineShape,
        all_positive: bool,
        verbose: bool,
    ) {
        self.axes = Some(output_axes(&self.t1axis, &self.t3axis, rwa));
        self.pathways = pathways;
        self.shape = shape;
        self.all_positive = all_positive;
        self.verbose = verbose;
        if verbose {
            info!(pathways = self.pathways.len(), %shape, "mock calculator bootstrapped");
        } else {
            debug!(pathways = self.pathways.len(), %shape, "mock calculator bootstrapped");
        }
    }

    /// Bootstraps from a configuration, which also sets the default width
    /// and dephasing. Fails with `UnknownShape` before touching any state.
    pub fn bootstrap_with_config(
        &mut self,
        config: &MockConfig,
        pathways: Vec<LiouvillePathway>,
    ) -> Result<(), TwodError> {
        let shape = config.line_shape()?;
        self.width = config.width_internal();
        self.deph = config.dephasing_internal();
        self.bootstrap(
            config.rwa_internal(),
            pathways,
            shape,
            config.all_positive,
            config.verbose,
        );
        Ok(())
    }

    fn axes(&self) -> Result<&(FrequencyAxis, FrequencyAxis), TwodError> {
        self.axes.as_ref().ok_or_else(|| {
            TwodError::NotBootstrapped(
                ErrorInfo::new("not-bootstrapped", "mock calculator has not been bootstrapped")
                    .with_hint("call bootstrap first"),
            )
        })
    }

    /// Renders a single pathway over the output grid.
    pub fn calculate_pathway(&self, pathway: &LiouvillePathway) -> Result<ComplexGrid, TwodError> {
        let (oa1, oa3) = self.axes()?;
        let defaults = PeakParameters::uniform(self.width, self.deph);
        render_pathway(pathway, self.shape, oa1, oa3, &defaults, self.all_positive)
    }

    fn synthesise(&self, t2: f64) -> Result<TwoDSpectrum, TwodError> {
        let (oa1, oa3) = self.axes()?;
        let shape = (oa1.length, oa3.length);
        let mut reph = ComplexGrid::zeros(shape);
        let mut nonr = ComplexGrid::zeros(shape);
        for pathway in &self.pathways {
            let grid = self.calculate_pathway(pathway)?;
            match pathway.pathway_type {
                PathwayKind::Rephasing => accumulate(&mut reph, &grid)?,
                PathwayKind::NonRephasing => accumulate(&mut nonr, &grid)?,
            }
        }
        let mut spectrum = TwoDSpectrum::new(false, true);
        spectrum.set_axes(oa1.clone(), oa3.clone())?;
        spectrum.set_t2(t2);
        spectrum.set_data(reph, DataKind::Reph)?;
        spectrum.set_data(nonr, DataKind::Nonr)?;
        Ok(spectrum)
    }

    /// Spectrum at waiting-time index `tc`.
    pub fn calculate_one(&self, tc: usize) -> Result<TwoDSpectrum, TwodError> {
        let t2 = self.t2axis.value(tc).ok_or_else(|| {
            TwodError::Axis(
                ErrorInfo::new("out-of-range", "waiting-time index outside the t2 axis")
                    .with_context("tc", tc.to_string())
                    .with_context("length", self.t2axis.length.to_string()),
            )
        })?;
        let spectrum = self.synthesise(t2)?;
        if self.verbose {
            info!(tc, t2, "mock spectrum calculated");
        } else {
            debug!(tc, t2, "mock spectrum calculated");
        }
        Ok(spectrum)
    }

    /// Single spectrum at zero waiting time.
    pub fn calculate(&self) -> Result<TwoDSpectrum, TwodError> {
        self.synthesise(0.0)
    }

    /// One spectrum per waiting time, in axis order.
    pub fn spectra(&self) -> impl Iterator<Item = Result<TwoDSpectrum, TwodError>> + '_ {
        (0..self.t2axis.length).map(move |tc| self.calculate_one(tc))
    }

    /// Spectra of every waiting time.
    pub fn calculate_all(&self) -> Result<SpectrumContainer, TwodError> {
        self.spectra().collect()
    }
}
