//! Exact calculator: third-order responses of an aggregate, Fourier
//! transformed into one 2D spectrum per waiting time.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::ComplexGrid;
use twod_core::{FrequencyAxis, TimeAxis};
use twod_spectrum::{DataKind, SpectrumContainer, TwoDSpectrum};

use crate::axes::output_axes;
use crate::band::BandSystem;
use crate::config::CalculatorConfig;
use crate::engine::{ElementaryProcess, PathwayResponseEngine, ResponseContext};
use crate::fft;
use crate::lab::LabSettings;
use crate::propagator::PopulationPropagator;
use crate::system::OpticalSystem;

#[derive(Debug, Clone)]
struct Prepared {
    rwa: f64,
    lab: LabSettings,
    band: BandSystem,
    propagator: PopulationPropagator,
    oa1: FrequencyAxis,
    oa3: FrequencyAxis,
    it2: Vec<usize>,
    verbose: bool,
}

/// Calculator of 2D spectra from an optical system.
///
/// Must be bootstrapped before spectra are requested. Every waiting time is
/// evaluated independently, so [`calculate_par`](Self::calculate_par) can
/// spread them over threads.
pub struct TwoDSpectrumCalculator {
    t1axis: TimeAxis,
    t2axis: TimeAxis,
    t3axis: TimeAxis,
    t2_index_axis: Option<TimeAxis>,
    system: OpticalSystem,
    engine: Arc<dyn PathwayResponseEngine>,
    config: CalculatorConfig,
    prepared: Option<Prepared>,
}

impl TwoDSpectrumCalculator {
    /// Calculator over the three time axes of the experiment.
    pub fn new(
        t1axis: TimeAxis,
        t2axis: TimeAxis,
        t3axis: TimeAxis,
        system: impl Into<OpticalSystem>,
        engine: Arc<dyn PathwayResponseEngine>,
    ) -> Self {
        Self {
            t1axis,
            t2axis,
            t3axis,
            t2_index_axis: None,
            system: system.into(),
            engine,
            config: CalculatorConfig::default(),
            prepared: None,
        }
    }

    /// Axis on which waiting times are located to obtain the index handed
    /// to the engine. Defaults to the t1 axis.
    pub fn with_t2_index_axis(mut self, axis: TimeAxis) -> Self {
        self.t2_index_axis = Some(axis);
        self.prepared = None;
        self
    }

    /// Replaces the calculator settings.
    pub fn with_config(mut self, config: CalculatorConfig) -> Self {
        self.config = config;
        self.prepared = None;
        self
    }

    /// Current settings.
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// The waiting-time axis.
    pub fn t2axis(&self) -> &TimeAxis {
        &self.t2axis
    }

    /// Whether [`bootstrap`](Self::bootstrap) has succeeded.
    pub fn is_bootstrapped(&self) -> bool {
        self.prepared.is_some()
    }

    /// Output axes once bootstrapped.
    pub fn output_axes(&self) -> Option<(&FrequencyAxis, &FrequencyAxis)> {
        self.prepared.as_ref().map(|p| (&p.oa1, &p.oa3))
    }

    /// Prepares the eigenbasis description, population propagators and
    /// output axes. `lab` defaults to four parallel polarisations.
    pub fn bootstrap(
        &mut self,
        rwa: f64,
        lab: Option<LabSettings>,
        verbose: bool,
    ) -> Result<(), TwodError> {
        let started = Instant::now();
        let agg = self.system.as_aggregate()?;
        let band = BandSystem::from_aggregate(agg)?;
        let propagator = PopulationPropagator::new(
            band.relaxation(),
            &self.t2axis,
            self.config.correction_order,
        )?;

        let index_axis = self.t2_index_axis.as_ref().unwrap_or(&self.t1axis);
        let it2 = self
            .t2axis
            .data()
            .into_iter()
            .map(|t2| {
                index_axis.locate(t2).map(|(idx, _)| idx).map_err(|err| {
                    TwodError::Axis(
                        ErrorInfo::new(
                            "t2-not-on-index-axis",
                            "waiting time cannot be located on the index axis",
                        )
                        .with_context("t2", t2.to_string())
                        .with_context("cause", err.info().code.clone()),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (oa1, oa3) = output_axes(&self.t1axis, &self.t3axis, rwa);
        let [_, n1, n2] = band.block_sizes();
        self.prepared = Some(Prepared {
            rwa,
            lab: lab.unwrap_or_default(),
            band,
            propagator,
            oa1,
            oa3,
            it2,
            verbose,
        });
        let elapsed = started.elapsed().as_secs_f64();
        if verbose {
            info!(single = n1, double = n2, rwa, elapsed, "calculator bootstrapped");
        } else {
            debug!(single = n1, double = n2, rwa, elapsed, "calculator bootstrapped");
        }
        Ok(())
    }

    /// Bootstraps with the rotating-wave frequency and verbosity of the
    /// current settings.
    pub fn bootstrap_with_config(&mut self, lab: Option<LabSettings>) -> Result<(), TwodError> {
        let rwa = self.config.rwa_internal();
        let verbose = self.config.verbose;
        self.bootstrap(rwa, lab, verbose)
    }

    fn prepared(&self) -> Result<&Prepared, TwodError> {
        self.prepared.as_ref().ok_or_else(|| {
            TwodError::NotBootstrapped(
                ErrorInfo::new("not-bootstrapped", "calculator has not been bootstrapped")
                    .with_hint("call bootstrap first"),
            )
        })
    }

    /// Spectrum at waiting-time index `tc`.
    pub fn calculate_one(&self, tc: usize) -> Result<TwoDSpectrum, TwodError> {
        let prep = self.prepared()?;
        let started = Instant::now();
        let out_of_range = || {
            TwodError::Axis(
                ErrorInfo::new("out-of-range", "waiting-time index outside the t2 axis")
                    .with_context("tc", tc.to_string())
                    .with_context("length", self.t2axis.length.to_string()),
            )
        };
        let t2 = self.t2axis.value(tc).ok_or_else(out_of_range)?;
        let coherent = prep.propagator.uc0(tc).ok_or_else(out_of_range)?;
        let transfer = prep.propagator.transfer(tc).ok_or_else(out_of_range)?;

        let it2 = prep.it2[tc];
        if prep.verbose {
            info!(tc, t2, it2, "calculating spectrum");
        } else {
            debug!(tc, t2, it2, "calculating spectrum");
        }

        let t1s = self.t1axis.data();
        let t3s = self.t3axis.data();
        let ctx = ResponseContext {
            lab: &prep.lab,
            band: &prep.band,
            it2,
            t2,
            t1s: &t1s,
            t3s: &t3s,
            rwa: prep.rwa,
            rmin: self.config.rmin,
            coherent,
            transfer: &transfer,
        };

        let shape = (t1s.len(), t3s.len());
        let mut resp_r = ComplexGrid::zeros(shape);
        let mut resp_n = ComplexGrid::zeros(shape);
        for process in ElementaryProcess::ALL {
            let target = if process.is_rephasing() {
                &mut resp_r
            } else {
                &mut resp_n
            };
            self.engine.accumulate(process, &ctx, target)?;
            debug!(
                process = process.name(),
                pathway = %process.liouville_type(),
                tc,
                "accumulated response"
            );
        }

        let mut spectrum = TwoDSpectrum::new(false, true);
        spectrum.set_axes(prep.oa1.clone(), prep.oa3.clone())?;
        spectrum.set_t2(t2);
        spectrum.set_data(fft::assemble_rephasing(&resp_r), DataKind::Reph)?;
        spectrum.set_data(fft::assemble_non_rephasing(&resp_n), DataKind::Nonr)?;

        let elapsed = started.elapsed().as_secs_f64();
        if prep.verbose {
            info!(tc, t2, elapsed, "spectrum calculated");
        } else {
            debug!(tc, t2, elapsed, "spectrum calculated");
        }
        Ok(spectrum)
    }

    /// One spectrum per waiting time, in axis order.
    pub fn spectra(&self) -> impl Iterator<Item = Result<TwoDSpectrum, TwodError>> + '_ {
        (0..self.t2axis.length).map(move |tc| self.calculate_one(tc))
    }

    fn unavailable(&self) -> Option<SpectrumContainer> {
        if self.engine.is_available() {
            return None;
        }
        warn!(
            engine = self.engine.name(),
            "pathway response engine unavailable; returning an empty container"
        );
        Some(SpectrumContainer::unavailable())
    }

    /// Spectra of every waiting time. Without a usable engine the container
    /// is empty and marked [`EngineUnavailable`](twod_spectrum::ContainerStatus::EngineUnavailable).
    pub fn calculate(&self) -> Result<SpectrumContainer, TwodError> {
        if let Some(empty) = self.unavailable() {
            return Ok(empty);
        }
        self.spectra().collect()
    }

    /// Like [`calculate`](Self::calculate) with waiting times evaluated in
    /// parallel.
    pub fn calculate_par(&self) -> Result<SpectrumContainer, TwodError> {
        if let Some(empty) = self.unavailable() {
            return Ok(empty);
        }
        self.prepared()?;
        let spectra = (0..self.t2axis.length)
            .into_par_iter()
            .map(|tc| self.calculate_one(tc))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(spectra.into_iter().collect())
    }
}
