//! Pathway response engines: time-domain third-order responses of the
//! elementary Liouville processes.

use std::fmt;

use nalgebra::{DMatrix, Vector3};
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::grid::{ensure_shape, ComplexGrid};
use twod_core::Complex64;
use twod_store::LiouvilleType;

use crate::band::BandSystem;
use crate::lab::LabSettings;

/// Elementary processes evaluated for every waiting time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementaryProcess {
    /// `r1g`
    R1g,
    /// `r2g`
    R2g,
    /// `r3g`
    R3g,
    /// `r4g`
    R4g,
    /// `r1fs`
    R1fs,
    /// `r2fs`
    R2fs,
    /// `r1g_trans`
    R1gTrans,
    /// `r2g_trans`
    R2gTrans,
    /// `r1fs_trans`
    R1fsTrans,
    /// `r2fs_trans`
    R2fsTrans,
}

impl ElementaryProcess {
    /// Evaluation order of the exact calculator.
    pub const ALL: [ElementaryProcess; 10] = [
        ElementaryProcess::R3g,
        ElementaryProcess::R4g,
        ElementaryProcess::R1g,
        ElementaryProcess::R2g,
        ElementaryProcess::R1fs,
        ElementaryProcess::R2fs,
        ElementaryProcess::R1gTrans,
        ElementaryProcess::R2gTrans,
        ElementaryProcess::R1fsTrans,
        ElementaryProcess::R2fsTrans,
    ];

    /// Lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            ElementaryProcess::R1g => "r1g",
            ElementaryProcess::R2g => "r2g",
            ElementaryProcess::R3g => "r3g",
            ElementaryProcess::R4g => "r4g",
            ElementaryProcess::R1fs => "r1fs",
            ElementaryProcess::R2fs => "r2fs",
            ElementaryProcess::R1gTrans => "r1g_trans",
            ElementaryProcess::R2gTrans => "r2g_trans",
            ElementaryProcess::R1fsTrans => "r1fs_trans",
            ElementaryProcess::R2fsTrans => "r2fs_trans",
        }
    }

    /// Whether the process contributes to the rephasing response.
    pub fn is_rephasing(self) -> bool {
        matches!(
            self,
            ElementaryProcess::R2g
                | ElementaryProcess::R3g
                | ElementaryProcess::R1fs
                | ElementaryProcess::R2gTrans
                | ElementaryProcess::R1fsTrans
        )
    }

    /// Whether the process propagates populations through `Uee - Uc0`.
    pub fn uses_transfer(self) -> bool {
        matches!(
            self,
            ElementaryProcess::R1gTrans
                | ElementaryProcess::R2gTrans
                | ElementaryProcess::R1fsTrans
                | ElementaryProcess::R2fsTrans
        )
    }

    /// Whether the process passes through the two-exciton band.
    pub fn involves_two_exciton_band(self) -> bool {
        matches!(
            self,
            ElementaryProcess::R1fs
                | ElementaryProcess::R2fs
                | ElementaryProcess::R1fsTrans
                | ElementaryProcess::R2fsTrans
        )
    }

    /// Pathway type the process is stored under.
    pub fn liouville_type(self) -> LiouvilleType {
        match self {
            ElementaryProcess::R1g | ElementaryProcess::R1gTrans => LiouvilleType::R1g,
            ElementaryProcess::R2g | ElementaryProcess::R2gTrans => LiouvilleType::R2g,
            ElementaryProcess::R3g => LiouvilleType::R3g,
            ElementaryProcess::R4g => LiouvilleType::R4g,
            ElementaryProcess::R1fs | ElementaryProcess::R1fsTrans => LiouvilleType::R1fs,
            ElementaryProcess::R2fs | ElementaryProcess::R2fsTrans => LiouvilleType::R2fs,
        }
    }
}

impl fmt::Display for ElementaryProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs shared by all processes at one waiting time.
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    /// Laser polarisations.
    pub lab: &'a LabSettings,
    /// System in its eigenbasis.
    pub band: &'a BandSystem,
    /// Index of the waiting time on the index axis.
    pub it2: usize,
    /// Waiting time.
    pub t2: f64,
    /// t1 samples.
    pub t1s: &'a [f64],
    /// t3 samples.
    pub t3s: &'a [f64],
    /// Rotating-wave frequency.
    pub rwa: f64,
    /// Floor of the dephasing rates.
    pub rmin: f64,
    /// Transfer-free population propagator `Uc0(t2)`.
    pub coherent: &'a DMatrix<f64>,
    /// Transferred population `Uee(t2) - Uc0(t2)`.
    pub transfer: &'a DMatrix<f64>,
}

/// Strategy evaluating elementary process responses.
pub trait PathwayResponseEngine: Send + Sync {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Whether responses can be evaluated at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Adds the time-domain response of `process` to `out`, indexed
    /// `[i1, i3]`. Rephasing responses are added complex conjugated.
    fn accumulate(
        &self,
        process: ElementaryProcess,
        ctx: &ResponseContext<'_>,
        out: &mut ComplexGrid,
    ) -> Result<(), TwodError>;
}

/// Engine standing in for a missing numeric backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl PathwayResponseEngine for UnavailableEngine {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn accumulate(
        &self,
        process: ElementaryProcess,
        _ctx: &ResponseContext<'_>,
        _out: &mut ComplexGrid,
    ) -> Result<(), TwodError> {
        Err(TwodError::EngineUnavailable(
            ErrorInfo::new("engine-unavailable", "no pathway response engine is available")
                .with_context("process", process.name()),
        ))
    }
}

/// Impulsive secular response engine.
///
/// Coherences dephase at `max(Gamma/2, rmin)` where `Gamma` is the
/// depopulation rate of the excited state, optionally broadened by cumulant
/// lineshape functions. Orientations are averaged isotropically. Bleach and
/// emission pathways enter with a positive sign, excited-state absorption
/// with a negative one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecularResponseEngine;

enum Coherence {
    Single(usize),
    DoubleOver(usize, usize),
}

struct Term<'v> {
    dipoles: [&'v Vector3<f64>; 4],
    weight: f64,
    t1: usize,
    t3: Coherence,
}

impl SecularResponseEngine {
    fn gamma(ctx: &ResponseContext<'_>, a: usize) -> f64 {
        (ctx.band.lifetime_rate(a) / 2.0).max(ctx.rmin)
    }

    fn goft(ctx: &ResponseContext<'_>, coherence: &Coherence, t: f64) -> Complex64 {
        match coherence {
            Coherence::Single(a) => ctx.band.goft_single(*a, t),
            Coherence::DoubleOver(f, a) => ctx.band.goft_double(*f, t) + ctx.band.goft_single(*a, t),
        }
    }

    fn omega(ctx: &ResponseContext<'_>, coherence: &Coherence) -> f64 {
        match coherence {
            Coherence::Single(a) => ctx.band.omega_single(*a) - ctx.rwa,
            Coherence::DoubleOver(f, a) => {
                ctx.band.omega_double(*f) - ctx.band.omega_single(*a) - ctx.rwa
            }
        }
    }

    fn dephasing(ctx: &ResponseContext<'_>, coherence: &Coherence) -> f64 {
        match coherence {
            Coherence::Single(a) | Coherence::DoubleOver(_, a) => Self::gamma(ctx, *a),
        }
    }

    /// Free evolution of a coherence; `bra` selects `|g><x|` over `|x><g|`.
    fn evolution(
        ctx: &ResponseContext<'_>,
        coherence: &Coherence,
        times: &[f64],
        bra: bool,
    ) -> Vec<Complex64> {
        let omega = Self::omega(ctx, coherence);
        let gamma = Self::dephasing(ctx, coherence);
        times
            .iter()
            .map(|t| {
                let g = Self::goft(ctx, coherence, *t);
                let exponent = if bra {
                    Complex64::new(-gamma * t, omega * t) - g.conj()
                } else {
                    Complex64::new(-gamma * t, -omega * t) - g
                };
                exponent.exp()
            })
            .collect()
    }

    /// Waiting-time factor of the one-exciton density matrix `|ket><bra|`.
    fn waiting(ctx: &ResponseContext<'_>, ket: usize, bra: usize) -> Complex64 {
        if ket == bra {
            return Complex64::new(ctx.coherent[(ket, ket)], 0.0);
        }
        let omega = ctx.band.omega_single(ket) - ctx.band.omega_single(bra);
        let decay = 0.5 * (ctx.band.lifetime_rate(ket) + ctx.band.lifetime_rate(bra));
        Complex64::new(-decay * ctx.t2, -omega * ctx.t2).exp()
    }

    fn add_term(
        ctx: &ResponseContext<'_>,
        term: &Term<'_>,
        amplitude: Complex64,
        rephasing: bool,
        out: &mut ComplexGrid,
    ) {
        let weight = ctx.lab.orientational_average(term.dipoles) * term.weight;
        if weight == 0.0 || amplitude == Complex64::new(0.0, 0.0) {
            return;
        }
        let f1 = Self::evolution(ctx, &Coherence::Single(term.t1), ctx.t1s, rephasing);
        let f3 = Self::evolution(ctx, &term.t3, ctx.t3s, false);
        let mut amp = amplitude * weight;
        if rephasing {
            amp = amp.conj();
        }
        for ((i1, i3), value) in out.indexed_iter_mut() {
            let product = f1[i1] * f3[i3];
            *value += amp * if rephasing { product.conj() } else { product };
        }
    }
}

impl PathwayResponseEngine for SecularResponseEngine {
    fn name(&self) -> &str {
        "secular"
    }

    fn accumulate(
        &self,
        process: ElementaryProcess,
        ctx: &ResponseContext<'_>,
        out: &mut ComplexGrid,
    ) -> Result<(), TwodError> {
        ensure_shape(out, (ctx.t1s.len(), ctx.t3s.len()))?;
        let band = ctx.band;
        let n1 = band.single_count();
        let n2 = band.double_count();
        if process.involves_two_exciton_band() && n2 == 0 {
            return Ok(());
        }
        let rephasing = process.is_rephasing();
        let one = Complex64::new(1.0, 0.0);
        for a in 0..n1 {
            for b in 0..n1 {
                match process {
                    ElementaryProcess::R3g | ElementaryProcess::R4g => {
                        let term = Term {
                            dipoles: [band.dge(a), band.dge(a), band.dge(b), band.dge(b)],
                            weight: 1.0,
                            t1: a,
                            t3: Coherence::Single(b),
                        };
                        Self::add_term(ctx, &term, one, rephasing, out);
                    }
                    ElementaryProcess::R1g => {
                        let term = Term {
                            dipoles: [band.dge(a), band.dge(b), band.dge(b), band.dge(a)],
                            weight: 1.0,
                            t1: a,
                            t3: Coherence::Single(a),
                        };
                        Self::add_term(ctx, &term, Self::waiting(ctx, a, b), rephasing, out);
                    }
                    ElementaryProcess::R2g => {
                        let term = Term {
                            dipoles: [band.dge(a), band.dge(b), band.dge(a), band.dge(b)],
                            weight: 1.0,
                            t1: a,
                            t3: Coherence::Single(b),
                        };
                        Self::add_term(ctx, &term, Self::waiting(ctx, b, a), rephasing, out);
                    }
                    ElementaryProcess::R1fs => {
                        for f in 0..n2 {
                            let term = Term {
                                dipoles: [band.dge(a), band.dge(b), band.def(b, f), band.def(a, f)],
                                weight: -1.0,
                                t1: a,
                                t3: Coherence::DoubleOver(f, a),
                            };
                            Self::add_term(ctx, &term, Self::waiting(ctx, b, a), rephasing, out);
                        }
                    }
                    ElementaryProcess::R2fs => {
                        for f in 0..n2 {
                            let term = Term {
                                dipoles: [band.dge(a), band.dge(b), band.def(a, f), band.def(b, f)],
                                weight: -1.0,
                                t1: a,
                                t3: Coherence::DoubleOver(f, b),
                            };
                            Self::add_term(ctx, &term, Self::waiting(ctx, a, b), rephasing, out);
                        }
                    }
                    ElementaryProcess::R1gTrans | ElementaryProcess::R2gTrans => {
                        // population created in a, found in b after t2
                        let term = Term {
                            dipoles: [band.dge(a), band.dge(a), band.dge(b), band.dge(b)],
                            weight: 1.0,
                            t1: a,
                            t3: Coherence::Single(b),
                        };
                        let moved = Complex64::new(ctx.transfer[(b, a)], 0.0);
                        Self::add_term(ctx, &term, moved, rephasing, out);
                    }
                    ElementaryProcess::R1fsTrans | ElementaryProcess::R2fsTrans => {
                        let moved = Complex64::new(ctx.transfer[(b, a)], 0.0);
                        for f in 0..n2 {
                            let term = Term {
                                dipoles: [band.dge(a), band.dge(a), band.def(b, f), band.def(b, f)],
                                weight: -1.0,
                                t1: a,
                                t3: Coherence::DoubleOver(f, b),
                            };
                            Self::add_term(ctx, &term, moved, rephasing, out);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_split_matches_store_taxonomy() {
        for process in ElementaryProcess::ALL {
            let signal = process.liouville_type().signal();
            let rephasing = signal == twod_store::Signal::REPH;
            assert_eq!(process.is_rephasing(), rephasing, "{process}");
        }
    }
}
