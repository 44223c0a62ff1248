//! Population propagation over the waiting time.
//!
//! `Uee(t) = exp(K t)` is the full population propagator of the one-exciton
//! rate matrix `K`. The expansion `Uc0, Uc1, ...` treats the off-diagonal
//! (transfer) part of `K` perturbatively: `Uc0(t) = exp(diag(K) t)` and
//! `Uc_n(t) = int_0^t Uc0(t - s) K_off Uc_{n-1}(s) ds`.

use nalgebra::DMatrix;
use tracing::debug;
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::TimeAxis;

/// Propagators sampled on the waiting-time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationPropagator {
    times: Vec<f64>,
    uee: Vec<DMatrix<f64>>,
    corrections: Vec<Vec<DMatrix<f64>>>,
}

fn diagonal_propagator(rates: &DMatrix<f64>, t: f64) -> DMatrix<f64> {
    DMatrix::from_diagonal(&rates.diagonal().map(|k| (k * t).exp()))
}

/// Terms `Uc0..Uc_{order-1}` at time `t`, integrated with the trapezoid
/// rule on a uniform grid from 0 to `t` no coarser than `step`.
fn expansion_at(
    rates: &DMatrix<f64>,
    off: &DMatrix<f64>,
    t: f64,
    step: f64,
    order: usize,
) -> Vec<DMatrix<f64>> {
    let dim = rates.nrows();
    let intervals = if t > 0.0 && step > 0.0 {
        ((t / step).ceil() as usize).max(1)
    } else {
        0
    };
    let mut terms = vec![diagonal_propagator(rates, t)];
    if intervals == 0 {
        terms.resize(order, DMatrix::zeros(dim, dim));
        return terms;
    }
    let h = t / intervals as f64;
    let base: Vec<DMatrix<f64>> = (0..=intervals)
        .map(|k| diagonal_propagator(rates, k as f64 * h))
        .collect();
    let mut previous = base.clone();
    for _ in 1..order {
        let next: Vec<DMatrix<f64>> = (0..=intervals)
            .map(|k| {
                let mut acc = DMatrix::zeros(dim, dim);
                if k == 0 {
                    return acc;
                }
                for j in 0..=k {
                    let weight = if j == 0 || j == k { 0.5 } else { 1.0 };
                    acc += (&base[k - j] * off * &previous[j]) * (weight * h);
                }
                acc
            })
            .collect();
        terms.push(next[intervals].clone());
        previous = next;
    }
    terms
}

impl PopulationPropagator {
    /// Propagates `rates` over every sample of `t2` with `order` terms of
    /// the transfer expansion (at least the zeroth).
    pub fn new(rates: &DMatrix<f64>, t2: &TimeAxis, order: usize) -> Result<Self, TwodError> {
        if !rates.is_square() {
            return Err(TwodError::TypeMismatch(
                ErrorInfo::new("shape-mismatch", "rate matrix must be square")
                    .with_context("shape", format!("{}x{}", rates.nrows(), rates.ncols())),
            ));
        }
        if t2.start < 0.0 {
            return Err(TwodError::Axis(
                ErrorInfo::new("negative-waiting-time", "waiting times must be non-negative")
                    .with_context("start", t2.start.to_string()),
            ));
        }
        let times = t2.data();
        let uee = times.iter().map(|t| (rates * *t).exp()).collect();

        let order = order.max(1);
        let dim = rates.nrows();
        let mut off = rates.clone();
        off.fill_diagonal(0.0);

        let mut corrections = vec![Vec::with_capacity(times.len()); order];
        for t in &times {
            for (series, term) in corrections
                .iter_mut()
                .zip(expansion_at(rates, &off, *t, t2.step, order))
            {
                series.push(term);
            }
        }
        debug!(states = dim, samples = times.len(), order, "population propagator ready");
        Ok(Self {
            times,
            uee,
            corrections,
        })
    }

    /// Number of waiting-time samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no waiting time is sampled.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of expansion terms kept.
    pub fn order(&self) -> usize {
        self.corrections.len()
    }

    /// Full propagator at waiting-time index `tc`.
    pub fn uee(&self, tc: usize) -> Option<&DMatrix<f64>> {
        self.uee.get(tc)
    }

    /// Transfer-free propagator at index `tc`.
    pub fn uc0(&self, tc: usize) -> Option<&DMatrix<f64>> {
        self.correction(0, tc)
    }

    /// Expansion term `order` at index `tc`.
    pub fn correction(&self, order: usize, tc: usize) -> Option<&DMatrix<f64>> {
        self.corrections.get(order).and_then(|series| series.get(tc))
    }

    /// Population transferred between states, `Uee - Uc0`, at index `tc`.
    pub fn transfer(&self, tc: usize) -> Option<DMatrix<f64>> {
        Some(self.uee(tc)? - self.uc0(tc)?)
    }
}
