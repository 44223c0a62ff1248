#![allow(dead_code)]

use nalgebra::DMatrix;
use twod_calc::{Aggregate, SystemBathInteraction};
use twod_core::{Complex64, EnergyUnits, TimeAxis};

pub fn cm(value: f64) -> f64 {
    EnergyUnits::InverseCm.to_internal(value)
}

pub fn time_axis(length: usize, step: f64) -> TimeAxis {
    TimeAxis::new(0.0, length, step).unwrap()
}

/// Two-level monomer at `omega` with an x-polarised unit dipole.
pub fn monomer(omega: f64) -> Aggregate {
    let hamiltonian = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![0.0, omega]));
    let mut dx = DMatrix::zeros(2, 2);
    dx[(0, 1)] = 1.0;
    dx[(1, 0)] = 1.0;
    Aggregate::new(
        1,
        hamiltonian,
        [dx, DMatrix::zeros(2, 2), DMatrix::zeros(2, 2)],
        DMatrix::zeros(2, 2),
    )
    .unwrap()
}

/// Constant real bath correlation `strength` sampled every `dt`.
pub fn flat_bath(strength: f64, dt: f64, length: usize, sites: usize) -> SystemBathInteraction {
    SystemBathInteraction::new(
        dt,
        vec![vec![Complex64::new(strength, 0.0); length]],
        vec![0; sites],
    )
    .unwrap()
}

/// Coupled dimer with parallel x-polarised site dipoles and downhill
/// transfer at `rate` from the upper to the lower exciton.
pub fn dimer(e1: f64, e2: f64, coupling: f64, rate: f64) -> Aggregate {
    // states: g, site 0, site 1, both
    let mut hamiltonian = DMatrix::zeros(4, 4);
    hamiltonian[(1, 1)] = e1;
    hamiltonian[(2, 2)] = e2;
    hamiltonian[(1, 2)] = coupling;
    hamiltonian[(2, 1)] = coupling;
    hamiltonian[(3, 3)] = e1 + e2;

    let mut dx = DMatrix::zeros(4, 4);
    for (i, j) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
        dx[(i, j)] = 1.0;
        dx[(j, i)] = 1.0;
    }

    let mut rates = DMatrix::zeros(4, 4);
    rates[(1, 2)] = rate;
    rates[(2, 2)] = -rate;

    Aggregate::new(
        2,
        hamiltonian,
        [dx, DMatrix::zeros(4, 4), DMatrix::zeros(4, 4)],
        rates,
    )
    .unwrap()
}
