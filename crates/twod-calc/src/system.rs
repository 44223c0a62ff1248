//! Optical systems consumed by the exact calculator.

use nalgebra::DMatrix;
use twod_core::errors::{ErrorInfo, TwodError};
use twod_core::Complex64;

fn shape_error(what: &str, expected: (usize, usize), actual: (usize, usize)) -> TwodError {
    TwodError::TypeMismatch(
        ErrorInfo::new("shape-mismatch", format!("{what} has the wrong dimensions"))
            .with_context("expected", format!("{}x{}", expected.0, expected.1))
            .with_context("actual", format!("{}x{}", actual.0, actual.1)),
    )
}

/// Site bath correlation functions sampled on a uniform time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemBathInteraction {
    dt: f64,
    correlations: Vec<Vec<Complex64>>,
    site_pointer: Vec<usize>,
}

impl SystemBathInteraction {
    /// Correlation functions `C_k(j * dt)`; `site_pointer[n]` selects the
    /// function coupled to site `n`.
    pub fn new(
        dt: f64,
        correlations: Vec<Vec<Complex64>>,
        site_pointer: Vec<usize>,
    ) -> Result<Self, TwodError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TwodError::Axis(
                ErrorInfo::new("invalid-step", "correlation time step must be positive")
                    .with_context("dt", dt.to_string()),
            ));
        }
        let length = correlations.first().map(Vec::len).unwrap_or(0);
        if length == 0 || correlations.iter().any(|c| c.len() != length) {
            return Err(TwodError::TypeMismatch(ErrorInfo::new(
                "correlation-length",
                "correlation functions must be non-empty and of equal length",
            )));
        }
        if let Some(bad) = site_pointer.iter().find(|p| **p >= correlations.len()) {
            return Err(TwodError::TypeMismatch(
                ErrorInfo::new("site-pointer", "site points to a missing correlation function")
                    .with_context("pointer", bad.to_string())
                    .with_context("functions", correlations.len().to_string()),
            ));
        }
        Ok(Self {
            dt,
            correlations,
            site_pointer,
        })
    }

    /// Sampling step of the correlation functions.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Correlation function index of every site.
    pub fn site_pointer(&self) -> &[usize] {
        &self.site_pointer
    }

    /// Number of sites described.
    pub fn site_count(&self) -> usize {
        self.site_pointer.len()
    }

    /// Lineshape functions `g(t) = int_0^t dtau int_0^tau ds C(s)` by
    /// cumulative trapezoidal integration, one per correlation function.
    pub fn double_integral(&self) -> Vec<Vec<Complex64>> {
        self.correlations
            .iter()
            .map(|corr| cumulative_trapezoid(&cumulative_trapezoid(corr, self.dt), self.dt))
            .collect()
    }
}

fn cumulative_trapezoid(values: &[Complex64], dt: f64) -> Vec<Complex64> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc = Complex64::new(0.0, 0.0);
    out.push(acc);
    for pair in values.windows(2) {
        acc += (pair[0] + pair[1]) * (0.5 * dt);
        out.push(acc);
    }
    out
}

/// Single molecule. Two-dimensional spectra of molecules are not supported.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    /// Display name.
    pub name: String,
    /// Electronic state energies.
    pub energies: Vec<f64>,
}

/// Molecular aggregate with ground, one-exciton and two-exciton bands.
///
/// All operators are given over the full state space of dimension
/// `1 + N + N(N-1)/2` for `N` monomers, ground state first.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    nmono: usize,
    hamiltonian: DMatrix<f64>,
    dipoles: [DMatrix<f64>; 3],
    rate_matrix: DMatrix<f64>,
    bath: Option<SystemBathInteraction>,
}

impl Aggregate {
    /// Validates operator dimensions against the number of monomers.
    ///
    /// `dipoles` holds the x, y and z components of the transition dipole
    /// operator; `rate_matrix` the Redfield population rates in the
    /// eigenbasis of the Hamiltonian.
    pub fn new(
        nmono: usize,
        hamiltonian: DMatrix<f64>,
        dipoles: [DMatrix<f64>; 3],
        rate_matrix: DMatrix<f64>,
    ) -> Result<Self, TwodError> {
        if nmono == 0 {
            return Err(TwodError::TypeMismatch(ErrorInfo::new(
                "empty-aggregate",
                "aggregate needs at least one monomer",
            )));
        }
        let dim = Self::state_count(nmono);
        let expected = (dim, dim);
        if hamiltonian.shape() != expected {
            return Err(shape_error("hamiltonian", expected, hamiltonian.shape()));
        }
        for component in &dipoles {
            if component.shape() != expected {
                return Err(shape_error("transition dipole", expected, component.shape()));
            }
        }
        if rate_matrix.shape() != expected {
            return Err(shape_error("rate matrix", expected, rate_matrix.shape()));
        }
        Ok(Self {
            nmono,
            hamiltonian,
            dipoles,
            rate_matrix,
            bath: None,
        })
    }

    /// Attaches site bath correlation functions.
    pub fn with_bath(mut self, bath: SystemBathInteraction) -> Result<Self, TwodError> {
        if bath.site_count() != self.nmono {
            return Err(TwodError::TypeMismatch(
                ErrorInfo::new("site-count", "bath must describe every monomer")
                    .with_context("monomers", self.nmono.to_string())
                    .with_context("sites", bath.site_count().to_string()),
            ));
        }
        self.bath = Some(bath);
        Ok(self)
    }

    /// Dimension of the full state space for `nmono` monomers.
    pub fn state_count(nmono: usize) -> usize {
        Self::block_sizes_for(nmono).iter().sum()
    }

    fn block_sizes_for(nmono: usize) -> [usize; 3] {
        [1, nmono, nmono * nmono.saturating_sub(1) / 2]
    }

    /// Number of monomers.
    pub fn nmono(&self) -> usize {
        self.nmono
    }

    /// Sizes of the ground, one-exciton and two-exciton blocks.
    pub fn block_sizes(&self) -> [usize; 3] {
        Self::block_sizes_for(self.nmono)
    }

    /// Hamiltonian over the full state space.
    pub fn hamiltonian(&self) -> &DMatrix<f64> {
        &self.hamiltonian
    }

    /// x, y and z components of the transition dipole operator.
    pub fn transition_dipole_moment(&self) -> &[DMatrix<f64>; 3] {
        &self.dipoles
    }

    /// Redfield population rate matrix.
    pub fn redfield_rate_matrix(&self) -> &DMatrix<f64> {
        &self.rate_matrix
    }

    /// Bath correlation functions, if attached.
    pub fn system_bath_interaction(&self) -> Option<&SystemBathInteraction> {
        self.bath.as_ref()
    }
}

/// System whose spectrum is calculated.
#[derive(Debug, Clone, PartialEq)]
pub enum OpticalSystem {
    /// Single molecule.
    Molecule(Molecule),
    /// Molecular aggregate.
    Aggregate(Aggregate),
}

impl OpticalSystem {
    /// The aggregate, or `NotImplemented` for a single molecule.
    pub fn as_aggregate(&self) -> Result<&Aggregate, TwodError> {
        match self {
            OpticalSystem::Aggregate(agg) => Ok(agg),
            OpticalSystem::Molecule(mol) => Err(TwodError::NotImplemented(
                ErrorInfo::new("molecule-2d", "2D spectra of single molecules are not implemented")
                    .with_context("molecule", mol.name.clone())
                    .with_hint("describe the system as an aggregate"),
            )),
        }
    }
}

impl From<Aggregate> for OpticalSystem {
    fn from(value: Aggregate) -> Self {
        OpticalSystem::Aggregate(value)
    }
}

impl From<Molecule> for OpticalSystem {
    fn from(value: Molecule) -> Self {
        OpticalSystem::Molecule(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_integral_of_constant_is_quadratic() {
        let corr = vec![Complex64::new(2.0, 0.0); 11];
        let bath = SystemBathInteraction::new(0.5, vec![corr], vec![0]).unwrap();
        let g = bath.double_integral();
        // g(t) = C t^2 / 2 at t = 5
        assert!((g[0][10].re - 25.0).abs() < 1e-12);
        assert_eq!(g[0][0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn pointer_must_reference_existing_function() {
        let corr = vec![Complex64::new(1.0, 0.0); 4];
        assert!(SystemBathInteraction::new(1.0, vec![corr], vec![0, 1]).is_err());
    }
}
