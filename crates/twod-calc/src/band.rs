//! Band-resolved description of an aggregate in its excitonic eigenbasis.

use nalgebra::{DMatrix, SymmetricEigen, Vector3};
use twod_core::errors::TwodError;
use twod_core::Complex64;

use crate::system::Aggregate;

/// Eigen-decomposition of one Hamiltonian block with ascending eigenvalues.
fn sorted_eigen(block: DMatrix<f64>) -> (Vec<f64>, DMatrix<f64>) {
    let n = block.nrows();
    if n == 0 {
        return (Vec::new(), DMatrix::zeros(0, 0));
    }
    let eigen = SymmetricEigen::new(block);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| eigen.eigenvalues[*a].total_cmp(&eigen.eigenvalues[*b]));
    let values = order.iter().map(|idx| eigen.eigenvalues[*idx]).collect();
    let vectors = DMatrix::from_fn(n, n, |row, col| eigen.eigenvectors[(row, order[col])]);
    (values, vectors)
}

/// Aggregate in the eigenbasis of each band, with everything the pathway
/// engines need: energies, dipoles, one-exciton rates and lineshapes.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSystem {
    block_sizes: [usize; 3],
    energies: Vec<f64>,
    dge: Vec<Vector3<f64>>,
    def: Vec<Vec<Vector3<f64>>>,
    relaxation: DMatrix<f64>,
    transcoef1: DMatrix<f64>,
    transcoef2: DMatrix<f64>,
    gofts: Vec<Vec<Complex64>>,
    site_pointer: Vec<usize>,
    goft_dt: f64,
}

impl BandSystem {
    /// Diagonalises the one- and two-exciton blocks of `agg` separately and
    /// transforms its dipoles into the eigenbasis.
    pub fn from_aggregate(agg: &Aggregate) -> Result<Self, TwodError> {
        let [n0, n1, n2] = agg.block_sizes();
        let h = agg.hamiltonian();
        let (e1, s1) = sorted_eigen(h.view((n0, n0), (n1, n1)).into_owned());
        let (e2, s2) = sorted_eigen(h.view((n0 + n1, n0 + n1), (n2, n2)).into_owned());

        let mut energies = Vec::with_capacity(n0 + n1 + n2);
        energies.push(h[(0, 0)]);
        energies.extend(e1);
        energies.extend(e2);

        let dipoles = agg.transition_dipole_moment();
        let ge: Vec<DMatrix<f64>> = dipoles
            .iter()
            .map(|d| d.view((0, n0), (1, n1)) * &s1)
            .collect();
        let dge = (0..n1)
            .map(|a| Vector3::new(ge[0][(0, a)], ge[1][(0, a)], ge[2][(0, a)]))
            .collect();
        let ef: Vec<DMatrix<f64>> = dipoles
            .iter()
            .map(|d| s1.transpose() * d.view((n0, n0 + n1), (n1, n2)) * &s2)
            .collect();
        let def = (0..n1)
            .map(|a| {
                (0..n2)
                    .map(|f| Vector3::new(ef[0][(a, f)], ef[1][(a, f)], ef[2][(a, f)]))
                    .collect()
            })
            .collect();

        let relaxation = agg
            .redfield_rate_matrix()
            .view((n0, n0), (n1, n1))
            .into_owned();

        let (gofts, site_pointer, goft_dt) = match agg.system_bath_interaction() {
            Some(bath) => (
                bath.double_integral(),
                bath.site_pointer().to_vec(),
                bath.dt(),
            ),
            None => (Vec::new(), Vec::new(), 1.0),
        };

        Ok(Self {
            block_sizes: [n0, n1, n2],
            energies,
            dge,
            def,
            relaxation,
            transcoef1: s1,
            transcoef2: s2,
            gofts,
            site_pointer,
            goft_dt,
        })
    }

    /// Sizes of the ground, one-exciton and two-exciton bands.
    pub fn block_sizes(&self) -> [usize; 3] {
        self.block_sizes
    }

    /// Number of one-exciton states.
    pub fn single_count(&self) -> usize {
        self.block_sizes[1]
    }

    /// Number of two-exciton states.
    pub fn double_count(&self) -> usize {
        self.block_sizes[2]
    }

    /// Eigenenergies, ground state first, each band ascending.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Transition frequency of one-exciton state `a`.
    pub fn omega_single(&self, a: usize) -> f64 {
        self.energies[1 + a] - self.energies[0]
    }

    /// Transition frequency of two-exciton state `f`.
    pub fn omega_double(&self, f: usize) -> f64 {
        self.energies[1 + self.block_sizes[1] + f] - self.energies[0]
    }

    /// Ground to one-exciton dipole of state `a`.
    pub fn dge(&self, a: usize) -> &Vector3<f64> {
        &self.dge[a]
    }

    /// One-exciton `a` to two-exciton `f` dipole.
    pub fn def(&self, a: usize, f: usize) -> &Vector3<f64> {
        &self.def[a][f]
    }

    /// One-exciton block of the rate matrix.
    pub fn relaxation(&self) -> &DMatrix<f64> {
        &self.relaxation
    }

    /// Total depopulation rate of one-exciton state `a`.
    pub fn lifetime_rate(&self, a: usize) -> f64 {
        (-self.relaxation[(a, a)]).max(0.0)
    }

    /// One-exciton eigenvectors in the site basis (columns).
    pub fn transcoef1(&self) -> &DMatrix<f64> {
        &self.transcoef1
    }

    /// Two-exciton eigenvectors in the pair basis (columns).
    pub fn transcoef2(&self) -> &DMatrix<f64> {
        &self.transcoef2
    }

    /// Whether lineshape functions are available.
    pub fn has_lineshapes(&self) -> bool {
        !self.gofts.is_empty()
    }

    fn site_goft(&self, site: usize, t: f64) -> Complex64 {
        let goft = &self.gofts[self.site_pointer[site]];
        let idx = ((t / self.goft_dt).round().max(0.0) as usize).min(goft.len() - 1);
        goft[idx]
    }

    /// Lineshape function of one-exciton state `a` for uncorrelated site
    /// baths: `sum_n |c_na|^4 g_n(t)`.
    pub fn goft_single(&self, a: usize, t: f64) -> Complex64 {
        if !self.has_lineshapes() {
            return Complex64::new(0.0, 0.0);
        }
        (0..self.block_sizes[1])
            .map(|n| self.site_goft(n, t) * self.transcoef1[(n, a)].powi(4))
            .sum()
    }

    /// Lineshape function of two-exciton state `f`. Pair states are ordered
    /// `(0,1), (0,2), ..., (1,2), ...`.
    pub fn goft_double(&self, f: usize, t: f64) -> Complex64 {
        if !self.has_lineshapes() {
            return Complex64::new(0.0, 0.0);
        }
        let n = self.block_sizes[1];
        let mut total = Complex64::new(0.0, 0.0);
        let mut pair = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = self.transcoef2[(pair, f)].powi(4);
                total += (self.site_goft(i, t) + self.site_goft(j, t)) * weight;
                pair += 1;
            }
        }
        total
    }
}
