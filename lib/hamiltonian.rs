//! Assembly and diagonalization of the fluxonium Hamiltonian in the LC basis.

use ndarray as nd;
use ndarray_linalg::{ EigValshInto, EighInto, UPLO };
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    error::FluxResult,
    lc::LCBasis,
    matfn::cosm_hermitian,
    params::FluxoniumParams,
};

/// Hamiltonian builder for a single fluxonium in a truncated LC basis.
///
/// ```text
/// H = 4 E_C n^2 + E_L φ^2 / 2 - E_J cos(φ - φ_ext)
/// ```
/// where `cos` is the matrix cosine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HBuilderFluxonium {
    pub(crate) lc: LCBasis,
    pub E_J: f64,
    pub phi_ext: f64,
}

impl HBuilderFluxonium {
    /// Create a new `HBuilderFluxonium`.
    pub fn new(E_L: f64, E_C: f64, E_J: f64, phi_ext: f64, nlev_lc: usize)
        -> Self
    {
        Self { lc: LCBasis::new(E_L, E_C, nlev_lc), E_J, phi_ext }
    }

    /// Create a new `HBuilderFluxonium` from a full set of parameters.
    pub fn from_params(params: &FluxoniumParams) -> Self {
        Self::new(
            params.E_L, params.E_C, params.E_J, params.phi_ext, params.nlev_lc)
    }

    /// Get a reference to the LC basis.
    pub fn basis(&self) -> &LCBasis { &self.lc }

    /// Build the Hamiltonian matrix.
    pub fn gen_static(&self) -> FluxResult<nd::Array2<C64>> {
        let LCBasis { E_L, E_C, nlev_lc } = self.lc;
        let phi = self.lc.phi();
        let n = self.lc.n();
        let delta_phi
            = &phi - &(nd::Array2::<C64>::eye(nlev_lc) * self.phi_ext);
        let cos_phi = cosm_hermitian(delta_phi)?;
        let H: nd::Array2<C64>
            = n.dot(&n) * (4.0 * E_C)
            + phi.dot(&phi) * (0.5 * E_L)
            - cos_phi * self.E_J;
        Ok(H)
    }

    /// Compute only the eigenvalues of the Hamiltonian, in ascending order.
    pub fn eigenvalues(&self) -> FluxResult<nd::Array1<f64>> {
        Ok(self.gen_static()?.eigvalsh_into(UPLO::Lower)?)
    }

    /// Diagonalize the Hamiltonian.
    ///
    /// Eigenvalues are returned in ascending order and eigenvectors as the
    /// corresponding columns of the second array, each with unit norm and a
    /// global phase chosen such that its largest-magnitude component is real
    /// and positive.
    pub fn diagonalize(&self)
        -> FluxResult<(nd::Array1<f64>, nd::Array2<C64>)>
    {
        let (E, mut V) = self.gen_static()?.eigh_into(UPLO::Lower)?;
        fix_gauge(&mut V);
        Ok((E, V))
    }
}

/// Rotate each column of `V` by a global phase so that its largest-magnitude
/// entry is real and positive.
pub(crate) fn fix_gauge(V: &mut nd::Array2<C64>) {
    for mut col in V.columns_mut() {
        let pivot: C64
            = col.iter()
            .copied()
            .fold(C64::zero(), |acc, c| {
                if c.norm() > acc.norm() { c } else { acc }
            });
        let r = pivot.norm();
        if r > 0.0 {
            let phase = pivot.conj() / r;
            col.mapv_inplace(|c| c * phase);
        }
    }
}
