//! Lazily computed, explicitly invalidated eigen-decomposition of a
//! Hamiltonian.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ error::FluxResult, hamiltonian::HBuilderFluxonium };

/// Memoized eigenvalues and (optionally) eigenvectors of a
/// [`HBuilderFluxonium`] Hamiltonian.
///
/// The cache does not know which parameters it was computed for; its owner
/// must call [`Self::reset`] whenever they change. Eigenvalues are always
/// ascending and eigenvector `k` (column `k`) belongs to eigenvalue `k`.
#[derive(Clone, Debug, Default)]
pub struct SpectrumCache {
    eigvals: Option<nd::Array1<f64>>,
    eigvecs: Option<nd::Array2<C64>>,
    num_diag: usize,
}

impl SpectrumCache {
    /// Create a new, empty cache.
    pub fn new() -> Self { Self::default() }

    /// Drop all cached data.
    pub fn reset(&mut self) {
        if self.eigvals.is_some() {
            log::debug!("spectrum cache invalidated");
        }
        self.eigvals = None;
        self.eigvecs = None;
    }

    /// Number of diagonalizations performed over the lifetime of the cache,
    /// including eigenvalue-only ones.
    pub fn num_diagonalizations(&self) -> usize { self.num_diag }

    /// Get the eigenvalues, computing them (without eigenvectors) if nothing
    /// is cached.
    pub fn eigenvalues(&mut self, builder: &HBuilderFluxonium)
        -> FluxResult<&nd::Array1<f64>>
    {
        let E
            = match self.eigvals.take() {
                Some(E) => {
                    log::trace!("spectrum cache hit (values)");
                    E
                },
                None => {
                    log::debug!(
                        "computing eigenvalues in a {}-state LC basis",
                        builder.basis().dim(),
                    );
                    self.num_diag += 1;
                    builder.eigenvalues()?
                },
            };
        Ok(&*self.eigvals.insert(E))
    }

    /// Get eigenvalues and eigenvectors, recomputing both if eigenvectors are
    /// not cached.
    pub fn eigensystem(&mut self, builder: &HBuilderFluxonium)
        -> FluxResult<(&nd::Array1<f64>, &nd::Array2<C64>)>
    {
        let (E, V)
            = match (self.eigvals.take(), self.eigvecs.take()) {
                (Some(E), Some(V)) => {
                    log::trace!("spectrum cache hit (values and vectors)");
                    (E, V)
                },
                (E_old, _) => {
                    log::debug!(
                        "diagonalizing a {}-state LC basis Hamiltonian",
                        builder.basis().dim(),
                    );
                    self.num_diag += 1;
                    match builder.diagonalize() {
                        Ok(EV) => EV,
                        Err(err) => {
                            self.eigvals = E_old;
                            return Err(err);
                        },
                    }
                },
            };
        let E: &nd::Array1<f64> = self.eigvals.insert(E);
        let V: &nd::Array2<C64> = self.eigvecs.insert(V);
        Ok((E, V))
    }
}
