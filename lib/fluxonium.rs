//! The fluxonium qubit: parameters, cached spectrum, and operators in its
//! eigenbasis.

use std::{ cell::RefCell, f64::consts::PI, fmt, path::Path };
use ndarray::{ self as nd, s };
use num_complex::Complex64 as C64;
use crate::{
    error::{ FluxoniumError, FluxResult },
    hamiltonian::HBuilderFluxonium,
    lc::{ LCBasis, flux_zpf },
    params::{ self, FluxoniumParams },
    realspace::{ FluxPoints, Profile, eval_profile, ho_wavefunctions, potential_at },
    spectrum::SpectrumCache,
};

/// A superconducting fluxonium qubit.
///
/// The Hamiltonian is diagonalized in an LC basis of `nlev_lc` states the
/// first time any spectrum-dependent quantity is requested, and the result is
/// kept until a parameter changes. Every setter of `E_L`, `E_C`, `E_J`,
/// `phi_ext`, or `nlev_lc` drops the cached spectrum, even if the new value is
/// equal to the old one.
///
/// The cache sits behind a [`RefCell`], so queries take `&self` but a single
/// `Fluxonium` cannot be shared between threads without external locking.
///
/// Level indices start from 0 (ground state). Operations that build
/// eigenbasis matrices take an optional truncation size that defaults to
/// [`Self::nlev`] and must lie in `[1, nlev_lc]`.
#[derive(Clone, Debug)]
pub struct Fluxonium {
    params: FluxoniumParams,
    spectrum: RefCell<SpectrumCache>,
}

impl fmt::Display for Fluxonium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let FluxoniumParams { E_L, E_C, E_J, phi_ext, units, .. }
            = &self.params;
        write!(
            f,
            "A fluxonium qubit with E_L = {} {}, E_C = {} {}, and E_J = {} {}. \
            The external phase shift is phi_ext/pi = {}.",
            E_L, units, E_C, units, E_J, units, phi_ext / PI,
        )
    }
}

impl Fluxonium {
    /// Create a new `Fluxonium` with default values for everything except the
    /// three energies (see [`FluxoniumParams::new`]).
    pub fn new(E_L: f64, E_C: f64, E_J: f64) -> FluxResult<Self> {
        Self::from_params(FluxoniumParams::new(E_L, E_C, E_J))
    }

    /// Create a new `Fluxonium` from a full set of parameters.
    pub fn from_params(params: FluxoniumParams) -> FluxResult<Self> {
        params.validate()?;
        Ok(Self { params, spectrum: RefCell::new(SpectrumCache::new()) })
    }

    /// Create a new `Fluxonium` from a TOML document; see
    /// [`FluxoniumParams::from_toml_str`].
    pub fn from_toml_str(src: &str) -> FluxResult<Self> {
        Self::from_params(FluxoniumParams::from_toml_str(src)?)
    }

    /// Create a new `Fluxonium` from a TOML file; see
    /// [`FluxoniumParams::from_toml_file`].
    pub fn from_toml_file<P>(path: P) -> FluxResult<Self>
    where P: AsRef<Path>
    {
        Self::from_params(FluxoniumParams::from_toml_file(path)?)
    }

    fn invalidate(&mut self) { self.spectrum.get_mut().reset(); }

    /* parameters *************************************************************/

    /// Get all parameters.
    pub fn params(&self) -> &FluxoniumParams { &self.params }

    /// Replace all parameters at once.
    ///
    /// Nothing is changed if any value is invalid. Invalidates the cached
    /// spectrum.
    pub fn set_params(&mut self, params: FluxoniumParams) -> FluxResult<()> {
        params.validate()?;
        self.params = params;
        self.invalidate();
        Ok(())
    }

    /// Inductive energy.
    pub fn E_L(&self) -> f64 { self.params.E_L }

    /// Set the inductive energy, which must be positive.
    ///
    /// Invalidates the cached spectrum.
    pub fn set_E_L(&mut self, E_L: f64) -> FluxResult<()> {
        params::check_E_L(E_L)?;
        self.params.E_L = E_L;
        self.invalidate();
        Ok(())
    }

    /// Charging energy.
    pub fn E_C(&self) -> f64 { self.params.E_C }

    /// Set the charging energy, which must be positive.
    ///
    /// Invalidates the cached spectrum.
    pub fn set_E_C(&mut self, E_C: f64) -> FluxResult<()> {
        params::check_E_C(E_C)?;
        self.params.E_C = E_C;
        self.invalidate();
        Ok(())
    }

    /// Josephson energy.
    pub fn E_J(&self) -> f64 { self.params.E_J }

    /// Set the Josephson energy, which must be finite. A non-positive value is
    /// accepted, but logged as a warning.
    ///
    /// Invalidates the cached spectrum.
    pub fn set_E_J(&mut self, E_J: f64) -> FluxResult<()> {
        params::check_E_J(E_J)?;
        params::warn_E_J(E_J);
        self.params.E_J = E_J;
        self.invalidate();
        Ok(())
    }

    /// External phase bias.
    pub fn phi_ext(&self) -> f64 { self.params.phi_ext }

    /// Set the external phase bias, which must be finite.
    ///
    /// Invalidates the cached spectrum.
    pub fn set_phi_ext(&mut self, phi_ext: f64) -> FluxResult<()> {
        params::check_phi_ext(phi_ext)?;
        self.params.phi_ext = phi_ext;
        self.invalidate();
        Ok(())
    }

    /// Default number of eigenstates in eigenbasis operators.
    pub fn nlev(&self) -> usize { self.params.nlev }

    /// Set the default number of eigenstates in eigenbasis operators, which
    /// must be positive.
    ///
    /// Values above `nlev_lc` are accepted here and rejected by the operations
    /// that use them. Does not touch the cached spectrum.
    pub fn set_nlev(&mut self, nlev: usize) -> FluxResult<()> {
        params::check_nlev(nlev)?;
        self.params.nlev = nlev;
        Ok(())
    }

    /// Number of LC basis states used for diagonalization.
    pub fn nlev_lc(&self) -> usize { self.params.nlev_lc }

    /// Set the number of LC basis states, which must be positive.
    ///
    /// Invalidates the cached spectrum.
    pub fn set_nlev_lc(&mut self, nlev_lc: usize) -> FluxResult<()> {
        params::check_nlev_lc(nlev_lc)?;
        self.params.nlev_lc = nlev_lc;
        self.invalidate();
        Ok(())
    }

    /// Energy unit label.
    pub fn units(&self) -> &str { &self.params.units }

    /// Set the energy unit label.
    pub fn set_units<S>(&mut self, units: S)
    where S: Into<String>
    {
        self.params.units = units.into();
    }

    /* LC basis ***************************************************************/

    /// Hamiltonian builder for the current parameters.
    pub fn builder(&self) -> HBuilderFluxonium {
        HBuilderFluxonium::from_params(&self.params)
    }

    /// LC basis for the current parameters.
    pub fn lc_basis(&self) -> LCBasis {
        LCBasis::new(self.params.E_L, self.params.E_C, self.params.nlev_lc)
    }

    /// Annihilation operator in the LC basis.
    pub fn b_lc(&self) -> nd::Array2<C64> { self.lc_basis().b() }

    /// Flux operator in the LC basis.
    pub fn phi_lc(&self) -> nd::Array2<C64> { self.lc_basis().phi() }

    /// Charge operator in the LC basis.
    pub fn n_lc(&self) -> nd::Array2<C64> { self.lc_basis().n() }

    /// Qubit Hamiltonian in the LC basis.
    pub fn hamiltonian_lc(&self) -> FluxResult<nd::Array2<C64>> {
        self.builder().gen_static()
    }

    /* spectrum ***************************************************************/

    /// Eigenvalues and, if `with_vectors` is `true`, eigenvectors (as columns)
    /// of the LC-basis Hamiltonian.
    ///
    /// Cached eigenvalues are returned directly when eigenvectors are not
    /// needed. If eigenvectors are needed but not cached, both are recomputed.
    pub fn eigenspectrum_lc(&self, with_vectors: bool)
        -> FluxResult<(nd::Array1<f64>, Option<nd::Array2<C64>>)>
    {
        if with_vectors {
            self.with_eigensystem(|E, V| Ok((E.clone(), Some(V.clone()))))
        } else {
            self.with_eigenvalues(|E| (E.clone(), None))
        }
    }

    /// Number of times this qubit's Hamiltonian has been diagonalized.
    pub fn num_diagonalizations(&self) -> usize {
        self.spectrum.borrow().num_diagonalizations()
    }

    fn with_eigenvalues<T, F>(&self, f: F) -> FluxResult<T>
    where F: FnOnce(&nd::Array1<f64>) -> T
    {
        let builder = self.builder();
        let mut cache = self.spectrum.borrow_mut();
        let res = cache.eigenvalues(&builder).map(f);
        res
    }

    fn with_eigensystem<T, F>(&self, f: F) -> FluxResult<T>
    where F: FnOnce(&nd::Array1<f64>, &nd::Array2<C64>) -> FluxResult<T>
    {
        let builder = self.builder();
        let mut cache = self.spectrum.borrow_mut();
        let res = cache.eigensystem(&builder).and_then(|(E, V)| f(E, V));
        res
    }

    fn resolve_nlev(&self, nlev: Option<usize>) -> FluxResult<usize> {
        let nlev = nlev.unwrap_or(self.params.nlev);
        if nlev < 1 || nlev > self.params.nlev_lc {
            return Err(FluxoniumError::out_of_bounds(
                format!(
                    "`nlev` = {} is outside [1, {}]",
                    nlev, self.params.nlev_lc,
                )
            ));
        }
        Ok(nlev)
    }

    fn check_level(&self, level: usize) -> FluxResult<()> {
        if level >= self.params.nlev_lc {
            return Err(FluxoniumError::out_of_bounds(
                format!(
                    "level {} is outside [0, {})",
                    level, self.params.nlev_lc,
                )
            ));
        }
        Ok(())
    }

    // matrix elements and wavefunctions accept `nlev_lc` itself here; see
    // `eigvec_column` for what happens to it
    fn check_level_inclusive(&self, level: usize) -> FluxResult<()> {
        if level > self.params.nlev_lc {
            return Err(FluxoniumError::out_of_bounds(
                format!(
                    "level index {} is outside [0, {}]",
                    level, self.params.nlev_lc,
                )
            ));
        }
        Ok(())
    }

    /// Energies of the lowest `nlev` eigenstates in ascending order.
    pub fn levels(&self, nlev: Option<usize>) -> FluxResult<nd::Array1<f64>> {
        let nlev = self.resolve_nlev(nlev)?;
        self.with_eigenvalues(|E| E.slice(s![..nlev]).to_owned())
    }

    /// Energy of a single eigenstate.
    pub fn level(&self, level_ind: usize) -> FluxResult<f64> {
        self.check_level(level_ind)?;
        self.with_eigenvalues(|E| E[level_ind])
    }

    /// Transition energy `E[level2] - E[level1]`, positive if `level1` lies
    /// below `level2`.
    pub fn transition_energy(&self, level1: usize, level2: usize)
        -> FluxResult<f64>
    {
        Ok(self.level(level2)? - self.level(level1)?)
    }

    /// Eigenvector of a single eigenstate in the LC basis.
    pub fn eigenvector(&self, level_ind: usize)
        -> FluxResult<nd::Array1<C64>>
    {
        self.check_level(level_ind)?;
        self.with_eigensystem(|_, V| Ok(V.column(level_ind).to_owned()))
    }

    /// Ground state energy and eigenvector in the LC basis.
    pub fn ground_state(&self) -> FluxResult<(f64, nd::Array1<C64>)> {
        self.with_eigensystem(|E, V| Ok((E[0], V.column(0).to_owned())))
    }

    /* eigenbasis operators ***************************************************/

    /// Hamiltonian in the qubit eigenbasis: a diagonal matrix of the lowest
    /// `nlev` energies.
    pub fn hamiltonian_matrix(&self, nlev: Option<usize>)
        -> FluxResult<nd::Array2<C64>>
    {
        let E = self.levels(nlev)?;
        Ok(nd::Array2::from_diag(&E.mapv(C64::from)))
    }

    /// Identity operator in the qubit eigenbasis.
    pub fn identity_matrix(&self, nlev: Option<usize>)
        -> FluxResult<nd::Array2<C64>>
    {
        let nlev = self.resolve_nlev(nlev)?;
        Ok(nd::Array2::eye(nlev))
    }

    /// Flux operator in the qubit eigenbasis.
    pub fn flux_matrix(&self, nlev: Option<usize>)
        -> FluxResult<nd::Array2<C64>>
    {
        let nlev = self.resolve_nlev(nlev)?;
        self.project(&self.phi_lc(), nlev)
    }

    /// Charge operator in the qubit eigenbasis.
    pub fn charge_matrix(&self, nlev: Option<usize>)
        -> FluxResult<nd::Array2<C64>>
    {
        let nlev = self.resolve_nlev(nlev)?;
        self.project(&self.n_lc(), nlev)
    }

    /// Flux matrix element `<level1|φ|level2>`.
    pub fn flux_element(&self, level1: usize, level2: usize)
        -> FluxResult<C64>
    {
        self.element(&self.phi_lc(), level1, level2)
    }

    /// Charge matrix element `<level1|n|level2>`.
    pub fn charge_element(&self, level1: usize, level2: usize)
        -> FluxResult<C64>
    {
        self.element(&self.n_lc(), level1, level2)
    }

    // V_n† O V_n for the first `nlev` eigenvectors V_n
    fn project(&self, op_lc: &nd::Array2<C64>, nlev: usize)
        -> FluxResult<nd::Array2<C64>>
    {
        self.with_eigensystem(|_, V| {
            let V_n = V.slice(s![.., ..nlev]);
            let V_n_dag: nd::Array2<C64> = V_n.t().mapv(|v| v.conj());
            Ok(V_n_dag.dot(&op_lc.dot(&V_n)))
        })
    }

    fn element(&self, op_lc: &nd::Array2<C64>, level1: usize, level2: usize)
        -> FluxResult<C64>
    {
        self.check_level_inclusive(level1)?;
        self.check_level_inclusive(level2)?;
        self.with_eigensystem(|_, V| {
            let bra = eigvec_column(V, level1)?.mapv(|v| v.conj());
            let ket = eigvec_column(V, level2)?;
            Ok(bra.dot(&op_lc.dot(&ket)))
        })
    }

    /* real space *************************************************************/

    /// Potential energy `E_L φ^2 / 2 - E_J cos(φ - φ_ext)` as a function of
    /// flux.
    ///
    /// With no points given, the potential is evaluated over the default grid
    /// and returned together with it as [`Profile::Sampled`]; otherwise the
    /// result has the shape of the input.
    pub fn potential(&self, phi_points: Option<FluxPoints>)
        -> FluxResult<Profile>
    {
        let FluxoniumParams { E_L, E_J, phi_ext, .. } = self.params;
        eval_profile(
            phi_points.as_ref(),
            |phi| potential_at(E_L, E_J, phi_ext, phi),
        )
    }

    /// Flux-space wavefunction of an eigenstate,
    /// ```text
    /// ψ(φ) = Σ_k Re(c_k) ψ_k(φ)
    /// ```
    /// where `c_k` are the LC-basis components of the eigenvector and `ψ_k`
    /// the LC oscillator's basis functions.
    ///
    /// Points are handled as in [`Self::potential`].
    pub fn wavefunction(&self, level_ind: usize, phi_points: Option<FluxPoints>)
        -> FluxResult<Profile>
    {
        self.check_level_inclusive(level_ind)?;
        if let Some(points) = phi_points.as_ref() { points.validate()?; }
        let coeffs: Vec<f64>
            = self.with_eigensystem(|_, V| {
                Ok(eigvec_column(V, level_ind)?.iter().map(|c| c.re).collect())
            })?;
        let FluxoniumParams { E_L, E_C, nlev_lc, .. } = self.params;
        let ratio = flux_zpf(E_L, E_C);
        eval_profile(
            phi_points.as_ref(),
            |phi| {
                ho_wavefunctions(nlev_lc, ratio, phi).iter()
                    .zip(coeffs.iter())
                    .map(|(psi_k, c_k)| c_k * psi_k)
                    .sum()
            },
        )
    }
}

// inclusive-bound accessors can ask for column `nlev_lc`, which does not exist
fn eigvec_column(V: &nd::Array2<C64>, level: usize)
    -> FluxResult<nd::ArrayView1<'_, C64>>
{
    if level >= V.ncols() {
        return Err(FluxoniumError::out_of_bounds(
            format!(
                "no eigenstate with index {}; the LC basis has {} states",
                level, V.ncols(),
            )
        ));
    }
    Ok(V.column(level))
}
