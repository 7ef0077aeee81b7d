//! Ladder, flux, and charge operators in a truncated harmonic-oscillator
//! ("LC") basis.
//!
//! All matrices are `n × n` with basis index `k` labelling the `k`-th Fock
//! state of the oscillator formed by the inductive and charging energies
//! alone.

use std::f64::consts::FRAC_1_SQRT_2;
use ndarray as nd;
use num_complex::Complex64 as C64;

/// Annihilation operator of a harmonic oscillator truncated to `n` levels.
///
/// The only nonzero entries are `a[k - 1, k] = sqrt(k)`.
pub fn destroy(n: usize) -> nd::Array2<C64> {
    let mut a: nd::Array2<C64> = nd::Array2::zeros((n, n));
    (1..n).for_each(|k| { a[[k - 1, k]] = C64::from((k as f64).sqrt()); });
    a
}

/// Conjugate transpose of a matrix.
pub fn dagger(A: &nd::Array2<C64>) -> nd::Array2<C64> {
    A.t().mapv(|a| a.conj())
}

/// Dimensionless position operator `(a + a†) / sqrt(2)`.
pub fn position(n: usize) -> nd::Array2<C64> {
    let a = destroy(n);
    (&a + &dagger(&a)) * FRAC_1_SQRT_2
}

/// Dimensionless momentum operator `-i (a - a†) / sqrt(2)`.
pub fn momentum(n: usize) -> nd::Array2<C64> {
    let a = destroy(n);
    (&a - &dagger(&a)) * (-C64::i() * FRAC_1_SQRT_2)
}

/// Oscillator length of the LC circuit in units of the reduced flux quantum,
/// `(8 E_C / E_L)^(1/4)`.
pub fn flux_zpf(E_L: f64, E_C: f64) -> f64 {
    (8.0 * E_C / E_L).powf(0.25)
}

/// Charge scale of the LC circuit, `(E_L / 8 E_C)^(1/4)`; the reciprocal of
/// [`flux_zpf`].
pub fn charge_zpf(E_L: f64, E_C: f64) -> f64 {
    (E_L / (8.0 * E_C)).powf(0.25)
}

/// Builder for the LC-basis operators of a single circuit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LCBasis {
    pub E_L: f64,
    pub E_C: f64,
    pub nlev_lc: usize,
}

impl LCBasis {
    /// Create a new `LCBasis`.
    ///
    /// Positivity of the energies is not checked here; it is the job of the
    /// owner of the parameters.
    pub fn new(E_L: f64, E_C: f64, nlev_lc: usize) -> Self {
        Self { E_L, E_C, nlev_lc }
    }

    /// Number of basis states.
    pub fn dim(&self) -> usize { self.nlev_lc }

    /// Annihilation operator.
    pub fn b(&self) -> nd::Array2<C64> { destroy(self.nlev_lc) }

    /// Flux operator `φ`.
    pub fn phi(&self) -> nd::Array2<C64> {
        position(self.nlev_lc) * flux_zpf(self.E_L, self.E_C)
    }

    /// Charge operator `n`.
    pub fn n(&self) -> nd::Array2<C64> {
        momentum(self.nlev_lc) * charge_zpf(self.E_L, self.E_C)
    }

    /// Identity operator.
    pub fn eye(&self) -> nd::Array2<C64> { nd::Array2::eye(self.nlev_lc) }

    /// Oscillator frequency `sqrt(8 E_L E_C)` of the bare LC circuit.
    pub fn plasma_freq(&self) -> f64 { (8.0 * self.E_L * self.E_C).sqrt() }
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: C64, b: C64) -> bool { (a - b).norm() < 1e-12 }

    #[test]
    fn destroy_entries() {
        let a = destroy(4);
        for i in 0..4 {
            for j in 0..4 {
                let expected
                    = if j == i + 1 { (j as f64).sqrt() } else { 0.0 };
                assert!(close(a[[i, j]], C64::from(expected)));
            }
        }
        assert_eq!(destroy(1).shape(), &[1, 1]);
        assert!(close(destroy(1)[[0, 0]], C64::from(0.0)));
    }

    #[test]
    fn number_operator() {
        let a = destroy(6);
        let num = dagger(&a).dot(&a);
        for k in 0..6 {
            assert!(close(num[[k, k]], C64::from(k as f64)));
        }
    }

    #[test]
    fn quadratures_are_hermitian() {
        let x = position(7);
        let p = momentum(7);
        assert!(x.iter().zip(dagger(&x).iter()).all(|(u, v)| close(*u, *v)));
        assert!(p.iter().zip(dagger(&p).iter()).all(|(u, v)| close(*u, *v)));
        // canonical commutator holds away from the truncation edge
        let comm = x.dot(&p) - p.dot(&x);
        for k in 0..6 {
            assert!(close(comm[[k, k]], C64::i()));
        }
    }

    #[test]
    fn scaled_operators() {
        let lc = LCBasis::new(2.0, 0.25, 5);
        assert!((flux_zpf(2.0, 0.25) - 1.0).abs() < 1e-15);
        assert!((flux_zpf(1.0, 1.0) * charge_zpf(1.0, 1.0) - 1.0).abs() < 1e-15);
        let phi = lc.phi();
        assert!(close(phi[[0, 1]], C64::from(FRAC_1_SQRT_2)));
        let n = lc.n();
        assert!(close(n[[0, 1]], -C64::i() * FRAC_1_SQRT_2));
        assert!(close(n[[1, 0]], C64::i() * FRAC_1_SQRT_2));
        assert_eq!(lc.eye().diag().sum(), C64::from(5.0));
        assert!((lc.plasma_freq() - 2.0).abs() < 1e-15);
    }
}
