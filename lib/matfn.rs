//! Functions of Hermitian matrices via eigendecomposition.

use ndarray as nd;
use ndarray_linalg::{ EighInto, UPLO };
use num_complex::Complex64 as C64;
use crate::error::FluxResult;

/// Compute `f(A)` for a Hermitian matrix `A` as `U f(Λ) U†`, where
/// `A = U Λ U†`.
///
/// Only the lower triangle of `A` is read.
pub fn funcm_hermitian<F>(A: nd::Array2<C64>, f: F)
    -> FluxResult<nd::Array2<C64>>
where F: Fn(f64) -> f64
{
    let (lambda, U) = A.eigh_into(UPLO::Lower)?;
    let f_lambda: nd::Array1<C64> = lambda.mapv(|l| C64::from(f(l)));
    // U f(Λ): scale each column by its eigenvalue's image
    let U_f: nd::Array2<C64> = &U * &f_lambda;
    Ok(U_f.dot(&U.t().mapv(|u| u.conj())))
}

/// Matrix cosine of a Hermitian matrix.
pub fn cosm_hermitian(A: nd::Array2<C64>) -> FluxResult<nd::Array2<C64>> {
    funcm_hermitian(A, f64::cos)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lc::position;

    fn max_dev(A: &nd::Array2<C64>, B: &nd::Array2<C64>) -> f64 {
        A.iter().zip(B.iter())
            .map(|(a, b)| (*a - *b).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn diagonal_input() {
        let d = nd::array![0.0, 0.5, -1.2, 3.0];
        let A: nd::Array2<C64> = nd::Array2::from_diag(&d.mapv(C64::from));
        let C = cosm_hermitian(A).unwrap();
        let expected: nd::Array2<C64>
            = nd::Array2::from_diag(&d.mapv(|x: f64| C64::from(x.cos())));
        assert!(max_dev(&C, &expected) < 1e-12);
    }

    #[test]
    fn pythagorean_identity() {
        let x = position(12) * 1.3 - nd::Array2::<C64>::eye(12) * 0.4;
        let C = cosm_hermitian(x.clone()).unwrap();
        let S = funcm_hermitian(x, f64::sin).unwrap();
        let one = C.dot(&C) + S.dot(&S);
        assert!(max_dev(&one, &nd::Array2::eye(12)) < 1e-10);
    }

    #[test]
    fn matches_power_series_for_small_matrix() {
        // cos(A) = I - A^2/2 + A^4/24 - ... for a matrix of small norm
        let A = position(6) * 0.02;
        let A2 = A.dot(&A);
        let A4 = A2.dot(&A2);
        let A6 = A4.dot(&A2);
        let series
            = nd::Array2::<C64>::eye(6) - &A2 * 0.5 + &A4 / 24.0 - &A6 / 720.0;
        let C = cosm_hermitian(A).unwrap();
        assert!(max_dev(&C, &series) < 1e-12);
    }
}
