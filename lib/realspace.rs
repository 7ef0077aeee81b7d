//! Functions of the continuous flux variable: the fluxonium potential and
//! harmonic-oscillator basis functions used to reconstruct wavefunctions.

use std::f64::consts::PI;
use ndarray as nd;
use crate::error::{ FluxoniumError, FluxResult };

/// Number of points in the default flux grid.
pub const DEF_NPOINTS: usize = 201;

/// The default flux grid: [`DEF_NPOINTS`] evenly spaced points over `[-π, π]`.
pub fn default_grid() -> nd::Array1<f64> {
    nd::Array1::linspace(-PI, PI, DEF_NPOINTS)
}

/// Flux value(s) at which to evaluate a function of the flux variable.
#[derive(Clone, Debug, PartialEq)]
pub enum FluxPoints {
    Scalar(f64),
    Array(nd::Array1<f64>),
}

impl From<f64> for FluxPoints {
    fn from(x: f64) -> Self { Self::Scalar(x) }
}

impl From<i32> for FluxPoints {
    fn from(x: i32) -> Self { Self::Scalar(f64::from(x)) }
}

impl From<nd::Array1<f64>> for FluxPoints {
    fn from(x: nd::Array1<f64>) -> Self { Self::Array(x) }
}

impl From<Vec<f64>> for FluxPoints {
    fn from(x: Vec<f64>) -> Self { Self::Array(x.into()) }
}

impl From<&[f64]> for FluxPoints {
    fn from(x: &[f64]) -> Self { Self::Array(x.iter().copied().collect()) }
}

impl FluxPoints {
    /// Check that there is at least one point and that all points are finite.
    pub fn validate(&self) -> FluxResult<()> {
        match self {
            Self::Scalar(x) if !x.is_finite() => {
                Err(FluxoniumError::invalid_input(
                    format!("flux value must be finite, got {}", x)
                ))
            },
            Self::Array(x) if x.is_empty() => {
                Err(FluxoniumError::invalid_input("empty flux array"))
            },
            Self::Array(x) if x.iter().any(|xk| !xk.is_finite()) => {
                Err(FluxoniumError::invalid_input(
                    "flux array contains non-finite values"
                ))
            },
            _ => Ok(()),
        }
    }

    /// Evaluate `f` at each point, keeping the shape of the input.
    pub fn map<F>(&self, f: F) -> Profile
    where F: Fn(f64) -> f64
    {
        match self {
            Self::Scalar(x) => Profile::Scalar(f(*x)),
            Self::Array(x) => Profile::Array(x.mapv(f)),
        }
    }
}

/// Result of evaluating a function of the flux variable.
#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    /// Evaluation over the [default grid][default_grid], returned with the
    /// grid itself.
    Sampled {
        points: nd::Array1<f64>,
        values: nd::Array1<f64>,
    },
    /// Evaluation at a single caller-supplied point.
    Scalar(f64),
    /// Evaluation over a caller-supplied array of points.
    Array(nd::Array1<f64>),
}

impl Profile {
    /// Return the grid points if `self` is [`Self::Sampled`].
    pub fn points(&self) -> Option<&nd::Array1<f64>> {
        match self {
            Self::Sampled { points, .. } => Some(points),
            _ => None,
        }
    }

    /// Return the single value if `self` is [`Self::Scalar`].
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Return all values as a 1D array; a scalar becomes a length-1 array.
    pub fn into_values(self) -> nd::Array1<f64> {
        match self {
            Self::Sampled { values, .. } => values,
            Self::Scalar(v) => nd::array![v],
            Self::Array(values) => values,
        }
    }
}

/// Evaluate `f` at the given points, or over the default grid if none are
/// given.
pub(crate) fn eval_profile<F>(phi_points: Option<&FluxPoints>, f: F)
    -> FluxResult<Profile>
where F: Fn(f64) -> f64
{
    match phi_points {
        Some(points) => {
            points.validate()?;
            Ok(points.map(f))
        },
        None => {
            let points = default_grid();
            let values = points.mapv(f);
            Ok(Profile::Sampled { points, values })
        },
    }
}

/// Fluxonium potential `E_L φ^2 / 2 - E_J cos(φ - φ_ext)`.
pub fn potential_at(E_L: f64, E_J: f64, phi_ext: f64, phi: f64) -> f64 {
    0.5 * E_L * phi.powi(2) - E_J * (phi - phi_ext).cos()
}

/// Physicists' Hermite polynomial `H_l(x)`.
pub fn hermite(l: usize, x: f64) -> f64 {
    let mut h_prev: f64 = 1.0;
    if l == 0 { return h_prev; }
    let mut h: f64 = 2.0 * x;
    for k in 1..l {
        let h_next = 2.0 * x * h - 2.0 * (k as f64) * h_prev;
        h_prev = h;
        h = h_next;
    }
    h
}

/// Harmonic-oscillator basis functions `ψ_0(φ), ..., ψ_{nmax - 1}(φ)` for
/// oscillator length `ratio`.
///
/// Equivalent to
/// ```text
/// ψ_l(φ) = (2^l l! sqrt(π) ratio)^(-1/2) exp(-(φ / ratio)^2 / 2) H_l(φ / ratio)
/// ```
/// but computed with the normalized three-term recurrence so that no
/// factorials are formed.
pub fn ho_wavefunctions(nmax: usize, ratio: f64, phi: f64) -> Vec<f64> {
    let mut psi: Vec<f64> = Vec::with_capacity(nmax);
    if nmax == 0 { return psi; }
    let u = phi / ratio;
    psi.push((-0.5 * u * u).exp() / (PI.sqrt() * ratio).sqrt());
    if nmax == 1 { return psi; }
    psi.push(2.0_f64.sqrt() * u * psi[0]);
    for l in 1..nmax - 1 {
        let lf = l as f64;
        let next
            = (2.0 / (lf + 1.0)).sqrt() * u * psi[l]
            - (lf / (lf + 1.0)).sqrt() * psi[l - 1];
        psi.push(next);
    }
    psi
}

#[cfg(test)]
mod test {
    use super::*;

    fn trapz(y: &nd::Array1<f64>, dx: f64) -> f64 {
        let n = y.len();
        dx * (y.sum() - 0.5 * (y[0] + y[n - 1]))
    }

    #[test]
    fn grid_shape() {
        let x = default_grid();
        assert_eq!(x.len(), 201);
        assert_eq!(x[0], -PI);
        assert!((x[200] - PI).abs() < 1e-14);
        assert!(x[100].abs() < 1e-14);
    }

    #[test]
    fn hermite_values() {
        let x: f64 = 0.7;
        assert_eq!(hermite(0, x), 1.0);
        assert!((hermite(1, x) - 2.0 * x).abs() < 1e-14);
        assert!((hermite(2, x) - (4.0 * x * x - 2.0)).abs() < 1e-14);
        assert!(
            (hermite(3, x) - (8.0 * x.powi(3) - 12.0 * x)).abs() < 1e-13
        );
        assert!(
            (hermite(4, x) - (16.0 * x.powi(4) - 48.0 * x * x + 12.0)).abs()
            < 1e-12
        );
    }

    #[test]
    fn recurrence_matches_closed_form() {
        let ratio = 1.3;
        for &phi in [-2.0, -0.3, 0.0, 0.9, 2.5].iter() {
            let psi = ho_wavefunctions(8, ratio, phi);
            let u = phi / ratio;
            for (l, psi_l) in psi.iter().enumerate() {
                let fact: f64 = (1..=l).map(|k| k as f64).product();
                let coeff
                    = (2.0_f64.powi(l as i32) * fact * PI.sqrt() * ratio)
                    .powf(-0.5);
                let expected = coeff * (-0.5 * u * u).exp() * hermite(l, u);
                assert!((psi_l - expected).abs() < 1e-12);
            }
            assert_eq!(ho_wavefunctions(6, ratio, phi)[..], psi[..6]);
        }
        assert!(ho_wavefunctions(0, ratio, 0.0).is_empty());
    }

    #[test]
    fn basis_is_orthonormal() {
        let ratio = 0.8;
        let x: nd::Array1<f64> = nd::Array1::linspace(-12.0, 12.0, 4001);
        let dx = x[1] - x[0];
        let psi: Vec<Vec<f64>>
            = x.iter().map(|xk| ho_wavefunctions(6, ratio, *xk)).collect();
        for a in 0..6 {
            for b in 0..6 {
                let prod: nd::Array1<f64>
                    = psi.iter().map(|p| p[a] * p[b]).collect();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((trapz(&prod, dx) - expected).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn flux_points_validation() {
        assert!(FluxPoints::from(0.5).validate().is_ok());
        assert!(FluxPoints::from(2).validate().is_ok());
        assert!(FluxPoints::from(vec![0.0, 1.0]).validate().is_ok());
        assert!(matches!(
            FluxPoints::from(f64::NAN).validate(),
            Err(FluxoniumError::InvalidInput(_)),
        ));
        assert!(matches!(
            FluxPoints::from(Vec::<f64>::new()).validate(),
            Err(FluxoniumError::InvalidInput(_)),
        ));
        let with_inf: &[f64] = &[0.0, f64::INFINITY];
        assert!(matches!(
            FluxPoints::from(with_inf).validate(),
            Err(FluxoniumError::InvalidInput(_)),
        ));
    }

    #[test]
    fn profile_shapes() {
        let f = |x: f64| 2.0 * x;
        let sampled = eval_profile(None, f).unwrap();
        assert_eq!(sampled.points().map(|p| p.len()), Some(201));
        assert_eq!(sampled.clone().into_values().len(), 201);
        let scalar = eval_profile(Some(&1.5_f64.into()), f).unwrap();
        assert_eq!(scalar.scalar(), Some(3.0));
        assert_eq!(scalar.points(), None);
        let array = eval_profile(Some(&vec![1.0_f64, 2.0].into()), f).unwrap();
        assert_eq!(array, Profile::Array(nd::array![2.0, 4.0]));
    }

    #[test]
    fn potential_formula() {
        assert!((potential_at(1.0, 2.0, PI, 0.0) - 2.0).abs() < 1e-15);
        assert!((potential_at(1.0, 2.0, 0.0, 0.0) + 2.0).abs() < 1e-15);
        assert!(
            (potential_at(0.5, 3.0, 0.3, 1.1)
                - (0.25 * 1.21 - 3.0 * 0.8_f64.cos())).abs()
            < 1e-14
        );
    }
}
