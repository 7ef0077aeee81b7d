#![allow(non_snake_case)]

//! Spectrum and operator matrix elements of a superconducting fluxonium qubit.
//!
//! The qubit Hamiltonian
//! ```text
//! H = 4 E_C n^2 + E_L φ^2 / 2 - E_J cos(φ - φ_ext)
//! ```
//! is represented in a truncated harmonic-oscillator ("LC") basis,
//! diagonalized once and cached, and then projected into its own eigenbasis
//! on demand. See [`fluxonium::Fluxonium`] for the main entry point.

pub mod error;
pub mod params;
pub mod lc;
pub mod matfn;
pub mod hamiltonian;
pub mod spectrum;
pub mod realspace;
pub mod fluxonium;

pub use error::{ FluxoniumError, FluxResult };
pub use params::FluxoniumParams;
pub use realspace::{ FluxPoints, Profile };
pub use fluxonium::Fluxonium;
