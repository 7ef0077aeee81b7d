//! Error taxonomy shared by every fallible operation in the crate.

use thiserror::Error;

/// Everything that can go wrong when configuring or querying a
/// [`Fluxonium`][crate::fluxonium::Fluxonium].
///
/// Errors are returned at the call that detects them; nothing in the crate
/// catches and retries.
#[derive(Debug, Error)]
pub enum FluxoniumError {
    /// A setter or constructor received a value outside its physical range.
    /// The device is left unchanged.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A level index or truncation size lies outside the range accepted by
    /// the operation.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// A flux-point argument cannot be evaluated (empty or non-finite).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration table is missing a key or holds a value of the wrong
    /// type.
    #[error("config error: {0}")]
    Config(String),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// LAPACK failed to diagonalize a matrix.
    #[error("diagonalization error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),
}

pub type FluxResult<T> = Result<T, FluxoniumError>;

impl FluxoniumError {
    pub(crate) fn invalid_parameter<S>(msg: S) -> Self
    where S: Into<String>
    {
        Self::InvalidParameter(msg.into())
    }

    pub(crate) fn out_of_bounds<S>(msg: S) -> Self
    where S: Into<String>
    {
        Self::OutOfBounds(msg.into())
    }

    pub(crate) fn invalid_input<S>(msg: S) -> Self
    where S: Into<String>
    {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn config<S>(msg: S) -> Self
    where S: Into<String>
    {
        Self::Config(msg.into())
    }
}
