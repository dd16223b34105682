//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;
use crate::grid::QuantumState;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from interpolation routines when data arrays are less than 5
/// elements long.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("coordinate arrays in interpolation must be longer than 4 elements; got {0}")]
pub struct LagrangeError(pub usize);

impl LagrangeError {
    pub(crate) fn check<S, A>(a: &nd::ArrayBase<S, nd::Ix1>)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let n = a.len();
        (n > 4).then_some(()).ok_or(Self(n))
    }
}

/// Returned from functions in [`interp`][crate::interp].
#[derive(Copy, Clone, Debug, Error, PartialEq)]
pub enum InterpError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// [`LagrangeError`]
    #[error("lagrange error: {0}")]
    Lagrange(#[from] LagrangeError),

    /// Returned when a requested coordinate lies outside the sampled range.
    #[error("coordinate {0} lies outside the sampled range [{1}, {2}]")]
    OutOfRange(f64, f64, f64),
}

/// Returned from the radial solver and everything upstream of it.
///
/// The first four variants form the numerical taxonomy; the rest report bad
/// configuration or failures in numerical plumbing.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolveError {
    /// Returned when `n < 1` or `l ≥ n` (or `l < 0` for signed input).
    #[error("invalid quantum numbers: n = {n}, l = {l}; require n ≥ 1 and 0 ≤ l < n")]
    InvalidQuantumNumbers { n: i64, l: i64 },

    /// Returned when the grid spacing cannot resolve the radial nodes of the
    /// requested state.
    #[error(
        "grid too coarse for {state}: {points} points with spacing {spacing:.3e} \
        exceed the maximum spacing {max_spacing:.3e}"
    )]
    GridTooCoarse {
        state: QuantumState,
        points: usize,
        spacing: f64,
        max_spacing: f64,
    },

    /// Returned when the shooting search exhausts its budget without
    /// satisfying the mismatch tolerance.
    #[error(
        "eigenvalue search for {state} did not converge after {iterations} \
        iterations (last energy {energy:.12e}, mismatch {mismatch:.3e})"
    )]
    EigenvalueNotConverged {
        state: QuantumState,
        iterations: usize,
        energy: f64,
        mismatch: f64,
    },

    /// Returned when the normalization integral of a solution vanishes.
    #[error("degenerate solution for {state}: normalization integral is {integral:e}")]
    DegenerateSolution { state: QuantumState, integral: f64 },

    /// Returned when grid resolution parameters are unusable.
    #[error("invalid resolution: {reason}")]
    InvalidResolution { reason: &'static str },

    /// Returned when a shooting bracket is not an ordered pair of negative
    /// energies.
    #[error("invalid energy bracket ({lo}, {hi}); require lo < hi < 0")]
    InvalidBracket { lo: f64, hi: f64 },

    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a non-positive `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`InterpError`]
    #[error("interpolation error: {0}")]
    Interp(#[from] InterpError),

    /// [`LinalgError`], flattened to its message.
    #[error("linalg error: {0}")]
    Linalg(String),

    /// Returned when a serialized configuration cannot be read or written.
    #[error("config error: {0}")]
    Config(String),
}

impl From<LinalgError> for SolveError {
    fn from(err: LinalgError) -> Self { Self::Linalg(err.to_string()) }
}

impl From<serde_json::Error> for SolveError {
    fn from(err: serde_json::Error) -> Self { Self::Config(err.to_string()) }
}

impl SolveError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }

    pub(crate) fn check_bracket(bracket: (f64, f64)) -> Result<(), Self> {
        let (lo, hi) = bracket;
        (lo.is_finite() && lo < hi && hi < 0.0)
            .then_some(())
            .ok_or(Self::InvalidBracket { lo, hi })
    }
}

/// Shorthand for results carrying a [`SolveError`].
pub type SolveResult<T> = Result<T, SolveError>;
