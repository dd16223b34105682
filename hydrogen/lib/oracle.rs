//! Closed-form hydrogen bound states used as the reference for validation.
//!
//! In atomic units,
//! ```text
//! E[n] = -1 / 2n²
//!
//!                   ⎛2⎞³ (n - l - 1)!
//! R[n, l](r) = √⎜ ⎜ ─ ⎟  ──────────── ⎟ exp(-ρ/2) ρ^l L[n - l - 1, 2l + 1](ρ),   ρ = 2r / n
//!               ⎝ ⎝n⎠    2n (n + l)!  ⎠
//! ```
//! where `L[k, α]` is a generalized Laguerre polynomial.

use ndarray as nd;
use crate::grid::{ QuantumState, RadialGrid };

/// Source of reference solutions for the radial problem.
pub trait ReferenceOracle {
    /// Exact energy of a state.
    fn energy(&self, state: QuantumState) -> f64;

    /// Exact radial function `R(r)` of a state.
    fn radial(&self, state: QuantumState, r: f64) -> f64;

    /// Exact reduced radial function `u(r) = r R(r)` of a state.
    fn reduced_radial(&self, state: QuantumState, r: f64) -> f64 {
        r * self.radial(state, r)
    }

    /// Sample `u` over a grid.
    fn sample(&self, state: QuantumState, grid: &RadialGrid) -> nd::Array1<f64> {
        grid.r().mapv(|r| self.reduced_radial(state, r))
    }
}

/// The analytic solution of the hydrogen atom with an infinite-mass nucleus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Hydrogenic;

impl ReferenceOracle for Hydrogenic {
    fn energy(&self, state: QuantumState) -> f64 {
        -0.5 / f64::from(state.n()).powi(2)
    }

    fn radial(&self, state: QuantumState, r: f64) -> f64 {
        let n = state.n();
        let l = state.l();
        let nf = f64::from(n);
        let ln_norm
            = 1.5 * (2.0 / nf).ln()
            + 0.5 * (
                ln_factorial(n - l - 1)
                - (2.0 * nf).ln()
                - ln_factorial(n + l)
            );
        let rho = 2.0 * r / nf;
        let poly = laguerre(n - l - 1, f64::from(2 * l + 1), rho);
        ln_norm.exp() * (-rho / 2.0).exp() * rho.powi(l as i32) * poly
    }
}

impl Hydrogenic {
    /// `⟨r⟩ = (3n² - l(l + 1)) / 2`
    pub fn mean_radius(state: QuantumState) -> f64 {
        let (n, l) = nl(state);
        (3.0 * n.powi(2) - l * (l + 1.0)) / 2.0
    }

    /// `⟨r²⟩ = n² (5n² + 1 - 3l(l + 1)) / 2`
    pub fn mean_square_radius(state: QuantumState) -> f64 {
        let (n, l) = nl(state);
        n.powi(2) * (5.0 * n.powi(2) + 1.0 - 3.0 * l * (l + 1.0)) / 2.0
    }

    /// `Δr = √(⟨r²⟩ - ⟨r⟩²)`
    pub fn radial_spread(state: QuantumState) -> f64 {
        (Self::mean_square_radius(state) - Self::mean_radius(state).powi(2))
            .sqrt()
    }

    /// `⟨1/r⟩ = 1/n²`
    pub fn mean_inverse_radius(state: QuantumState) -> f64 {
        f64::from(state.n()).powi(2).recip()
    }
}

fn nl(state: QuantumState) -> (f64, f64) {
    (f64::from(state.n()), f64::from(state.l()))
}

/// Evaluate the generalized Laguerre polynomial `L[k, α](x)` by upward
/// recurrence.
pub fn laguerre(k: u32, alpha: f64, x: f64) -> f64 {
    let mut prev: f64 = 1.0;
    if k == 0 { return prev; }
    let mut cur: f64 = 1.0 + alpha - x;
    for j in 1..k {
        let j = f64::from(j);
        let next = ((2.0 * j + 1.0 + alpha - x) * cur - (j + alpha) * prev)
            / (j + 1.0);
        prev = cur;
        cur = next;
    }
    cur
}

/// `ln(k!)`
pub fn ln_factorial(k: u32) -> f64 {
    (2..=k).map(|j| f64::from(j).ln()).sum()
}
