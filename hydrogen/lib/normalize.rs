//! Normalization of raw eigenvectors, and the solved-state record handed to
//! consumers.

use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ LengthError, SolveError, SolveResult },
    grid::{ effective_potential, PotentialProfile, QuantumState, RadialGrid },
    interp::{ self, Zero },
    solve::{ node_count, EigenResult },
    units,
    utils::{ trapz, wf_norm },
};

// samples smaller than this fraction of the peak amplitude don't fix the sign
const SIGN_THRESHOLD: f64 = 1e-3;

/// A bound state with its reduced radial wavefunction `u = r R` normalized so
/// that `∫ u² dr = ∫ r² R² dr = 1` on its grid.
///
/// The overall sign is fixed so that the innermost lobe is positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedState {
    /// Quantum numbers
    pub state: QuantumState,
    /// Energy (Hartree)
    pub energy: f64,
    /// Grid the state was solved on
    pub grid: RadialGrid,
    /// `u(r[i])`, boundary samples included
    pub u: nd::Array1<f64>,
    /// Residual reported by the extraction method
    pub residual: f64,
    /// Iterations reported by the extraction method
    pub iterations: usize,
    /// Nodes within the classically allowed region
    pub nodes: usize,
}

/// Normalize a raw solution on its grid.
///
/// Fails with [`SolveError::DegenerateSolution`] if `∫ u² dr` is zero,
/// subnormal, or not finite.
pub fn normalize(
    state: QuantumState,
    raw: EigenResult,
    grid: RadialGrid,
    profile: &PotentialProfile,
) -> SolveResult<NormalizedState>
{
    LengthError::check(grid.r(), &raw.wf)?;
    let integral = wf_norm(&raw.wf, grid.dr());
    if !integral.is_normal() || integral < 0.0 {
        return Err(SolveError::DegenerateSolution { state, integral });
    }
    let mut u = raw.wf / integral.sqrt();
    let peak = u.iter().fold(0.0_f64, |acc, uk| acc.max(uk.abs()));
    let first = u.iter().find(|uk| uk.abs() > SIGN_THRESHOLD * peak).copied();
    if first.is_some_and(|uk| uk < 0.0) {
        u.mapv_inplace(|uk| -uk);
    }
    let nodes = node_count(&u, profile, raw.e);
    Ok(NormalizedState {
        state,
        energy: raw.e,
        grid,
        u,
        residual: raw.residual,
        iterations: raw.iterations,
        nodes,
    })
}

impl NormalizedState {
    /// Radial function `R(r[i]) = u(r[i]) / r[i]`.
    pub fn radial(&self) -> nd::Array1<f64> {
        &self.u / self.grid.r()
    }

    /// Radial probability density `P(r[i]) = u(r[i])²`.
    pub fn density(&self) -> nd::Array1<f64> {
        self.u.mapv(|uk| uk.powi(2))
    }

    /// Total probability `∫ u² dr`; unity up to rounding.
    pub fn probability(&self) -> f64 {
        wf_norm(&self.u, self.grid.dr())
    }

    /// Expectation value `∫ u² f(r) dr` of a radial function.
    pub fn expectation<F>(&self, mut f: F) -> f64
    where F: FnMut(f64) -> f64
    {
        let integrand: nd::Array1<f64>
            = self.u.iter().zip(self.grid.r())
            .map(|(uk, rk)| uk.powi(2) * f(*rk))
            .collect();
        trapz(&integrand, self.grid.dr())
    }

    /// `⟨r⟩`
    pub fn mean_radius(&self) -> f64 { self.expectation(|r| r) }

    /// `√(⟨r²⟩ - ⟨r⟩²)`
    pub fn radial_spread(&self) -> f64 {
        let r2 = self.expectation(|r| r.powi(2));
        (r2 - self.mean_radius().powi(2)).sqrt()
    }

    /// Energy in electronvolts.
    pub fn energy_ev(&self) -> f64 { units::hartree_to_ev(self.energy) }

    /// Reduced radial amplitude `u(r)` at an arbitrary radius within the grid.
    pub fn amplitude_at(&self, r: f64) -> SolveResult<f64> {
        Ok(interp::interpolate(self.grid.r(), &self.u, r)?)
    }

    /// Radial function `R(r)` at an arbitrary radius within the grid.
    pub fn radial_at(&self, r: f64) -> SolveResult<f64> {
        Ok(self.amplitude_at(r)? / r)
    }

    /// Interpolated positions of the nodes within the classically allowed
    /// region.
    pub fn node_positions(&self) -> SolveResult<Vec<f64>> {
        let l = self.state.l();
        let n = self.grid.len();
        let allowed: Vec<usize>
            = self.grid.r().iter().enumerate()
            .filter(|(k, rk)| {
                (1..n - 1).contains(k)
                    && effective_potential(l, **rk) < self.energy
            })
            .map(|(k, _)| k)
            .collect();
        let (Some(&lo), Some(&hi)) = (allowed.first(), allowed.last()) else {
            return Ok(Vec::new());
        };
        let zeros = interp::find_zeros(
            &self.grid.r().slice(nd::s![lo..=hi]),
            &self.u.slice(nd::s![lo..=hi]),
            Zero::All,
        )?;
        Ok(zeros)
    }
}
