//! Comparison of solved states against a [`ReferenceOracle`].
//!
//! Validation never fails and never corrects a solution; it only reports.

use std::fmt;
use serde::{ Deserialize, Serialize };
use crate::{
    grid::QuantumState,
    normalize::NormalizedState,
    oracle::ReferenceOracle,
    utils::wf_distance,
    DEF_ENERGY_TOL,
    DEF_WF_TOL,
};

/// Acceptance thresholds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Maximum relative energy error (default: `1e-3`).
    pub energy: f64,
    /// Maximum L² distance between normalized wavefunctions (default: `1e-2`).
    pub wavefunction: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { energy: DEF_ENERGY_TOL, wavefunction: DEF_WF_TOL }
    }
}

/// Outcome of comparing one solved state to its reference.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub state: QuantumState,
    /// Numerical energy.
    pub energy: f64,
    /// Reference energy.
    pub exact_energy: f64,
    /// `|E - E_exact| / |E_exact|`
    pub energy_error: f64,
    /// `min_s √(∫ (u - s u_exact)² dr)`, `s = ±1`
    pub wavefunction_error: f64,
    pub tolerances: Tolerances,
}

impl Verdict {
    pub fn energy_ok(&self) -> bool {
        self.energy_error <= self.tolerances.energy
    }

    pub fn wavefunction_ok(&self) -> bool {
        self.wavefunction_error <= self.tolerances.wavefunction
    }

    /// Return `true` if both errors are within tolerance.
    pub fn passed(&self) -> bool { self.energy_ok() && self.wavefunction_ok() }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: E = {:.10} (exact {:.10}), ΔE/E = {:.2e}, ‖Δu‖ = {:.2e} [{}]",
            self.state,
            self.energy,
            self.exact_energy,
            self.energy_error,
            self.wavefunction_error,
            if self.passed() { "pass" } else { "FAIL" },
        )
    }
}

/// Compare a solved state to the reference sampled on the same grid.
pub fn validate<O>(solved: &NormalizedState, oracle: &O, tol: &Tolerances)
    -> Verdict
where O: ReferenceOracle + ?Sized
{
    let exact_energy = oracle.energy(solved.state);
    let energy_error = ((solved.energy - exact_energy) / exact_energy).abs();
    let exact = oracle.sample(solved.state, &solved.grid);
    let dr = solved.grid.dr();
    let wavefunction_error
        = wf_distance(&solved.u, &exact, 1.0, dr)
        .min(wf_distance(&solved.u, &exact, -1.0, dr));
    Verdict {
        state: solved.state,
        energy: solved.energy,
        exact_energy,
        energy_error,
        wavefunction_error,
        tolerances: *tol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ grid::RadialGrid, oracle::Hydrogenic };

    fn exact_state(n: u32, l: u32, energy: f64, sign: f64) -> NormalizedState {
        let state = QuantumState::new(n, l).unwrap();
        let grid = RadialGrid::new(1e-6, 20.0 * f64::from(n * n), 2000).unwrap();
        let u = sign * Hydrogenic.sample(state, &grid);
        NormalizedState {
            state,
            energy,
            grid,
            u,
            residual: 0.0,
            iterations: 0,
            nodes: state.radial_nodes(),
        }
    }

    #[test]
    fn exact_solution_passes_either_sign() {
        let tol = Tolerances::default();
        for sign in [1.0, -1.0] {
            let verdict = validate(&exact_state(2, 1, -0.125, sign), &Hydrogenic, &tol);
            assert!(verdict.passed(), "{verdict}");
            assert_eq!(verdict.energy_error, 0.0);
            assert!(verdict.wavefunction_error < 1e-12);
        }
    }

    #[test]
    fn energy_outside_tolerance_fails() {
        let tol = Tolerances { energy: 1e-4, ..Tolerances::default() };
        let verdict = validate(&exact_state(1, 0, -0.4999, 1.0), &Hydrogenic, &tol);
        assert!(!verdict.energy_ok());
        assert!(verdict.wavefunction_ok());
        assert!(!verdict.passed());
        assert!(verdict.to_string().ends_with("[FAIL]"));
    }

    #[test]
    fn wrong_state_fails_wavefunction_check() {
        let mut solved = exact_state(2, 0, -0.125, 1.0);
        // 2p samples on the 2s grid
        let p = QuantumState::new(2, 1).unwrap();
        solved.u = Hydrogenic.sample(p, &solved.grid);
        let verdict = validate(&solved, &Hydrogenic, &Tolerances::default());
        assert!(verdict.energy_ok());
        assert!(!verdict.wavefunction_ok());
    }
}
