//! Quantum numbers, radial grids, and effective potentials.

use std::fmt;
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ SolveError, SolveResult },
    DEF_DOMAIN_SCALE,
    DEF_POINTS,
    DEF_R_MIN,
    MIN_DOMAIN_SCALE,
};

const ORBITAL_LETTERS: &[char] = &['s', 'p', 'd', 'f', 'g', 'h', 'i', 'k'];

/// A bound state of hydrogen, identified by its principal (`n`) and orbital
/// angular momentum (`l`) quantum numbers.
///
/// `n ≥ 1` and `0 ≤ l < n` hold for every value of this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(u32, u32)")]
pub struct QuantumState {
    n: u32,
    l: u32,
}

impl QuantumState {
    /// Create a new state, rejecting `n = 0` and `l ≥ n`.
    pub fn new(n: u32, l: u32) -> SolveResult<Self> {
        if n == 0 || l >= n {
            return Err(SolveError::InvalidQuantumNumbers {
                n: n.into(),
                l: l.into(),
            });
        }
        Ok(Self { n, l })
    }

    /// Principal quantum number.
    pub fn n(&self) -> u32 { self.n }

    /// Orbital angular momentum quantum number.
    pub fn l(&self) -> u32 { self.l }

    /// Number of radial nodes, `n - l - 1`.
    pub fn radial_nodes(&self) -> usize { (self.n - self.l - 1) as usize }

    /// Outer classical turning point of the exact state,
    /// `n² + n √(n² - l(l + 1))`.
    pub fn turning_point(&self) -> f64 {
        let n = f64::from(self.n);
        let l = f64::from(self.l);
        n.powi(2) + n * (n.powi(2) - l * (l + 1.0)).sqrt()
    }

    /// Iterate over all states with principal quantum number at most `n_max`,
    /// ordered by `n` and then `l`.
    pub fn up_to(n_max: u32) -> impl Iterator<Item = Self> {
        (1..=n_max).flat_map(|n| (0..n).map(move |l| Self { n, l }))
    }
}

impl TryFrom<(i64, i64)> for QuantumState {
    type Error = SolveError;

    fn try_from(nl: (i64, i64)) -> SolveResult<Self> {
        let (n, l) = nl;
        let invalid = || SolveError::InvalidQuantumNumbers { n, l };
        let n = u32::try_from(n).map_err(|_| invalid())?;
        let l = u32::try_from(l).map_err(|_| invalid())?;
        Self::new(n, l)
    }
}

impl TryFrom<(i32, i32)> for QuantumState {
    type Error = SolveError;

    fn try_from(nl: (i32, i32)) -> SolveResult<Self> {
        Self::try_from((i64::from(nl.0), i64::from(nl.1)))
    }
}

impl From<QuantumState> for (u32, u32) {
    fn from(state: QuantumState) -> Self { (state.n, state.l) }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ORBITAL_LETTERS.get(self.l as usize) {
            Some(letter) => write!(f, "{}{}", self.n, letter),
            None => write!(f, "(n={}, l={})", self.n, self.l),
        }
    }
}

/// Policy for the outer edge of the radial domain.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// `r_max = c n²`.
    Scaled(f64),
    /// A fixed `r_max`, independent of the state.
    Fixed(f64),
}

impl Domain {
    /// Resolve the outer radius for a given state.
    pub fn r_max(&self, state: QuantumState) -> f64 {
        match *self {
            Self::Scaled(c) => c * f64::from(state.n()).powi(2),
            Self::Fixed(r) => r,
        }
    }
}

impl Default for Domain {
    fn default() -> Self { Self::Scaled(DEF_DOMAIN_SCALE) }
}

/// Grid resolution policy: number of points, inner radius, and outer radius.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    /// Number of grid points, boundaries included (default: `3000`).
    pub points: usize,
    /// Inner radius; must be strictly positive (default: `1e-6`).
    pub r_min: f64,
    /// Outer radius policy (default: `10 n²`).
    pub domain: Domain,
}

impl Default for Resolution {
    fn default() -> Self {
        Self { points: DEF_POINTS, r_min: DEF_R_MIN, domain: Domain::default() }
    }
}

impl Resolution {
    /// Shorthand for a scaled domain.
    pub fn scaled(points: usize, r_min: f64, c: f64) -> Self {
        Self { points, r_min, domain: Domain::Scaled(c) }
    }

    /// Shorthand for a fixed domain.
    pub fn fixed(points: usize, r_min: f64, r_max: f64) -> Self {
        Self { points, r_min, domain: Domain::Fixed(r_max) }
    }

    /// Check that the policy can produce a usable grid for any state.
    pub fn validate(&self) -> SolveResult<()> {
        if self.points < 5 {
            return Err(SolveError::InvalidResolution {
                reason: "at least 5 grid points are required",
            });
        }
        if !(self.r_min.is_finite() && self.r_min > 0.0) {
            return Err(SolveError::InvalidResolution {
                reason: "r_min must be finite and strictly positive",
            });
        }
        let scale = match self.domain { Domain::Scaled(c) | Domain::Fixed(c) => c };
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SolveError::InvalidResolution {
                reason: "domain size must be finite and strictly positive",
            });
        }
        Ok(())
    }
}

/// Uniformly spaced radial grid `r[i] = r_min + i δr`, `i ∊ {0, ..., N - 1}`.
///
/// Never contains the origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialGrid {
    // coordinate array
    r: nd::Array1<f64>,
    // grid spacing
    dr: f64,
}

impl RadialGrid {
    /// Create a new grid from "linspace-style" arguments.
    pub fn new(r_min: f64, r_max: f64, points: usize) -> SolveResult<Self> {
        Resolution::fixed(points, r_min, r_max).validate()?;
        if r_max <= r_min {
            return Err(SolveError::InvalidResolution {
                reason: "r_max must be greater than r_min",
            });
        }
        let r: nd::Array1<f64> = nd::Array1::linspace(r_min, r_max, points);
        let dr = r[1] - r[0];
        Ok(Self { r, dr })
    }

    /// Create a grid for a particular state under a resolution policy.
    ///
    /// Emits a warning if the domain is too small to contain the tail of the
    /// state, since Dirichlet truncation then shifts the eigenvalue upward.
    pub fn for_state(state: QuantumState, resolution: &Resolution)
        -> SolveResult<Self>
    {
        resolution.validate()?;
        let r_max = resolution.domain.r_max(state);
        let r_rec = MIN_DOMAIN_SCALE * f64::from(state.n()).powi(2);
        if r_max < r_rec {
            tracing::warn!(
                %state,
                r_max,
                recommended = r_rec,
                "radial domain is smaller than the recommended size; \
                bound-state tails will be truncated"
            );
        }
        Self::new(resolution.r_min, r_max, resolution.points)
    }

    /// Get a reference to the coordinate array.
    pub fn r(&self) -> &nd::Array1<f64> { &self.r }

    /// Get the grid spacing.
    pub fn dr(&self) -> f64 { self.dr }

    /// Get the number of grid points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.r.len() }

    /// Inner radius.
    pub fn r_min(&self) -> f64 { self.r[0] }

    /// Outer radius.
    pub fn r_max(&self) -> f64 { self.r[self.r.len() - 1] }
}

/// The effective radial potential `V_eff(r) = l(l + 1) / 2r² - 1/r` sampled
/// over a [`RadialGrid`].
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialProfile {
    l: u32,
    V: nd::Array1<f64>,
}

impl PotentialProfile {
    /// Sample the effective potential for angular momentum `l`.
    pub fn new(grid: &RadialGrid, l: u32) -> Self {
        let V = grid.r().mapv(|r| effective_potential(l, r));
        Self { l, V }
    }

    /// Angular momentum quantum number the profile was built for.
    pub fn l(&self) -> u32 { self.l }

    /// Get a reference to the potential array.
    pub fn values(&self) -> &nd::Array1<f64> { &self.V }

    /// Return `true` if the energy `E` is classically allowed at grid index
    /// `i`.
    pub fn allowed(&self, i: usize, E: f64) -> bool { self.V[i] < E }

    /// Index of the outermost classically allowed point for energy `E`,
    /// clamped so that a three-point stencil centered there stays inside the
    /// grid.
    pub fn outer_turning_index(&self, E: f64) -> usize {
        let n = self.V.len();
        let m = self.V.iter()
            .rposition(|&Vk| Vk < E)
            .unwrap_or(0);
        m.clamp(2, n - 3)
    }
}

/// Evaluate `V_eff(r) = l(l + 1) / 2r² - 1/r`.
pub fn effective_potential(l: u32, r: f64) -> f64 {
    let l = f64::from(l);
    l * (l + 1.0) / (2.0 * r.powi(2)) - r.recip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_quantum_numbers() {
        assert_eq!(
            QuantumState::new(1, 1),
            Err(SolveError::InvalidQuantumNumbers { n: 1, l: 1 }),
        );
        assert!(QuantumState::new(0, 0).is_err());
        assert!(QuantumState::try_from((2, -1)).is_err());
        assert!(QuantumState::try_from((-1, 0)).is_err());
        assert_eq!(QuantumState::try_from((3, 2)).unwrap().radial_nodes(), 0);
    }

    #[test]
    fn serialized_state_keeps_large_quantum_numbers() {
        let state = QuantumState::new(u32::MAX, u32::MAX - 1).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, format!("[{},{}]", u32::MAX, u32::MAX - 1));
        assert_eq!(serde_json::from_str::<QuantumState>(&json).unwrap(), state);
        let err = serde_json::from_str::<QuantumState>("[4294967296, 0]")
            .unwrap_err();
        assert!(err.to_string().contains("n = 4294967296"), "{err}");
        assert!(serde_json::from_str::<QuantumState>("[2, -1]").is_err());
    }

    #[test]
    fn spectroscopic_labels() {
        let labels: Vec<String>
            = QuantumState::up_to(3).map(|s| s.to_string()).collect();
        assert_eq!(labels, ["1s", "2s", "2p", "3s", "3p", "3d"]);
    }

    #[test]
    fn grid_is_uniform_and_excludes_origin() {
        let state = QuantumState::new(2, 0).unwrap();
        let grid
            = RadialGrid::for_state(state, &Resolution::scaled(101, 1e-3, 10.0))
            .unwrap();
        assert_eq!(grid.len(), 101);
        assert!(grid.r_min() > 0.0);
        assert_relative_eq!(grid.r_max(), 40.0, max_relative = 1e-12);
        assert_relative_eq!(grid.dr(), (40.0 - 1e-3) / 100.0, max_relative = 1e-12);
        assert!(grid.r().iter().zip(grid.r().iter().skip(1)).all(|(a, b)| b > a));
    }

    #[test]
    fn rejects_bad_resolution() {
        assert!(RadialGrid::new(0.0, 10.0, 100).is_err());
        assert!(RadialGrid::new(1.0, 0.5, 100).is_err());
        assert!(RadialGrid::new(1e-3, 10.0, 4).is_err());
        assert!(Resolution::scaled(100, 1e-3, -1.0).validate().is_err());
    }

    #[test]
    fn potential_and_turning_point() {
        let grid = RadialGrid::new(1e-3, 20.0, 2001).unwrap();
        let profile = PotentialProfile::new(&grid, 1);
        let i = 500;
        let r = grid.r()[i];
        assert_relative_eq!(
            profile.values()[i], 1.0 / r.powi(2) - 1.0 / r, max_relative = 1e-12);
        // V_eff = -1/8 at r = 4 ± 2√2 for l = 1
        let r_t = 4.0 + 2.0 * 2.0_f64.sqrt();
        let m = profile.outer_turning_index(-0.125);
        assert!((grid.r()[m] - r_t).abs() < 2.0 * grid.dr());
        let state = QuantumState::new(2, 1).unwrap();
        assert_relative_eq!(state.turning_point(), r_t);
    }
}
