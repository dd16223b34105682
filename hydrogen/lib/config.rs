//! Solver configuration.
//!
//! A [`SolverConfig`] is an explicit value handed to each
//! [`Solver`][crate::solve::Solver]; every field has a default, so partial
//! JSON documents are accepted.
//!
//! ```
//! use hydrogen::config::SolverConfig;
//!
//! let config = SolverConfig::from_json(r#"{ "stencil": "numerov" }"#).unwrap();
//! assert_eq!(config.resolution.points, 3000);
//! ```

use std::path::Path;
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ SolveError, SolveResult },
    grid::Resolution,
    operator::Stencil,
    solve::Method,
    validate::Tolerances,
    DEF_EPSILON,
    DEF_EXPANSIONS,
    DEF_MAXITERS,
    DEF_POINTS_PER_LOBE,
};

/// Parameters of the shooting search.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingConfig {
    /// Convergence bound on the logarithmic-derivative mismatch (default:
    /// `1e-8`).
    pub mismatch_tol: f64,
    /// Maximum number of bisection steps (default: `200`).
    pub maxiters: usize,
    /// Maximum number of times an energy bracket that fails to straddle the
    /// target state may be shifted before giving up (default: `16`).
    pub max_bracket_expansions: usize,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            mismatch_tol: DEF_EPSILON,
            maxiters: DEF_MAXITERS,
            max_bracket_expansions: DEF_EXPANSIONS,
        }
    }
}

/// Full configuration of a solver.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Grid resolution policy.
    pub resolution: Resolution,
    /// Finite-difference stencil (default: central).
    pub stencil: Stencil,
    /// Eigenvalue extraction method (default: direct).
    pub method: Method,
    /// Minimum number of grid intervals per radial lobe (default: `8`).
    pub min_points_per_lobe: usize,
    /// Shooting search parameters; ignored by the direct method.
    pub shooting: ShootingConfig,
    /// Acceptance thresholds used by validation.
    pub tolerances: Tolerances,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            stencil: Stencil::default(),
            method: Method::default(),
            min_points_per_lobe: DEF_POINTS_PER_LOBE,
            shooting: ShootingConfig::default(),
            tolerances: Tolerances::default(),
        }
    }
}

impl SolverConfig {
    /// Check every parameter, returning the first offending one.
    pub fn validate(&self) -> SolveResult<()> {
        self.resolution.validate()?;
        if self.min_points_per_lobe == 0 {
            return Err(SolveError::InvalidResolution {
                reason: "min_points_per_lobe must be at least 1",
            });
        }
        SolveError::check_epsilon(self.shooting.mismatch_tol)?;
        SolveError::check_maxiters(self.shooting.maxiters)?;
        if let Method::Shooting { bracket: Some(bracket) } = self.method {
            SolveError::check_bracket(bracket)?;
        }
        SolveError::check_epsilon(self.tolerances.energy)?;
        SolveError::check_epsilon(self.tolerances.wavefunction)?;
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> SolveResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> SolveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> SolveResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|err| {
                SolveError::Config(format!("{}: {}", path.display(), err))
            })?;
        Self::from_json(&json)
    }
}
