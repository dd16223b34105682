//! Extraction of a single bound state from a [`DiscretizedOperator`], and the
//! end-to-end [`Solver`] pipeline.
//!
//! Two strategies implement [`Eigensolver`]:
//! - [`Direct`] diagonalizes the dense operator and picks the eigenpair whose
//!   index in the ascending spectrum equals the radial node count `n - l - 1`.
//! - [`Shooting`] integrates the operator's three-term recurrence inward and
//!   outward for trial energies, and bisects on node count and the mismatch of
//!   logarithmic derivatives at the outer classical turning point.

use std::{
    collections::HashMap,
    sync::{ Arc, Mutex, OnceLock, PoisonError },
};
use ndarray as nd;
use ndarray_linalg::{ self as la, EighInto };
use rayon::prelude::*;
use serde::{ Deserialize, Serialize };
use crate::{
    Arr1,
    config::{ ShootingConfig, SolverConfig },
    error::{ SolveError, SolveResult },
    grid::{ PotentialProfile, QuantumState, RadialGrid },
    normalize::{ normalize, NormalizedState },
    operator::DiscretizedOperator,
    oracle::ReferenceOracle,
    utils::{ sign_changes, sign_changes_where },
    validate::{ validate, Verdict },
};

// trial solutions are rescaled whenever they grow past this magnitude
const OVERFLOW: f64 = 1e100;

/// Raw output of an [`Eigensolver`].
///
/// The wavefunction is aligned with the full grid, boundary samples included,
/// and is not normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct EigenResult {
    /// Energy
    pub e: f64,
    /// Reduced radial wavefunction `u(r[i])`
    pub wf: nd::Array1<f64>,
    /// `‖H u - E u‖ / ‖u‖` for [`Direct`]; `|mismatch|` for [`Shooting`]
    pub residual: f64,
    /// Number of trial energies evaluated (zero for [`Direct`])
    pub iterations: usize,
}

/// A strategy to extract the eigenpair of a particular state from a
/// discretized operator.
pub trait Eigensolver {
    fn extract(&self, op: &DiscretizedOperator<'_>, state: QuantumState)
        -> SolveResult<EigenResult>;
}

/// Dense symmetric eigendecomposition of the full operator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Direct;

impl Eigensolver for Direct {
    fn extract(&self, op: &DiscretizedOperator<'_>, state: QuantumState)
        -> SolveResult<EigenResult>
    {
        let k = state.radial_nodes();
        if k >= op.dim() {
            return Err(SolveError::InvalidResolution {
                reason: "grid has fewer interior points than the requested state index",
            });
        }
        let H = op.to_matrix()?;
        let (evals, evecs): (nd::Array1<f64>, nd::Array2<f64>)
            = H.clone().eigh_into(la::UPLO::Lower)?;
        let e = evals[k];
        let v = evecs.column(k);
        let resid: nd::Array1<f64> = H.dot(&v) - e * &v;
        let residual = l2(&resid) / l2(&v);

        let n = op.grid().len();
        let mut wf: nd::Array1<f64> = nd::Array1::zeros(n);
        wf.slice_mut(nd::s![1..n - 1]).assign(&v);
        Ok(EigenResult { e, wf, residual, iterations: 0 })
    }
}

fn l2<S>(v: &Arr1<S>) -> f64
where S: nd::Data<Elem = f64>
{
    v.iter().map(|vk| vk.powi(2)).sum::<f64>().sqrt()
}

#[derive(Copy, Clone, Debug)]
struct Window(f64, f64);

impl Window {
    fn push(&mut self, val: f64) { self.0 = self.1; self.1 = val; }
}

#[derive(Copy, Clone, Debug)]
struct Bounds<T>(T, T);

impl Bounds<f64> {
    fn midpoint(self) -> f64 { (self.0 + self.1) / 2.0 }

    fn diff(self) -> f64 { self.1 - self.0 }
}

impl<T> Bounds<T> {
    fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Bounds<U> {
        (f(self.0), f(self.1)).into()
    }
}

impl<T> From<(T, T)> for Bounds<T> {
    fn from(xx: (T, T)) -> Self { Self(xx.0, xx.1) }
}

// integrate the recurrence from the inner edge of the grid up to and including
// index m + 1, starting from u ∝ r^(l + 1)
fn integrate_outward(op: &DiscretizedOperator<'_>, E: f64, m: usize)
    -> nd::Array1<f64>
{
    let r = op.grid().r();
    let l = op.potential().l() as i32;
    let mut u: nd::Array1<f64> = nd::Array1::zeros(m + 2);
    u[0] = (r[0] / r[1]).powi(l + 1);
    u[1] = 1.0;
    let mut uprev = Window(u[0], u[1]);
    let mut wprev = Window(op.weight(0, E), op.weight(1, E));
    let mut unext: f64;
    for i in 1..=m {
        let w = op.weight(i + 1, E);
        unext = (op.center(i, E) * uprev.1 - wprev.0 * uprev.0) / w;
        if unext.abs() > OVERFLOW {
            u.slice_mut(nd::s![..=i]).mapv_inplace(|uk| uk / OVERFLOW);
            uprev = Window(uprev.0 / OVERFLOW, uprev.1 / OVERFLOW);
            unext /= OVERFLOW;
        }
        u[i + 1] = unext;
        uprev.push(unext);
        wprev.push(w);
    }
    u
}

// integrate the recurrence from the outer edge of the grid down to and
// including index m - 1, starting from u ∝ exp(-κ r)
fn integrate_inward(op: &DiscretizedOperator<'_>, E: f64, m: usize)
    -> nd::Array1<f64>
{
    let n = op.grid().len();
    let kappa = (-2.0 * E).sqrt();
    let mut u: nd::Array1<f64> = nd::Array1::zeros(n);
    u[n - 1] = (-kappa * op.grid().dr()).exp();
    u[n - 2] = 1.0;
    let mut uprev = Window(u[n - 1], u[n - 2]);
    let mut wprev = Window(op.weight(n - 1, E), op.weight(n - 2, E));
    let mut unext: f64;
    for i in (m..=n - 2).rev() {
        let w = op.weight(i - 1, E);
        unext = (op.center(i, E) * uprev.1 - wprev.0 * uprev.0) / w;
        if unext.abs() > OVERFLOW {
            u.slice_mut(nd::s![i..]).mapv_inplace(|uk| uk / OVERFLOW);
            uprev = Window(uprev.0 / OVERFLOW, uprev.1 / OVERFLOW);
            unext /= OVERFLOW;
        }
        u[i - 1] = unext;
        uprev.push(unext);
        wprev.push(w);
    }
    u
}

/// Matching result for a single trial energy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trial {
    /// Trial energy.
    pub e: f64,
    /// Outward minus inward logarithmic derivative at the matching point.
    pub mismatch: f64,
    /// Sign changes of the matched trial solution.
    pub nodes: usize,
}

impl Trial {
    /// Return `true` if the trial energy lies below the eigenvalue with `nu`
    /// radial nodes: fewer than `nu` nodes, or exactly `nu` with positive
    /// mismatch.
    pub fn is_below(&self, nu: usize) -> bool {
        self.nodes < nu || (self.nodes == nu && self.mismatch > 0.0)
    }
}

// build the matched trial solution for a single energy, joining at index m
fn shoot_two_sided_single(op: &DiscretizedOperator<'_>, E: f64, m: usize)
    -> (Trial, nd::Array1<f64>)
{
    let twodr = 2.0 * op.grid().dr();
    let uo = integrate_outward(op, E, m);
    let ui = integrate_inward(op, E, m);
    let Lo = (uo[m + 1] - uo[m - 1]) / (twodr * uo[m]);
    let Li = (ui[m + 1] - ui[m - 1]) / (twodr * ui[m]);
    let scale = uo[m] / ui[m];
    let mut u = ui;
    u.slice_mut(nd::s![m + 1..]).mapv_inplace(|uk| scale * uk);
    u.slice_mut(nd::s![..=m]).assign(&uo.slice(nd::s![..=m]));
    let nodes = sign_changes(&u);
    (Trial { e: E, mismatch: Lo - Li, nodes }, u)
}

/// Two-sided shooting search with node-count-guarded bisection.
///
/// The bracket must straddle the target eigenvalue; one that does not is
/// shifted geometrically toward the side indicated by its node count, at most
/// `max_expansions` times.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shooting {
    /// Initial energy bracket; defaults to [`Self::default_bracket`].
    pub bracket: Option<(f64, f64)>,
    /// Convergence bound on `|mismatch|`.
    pub epsilon: f64,
    /// Maximum number of bisection steps.
    pub maxiters: usize,
    /// Maximum number of bracket shifts.
    pub max_expansions: usize,
}

impl Shooting {
    pub fn new(bracket: Option<(f64, f64)>, config: &ShootingConfig) -> Self {
        Self {
            bracket,
            epsilon: config.mismatch_tol,
            maxiters: config.maxiters,
            max_expansions: config.max_bracket_expansions,
        }
    }

    /// Energies halfway (in `n`) to the neighboring levels,
    /// `(-1 / 2(n - ½)², -1 / 2(n + ½)²)`.
    pub fn default_bracket(state: QuantumState) -> (f64, f64) {
        let n = f64::from(state.n());
        (-0.5 / (n - 0.5).powi(2), -0.5 / (n + 0.5).powi(2))
    }

    // shift the bracket until the lower end is below the target and the upper
    // end is not; returns the bracket and the matching index for its midpoint
    fn straddle(
        &self,
        op: &DiscretizedOperator<'_>,
        state: QuantumState,
        bracket: (f64, f64),
    ) -> SolveResult<(Bounds<f64>, usize)>
    {
        let nu = state.radial_nodes();
        let profile = op.potential();
        let mut Eb: Bounds<f64> = bracket.into();
        let mut m = profile.outer_turning_index(Eb.midpoint());
        let mut expansions: usize = 0;
        loop {
            let below = Eb.map(|e| shoot_two_sided_single(op, e, m).0.is_below(nu));
            if below.0 && !below.1 { return Ok((Eb, m)); }
            if expansions >= self.max_expansions {
                let trial = shoot_two_sided_single(op, Eb.midpoint(), m).0;
                return Err(SolveError::EigenvalueNotConverged {
                    state,
                    iterations: 0,
                    energy: trial.e,
                    mismatch: trial.mismatch,
                });
            }
            Eb = if !below.0 {
                Bounds(2.0 * Eb.0, Eb.0)
            } else {
                Bounds(Eb.1, Eb.1 / 2.0)
            };
            expansions += 1;
            m = profile.outer_turning_index(Eb.midpoint());
            tracing::trace!(
                %state, lo = Eb.0, hi = Eb.1, expansions, "shifted energy bracket");
        }
    }
}

impl Default for Shooting {
    fn default() -> Self { Self::new(None, &ShootingConfig::default()) }
}

impl Eigensolver for Shooting {
    fn extract(&self, op: &DiscretizedOperator<'_>, state: QuantumState)
        -> SolveResult<EigenResult>
    {
        SolveError::check_epsilon(self.epsilon)?;
        SolveError::check_maxiters(self.maxiters)?;
        let bracket = self.bracket.unwrap_or_else(|| Self::default_bracket(state));
        SolveError::check_bracket(bracket)?;

        let nu = state.radial_nodes();
        let (mut Eb, m) = self.straddle(op, state, bracket)?;
        let mut last = Trial { e: Eb.midpoint(), mismatch: f64::INFINITY, nodes: 0 };
        for k in 0..self.maxiters {
            let (trial, wf) = shoot_two_sided_single(op, Eb.midpoint(), m);
            if trial.nodes == nu && trial.mismatch.abs() < self.epsilon {
                return Ok(EigenResult {
                    e: trial.e,
                    wf,
                    residual: trial.mismatch.abs(),
                    iterations: k + 1,
                });
            }
            if trial.is_below(nu) { Eb.0 = trial.e; } else { Eb.1 = trial.e; }
            last = trial;
            if Eb.diff() <= f64::EPSILON * Eb.midpoint().abs() {
                return Err(SolveError::EigenvalueNotConverged {
                    state,
                    iterations: k + 1,
                    energy: last.e,
                    mismatch: last.mismatch,
                });
            }
        }
        Err(SolveError::EigenvalueNotConverged {
            state,
            iterations: self.maxiters,
            energy: last.e,
            mismatch: last.mismatch,
        })
    }
}

/// Return the number of nodes in a wavefunction within the classically
/// allowed region of energy `E`.
///
/// Sign flips in the forbidden tails, where a bound state is exponentially
/// small, are numerical noise and are not counted.
pub fn node_count<S>(wf: &Arr1<S>, profile: &PotentialProfile, E: f64) -> usize
where S: nd::Data<Elem = f64>
{
    sign_changes_where(wf, |k| profile.allowed(k, E))
}

/// Solving method selector and parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Use [dense diagonalization][Direct].
    #[default]
    Direct,
    /// Use the [two-sided shooting method][Shooting].
    Shooting {
        /// Initial guess bounds on energy; defaults to
        /// [`Shooting::default_bracket`].
        #[serde(default)]
        bracket: Option<(f64, f64)>,
    },
}

impl Method {
    /// Return `true` if `self` is `Direct`.
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct)
    }

    /// Return `true` if `self` is `Shooting`.
    pub fn is_shooting(&self) -> bool {
        matches!(self, Self::Shooting { .. })
    }

    /// Instantiate the selected strategy.
    pub fn strategy(&self, config: &ShootingConfig)
        -> Box<dyn Eigensolver + Send + Sync>
    {
        match *self {
            Self::Direct => Box::new(Direct),
            Self::Shooting { bracket } => Box::new(Shooting::new(bracket, config)),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Shooting { .. } => "shooting",
        }
    }
}

/// Master solving pipeline: grid, potential, operator, extraction, and
/// normalization for one state at a time.
#[derive(Clone, Debug)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a new solver, validating its configuration.
    pub fn new(config: SolverConfig) -> SolveResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &SolverConfig { &self.config }

    /// Build the grid that [`Self::solve`] would use for `state`.
    pub fn grid_for(&self, state: QuantumState) -> SolveResult<RadialGrid> {
        RadialGrid::for_state(state, &self.config.resolution)
    }

    /// Solve for a single state using the configured method.
    pub fn solve(&self, state: QuantumState) -> SolveResult<NormalizedState> {
        let strategy = self.config.method.strategy(&self.config.shooting);
        self.solve_with(state, strategy.as_ref())
    }

    /// Solve for a single state using an arbitrary extraction strategy.
    pub fn solve_with<E>(&self, state: QuantumState, extractor: &E)
        -> SolveResult<NormalizedState>
    where E: Eigensolver + ?Sized
    {
        let grid = self.grid_for(state)?;
        let profile = PotentialProfile::new(&grid, state.l());
        let raw = {
            let op = DiscretizedOperator::build(
                &grid,
                &profile,
                state,
                self.config.stencil,
                self.config.min_points_per_lobe,
            )?;
            extractor.extract(&op, state)?
        };
        let solved = normalize(state, raw, grid, &profile)?;
        tracing::debug!(
            %state,
            method = self.config.method.name(),
            stencil = ?self.config.stencil,
            energy = solved.energy,
            iterations = solved.iterations,
            nodes = solved.nodes,
            "solved state"
        );
        Ok(solved)
    }

    /// Solve for a state and compare the result to a reference.
    pub fn solve_and_validate<O>(&self, state: QuantumState, oracle: &O)
        -> SolveResult<(NormalizedState, Verdict)>
    where O: ReferenceOracle + ?Sized
    {
        let solved = self.solve(state)?;
        let verdict = validate(&solved, oracle, &self.config.tolerances);
        Ok((solved, verdict))
    }

    /// Solve for many independent states in parallel.
    ///
    /// Results are returned in the order of `states`.
    pub fn solve_all(&self, states: &[QuantumState])
        -> Vec<SolveResult<NormalizedState>>
    {
        states.par_iter().map(|state| self.solve(*state)).collect()
    }
}

type CacheKey = (QuantumState, usize, u64, u64);
type CacheCell = Arc<OnceLock<SolveResult<Arc<NormalizedState>>>>;

/// Memoizes solves per state and grid for a single [`Solver`].
///
/// Each key is computed at most once, including under concurrent access;
/// callers racing on the same key block until the first one finishes. Errors
/// are cached as well.
#[derive(Debug)]
pub struct SolveCache {
    solver: Solver,
    cells: Mutex<HashMap<CacheKey, CacheCell>>,
}

impl SolveCache {
    pub fn new(solver: Solver) -> Self {
        Self { solver, cells: Mutex::new(HashMap::new()) }
    }

    /// Get a reference to the underlying solver.
    pub fn solver(&self) -> &Solver { &self.solver }

    fn key(&self, state: QuantumState) -> CacheKey {
        let res = &self.solver.config.resolution;
        (
            state,
            res.points,
            res.r_min.to_bits(),
            res.domain.r_max(state).to_bits(),
        )
    }

    /// Return the solution for `state`, solving it if it has not been
    /// requested before.
    pub fn get(&self, state: QuantumState) -> SolveResult<Arc<NormalizedState>> {
        let key = self.key(state);
        let cell: CacheCell = {
            let mut cells
                = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(key).or_default())
        };
        cell.get_or_init(|| self.solver.solve(state).map(Arc::new)).clone()
    }

    /// Number of states requested so far.
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::{ grid::Resolution, operator::Stencil };

    struct Fixture {
        state: QuantumState,
        grid: RadialGrid,
        profile: PotentialProfile,
    }

    impl Fixture {
        fn new(n: u32, l: u32, points: usize, c: f64) -> Self {
            let state = QuantumState::new(n, l).unwrap();
            let grid
                = RadialGrid::for_state(state, &Resolution::scaled(points, 1e-6, c))
                .unwrap();
            let profile = PotentialProfile::new(&grid, l);
            Self { state, grid, profile }
        }

        fn op(&self, stencil: Stencil) -> DiscretizedOperator<'_> {
            DiscretizedOperator::build(
                &self.grid, &self.profile, self.state, stencil, 8).unwrap()
        }
    }

    #[test]
    fn direct_ground_state() {
        let fx = Fixture::new(1, 0, 1000, 20.0);
        let res = Direct.extract(&fx.op(Stencil::Central), fx.state).unwrap();
        assert_relative_eq!(res.e, -0.5, max_relative = 2e-4);
        assert!(res.residual < 1e-8);
        assert_eq!(res.wf.len(), 1000);
        assert_eq!(res.wf[0], 0.0);
        assert_eq!(res.wf[999], 0.0);
    }

    #[test]
    fn shooting_agrees_with_direct() {
        let fx = Fixture::new(2, 1, 1000, 20.0);
        let op = fx.op(Stencil::Central);
        let direct = Direct.extract(&op, fx.state).unwrap();
        let shooting = Shooting::default().extract(&op, fx.state).unwrap();
        assert_relative_eq!(shooting.e, direct.e, max_relative = 1e-6);
        assert!(shooting.residual < 1e-8);
        assert!(shooting.iterations > 0);
    }

    #[test]
    fn default_bracket_straddles_target() {
        let fx = Fixture::new(3, 0, 2000, 20.0);
        let op = fx.op(Stencil::Numerov);
        let (lo, hi) = Shooting::default_bracket(fx.state);
        assert!(lo < -1.0 / 18.0 && -1.0 / 18.0 < hi);
        let m = fx.profile.outer_turning_index((lo + hi) / 2.0);
        assert!(shoot_two_sided_single(&op, lo, m).0.is_below(2));
        assert!(!shoot_two_sided_single(&op, hi, m).0.is_below(2));
    }

    #[test]
    fn misplaced_bracket_is_shifted() {
        let fx = Fixture::new(1, 0, 2000, 20.0);
        let op = fx.op(Stencil::Numerov);
        let shooting = Shooting {
            bracket: Some((-0.15, -0.1)),
            ..Shooting::default()
        };
        let res = shooting.extract(&op, fx.state).unwrap();
        assert_relative_eq!(res.e, -0.5, max_relative = 1e-4);

        let fixed = Shooting { max_expansions: 0, ..shooting };
        assert!(matches!(
            fixed.extract(&op, fx.state),
            Err(SolveError::EigenvalueNotConverged { iterations: 0, .. }),
        ));
    }

    #[test]
    fn bisection_budget_is_enforced() {
        let fx = Fixture::new(2, 0, 1000, 20.0);
        let shooting = Shooting { maxiters: 3, ..Shooting::default() };
        assert!(matches!(
            shooting.extract(&fx.op(Stencil::Central), fx.state),
            Err(SolveError::EigenvalueNotConverged { iterations: 3, .. }),
        ));
        let bad = Shooting { bracket: Some((-0.1, -0.2)), ..Shooting::default() };
        assert!(matches!(
            bad.extract(&fx.op(Stencil::Central), fx.state),
            Err(SolveError::InvalidBracket { .. }),
        ));
    }

    #[test]
    fn node_count_ignores_forbidden_tails() {
        let fx = Fixture::new(1, 0, 101, 10.0);
        // one node at r = 3, then alternating noise from r = 8 onward
        let wf: nd::Array1<f64>
            = fx.grid.r().iter().enumerate()
            .map(|(k, &r)| {
                if k < 80 { (3.0 - r) * (-r).exp() }
                else if k % 2 == 0 { 1e-20 }
                else { -1e-20 }
            })
            .collect();
        // V_eff < -1/8 only for r < 8
        assert_eq!(node_count(&wf, &fx.profile, -0.125), 1);
        // V_eff < 0 everywhere
        assert_eq!(node_count(&wf, &fx.profile, 0.0), 22);
    }

    #[test]
    fn method_serde() {
        assert_eq!(serde_json::to_string(&Method::Direct).unwrap(), r#""direct""#);
        let m: Method
            = serde_json::from_str(r#"{ "shooting": { "bracket": [-0.6, -0.4] } }"#)
            .unwrap();
        assert_eq!(m, Method::Shooting { bracket: Some((-0.6, -0.4)) });
        let m: Method = serde_json::from_str(r#"{ "shooting": {} }"#).unwrap();
        assert!(m.is_shooting());
    }
}
