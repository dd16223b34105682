use std::sync::Arc;
use approx::assert_relative_eq;
use rayon::prelude::*;
use hydrogen::{
    config::{ ShootingConfig, SolverConfig },
    error::SolveError,
    grid::{ QuantumState, Resolution },
    operator::Stencil,
    oracle::Hydrogenic,
    solve::{ Method, Shooting, SolveCache, Solver },
};

fn state(n: u32, l: u32) -> QuantumState { QuantumState::new(n, l).unwrap() }

fn shooting_solver(bracket: Option<(f64, f64)>, shooting: ShootingConfig)
    -> Solver
{
    let config = SolverConfig {
        resolution: Resolution::scaled(2000, 1e-6, 20.0),
        stencil: Stencil::Numerov,
        method: Method::Shooting { bracket },
        shooting,
        ..SolverConfig::default()
    };
    Solver::new(config).unwrap()
}

#[test]
fn ground_state() {
    let solver = Solver::new(SolverConfig::default()).unwrap();
    let (solved, verdict) = solver.solve_and_validate(state(1, 0), &Hydrogenic).unwrap();
    assert!(verdict.passed(), "{verdict}");
    assert_relative_eq!(solved.energy, -0.5, max_relative = 1e-3);
    assert_eq!(solved.nodes, 0);
    // R(r) = 2 exp(-r) decays monotonically
    let radial = solved.radial();
    let r = solved.grid.r();
    let inner: Vec<f64>
        = radial.iter().zip(r).skip(1)
        .take_while(|(_, rk)| **rk < 8.0)
        .map(|(radial_k, _)| *radial_k)
        .collect();
    assert!(inner.windows(2).all(|w| w[1] < w[0]));
    assert!(inner.iter().all(|radial_k| *radial_k > 0.0));
    assert_relative_eq!(solved.radial_at(1.0).unwrap(), 2.0 / 1.0_f64.exp(), max_relative = 1e-3);
}

#[test]
fn first_excited_states() {
    let solver = Solver::new(SolverConfig::default()).unwrap();

    let s = solver.solve(state(2, 0)).unwrap();
    assert_relative_eq!(s.energy, -0.125, max_relative = 1e-3);
    assert_eq!(s.nodes, 1);
    let nodes = s.node_positions().unwrap();
    assert_eq!(nodes.len(), 1);
    assert!((nodes[0] - 2.0).abs() < 1e-2, "{nodes:?}");

    let p = solver.solve(state(2, 1)).unwrap();
    assert_relative_eq!(p.energy, -0.125, max_relative = 1e-3);
    assert_eq!(p.nodes, 0);
    assert!(p.node_positions().unwrap().is_empty());
}

#[test]
fn invalid_quantum_numbers() {
    assert_eq!(
        QuantumState::new(1, 1),
        Err(SolveError::InvalidQuantumNumbers { n: 1, l: 1 }),
    );
    assert!(serde_json::from_str::<QuantumState>("[1, 1]").is_err());
    assert_eq!(serde_json::from_str::<QuantumState>("[3, 2]").unwrap(), state(3, 2));
}

#[test]
fn wrong_bracket_is_searched_again() {
    // bracket around 1s while asking for 2s
    let solver = shooting_solver(Some((-0.6, -0.4)), ShootingConfig::default());
    let solved = solver.solve(state(2, 0)).unwrap();
    assert_relative_eq!(solved.energy, -0.125, max_relative = 1e-3);
    assert_eq!(solved.nodes, 1);

    // bracket well below 3p
    let solved = solver
        .solve_with(
            state(3, 1),
            &Shooting::new(Some((-0.3, -0.2)), &ShootingConfig::default()),
        )
        .unwrap();
    assert_relative_eq!(solved.energy, -1.0 / 18.0, max_relative = 1e-3);

    let no_search = ShootingConfig { max_bracket_expansions: 0, ..Default::default() };
    let solver = shooting_solver(Some((-0.6, -0.4)), no_search);
    assert!(matches!(
        solver.solve(state(2, 0)),
        Err(SolveError::EigenvalueNotConverged { .. }),
    ));
}

#[test]
fn iteration_budget_is_reported() {
    let tight = ShootingConfig { maxiters: 2, ..Default::default() };
    let solver = shooting_solver(None, tight);
    match solver.solve(state(3, 0)) {
        Err(SolveError::EigenvalueNotConverged { state: s, iterations, energy, .. }) => {
            assert_eq!(s, state(3, 0));
            assert_eq!(iterations, 2);
            assert!(energy < 0.0);
        },
        other => panic!("expected EigenvalueNotConverged, got {other:?}"),
    }
}

#[test]
fn coarse_grid_is_refused() {
    let config = SolverConfig {
        resolution: Resolution::scaled(60, 1e-6, 20.0),
        ..SolverConfig::default()
    };
    let solver = Solver::new(config).unwrap();
    assert!(matches!(
        solver.solve(state(6, 0)),
        Err(SolveError::GridTooCoarse { points: 60, .. }),
    ));
}

#[test]
fn invalid_config_is_refused() {
    let config = SolverConfig {
        resolution: Resolution::scaled(1000, 0.0, 20.0),
        ..SolverConfig::default()
    };
    assert!(matches!(Solver::new(config), Err(SolveError::InvalidResolution { .. })));
}

#[test]
fn cache_solves_each_key_once() {
    let config = SolverConfig {
        resolution: Resolution::scaled(400, 1e-6, 20.0),
        method: Method::Shooting { bracket: None },
        ..SolverConfig::default()
    };
    let cache = SolveCache::new(Solver::new(config).unwrap());
    assert!(cache.is_empty());

    let results: Vec<Arc<_>>
        = (0..16).into_par_iter()
        .map(|_| cache.get(state(2, 1)).unwrap())
        .collect();
    assert_eq!(cache.len(), 1);
    assert!(results.iter().all(|res| Arc::ptr_eq(res, &results[0])));

    let again = cache.get(state(2, 1)).unwrap();
    assert!(Arc::ptr_eq(&again, &results[0]));
    let other = cache.get(state(2, 0)).unwrap();
    assert!(!Arc::ptr_eq(&other, &again));
    assert_eq!(cache.len(), 2);

    // failures are cached as well
    let err = cache.get(state(6, 0));
    assert!(matches!(err, Err(SolveError::GridTooCoarse { .. })));
    assert_eq!(cache.get(state(6, 0)), err);
    assert_eq!(cache.len(), 3);
}

#[test]
fn solved_state_serializes() {
    let solver = Solver::new(SolverConfig {
        resolution: Resolution::scaled(500, 1e-6, 20.0),
        ..SolverConfig::default()
    }).unwrap();
    let solved = solver.solve(state(1, 0)).unwrap();
    let json = serde_json::to_string(&solved).unwrap();
    let back: hydrogen::normalize::NormalizedState
        = serde_json::from_str(&json).unwrap();
    assert_eq!(back.state, solved.state);
    assert_eq!(back.nodes, 0);
    assert_eq!(back.u.len(), 500);
    assert_relative_eq!(back.energy, solved.energy, max_relative = 1e-15);
}
