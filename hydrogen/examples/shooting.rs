use hydrogen::{
    config::{ ShootingConfig, SolverConfig },
    grid::{ QuantumState, Resolution },
    operator::Stencil,
    oracle::Hydrogenic,
    solve::{ Method, Shooting, Solver },
};

// solve for a few excited states with the shooting method, starting one of
// them from a deliberately wrong energy bracket

fn main() {
    let config = SolverConfig {
        resolution: Resolution::scaled(3000, 1e-6, 20.0),
        stencil: Stencil::Numerov,
        method: Method::Shooting { bracket: None },
        ..SolverConfig::default()
    };
    let solver = Solver::new(config).unwrap();

    for (n, l) in [(2, 1), (3, 2), (4, 0)] {
        let state = QuantumState::new(n, l).unwrap();
        let (solved, verdict) = solver.solve_and_validate(state, &Hydrogenic).unwrap();
        println!("{verdict} in {} iterations", solved.iterations);
    }

    // a bracket around the 1s level while asking for 2s: the bracket is
    // shifted upward until it straddles -1/8
    let state = QuantumState::new(2, 0).unwrap();
    let wrong = Shooting::new(Some((-0.6, -0.4)), &ShootingConfig::default());
    let solved = solver.solve_with(state, &wrong).unwrap();
    println!("expected: {:.8}", -0.125);
    println!("computed: {:.8} ({} nodes)", solved.energy, solved.nodes);
}
