//! Grid-convergence study: energy error versus number of grid points for both
//! stencils, written to `output/convergence.json`.
//!
//! Successive point counts roughly halve the grid spacing, so the printed error
//! ratios approach 4 for the central difference.

use std::{ fs, path::PathBuf };
use hydrogen::{
    config::SolverConfig,
    grid::{ QuantumState, Resolution },
    operator::Stencil,
    oracle::{ Hydrogenic, ReferenceOracle },
    solve::Solver,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const POINTS: &[usize] = &[251, 501, 1001, 2001];
const STATES: &[(u32, u32)] = &[(1, 0), (2, 1), (3, 2)];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut series: Vec<serde_json::Value> = Vec::new();
    for &(n, l) in STATES {
        let state = QuantumState::new(n, l)?;
        let exact = Hydrogenic.energy(state);
        for stencil in [Stencil::Central, Stencil::Numerov] {
            let mut errors: Vec<f64> = Vec::with_capacity(POINTS.len());
            for &points in POINTS {
                let config = SolverConfig {
                    resolution: Resolution::scaled(points, 1e-6, 20.0),
                    stencil,
                    min_points_per_lobe: 1,
                    ..SolverConfig::default()
                };
                let solved = Solver::new(config)?.solve(state)?;
                let err = ((solved.energy - exact) / exact).abs();
                let ratio = errors.last().map(|prev| prev / err);
                println!(
                    "{state} {stencil:?} N = {points:>5}: ΔE/E = {err:.3e}{}",
                    ratio.map(|r| format!(", ratio {r:.2}")).unwrap_or_default(),
                );
                errors.push(err);
            }
            series.push(json!({
                "state": state.to_string(),
                "stencil": stencil,
                "points": POINTS,
                "relative_error": errors,
            }));
        }
    }

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    fs::write(
        outdir.join("convergence.json"),
        serde_json::to_string_pretty(&series)?,
    )?;
    Ok(())
}
