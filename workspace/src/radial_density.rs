//! Radial probability densities of all states up to `n = 3`, alongside the
//! closed-form densities, node positions, and mean radii. Written to
//! `output/radial_density.json`.

use std::{ fs, path::PathBuf, sync::Arc };
use hydrogen::{
    config::SolverConfig,
    grid::QuantumState,
    oracle::{ Hydrogenic, ReferenceOracle },
    solve::{ SolveCache, Solver },
};
use ndarray as nd;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const N_MAX: u32 = 3;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache = SolveCache::new(Solver::new(SolverConfig::default())?);
    let mut states: Vec<serde_json::Value> = Vec::new();
    for state in QuantumState::up_to(N_MAX) {
        let solved: Arc<_> = cache.get(state)?;
        let exact: nd::Array1<f64>
            = Hydrogenic.sample(state, &solved.grid).mapv(|u| u * u);
        let nodes = solved.node_positions()?;
        println!(
            "{state}: ⟨r⟩ = {:.6} (exact {:.6}), Δr = {:.6} (exact {:.6}), nodes at {nodes:.4?}",
            solved.mean_radius(),
            Hydrogenic::mean_radius(state),
            solved.radial_spread(),
            Hydrogenic::radial_spread(state),
        );
        states.push(json!({
            "label": state.to_string(),
            "n": state.n(),
            "l": state.l(),
            "energy": solved.energy,
            "r": solved.grid.r(),
            "density": solved.density(),
            "exact_density": exact,
            "node_positions": nodes,
            "mean_radius": solved.mean_radius(),
            "exact_mean_radius": Hydrogenic::mean_radius(state),
        }));
    }
    tracing::info!(cached = cache.len(), "solved states");

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    fs::write(
        outdir.join("radial_density.json"),
        serde_json::to_string_pretty(&states)?,
    )?;
    Ok(())
}
