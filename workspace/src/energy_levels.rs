//! Solve every bound state up to `n = 6`, compare against the closed-form
//! energies, and write the table to `output/energy_levels.json`.
//!
//! Usage: `energy_levels [config.json]`

use std::{ fs, path::PathBuf };
use anyhow::Context;
use hydrogen::{
    config::SolverConfig,
    grid::QuantumState,
    oracle::Hydrogenic,
    solve::Solver,
    validate::validate,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const N_MAX: u32 = 6;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SolverConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => SolverConfig::default(),
    };
    let solver = Solver::new(config)?;
    let states: Vec<QuantumState> = QuantumState::up_to(N_MAX).collect();
    let solved = solver.solve_all(&states);

    let mut rows: Vec<serde_json::Value> = Vec::with_capacity(states.len());
    let mut failures: usize = 0;
    println!("{:>5} {:>16} {:>16} {:>10} {:>10} {:>6}", "state", "E (Ha)", "E (eV)", "ΔE/E", "‖Δu‖", "nodes");
    for (state, res) in states.iter().zip(solved) {
        let solved = res.with_context(|| format!("solving {state}"))?;
        let verdict = validate(&solved, &Hydrogenic, &config.tolerances);
        if !verdict.passed() { failures += 1; }
        println!(
            "{:>5} {:>16.10} {:>16.10} {:>10.2e} {:>10.2e} {:>6}",
            state.to_string(),
            solved.energy,
            solved.energy_ev(),
            verdict.energy_error,
            verdict.wavefunction_error,
            solved.nodes,
        );
        rows.push(json!({
            "n": state.n(),
            "l": state.l(),
            "label": state.to_string(),
            "energy": solved.energy,
            "energy_ev": solved.energy_ev(),
            "nodes": solved.nodes,
            "residual": solved.residual,
            "iterations": solved.iterations,
            "verdict": verdict,
        }));
    }
    if failures > 0 {
        tracing::warn!(failures, "some states failed validation");
    }

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let doc = json!({ "config": config, "levels": rows });
    fs::write(
        outdir.join("energy_levels.json"),
        serde_json::to_string_pretty(&doc)?,
    )?;
    Ok(())
}
