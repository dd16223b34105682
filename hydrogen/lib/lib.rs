#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for the numerical solution of
//! the radial time-independent Schrödinger equation of the hydrogen atom, with
//! validation against the closed-form bound states.
//!
//! Everything is expressed in atomic units (ħ = mₑ = e = 1), so that energies
//! are in Hartree and lengths in Bohr radii.
//!
//! Provides implementations for the following numerical routines:
//! - Discretization of −½ d²/dr² + V_eff(r) with Dirichlet boundaries, using
//!   either the three-point central difference or the matrix Numerov stencil
//! - Direct eigendecomposition of the discretized operator
//! - Two-sided shooting with node-count-guarded bisection on the logarithmic
//!   derivative mismatch
//! - Trapezoid-rule normalization and comparison against the generalized
//!   Laguerre reference solutions
//!
//! ```no_run
//! use hydrogen::{ config::SolverConfig, grid::QuantumState, solve::Solver };
//!
//! let solver = Solver::new(SolverConfig::default()).unwrap();
//! let state = solver.solve(QuantumState::new(2, 1).unwrap()).unwrap();
//! println!("E(2p) = {:.6} Ha, {} nodes", state.energy, state.nodes);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod config;
pub mod error;
pub mod grid;
pub mod interp;
pub mod normalize;
pub mod operator;
pub mod oracle;
pub mod solve;
pub mod units;
pub mod utils;
pub mod validate;

pub mod docs;

pub(crate) const DEF_POINTS: usize = 3000;
pub(crate) const DEF_R_MIN: f64 = 1e-6;
pub(crate) const DEF_DOMAIN_SCALE: f64 = 10.0;
pub(crate) const MIN_DOMAIN_SCALE: f64 = 10.0;
pub(crate) const DEF_POINTS_PER_LOBE: usize = 8;
pub(crate) const DEF_EPSILON: f64 = 1e-8;
pub(crate) const DEF_MAXITERS: usize = 200;
pub(crate) const DEF_EXPANSIONS: usize = 16;
pub(crate) const DEF_ENERGY_TOL: f64 = 1e-3;
pub(crate) const DEF_WF_TOL: f64 = 1e-2;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
