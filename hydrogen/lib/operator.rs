//! Discretization of the radial Hamiltonian `-½ d²/dr² + V_eff(r)` over a
//! [`RadialGrid`].
//!
//! The wavefunction is pinned to zero at both ends of the grid (Dirichlet
//! conditions standing in for regularity at the origin and decay at infinity),
//! so the operator acts on the `N - 2` interior points only.

use ndarray as nd;
use ndarray_linalg::InverseInto;
use serde::{ Deserialize, Serialize };
use crate::{
    error::{ LengthError, SolveError, SolveResult },
    grid::{ PotentialProfile, QuantumState, RadialGrid },
};

/// Finite-difference stencil used for the second derivative.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stencil {
    /// Three-point central difference, second order in the grid spacing. The
    /// Hamiltonian is tridiagonal.
    #[default]
    Central,
    /// Numerov's scheme, fourth order in the grid spacing. The Hamiltonian
    /// `-½ inv(B) A + V` is dense.
    Numerov,
}

/// The radial Hamiltonian for a fixed grid, potential, and stencil.
///
/// Borrows its grid and potential and lives only as long as a single solve.
#[derive(Clone, Debug)]
pub struct DiscretizedOperator<'a> {
    grid: &'a RadialGrid,
    potential: &'a PotentialProfile,
    stencil: Stencil,
    // diagonal of the central-difference Hamiltonian over interior points
    diag: nd::Array1<f64>,
    // (constant) off-diagonal of the central-difference Hamiltonian
    off: f64,
}

impl<'a> DiscretizedOperator<'a> {
    /// Build the operator for `state`.
    ///
    /// Fails with [`SolveError::GridTooCoarse`] if fewer than
    /// `points_per_lobe` grid intervals are available per radial lobe between
    /// the inner edge of the grid and the outer classical turning point of the
    /// state.
    pub fn build(
        grid: &'a RadialGrid,
        potential: &'a PotentialProfile,
        state: QuantumState,
        stencil: Stencil,
        points_per_lobe: usize,
    ) -> SolveResult<Self>
    {
        LengthError::check(grid.r(), potential.values())?;
        check_resolution(grid, state, points_per_lobe)?;
        let n = grid.len();
        let ondr2 = grid.dr().powi(2).recip();
        let diag: nd::Array1<f64>
            = potential.values().slice(nd::s![1..n - 1]).mapv(|V| ondr2 + V);
        let off = -0.5 * ondr2;
        Ok(Self { grid, potential, stencil, diag, off })
    }

    /// Get the grid the operator was built on.
    pub fn grid(&self) -> &'a RadialGrid { self.grid }

    /// Get the potential the operator was built with.
    pub fn potential(&self) -> &'a PotentialProfile { self.potential }

    /// Get the stencil.
    pub fn stencil(&self) -> Stencil { self.stencil }

    /// Number of interior (unknown) points.
    pub fn dim(&self) -> usize { self.diag.len() }

    /// Diagonal band of the central-difference Hamiltonian.
    pub fn diag(&self) -> &nd::Array1<f64> { &self.diag }

    /// Off-diagonal band of the central-difference Hamiltonian.
    pub fn off(&self) -> f64 { self.off }

    /// Assemble the Hamiltonian as a dense, symmetric matrix over the interior
    /// points.
    pub fn to_matrix(&self) -> SolveResult<nd::Array2<f64>> {
        let m = self.dim();
        match self.stencil {
            Stencil::Central => {
                let mut H: nd::Array2<f64> = nd::Array2::from_diag(&self.diag);
                H.slice_mut(nd::s![1..m, 0..m - 1]).diag_mut().fill(self.off);
                H.slice_mut(nd::s![0..m - 1, 1..m]).diag_mut().fill(self.off);
                Ok(H)
            },
            Stencil::Numerov => {
                let n = self.grid.len();
                let ondr2 = self.grid.dr().powi(2).recip();
                let mut B: nd::Array2<f64>
                    = nd::Array2::from_diag_elem(m, 10.0 / 12.0);
                B.slice_mut(nd::s![1..m, 0..m - 1]).diag_mut()
                    .fill(12.0_f64.recip());
                B.slice_mut(nd::s![0..m - 1, 1..m]).diag_mut()
                    .fill(12.0_f64.recip());
                let Binv = B.inv_into()?;
                // A is tridiagonal, so column j of inv(B) A is
                // (Binv[:, j - 1] - 2 Binv[:, j] + Binv[:, j + 1]) / δr²
                let mut H: nd::Array2<f64> = Binv.mapv(|b| ondr2 * b);
                {
                    let mut left = H.slice_mut(nd::s![.., 0..m - 1]);
                    left.scaled_add(-0.5 * ondr2, &Binv.slice(nd::s![.., 1..m]));
                }
                {
                    let mut right = H.slice_mut(nd::s![.., 1..m]);
                    right.scaled_add(-0.5 * ondr2, &Binv.slice(nd::s![.., 0..m - 1]));
                }
                let mut H_diag = H.diag_mut();
                H_diag += &self.potential.values().slice(nd::s![1..n - 1]);
                Ok(H)
            },
        }
    }

    /// Weight `w[i]` of the three-term recurrence
    /// ```text
    /// w[i + 1] u[i + 1] = c[i] u[i] - w[i - 1] u[i - 1]
    /// ```
    /// satisfied by solutions of `H u = E u`, at full-grid index `i`.
    pub fn weight(&self, i: usize, E: f64) -> f64 {
        match self.stencil {
            Stencil::Central => 1.0,
            Stencil::Numerov => {
                1.0 + self.grid.dr().powi(2) / 6.0
                    * (E - self.potential.values()[i])
            },
        }
    }

    /// Center coefficient `c[i]` of the three-term recurrence (see
    /// [`Self::weight`]).
    pub fn center(&self, i: usize, E: f64) -> f64 {
        match self.stencil {
            Stencil::Central => {
                2.0 + 2.0 * self.grid.dr().powi(2)
                    * (self.potential.values()[i] - E)
            },
            Stencil::Numerov => 12.0 - 10.0 * self.weight(i, E),
        }
    }
}

// the outer turning point of a state with n - l - 1 nodes bounds n - l lobes;
// each needs at least `points_per_lobe` intervals
fn check_resolution(
    grid: &RadialGrid,
    state: QuantumState,
    points_per_lobe: usize,
) -> SolveResult<()>
{
    let lobes = f64::from(state.n() - state.l());
    let span = state.turning_point() - grid.r_min();
    if span <= 0.0 {
        return Err(SolveError::InvalidResolution {
            reason: "r_min lies outside the classically allowed region of the state",
        });
    }
    let max_spacing = span / (points_per_lobe.max(1) as f64 * lobes);
    if grid.dr() > max_spacing || grid.len() < 5 {
        return Err(SolveError::GridTooCoarse {
            state,
            points: grid.len(),
            spacing: grid.dr(),
            max_spacing,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::grid::Resolution;

    fn setup(n: u32, l: u32, points: usize)
        -> (QuantumState, RadialGrid, PotentialProfile)
    {
        let state = QuantumState::new(n, l).unwrap();
        let grid
            = RadialGrid::for_state(state, &Resolution::scaled(points, 1e-6, 20.0))
            .unwrap();
        let profile = PotentialProfile::new(&grid, l);
        (state, grid, profile)
    }

    #[test]
    fn central_matrix_is_symmetric_tridiagonal() {
        let (state, grid, profile) = setup(1, 0, 50);
        let op = DiscretizedOperator::build(
            &grid, &profile, state, Stencil::Central, 1).unwrap();
        let H = op.to_matrix().unwrap();
        assert_eq!(H.dim(), (48, 48));
        let dr = grid.dr();
        for i in 0..48 {
            assert_relative_eq!(
                H[[i, i]],
                dr.powi(-2) + profile.values()[i + 1],
                max_relative = 1e-12
            );
            for j in 0..48 {
                assert_eq!(H[[i, j]], H[[j, i]]);
                if i.abs_diff(j) > 1 { assert_eq!(H[[i, j]], 0.0); }
            }
        }
        assert_relative_eq!(H[[3, 4]], -0.5 / dr.powi(2), max_relative = 1e-12);
    }

    #[test]
    fn numerov_matrix_is_symmetric() {
        let (state, grid, profile) = setup(1, 0, 60);
        let op = DiscretizedOperator::build(
            &grid, &profile, state, Stencil::Numerov, 1).unwrap();
        let H = op.to_matrix().unwrap();
        let scale = H.iter().fold(0.0_f64, |acc, h| acc.max(h.abs()));
        for i in 0..op.dim() {
            for j in 0..i {
                assert!((H[[i, j]] - H[[j, i]]).abs() < 1e-10 * scale);
            }
        }
    }

    #[test]
    fn recurrence_reproduces_central_rows() {
        let (state, grid, profile) = setup(2, 1, 200);
        let op = DiscretizedOperator::build(
            &grid, &profile, state, Stencil::Central, 8).unwrap();
        let E = -0.2;
        let (u0, u1) = (0.3, -0.7);
        for i in [5, 50, 150] {
            let u2 = (op.center(i, E) * u1 - op.weight(i - 1, E) * u0)
                / op.weight(i + 1, E);
            // row i - 1 of (H - E) applied to (u0, u1, u2)
            let row = op.off() * u0 + (op.diag()[i - 1] - E) * u1 + op.off() * u2;
            assert!(row.abs() < 1e-9 * grid.dr().powi(-2));
        }
    }

    #[test]
    fn inner_edge_past_turning_point_is_rejected() {
        // 1s turns at r = 2
        let state = QuantumState::new(1, 0).unwrap();
        let grid = RadialGrid::new(5.0, 40.0, 400).unwrap();
        let profile = PotentialProfile::new(&grid, 0);
        let res = DiscretizedOperator::build(
            &grid, &profile, state, Stencil::Central, 8);
        assert!(matches!(res, Err(SolveError::InvalidResolution { .. })));
    }

    #[test]
    fn coarse_grid_is_rejected() {
        let (state, grid, profile) = setup(6, 0, 50);
        let res = DiscretizedOperator::build(
            &grid, &profile, state, Stencil::Central, 8);
        assert!(matches!(res, Err(SolveError::GridTooCoarse { points: 50, .. })));

        let (state, grid, profile) = setup(6, 0, 2000);
        assert!(
            DiscretizedOperator::build(
                &grid, &profile, state, Stencil::Central, 8).is_ok()
        );
    }
}
