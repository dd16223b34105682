//! Theoretical background.
//!
//! # Contents
//! - [Radial equation](#radial-equation)
//! - [Discretization](#discretization)
//! - [Direct diagonalization](#direct-diagonalization)
//! - [Shooting](#shooting)
//! - [Validation](#validation)
//!
//! # Radial equation
//! In a central potential the wavefunction separates into radial and angular
//! parts, *ψ*(*r*, *θ*, *φ*) = *R*(*r*) *Y*(*θ*, *φ*), with *Y* a spherical
//! harmonic. Writing *u*(*r*) ≡ *r* *R*(*r*), the radial equation for hydrogen
//! in atomic units (*ħ* = *m*ₑ = *e* = 4*πε*₀ = 1) is
//! ```text
//!   1 ∂²u
//! - - --- + V_eff(r) u(r) = E u(r)
//!   2 ∂r²
//!
//!            l (l + 1)   1
//! V_eff(r) = --------- - -
//!               2 r²     r
//! ```
//! which has the form of a one-dimensional Schrödinger equation on the half
//! line. Bound states satisfy *u*(0) = 0 and *u*(*r*) → 0 as *r* → ∞, and
//! carry energies *E*ₙ = -1/2*n*², independent of *l*. The state (*n*, *l*)
//! has *n* - *l* - 1 radial nodes, so among the solutions for fixed *l* it is
//! the one with index *n* - *l* - 1 in order of increasing energy.
//!
//! Lengths are then in Bohr radii and energies in Hartree;
//! [`units`][crate::units] converts out of these.
//!
//! # Discretization
//! The radial coordinate is sampled uniformly,
//! ```text
//! r[i] = r_min + i δr, i ∊ {0, ..., N - 1}
//! ```
//! with a small positive *r*<sub>min</sub> standing in for the origin, where
//! the centrifugal and Coulomb terms diverge, and *r*<sub>max</sub> = *c* *n*²
//! large enough for the state to have decayed. Both boundaries are treated as
//! Dirichlet conditions *u*\[0\] = *u*\[*N* - 1\] = 0, so the unknowns are the
//! *N* - 2 interior samples.
//!
//! The three-point central difference gives a symmetric tridiagonal
//! Hamiltonian,
//! ```text
//! H[i, i]     = 1 / δr² + V_eff(r[i])
//! H[i, i ± 1] = -1 / 2δr²
//! ```
//! with an *O*(*δr*²) error, so that halving the spacing reduces the energy
//! error by about a factor of 4.
//!
//! Numerov's scheme[^1] raises this to *O*(*δr*⁴) by writing the second
//! derivative as *B*⁻¹*A* with[^2]
//! ```text
//! A = (I{-1} - 2 I{0} + I{+1}) / δr²
//! B = (I{-1} + 10 I{0} + I{+1}) / 12
//! ```
//! where *I*{*k*} is the matrix with ones on the *k*-th diagonal, giving the
//! dense Hamiltonian *H* = -½ *B*⁻¹*A* + *V*. Near the origin the 1/*r*
//! singularity spoils the higher order for *s* states.
//!
//! Both stencils are equivalent to a three-term recurrence
//! ```text
//! w[i + 1] u[i + 1] = c[i] u[i] - w[i - 1] u[i - 1]
//! ```
//! with *w* = 1 and *c* = 2 + 2 *δr*² (*V* - *E*) for the central difference,
//! and *w* = 1 + *δr*² (*E* - *V*) / 6 and *c* = 12 - 10 *w* for Numerov. The
//! shooting method integrates this recurrence, so both extraction methods
//! solve the same discrete problem.
//!
//! A grid is only useful if it resolves the state: the spacing must leave a
//! minimum number of intervals per lobe between *r*<sub>min</sub> and the
//! outer classical turning point
//! ```text
//! r_t = n² + n √(n² - l (l + 1))
//! ```
//! or the solver refuses to proceed.
//!
//! # Direct diagonalization
//! The dense Hamiltonian is diagonalized by LAPACK's symmetric eigensolver,
//! which returns eigenvalues in ascending order. The state (*n*, *l*) is
//! simply the eigenpair at index *n* - *l* - 1. The cost is *O*(*N*³) and
//! the result is deterministic.
//!
//! # Shooting
//! For a trial energy, the recurrence is integrated outward from
//! *r*<sub>min</sub> with *u* ∝ *r*<sup>*l*+1</sup> and inward from
//! *r*<sub>max</sub> with *u* ∝ exp(-*κ* *r*), *κ* = √(-2*E*), meeting at the
//! outer classical turning point *r*\[*M*\]. Integrating into the forbidden
//! region from the allowed side would couple to the growing solution, which
//! is why the inward leg is needed. The mismatch is the difference of
//! logarithmic derivatives at the meeting point,
//! ```text
//!     ∂         |      ∂        |
//! D = -- ln u_o |    - -- ln u_i |
//!     ∂r        |r[M]  ∂r        |r[M]
//! ```
//! which discards the arbitrary normalizations of the two legs.
//!
//! For fixed *l*, the number of nodes *ν* of the matched trial solution,
//! together with the sign of *D*, orders trial energies relative to the
//! eigenvalue with *ν* nodes: a trial energy is below it if its solution has
//! fewer than *ν* nodes, or exactly *ν* nodes and *D* > 0. This predicate is
//! monotone in *E*, so a bracket whose lower end is below the target and
//! whose upper end is not can be refined by bisection until a trial with *ν*
//! nodes has |*D*| smaller than the tolerance. A bracket that fails the test
//! is shifted geometrically (doubling its lower end, or halving its upper
//! end) in the direction the predicate indicates.
//!
//! Nodes of the final solution are counted only where *V*<sub>eff</sub> <
//! *E*; in the forbidden tails the solution is exponentially small and sign
//! flips there are round-off.
//!
//! # Validation
//! Closed-form solutions are
//! ```text
//!               (2/n)³ (n - l - 1)!
//! R(r) = √(---------------------) exp(-ρ/2) ρ^l L[n - l - 1, 2l + 1](ρ)
//!                2n (n + l)!
//! ```
//! with *ρ* = 2*r*/*n* and *L* a generalized Laguerre polynomial. A solved
//! state is compared to these via its relative energy error and the L²
//! distance between normalized reduced radial functions,
//! ```text
//! min  √(∫ (u - s u_exact)² dr)
//! s=±1
//! ```
//! since eigenvectors carry an arbitrary sign.
//!
//! [^1]: B. Numerov, "Note on the numerical integration of d2x/dt2 = f(x,t)."
//! Astronomische Nachrichten **230** 19 (1927).
//!
//! [^2]: M. Pillai, J. Goglio, and T. Walker, "Matrix Numerov method for
//! solving Schrödinger's equation." American Journal of Physics **80** 11
//! 1017-1019 (2012).
