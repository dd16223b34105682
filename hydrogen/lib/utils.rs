//! Miscellaneous tools.

use ndarray::{ self as nd, Ix1 };

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S>(y: &nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::Data<Elem = f64>
{
    let n: usize = y.len();
    (dx / 2.0) * (y[0] + 2.0 * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Calculate the norm of a (reduced radial) wavefunction, `∫ |u|² dr`.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S>(q: &nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::Data<Elem = f64>
{
    let n: usize = q.len();
    (dx / 2.0) * (
        q[0].powi(2)
        + 2.0 * q.iter().skip(1).take(n - 2).map(|qk| qk.powi(2)).sum::<f64>()
        + q[n - 1].powi(2)
    )
}

/// Calculate the inner product of two wavefunctions.
///
/// *Panics if either array has length less than 2*.
pub fn wf_dot<S, T>(
    q: &nd::ArrayBase<S, Ix1>,
    p: &nd::ArrayBase<T, Ix1>,
    dx: f64,
) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let n: usize = q.len().min(p.len());
    (dx / 2.0) * (
        q[0] * p[0]
        + 2.0 * q.iter().zip(p).skip(1).take(n - 2)
            .map(|(qk, pk)| qk * pk)
            .sum::<f64>()
        + q[n - 1] * p[n - 1]
    )
}

/// Calculate the L² distance `√(∫ |q - s p|² dx)` between two wavefunctions
/// for a fixed overall sign `s = ±1`.
///
/// *Panics if either array has length less than 2*.
pub fn wf_distance<S, T>(
    q: &nd::ArrayBase<S, Ix1>,
    p: &nd::ArrayBase<T, Ix1>,
    sign: f64,
    dx: f64,
) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let diff: nd::Array1<f64>
        = q.iter().zip(p).map(|(qk, pk)| qk - sign * pk).collect();
    wf_norm(&diff, dx).sqrt()
}

/// Count the sign changes in a sampled function, skipping exact zeros.
///
/// Only changes landing on an index for which `keep` returns `true` are
/// counted.
pub fn sign_changes_where<S, F>(q: &nd::ArrayBase<S, Ix1>, mut keep: F) -> usize
where
    S: nd::Data<Elem = f64>,
    F: FnMut(usize) -> bool,
{
    let mut last: f64 = 0.0;
    let mut count: usize = 0;
    for (k, &qk) in q.iter().enumerate() {
        if qk == 0.0 { continue; }
        if last * qk < 0.0 && keep(k) { count += 1; }
        last = qk;
    }
    count
}

/// Count all sign changes in a sampled function, skipping exact zeros.
pub fn sign_changes<S>(q: &nd::ArrayBase<S, Ix1>) -> usize
where S: nd::Data<Elem = f64>
{
    sign_changes_where(q, |_| true)
}
