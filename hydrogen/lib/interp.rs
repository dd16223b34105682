//! Evaluation of array-sampled (continuous) functions between grid points, and
//! location of their zeros, via local Lagrange polynomials.
//!
//! ```
//! use ndarray as nd;
//! use hydrogen::interp::{ Zero, find_zeros };
//!
//! let r: nd::Array1<f64> = nd::Array::linspace(0.0, 10.0, 1001);
//! // u(r) of the 3s state, up to normalization
//! let u = r.mapv(|rk| rk * (27.0 - 18.0 * rk + 2.0 * rk * rk) * (-rk / 3.0).exp());
//! let nodes = find_zeros(&r.slice(nd::s![1..]), &u.slice(nd::s![1..]), Zero::All)
//!     .unwrap();
//! let exact = [(9.0 - 27.0_f64.sqrt()) / 2.0, (9.0 + 27.0_f64.sqrt()) / 2.0];
//! assert_eq!(nodes.len(), 2);
//! assert!(nodes.iter().zip(exact).all(|(a, b)| (a - b).abs() < 1e-6));
//! ```

use ndarray as nd;
use num_traits::Num;
use crate::error::*;

pub type InterpResult<T> = Result<T, InterpError>;

// number of samples in a local interpolation window
const WINDOW: usize = 5;

/// Kind of zero crossing to look for in [`find_zeros`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zero {
    /// Crossings from positive to negative.
    Falling,
    /// Crossings from negative to positive.
    Rising,
    /// Any crossing.
    All,
}

impl Zero {
    // true if a crossing from `before` to `after` is of this kind
    fn accepts<A>(self, before: A, after: A) -> bool
    where A: Num + PartialOrd + Copy
    {
        let z = A::zero();
        match self {
            Self::Falling => before > z && after <= z,
            Self::Rising => before < z && after >= z,
            Self::All => (before > z && after <= z) || (before < z && after >= z),
        }
    }
}

/// Evaluate the Lagrange polynomial through all `(data_x, data_y)` pairs at
/// `x`.
pub fn lagrange<S, T, A>(
    data_x: &nd::ArrayBase<S, nd::Ix1>,
    data_y: &nd::ArrayBase<T, nd::Ix1>,
    x: A,
) -> InterpResult<A>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + Copy
{
    LengthError::check(data_x, data_y)?;
    let mut acc = A::zero();
    for (j, (&xj, &yj)) in data_x.iter().zip(data_y).enumerate() {
        let mut basis = A::one();
        for (m, &xm) in data_x.iter().enumerate() {
            if m != j { basis = basis * (x - xm) / (xj - xm); }
        }
        acc = acc + yj * basis;
    }
    Ok(acc)
}

// first index of a `WINDOW`-long slice of `n` samples centered on `k`
fn window_start(k: usize, n: usize) -> usize {
    k.saturating_sub(WINDOW / 2).min(n - WINDOW)
}

/// Evaluate a sampled function at `x` via a Lagrange polynomial through the
/// five samples nearest to `x`.
///
/// `data_x` must be sorted in increasing order, and `x` must lie within its
/// range.
pub fn interpolate<S, T>(
    data_x: &nd::ArrayBase<S, nd::Ix1>,
    data_y: &nd::ArrayBase<T, nd::Ix1>,
    x: f64,
) -> InterpResult<f64>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(data_x, data_y)?;
    LagrangeError::check(data_x)?;
    let n = data_x.len();
    let (lo, hi) = (data_x[0], data_x[n - 1]);
    if !(lo..=hi).contains(&x) {
        return Err(InterpError::OutOfRange(x, lo, hi));
    }
    let k = data_x.iter().take_while(|xk| **xk <= x).count().max(1) - 1;
    let il = window_start(k, n);
    let ir = il + WINDOW;
    lagrange(&data_x.slice(nd::s![il..ir]), &data_y.slice(nd::s![il..ir]), x)
}

/// Return the locations of all zeros of a given kind in a sampled function,
/// in increasing order.
///
/// Each crossing is located by inverse interpolation, treating `x` as a
/// polynomial in `y` over the samples around the crossing, so the function
/// must be locally monotonic on the scale of a few grid points. A sample that
/// is exactly zero is reported as is.
pub fn find_zeros<S, T, A>(
    data_x: &nd::ArrayBase<S, nd::Ix1>,
    data_y: &nd::ArrayBase<T, nd::Ix1>,
    kind: Zero,
) -> InterpResult<Vec<A>>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + PartialOrd + Copy,
{
    LengthError::check(data_x, data_y)?;
    LagrangeError::check(data_x)?;
    let n = data_x.len();
    let z = A::zero();
    let mut zeros: Vec<A> = Vec::new();
    for k in 1..n {
        let (before, after) = (data_y[k - 1], data_y[k]);
        if !kind.accepts(before, after) { continue; }
        if after == z {
            zeros.push(data_x[k]);
            continue;
        }
        // inverse interpolation needs y strictly monotonic over the window;
        // shrink it toward the crossing until it is
        let mut il = window_start(k - 1, n);
        let mut ir = il + WINDOW;
        while ir - il > 2 && !monotonic(&data_y.slice(nd::s![il..ir])) {
            if k - 1 - il > ir - 1 - k { il += 1; } else { ir -= 1; }
        }
        if ir - il < 4 {
            tracing::warn!(
                points = ir - il,
                "interp::find_zeros: interpolating a crossing over few points; \
                some accuracy may be lost"
            );
        }
        let x0 = lagrange(
            &data_y.slice(nd::s![il..ir]),
            &data_x.slice(nd::s![il..ir]),
            z,
        )?;
        zeros.push(x0);
    }
    Ok(zeros)
}

fn monotonic<S, A>(y: &nd::ArrayBase<S, nd::Ix1>) -> bool
where
    S: nd::Data<Elem = A>,
    A: PartialOrd,
{
    let pairs = || y.iter().zip(y.iter().skip(1));
    pairs().all(|(a, b)| a < b) || pairs().all(|(a, b)| a > b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interpolate_is_exact_for_quartics() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 3.0, 31);
        let f = |t: f64| 1.0 - 2.0 * t + 0.5 * t.powi(3) - 0.1 * t.powi(4);
        let y = x.mapv(f);
        for t in [0.0, 0.013, 1.234, 2.99, 3.0] {
            assert_relative_eq!(
                interpolate(&x, &y, t).unwrap(), f(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn interpolate_rejects_out_of_range() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 11);
        let y = x.clone();
        assert_eq!(
            interpolate(&x, &y, 1.5),
            Err(InterpError::OutOfRange(1.5, 0.0, 1.0)),
        );
        assert!(matches!(
            interpolate(&x.slice(nd::s![..3]), &y.slice(nd::s![..3]), 0.1),
            Err(InterpError::Lagrange(_)),
        ));
    }

    #[test]
    fn zeros_by_kind() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.5, 10.0, 951);
        let y = x.mapv(f64::sin);
        let rising = find_zeros(&x, &y, Zero::Rising).unwrap();
        let falling = find_zeros(&x, &y, Zero::Falling).unwrap();
        assert_eq!(rising.len(), 1);
        assert_eq!(falling.len(), 2);
        assert_relative_eq!(rising[0], 2.0 * std::f64::consts::PI, epsilon = 1e-6);
        assert_relative_eq!(falling[0], std::f64::consts::PI, epsilon = 1e-6);
    }
}
