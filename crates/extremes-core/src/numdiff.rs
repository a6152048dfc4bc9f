//! Finite-difference derivatives

use nalgebra::{DMatrix, DVector};

/// Relative step of the Hessian stencil
const HESSIAN_STEP: f64 = 1e-4;

/// Central-difference gradient
///
/// Step per coordinate is `ε^{1/3}·max(1, |xᵢ|)`.
pub fn gradient<F>(f: &F, x: &[f64]) -> DVector<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let base = f64::EPSILON.cbrt();
    let mut point = x.to_vec();
    DVector::from_iterator(
        x.len(),
        (0..x.len()).map(|i| {
            let h = base * x[i].abs().max(1.0);
            point[i] = x[i] + h;
            let forward = f(&point);
            point[i] = x[i] - h;
            let backward = f(&point);
            point[i] = x[i];
            (forward - backward) / (2.0 * h)
        }),
    )
}

fn hessian_with_steps<F>(f: &F, x: &[f64], steps: &[f64]) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x.len();
    let f0 = f(x);
    let mut point = x.to_vec();
    let mut eval = |deltas: &[(usize, f64)]| {
        for &(i, d) in deltas {
            point[i] = x[i] + d;
        }
        let value = f(&point);
        for &(i, _) in deltas {
            point[i] = x[i];
        }
        value
    };

    let mut h = DMatrix::zeros(n, n);
    for i in 0..n {
        let hi = steps[i];
        let fp = eval(&[(i, hi)]);
        let fm = eval(&[(i, -hi)]);
        h[(i, i)] = (fp - 2.0 * f0 + fm) / (hi * hi);
        for j in (i + 1)..n {
            let hj = steps[j];
            let fpp = eval(&[(i, hi), (j, hj)]);
            let fpm = eval(&[(i, hi), (j, -hj)]);
            let fmp = eval(&[(i, -hi), (j, hj)]);
            let fmm = eval(&[(i, -hi), (j, -hj)]);
            let value = (fpp - fpm - fmp + fmm) / (4.0 * hi * hj);
            h[(i, j)] = value;
            h[(j, i)] = value;
        }
    }
    h
}

/// Central-difference Hessian with one Richardson extrapolation step
///
/// Steps are `10⁻⁴·max(|xᵢ|, 0.1)`; the stencil is evaluated at `h` and
/// `h/2` and combined as `(4·H(h/2) − H(h)) / 3`.
pub fn hessian<F>(f: &F, x: &[f64]) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let steps: Vec<f64> = x.iter().map(|v| HESSIAN_STEP * v.abs().max(0.1)).collect();
    let half: Vec<f64> = steps.iter().map(|h| h / 2.0).collect();
    let coarse = hessian_with_steps(f, x, &steps);
    let fine = hessian_with_steps(f, x, &half);
    (fine * 4.0 - coarse) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quadratic(x: &[f64]) -> f64 {
        3.0 * x[0] * x[0] + 2.0 * x[0] * x[1] + 0.5 * x[1] * x[1] - x[1]
    }

    #[test]
    fn test_gradient_quadratic() {
        let g = gradient(&quadratic, &[1.0, 2.0]);
        assert_relative_eq!(g[0], 10.0, epsilon = 1e-6);
        assert_relative_eq!(g[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hessian_quadratic() {
        let h = hessian(&quadratic, &[0.3, -1.2]);
        assert_relative_eq!(h[(0, 0)], 6.0, epsilon = 1e-5);
        assert_relative_eq!(h[(0, 1)], 2.0, epsilon = 1e-5);
        assert_relative_eq!(h[(1, 0)], 2.0, epsilon = 1e-5);
        assert_relative_eq!(h[(1, 1)], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_hessian_non_polynomial() {
        // f = exp(x) * sin(y), d2f/dxdy = exp(x) cos(y)
        let f = |x: &[f64]| x[0].exp() * x[1].sin();
        let h = hessian(&f, &[0.5, 1.0]);
        assert_relative_eq!(h[(0, 1)], 0.5_f64.exp() * 1.0_f64.cos(), epsilon = 1e-5);
        assert_relative_eq!(h[(1, 1)], -(0.5_f64.exp()) * 1.0_f64.sin(), epsilon = 1e-5);
    }
}
