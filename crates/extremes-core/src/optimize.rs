//! Unconstrained minimizers used by the distribution fitters
//!
//! - [`bfgs`]: quasi-Newton with a numerical gradient and backtracking
//!   Armijo line search, for smooth objectives such as the GEV
//!   negative log-likelihood.
//! - [`nelder_mead`]: derivative-free simplex search, for objectives with a
//!   kink such as an absolute moment mismatch.
//!
//! Both return an [`OptimisationResult`] on success and
//! [`Error::NonConvergence`] when they run out of iterations.

use crate::numdiff::gradient;
use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};
use std::cell::Cell;
use tracing::debug;

/// Why a minimizer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Gradient infinity norm fell below `gtol`
    GradientTolerance,
    /// Line search could not decrease the objective at a point whose
    /// gradient is already below `stall_gtol`
    LineSearchStall,
    /// Simplex and function spreads both fell below tolerance
    SimplexTolerance,
}

/// Outcome of a successful minimization
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisationResult {
    /// Minimizer
    pub x: Vec<f64>,
    /// Objective at `x`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Objective evaluations performed
    pub evaluations: usize,
    pub termination: TerminationReason,
}

/// BFGS settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BfgsOptions {
    pub max_iterations: usize,
    pub gtol: f64,
    pub stall_gtol: f64,
    /// Armijo sufficient-decrease constant
    pub c1: f64,
    pub max_backtracks: usize,
}

impl Default for BfgsOptions {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            gtol: 1e-5,
            stall_gtol: 1e-3,
            c1: 1e-4,
            max_backtracks: 60,
        }
    }
}

/// Nelder–Mead settings
///
/// `max_iterations` defaults to `200 × dimension` when `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadOptions {
    pub max_iterations: Option<usize>,
    pub xatol: f64,
    pub fatol: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: None,
            xatol: 1e-4,
            fatol: 1e-4,
        }
    }
}

/// Minimize a smooth function with BFGS
pub fn bfgs<F>(f: F, x0: &[f64], options: &BfgsOptions) -> Result<OptimisationResult>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x0.len();
    let evaluations = Cell::new(0usize);
    let eval = |x: &DVector<f64>| {
        evaluations.set(evaluations.get() + 1);
        f(x.as_slice())
    };
    let eval_gradient = |x: &DVector<f64>| {
        evaluations.set(evaluations.get() + 2 * n);
        gradient(&f, x.as_slice())
    };

    let mut x = DVector::from_column_slice(x0);
    let mut fx = eval(&x);
    if !fx.is_finite() {
        return Err(Error::Computation(format!(
            "Objective is not finite at the starting point {:?}",
            x0
        )));
    }
    let mut g = eval_gradient(&x);
    let mut h_inv = DMatrix::<f64>::identity(n, n);
    let mut first_step = true;

    for iteration in 0..options.max_iterations {
        let g_norm = g.amax();
        if g_norm <= options.gtol {
            debug!(iteration, value = fx, "bfgs converged");
            return Ok(OptimisationResult {
                x: x.as_slice().to_vec(),
                value: fx,
                iterations: iteration,
                evaluations: evaluations.get(),
                termination: TerminationReason::GradientTolerance,
            });
        }

        let mut direction = -(&h_inv * &g);
        let mut slope = g.dot(&direction);
        if slope >= 0.0 {
            h_inv = DMatrix::identity(n, n);
            direction = -g.clone();
            slope = g.dot(&direction);
        }

        let mut step = 1.0;
        let mut accepted = None;
        for _ in 0..options.max_backtracks {
            let candidate = &x + &direction * step;
            let value = eval(&candidate);
            if value.is_finite() && value <= fx + options.c1 * step * slope {
                accepted = Some((candidate, value));
                break;
            }
            step *= 0.5;
        }

        let Some((x_new, f_new)) = accepted else {
            if g_norm <= options.stall_gtol {
                debug!(iteration, gradient = g_norm, "bfgs line search stalled near optimum");
                return Ok(OptimisationResult {
                    x: x.as_slice().to_vec(),
                    value: fx,
                    iterations: iteration,
                    evaluations: evaluations.get(),
                    termination: TerminationReason::LineSearchStall,
                });
            }
            return Err(Error::non_convergence(
                iteration,
                format!("line search failed with gradient norm {g_norm:.3e}"),
            ));
        };

        let g_new = eval_gradient(&x_new);
        let s = &x_new - &x;
        let y = &g_new - &g;
        let sy = s.dot(&y);
        if sy > f64::EPSILON * s.norm() * y.norm() {
            if first_step {
                h_inv *= sy / y.dot(&y);
                first_step = false;
            }
            let rho = 1.0 / sy;
            let identity = DMatrix::<f64>::identity(n, n);
            let left = &identity - (&s * y.transpose()) * rho;
            let right = &identity - (&y * s.transpose()) * rho;
            h_inv = left * h_inv * right + (&s * s.transpose()) * rho;
        }

        x = x_new;
        fx = f_new;
        g = g_new;
    }

    Err(Error::non_convergence(
        options.max_iterations,
        format!("gradient norm {:.3e} above tolerance", g.amax()),
    ))
}

/// Minimize a function with the Nelder–Mead simplex method
///
/// NaN objective values are treated as `+∞`.
pub fn nelder_mead<F>(f: F, x0: &[f64], options: &NelderMeadOptions) -> Result<OptimisationResult>
where
    F: Fn(&[f64]) -> f64,
{
    const RHO: f64 = 1.0;
    const CHI: f64 = 2.0;
    const PSI: f64 = 0.5;
    const SIGMA: f64 = 0.5;

    let n = x0.len();
    let max_iterations = options.max_iterations.unwrap_or(200 * n.max(1));
    let evaluations = Cell::new(0usize);
    let eval = |x: &[f64]| {
        evaluations.set(evaluations.get() + 1);
        let value = f(x);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for k in 0..n {
        let mut vertex = x0.to_vec();
        vertex[k] = if vertex[k] != 0.0 {
            1.05 * vertex[k]
        } else {
            0.00025
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let combine = |a: &[f64], wa: f64, b: &[f64], wb: f64| -> Vec<f64> {
        a.iter().zip(b).map(|(x, y)| wa * x + wb * y).collect()
    };

    let mut iterations = 0;
    loop {
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let x_spread = simplex[1..]
            .iter()
            .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        let f_spread = values[1..]
            .iter()
            .map(|v| (v - values[0]).abs())
            .fold(0.0, f64::max);
        if x_spread <= options.xatol && f_spread <= options.fatol {
            return Ok(OptimisationResult {
                x: simplex[0].clone(),
                value: values[0],
                iterations,
                evaluations: evaluations.get(),
                termination: TerminationReason::SimplexTolerance,
            });
        }
        if iterations >= max_iterations {
            return Err(Error::non_convergence(
                iterations,
                format!("simplex spread {x_spread:.3e}, value spread {f_spread:.3e}"),
            ));
        }
        iterations += 1;

        let mut centroid = vec![0.0; n];
        for vertex in &simplex[..n] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / n as f64;
            }
        }
        let worst = simplex[n].clone();

        let reflected = combine(&centroid, 1.0 + RHO, &worst, -RHO);
        let f_reflected = eval(&reflected);
        let mut shrink = false;

        if f_reflected < values[0] {
            let expanded = combine(&centroid, 1.0 + RHO * CHI, &worst, -RHO * CHI);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
        } else if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
        } else if f_reflected < values[n] {
            let contracted = combine(&centroid, 1.0 + PSI * RHO, &worst, -PSI * RHO);
            let f_contracted = eval(&contracted);
            if f_contracted <= f_reflected {
                simplex[n] = contracted;
                values[n] = f_contracted;
            } else {
                shrink = true;
            }
        } else {
            let contracted = combine(&centroid, 1.0 - PSI, &worst, PSI);
            let f_contracted = eval(&contracted);
            if f_contracted < values[n] {
                simplex[n] = contracted;
                values[n] = f_contracted;
            } else {
                shrink = true;
            }
        }

        if shrink {
            let best = simplex[0].clone();
            for j in 1..=n {
                simplex[j] = combine(&best, 1.0 - SIGMA, &simplex[j], SIGMA);
                values[j] = eval(&simplex[j]);
            }
        }
    }
}
