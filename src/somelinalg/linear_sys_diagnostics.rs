// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
use log::warn;
use nalgebra::DMatrix;

/// The condition number of a matrix is the ratio of its largest singular value to the
/// smallest one. It measures how much the inverse amplifies perturbations of the entries.
/// For a singular matrix the smallest singular value is zero and the result is infinite.
pub fn condition_number(A: &DMatrix<f64>) -> f64 {
    if A.is_empty() {
        return 1.0;
    }
    let singular_values = A.clone().singular_values();
    let max_sigma = singular_values.max();
    let min_sigma = singular_values.min();
    if min_sigma == 0.0 {
        f64::INFINITY
    } else {
        max_sigma / min_sigma
    }
}

/// Relative singularity test: the matrix is singular when its determinant vanishes or
/// its condition number exceeds 1/epsilon. Uniformly scaling the matrix changes neither.
pub fn is_singular(A: &DMatrix<f64>, epsilon: f64) -> bool {
    let det = A.determinant();
    let is_singular = det == 0.0 || condition_number(A) > 1.0 / epsilon;
    if is_singular {
        warn!("Matrix is singular. Determinant = {:.8}", det);
    }
    is_singular
}

pub fn poorly_conditioned(A: &DMatrix<f64>, threshold: f64) -> bool {
    let condition_number = condition_number(A);
    let poorly_conditioned = condition_number > threshold;
    if poorly_conditioned {
        warn!(
            "The matrix is poorly conditioned. Condition number = {:.2e}",
            condition_number
        );
    }
    poorly_conditioned
}

/// famous example of ill-conditioned matrix
#[cfg(test)]
fn hilbert_matrix(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |i, j| 1.0 / (i as f64 + j as f64 + 1.0))
}
