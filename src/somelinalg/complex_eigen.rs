// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! Eigenvalues of small dense complex matrices.
//!
//! The amplification operator of a lattice scheme is a complex `nv × nv` matrix,
//! so the real-only helpers of nalgebra (`complex_eigenvalues` works on real input)
//! are not enough. Here the complex Schur form is computed and the eigenvalues are
//! read off its diagonal.
use log::debug;
use nalgebra::{DMatrix, Schur};
use num_complex::Complex;

/// Maximal number of QR sweeps before the Schur decomposition is declared failed.
pub const MAX_SCHUR_ITERATIONS: usize = 10_000;

/// Computes all eigenvalues of a complex square matrix.
///
/// The order is the one produced by the Schur decomposition, i.e. no ordering is
/// guaranteed. Returns `None` if the decomposition does not converge or if the
/// matrix is not square.
pub fn complex_eigenvalues(G: &DMatrix<Complex<f64>>) -> Option<Vec<Complex<f64>>> {
    let n = G.nrows();
    if n != G.ncols() {
        debug!("eigenvalues requested for a {}x{} matrix", n, G.ncols());
        return None;
    }
    match n {
        0 => Some(Vec::new()),
        1 => Some(vec![G[(0, 0)]]),
        _ => {
            let schur = Schur::try_new(G.clone(), f64::EPSILON, MAX_SCHUR_ITERATIONS)?;
            let eigenvalues = schur.eigenvalues()?;
            Some(eigenvalues.iter().copied().collect())
        }
    }
}

/// Sorts eigenvalues by argument in (-π, π], then by modulus.
pub fn sort_by_angle(values: &mut [Complex<f64>]) {
    values.sort_by(|a, b| {
        a.arg()
            .total_cmp(&b.arg())
            .then_with(|| a.norm().total_cmp(&b.norm()))
    });
}

/// largest modulus of a set of eigenvalues (0 for an empty set)
pub fn spectral_radius(values: &[Complex<f64>]) -> f64 {
    values.iter().map(|z| z.norm()).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn test_triangular_matrix() {
        let G = DMatrix::from_row_slice(
            3,
            3,
            &[c(1.0, 0.0), c(2.0, 1.0), c(0.5, 0.0),
              c(0.0, 0.0), c(0.0, 1.0), c(3.0, 0.0),
              c(0.0, 0.0), c(0.0, 0.0), c(-0.5, 0.0)],
        );
        let mut values = complex_eigenvalues(&G).unwrap();
        assert_eq!(values.len(), 3);
        sort_by_angle(&mut values);
        assert_relative_eq!(values[0].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(values[1].im, 1.0, epsilon = 1e-10);
        assert_relative_eq!(values[2].re, -0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_rotation_matrix() {
        // real rotation by 90 degrees: eigenvalues are +i and -i
        let G = DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(-1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)]);
        let mut values = complex_eigenvalues(&G).unwrap();
        sort_by_angle(&mut values);
        assert_relative_eq!(values[0].im, -1.0, epsilon = 1e-10);
        assert_relative_eq!(values[1].im, 1.0, epsilon = 1e-10);
        assert_relative_eq!(spectral_radius(&values), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_trace_and_determinant_are_preserved() {
        let G = DMatrix::from_row_slice(
            3,
            3,
            &[c(0.2, 0.1), c(0.3, 0.0), c(0.0, -0.4),
              c(0.1, 0.0), c(-0.6, 0.2), c(0.5, 0.0),
              c(0.0, 0.3), c(0.2, 0.0), c(0.9, 0.0)],
        );
        let values = complex_eigenvalues(&G).unwrap();
        let sum: Complex<f64> = values.iter().sum();
        let product: Complex<f64> = values.iter().product();
        let trace = G.trace();
        let det = G.determinant();
        assert_relative_eq!(sum.re, trace.re, epsilon = 1e-9);
        assert_relative_eq!(sum.im, trace.im, epsilon = 1e-9);
        assert_relative_eq!(product.re, det.re, epsilon = 1e-9);
        assert_relative_eq!(product.im, det.im, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_sizes() {
        let empty: DMatrix<Complex<f64>> = DMatrix::zeros(0, 0);
        assert_eq!(complex_eigenvalues(&empty), Some(Vec::new()));
        let single = DMatrix::from_element(1, 1, c(0.3, -0.7));
        assert_eq!(complex_eigenvalues(&single), Some(vec![c(0.3, -0.7)]));
        let rectangular: DMatrix<Complex<f64>> = DMatrix::zeros(2, 3);
        assert_eq!(complex_eigenvalues(&rectangular), None);
    }
}
