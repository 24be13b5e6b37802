// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! # Stability engine
//!
//! Von Neumann analysis of a lattice scheme. For a parameter set the engine
//! 1) evaluates the symbolic moments at every velocity to get the moment matrix M,
//! 2) inverts it and forms dG = M⁻¹ R M (independent of the wavenumber),
//! 3) for every wavenumber ξ of the grid scales row k of dG by exp(-i v_k ξ), which gives
//!    the amplification operator G(ξ), and collects its eigenvalues.
//!
//! The spectrum is stored flat: the `nv` eigenvalues of the i-th wavenumber occupy
//! `spectrum[nv*i..nv*(i+1)]`. Everything is recomputed from scratch on each call.
use crate::somelinalg::complex_eigen::{complex_eigenvalues, sort_by_angle, spectral_radius};
use crate::somelinalg::linear_sys_diagnostics::{is_singular, poorly_conditioned};
use crate::stability::errors::StabilityError;
use crate::stability::parameters::ParameterSet;
use crate::stability::schemes::{SCALE_SYMBOL, SchemeDefinition, SchemeKind, VELOCITY_SYMBOLS};
use crate::symbolic::symbolic_engine::Expr;
use itertools::iproduct;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use num_traits::Zero;
use std::collections::HashMap;
use std::f64::consts::PI;
use strum_macros::{Display, EnumString};

/// number of wavenumbers sampled in [0, 2π) unless told otherwise
pub const DEFAULT_SAMPLES: usize = 200;
/// relative tolerance: the moment matrix is singular when cond(M) > 1/SINGULARITY_TOLERANCE
pub const SINGULARITY_TOLERANCE: f64 = f64::EPSILON;
/// condition number above which a warning is logged
pub const CONDITION_WARNING: f64 = 1e10;

/// order of the eigenvalues inside one wavenumber batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EigenOrdering {
    /// whatever the eigen routine returns
    #[default]
    #[strum(serialize = "none")]
    Unsorted,
    /// by argument, then modulus
    #[strum(serialize = "angle")]
    ByAngle,
}

/// evenly spaced wavenumbers ξ_k = 2πk/samples, k = 0..samples
pub fn wavenumber_grid(samples: usize) -> DVector<f64> {
    DVector::from_fn(samples, |k, _| 2.0 * PI * k as f64 / samples as f64)
}

/// Evaluates moment i at the velocity of column j, for every (i, j).
///
/// `LA` is replaced by `la`, `X`, `Y`, `Z` by the components of velocity j; a scheme of
/// dimension d < 3 reuses its last component for the missing symbols.
pub fn build_moment_matrix(
    moments: &[Expr],
    velocities: &DMatrix<i32>,
    la: f64,
) -> Result<DMatrix<f64>, StabilityError> {
    let nv = velocities.nrows();
    let d = velocities.ncols();
    if moments.len() != nv {
        return Err(StabilityError::DimensionMismatch {
            moments: moments.len(),
            velocities: nv,
        });
    }
    let column_values: Vec<HashMap<String, f64>> = (0..nv)
        .map(|j| {
            let mut values = HashMap::new();
            values.insert(SCALE_SYMBOL.to_string(), la);
            if d > 0 {
                for (k, symbol) in VELOCITY_SYMBOLS.iter().enumerate() {
                    values.insert(symbol.to_string(), velocities[(j, k.min(d - 1))] as f64);
                }
            }
            values
        })
        .collect();

    let mut M = DMatrix::zeros(nv, nv);
    for (i, j) in iproduct!(0..nv, 0..nv) {
        let moment = &moments[i];
        M[(i, j)] = moment.eval_with_map(&column_values[j]).ok_or_else(|| {
            StabilityError::UnboundSymbol {
                moment: moment.to_string(),
                variables: moment.set_variable_from_map(&column_values[j]).extract_variables(),
            }
        })?;
    }
    Ok(M)
}

/// Matrices that depend on the parameters but not on the wavenumber.
#[derive(Debug, Clone, PartialEq)]
struct SchemeOperators {
    M: DMatrix<f64>,
    iM: DMatrix<f64>,
    R: DMatrix<f64>,
    dG: DMatrix<f64>,
}

impl SchemeOperators {
    fn assemble(scheme: &SchemeKind) -> Result<SchemeOperators, StabilityError> {
        let M = build_moment_matrix(&scheme.moments(), &scheme.velocities(), scheme.la())?;
        if is_singular(&M, SINGULARITY_TOLERANCE) {
            return Err(StabilityError::SingularMomentMatrix {
                scheme: scheme.name().to_string(),
                determinant: M.determinant(),
            });
        }
        poorly_conditioned(&M, CONDITION_WARNING);
        let iM = M
            .clone()
            .try_inverse()
            .ok_or_else(|| StabilityError::SingularMomentMatrix {
                scheme: scheme.name().to_string(),
                determinant: M.determinant(),
            })?;
        let R = scheme.relaxation_matrix();
        let dG = &iM * &R * &M;
        Ok(SchemeOperators { M, iM, R, dG })
    }
}

/// Summary of a spectrum: the largest modulus and where it is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumSummary {
    pub samples: usize,
    pub nv: usize,
    pub max_modulus: f64,
    /// wavenumber of the eigenvalue with the largest modulus
    pub critical_wavenumber: f64,
    /// all eigenvalues lie in the closed unit disk (up to the tolerance)
    pub stable: bool,
}

pub struct StabilityEngine {
    scheme: SchemeKind,
    samples: usize,
    ordering: EigenOrdering,
    wavenumbers: DVector<f64>,
    operators: SchemeOperators,
    spectrum: Vec<Complex<f64>>,
}

impl StabilityEngine {
    /// Builds the engine for the scheme's current parameters.
    pub fn new(scheme: SchemeKind, samples: usize) -> Result<StabilityEngine, StabilityError> {
        if samples == 0 {
            return Err(StabilityError::InvalidSampleCount(samples));
        }
        let operators = SchemeOperators::assemble(&scheme)?;
        info!(
            "stability engine for {} with {} velocities and {} wavenumbers",
            scheme.name(),
            scheme.nv(),
            samples
        );
        Ok(StabilityEngine {
            scheme,
            samples,
            ordering: EigenOrdering::default(),
            wavenumbers: wavenumber_grid(samples),
            operators,
            spectrum: Vec::new(),
        })
    }

    pub fn with_ordering(mut self, ordering: EigenOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    ////////////////////////////SETTERS///////////////////////////////////////////////////////////////////
    /// Stores new parameters in the scheme and recomputes M, M⁻¹, R and dG.
    ///
    /// Nothing is committed unless the whole chain succeeds: on a missing key or a
    /// singular moment matrix the engine keeps its previous state.
    pub fn fix_parameters(&mut self, params: &ParameterSet) -> Result<(), StabilityError> {
        let mut scheme = self.scheme.clone();
        scheme.fix_parameters(params)?;
        let previous = std::mem::replace(&mut self.scheme, scheme);
        if let Err(err) = self.fix_parameters_generic() {
            self.scheme = previous;
            return Err(err);
        }
        debug!("{}: parameters fixed to {:?}", self.scheme.name(), params);
        Ok(())
    }

    /// Recomputes M, M⁻¹ and dG = M⁻¹ R M from the parameters stored in the scheme.
    /// The operators are only replaced when the assembly succeeds.
    pub fn fix_parameters_generic(&mut self) -> Result<(), StabilityError> {
        self.operators = SchemeOperators::assemble(&self.scheme)?;
        Ok(())
    }

    pub fn set_samples(&mut self, samples: usize) -> Result<(), StabilityError> {
        if samples == 0 {
            return Err(StabilityError::InvalidSampleCount(samples));
        }
        self.samples = samples;
        self.wavenumbers = wavenumber_grid(samples);
        self.spectrum.clear();
        Ok(())
    }

    pub fn set_ordering(&mut self, ordering: EigenOrdering) {
        self.ordering = ordering;
    }

    ////////////////////////////COMPUTATION///////////////////////////////////////////////////////////////
    /// G(ξ) = diag(exp(-i v_k ξ)) · dG
    pub fn amplification_matrix(&self, xi: f64) -> DMatrix<Complex<f64>> {
        let v = self.scheme.velocities();
        let dG = &self.operators.dG;
        DMatrix::from_fn(dG.nrows(), dG.ncols(), |k, j| {
            let vk = if v.ncols() > 0 { v[(k, 0)] as f64 } else { 0.0 };
            Complex::from_polar(1.0, -vk * xi) * dG[(k, j)]
        })
    }

    /// Sweeps the wavenumber grid and stores the `nv × samples` eigenvalues.
    pub fn eigenvalues(&mut self) -> Result<&[Complex<f64>], StabilityError> {
        let nv = self.nv();
        let mut spectrum = vec![Complex::zero(); nv * self.samples];
        for (i, &xi) in self.wavenumbers.iter().enumerate() {
            let G = self.amplification_matrix(xi);
            let mut values = complex_eigenvalues(&G)
                .ok_or(StabilityError::EigenDecomposition { wavenumber: xi })?;
            if values.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
                return Err(StabilityError::NonFiniteEigenvalue { wavenumber: xi });
            }
            if self.ordering == EigenOrdering::ByAngle {
                sort_by_angle(&mut values);
            }
            spectrum[nv * i..nv * (i + 1)].copy_from_slice(&values);
        }
        self.spectrum = spectrum;
        Ok(&self.spectrum)
    }

    /// Largest modulus of the last computed spectrum.
    pub fn summary(&self, tolerance: f64) -> SpectrumSummary {
        let nv = self.nv();
        let mut max_modulus = 0.0;
        let mut critical_wavenumber = 0.0;
        if nv > 0 {
            for (i, batch) in self.spectrum.chunks(nv).enumerate() {
                let radius = spectral_radius(batch);
                if radius > max_modulus {
                    max_modulus = radius;
                    critical_wavenumber = self.wavenumbers[i];
                }
            }
        }
        SpectrumSummary {
            samples: self.samples,
            nv,
            max_modulus,
            critical_wavenumber,
            stable: max_modulus <= 1.0 + tolerance,
        }
    }

    ////////////////////////////GETTERS///////////////////////////////////////////////////////////////////
    pub fn scheme(&self) -> &SchemeKind {
        &self.scheme
    }
    pub fn nv(&self) -> usize {
        self.operators.M.nrows()
    }
    pub fn samples(&self) -> usize {
        self.samples
    }
    pub fn ordering(&self) -> EigenOrdering {
        self.ordering
    }
    pub fn wavenumbers(&self) -> &DVector<f64> {
        &self.wavenumbers
    }
    pub fn moment_matrix(&self) -> &DMatrix<f64> {
        &self.operators.M
    }
    pub fn inverse_moment_matrix(&self) -> &DMatrix<f64> {
        &self.operators.iM
    }
    pub fn relaxation_matrix(&self) -> &DMatrix<f64> {
        &self.operators.R
    }
    pub fn dG(&self) -> &DMatrix<f64> {
        &self.operators.dG
    }
    /// last computed spectrum, empty before the first call to `eigenvalues`
    pub fn spectrum(&self) -> &[Complex<f64>] {
        &self.spectrum
    }
    /// real and imaginary parts of the spectrum, as the plot wants them
    pub fn spectrum_coordinates(&self) -> (Vec<f64>, Vec<f64>) {
        self.spectrum.iter().map(|z| (z.re, z.im)).unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wavenumber_grid() {
        let grid = wavenumber_grid(4);
        assert_eq!(grid.len(), 4);
        assert_relative_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[1], PI / 2.0, epsilon = 1e-15);
        assert_relative_eq!(grid[3], 1.5 * PI, epsilon = 1e-15);
    }

    #[test]
    fn test_build_moment_matrix_d1q3() {
        let scheme = SchemeKind::from_name("D1Q3 (1)").unwrap();
        let M = build_moment_matrix(&scheme.moments(), &scheme.velocities(), 2.0).unwrap();
        let expected = DMatrix::from_row_slice(
            3,
            3,
            &[1.0, 1.0, 1.0,
              -2.0, 0.0, 2.0,
              2.0, 0.0, 2.0],
        );
        assert_relative_eq!(M, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_build_moment_matrix_errors() {
        let velocities = DMatrix::from_column_slice(2, 1, &[-1, 1]);
        let moments = vec![Expr::Const(1.0)];
        assert!(matches!(
            build_moment_matrix(&moments, &velocities, 1.0),
            Err(StabilityError::DimensionMismatch { moments: 1, velocities: 2 })
        ));
        let moments = vec![Expr::Const(1.0), Expr::Var("T".to_string())];
        match build_moment_matrix(&moments, &velocities, 1.0) {
            Err(StabilityError::UnboundSymbol { variables, .. }) => {
                assert_eq!(variables, vec!["T".to_string()])
            }
            other => panic!("expected an unbound symbol, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zero_samples_rejected() {
        let scheme = SchemeKind::from_name("D1Q2").unwrap();
        assert!(matches!(
            StabilityEngine::new(scheme, 0),
            Err(StabilityError::InvalidSampleCount(0))
        ));
    }

    #[test]
    fn test_set_samples() {
        let scheme = SchemeKind::from_name("D1Q3 (2)").unwrap();
        let mut engine = StabilityEngine::new(scheme, 8).unwrap();
        engine.eigenvalues().unwrap();
        assert!(matches!(
            engine.set_samples(0),
            Err(StabilityError::InvalidSampleCount(0))
        ));
        assert_eq!(engine.samples(), 8);
        engine.set_samples(5).unwrap();
        assert!(engine.spectrum().is_empty());
        assert_eq!(engine.wavenumbers().len(), 5);
        let nv = engine.nv();
        assert_eq!(engine.eigenvalues().unwrap().len(), nv * 5);
    }

    #[test]
    fn test_set_ordering() {
        let scheme = SchemeKind::from_name("D1Q3 (1)").unwrap();
        let mut engine = StabilityEngine::new(scheme, 6).unwrap();
        engine.set_ordering(EigenOrdering::ByAngle);
        assert_eq!(engine.ordering(), EigenOrdering::ByAngle);
        let nv = engine.nv();
        for batch in engine.eigenvalues().unwrap().chunks(nv) {
            for pair in batch.windows(2) {
                assert!(pair[0].arg() <= pair[1].arg() + 1e-12);
            }
        }
    }

    #[test]
    fn test_fix_parameters_generic_rebuilds_from_scheme() {
        let scheme = SchemeKind::from_name("D1Q2").unwrap();
        let mut engine = StabilityEngine::new(scheme, 4).unwrap();
        let dG = engine.dG().clone();
        engine.fix_parameters_generic().unwrap();
        assert_eq!(engine.dG(), &dG);
    }

    #[test]
    fn test_small_velocity_scale_is_accepted() {
        // det(M) = la³ is tiny, cond(M) only grows like 1/la²
        let scheme = SchemeKind::from_name("D1Q3 (2)").unwrap();
        let mut engine = StabilityEngine::new(scheme, 8).unwrap();
        let mut params = engine.scheme().parameters();
        params.insert("la".to_string(), 1e-5);
        engine.fix_parameters(&params).unwrap();
        assert!(engine.moment_matrix().determinant().abs() < 1e-12);
        assert_eq!(engine.scheme().la(), 1e-5);
        let nv = engine.nv();
        assert_eq!(engine.eigenvalues().unwrap().len(), nv * 8);
    }

    #[test]
    fn test_dg_is_similar_to_r() {
        // dG = M⁻¹ R M has the spectrum of R: for D1Q2 {1, 1 - s}
        let scheme = SchemeKind::from_name("D1Q2").unwrap();
        let mut engine = StabilityEngine::new(scheme, 8).unwrap();
        let mut params = engine.scheme().default_parameters();
        params.insert("s".to_string(), 1.5);
        params.insert("c".to_string(), 0.3);
        engine.fix_parameters(&params).unwrap();
        let dG = engine.dG();
        assert_relative_eq!(dG.trace(), 1.0 + (1.0 - 1.5), epsilon = 1e-12);
        assert_relative_eq!(dG.determinant(), 1.0 * (1.0 - 1.5), epsilon = 1e-12);
        let G0 = engine.amplification_matrix(0.0);
        assert_relative_eq!(G0[(1, 0)].re, dG[(1, 0)], epsilon = 1e-15);
        assert_relative_eq!(G0[(1, 0)].im, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_amplification_phase() {
        let scheme = SchemeKind::from_name("D1Q2").unwrap();
        let engine = StabilityEngine::new(scheme, 8).unwrap();
        let G = engine.amplification_matrix(PI / 2.0);
        let dG = engine.dG();
        // velocity -1 on row 0: exp(i π/2) = i
        assert_relative_eq!(G[(0, 0)].re, 0.0, epsilon = 1e-15);
        assert_relative_eq!(G[(0, 0)].im, dG[(0, 0)], epsilon = 1e-15);
        // velocity +1 on row 1: exp(-i π/2) = -i
        assert_relative_eq!(G[(1, 1)].im, -dG[(1, 1)], epsilon = 1e-15);
    }

    #[test]
    fn test_ordering_names() {
        use std::str::FromStr;
        assert_eq!(EigenOrdering::from_str("angle").unwrap(), EigenOrdering::ByAngle);
        assert_eq!(EigenOrdering::from_str("None").unwrap(), EigenOrdering::Unsorted);
        assert_eq!(EigenOrdering::default(), EigenOrdering::Unsorted);
    }
}
