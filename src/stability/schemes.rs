// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! # Lattice schemes
//!
//! Every scheme variant declares its discrete velocities, its symbolic moments, the
//! parameter schema shown by the control panel, and the structure of its relaxation
//! matrix R. The variants form a closed set, [`SchemeKind`], dispatched statically
//! through the [`SchemeDefinition`] trait.
//!
//! | variant      | velocities | moments               | R                                         |
//! |--------------|------------|-----------------------|-------------------------------------------|
//! | `D1Q2`       | -1, 1      | 1, LA X               | [[1,0],[s c,1-s]]                         |
//! | `D1Q3 (1)`   | -1, 0, 1   | 1, LA X, LA^2 X^2 / 2 | [[1,0,0],[sa ca,1-sa,0],[sb cb,0,1-sb]]   |
//! | `D1Q3 (2)`   | -1, 0, 1   | 1, LA X, LA^2 X^2 / 2 | [[1,0,0],[0,1,0],[s c,0,1-s]]             |
use crate::stability::errors::StabilityError;
use crate::stability::parameters::{
    D1Q2Params, D1Q3SystemParams, D1Q3TwoRatesParams, ParamSpec, ParameterSet, SchemeParameters,
};
use crate::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use nalgebra::DMatrix;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// names of the symbols the moment polynomials are written in
pub const VELOCITY_SYMBOLS: [&str; 3] = ["X", "Y", "Z"];
pub const SCALE_SYMBOL: &str = "LA";

#[enum_dispatch]
pub trait SchemeDefinition {
    /// display name, also used as the figure title
    fn name(&self) -> &'static str;
    /// `nv × d` matrix of integer lattice velocities
    fn velocities(&self) -> DMatrix<i32>;
    /// one polynomial per moment in `X`, `Y`, `Z` and `LA`
    fn moments(&self) -> Vec<Expr>;
    fn default_parameters(&self) -> ParameterSet;
    /// currently stored parameters
    fn parameters(&self) -> ParameterSet;
    /// schema used by the control panel to draw one slider per parameter
    fn parameter_model(&self) -> Vec<ParamSpec>;
    /// scheme velocity lambda
    fn la(&self) -> f64;
    /// Validates and stores the parameters, then rebuilds R.
    fn fix_parameters(&mut self, params: &ParameterSet) -> Result<(), StabilityError>;
    fn relaxation_matrix(&self) -> DMatrix<f64>;
    /// truncated Taylor expansion of the scheme for the current parameters
    fn compute_equivalent_equation(&self) -> EquivalentEquation;
}

/// The closed set of schemes known to the explorer.
#[enum_dispatch(SchemeDefinition)]
#[derive(Debug, Clone, PartialEq, EnumIter)]
pub enum SchemeKind {
    D1Q2(D1Q2),
    D1Q3TwoRates(D1Q3TwoRates),
    D1Q3System(D1Q3System),
}

impl SchemeKind {
    /// Resolves a scheme from its name. Case, spaces, underscores and brackets are
    /// ignored, so `D1Q3 (1)`, `d1q3_1` and `D1Q3o` all name the same scheme.
    pub fn from_name(name: &str) -> Result<SchemeKind, StabilityError> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "d1q2" => Ok(SchemeKind::D1Q2(D1Q2::default())),
            "d1q31" | "d1q3o" | "d1q3tworates" => Ok(SchemeKind::D1Q3TwoRates(D1Q3TwoRates::default())),
            "d1q32" | "d1q3d" | "d1q3system" => Ok(SchemeKind::D1Q3System(D1Q3System::default())),
            _ => Err(StabilityError::UnknownScheme(name.to_string())),
        }
    }

    /// every scheme with its default parameters
    pub fn all() -> Vec<SchemeKind> {
        SchemeKind::iter().collect()
    }

    pub fn nv(&self) -> usize {
        self.velocities().nrows()
    }
}

/// Equivalent equation recovered from the scheme by Taylor expansion in dt.
#[derive(Debug, Clone, PartialEq)]
pub enum EquivalentEquation {
    /// `du/dt + velocity du/dx = diffusion dt d2u/dx2 + dispersion dt^2 d3u/dx3`
    Scalar {
        velocity: f64,
        diffusion: f64,
        dispersion: Option<f64>,
    },
    /// `du/dt + dv/dx = O(dt^2)`, `dv/dt + velocity du/dx = diffusion dt d2u/dx2`
    System { velocity: f64, diffusion: f64 },
}

impl EquivalentEquation {
    pub fn diffusion(&self) -> f64 {
        match self {
            EquivalentEquation::Scalar { diffusion, .. } => *diffusion,
            EquivalentEquation::System { diffusion, .. } => *diffusion,
        }
    }
}

impl fmt::Display for EquivalentEquation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EquivalentEquation::Scalar {
                velocity,
                diffusion,
                dispersion: None,
            } => {
                writeln!(f, "Equivalent equation        du       du              d^2u")?;
                writeln!(
                    f,
                    "                           -- + {:3.1} -- ={:8.1e} dt ---- + O(dt^2).",
                    velocity, diffusion
                )?;
                write!(f, "                           dt       dx              dx^2")
            }
            EquivalentEquation::Scalar {
                velocity,
                diffusion,
                dispersion: Some(dispersion),
            } => {
                writeln!(
                    f,
                    "Equivalent equation        du       du              d^2u                d^3u"
                )?;
                writeln!(
                    f,
                    "                           -- + {:3.1} -- ={:8.1e} dt ---- +{:8.1e} dt^2 ---- + O(dt^3).",
                    velocity, diffusion, dispersion
                )?;
                write!(
                    f,
                    "                           dt       dx              dx^2                dx^3"
                )
            }
            EquivalentEquation::System { velocity, diffusion } => {
                writeln!(
                    f,
                    "Equivalent equations       du   dv            dv       du                d^2u"
                )?;
                writeln!(
                    f,
                    "                           -- + -- = O(dt^2), -- + {:3.1} --  = {:8.1e} dt ---- + O(dt^2).",
                    velocity, diffusion
                )?;
                write!(
                    f,
                    "                           dt   dx            dt       dx                dx^2"
                )
            }
        }
    }
}

/// column of one-dimensional velocities
fn velocities_1d(v: &[i32]) -> DMatrix<i32> {
    DMatrix::from_column_slice(v.len(), 1, v)
}

/// moments 1, LA X, LA^2 X^2 / 2, ... truncated to `count` entries
fn moments_1d(count: usize) -> Vec<Expr> {
    let la = Expr::Var(SCALE_SYMBOL.to_string());
    let x = Expr::Var(VELOCITY_SYMBOLS[0].to_string());
    let all = vec![
        Expr::Const(1.0),
        la.clone() * x.clone(),
        la.pow(Expr::Const(2.0)) * x.pow(Expr::Const(2.0)) / Expr::Const(2.0),
    ];
    all.into_iter().take(count).collect()
}

/// 1/s - 1/2
fn sigma(s: f64) -> f64 {
    1.0 / s - 0.5
}

fn relaxation_spec(variable: &str, label: &str, value: f64) -> ParamSpec {
    ParamSpec::slider(variable, &format!("relaxation parameter {}", label), value, 0.0, 2.0)
}

fn equilibrium_spec(variable: &str, label: &str, value: f64) -> ParamSpec {
    ParamSpec::slider(variable, &format!("equilibrium parameter {}", label), value, 0.0, 1.5)
}

fn velocity_spec(value: f64) -> ParamSpec {
    ParamSpec::slider("la", "scheme velocity lambda", value, 0.0, 1.5)
}

////////////////////////////////////////////////////////////////////////////////
//                              D1Q2
////////////////////////////////////////////////////////////////////////////////
/// Two velocities, one conserved moment: advection with velocity `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct D1Q2 {
    params: D1Q2Params,
    R: DMatrix<f64>,
}

impl D1Q2 {
    pub fn new(params: D1Q2Params) -> D1Q2 {
        let R = Self::build_relaxation(&params);
        D1Q2 { params, R }
    }
    pub fn params(&self) -> &D1Q2Params {
        &self.params
    }
    fn build_relaxation(p: &D1Q2Params) -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &[1.0, 0.0, p.s * p.c, 1.0 - p.s])
    }
}

impl Default for D1Q2 {
    fn default() -> Self {
        D1Q2::new(D1Q2Params::default())
    }
}

impl SchemeDefinition for D1Q2 {
    fn name(&self) -> &'static str {
        "D1Q2"
    }
    fn velocities(&self) -> DMatrix<i32> {
        velocities_1d(&[-1, 1])
    }
    fn moments(&self) -> Vec<Expr> {
        moments_1d(2)
    }
    fn default_parameters(&self) -> ParameterSet {
        D1Q2Params::default().to_map()
    }
    fn parameters(&self) -> ParameterSet {
        self.params.to_map()
    }
    fn parameter_model(&self) -> Vec<ParamSpec> {
        let p = D1Q2Params::default();
        vec![
            relaxation_spec("s", "s", p.s),
            equilibrium_spec("c", "c", p.c),
            velocity_spec(p.la),
        ]
    }
    fn la(&self) -> f64 {
        self.params.la
    }
    fn fix_parameters(&mut self, params: &ParameterSet) -> Result<(), StabilityError> {
        self.params = D1Q2Params::from_map(params, self.name())?;
        self.R = Self::build_relaxation(&self.params);
        Ok(())
    }
    fn relaxation_matrix(&self) -> DMatrix<f64> {
        self.R.clone()
    }
    fn compute_equivalent_equation(&self) -> EquivalentEquation {
        let D1Q2Params { la, c, s } = self.params;
        EquivalentEquation::Scalar {
            velocity: c,
            diffusion: sigma(s) * (la * la - c * c),
            dispersion: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//                        D1Q3 with two relaxation rates
////////////////////////////////////////////////////////////////////////////////
/// Three velocities, one conserved moment, two relaxed moments with their own rates.
#[derive(Debug, Clone, PartialEq)]
pub struct D1Q3TwoRates {
    params: D1Q3TwoRatesParams,
    R: DMatrix<f64>,
}

impl D1Q3TwoRates {
    pub fn new(params: D1Q3TwoRatesParams) -> D1Q3TwoRates {
        let R = Self::build_relaxation(&params);
        D1Q3TwoRates { params, R }
    }
    pub fn params(&self) -> &D1Q3TwoRatesParams {
        &self.params
    }
    fn build_relaxation(p: &D1Q3TwoRatesParams) -> DMatrix<f64> {
        DMatrix::from_row_slice(
            3,
            3,
            &[
                1.0, 0.0, 0.0,
                p.sa * p.ca, 1.0 - p.sa, 0.0,
                p.sb * p.cb, 0.0, 1.0 - p.sb,
            ],
        )
    }
}

impl Default for D1Q3TwoRates {
    fn default() -> Self {
        D1Q3TwoRates::new(D1Q3TwoRatesParams::default())
    }
}

impl SchemeDefinition for D1Q3TwoRates {
    fn name(&self) -> &'static str {
        "D1Q3 (1)"
    }
    fn velocities(&self) -> DMatrix<i32> {
        velocities_1d(&[-1, 0, 1])
    }
    fn moments(&self) -> Vec<Expr> {
        moments_1d(3)
    }
    fn default_parameters(&self) -> ParameterSet {
        D1Q3TwoRatesParams::default().to_map()
    }
    fn parameters(&self) -> ParameterSet {
        self.params.to_map()
    }
    fn parameter_model(&self) -> Vec<ParamSpec> {
        let p = D1Q3TwoRatesParams::default();
        vec![
            relaxation_spec("sa", "s1", p.sa),
            relaxation_spec("sb", "s2", p.sb),
            equilibrium_spec("ca", "c1", p.ca),
            equilibrium_spec("cb", "c2", p.cb),
            velocity_spec(p.la),
        ]
    }
    fn la(&self) -> f64 {
        self.params.la
    }
    fn fix_parameters(&mut self, params: &ParameterSet) -> Result<(), StabilityError> {
        self.params = D1Q3TwoRatesParams::from_map(params, self.name())?;
        self.R = Self::build_relaxation(&self.params);
        Ok(())
    }
    fn relaxation_matrix(&self) -> DMatrix<f64> {
        self.R.clone()
    }
    fn compute_equivalent_equation(&self) -> EquivalentEquation {
        let D1Q3TwoRatesParams { la, ca, sa, cb, sb } = self.params;
        let (sigma_a, sigma_b) = (sigma(sa), sigma(sb));
        let diffusion = sigma_a * (2.0 * cb * la * la - ca * ca);
        let dispersion = ca / 12.0
            * (la * la * (1.0 - 12.0 * sigma_b * sigma_a)
                + 2.0 * ca * ca * (1.0 - 12.0 * sigma_a * sigma_a)
                + 3.0 * cb * (4.0 * sigma_b * sigma_a + 8.0 * sigma_a * sigma_a - 1.0));
        EquivalentEquation::Scalar {
            velocity: ca,
            diffusion,
            dispersion: Some(dispersion),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//                   D1Q3 with two conserved moments
////////////////////////////////////////////////////////////////////////////////
/// Three velocities, two conserved moments (a hyperbolic system), one relaxation rate.
#[derive(Debug, Clone, PartialEq)]
pub struct D1Q3System {
    params: D1Q3SystemParams,
    R: DMatrix<f64>,
}

impl D1Q3System {
    pub fn new(params: D1Q3SystemParams) -> D1Q3System {
        let R = Self::build_relaxation(&params);
        D1Q3System { params, R }
    }
    pub fn params(&self) -> &D1Q3SystemParams {
        &self.params
    }
    fn build_relaxation(p: &D1Q3SystemParams) -> DMatrix<f64> {
        DMatrix::from_row_slice(
            3,
            3,
            &[
                1.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                p.s * p.c, 0.0, 1.0 - p.s,
            ],
        )
    }
}

impl Default for D1Q3System {
    fn default() -> Self {
        D1Q3System::new(D1Q3SystemParams::default())
    }
}

impl SchemeDefinition for D1Q3System {
    fn name(&self) -> &'static str {
        "D1Q3 (2)"
    }
    fn velocities(&self) -> DMatrix<i32> {
        velocities_1d(&[-1, 0, 1])
    }
    fn moments(&self) -> Vec<Expr> {
        moments_1d(3)
    }
    fn default_parameters(&self) -> ParameterSet {
        D1Q3SystemParams::default().to_map()
    }
    fn parameters(&self) -> ParameterSet {
        self.params.to_map()
    }
    fn parameter_model(&self) -> Vec<ParamSpec> {
        let p = D1Q3SystemParams::default();
        vec![
            relaxation_spec("s", "s", p.s),
            equilibrium_spec("c", "c", p.c),
            velocity_spec(p.la),
        ]
    }
    fn la(&self) -> f64 {
        self.params.la
    }
    fn fix_parameters(&mut self, params: &ParameterSet) -> Result<(), StabilityError> {
        self.params = D1Q3SystemParams::from_map(params, self.name())?;
        self.R = Self::build_relaxation(&self.params);
        Ok(())
    }
    fn relaxation_matrix(&self) -> DMatrix<f64> {
        self.R.clone()
    }
    fn compute_equivalent_equation(&self) -> EquivalentEquation {
        let D1Q3SystemParams { la, c, s } = self.params;
        EquivalentEquation::System {
            velocity: 2.0 * c,
            diffusion: sigma(s) * (la * la - 2.0 * c * c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(SchemeKind::from_name("D1Q2").unwrap().name(), "D1Q2");
        assert_eq!(SchemeKind::from_name("d1q3 (1)").unwrap().name(), "D1Q3 (1)");
        assert_eq!(SchemeKind::from_name("D1Q3o").unwrap().name(), "D1Q3 (1)");
        assert_eq!(SchemeKind::from_name("D1Q3_2").unwrap().name(), "D1Q3 (2)");
        assert_eq!(SchemeKind::from_name("d1q3d").unwrap().name(), "D1Q3 (2)");
        assert!(matches!(
            SchemeKind::from_name("D2Q9"),
            Err(StabilityError::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_all_schemes_are_consistent() {
        let schemes = SchemeKind::all();
        assert_eq!(schemes.len(), 3);
        for scheme in schemes {
            let nv = scheme.nv();
            assert_eq!(scheme.moments().len(), nv);
            let R = scheme.relaxation_matrix();
            assert_eq!(R.shape(), (nv, nv));
            // every schema entry is a key of the default mapping
            let defaults = scheme.default_parameters();
            let model = scheme.parameter_model();
            assert_eq!(model.len(), defaults.len());
            for spec in model {
                assert_eq!(defaults.get(&spec.variable), Some(&spec.value));
            }
            assert_eq!(scheme.parameters(), defaults);
        }
    }

    #[test]
    fn test_d1q2_relaxation_matrix() {
        let mut scheme = SchemeKind::from_name("D1Q2").unwrap();
        let mut params = ParameterSet::new();
        params.insert("la".to_string(), 1.0);
        params.insert("c".to_string(), 1.0);
        params.insert("s".to_string(), 1.0);
        scheme.fix_parameters(&params).unwrap();
        assert_eq!(
            scheme.relaxation_matrix(),
            DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 0.0])
        );
        params.insert("s".to_string(), 1.5);
        params.insert("c".to_string(), 0.5);
        scheme.fix_parameters(&params).unwrap();
        let R = scheme.relaxation_matrix();
        assert_relative_eq!(R[(1, 0)], 0.75, epsilon = 1e-15);
        assert_relative_eq!(R[(1, 1)], -0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_d1q3_sparsity() {
        let mut params = D1Q3TwoRatesParams::default();
        params.sa = 1.5;
        params.sb = 0.5;
        params.ca = 0.2;
        params.cb = 0.4;
        let R = D1Q3TwoRates::new(params).relaxation_matrix();
        // lower triangular coupling to the conserved moment only
        assert_eq!(R[(0, 1)], 0.0);
        assert_eq!(R[(0, 2)], 0.0);
        assert_eq!(R[(1, 2)], 0.0);
        assert_eq!(R[(2, 1)], 0.0);
        assert_relative_eq!(R[(1, 0)], 0.3, epsilon = 1e-15);
        assert_relative_eq!(R[(2, 0)], 0.2, epsilon = 1e-15);

        let R = D1Q3System::default().relaxation_matrix();
        assert_eq!(R[(1, 1)], 1.0);
        assert_eq!(R[(2, 2)], 0.0);
    }

    #[test]
    fn test_missing_parameter_keeps_previous_values() {
        let mut scheme = SchemeKind::from_name("D1Q3 (1)").unwrap();
        let mut params = scheme.default_parameters();
        params.remove("sb");
        let err = scheme.fix_parameters(&params).unwrap_err();
        assert!(matches!(err, StabilityError::MissingParameter { ref key, .. } if key == "sb"));
        assert_eq!(scheme.parameters(), scheme.default_parameters());
    }

    #[test]
    fn test_equivalent_equations() {
        // D1Q2 with s = 1, la = 1, c = 0.5: (1 - 0.5) * (1 - 0.25)
        let scheme = D1Q2::new(D1Q2Params { la: 1.0, c: 0.5, s: 1.0 });
        let eq = scheme.compute_equivalent_equation();
        assert_relative_eq!(eq.diffusion(), 0.375, epsilon = 1e-15);
        // s = 2 is the non-dissipative limit
        let scheme = D1Q2::new(D1Q2Params { la: 1.0, c: 0.5, s: 2.0 });
        assert_relative_eq!(scheme.compute_equivalent_equation().diffusion(), 0.0, epsilon = 1e-15);

        let scheme = D1Q3System::default();
        match scheme.compute_equivalent_equation() {
            EquivalentEquation::System { velocity, diffusion } => {
                assert_relative_eq!(velocity, 2.0, epsilon = 1e-15);
                assert_relative_eq!(diffusion, -0.5, epsilon = 1e-15);
            }
            other => panic!("expected a system, got {:?}", other),
        }

        let scheme = D1Q3TwoRates::default();
        match scheme.compute_equivalent_equation() {
            EquivalentEquation::Scalar { velocity, diffusion, dispersion } => {
                assert_relative_eq!(velocity, 1.0, epsilon = 1e-15);
                // sigma = 1/2: 0.5 * (2 - 1)
                assert_relative_eq!(diffusion, 0.5, epsilon = 1e-15);
                // 1/12 * (1 * (1 - 3) + 2 * (1 - 3) + 3 * (1 + 2 - 1))
                assert_relative_eq!(dispersion.unwrap(), 0.0, epsilon = 1e-15);
            }
            other => panic!("expected a scalar equation, got {:?}", other),
        }
    }

    #[test]
    fn test_equivalent_equation_display() {
        let text = D1Q2::default().compute_equivalent_equation().to_string();
        assert!(text.starts_with("Equivalent equation"));
        assert!(text.contains("O(dt^2)"));
        let text = D1Q3TwoRates::default().compute_equivalent_equation().to_string();
        assert!(text.contains("O(dt^3)"));
        let text = D1Q3System::default().compute_equivalent_equation().to_string();
        assert!(text.starts_with("Equivalent equations"));
        // Rust's exponent has no padding: 5.0e-1, not 5.0e-01
        let text = EquivalentEquation::Scalar {
            velocity: 1.0,
            diffusion: 0.5,
            dispersion: None,
        }
        .to_string();
        assert!(text.contains("=  5.0e-1 dt"));
    }
}
