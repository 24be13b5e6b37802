// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! Parameter schema of a scheme and the typed parameter structs of every variant.
//!
//! The control panel talks in terms of a string-keyed [`ParameterSet`]; every scheme
//! variant converts it at the boundary into its own struct with named fields, so the
//! only place a key can be missing is [`required`].
use crate::stability::errors::StabilityError;
use std::collections::HashMap;
use strum_macros::{Display, EnumString};

/// mapping from parameter name to its current value
pub type ParameterSet = HashMap<String, f64>;

/// kind of control the UI adapter renders for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum WidgetKind {
    #[strum(serialize = "slider")]
    Slider,
    #[strum(serialize = "intslider")]
    IntSlider,
}

/// One record of the parameter schema: everything needed to draw a slider.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub kind: WidgetKind,
    pub variable: String,
    pub description: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
    pub readout_format: String,
}

impl ParamSpec {
    /// float slider with the step and readout used by every scheme of the crate
    pub fn slider(variable: &str, description: &str, value: f64, min: f64, max: f64) -> ParamSpec {
        ParamSpec {
            kind: WidgetKind::Slider,
            variable: variable.to_string(),
            description: description.to_string(),
            value,
            min,
            max,
            step: Some(0.01),
            readout_format: "4.2f".to_string(),
        }
    }

    pub fn int_slider(variable: &str, description: &str, value: i64, min: i64, max: i64) -> ParamSpec {
        ParamSpec {
            kind: WidgetKind::IntSlider,
            variable: variable.to_string(),
            description: description.to_string(),
            value: value as f64,
            min: min as f64,
            max: max as f64,
            step: Some(1.0),
            readout_format: "d".to_string(),
        }
    }

    /// the step actually used: 1/100 of the range for sliders, 1 for integer sliders
    pub fn effective_step(&self) -> f64 {
        match (self.step, self.kind) {
            (Some(step), _) if step > 0.0 => step,
            (_, WidgetKind::IntSlider) => 1.0,
            (_, WidgetKind::Slider) => (self.max - self.min) / 100.0,
        }
    }

    /// Clamps a requested value into [min, max] and snaps it onto the step grid.
    pub fn constrain(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let step = self.effective_step();
        let snapped = if step > 0.0 {
            self.min + ((clamped - self.min) / step).round() * step
        } else {
            clamped
        };
        let snapped = snapped.clamp(self.min, self.max);
        match self.kind {
            WidgetKind::IntSlider => snapped.round(),
            WidgetKind::Slider => snapped,
        }
    }

    /// value rendered with the readout format (`4.2f`, `d`, ...)
    pub fn readout(&self, value: f64) -> String {
        match self.kind {
            WidgetKind::IntSlider => format!("{}", value.round() as i64),
            WidgetKind::Slider => {
                let digits = self
                    .readout_format
                    .split('.')
                    .nth(1)
                    .and_then(|s| s.trim_end_matches('f').parse::<usize>().ok())
                    .unwrap_or(2);
                format!("{:.*}", digits, value)
            }
        }
    }
}

/// Looks a key up in the mapping, naming the scheme in the error.
pub fn required(params: &ParameterSet, scheme: &str, key: &str) -> Result<f64, StabilityError> {
    params
        .get(key)
        .copied()
        .ok_or_else(|| StabilityError::MissingParameter {
            scheme: scheme.to_string(),
            key: key.to_string(),
        })
}

/// Conversion between a typed parameter struct and the string-keyed mapping.
pub trait SchemeParameters: Sized {
    fn from_map(params: &ParameterSet, scheme: &str) -> Result<Self, StabilityError>;
    fn to_map(&self) -> ParameterSet;
    /// scheme velocity lambda, substituted for `LA` in the moments
    fn la(&self) -> f64;
}

fn map_from(pairs: &[(&str, f64)]) -> ParameterSet {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// D1Q2: one relaxation rate `s`, equilibrium velocity `c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct D1Q2Params {
    pub la: f64,
    pub c: f64,
    pub s: f64,
}

impl Default for D1Q2Params {
    fn default() -> Self {
        D1Q2Params { la: 1.0, c: 1.0, s: 1.0 }
    }
}

impl SchemeParameters for D1Q2Params {
    fn from_map(params: &ParameterSet, scheme: &str) -> Result<Self, StabilityError> {
        Ok(D1Q2Params {
            la: required(params, scheme, "la")?,
            c: required(params, scheme, "c")?,
            s: required(params, scheme, "s")?,
        })
    }
    fn to_map(&self) -> ParameterSet {
        map_from(&[("la", self.la), ("c", self.c), ("s", self.s)])
    }
    fn la(&self) -> f64 {
        self.la
    }
}

/// D1Q3 with two relaxation rates `sa`, `sb` and two equilibrium coefficients `ca`, `cb`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct D1Q3TwoRatesParams {
    pub la: f64,
    pub ca: f64,
    pub sa: f64,
    pub cb: f64,
    pub sb: f64,
}

impl Default for D1Q3TwoRatesParams {
    fn default() -> Self {
        D1Q3TwoRatesParams { la: 1.0, ca: 1.0, sa: 1.0, cb: 1.0, sb: 1.0 }
    }
}

impl SchemeParameters for D1Q3TwoRatesParams {
    fn from_map(params: &ParameterSet, scheme: &str) -> Result<Self, StabilityError> {
        Ok(D1Q3TwoRatesParams {
            la: required(params, scheme, "la")?,
            ca: required(params, scheme, "ca")?,
            sa: required(params, scheme, "sa")?,
            cb: required(params, scheme, "cb")?,
            sb: required(params, scheme, "sb")?,
        })
    }
    fn to_map(&self) -> ParameterSet {
        map_from(&[
            ("la", self.la),
            ("ca", self.ca),
            ("sa", self.sa),
            ("cb", self.cb),
            ("sb", self.sb),
        ])
    }
    fn la(&self) -> f64 {
        self.la
    }
}

/// D1Q3 with two conserved moments: one relaxation rate `s`, coefficient `c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct D1Q3SystemParams {
    pub la: f64,
    pub c: f64,
    pub s: f64,
}

impl Default for D1Q3SystemParams {
    fn default() -> Self {
        D1Q3SystemParams { la: 1.0, c: 1.0, s: 1.0 }
    }
}

impl SchemeParameters for D1Q3SystemParams {
    fn from_map(params: &ParameterSet, scheme: &str) -> Result<Self, StabilityError> {
        Ok(D1Q3SystemParams {
            la: required(params, scheme, "la")?,
            c: required(params, scheme, "c")?,
            s: required(params, scheme, "s")?,
        })
    }
    fn to_map(&self) -> ParameterSet {
        map_from(&[("la", self.la), ("c", self.c), ("s", self.s)])
    }
    fn la(&self) -> f64 {
        self.la
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    #[test]
    fn test_widget_kind_names() {
        assert_eq!(WidgetKind::from_str("slider").unwrap(), WidgetKind::Slider);
        assert_eq!(WidgetKind::from_str("IntSlider").unwrap(), WidgetKind::IntSlider);
        assert_eq!(WidgetKind::IntSlider.to_string(), "intslider");
        assert!(WidgetKind::from_str("checkbox").is_err());
    }

    #[test]
    fn test_constrain_slider() {
        let spec = ParamSpec::slider("s", "relaxation parameter s", 1.0, 0.0, 2.0);
        assert_relative_eq!(spec.constrain(1.234), 1.23, epsilon = 1e-12);
        assert_relative_eq!(spec.constrain(5.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(spec.constrain(-1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constrain_int_slider_and_default_step() {
        let spec = ParamSpec::int_slider("n", "samples", 200, 10, 1000);
        assert_eq!(spec.constrain(123.6), 124.0);
        let mut spec = ParamSpec::slider("c", "equilibrium parameter c", 1.0, 0.0, 1.5);
        spec.step = None;
        assert_relative_eq!(spec.effective_step(), 0.015, epsilon = 1e-15);
    }

    #[test]
    fn test_readout() {
        let spec = ParamSpec::slider("la", "scheme velocity", 1.0, 0.0, 1.5);
        assert_eq!(spec.readout(1.0), "1.00");
        let spec = ParamSpec::int_slider("n", "samples", 200, 10, 1000);
        assert_eq!(spec.readout(42.0), "42");
    }

    #[test]
    fn test_missing_key() {
        let mut params = D1Q2Params::default().to_map();
        params.remove("c");
        match D1Q2Params::from_map(&params, "D1Q2") {
            Err(StabilityError::MissingParameter { scheme, key }) => {
                assert_eq!(scheme, "D1Q2");
                assert_eq!(key, "c");
            }
            other => panic!("expected a missing parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_map_round_trip() {
        let p = D1Q3TwoRatesParams { la: 1.2, ca: 0.3, sa: 1.7, cb: 0.4, sb: 1.1 };
        let back = D1Q3TwoRatesParams::from_map(&p.to_map(), "D1Q3 (1)").unwrap();
        assert_eq!(p, back);
        assert_eq!(back.la(), 1.2);
    }
}
