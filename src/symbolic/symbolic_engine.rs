// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! # Symbolic Engine Module
//!
//! Small symbolic expression tree used to declare the moment polynomials of a
//! lattice scheme. A moment is written in terms of the velocity components
//! `X`, `Y`, `Z` and of the scheme velocity `LA`, e.g. `LA^2*X^2/2`.
//!
//! ## Main Structures and Methods
//! - `Expr` enum: variables, constants and the arithmetic operations
//! - `Symbols(symbols: &str)` - create several variables at once
//! - `set_variable()` / `set_variable_from_map()` - substitute values
//! - `eval_const()` - fold a variable-free expression into a number
//! - `extract_variables()` - free variables of an expression
//!
//! Operators `+ - * /` and unary `-` are overloaded so moments read like the
//! formulas they stand for: `la.clone() * x.clone()`.

#![allow(non_camel_case_types)]

use std::collections::HashMap;
use std::fmt;

/// Core symbolic expression enum: an abstract syntax tree with boxed children.
///
/// # Examples
/// ```
/// use RustedStability::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("X".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.set_variable("X", 1.0).eval_const(), Some(3.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "X", "LA")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "{}*{}", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "{}/{}", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "{}^{}", base, exp),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// ```
    /// use RustedStability::symbolic::symbolic_engine::Expr;
    /// let vars = Expr::Symbols("X, LA");
    /// assert_eq!(vars, vec![Expr::Var("X".to_string()), Expr::Var("LA".to_string())]);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// power expression self^rhs
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Substitutes one variable with a constant value.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.set_variable(var, value)),
                Box::new(exp.set_variable(var, value)),
            ),
            _ => self.clone(),
        }
    }

    /// Substitutes every variable present in the map; others are left untouched.
    pub fn set_variable_from_map(&self, var_map: &HashMap<String, f64>) -> Expr {
        match self {
            Expr::Var(name) => match var_map.get(name) {
                Some(value) => Expr::Const(*value),
                None => self.clone(),
            },
            Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                lhs.set_variable_from_map(var_map).boxed(),
                rhs.set_variable_from_map(var_map).boxed(),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                lhs.set_variable_from_map(var_map).boxed(),
                rhs.set_variable_from_map(var_map).boxed(),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                lhs.set_variable_from_map(var_map).boxed(),
                rhs.set_variable_from_map(var_map).boxed(),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                lhs.set_variable_from_map(var_map).boxed(),
                rhs.set_variable_from_map(var_map).boxed(),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                base.set_variable_from_map(var_map).boxed(),
                exp.set_variable_from_map(var_map).boxed(),
            ),
        }
    }

    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
        }
    }

    /// free variables of the expression, sorted and without duplicates
    pub fn extract_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
        }
    }

    /// Folds an expression without free variables into a number.
    ///
    /// Returns `None` as soon as a variable is met. Integer exponents go through
    /// `powi` so that `(-1)^2` stays exact.
    pub fn eval_const(&self) -> Option<f64> {
        match self {
            Expr::Var(_) => None,
            Expr::Const(val) => Some(*val),
            Expr::Add(lhs, rhs) => Some(lhs.eval_const()? + rhs.eval_const()?),
            Expr::Sub(lhs, rhs) => Some(lhs.eval_const()? - rhs.eval_const()?),
            Expr::Mul(lhs, rhs) => Some(lhs.eval_const()? * rhs.eval_const()?),
            Expr::Div(lhs, rhs) => Some(lhs.eval_const()? / rhs.eval_const()?),
            Expr::Pow(base, exp) => {
                let base = base.eval_const()?;
                let exp = exp.eval_const()?;
                if exp.fract() == 0.0 && exp.abs() < i32::MAX as f64 {
                    Some(base.powi(exp as i32))
                } else {
                    Some(base.powf(exp))
                }
            }
        }
    }

    /// substitute and fold in one go
    pub fn eval_with_map(&self, var_map: &HashMap<String, f64>) -> Option<f64> {
        self.set_variable_from_map(var_map).eval_const()
    }
}
