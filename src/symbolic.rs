// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// symbolic expressions for moment polynomials of lattice schemes
///# Example#
/// ```
/// use RustedStability::symbolic::symbolic_engine::Expr;
/// use std::collections::HashMap;
/// let vars = Expr::Symbols("LA, X");
/// let (la, x) = (vars[0].clone(), vars[1].clone());
/// // second order moment LA^2*X^2/2
/// let moment = la.pow(Expr::Const(2.0)) * x.pow(Expr::Const(2.0)) / Expr::Const(2.0);
/// let mut values = HashMap::new();
/// values.insert("LA".to_string(), 1.0);
/// values.insert("X".to_string(), -1.0);
/// assert_eq!(moment.eval_with_map(&values), Some(0.5));
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
