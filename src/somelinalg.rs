// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! some linear algebra functions used throughout the code
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// eigenvalues of complex matrices (amplification operators) and helpers to order them
pub mod complex_eigen;
/// diagnostics for matrices: if it is singular
/// or poorly conditioned
pub mod linear_sys_diagnostics;
