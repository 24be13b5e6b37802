// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! # Linear stability of lattice Boltzmann schemes
//!
//! Von Neumann analysis of one-dimensional lattice Boltzmann schemes in their moment
//! formulation. A scheme is given by its velocities, its moment polynomials and a
//! relaxation matrix R depending on a few parameters; for each wavenumber ξ the
//! amplification matrix
//!
//! G(ξ) = diag(exp(-i v_k ξ)) · M⁻¹ R M
//!
//! is formed and its eigenvalues are plotted against the unit circle. The scheme is
//! linearly stable when the whole cloud stays inside the circle.
//!
//! - [`schemes`]: D1Q2, D1Q3 (1), D1Q3 (2) with their parameter schemas
//! - [`engine`]: moment matrix, dG and the eigenvalue sweep
//! - [`graph`]: figure of the spectrum, redrawn on every parameter change
//! - [`controls`]: sliders and the console that moves them
//! - [`task`]: task files
//!
//! # Example
//! ```no_run
//! use RustedStability::stability::graph::{GraphSettings, interactive_plot};
//! use RustedStability::stability::schemes::SchemeKind;
//! let scheme = SchemeKind::from_name("D1Q3 (1)").unwrap();
//! let settings = GraphSettings { viewer: "gnuplot".to_string(), ..GraphSettings::default() };
//! interactive_plot(scheme, &settings, std::io::stdin().lock()).unwrap();
//! ```
pub mod controls;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod parameters;
pub mod schemes;
pub mod task;
