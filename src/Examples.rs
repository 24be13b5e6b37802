// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! examples of usage of RustedStability
/// stability diagrams of the lattice schemes
pub mod stability_examples;
