// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! different utility modules used throughout the project
/// logger initialisation and CSV export of spectra
pub mod logger;
/// figures with plotters, gnuplot and csv backends
pub mod plots;
/// parse document with structure like "title1 \n key1: value1, value2 \n title2 \n key3: value3" into HashMap
pub mod task_parser;
///
mod task_parser_tests;
