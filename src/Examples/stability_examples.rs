// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::logger::save_spectrum_to_csv;
use crate::stability::engine::{EigenOrdering, StabilityEngine};
use crate::stability::errors::StabilityError;
use crate::stability::graph::{GraphSettings, StabilityGraph, interactive_plot, summary_table};
use crate::stability::schemes::{SchemeDefinition, SchemeKind};
use std::path::PathBuf;

/// number of examples known to [`stability_examples`]
pub const EXAMPLES_COUNT: usize = 6;

pub fn stability_examples(example: usize) -> Result<(), StabilityError> {
    match example {
        0 => {
            // D1Q2 with its default parameters, drawn with plotters
            let scheme = SchemeKind::from_name("D1Q2")?;
            let settings = GraphSettings {
                output: PathBuf::from("D1Q2.png"),
                ..GraphSettings::default()
            };
            let graph = StabilityGraph::new(scheme, &settings)?;
            println!("{}", graph.engine().scheme().compute_equivalent_equation());
            println!("{}", summary_table(&graph.summary()));
        }
        1 => {
            // relaxation sweep: the cloud shrinks towards the origin for s -> 1 and
            // reaches the unit circle for s -> 2
            let scheme = SchemeKind::from_name("D1Q2")?;
            let settings = GraphSettings {
                viewer: "csv".to_string(),
                output: PathBuf::from("D1Q2_sweep.csv"),
                samples: 100,
                ..GraphSettings::default()
            };
            let mut graph = StabilityGraph::new(scheme, &settings)?;
            let mut params = graph.engine().scheme().parameters();
            params.insert("c".to_string(), 0.5);
            for s in [0.5, 1.0, 1.5, 1.9, 2.0] {
                params.insert("s".to_string(), s);
                graph.update(&params)?;
                let summary = graph.summary();
                println!(
                    "s = {:4.2}: max |eigenvalue| = {:.6}, stable = {}",
                    s, summary.max_modulus, summary.stable
                );
            }
        }
        2 => {
            // D1Q3 with two relaxation rates through gnuplot
            let scheme = SchemeKind::from_name("D1Q3 (1)")?;
            let settings = GraphSettings {
                viewer: "gnuplot".to_string(),
                output: PathBuf::from("D1Q3_1.png"),
                ordering: EigenOrdering::ByAngle,
                ..GraphSettings::default()
            };
            let mut graph = StabilityGraph::new(scheme, &settings)?;
            let mut params = graph.engine().scheme().parameters();
            params.insert("sa".to_string(), 1.7);
            params.insert("sb".to_string(), 1.2);
            params.insert("ca".to_string(), 0.5);
            params.insert("cb".to_string(), 0.3);
            graph.update(&params)?;
        }
        3 => {
            // engine alone: D1Q3 system, spectrum written to csv
            let scheme = SchemeKind::from_name("D1Q3 (2)")?;
            let mut engine = StabilityEngine::new(scheme, 64)?;
            let mut params = engine.scheme().parameters();
            params.insert("s".to_string(), 1.8);
            params.insert("c".to_string(), 0.4);
            engine.fix_parameters(&params)?;
            engine.eigenvalues()?;
            save_spectrum_to_csv(&engine, "D1Q3_2_spectrum.csv")?;
            println!("dG = {}", engine.dG());
            println!("{}", summary_table(&engine.summary(1e-10)));
        }
        4 => {
            // |c| > la: part of the spectrum leaves the unit disk
            let scheme = SchemeKind::from_name("D1Q2")?;
            let mut engine = StabilityEngine::new(scheme, 200)?;
            let mut params = engine.scheme().parameters();
            params.insert("c".to_string(), 1.2);
            params.insert("s".to_string(), 1.5);
            engine.fix_parameters(&params)?;
            engine.eigenvalues()?;
            let summary = engine.summary(1e-10);
            println!(
                "max |eigenvalue| = {:.4} at xi = {:.4}",
                summary.max_modulus, summary.critical_wavenumber
            );
        }
        5 => {
            // sliders moved from the console
            let scheme = SchemeKind::from_name("D1Q2")?;
            let stdin = std::io::stdin();
            interactive_plot(scheme, &GraphSettings::default(), stdin.lock())?;
        }
        _ => {
            println!("example {} does not exist, choose 0..{}", example, EXAMPLES_COUNT - 1);
        }
    }
    Ok(())
}
