// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! # Stability graph
//!
//! Ties a [`StabilityEngine`] to a figure: the spectrum is drawn as a point cloud over
//! the unit circle and redrawn after every parameter change.
//!
//! ```no_run
//! use RustedStability::stability::graph::{GraphSettings, StabilityGraph};
//! use RustedStability::stability::schemes::{SchemeDefinition, SchemeKind};
//! let scheme = SchemeKind::from_name("D1Q2").unwrap();
//! let mut graph = StabilityGraph::new(scheme, &GraphSettings::default()).unwrap();
//! let mut params = graph.engine().scheme().parameters();
//! params.insert("s".to_string(), 1.8);
//! graph.update(&params).unwrap();
//! ```
use crate::Utils::logger::save_spectrum_to_csv;
use crate::Utils::plots::{
    Fig, FigOptions, LineStyle, Marker, ScatterStyle, SeriesHandle, TitleStyle, Viewer,
};
use crate::stability::controls::{InteractiveControls, run_console};
use crate::stability::engine::{DEFAULT_SAMPLES, EigenOrdering, SpectrumSummary, StabilityEngine};
use crate::stability::errors::StabilityError;
use crate::stability::parameters::ParameterSet;
use crate::stability::schemes::{SchemeDefinition, SchemeKind};
use log::info;
use std::f64::consts::PI;
use std::io::BufRead;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

pub const AXIS_RANGE: (f64, f64) = (-1.1, 1.1);
pub const FIGURE_SIZE: (u32, u32) = (400, 400);
pub const UNIT_CIRCLE_POINTS: usize = 1000;
/// slack on |λ| ≤ 1 for the stability verdict
pub const STABILITY_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphSettings {
    /// backend name; unknown names fall back to the default backend
    pub viewer: String,
    pub output: PathBuf,
    pub samples: usize,
    pub ordering: EigenOrdering,
    /// spectrum dump rewritten after each redraw
    pub spectrum_csv: Option<PathBuf>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        GraphSettings {
            viewer: "plotters".to_string(),
            output: PathBuf::from("stability.png"),
            samples: DEFAULT_SAMPLES,
            ordering: EigenOrdering::default(),
            spectrum_csv: None,
        }
    }
}

/// points of the unit circle, first and last point equal
pub fn unit_circle(points: usize) -> (Vec<f64>, Vec<f64>) {
    let last = points.max(2) - 1;
    (0..=last)
        .map(|k| {
            let theta = 2.0 * PI * k as f64 / last as f64;
            (theta.cos(), theta.sin())
        })
        .unzip()
}

pub struct StabilityGraph {
    engine: StabilityEngine,
    fig: Fig,
    points: SeriesHandle,
    spectrum_csv: Option<PathBuf>,
}

impl StabilityGraph {
    /// Computes the spectrum of the scheme's current parameters and draws the first figure.
    pub fn new(scheme: SchemeKind, settings: &GraphSettings) -> Result<StabilityGraph, StabilityError> {
        let viewer = Viewer::from_name(&settings.viewer, settings.output.clone());
        let mut engine =
            StabilityEngine::new(scheme, settings.samples)?.with_ordering(settings.ordering);
        engine.eigenvalues()?;

        let options = FigOptions {
            x_range: AXIS_RANGE,
            y_range: AXIS_RANGE,
            x_label: Some("real part".to_string()),
            y_label: Some("imaginary part".to_string()),
            width: FIGURE_SIZE.0,
            height: FIGURE_SIZE.1,
        };
        let mut fig = Fig::new(viewer, options);
        fig.title(
            engine.scheme().name(),
            TitleStyle {
                color: "black".to_string(),
                size: 20,
            },
        );
        let (re, im) = engine.spectrum_coordinates();
        let points = fig.scatter(
            &re,
            &im,
            ScatterStyle {
                color: "orange".to_string(),
                marker: Marker::Circle,
                size: 5,
                alpha: 0.5,
            },
        )?;
        let (cx, cy) = unit_circle(UNIT_CIRCLE_POINTS);
        fig.line(
            &cx,
            &cy,
            LineStyle {
                color: "navy".to_string(),
                width: 2,
                alpha: 1.0,
            },
        )?;

        let graph = StabilityGraph {
            engine,
            fig,
            points,
            spectrum_csv: settings.spectrum_csv.clone(),
        };
        graph.redraw()?;
        Ok(graph)
    }

    /// One full recomputation for a new parameter set. Any failure leaves the previous
    /// figure on screen.
    pub fn update(&mut self, params: &ParameterSet) -> Result<(), StabilityError> {
        self.engine.fix_parameters(params)?;
        let equation = self.engine.scheme().compute_equivalent_equation();
        println!("{}", equation);
        info!("{}: {:?}\n{}", self.engine.scheme().name(), params, equation);
        self.engine.eigenvalues()?;
        let (re, im) = self.engine.spectrum_coordinates();
        self.fig.update(self.points, &re, &im)?;
        self.redraw()
    }

    fn redraw(&self) -> Result<(), StabilityError> {
        self.fig.plot()?;
        if let Some(path) = &self.spectrum_csv {
            save_spectrum_to_csv(&self.engine, path)?;
        }
        info!("\n{}", summary_table(&self.summary()));
        Ok(())
    }

    pub fn summary(&self) -> SpectrumSummary {
        self.engine.summary(STABILITY_TOLERANCE)
    }
    pub fn engine(&self) -> &StabilityEngine {
        &self.engine
    }
    pub fn fig(&self) -> &Fig {
        &self.fig
    }
    pub fn points(&self) -> SeriesHandle {
        self.points
    }
}

pub fn summary_table(summary: &SpectrumSummary) -> String {
    let mut builder = Builder::default();
    let rows = [
        ("wavenumbers", summary.samples.to_string()),
        ("eigenvalues per wavenumber", summary.nv.to_string()),
        ("max |eigenvalue|", format!("{:.6}", summary.max_modulus)),
        ("reached at xi", format!("{:.4}", summary.critical_wavenumber)),
        ("stable", summary.stable.to_string()),
    ];
    for (name, value) in rows {
        builder.push_record([name.to_string(), value]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// Builds the graph, registers one widget per schema record with its current value and
/// lets the console move them until the input ends.
pub fn interactive_plot<R: BufRead>(
    scheme: SchemeKind,
    settings: &GraphSettings,
    input: R,
) -> Result<StabilityGraph, StabilityError> {
    let current = scheme.parameters();
    let model = scheme.parameter_model();
    let mut graph = StabilityGraph::new(scheme, settings)?;
    {
        let mut controls = InteractiveControls::new();
        for mut spec in model {
            match current.get(&spec.variable) {
                Some(value) => {
                    spec.value = *value;
                    controls.add_parameter_at(spec, *value);
                }
                None => controls.add_parameter(spec),
            }
        }
        controls.build(|params: &ParameterSet| graph.update(params));
        let updates = run_console(&mut controls, input)?;
        info!("{} updates done", updates);
    }
    Ok(graph)
}
