// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! Task description of a stability session, read from a sectioned document
//! (see [`crate::Utils::task_parser`]) or from the same sections written in TOML.
//!
//! ```text
//! scheme
//!   name: D1Q2
//!   samples: 200
//!   ordering: none
//! parameters
//!   s: 1.5
//! viewer
//!   backend: plotters
//!   output: stability.png
//!   spectrum_csv: spectrum.csv
//! logging
//!   loglevel: info
//!   log_file: auto
//! interactive
//!   console: true
//! ```
//! Every key is optional.
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document, parse_toml_document};
use crate::Utils::logger::parse_loglevel;
use crate::stability::engine::{DEFAULT_SAMPLES, EigenOrdering};
use crate::stability::errors::StabilityError;
use crate::stability::graph::{GraphSettings, StabilityGraph, interactive_plot, summary_table};
use crate::stability::parameters::ParameterSet;
use crate::stability::schemes::{SchemeDefinition, SchemeKind};
use log::{LevelFilter, info, warn};
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const KNOWN_SECTIONS: [(&str, &[&str]); 5] = [
    ("scheme", &["name", "samples", "ordering"]),
    ("parameters", &[]),
    ("viewer", &["backend", "output", "spectrum_csv"]),
    ("logging", &["loglevel", "log_file"]),
    ("interactive", &["console"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityTask {
    pub scheme: String,
    pub samples: usize,
    pub ordering: EigenOrdering,
    /// overrides of the scheme's default parameters
    pub parameters: ParameterSet,
    pub backend: String,
    pub output: PathBuf,
    pub spectrum_csv: Option<PathBuf>,
    pub loglevel: LevelFilter,
    pub log_file: Option<String>,
    pub console: bool,
}

impl Default for StabilityTask {
    fn default() -> Self {
        StabilityTask {
            scheme: "D1Q2".to_string(),
            samples: DEFAULT_SAMPLES,
            ordering: EigenOrdering::default(),
            parameters: ParameterSet::new(),
            backend: "plotters".to_string(),
            output: PathBuf::from("stability.png"),
            spectrum_csv: None,
            loglevel: LevelFilter::Info,
            log_file: None,
            console: true,
        }
    }
}

impl StabilityTask {
    /// Reads a task file; `.toml` files go through the TOML reader.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<StabilityTask, StabilityError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            StabilityTask::from_toml_str(&content)
        } else {
            StabilityTask::from_task_str(&content)
        }
    }

    pub fn from_task_str(input: &str) -> Result<StabilityTask, StabilityError> {
        let doc = parse_document(input).map_err(StabilityError::Config)?;
        StabilityTask::from_document(&doc)
    }

    pub fn from_toml_str(input: &str) -> Result<StabilityTask, StabilityError> {
        let doc = parse_toml_document(input).map_err(StabilityError::Config)?;
        StabilityTask::from_document(&doc)
    }

    pub fn from_document(doc: &DocumentMap) -> Result<StabilityTask, StabilityError> {
        warn_unknown_keys(doc);
        let mut task = StabilityTask::default();

        if let Some(section) = doc.get("scheme") {
            if let Some(name) = first(section, "name") {
                task.scheme = name.to_string();
            }
            if let Some(samples) = first(section, "samples") {
                task.samples = match samples.as_integer() {
                    Some(n) if n > 0 => n as usize,
                    _ => {
                        return Err(StabilityError::Config(format!(
                            "samples must be a positive integer, got {}",
                            samples
                        )));
                    }
                };
            }
            if let Some(ordering) = first(section, "ordering") {
                task.ordering = EigenOrdering::from_str(&ordering.to_string()).map_err(|_| {
                    StabilityError::Config(format!(
                        "ordering must be 'none' or 'angle', got {}",
                        ordering
                    ))
                })?;
            }
        }

        if let Some(section) = doc.get("parameters") {
            for (name, values) in section {
                let value = values.first().and_then(Value::as_float).ok_or_else(|| {
                    StabilityError::Config(format!("parameter '{}' must be a number", name))
                })?;
                task.parameters.insert(name.clone(), value);
            }
        }

        if let Some(section) = doc.get("viewer") {
            if let Some(backend) = first(section, "backend") {
                task.backend = backend.to_string();
            }
            if let Some(output) = first(section, "output") {
                task.output = PathBuf::from(output.to_string());
            }
            if let Some(path) = first(section, "spectrum_csv") {
                task.spectrum_csv = Some(PathBuf::from(path.to_string()));
            }
        }

        if let Some(section) = doc.get("logging") {
            if let Some(level) = first(section, "loglevel") {
                task.loglevel = parse_loglevel(&level.to_string());
            }
            if let Some(file) = first(section, "log_file") {
                task.log_file = Some(file.to_string());
            }
        }

        if let Some(section) = doc.get("interactive") {
            if let Some(console) = first(section, "console") {
                task.console = console.as_boolean().ok_or_else(|| {
                    StabilityError::Config(format!("console must be true or false, got {}", console))
                })?;
            }
        }
        Ok(task)
    }

    pub fn graph_settings(&self) -> GraphSettings {
        GraphSettings {
            viewer: self.backend.clone(),
            output: self.output.clone(),
            samples: self.samples,
            ordering: self.ordering,
            spectrum_csv: self.spectrum_csv.clone(),
        }
    }

    /// The named scheme with the task's parameter overrides on top of its defaults.
    pub fn build_scheme(&self) -> Result<SchemeKind, StabilityError> {
        let mut scheme = SchemeKind::from_name(&self.scheme)?;
        if self.parameters.is_empty() {
            return Ok(scheme);
        }
        let mut params = scheme.parameters();
        for (name, value) in &self.parameters {
            if !params.contains_key(name) {
                warn!("{} has no parameter '{}', it is ignored", scheme.name(), name);
                continue;
            }
            params.insert(name.clone(), *value);
        }
        scheme.fix_parameters(&params)?;
        Ok(scheme)
    }

    /// Draws the diagram once, then hands the sliders to the console if asked to.
    pub fn run<R: BufRead>(&self, input: R) -> Result<StabilityGraph, StabilityError> {
        let scheme = self.build_scheme()?;
        info!("running {} with {} wavenumbers", scheme.name(), self.samples);
        let settings = self.graph_settings();
        if self.console {
            return interactive_plot(scheme, &settings, input);
        }
        let graph = StabilityGraph::new(scheme, &settings)?;
        println!("{}", graph.engine().scheme().compute_equivalent_equation());
        println!("{}", summary_table(&graph.summary()));
        Ok(graph)
    }
}

fn first<'a>(section: &'a SectionMap, key: &str) -> Option<&'a Value> {
    section.get(key).and_then(|values| values.first())
}

fn warn_unknown_keys(doc: &DocumentMap) {
    for (title, section) in doc {
        match KNOWN_SECTIONS.iter().find(|(name, _)| *name == title.as_str()) {
            None => warn!("unknown section '{}' is ignored", title),
            Some((name, keys)) => {
                if *name == "parameters" {
                    continue;
                }
                for key in section.keys() {
                    if !keys.contains(&key.as_str()) {
                        warn!("unknown key '{}' in section '{}' is ignored", key, title);
                    }
                }
            }
        }
    }
}
