// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
use crate::stability::engine::StabilityEngine;
use chrono::Local;
use csv::Writer;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::io;
use std::path::Path;

/// loglevel name from a task file: off, error, warn, info, debug (anything else -> info)
pub fn parse_loglevel(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// `log_file: auto` turns into a timestamped name
pub fn resolve_log_file(log_file: &str) -> String {
    if log_file.trim().eq_ignore_ascii_case("auto") {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        format!("stability_log_{}.txt", date_and_time)
    } else {
        log_file.trim().to_string()
    }
}

/// Terminal logger plus an optional file logger. Calling it a second time is harmless:
/// the global logger is set once and later calls are ignored.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) {
    if level == LevelFilter::Off {
        return;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(name) = log_file {
        let name = resolve_log_file(name);
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(err) => eprintln!("cannot create log file {}: {}", name, err),
        }
    }
    let _ = CombinedLogger::init(loggers);
}

/// Writes the last computed spectrum as `xi, index, re, im, modulus` rows,
/// one row per eigenvalue.
pub fn save_spectrum_to_csv<P: AsRef<Path>>(engine: &StabilityEngine, filename: P) -> io::Result<()> {
    let mut writer = Writer::from_path(filename)?;
    writer.write_record(["xi", "index", "re", "im", "modulus"])?;
    let nv = engine.nv();
    if nv > 0 {
        for (batch, xi) in engine.spectrum().chunks(nv).zip(engine.wavenumbers().iter()) {
            for (index, z) in batch.iter().enumerate() {
                writer.write_record(&[
                    xi.to_string(),
                    index.to_string(),
                    z.re.to_string(),
                    z.im.to_string(),
                    z.norm().to_string(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
