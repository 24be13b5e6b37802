// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]
use RustedStability::Examples::stability_examples::{EXAMPLES_COUNT, stability_examples};
use RustedStability::Utils::logger::init_logger;
use RustedStability::stability::controls::InteractiveControls;
use RustedStability::stability::errors::StabilityError;
use RustedStability::stability::schemes::{SchemeDefinition, SchemeKind};
use RustedStability::stability::task::StabilityTask;
use log::{LevelFilter, error};

fn usage() {
    println!("usage:");
    println!("  RustedStability                 D1Q2 with the console sliders");
    println!("  RustedStability <task file>     run a task (.toml or sectioned text)");
    println!("  RustedStability schemes         parameters of every scheme");
    println!("  RustedStability example <n>     run example n (0..{})", EXAMPLES_COUNT - 1);
}

fn print_schemes() {
    for scheme in SchemeKind::all() {
        let mut controls = InteractiveControls::new();
        for spec in scheme.parameter_model() {
            controls.add_parameter(spec);
        }
        println!("{} ({} velocities)", scheme.name(), scheme.nv());
        println!("{}", controls.describe());
    }
}

fn run(args: &[String]) -> Result<(), StabilityError> {
    match args.first().map(String::as_str) {
        Some("schemes") => {
            print_schemes();
            Ok(())
        }
        Some("example") => {
            let example = match args.get(1).map(|n| n.parse::<usize>()) {
                Some(Ok(n)) => n,
                Some(Err(_)) => {
                    return Err(StabilityError::Config(format!(
                        "example number expected, got {}",
                        args[1]
                    )));
                }
                None => 0,
            };
            init_logger(LevelFilter::Info, None);
            stability_examples(example)
        }
        Some("help") | Some("-h") | Some("--help") => {
            usage();
            Ok(())
        }
        Some(path) => {
            let task = StabilityTask::from_file(path)?;
            init_logger(task.loglevel, task.log_file.as_deref());
            task.run(std::io::stdin().lock()).map(|_| ())
        }
        None => {
            let task = StabilityTask::default();
            init_logger(task.loglevel, task.log_file.as_deref());
            task.run(std::io::stdin().lock()).map(|_| ())
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        error!("{}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
