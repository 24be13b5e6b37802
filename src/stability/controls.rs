// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! Control panel: one widget per parameter record and a single change callback.
//!
//! Every accepted change calls the callback with the values of all registered
//! parameters. [`run_console`] drives the panel from text lines
//! (`name = value`, `show`, `help`, `quit`).
use crate::stability::errors::StabilityError;
use crate::stability::parameters::{ParamSpec, ParameterSet};
use log::{error, info, warn};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{alpha1, alphanumeric1, space0, space1},
    combinator::{all_consuming, map, recognize, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair},
};
use std::io::{BufRead, Write};
use tabled::{builder::Builder, settings::Style};

pub type ChangeCallback<'a> = Box<dyn FnMut(&ParameterSet) -> Result<(), StabilityError> + 'a>;

pub struct InteractiveControls<'a> {
    specs: Vec<ParamSpec>,
    values: ParameterSet,
    callback: Option<ChangeCallback<'a>>,
}

impl<'a> Default for InteractiveControls<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> InteractiveControls<'a> {
    pub fn new() -> Self {
        InteractiveControls {
            specs: Vec::new(),
            values: ParameterSet::new(),
            callback: None,
        }
    }

    /// Registers a widget. A variable registered twice keeps the latest record.
    pub fn add_parameter(&mut self, spec: ParamSpec) {
        let value = spec.constrain(spec.value);
        self.add_parameter_at(spec, value);
    }

    /// Registers a widget holding `current` as is, without snapping it. Used when the
    /// value already lives in the model, so untouched widgets report it unchanged.
    pub fn add_parameter_at(&mut self, spec: ParamSpec, current: f64) {
        self.values.insert(spec.variable.clone(), current);
        self.specs.retain(|s| s.variable != spec.variable);
        self.specs.push(spec);
    }

    /// Attaches the change callback.
    pub fn build<F>(&mut self, callback: F)
    where
        F: FnMut(&ParameterSet) -> Result<(), StabilityError> + 'a,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Moves one widget. The value is clamped and snapped like a slider would do, stored,
    /// and the callback fires with the full mapping. The stored value stays even if the
    /// callback fails.
    pub fn set(&mut self, name: &str, requested: f64) -> Result<f64, StabilityError> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.variable == name)
            .ok_or_else(|| StabilityError::UnknownParameter(name.to_string()))?;
        let accepted = spec.constrain(requested);
        if accepted != requested {
            info!("{} = {} adjusted to {}", name, requested, spec.readout(accepted));
        }
        self.values.insert(name.to_string(), accepted);
        if let Some(callback) = self.callback.as_mut() {
            callback(&self.values)?;
        }
        Ok(accepted)
    }

    pub fn values(&self) -> &ParameterSet {
        &self.values
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// widgets with their current readouts
    pub fn describe(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["parameter", "description", "value", "min", "max", "step"]);
        for spec in &self.specs {
            let current = self.values.get(&spec.variable).copied().unwrap_or(spec.value);
            builder.push_record([
                spec.variable.clone(),
                spec.description.clone(),
                spec.readout(current),
                spec.readout(spec.min),
                spec.readout(spec.max),
                format!("{}", spec.effective_step()),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////
//                              CONSOLE
////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Set(String, f64),
    Show,
    Help,
    Quit,
    Empty,
}

fn parse_name(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// `name = value` or `name value`
fn parse_assignment(input: &str) -> IResult<&str, ConsoleCommand> {
    let separator = alt((
        delimited(space0, tag("="), space0),
        space1,
    ));
    let (input, (name, _, number)) = (parse_name, separator, double).parse(input)?;
    Ok((input, ConsoleCommand::Set(name, number)))
}

fn parse_keyword(input: &str) -> IResult<&str, ConsoleCommand> {
    alt((
        value(ConsoleCommand::Quit, alt((tag_no_case("quit"), tag_no_case("exit"), tag_no_case("q")))),
        value(ConsoleCommand::Show, tag_no_case("show")),
        value(ConsoleCommand::Help, alt((tag_no_case("help"), tag_no_case("?")))),
    ))
    .parse(input)
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleCommand::Empty);
    }
    let mut parser = alt((all_consuming(parse_keyword), all_consuming(parse_assignment)));
    match parser.parse(line) {
        Ok((_, command)) => Ok(command),
        Err(_) => Err(format!("cannot understand '{}', type help", line)),
    }
}

fn print_help() {
    println!("  <name> = <value>   move a parameter (also: <name> <value>)");
    println!("  show               current values");
    println!("  help               this message");
    println!("  quit               leave");
}

/// Reads commands until `quit` or the end of the input. Each assignment fires one
/// update; failures are logged and the loop goes on. Returns the number of accepted
/// updates.
pub fn run_console<R: BufRead>(
    controls: &mut InteractiveControls<'_>,
    input: R,
) -> Result<usize, StabilityError> {
    println!("{}", controls.describe());
    print_help();
    let mut updates = 0;
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(ConsoleCommand::Quit) => break,
            Ok(ConsoleCommand::Show) => println!("{}", controls.describe()),
            Ok(ConsoleCommand::Help) => print_help(),
            Ok(ConsoleCommand::Empty) => {}
            Ok(ConsoleCommand::Set(name, requested)) => match controls.set(&name, requested) {
                Ok(_) => updates += 1,
                Err(err) => error!("{}", err),
            },
            Err(msg) => warn!("{}", msg),
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    println!();
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    fn panel<'a>() -> InteractiveControls<'a> {
        let mut controls = InteractiveControls::new();
        controls.add_parameter(ParamSpec::slider("s", "relaxation parameter s", 1.0, 0.0, 2.0));
        controls.add_parameter(ParamSpec::slider("c", "equilibrium parameter c", 0.5, 0.0, 1.5));
        controls
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("s = 1.5"), Ok(ConsoleCommand::Set("s".to_string(), 1.5)));
        assert_eq!(parse_command("  la 0.75 "), Ok(ConsoleCommand::Set("la".to_string(), 0.75)));
        assert_eq!(parse_command("SHOW"), Ok(ConsoleCommand::Show));
        assert_eq!(parse_command("quit"), Ok(ConsoleCommand::Quit));
        assert_eq!(parse_command(""), Ok(ConsoleCommand::Empty));
        assert!(parse_command("s = fast").is_err());
    }

    #[test]
    fn test_set_fires_callback_with_all_values() {
        let seen = RefCell::new(Vec::new());
        {
            let mut controls = panel();
            controls.build(|params: &ParameterSet| {
                seen.borrow_mut().push(params.clone());
                Ok(())
            });
            assert_eq!(controls.set("s", 1.5).unwrap(), 1.5);
        }
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 2);
        assert_eq!(seen[0]["s"], 1.5);
        assert_eq!(seen[0]["c"], 0.5);
    }

    #[test]
    fn test_set_clamps_and_rejects_unknown() {
        let mut controls = panel();
        assert_eq!(controls.set("s", 7.0).unwrap(), 2.0);
        assert!(matches!(
            controls.set("omega", 1.0),
            Err(StabilityError::UnknownParameter(name)) if name == "omega"
        ));
        assert_eq!(controls.values()["s"], 2.0);
    }

    #[test]
    fn test_failing_callback_keeps_value() {
        let mut controls = panel();
        controls.build(|_params: &ParameterSet| Err(StabilityError::Config("boom".to_string())));
        assert!(controls.set("c", 1.0).is_err());
        assert_eq!(controls.values()["c"], 1.0);
    }

    #[test]
    fn test_console_session() {
        let calls = RefCell::new(0usize);
        let mut controls = panel();
        controls.build(|_params: &ParameterSet| {
            *calls.borrow_mut() += 1;
            Ok(())
        });
        let script = "s = 1.2\nnonsense line\nomega = 3\nshow\nc 0.25\nquit\ns = 0.1\n";
        let updates = run_console(&mut controls, Cursor::new(script)).unwrap();
        assert_eq!(updates, 2);
        assert_eq!(controls.values()["s"], 1.2);
        assert_eq!(controls.values()["c"], 0.25);
        drop(controls);
        assert_eq!(calls.into_inner(), 2);
    }

    #[test]
    fn test_registered_value_is_kept_exactly() {
        let seen = RefCell::new(Vec::new());
        {
            let mut controls = InteractiveControls::new();
            controls.add_parameter(ParamSpec::slider("s", "relaxation parameter s", 1.234, 0.0, 2.0));
            assert!((controls.values()["s"] - 1.23).abs() < 1e-12);
            controls.add_parameter_at(ParamSpec::slider("s", "relaxation parameter s", 1.234, 0.0, 2.0), 1.234);
            controls.add_parameter(ParamSpec::slider("c", "equilibrium parameter c", 0.5, 0.0, 1.5));
            controls.build(|params: &ParameterSet| {
                seen.borrow_mut().push(params.clone());
                Ok(())
            });
            controls.set("c", 0.25).unwrap();
        }
        let seen = seen.into_inner();
        assert_eq!(seen[0]["s"], 1.234);
        assert_eq!(seen[0]["c"], 0.25);
    }

    #[test]
    fn test_describe_lists_every_widget() {
        let controls = panel();
        let text = controls.describe();
        assert!(text.contains("relaxation parameter s"));
        assert!(text.contains("1.50"));
    }
}
