// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
/// Parser of task documents made of titled sections with `key: value, value` lines:
///
/// ```text
/// // comment
/// scheme
///   name: D1Q3 (1)
///   samples: 200
/// parameters
///   sa: 1.5
///   sb: 1.2
/// ```
///
/// One key per line. Lines starting with `//`, `#`, `%` or `;` are comments. A value runs to the next comma
/// or to the end of the line, so it may contain spaces (`D1Q3 (1)`). Every value is typed
/// on the fly: integer, then float, then boolean, otherwise string.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, line_ending, space0},
    combinator::{eof, map, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type DocumentMap = HashMap<String, SectionMap>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// floats and integers both read as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// Types a raw token: integer, float, boolean, string, in this order.
pub fn typed_value(s: &str) -> Value {
    let s = s.trim();
    if let Ok(val) = s.parse::<i64>() {
        Value::Integer(val)
    } else if let Ok(val) = s.parse::<f64>() {
        Value::Float(val)
    } else if let Ok(val) = s.parse::<bool>() {
        Value::Boolean(val)
    } else {
        Value::String(s.to_string())
    }
}

/// section title or key: word characters, starting with a letter or underscore
pub(crate) fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    let value_parser = take_while1(|c: char| !matches!(c, ',' | '\n' | '\r'));
    let mut value_parser = map(value_parser, typed_value);
    value_parser.parse(input)
}

pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_comma = delimited(space0, tag(","), space0);
    let mut parser = separated_list0(separator_comma, parse_value);
    parser.parse(input)
}

/// `key: v1, v2` up to the end of the line
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = terminated(
        separated_pair(parse_identifier, colon_separator, parse_value_list),
        opt(line_ending),
    );
    parser.parse(input)
}

/// a title alone on its line followed by any number of pairs
pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = terminated(parse_identifier, pair(space0, alt((line_ending, eof)))).parse(input)?;
    let (input, pairs) = many0(parse_key_value_pair).parse(input)?;
    let section: SectionMap = pairs.into_iter().collect();
    Ok((input, (title, section)))
}

/// drops comment and blank lines and trims the rest
pub(crate) fn filter_comments(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim())
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with("//")
                && !line.starts_with('#')
                && !line.starts_with('%')
                && !line.starts_with(';')
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole document. A section title given twice merges its keys, the later
/// value of a key wins.
pub fn parse_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    let parsed = many0(parse_section).parse(filtered.as_str());
    match parsed {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                let line = remaining.lines().next().unwrap_or_default();
                return Err(format!("Failed to parse the document near '{}'", line));
            }
            let mut result: DocumentMap = HashMap::new();
            for (title, section) in sections {
                result.entry(title).or_default().extend(section);
            }
            Ok(result)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/// same document read from TOML tables (`[scheme]`, `name = "D1Q2"`, ...)
pub fn parse_toml_document(input: &str) -> Result<DocumentMap, String> {
    let table = input
        .parse::<toml::Table>()
        .map_err(|e| format!("TOML error: {}", e))?;
    let mut result: DocumentMap = HashMap::new();
    for (title, section) in table {
        let toml::Value::Table(section) = section else {
            return Err(format!("'{}' must be a table", title));
        };
        let mut section_map = SectionMap::new();
        for (key, value) in section {
            let values = match value {
                toml::Value::Array(items) => items
                    .into_iter()
                    .map(|item| toml_scalar(&key, item))
                    .collect::<Result<Vec<_>, _>>()?,
                scalar => vec![toml_scalar(&key, scalar)?],
            };
            section_map.insert(key, values);
        }
        result.insert(title, section_map);
    }
    Ok(result)
}

fn toml_scalar(key: &str, value: toml::Value) -> Result<Value, String> {
    match value {
        toml::Value::String(s) => Ok(Value::String(s)),
        toml::Value::Integer(i) => Ok(Value::Integer(i)),
        toml::Value::Float(f) => Ok(Value::Float(f)),
        toml::Value::Boolean(b) => Ok(Value::Boolean(b)),
        other => Err(format!("unsupported value for '{}': {}", key, other)),
    }
}
