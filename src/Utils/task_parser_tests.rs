// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
/////////////////////////////TESTS////////////////////////////////////////////////////
/*
parser tests:
identifiers, typed values, value lists, key-value pairs, sections,
comments, whole documents, malformed documents, TOML documents, files
*/

#[cfg(test)]
mod tests {
    use crate::Utils::task_parser::{
        Value, filter_comments, parse_document, parse_identifier, parse_key_value_pair,
        parse_section, parse_toml_document, parse_value, parse_value_list, typed_value,
    };
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_identifier() {
        let (remaining, title) = parse_identifier("scheme\nname: D1Q2").unwrap();
        assert_eq!(title, "scheme");
        assert_eq!(remaining, "\nname: D1Q2");

        let (remaining, key) = parse_identifier("log_file: auto").unwrap();
        assert_eq!(key, "log_file");
        assert_eq!(remaining, ": auto");

        assert!(parse_identifier("1abc").is_err());
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(typed_value("200"), Value::Integer(200));
        assert_eq!(typed_value(" 1.5 "), Value::Float(1.5));
        assert_eq!(typed_value("true"), Value::Boolean(true));
        assert_eq!(typed_value("D1Q3 (1)"), Value::String("D1Q3 (1)".to_string()));
        assert_eq!(Value::Integer(2).as_float(), Some(2.0));
        assert_eq!(Value::Boolean(false).as_float(), None);
    }

    #[test]
    fn test_parse_value_keeps_inner_spaces() {
        let (remaining, value) = parse_value("D1Q3 (2)\nsamples: 10").unwrap();
        assert_eq!(value, Value::String("D1Q3 (2)".to_string()));
        assert_eq!(remaining, "\nsamples: 10");
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("1, 2.5 ,true").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(
            values,
            vec![Value::Integer(1), Value::Float(2.5), Value::Boolean(true)]
        );
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) = parse_key_value_pair("s : 1.7\nc: 0.5").unwrap();
        assert_eq!(key, "s");
        assert_eq!(values, vec![Value::Float(1.7)]);
        assert_eq!(remaining, "c: 0.5");

        let (_, (key, values)) = parse_key_value_pair("output:\n").unwrap();
        assert_eq!(key, "output");
        assert!(values.is_empty());
    }

    #[test]
    fn test_parse_section() {
        let input = "parameters\ns: 1.7\nc: 0.5\nviewer\nbackend: csv";
        let (remaining, (title, section)) = parse_section(input).unwrap();
        assert_eq!(title, "parameters");
        assert_eq!(section.len(), 2);
        assert_eq!(section["c"], vec![Value::Float(0.5)]);
        assert_eq!(remaining, "viewer\nbackend: csv");
    }

    #[test]
    fn test_filter_comments() {
        let input = "// header\nscheme\n   # note\n  name: D1Q2  \n\n% other\n; last";
        assert_eq!(filter_comments(input), "scheme\nname: D1Q2");
    }

    #[test]
    fn test_parse_document() {
        let input = r#"
            // D1Q3 with two relaxation rates
            scheme
              name: D1Q3 (1)
              samples: 64
              ordering: angle
            parameters
              sa: 1.5
              sb: 1.2
            interactive
              console: false
        "#;
        let doc = parse_document(input).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc["scheme"]["name"],
            vec![Value::String("D1Q3 (1)".to_string())]
        );
        assert_eq!(doc["scheme"]["samples"], vec![Value::Integer(64)]);
        assert_eq!(doc["parameters"]["sa"][0].as_float(), Some(1.5));
        assert_eq!(doc["interactive"]["console"], vec![Value::Boolean(false)]);
    }

    #[test]
    fn test_repeated_section_is_merged() {
        let doc = parse_document("parameters\ns: 1.0\nparameters\nc: 0.5\ns: 1.9").unwrap();
        assert_eq!(doc["parameters"].len(), 2);
        assert_eq!(doc["parameters"]["s"], vec![Value::Float(1.9)]);
    }

    #[test]
    fn test_empty_and_malformed_documents() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("// only a comment").unwrap().is_empty());
        let err = parse_document("name: D1Q2").unwrap_err();
        assert!(err.contains("name: D1Q2"));
    }

    #[test]
    fn test_parse_toml_document() {
        let input = r#"
            [scheme]
            name = "D1Q2"
            samples = 32

            [parameters]
            s = 1.5
            c = 1

            [viewer]
            backend = ["csv"]
        "#;
        let doc = parse_toml_document(input).unwrap();
        assert_eq!(doc["scheme"]["name"], vec![Value::String("D1Q2".to_string())]);
        assert_eq!(doc["parameters"]["c"][0].as_float(), Some(1.0));
        assert_eq!(doc["viewer"]["backend"][0].as_string().unwrap(), "csv");
        assert!(parse_toml_document("name = \"D1Q2\"").is_err());
    }

    #[test]
    fn test_document_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("task.txt");
        fs::write(&path, "viewer\nbackend: gnuplot\noutput: out/spectrum.png\n").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let doc = parse_document(&content).unwrap();
        assert_eq!(
            doc["viewer"]["output"],
            vec![Value::String("out/spectrum.png".to_string())]
        );
    }
}
