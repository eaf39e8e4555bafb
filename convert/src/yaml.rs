//! YAML adapter.
//!
//! Turns a `serde_yaml` document into a [`RawNode`] tree. YAML can express
//! things a raw tree cannot: non-string mapping keys, tagged values, and
//! non-finite floats. Those are rejected with an
//! [`UnsupportedRawNode`](hcl_types_core::DiagnosticKind::UnsupportedRawNode)
//! diagnostic naming the offending path.
//!
//! `serde_yaml` reads every non-integer number as an `f64`, so YAML input
//! cannot produce [`Number::Decimal`]; feed JSON through
//! `From<serde_json::Value>` when literals must survive digit for digit.

use hcl_types_core::{Diagnostic, Number, Path, PathSegment, RawNode};
use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Converts a parsed YAML value into a raw tree.
///
/// # Errors
///
/// Returns an unsupported-node diagnostic for the first value that has no
/// raw equivalent.
///
/// # Examples
///
/// ```
/// use hcl_types_convert::raw_from_yaml;
/// use hcl_types_core::ShapeKind;
///
/// let value: serde_yaml::Value = serde_yaml::from_str("ports: [80, 443]").unwrap();
/// let raw = raw_from_yaml(value).unwrap();
/// assert_eq!(raw.shape(), ShapeKind::Mapping);
///
/// let value: serde_yaml::Value = serde_yaml::from_str("{1: one}").unwrap();
/// let err = raw_from_yaml(value).unwrap_err();
/// assert_eq!(err.kind.code(), "unsupported_raw_node");
/// ```
pub fn raw_from_yaml(value: Value) -> std::result::Result<RawNode, Diagnostic> {
    let mut path = Path::root();
    convert_value(value, &mut path)
}

/// Parses YAML text and converts it into a raw tree.
///
/// # Errors
///
/// Returns [`Yaml`](ConvertError::Yaml) for malformed text and
/// [`UnsupportedInput`](ConvertError::UnsupportedInput) for values with no
/// raw equivalent.
pub fn raw_from_yaml_str(text: &str) -> Result<RawNode> {
    let value: Value = serde_yaml::from_str(text)?;
    let raw = raw_from_yaml(value).map_err(ConvertError::UnsupportedInput)?;
    debug!(depth = raw.depth(), "Loaded raw tree from YAML");
    Ok(raw)
}

fn convert_value(value: Value, path: &mut Path) -> std::result::Result<RawNode, Diagnostic> {
    match value {
        Value::Null => Ok(RawNode::null()),
        Value::Bool(b) => Ok(RawNode::bool(b)),
        Value::Number(n) => convert_number(&n, path).map(RawNode::number),
        Value::String(s) => Ok(RawNode::string(s)),
        Value::Sequence(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                path.push(PathSegment::Index(index));
                converted.push(convert_value(item, path)?);
                path.pop();
            }
            Ok(RawNode::sequence(converted))
        }
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, item) in mapping {
                let Value::String(key) = key else {
                    let reason = format!("mapping key must be a string, found {}", describe(&key));
                    return Err(Diagnostic::unsupported(&reason, path.clone(), None));
                };
                path.push(PathSegment::Name(key.clone()));
                let converted = convert_value(item, path)?;
                path.pop();
                entries.push((key, converted));
            }
            Ok(RawNode::mapping(entries))
        }
        Value::Tagged(tagged) => {
            let reason = format!("tagged value {}", tagged.tag);
            Err(Diagnostic::unsupported(&reason, path.clone(), None))
        }
    }
}

fn convert_number(n: &serde_yaml::Number, path: &Path) -> std::result::Result<Number, Diagnostic> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::Int(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::UInt(u));
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => Ok(Number::Float(f)),
        _ => Err(Diagnostic::unsupported(
            &format!("non-finite number {n}"),
            path.clone(),
            None,
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_types_core::RawKind;

    fn parse(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_mapping_keeps_key_order() {
        let raw = raw_from_yaml(parse("zone: a\nregion: b\ncount: 2\n")).unwrap();
        let RawKind::Mapping(entries) = raw.kind() else {
            panic!("expected mapping");
        };
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["zone", "region", "count"]);
        assert_eq!(entries["count"].kind(), &RawKind::Number(Number::Int(2)));
    }

    #[test]
    fn test_quoted_number_stays_string() {
        let raw = raw_from_yaml(parse("port: \"8080\"")).unwrap();
        let RawKind::Mapping(entries) = raw.kind() else {
            panic!("expected mapping");
        };
        assert_eq!(entries["port"].kind(), &RawKind::String("8080".into()));
    }

    #[test]
    fn test_non_string_key_reports_path() {
        let err = raw_from_yaml(parse("servers:\n  - true: yes\n")).unwrap_err();
        assert_eq!(err.path.to_string(), "servers[0]");
        assert!(err.message.contains("found bool"));
    }

    #[test]
    fn test_tagged_value_rejected() {
        let err = raw_from_yaml(parse("size: !Large 10")).unwrap_err();
        assert_eq!(err.path.to_string(), "size");
        assert!(err.message.contains("!Large"));
    }

    #[test]
    fn test_non_finite_number_rejected() {
        let err = raw_from_yaml(parse("ratio: .nan")).unwrap_err();
        assert_eq!(err.kind.code(), "unsupported_raw_node");
        assert_eq!(err.path.to_string(), "ratio");
    }

    #[test]
    fn test_raw_from_yaml_str_errors() {
        assert!(matches!(
            raw_from_yaml_str("key: [unclosed"),
            Err(ConvertError::Yaml(_))
        ));
        assert!(matches!(
            raw_from_yaml_str("[.inf]"),
            Err(ConvertError::UnsupportedInput(_))
        ));
    }
}
