use hcl_types_convert::{
    ConvertConfig, ConvertError, Converter, ValidationMode, convert, convert_with_type_expression,
    infer, raw_from_yaml_str, validate,
};
use hcl_types_core::{
    DiagnosticKind, Number, ObjectType, Path, RawNode, ShapeKind, SourceLocation, TypeDescriptor,
    TypeExprErrorKind, TypedValue, parse_type_expression,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn raw(value: serde_json::Value) -> RawNode {
    RawNode::from(value)
}

fn schema(text: &str) -> TypeDescriptor {
    parse_type_expression(text).unwrap()
}

fn located(node: RawNode, line: u32, column: u32) -> RawNode {
    node.with_source(SourceLocation::new(line, column).with_file("main.tf"))
}

// ---------------------------------------------------------------------------
// Type expressions
// ---------------------------------------------------------------------------

#[test]
fn test_parse_list_of_string() {
    assert_eq!(
        parse_type_expression("list(string)").unwrap(),
        TypeDescriptor::list(TypeDescriptor::String)
    );
}

#[test]
fn test_parse_object_with_empty_attribute_type() {
    let err = parse_type_expression("object({name=}").unwrap_err();
    assert_eq!(err.kind, TypeExprErrorKind::MissingAttributeType("name".into()));

    let converted = convert_with_type_expression(&raw(json!({})), "object({name=}");
    assert!(matches!(converted, Err(ConvertError::TypeExpression(_))));
}

#[test]
fn test_attribute_order_and_whitespace_do_not_matter() {
    let a = schema("object({ name = string, port = number })");
    let b = schema("object({port=number,name=string})");
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

#[test]
fn test_infer_nested_object() {
    let typed = infer(&raw(json!({
        "name": "webapp",
        "port": 8080,
        "enabled": true,
        "config": {"timeout": 30, "retry": true}
    })));

    let expected = TypeDescriptor::object(
        ObjectType::new()
            .with_attribute("name", TypeDescriptor::String)
            .with_attribute("port", TypeDescriptor::Number)
            .with_attribute("enabled", TypeDescriptor::Bool)
            .with_attribute(
                "config",
                TypeDescriptor::object(
                    ObjectType::new()
                        .with_attribute("timeout", TypeDescriptor::Number)
                        .with_attribute("retry", TypeDescriptor::Bool),
                ),
            ),
    );
    assert_eq!(typed.ty(), &expected);
    assert_eq!(typed.to_json()["config"]["timeout"], 30);
}

#[test]
fn test_infer_homogeneous_and_mixed_lists() {
    let numbers = infer(&raw(json!({"values": [1, 2, 3, 4]})));
    assert_eq!(
        numbers.get("values").unwrap().ty(),
        &TypeDescriptor::list(TypeDescriptor::Number)
    );

    let mixed = infer(&raw(json!({"values": [1, "two", true, 3.14]})));
    assert_eq!(
        mixed.get("values").unwrap().ty(),
        &TypeDescriptor::list(TypeDescriptor::Dynamic)
    );
}

#[test]
fn test_infer_keeps_numeric_payload() {
    let typed = convert(&raw(json!([1, 2.5, 18446744073709551615_u64])), None).unwrap();
    assert_eq!(typed.ty(), &TypeDescriptor::list(TypeDescriptor::Number));
    assert_eq!(typed.to_json(), json!([1, 2.5, 18446744073709551615_u64]));
}

#[test]
fn test_wide_and_precise_numbers_round_trip_exactly() {
    let text = r#"{"d":0.1000000000000000000001,"i":100000000000000000001}"#;
    let value: serde_json::Value = serde_json::from_str(text).unwrap();

    let typed = convert(&raw(value.clone()), None).unwrap();
    assert_eq!(typed.ty().to_string(), "object({d=number,i=number})");
    assert_eq!(serde_json::to_string(&typed.to_json()).unwrap(), text);
    assert_eq!(
        typed.get("i").and_then(TypedValue::as_number),
        Some(&Number::Decimal("100000000000000000001".into()))
    );

    let typed = convert_with_type_expression(&raw(value), "object({d=number,i=number})").unwrap();
    assert_eq!(serde_json::to_string(&typed.to_json()).unwrap(), text);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_numeric_string_is_type_mismatch() {
    let err = validate(&raw(json!({"port": "8080"})), &schema("object({port=number})")).unwrap_err();
    assert_eq!(
        err.kind,
        DiagnosticKind::TypeMismatch {
            expected: TypeDescriptor::Number,
            found: ShapeKind::String,
        }
    );
    assert_eq!(err.path, Path::root().child("port"));
}

#[test]
fn test_undeclared_attribute_is_rejected() {
    let err = validate(
        &raw(json!({"ami": "ami-123", "extra": "x"})),
        &schema("object({ami=string})"),
    )
    .unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::UnknownAttribute { name: "extra".into() });
    assert_eq!(err.path, Path::root().child("extra"));
}

#[test]
fn test_any_attribute_carries_inferred_shape() {
    let typed = convert_with_type_expression(
        &raw(json!({"name": "db", "settings": {"size": 10, "zones": ["a", "b"]}})),
        "object({name=string, settings=any})",
    )
    .unwrap();
    assert_eq!(
        typed.get("settings").unwrap().ty().to_string(),
        "object({size=number,zones=list(string)})"
    );
}

#[test]
fn test_nested_diagnostic_path() {
    let data = raw(json!({
        "servers": [
            {"name": "a", "ports": {"http": 80}},
            {"name": "b", "ports": {"http": "eighty"}}
        ]
    }));
    let ty = schema("object({servers=list(object({name=string,ports=map(number)}))})");
    let err = convert(&data, Some(&ty)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema validation failed: servers[1].ports.http: expected number, found string"
    );
}

// ---------------------------------------------------------------------------
// Source locations
// ---------------------------------------------------------------------------

#[test]
fn test_diagnostic_inherits_source_location() {
    let data = RawNode::mapping([
        ("ami", located(RawNode::string("ami-123"), 2, 9)),
        ("count", located(RawNode::string("three"), 3, 11)),
    ]);
    let err = validate(&data, &schema("object({ami=string,count=number})")).unwrap_err();
    assert_eq!(err.source, Some(SourceLocation::new(3, 11).with_file("main.tf")));
    assert_eq!(
        err.to_string(),
        "count: expected number, found string (at main.tf, line 3, column 11)"
    );
}

#[test]
fn test_diagnostic_without_source() {
    let err = validate(&raw(json!(true)), &TypeDescriptor::String).unwrap_err();
    assert!(err.source.is_none());
    assert_eq!(err.to_string(), "<root>: expected string, found bool");
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_converter_aggregate_mode() {
    let config = ConvertConfig::from_yaml_str("validation:\n  mode: aggregate\n").unwrap();
    let converter = Converter::new(config);

    let data = raw(json!({"name": 1, "extra": true}));
    let err = converter
        .convert_with_type_expression(&data, "object({name=string, zone=string})")
        .unwrap_err();

    let codes: Vec<_> = err.diagnostics().iter().map(|d| d.kind.code()).collect();
    assert_eq!(codes, vec!["unknown_attribute", "type_mismatch", "missing_attribute"]);
}

#[test]
fn test_converter_type_expression_depth_limit() {
    let config = ConvertConfig::from_yaml_str("type_expression:\n  max_depth: 2\n").unwrap();
    let converter = Converter::new(config);
    assert_eq!(converter.config().validation.mode, ValidationMode::FailFast);

    let err = converter.parse_type("list(list(string))").unwrap_err();
    let ConvertError::TypeExpression(err) = err else {
        panic!("expected type expression error");
    };
    assert_eq!(err.kind, TypeExprErrorKind::NestingTooDeep { limit: 2 });
}

// ---------------------------------------------------------------------------
// YAML input
// ---------------------------------------------------------------------------

#[test]
fn test_yaml_document_validates() {
    let data = raw_from_yaml_str(
        r#"
region: eu-west-1
instances:
  - type: t3.micro
    count: 2
  - type: t3.large
    count: 1
"#,
    )
    .unwrap();
    let typed = convert_with_type_expression(
        &data,
        "object({region=string, instances=list(object({type=string, count=number}))})",
    )
    .unwrap();
    assert_eq!(typed.get("instances").and_then(|v| v.len()), Some(2));
}

#[test]
fn test_yaml_unsupported_input() {
    let err = raw_from_yaml_str("tags:\n  ? [a, b]\n  : c\n").unwrap_err();
    let diagnostics = err.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].path.to_string(), "tags");
}
