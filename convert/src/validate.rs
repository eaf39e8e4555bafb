//! Schema validation of raw data.
//!
//! Checks a [`RawNode`] tree against a declared [`TypeDescriptor`] and
//! produces a [`TypedValue`] carrying the declared types.
//!
//! # Rules
//!
//! - Primitives must match exactly. A string is never a number, even when
//!   its text parses as one.
//! - `list(T)` needs a sequence, `map(T)` and `object({...})` need a
//!   mapping. Every element or entry is checked against `T`.
//! - Objects are strict: keys the schema does not declare are reported
//!   before anything else, then declared attributes are checked in
//!   declaration order. A missing `optional(...)` attribute is skipped.
//! - `any` accepts anything, including null, and types it by inference.
//! - Null matches nothing except `any`.
//!
//! Diagnostics carry the path of the offending node and, when the node has
//! one, its source location.

use hcl_types_core::{
    Diagnostic, Diagnostics, ObjectType, Path, PathSegment, RawKind, RawNode, TypeDescriptor,
    TypedValue, Value,
};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::{ValidationMode, ValidationOptions};
use crate::infer::infer;

/// Validates `raw` against `schema`, stopping at the first problem.
///
/// # Errors
///
/// Returns the first [`Diagnostic`] found, in traversal order.
///
/// # Examples
///
/// ```
/// use hcl_types_convert::validate;
/// use hcl_types_core::{DiagnosticKind, RawNode, parse_type_expression};
///
/// let schema = parse_type_expression("object({ami=string})").unwrap();
/// let raw = RawNode::mapping([("ami", RawNode::string("ami-123"))]);
/// let typed = validate(&raw, &schema).unwrap();
/// assert_eq!(typed.get("ami").and_then(|v| v.as_str()), Some("ami-123"));
///
/// let err = validate(&RawNode::mapping::<&str>([]), &schema).unwrap_err();
/// assert_eq!(err.kind, DiagnosticKind::MissingAttribute { name: "ami".into() });
/// ```
pub fn validate(raw: &RawNode, schema: &TypeDescriptor) -> Result<TypedValue, Diagnostic> {
    let options = ValidationOptions::default();
    Walk::new(ValidationMode::FailFast, &options).check(raw, schema, 1)
}

/// Validates `raw` against `schema`, collecting every problem.
///
/// # Errors
///
/// Returns all diagnostics found, up to the default cap.
pub fn validate_all(raw: &RawNode, schema: &TypeDescriptor) -> Result<TypedValue, Diagnostics> {
    let options = ValidationOptions {
        mode: ValidationMode::Aggregate,
        ..ValidationOptions::default()
    };
    validate_with(raw, schema, &options)
}

/// Validates `raw` against `schema` with explicit options.
///
/// In fail-fast mode the error holds exactly one diagnostic.
///
/// # Errors
///
/// Returns the diagnostics found, in traversal order.
pub fn validate_with(
    raw: &RawNode,
    schema: &TypeDescriptor,
    options: &ValidationOptions,
) -> Result<TypedValue, Diagnostics> {
    debug!(schema = %schema, mode = ?options.mode, "Validating raw data");
    let mut walk = Walk::new(options.mode, options);
    match walk.check(raw, schema, 1) {
        Ok(value) => Ok(value),
        Err(first) => match options.mode {
            ValidationMode::FailFast => Err(Diagnostics::from(first)),
            ValidationMode::Aggregate => {
                debug!(count = walk.errors.len(), "Validation collected diagnostics");
                Err(Diagnostics::from(walk.errors))
            }
        },
    }
}

/// State for one validation run.
///
/// `check` returns the first diagnostic of the subtree on failure. In
/// aggregate mode every diagnostic is also recorded in `errors`, and
/// siblings keep being checked until `max_errors` is reached.
struct Walk {
    mode: ValidationMode,
    max_depth: usize,
    max_errors: usize,
    path: Path,
    errors: Vec<Diagnostic>,
}

impl Walk {
    fn new(mode: ValidationMode, options: &ValidationOptions) -> Self {
        Self {
            mode,
            max_depth: options.max_depth,
            max_errors: options.max_errors,
            path: Path::root(),
            errors: Vec::new(),
        }
    }

    fn check(
        &mut self,
        raw: &RawNode,
        schema: &TypeDescriptor,
        depth: usize,
    ) -> Result<TypedValue, Diagnostic> {
        if depth > self.max_depth {
            let reason = format!("nesting exceeds limit of {}", self.max_depth);
            return Err(self.report(Diagnostic::unsupported(
                &reason,
                self.path.clone(),
                raw.source().cloned(),
            )));
        }

        match (schema, raw.kind()) {
            (TypeDescriptor::Dynamic, _) => Ok(infer(raw)),
            (TypeDescriptor::String, RawKind::String(s)) => {
                Ok(TypedValue::new(TypeDescriptor::String, Value::String(s.clone())))
            }
            (TypeDescriptor::Number, RawKind::Number(n)) => {
                Ok(TypedValue::new(TypeDescriptor::Number, Value::Number(n.clone())))
            }
            (TypeDescriptor::Bool, RawKind::Bool(b)) => {
                Ok(TypedValue::new(TypeDescriptor::Bool, Value::Bool(*b)))
            }
            (TypeDescriptor::List(element), RawKind::Sequence(items)) => {
                let items = self.check_list(element, items, depth)?;
                Ok(TypedValue::new(schema.clone(), Value::List(items)))
            }
            (TypeDescriptor::Map(element), RawKind::Mapping(entries)) => {
                let entries = self.check_map(element, entries, depth)?;
                Ok(TypedValue::new(schema.clone(), Value::Map(entries)))
            }
            (TypeDescriptor::Object(object), RawKind::Mapping(entries)) => {
                let attributes = self.check_object(object, entries, raw, depth)?;
                Ok(TypedValue::new(schema.clone(), Value::Object(attributes)))
            }
            _ => Err(self.report(Diagnostic::type_mismatch(
                schema.clone(),
                raw.shape(),
                self.path.clone(),
                raw.source().cloned(),
            ))),
        }
    }

    fn check_list(
        &mut self,
        element: &TypeDescriptor,
        items: &[RawNode],
        depth: usize,
    ) -> Result<Vec<TypedValue>, Diagnostic> {
        let mut checked = Vec::with_capacity(items.len());
        let mut first = None;
        for (index, item) in items.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            let result = self.check(item, element, depth + 1);
            self.path.pop();
            match result {
                Ok(value) => checked.push(value),
                Err(diagnostic) => self.absorb(&mut first, diagnostic)?,
            }
        }
        first.map_or(Ok(checked), Err)
    }

    fn check_map(
        &mut self,
        element: &TypeDescriptor,
        entries: &IndexMap<String, RawNode>,
        depth: usize,
    ) -> Result<IndexMap<String, TypedValue>, Diagnostic> {
        let mut checked = IndexMap::with_capacity(entries.len());
        let mut first = None;
        for (key, value) in entries {
            self.path.push(PathSegment::Name(key.clone()));
            let result = self.check(value, element, depth + 1);
            self.path.pop();
            match result {
                Ok(value) => {
                    checked.insert(key.clone(), value);
                }
                Err(diagnostic) => self.absorb(&mut first, diagnostic)?,
            }
        }
        first.map_or(Ok(checked), Err)
    }

    fn check_object(
        &mut self,
        object: &ObjectType,
        entries: &IndexMap<String, RawNode>,
        raw: &RawNode,
        depth: usize,
    ) -> Result<IndexMap<String, TypedValue>, Diagnostic> {
        let mut first = None;

        for (key, value) in entries {
            if object.contains(key) {
                continue;
            }
            let diagnostic = Diagnostic::unknown_attribute(
                key,
                self.path.child(key),
                value.source().cloned(),
            );
            let diagnostic = self.report(diagnostic);
            self.absorb(&mut first, diagnostic)?;
        }

        let mut checked = IndexMap::with_capacity(object.len());
        for (name, attribute) in object.iter() {
            let Some(value) = entries.get(name) else {
                if attribute.optional {
                    trace!(path = %self.path, attribute = name, "Optional attribute absent");
                    continue;
                }
                let diagnostic = Diagnostic::missing_attribute(
                    name,
                    self.path.child(name),
                    raw.source().cloned(),
                );
                let diagnostic = self.report(diagnostic);
                self.absorb(&mut first, diagnostic)?;
                continue;
            };

            self.path.push(PathSegment::Name(name.to_string()));
            let result = self.check(value, &attribute.ty, depth + 1);
            self.path.pop();
            match result {
                Ok(value) => {
                    checked.insert(name.to_string(), value);
                }
                Err(diagnostic) => self.absorb(&mut first, diagnostic)?,
            }
        }

        first.map_or(Ok(checked), Err)
    }

    /// Records a freshly raised diagnostic and hands it back.
    fn report(&mut self, diagnostic: Diagnostic) -> Diagnostic {
        trace!(path = %diagnostic.path, code = diagnostic.kind.code(), "Schema violation");
        if self.mode == ValidationMode::Aggregate {
            self.errors.push(diagnostic.clone());
        }
        diagnostic
    }

    /// Remembers a child failure, or propagates it when the walk must stop.
    fn absorb(
        &self,
        first: &mut Option<Diagnostic>,
        diagnostic: Diagnostic,
    ) -> Result<(), Diagnostic> {
        let first = first.get_or_insert(diagnostic);
        if self.should_stop() {
            return Err(first.clone());
        }
        Ok(())
    }

    fn should_stop(&self) -> bool {
        match self.mode {
            ValidationMode::FailFast => true,
            ValidationMode::Aggregate => {
                self.max_errors != 0 && self.errors.len() >= self.max_errors
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_types_core::{DiagnosticKind, ShapeKind, SourceLocation, parse_type_expression};

    fn schema(text: &str) -> TypeDescriptor {
        parse_type_expression(text).unwrap()
    }

    #[test]
    fn test_primitives_match_exactly() {
        assert!(validate(&RawNode::string("x"), &TypeDescriptor::String).is_ok());
        assert!(validate(&RawNode::integer(1), &TypeDescriptor::Number).is_ok());
        assert!(validate(&RawNode::bool(true), &TypeDescriptor::Bool).is_ok());

        let err = validate(&RawNode::string("42"), &TypeDescriptor::Number).unwrap_err();
        assert_eq!(
            err.kind,
            DiagnosticKind::TypeMismatch {
                expected: TypeDescriptor::Number,
                found: ShapeKind::String,
            }
        );
        assert!(err.path.is_root());
    }

    #[test]
    fn test_null_only_matches_any() {
        assert!(validate(&RawNode::null(), &TypeDescriptor::String).is_err());
        assert!(validate(&RawNode::null(), &schema("list(string)")).is_err());

        let typed = validate(&RawNode::null(), &TypeDescriptor::Dynamic).unwrap();
        assert!(typed.is_null());
    }

    #[test]
    fn test_any_accepts_and_infers() {
        let raw = RawNode::mapping([("region", RawNode::string("eu-west-1"))]);
        let typed = validate(&raw, &schema("map(any)")).unwrap();
        assert_eq!(typed.ty(), &schema("map(any)"));
        assert_eq!(typed.get("region").map(TypedValue::ty), Some(&TypeDescriptor::String));
    }

    #[test]
    fn test_list_element_path() {
        let raw = RawNode::sequence([
            RawNode::string("a"),
            RawNode::integer(2),
            RawNode::string("c"),
        ]);
        let err = validate(&raw, &schema("list(string)")).unwrap_err();
        assert_eq!(err.path, Path::root().index(1));
        assert_eq!(err.to_string(), "[1]: expected string, found number");
    }

    #[test]
    fn test_map_requires_mapping() {
        let raw = RawNode::sequence([RawNode::string("a")]);
        let err = validate(&raw, &schema("map(string)")).unwrap_err();
        assert_eq!(
            err.kind,
            DiagnosticKind::TypeMismatch {
                expected: schema("map(string)"),
                found: ShapeKind::Sequence,
            }
        );
    }

    #[test]
    fn test_object_output_follows_declaration_order() {
        let raw = RawNode::mapping([
            ("port", RawNode::integer(80)),
            ("name", RawNode::string("web")),
        ]);
        let typed = validate(&raw, &schema("object({name=string,port=number})")).unwrap();
        let keys: Vec<_> = typed.to_json().as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "port"]);
    }

    #[test]
    fn test_unknown_attribute_reported_before_missing() {
        let raw = RawNode::mapping([("extra", RawNode::bool(true))]);
        let err = validate(&raw, &schema("object({name=string})")).unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnknownAttribute { name: "extra".into() });
        assert_eq!(err.path.to_string(), "extra");
    }

    #[test]
    fn test_optional_attribute_may_be_absent() {
        let ty = schema("object({name=string,size=optional(number)})");
        let typed = validate(&RawNode::mapping([("name", RawNode::string("db"))]), &ty).unwrap();
        assert_eq!(typed.len(), Some(1));
        assert!(typed.get("size").is_none());

        let raw = RawNode::mapping([("name", RawNode::string("db")), ("size", RawNode::string("big"))]);
        let err = validate(&raw, &ty).unwrap_err();
        assert_eq!(err.path.to_string(), "size");
    }

    #[test]
    fn test_missing_attribute_uses_object_source() {
        let raw = RawNode::mapping::<&str>([]).with_source(SourceLocation::new(3, 1).with_file("vars.tf"));
        let err = validate(&raw, &schema("object({ami=string})")).unwrap_err();
        assert_eq!(err.source, Some(SourceLocation::new(3, 1).with_file("vars.tf")));
        assert_eq!(
            err.to_string(),
            "ami: missing required attribute \"ami\" (at vars.tf, line 3, column 1)"
        );
    }

    #[test]
    fn test_aggregate_collects_everything() {
        let raw = RawNode::mapping([
            ("name", RawNode::integer(1)),
            ("tags", RawNode::sequence([RawNode::bool(true), RawNode::string("ok"), RawNode::null()])),
            ("bogus", RawNode::null()),
        ]);
        let ty = schema("object({name=string,tags=list(string),zone=string})");
        let all = validate_all(&raw, &ty).unwrap_err();

        let paths: Vec<_> = all.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, vec!["bogus", "name", "tags[0]", "tags[2]", "zone"]);
    }

    #[test]
    fn test_aggregate_respects_max_errors() {
        let raw = RawNode::sequence((0..10).map(RawNode::integer));
        let options = ValidationOptions {
            mode: ValidationMode::Aggregate,
            max_errors: 3,
            ..ValidationOptions::default()
        };
        let all = validate_with(&raw, &schema("list(string)"), &options).unwrap_err();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_fail_fast_reports_single_diagnostic() {
        let raw = RawNode::sequence([RawNode::integer(1), RawNode::integer(2)]);
        let all = validate_with(&raw, &schema("list(string)"), &ValidationOptions::default())
            .unwrap_err();
        assert_eq!(all.len(), 1);
        assert_eq!(all.first().unwrap().path, Path::root().index(0));
    }

    #[test]
    fn test_any_accepts_arbitrarily_deep_data() {
        let mut raw = RawNode::bool(true);
        for _ in 0..100_000 {
            raw = RawNode::sequence([raw]);
        }
        let typed = validate(&raw, &TypeDescriptor::Dynamic).unwrap();
        assert_eq!(typed.ty().depth(), 100_001);

        let wrapped = RawNode::mapping([("payload", raw)]);
        let typed = validate(&wrapped, &schema("object({payload=any})")).unwrap();
        assert_eq!(typed.get("payload").map(|v| v.ty().depth()), Some(100_001));
    }

    #[test]
    fn test_depth_limit_is_unsupported() {
        let mut raw = RawNode::string("leaf");
        let mut ty = TypeDescriptor::String;
        for _ in 0..10 {
            raw = RawNode::sequence([raw]);
            ty = TypeDescriptor::list(ty);
        }
        let options = ValidationOptions {
            max_depth: 4,
            ..ValidationOptions::default()
        };
        let all = validate_with(&raw, &ty, &options).unwrap_err();
        let diag = all.first().unwrap();
        assert_eq!(diag.kind.code(), "unsupported_raw_node");
        assert_eq!(diag.path.to_string(), "[0][0][0][0]");
    }
}
