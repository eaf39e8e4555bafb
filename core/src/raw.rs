//! Untyped configuration data as produced by an external parser.
//!
//! A [`RawNode`] is a closed sum of the shapes a configuration document can
//! contain, optionally tagged with the source location it was read from.
//! Mapping keys are always strings and keep their insertion order.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Position of a node in its source document.
///
/// # Examples
///
/// ```
/// use hcl_types_core::SourceLocation;
///
/// let loc = SourceLocation::new(12, 5).with_file("main.tf");
/// assert_eq!(loc.to_string(), "main.tf, line 12, column 5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the node was read from, if it came from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Attaches a file name.
    pub fn with_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}, ")?;
        }
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A numeric literal, kept exactly as parsed.
///
/// Integers that fit 64 bits stay integers, and fractional literals that a
/// float holds exactly are floats. Anything else keeps its literal text in
/// [`Number::Decimal`], so no digits are lost on the way through.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Signed integer literal.
    Int(i64),
    /// Integer literal above `i64::MAX`.
    UInt(u64),
    /// Fractional literal.
    Float(f64),
    /// Literal text of a number wider or more precise than the other
    /// variants, such as `100000000000000000001` or `0.1000000000000000000001`.
    Decimal(String),
}

impl Number {
    pub fn is_integer(&self) -> bool {
        match self {
            Self::Int(_) | Self::UInt(_) => true,
            Self::Float(_) => false,
            Self::Decimal(text) => !text.contains(['.', 'e', 'E']),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::UInt(n) => i64::try_from(*n).ok(),
            Self::Float(_) => None,
            Self::Decimal(text) => text.parse().ok(),
        }
    }

    /// Lossy view as a float.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::UInt(n) => *n as f64,
            Self::Float(n) => *n,
            Self::Decimal(text) => text.parse().unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Decimal(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Self::Int(n),
            Err(_) => Self::UInt(n),
        }
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            return Self::Int(i);
        }
        if let Some(u) = n.as_u64() {
            return Self::UInt(u);
        }
        // serde_json keeps the literal text, so a float is used only when it
        // renders back to exactly that text
        let text = n.to_string();
        match n.as_f64() {
            Some(float)
                if serde_json::Number::from_f64(float)
                    .is_some_and(|exact| exact.to_string() == text) =>
            {
                Self::Float(float)
            }
            _ => Self::Decimal(text),
        }
    }
}

impl From<&Number> for serde_json::Value {
    fn from(n: &Number) -> Self {
        match n {
            Number::Int(i) => serde_json::Value::from(*i),
            Number::UInt(u) => serde_json::Value::from(*u),
            Number::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Number::Decimal(text) => serde_json::from_str::<serde_json::Number>(text)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|_| serde_json::Value::String(text.clone())),
        }
    }
}

impl From<Number> for serde_json::Value {
    fn from(n: Number) -> Self {
        serde_json::Value::from(&n)
    }
}

/// Coarse shape of a raw node, used when reporting what was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // named after the type inference would give the node
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "list",
            Self::Mapping => "object",
        })
    }
}

/// Payload of a [`RawNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawKind {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<RawNode>),
    Mapping(IndexMap<String, RawNode>),
}

/// An untyped unit of parsed configuration data.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{RawNode, ShapeKind, SourceLocation};
///
/// let node = RawNode::mapping([
///     ("name", RawNode::string("webapp")),
///     ("port", RawNode::integer(8080)),
/// ])
/// .with_source(SourceLocation::new(1, 1).with_file("main.tf"));
///
/// assert_eq!(node.shape(), ShapeKind::Mapping);
/// assert_eq!(node.source().unwrap().line, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    kind: RawKind,
    source: Option<SourceLocation>,
}

impl RawNode {
    pub fn new(kind: RawKind) -> Self {
        Self { kind, source: None }
    }

    pub fn null() -> Self {
        Self::new(RawKind::Null)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(RawKind::Bool(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(RawKind::Number(Number::Int(value)))
    }

    pub fn float(value: f64) -> Self {
        Self::new(RawKind::Number(Number::Float(value)))
    }

    pub fn number(value: Number) -> Self {
        Self::new(RawKind::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(RawKind::String(value.into()))
    }

    pub fn sequence(items: impl IntoIterator<Item = RawNode>) -> Self {
        Self::new(RawKind::Sequence(items.into_iter().collect()))
    }

    /// Builds a mapping; a repeated key keeps its first position and last value.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, RawNode)>) -> Self {
        Self::new(RawKind::Mapping(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Attaches the position this node was read from.
    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> &RawKind {
        &self.kind
    }

    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    pub fn shape(&self) -> ShapeKind {
        match &self.kind {
            RawKind::Null => ShapeKind::Null,
            RawKind::Bool(_) => ShapeKind::Bool,
            RawKind::Number(_) => ShapeKind::Number,
            RawKind::String(_) => ShapeKind::String,
            RawKind::Sequence(_) => ShapeKind::Sequence,
            RawKind::Mapping(_) => ShapeKind::Mapping,
        }
    }

    /// Number of nested levels below and including this node.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            max = max.max(level);
            match &node.kind {
                RawKind::Sequence(items) => stack.extend(items.iter().map(|n| (n, level + 1))),
                RawKind::Mapping(entries) => {
                    stack.extend(entries.values().map(|n| (n, level + 1)))
                }
                _ => {}
            }
        }
        max
    }
}

impl RawKind {
    /// Moves child nodes into `pending`, leaving this collection empty.
    fn detach_children(&mut self, pending: &mut Vec<RawNode>) {
        match self {
            Self::Sequence(items) => pending.append(items),
            Self::Mapping(entries) => pending.extend(entries.drain(..).map(|(_, node)| node)),
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => {}
        }
    }
}

// Releases children from a heap stack instead of recursing.
impl Drop for RawNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.kind.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.kind.detach_children(&mut pending);
        }
    }
}

impl From<serde_json::Value> for RawNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::null(),
            Value::Bool(b) => Self::bool(b),
            Value::Number(n) => Self::number(Number::from(&n)),
            Value::String(s) => Self::string(s),
            Value::Array(items) => Self::sequence(items.into_iter().map(RawNode::from)),
            Value::Object(map) => Self::mapping(map.into_iter().map(|(k, v)| (k, RawNode::from(v)))),
        }
    }
}
