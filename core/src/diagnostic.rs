//! Path-qualified, optionally source-located conversion errors.
//!
//! A [`Diagnostic`] is returned by value whenever raw data does not fit a
//! schema. Its `Display` form is a single line suitable for showing to a
//! user:
//!
//! ```text
//! config.timeout: expected number, found string (at main.tf, line 4, column 13)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::raw::{ShapeKind, SourceLocation};
use crate::types::TypeDescriptor;

/// One step in a path from the root of a raw tree.
///
/// Serialized externally tagged (`{"name": "tags"}`, `{"index": 2}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Object attribute or map key.
    Name(String),
    /// Sequence position.
    Index(usize),
}

/// Location of a node inside a raw tree, as a sequence of names and indexes.
///
/// # Examples
///
/// ```
/// use hcl_types_core::Path;
///
/// let path = Path::root().child("servers").index(2).child("port");
/// assert_eq!(path.to_string(), "servers[2].port");
/// assert_eq!(Path::root().to_string(), "<root>");
/// assert_eq!(Path::root().child("tags").child("team name").to_string(), "tags[\"team name\"]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by a name.
    pub fn child(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.push(PathSegment::Name(name.to_string()));
        path
    }

    /// Returns this path extended by an index.
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(PathSegment::Index(index));
        path
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Removes and returns the last segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Segments from the root outwards.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`is_root`](Self::is_root).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Name(name) if is_plain_name(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Name(name) => write!(f, "[{name:?}]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// What went wrong at a diagnostic's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The raw node's shape does not fit the declared type.
    TypeMismatch {
        expected: TypeDescriptor,
        found: ShapeKind,
    },
    /// A required object attribute is absent.
    MissingAttribute { name: String },
    /// An attribute is present in the data but not declared by the schema.
    UnknownAttribute { name: String },
    /// The raw tree cannot be processed (too deep, or no raw equivalent).
    UnsupportedRawNode { reason: String },
}

impl DiagnosticKind {
    /// Stable identifier for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::MissingAttribute { .. } => "missing_attribute",
            Self::UnknownAttribute { .. } => "unknown_attribute",
            Self::UnsupportedRawNode { .. } => "unsupported_raw_node",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::TypeMismatch { expected, found } => {
                format!("expected {expected}, found {found}")
            }
            Self::MissingAttribute { name } => format!("missing required attribute {name:?}"),
            Self::UnknownAttribute { name } => format!("unsupported attribute {name:?}"),
            Self::UnsupportedRawNode { reason } => format!("unsupported raw node: {reason}"),
        }
    }
}

/// A single conversion error.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{Diagnostic, Path, ShapeKind, SourceLocation, TypeDescriptor};
///
/// let diag = Diagnostic::type_mismatch(
///     TypeDescriptor::Number,
///     ShapeKind::String,
///     Path::root().child("port"),
///     Some(SourceLocation::new(1, 8).with_file("main.tf")),
/// );
/// assert_eq!(
///     diag.to_string(),
///     "port: expected number, found string (at main.tf, line 1, column 8)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: Path, source: Option<SourceLocation>) -> Self {
        Self {
            message: kind.message(),
            kind,
            path,
            source,
        }
    }

    pub fn type_mismatch(
        expected: TypeDescriptor,
        found: ShapeKind,
        path: Path,
        source: Option<SourceLocation>,
    ) -> Self {
        Self::new(DiagnosticKind::TypeMismatch { expected, found }, path, source)
    }

    pub fn missing_attribute(name: &str, path: Path, source: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticKind::MissingAttribute {
                name: name.to_string(),
            },
            path,
            source,
        )
    }

    pub fn unknown_attribute(name: &str, path: Path, source: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticKind::UnknownAttribute {
                name: name.to_string(),
            },
            path,
            source,
        )
    }

    pub fn unsupported(reason: &str, path: Path, source: Option<SourceLocation>) -> Self {
        Self::new(
            DiagnosticKind::UnsupportedRawNode {
                reason: reason.to_string(),
            },
            path,
            source,
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (at {source})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Several diagnostics from one aggregate-mode run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
