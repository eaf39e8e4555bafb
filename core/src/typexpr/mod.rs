//! Type expression parsing.
//!
//! Parses the textual type syntax used in HCL variable declarations into a
//! [`TypeDescriptor`]:
//!
//! ```text
//! type        := "string" | "number" | "bool" | "any"
//!              | "list" "(" type ")"
//!              | "map" "(" type ")"
//!              | "object" "(" "{" [attr ("," attr)* [","]] "}" ")"
//! attr        := identifier "=" (type | "optional" "(" type ")")
//! identifier  := letter (letter | digit | "_")*
//! ```
//!
//! Keywords are case-insensitive. Whitespace between tokens is ignored.
//! Nesting is bounded by [`ParseOptions::max_depth`]; deeper input fails
//! with [`TypeExprErrorKind::NestingTooDeep`] instead of exhausting the
//! stack. Error offsets count characters, not bytes.

mod lexer;
mod parser;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TypeDescriptor;

use lexer::TypeExprLexer;
use parser::TypeExprParser;

/// Default nesting ceiling for type expressions.
pub const DEFAULT_MAX_TYPE_DEPTH: usize = 64;

/// Limits applied while parsing a type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum number of nested type constructors.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_TYPE_DEPTH,
        }
    }
}

/// Specific reason a type expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeExprErrorKind {
    /// Input was empty or whitespace-only.
    #[error("type expression is empty")]
    Empty,
    /// Identifier in type position is not a known type keyword.
    #[error("unknown type `{0}`")]
    UnknownType(String),
    /// Character that cannot start any token.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    /// Input ended where a type was required.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// Some other token was found where a specific one was required.
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
    },
    /// An opening delimiter was never closed.
    #[error("unclosed `{0}`")]
    UnclosedDelimiter(char),
    /// A closing delimiter has no matching opener.
    #[error("unmatched `{0}`")]
    UnmatchedDelimiter(char),
    /// `name=` with nothing after the `=`.
    #[error("attribute `{0}` has no type")]
    MissingAttributeType(String),
    /// A type or `=` where an attribute name was required.
    #[error("attribute has no name")]
    MissingAttributeName,
    /// Two commas with nothing between them, or a leading comma.
    #[error("empty attribute")]
    EmptyAttribute,
    /// The same attribute name declared twice in one object.
    #[error("duplicate attribute `{0}`")]
    DuplicateAttribute(String),
    /// `optional(...)` outside an object attribute's type position.
    #[error("`optional` is only allowed as an object attribute type")]
    MisplacedOptional,
    /// Characters after a complete expression.
    #[error("unexpected input after type expression")]
    TrailingInput,
    /// Nesting exceeded the configured ceiling.
    #[error("type expression nesting exceeds limit of {limit}")]
    NestingTooDeep { limit: usize },
}

/// A malformed type expression, with the character offset of the problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct TypeExprError {
    pub kind: TypeExprErrorKind,
    pub offset: usize,
}

impl TypeExprError {
    pub fn new(kind: TypeExprErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Parses a type expression with default limits.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{TypeDescriptor, TypeExprErrorKind, parse_type_expression};
///
/// let ty = parse_type_expression("list(string)").unwrap();
/// assert_eq!(ty, TypeDescriptor::list(TypeDescriptor::String));
///
/// let err = parse_type_expression("object({name=}").unwrap_err();
/// assert_eq!(err.kind, TypeExprErrorKind::MissingAttributeType("name".into()));
/// ```
pub fn parse_type_expression(text: &str) -> Result<TypeDescriptor, TypeExprError> {
    parse_type_expression_with(text, &ParseOptions::default())
}

/// Parses a type expression with explicit limits.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{ParseOptions, TypeExprErrorKind, parse_type_expression_with};
///
/// let options = ParseOptions { max_depth: 2 };
/// assert!(parse_type_expression_with("list(string)", &options).is_ok());
///
/// let err = parse_type_expression_with("list(list(string))", &options).unwrap_err();
/// assert_eq!(err.kind, TypeExprErrorKind::NestingTooDeep { limit: 2 });
/// ```
pub fn parse_type_expression_with(
    text: &str,
    options: &ParseOptions,
) -> Result<TypeDescriptor, TypeExprError> {
    let tokens = TypeExprLexer::tokenize(text)?;
    TypeExprParser::new(tokens, options).parse()
}
