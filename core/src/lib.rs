//! Core types for typing HCL-style configuration data.
//!
//! This crate defines the data model shared by inference and validation:
//!
//! - [`TypeDescriptor`]: closed set of type shapes (`string`, `number`,
//!   `bool`, `any`, `list(T)`, `map(T)`, `object({...})`).
//! - [`RawNode`]: untyped data handed over by an external configuration
//!   parser, optionally tagged with a [`SourceLocation`].
//! - [`TypedValue`]: data paired with the descriptor it conforms to.
//! - [`Diagnostic`]: a path-qualified conversion error.
//!
//! Type expressions ([`parse_type_expression`]) turn text such as
//! `map(object({name=string}))` into descriptors, and a descriptor's
//! `Display` impl renders it back.
//!
//! # Example
//!
//! ```
//! use hcl_types_core::*;
//!
//! let ty = parse_type_expression("object({ region = string, zones = list(string) })").unwrap();
//! let object = ty.as_object().unwrap();
//! assert_eq!(object.get("zones").unwrap().ty, TypeDescriptor::list(TypeDescriptor::String));
//!
//! // Rendering is the inverse of parsing
//! assert_eq!(parse_type_expression(&ty.to_string()).unwrap(), ty);
//! ```

mod diagnostic;
mod raw;
mod types;
mod typexpr;
mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Path, PathSegment};
pub use raw::{Number, RawKind, RawNode, ShapeKind, SourceLocation};
pub use types::{Attribute, ObjectType, TypeDescriptor};
pub use typexpr::{
    DEFAULT_MAX_TYPE_DEPTH, ParseOptions, TypeExprError, TypeExprErrorKind,
    parse_type_expression, parse_type_expression_with,
};
pub use value::{TypedValue, Value};
