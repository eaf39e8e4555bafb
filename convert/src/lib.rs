//! Typing of HCL-style configuration data.
//!
//! Takes a [`RawNode`] tree handed over by an external configuration parser
//! and turns it into a [`TypedValue`], either by checking it against a
//! declared schema or, when no schema is given, by inferring one from the
//! data's structure.
//!
//! # Quick start
//!
//! ```
//! use hcl_types_convert::{convert, convert_with_type_expression};
//! use hcl_types_core::{RawNode, TypeDescriptor};
//!
//! let raw = RawNode::mapping([
//!     ("name", RawNode::string("webapp")),
//!     ("ports", RawNode::sequence([RawNode::integer(80), RawNode::integer(443)])),
//! ]);
//!
//! // No schema: infer one
//! let typed = convert(&raw, None).unwrap();
//! assert_eq!(typed.ty().to_string(), "object({name=string,ports=list(number)})");
//!
//! // Declared schema: validate strictly
//! let typed = convert_with_type_expression(&raw, "object({name=string, ports=list(number)})").unwrap();
//! assert_eq!(typed.get("ports").map(|p| p.ty()), Some(&TypeDescriptor::list(TypeDescriptor::Number)));
//!
//! let err = convert_with_type_expression(&raw, "object({name=string})").unwrap_err();
//! assert_eq!(err.to_string(), "schema validation failed: ports: unsupported attribute \"ports\"");
//! ```
//!
//! Use [`Converter`] to apply a [`ConvertConfig`], for example to collect
//! every diagnostic instead of stopping at the first one.

mod config;
mod error;
mod infer;
mod validate;
mod yaml;

use hcl_types_core::{RawNode, TypeDescriptor, TypedValue, parse_type_expression_with};
use tracing::debug;

pub use config::{
    ConvertConfig, DEFAULT_MAX_ERRORS, DEFAULT_MAX_VALIDATION_DEPTH, ValidationMode,
    ValidationOptions,
};
pub use error::{ConvertError, Result};
pub use infer::infer;
pub use validate::{validate, validate_all, validate_with};
pub use yaml::{raw_from_yaml, raw_from_yaml_str};

#[cfg(doctest)]
#[doc = include_str!("../../README.md")]
struct ReadmeDoctests;

/// Converts raw data with default settings.
///
/// With a schema the data is validated fail-fast; without one its type is
/// inferred and conversion cannot fail.
///
/// # Errors
///
/// Returns [`Validation`](ConvertError::Validation) holding the first
/// diagnostic if the data does not fit `schema`.
pub fn convert(raw: &RawNode, schema: Option<&TypeDescriptor>) -> Result<TypedValue> {
    Converter::default().convert(raw, schema)
}

/// Parses `type_expression` and validates `raw` against it.
///
/// # Errors
///
/// Returns [`TypeExpression`](ConvertError::TypeExpression) for a malformed
/// expression, or [`Validation`](ConvertError::Validation) if the data does
/// not fit.
pub fn convert_with_type_expression(raw: &RawNode, type_expression: &str) -> Result<TypedValue> {
    Converter::default().convert_with_type_expression(raw, type_expression)
}

/// Conversion entry point bound to a [`ConvertConfig`].
///
/// # Examples
///
/// ```
/// use hcl_types_convert::{ConvertConfig, Converter, ValidationMode};
/// use hcl_types_core::RawNode;
///
/// let mut config = ConvertConfig::default();
/// config.validation.mode = ValidationMode::Aggregate;
/// let converter = Converter::new(config);
///
/// let raw = RawNode::sequence([RawNode::integer(1), RawNode::bool(true)]);
/// let err = converter.convert_with_type_expression(&raw, "list(string)").unwrap_err();
/// assert_eq!(err.diagnostics().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Parses a type expression under the configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`TypeExpression`](ConvertError::TypeExpression) if the text is
    /// malformed or nests too deeply.
    pub fn parse_type(&self, type_expression: &str) -> Result<TypeDescriptor> {
        let ty = parse_type_expression_with(type_expression, &self.config.type_expression)
            .inspect_err(|err| debug!(%err, type_expression, "Rejected type expression"))?;
        Ok(ty)
    }

    /// Validates `raw` against `schema`, or infers its type when `schema`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Validation`](ConvertError::Validation) if the data does not
    /// fit `schema`.
    pub fn convert(&self, raw: &RawNode, schema: Option<&TypeDescriptor>) -> Result<TypedValue> {
        let Some(schema) = schema else {
            let typed = infer(raw);
            debug!(ty = %typed.ty(), "Inferred type from raw data");
            return Ok(typed);
        };
        let typed = validate_with(raw, schema, &self.config.validation)?;
        Ok(typed)
    }

    /// Parses `type_expression` and validates `raw` against it.
    ///
    /// # Errors
    ///
    /// Returns [`TypeExpression`](ConvertError::TypeExpression) or
    /// [`Validation`](ConvertError::Validation).
    pub fn convert_with_type_expression(
        &self,
        raw: &RawNode,
        type_expression: &str,
    ) -> Result<TypedValue> {
        let schema = self.parse_type(type_expression)?;
        self.convert(raw, Some(&schema))
    }
}
