//! Error types for conversion.
//!
//! Covers the three ways a conversion can fail: a malformed type expression,
//! data that does not fit the schema, and input that has no raw-tree
//! equivalent. Configuration (de)serialization errors share the same type.

use hcl_types_core::{Diagnostic, Diagnostics, TypeExprError};
use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The type expression could not be parsed.
    #[error("invalid type expression: {0}")]
    TypeExpression(#[from] TypeExprError),

    /// The data does not conform to the schema. Holds one diagnostic in
    /// fail-fast mode, or every diagnostic found in aggregate mode.
    #[error("schema validation failed: {0}")]
    Validation(#[from] Diagnostics),

    /// An adapter met a value it cannot express as a raw node.
    #[error("unsupported input: {0}")]
    UnsupportedInput(Diagnostic),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConvertError {
    /// Diagnostics carried by this error, in discovery order.
    ///
    /// Empty for errors that are not tied to a position in the data.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        match self {
            Self::Validation(all) => all.iter().collect(),
            Self::UnsupportedInput(diagnostic) => vec![diagnostic],
            Self::TypeExpression(_) | Self::Yaml(_) => Vec::new(),
        }
    }
}

/// Convenience alias for results with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;
