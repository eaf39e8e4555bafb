//! Conversion settings.
//!
//! Every field has a default, so a configuration file only needs the keys it
//! changes.
//!
//! # Example YAML
//!
//! ```yaml
//! type_expression:
//!   max_depth: 64
//! validation:
//!   mode: aggregate
//!   max_depth: 256
//!   max_errors: 100
//! ```

use hcl_types_core::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default ceiling on raw-tree nesting during validation.
pub const DEFAULT_MAX_VALIDATION_DEPTH: usize = 256;

/// Default cap on diagnostics collected in aggregate mode.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// How validation reacts to the first problem it finds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop and report the first diagnostic.
    #[default]
    FailFast,
    /// Keep walking and report every diagnostic, up to `max_errors`.
    Aggregate,
}

/// Settings for schema validation.
///
/// # Examples
///
/// ```
/// # use hcl_types_convert::{ValidationMode, ValidationOptions};
/// let options = ValidationOptions {
///     mode: ValidationMode::Aggregate,
///     ..ValidationOptions::default()
/// };
/// assert_eq!(options.max_depth, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub mode: ValidationMode,
    /// Deepest raw-tree level checked against the schema; deeper data is
    /// reported as unsupported.
    pub max_depth: usize,
    /// Aggregate mode stops after this many diagnostics (0 = no cap).
    pub max_errors: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::FailFast,
            max_depth: DEFAULT_MAX_VALIDATION_DEPTH,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

/// Top-level conversion configuration.
///
/// # Examples
///
/// ```
/// use hcl_types_convert::{ConvertConfig, ValidationMode};
///
/// let config = ConvertConfig::from_yaml_str("validation:\n  mode: aggregate\n").unwrap();
/// assert_eq!(config.validation.mode, ValidationMode::Aggregate);
/// assert_eq!(config.type_expression.max_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Limits for parsing type expressions.
    pub type_expression: ParseOptions,
    /// Validation behavior.
    pub validation: ValidationOptions,
}

impl ConvertConfig {
    /// Reads configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](crate::ConvertError::Yaml) if the text is not valid
    /// YAML or does not match the configuration shape.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config = serde_yaml::from_str(text)?;
        Ok(config)
    }

    /// Renders the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](crate::ConvertError::Yaml) if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        let text = serde_yaml::to_string(self)?;
        Ok(text)
    }
}
