//! Typed values produced by inference and validation.

use std::mem;

use indexmap::IndexMap;

use crate::raw::Number;
use crate::types::TypeDescriptor;

/// Payload of a [`TypedValue`], shaped to match its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Only carried by `any` values inferred from null input.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<TypedValue>),
    Map(IndexMap<String, TypedValue>),
    Object(IndexMap<String, TypedValue>),
}

/// A value paired with the type descriptor it was validated or inferred
/// against.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{TypeDescriptor, TypedValue, Value};
///
/// let v = TypedValue::new(TypeDescriptor::String, Value::String("eu-west-1".into()));
/// assert_eq!(v.ty(), &TypeDescriptor::String);
/// assert_eq!(v.as_str(), Some("eu-west-1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    ty: TypeDescriptor,
    value: Value,
}

impl TypedValue {
    /// Pairs a descriptor with a payload.
    ///
    /// The payload variant must correspond to the descriptor variant; a
    /// mismatch is a bug in the caller and trips a debug assertion.
    pub fn new(ty: TypeDescriptor, value: Value) -> Self {
        debug_assert!(
            shape_matches(&ty, &value),
            "payload does not match descriptor {ty}"
        );
        Self { ty, value }
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(mut self) -> (TypeDescriptor, Value) {
        let ty = mem::replace(&mut self.ty, TypeDescriptor::Dynamic);
        let value = mem::replace(&mut self.value, Value::Null);
        (ty, value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match &self.value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Looks up an object attribute or map entry.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        match &self.value {
            Value::Map(entries) | Value::Object(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Looks up a list element.
    pub fn index(&self, index: usize) -> Option<&TypedValue> {
        match &self.value {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Number of elements, entries or attributes; `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match &self.value {
            Value::List(items) => Some(items.len()),
            Value::Map(entries) | Value::Object(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Converts the payload back into plain JSON, dropping type information.
    ///
    /// Non-finite floats have no JSON form and become `null`. Decimal
    /// literals are written back digit for digit.
    ///
    /// # Examples
    ///
    /// ```
    /// use hcl_types_core::{Number, TypeDescriptor, TypedValue, Value};
    ///
    /// let v = TypedValue::new(
    ///     TypeDescriptor::list(TypeDescriptor::Number),
    ///     Value::List(vec![
    ///         TypedValue::new(TypeDescriptor::Number, Value::Number(Number::Int(1))),
    ///         TypedValue::new(TypeDescriptor::Number, Value::Number(Number::Float(2.5))),
    ///     ]),
    /// );
    /// assert_eq!(v.to_json(), serde_json::json!([1, 2.5]));
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        match &self.value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::from(n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(TypedValue::to_json).collect())
            }
            Value::Map(entries) | Value::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Moves child values into `pending`, leaving this collection empty.
    fn detach_children(&mut self, pending: &mut Vec<TypedValue>) {
        match self {
            Self::List(items) => pending.append(items),
            Self::Map(entries) | Self::Object(entries) => {
                pending.extend(entries.drain(..).map(|(_, value)| value))
            }
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => {}
        }
    }
}

impl Drop for TypedValue {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.value.detach_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.value.detach_children(&mut pending);
        }
    }
}

fn shape_matches(ty: &TypeDescriptor, value: &Value) -> bool {
    matches!(
        (ty, value),
        (TypeDescriptor::Dynamic, Value::Null)
            | (TypeDescriptor::Bool, Value::Bool(_))
            | (TypeDescriptor::Number, Value::Number(_))
            | (TypeDescriptor::String, Value::String(_))
            | (TypeDescriptor::List(_), Value::List(_))
            | (TypeDescriptor::Map(_), Value::Map(_))
            | (TypeDescriptor::Object(_), Value::Object(_))
    )
}
