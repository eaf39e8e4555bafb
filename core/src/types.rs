//! Type descriptor definitions.
//!
//! This module defines the closed set of type shapes that configuration data
//! can be validated against or inferred into. Descriptors are immutable once
//! built and compare structurally: two descriptors are equal when they have
//! the same variant and recursively equal children. Object attribute order
//! is not significant for equality.
//!
//! The [`Display`](std::fmt::Display) impl renders the canonical type
//! expression, the inverse of [`parse_type_expression`](crate::parse_type_expression).
//!
//! Children sit behind [`Arc`], so cloning a descriptor is constant time and
//! inferred types share structure with the values they were built from.
//! Equality, [`TypeDescriptor::depth`] and dropping walk the tree with an
//! explicit stack, so arbitrarily deep descriptors are safe to handle.

use std::fmt;
use std::mem;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::typexpr::{TypeExprError, parse_type_expression};

/// A closed description of an allowed value shape.
///
/// Serializes to and from its canonical type expression, so a descriptor
/// embedded in JSON or YAML reads as `"list(string)"`.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{ObjectType, TypeDescriptor};
///
/// let ty = TypeDescriptor::object(
///     ObjectType::new()
///         .with_attribute("name", TypeDescriptor::String)
///         .with_attribute("ports", TypeDescriptor::list(TypeDescriptor::Number)),
/// );
/// assert_eq!(ty.to_string(), "object({name=string,ports=list(number)})");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TypeDescriptor {
    /// UTF-8 text.
    String,
    /// Any numeric literal, integer or fractional.
    Number,
    /// `true` or `false`.
    Bool,
    /// Matches anything; the concrete shape is inferred from the data.
    Dynamic,
    /// Ordered sequence of a single element type.
    List(Arc<TypeDescriptor>),
    /// String-keyed mapping of a single element type.
    Map(Arc<TypeDescriptor>),
    /// Closed set of named attributes.
    Object(Arc<ObjectType>),
}

impl TypeDescriptor {
    /// Creates `list(element)`.
    pub fn list(element: TypeDescriptor) -> Self {
        Self::List(Arc::new(element))
    }

    /// Creates `map(element)`.
    pub fn map(element: TypeDescriptor) -> Self {
        Self::Map(Arc::new(element))
    }

    /// Creates `object({...})` from the given attribute set.
    pub fn object(attributes: ObjectType) -> Self {
        Self::Object(Arc::new(attributes))
    }

    /// Returns the keyword naming this variant (`"string"`, `"list"`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use hcl_types_core::TypeDescriptor;
    ///
    /// assert_eq!(TypeDescriptor::Dynamic.kind_name(), "any");
    /// assert_eq!(TypeDescriptor::map(TypeDescriptor::Bool).kind_name(), "map");
    /// ```
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Dynamic => "any",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Returns `true` for `string`, `number`, `bool` and `any`.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::Bool | Self::Dynamic
        )
    }

    /// Returns the element type of a list or map.
    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::List(element) | Self::Map(element) => Some(&**element),
            _ => None,
        }
    }

    /// Returns the attribute set of an object type.
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(object) => Some(&**object),
            _ => None,
        }
    }

    /// Nesting depth of this descriptor; primitives have depth 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use hcl_types_core::TypeDescriptor;
    ///
    /// assert_eq!(TypeDescriptor::String.depth(), 1);
    /// assert_eq!(TypeDescriptor::list(TypeDescriptor::list(TypeDescriptor::Bool)).depth(), 3);
    /// ```
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1usize)];
        while let Some((ty, level)) = pending.pop() {
            deepest = deepest.max(level);
            match ty {
                Self::List(element) | Self::Map(element) => pending.push((&**element, level + 1)),
                Self::Object(object) => {
                    pending.extend(object.attributes.values().map(|attr| (&attr.ty, level + 1)))
                }
                Self::String | Self::Number | Self::Bool | Self::Dynamic => {}
            }
        }
        deepest
    }

    /// Moves owned children into `pending`, leaving shared placeholders.
    ///
    /// Children still referenced elsewhere are only released here.
    fn detach_children(&mut self, pending: &mut Vec<TypeDescriptor>) {
        match self {
            Self::List(element) | Self::Map(element) => {
                let element = mem::replace(element, Arc::clone(placeholder_type()));
                pending.extend(Arc::into_inner(element));
            }
            Self::Object(object) => {
                let object = mem::replace(object, Arc::clone(placeholder_object()));
                if let Some(object) = Arc::into_inner(object) {
                    pending.extend(object.attributes.into_values().map(|attr| attr.ty));
                }
            }
            Self::String | Self::Number | Self::Bool | Self::Dynamic => {}
        }
    }
}

fn placeholder_type() -> &'static Arc<TypeDescriptor> {
    static PLACEHOLDER: OnceLock<Arc<TypeDescriptor>> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Arc::new(TypeDescriptor::Dynamic))
}

fn placeholder_object() -> &'static Arc<ObjectType> {
    static PLACEHOLDER: OnceLock<Arc<ObjectType>> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Arc::new(ObjectType::new()))
}

impl Drop for TypeDescriptor {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut ty) = pending.pop() {
            ty.detach_children(&mut pending);
        }
    }
}

/// Compares pairs off a work stack; subtrees shared by both sides are
/// skipped without being visited.
fn structurally_equal<'a>(mut pending: Vec<(&'a TypeDescriptor, &'a TypeDescriptor)>) -> bool {
    use TypeDescriptor as T;

    while let Some((a, b)) = pending.pop() {
        match (a, b) {
            (T::String, T::String)
            | (T::Number, T::Number)
            | (T::Bool, T::Bool)
            | (T::Dynamic, T::Dynamic) => {}
            (T::List(x), T::List(y)) | (T::Map(x), T::Map(y)) => {
                if !Arc::ptr_eq(x, y) {
                    pending.push((&**x, &**y));
                }
            }
            (T::Object(x), T::Object(y)) => {
                if !Arc::ptr_eq(x, y) && !x.pair_attributes(y, &mut pending) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(vec![(self, other)])
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String | Self::Number | Self::Bool | Self::Dynamic => {
                f.write_str(self.kind_name())
            }
            Self::List(element) => write!(f, "list({element})"),
            Self::Map(element) => write!(f, "map({element})"),
            Self::Object(object) => write!(f, "object({object})"),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = TypeExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_expression(s)
    }
}

impl From<TypeDescriptor> for String {
    fn from(ty: TypeDescriptor) -> Self {
        ty.to_string()
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = TypeExprError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_type_expression(&s)
    }
}

/// A declared object attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Type the attribute value must have.
    pub ty: TypeDescriptor,
    /// Whether the attribute may be absent from input data.
    pub optional: bool,
}

impl Attribute {
    /// Creates a required attribute.
    pub fn required(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    /// Creates an optional attribute.
    pub fn optional(ty: TypeDescriptor) -> Self {
        Self { ty, optional: true }
    }
}

/// Ordered attribute set of an object type.
///
/// Attributes keep their declaration order for rendering and iteration;
/// equality ignores that order.
///
/// # Examples
///
/// ```
/// use hcl_types_core::{ObjectType, TypeDescriptor};
///
/// let a = ObjectType::new()
///     .with_attribute("ami", TypeDescriptor::String)
///     .with_optional_attribute("count", TypeDescriptor::Number);
/// let b = ObjectType::new()
///     .with_optional_attribute("count", TypeDescriptor::Number)
///     .with_attribute("ami", TypeDescriptor::String);
///
/// assert_eq!(a, b);
/// assert_eq!(a.names().collect::<Vec<_>>(), vec!["ami", "count"]);
/// assert!(a.get("count").unwrap().optional);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    attributes: IndexMap<String, Attribute>,
}

impl ObjectType {
    /// Creates an object type with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required attribute, replacing any previous declaration.
    pub fn with_attribute(mut self, name: &str, ty: TypeDescriptor) -> Self {
        self.insert(name.to_string(), Attribute::required(ty));
        self
    }

    /// Adds an optional attribute, replacing any previous declaration.
    pub fn with_optional_attribute(mut self, name: &str, ty: TypeDescriptor) -> Self {
        self.insert(name.to_string(), Attribute::optional(ty));
        self
    }

    /// Inserts an attribute, returning the declaration it replaced.
    pub fn insert(&mut self, name: String, attribute: Attribute) -> Option<Attribute> {
        self.attributes.insert(name, attribute)
    }

    /// Looks up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Returns `true` if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterates attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates attribute names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` for `object({})`.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Matches attributes by name and optionality, queueing their types for
    /// comparison. Returns `false` as soon as the attribute sets differ.
    fn pair_attributes<'a>(
        &'a self,
        other: &'a Self,
        pending: &mut Vec<(&'a TypeDescriptor, &'a TypeDescriptor)>,
    ) -> bool {
        if self.attributes.len() != other.attributes.len() {
            return false;
        }
        for (name, attr) in &self.attributes {
            match other.attributes.get(name) {
                Some(theirs) if theirs.optional == attr.optional => {
                    pending.push((&attr.ty, &theirs.ty))
                }
                _ => return false,
            }
        }
        true
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = Vec::new();
        self.pair_attributes(other, &mut pending) && structurally_equal(pending)
    }
}

impl Eq for ObjectType {}

impl FromIterator<(String, Attribute)> for ObjectType {
    fn from_iter<I: IntoIterator<Item = (String, Attribute)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, attr)) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if attr.optional {
                write!(f, "{name}=optional({})", attr.ty)?;
            } else {
                write!(f, "{name}={}", attr.ty)?;
            }
        }
        f.write_str("}")
    }
}
