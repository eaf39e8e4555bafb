//! Structural type inference for raw data with no declared schema.
//!
//! Inference never fails. Scalars map to their primitive type, mappings
//! become objects with one required attribute per key (in key order), and
//! sequences become lists. A sequence whose elements all infer to the same
//! type gets that element type; an empty or mixed sequence gets
//! `list(any)`. Null infers to `any`.
//!
//! The walk keeps its own frame stack on the heap instead of recursing.

use hcl_types_core::{
    Attribute, ObjectType, RawKind, RawNode, TypeDescriptor, TypedValue, Value,
};
use indexmap::IndexMap;

/// Infers the type of `raw` and pairs it with the data.
///
/// # Examples
///
/// ```
/// use hcl_types_convert::infer;
/// use hcl_types_core::{RawNode, TypeDescriptor};
///
/// let raw = RawNode::sequence([RawNode::integer(1), RawNode::string("two")]);
/// let typed = infer(&raw);
/// assert_eq!(typed.ty(), &TypeDescriptor::list(TypeDescriptor::Dynamic));
/// assert_eq!(typed.len(), Some(2));
/// ```
pub fn infer(raw: &RawNode) -> TypedValue {
    let mut current = match open(raw) {
        Ok(value) => return value,
        Err(frame) => frame,
    };
    let mut parents: Vec<Frame<'_>> = Vec::new();

    loop {
        match current.next_child() {
            Some(child) => match open(child) {
                Ok(value) => current.accept(value),
                Err(frame) => parents.push(std::mem::replace(&mut current, frame)),
            },
            None => {
                let value = current.finish();
                match parents.pop() {
                    Some(parent) => {
                        current = parent;
                        current.accept(value);
                    }
                    None => return value,
                }
            }
        }
    }
}

/// A collection whose children are still being inferred.
enum Frame<'a> {
    Sequence {
        items: &'a [RawNode],
        done: Vec<TypedValue>,
    },
    Mapping {
        entries: &'a IndexMap<String, RawNode>,
        done: Vec<TypedValue>,
    },
}

impl<'a> Frame<'a> {
    fn next_child(&self) -> Option<&'a RawNode> {
        match self {
            Self::Sequence { items, done } => items.get(done.len()),
            Self::Mapping { entries, done } => entries.get_index(done.len()).map(|(_, v)| v),
        }
    }

    fn accept(&mut self, value: TypedValue) {
        match self {
            Self::Sequence { done, .. } | Self::Mapping { done, .. } => done.push(value),
        }
    }

    fn finish(self) -> TypedValue {
        match self {
            Self::Sequence { done, .. } => {
                let element = common_type(&done);
                TypedValue::new(TypeDescriptor::list(element), Value::List(done))
            }
            Self::Mapping { entries, done } => {
                let mut object = ObjectType::new();
                let mut values = IndexMap::with_capacity(done.len());
                for (name, value) in entries.keys().zip(done) {
                    object.insert(name.clone(), Attribute::required(value.ty().clone()));
                    values.insert(name.clone(), value);
                }
                TypedValue::new(TypeDescriptor::object(object), Value::Object(values))
            }
        }
    }
}

/// Produces a finished value for scalars, or a frame for collections.
fn open(raw: &RawNode) -> Result<TypedValue, Frame<'_>> {
    let value = match raw.kind() {
        RawKind::Null => TypedValue::new(TypeDescriptor::Dynamic, Value::Null),
        RawKind::Bool(b) => TypedValue::new(TypeDescriptor::Bool, Value::Bool(*b)),
        RawKind::Number(n) => TypedValue::new(TypeDescriptor::Number, Value::Number(n.clone())),
        RawKind::String(s) => TypedValue::new(TypeDescriptor::String, Value::String(s.clone())),
        RawKind::Sequence(items) => {
            return Err(Frame::Sequence {
                items,
                done: Vec::with_capacity(items.len()),
            });
        }
        RawKind::Mapping(entries) => {
            return Err(Frame::Mapping {
                entries,
                done: Vec::with_capacity(entries.len()),
            });
        }
    };
    Ok(value)
}

/// Element type shared by every item, or `any` when items disagree.
fn common_type(items: &[TypedValue]) -> TypeDescriptor {
    let mut types = items.iter().map(TypedValue::ty);
    let Some(first) = types.next() else {
        return TypeDescriptor::Dynamic;
    };
    if types.all(|ty| ty == first) {
        first.clone()
    } else {
        TypeDescriptor::Dynamic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_types_core::Number;

    #[test]
    fn test_scalars() {
        assert_eq!(infer(&RawNode::string("x")).ty(), &TypeDescriptor::String);
        assert_eq!(infer(&RawNode::bool(true)).ty(), &TypeDescriptor::Bool);
        assert_eq!(infer(&RawNode::float(1.5)).ty(), &TypeDescriptor::Number);

        let null = infer(&RawNode::null());
        assert_eq!(null.ty(), &TypeDescriptor::Dynamic);
        assert!(null.is_null());
    }

    #[test]
    fn test_mapping_becomes_object_in_key_order() {
        let raw = RawNode::mapping([
            ("region", RawNode::string("us-east-1")),
            ("count", RawNode::integer(3)),
            ("tags", RawNode::sequence([RawNode::string("a"), RawNode::string("b")])),
        ]);
        let typed = infer(&raw);

        let expected = TypeDescriptor::object(
            ObjectType::new()
                .with_attribute("region", TypeDescriptor::String)
                .with_attribute("count", TypeDescriptor::Number)
                .with_attribute("tags", TypeDescriptor::list(TypeDescriptor::String)),
        );
        assert_eq!(typed.ty(), &expected);
        assert_eq!(typed.ty().to_string(), "object({region=string,count=number,tags=list(string)})");
        assert_eq!(typed.get("count").and_then(TypedValue::as_number), Some(&Number::Int(3)));
    }

    #[test]
    fn test_list_of_identical_objects() {
        let item = |name: &str, port: i64| {
            RawNode::mapping([("name", RawNode::string(name)), ("port", RawNode::integer(port))])
        };
        let typed = infer(&RawNode::sequence([item("a", 80), item("b", 443)]));
        assert_eq!(
            typed.ty().to_string(),
            "list(object({name=string,port=number}))"
        );
    }

    #[test]
    fn test_heterogeneous_and_empty_lists_are_dynamic() {
        let mixed = infer(&RawNode::sequence([
            RawNode::string("a"),
            RawNode::bool(false),
        ]));
        assert_eq!(mixed.ty(), &TypeDescriptor::list(TypeDescriptor::Dynamic));
        assert_eq!(mixed.index(1).map(TypedValue::ty), Some(&TypeDescriptor::Bool));

        let empty = infer(&RawNode::sequence(Vec::new()));
        assert_eq!(empty.ty(), &TypeDescriptor::list(TypeDescriptor::Dynamic));
        assert_eq!(empty.len(), Some(0));
    }

    #[test]
    fn test_objects_with_different_keys_are_heterogeneous() {
        let typed = infer(&RawNode::sequence([
            RawNode::mapping([("a", RawNode::integer(1))]),
            RawNode::mapping([("b", RawNode::integer(1))]),
        ]));
        assert_eq!(typed.ty(), &TypeDescriptor::list(TypeDescriptor::Dynamic));
    }

    #[test]
    fn test_deep_nesting_is_walked_iteratively() {
        let mut raw = RawNode::integer(0);
        for i in 0..100_000 {
            raw = if i % 2 == 0 {
                RawNode::sequence([raw])
            } else {
                RawNode::mapping([("inner", raw)])
            };
        }
        let typed = infer(&raw);
        assert_eq!(typed.ty().depth(), 100_001);

        let mut node = &typed;
        while let Some(inner) = node.index(0).or_else(|| node.get("inner")) {
            node = inner;
        }
        assert_eq!(node.as_number(), Some(&Number::Int(0)));
    }

    #[test]
    fn test_deep_identical_siblings_share_element_type() {
        let chain = || {
            let mut raw = RawNode::string("leaf");
            for _ in 0..100_000 {
                raw = RawNode::sequence([raw]);
            }
            raw
        };
        let typed = infer(&RawNode::sequence([chain(), chain()]));
        assert_eq!(typed.ty().depth(), 100_002);

        let first = typed.index(0).map(TypedValue::ty);
        let second = typed.index(1).map(TypedValue::ty);
        assert!(first.is_some() && first == second);
        assert!(typed.ty().element_type() == first);
    }
}
