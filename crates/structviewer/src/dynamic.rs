//! Structural view of untyped JSON values.
//!
//! A JSON object is an aggregate whose keys act as both identifier and literal
//! JSON segment (no tag modifiers, no skip sentinel), so any `Serialize` configuration can be inspected through
//! `serde_json::to_value` without deriving [`StructView`]. Other JSON kinds
//! are scalars and are rejected as top-level objects.

use serde_json::Value;

use crate::value::{FieldValue, Node, NodeMut, REDACTED};
use crate::view::{Field, FieldMeta, FieldMut, Slot, StructView};

impl StructView for Value {
    fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn fields(&self) -> Vec<Field<'_>> {
        let Value::Object(map) = self else {
            return Vec::new();
        };

        map.iter()
            .map(|(key, value)| Field::new(FieldMeta::key(key), value.node()))
            .collect()
    }

    fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
        let Value::Object(map) = self else {
            return Vec::new();
        };

        map.iter_mut()
            .map(|(key, value)| {
                FieldMut::new(FieldMeta::key(key), Slot::Value(value))
            })
            .collect()
    }

    fn is_aggregate(&self) -> bool {
        self.is_object()
    }
}

impl FieldValue for Value {
    fn node(&self) -> Node<'_> {
        match self {
            Value::Object(_) => Node::Struct(self),
            Value::Array(items) => Node::Seq(items.iter().map(|item| item as &dyn FieldValue).collect()),
            scalar => Node::Scalar(scalar.clone()),
        }
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        if self.is_object() {
            return NodeMut::Struct(self);
        }

        match self {
            Value::Array(items) => {
                NodeMut::Seq(items.iter_mut().map(|item| item as &mut dyn FieldValue).collect())
            }
            _ => NodeMut::Scalar,
        }
    }

    fn obfuscate(&mut self) {
        match self {
            Value::String(text) if !text.is_empty() => REDACTED.clone_into(text),
            Value::Null | Value::String(_) => {}
            Value::Bool(flag) => *flag = false,
            Value::Number(number) => *number = 0.into(),
            Value::Array(items) => items.clear(),
            Value::Object(map) => map.clear(),
        }
    }
}
