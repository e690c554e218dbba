//! The per-field side of the structural capability.
//!
//! Every field type implements [`FieldValue`], which classifies the current
//! value as a nested aggregate, a map or a scalar ([`Node`]) and knows how to
//! redact it in place.
//!
//! | Type | Node | Obfuscated to |
//! |------|------|---------------|
//! | `bool`, integers, floats, `char` | scalar | `Default` |
//! | `String` | scalar | [`REDACTED`] when non-empty |
//! | `PathBuf`, `Duration` | scalar (display / debug form) | `Default` |
//! | `Option<T>` | `T`'s node, or `null` | `None` |
//! | `Vec<T>` | sequence, rendered as an array leaf | empty |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | map | empty |
//! | `Box<T>` | `T`'s node | `T`'s obfuscation |
//! | derived structs | aggregate | `Default` |

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Display};
use std::hash::BuildHasher;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::view::StructView;

/// Token that replaces non-empty obfuscated strings.
pub const REDACTED: &str = "*REDACTED*";

/// Read-only classification of a value.
pub enum Node<'a> {
    /// A nested aggregate.
    Struct(&'a dyn StructView),

    /// A map with stringified keys.
    Map(Vec<(String, &'a dyn FieldValue)>),

    /// A sequence; flattened as one leaf, but searched by the redaction pass.
    Seq(Vec<&'a dyn FieldValue>),

    /// A leaf rendered as JSON.
    Scalar(Value),
}

impl Node<'_> {
    /// Renders any `Debug` value as an opaque string scalar.
    pub fn opaque<T: Debug + ?Sized>(value: &T) -> Self {
        Node::Scalar(Value::String(format!("{value:?}")))
    }

    /// Converts the node into JSON.
    ///
    /// Aggregates become objects keyed by JSON segment; fields without a
    /// segment (skip sentinel) are left out.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Node::Struct(value) => {
                let mut object = Map::new();

                for field in value.fields() {
                    let segment = field.meta.json_segment();
                    if segment.is_empty() {
                        continue;
                    }
                    object.insert(segment.to_owned(), field.node.into_json());
                }

                Value::Object(object)
            }
            Node::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.node().into_json()))
                    .collect(),
            ),
            Node::Seq(items) => {
                Value::Array(items.into_iter().map(|item| item.node().into_json()).collect())
            }
            Node::Scalar(value) => value,
        }
    }
}

impl Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Struct(value) => f.debug_tuple("Struct").field(&value.type_name()).finish(),
            Node::Map(entries) => f
                .debug_tuple("Map")
                .field(&entries.iter().map(|(key, _)| key).collect::<Vec<_>>())
                .finish(),
            Node::Seq(items) => f.debug_tuple("Seq").field(&items.len()).finish(),
            Node::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
        }
    }
}

/// Mutable classification of a value, used for descent during redaction.
pub enum NodeMut<'a> {
    /// A nested aggregate.
    Struct(&'a mut dyn StructView),

    /// A map with stringified keys.
    Map(Vec<(String, &'a mut dyn FieldValue)>),

    /// Sequence elements.
    Seq(Vec<&'a mut dyn FieldValue>),

    /// A leaf; nothing to descend into.
    Scalar,
}

/// A value that can appear as a field.
pub trait FieldValue {
    /// Classifies the current value.
    fn node(&self) -> Node<'_>;

    /// Classifies the current value for in-place modification.
    fn node_mut(&mut self) -> NodeMut<'_>;

    /// Replaces the value with its redacted form.
    fn obfuscate(&mut self);
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! impl_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl FieldValue for $ty {
            fn node(&self) -> Node<'_> {
                Node::Scalar(Value::from(*self))
            }

            fn node_mut(&mut self) -> NodeMut<'_> {
                NodeMut::Scalar
            }

            fn obfuscate(&mut self) {
                *self = <$ty>::default();
            }
        }
    )+};
}

impl_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);

impl FieldValue for char {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Value::String(self.to_string()))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar
    }

    fn obfuscate(&mut self) {
        *self = char::default();
    }
}

impl FieldValue for String {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Value::String(self.clone()))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar
    }

    fn obfuscate(&mut self) {
        if !self.is_empty() {
            REDACTED.clone_into(self);
        }
    }
}

impl FieldValue for PathBuf {
    fn node(&self) -> Node<'_> {
        Node::Scalar(Value::String(self.display().to_string()))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar
    }

    fn obfuscate(&mut self) {
        self.clear();
    }
}

impl FieldValue for Duration {
    fn node(&self) -> Node<'_> {
        Node::opaque(self)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar
    }

    fn obfuscate(&mut self) {
        *self = Duration::ZERO;
    }
}

// ============================================================================
// Wrappers and collections
// ============================================================================

impl<T: FieldValue> FieldValue for Option<T> {
    fn node(&self) -> Node<'_> {
        match self {
            Some(value) => value.node(),
            None => Node::Scalar(Value::Null),
        }
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        match self {
            Some(value) => value.node_mut(),
            None => NodeMut::Scalar,
        }
    }

    fn obfuscate(&mut self) {
        *self = None;
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Box<T> {
    fn node(&self) -> Node<'_> {
        (**self).node()
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        (**self).node_mut()
    }

    fn obfuscate(&mut self) {
        (**self).obfuscate();
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn node(&self) -> Node<'_> {
        Node::Seq(self.iter().map(|item| item as &dyn FieldValue).collect())
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Seq(self.iter_mut().map(|item| item as &mut dyn FieldValue).collect())
    }

    fn obfuscate(&mut self) {
        self.clear();
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S>
where
    K: Display,
    V: FieldValue,
    S: BuildHasher,
{
    fn node(&self) -> Node<'_> {
        let mut entries: Vec<(String, &dyn FieldValue)> = self
            .iter()
            .map(|(key, value)| (key.to_string(), value as &dyn FieldValue))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Node::Map(entries)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        let mut entries: Vec<(String, &mut dyn FieldValue)> = self
            .iter_mut()
            .map(|(key, value)| (key.to_string(), value as &mut dyn FieldValue))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        NodeMut::Map(entries)
    }

    fn obfuscate(&mut self) {
        self.clear();
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: Display,
    V: FieldValue,
{
    fn node(&self) -> Node<'_> {
        Node::Map(
            self.iter()
                .map(|(key, value)| (key.to_string(), value as &dyn FieldValue))
                .collect(),
        )
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Map(
            self.iter_mut()
                .map(|(key, value)| (key.to_string(), value as &mut dyn FieldValue))
                .collect(),
        )
    }

    fn obfuscate(&mut self) {
        self.clear();
    }
}

// ============================================================================
// Secrets
// ============================================================================

#[cfg(feature = "secrecy")]
impl FieldValue for secrecy::SecretString {
    fn node(&self) -> Node<'_> {
        use secrecy::ExposeSecret;

        let text = if self.expose_secret().is_empty() {
            String::new()
        } else {
            REDACTED.to_owned()
        };
        Node::Scalar(Value::String(text))
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Scalar
    }

    fn obfuscate(&mut self) {
        use secrecy::ExposeSecret;

        if !self.expose_secret().is_empty() {
            *self = secrecy::SecretString::from(REDACTED);
        }
    }
}
