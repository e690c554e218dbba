//! The aggregate side of the structural capability.
//!
//! [`StructView`] is implemented by `#[derive(StructView)]` (and by
//! [`serde_json::Value`]). It hands out one [`Field`] per visible field in
//! declaration order, each pairing compile-time [`FieldMeta`] with the field's
//! current [`Node`].

use crate::naming;
use crate::value::{FieldValue, Node, NodeMut};

/// Compile-time metadata of one visible field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMeta<'a> {
    /// Identifier as declared, raw prefix removed.
    pub name: &'a str,

    /// JSON tag including modifiers (`"name,omitempty"`), if any.
    pub json: Option<&'a str>,

    /// Redaction marker matched against the viewer's obfuscation tags.
    pub redact: Option<&'a str>,

    /// `json` is a literal key, not a tag: no modifiers, no skip sentinel.
    pub verbatim: bool,
}

impl<'a> FieldMeta<'a> {
    /// Creates field metadata.
    #[must_use]
    pub const fn new(name: &'a str, json: Option<&'a str>, redact: Option<&'a str>) -> Self {
        Self {
            name,
            json,
            redact,
            verbatim: false,
        }
    }

    /// Metadata of an object key, used as both identifier and JSON segment.
    #[must_use]
    pub const fn key(key: &'a str) -> Self {
        Self {
            name: key,
            json: Some(key),
            redact: None,
            verbatim: true,
        }
    }

    /// The field's own contribution to its environment variable name.
    #[must_use]
    pub fn env_key(&self) -> String {
        if self.verbatim {
            naming::normalize(self.name)
        } else {
            naming::env_key(self.name, self.json)
        }
    }

    /// The field's JSON path segment, empty when it has none.
    #[must_use]
    pub fn json_segment(&self) -> &'a str {
        match self.json {
            Some(key) if self.verbatim => key,
            json => naming::json_segment(json),
        }
    }
}

/// Read-only view of one field.
pub struct Field<'a> {
    /// Field metadata.
    pub meta: FieldMeta<'a>,

    /// Current value.
    pub node: Node<'a>,
}

impl<'a> Field<'a> {
    /// Pairs metadata with a value.
    #[must_use]
    pub fn new(meta: FieldMeta<'a>, node: Node<'a>) -> Self {
        Self { meta, node }
    }
}

/// Mutable view of one field, used by the redaction pass.
pub struct FieldMut<'a> {
    /// Field metadata.
    pub meta: FieldMeta<'a>,

    /// Writable storage of the field.
    pub slot: Slot<'a>,
}

impl<'a> FieldMut<'a> {
    /// Pairs metadata with a writable slot.
    #[must_use]
    pub fn new(meta: FieldMeta<'a>, slot: Slot<'a>) -> Self {
        Self { meta, slot }
    }
}

/// Writable storage of a field.
pub enum Slot<'a> {
    /// A field whose type implements [`FieldValue`].
    Value(&'a mut dyn FieldValue),

    /// A field marked `#[view(opaque)]`; it can only be reset.
    Opaque(&'a mut dyn Reset),
}

impl Slot<'_> {
    /// Classifies the slot for descent.
    pub fn node_mut(&mut self) -> NodeMut<'_> {
        match self {
            Self::Value(value) => value.node_mut(),
            Self::Opaque(_) => NodeMut::Scalar,
        }
    }

    /// Redacts the stored value in place.
    pub fn obfuscate(&mut self) {
        match self {
            Self::Value(value) => value.obfuscate(),
            Self::Opaque(value) => value.reset(),
        }
    }
}

/// Resets a value to its default.
pub trait Reset {
    /// Replaces `self` with its default.
    fn reset(&mut self);
}

impl<T: Default> Reset for T {
    fn reset(&mut self) {
        *self = T::default();
    }
}

/// A struct-like aggregate whose visible fields can be enumerated.
///
/// Usually derived:
///
/// ```rust,ignore
/// #[derive(StructView, Default)]
/// struct Server {
///     #[view(json = "port")]
///     pub port: u16,
/// }
/// ```
pub trait StructView {
    /// Short name of the type, used to attribute doc comments to fields.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Visible fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Visible fields with writable slots, in declaration order.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;

    /// Whether this value can be flattened into fields.
    ///
    /// Always true for derived structs; dynamic values answer per instance.
    fn is_aggregate(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pair {
        left: String,
        right: u32,
    }

    impl StructView for Pair {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new(FieldMeta::new("left", Some("left"), None), self.left.node()),
                Field::new(FieldMeta::new("right", None, Some("obfuscate")), self.right.node()),
            ]
        }

        fn fields_mut(&mut self) -> Vec<FieldMut<'_>> {
            vec![
                FieldMut::new(FieldMeta::new("left", Some("left"), None), Slot::Value(&mut self.left)),
                FieldMut::new(FieldMeta::new("right", None, Some("obfuscate")), Slot::Opaque(&mut self.right)),
            ]
        }
    }

    #[test]
    fn test_key_meta_is_literal() {
        let meta = FieldMeta::key("a,b");
        assert_eq!(meta.env_key(), "A,B");
        assert_eq!(meta.json_segment(), "a,b");

        let meta = FieldMeta::key("-");
        assert_eq!(meta.env_key(), "-");
        assert_eq!(meta.json_segment(), "-");

        let tagged = FieldMeta::new("port", Some("http_port,omitempty"), None);
        assert_eq!(tagged.env_key(), "HTTPPORT");
        assert_eq!(tagged.json_segment(), "http_port");
    }

    #[test]
    fn test_default_type_name_is_path() {
        let pair = Pair::default();
        assert!(pair.type_name().ends_with("Pair"));
        assert!(pair.is_aggregate());
    }

    #[test]
    fn test_slot_obfuscate() {
        let mut pair = Pair {
            left: "visible".into(),
            right: 7,
        };

        for mut field in pair.fields_mut() {
            field.slot.obfuscate();
        }

        assert_eq!(pair.left, crate::REDACTED);
        assert_eq!(pair.right, 0);
    }

    #[test]
    fn test_opaque_slot_is_scalar() {
        let mut value = 5_u8;
        let mut slot = Slot::Opaque(&mut value);
        assert!(matches!(slot.node_mut(), NodeMut::Scalar));
    }
}
