//! The descriptor tree produced by flattening.
//!
//! A [`FieldDescriptor`] is either a leaf (a rendered value with its
//! environment name and JSON path) or a branch (its children, keyed by
//! `raw_name`). The tree mirrors the shape of the inspected object.
//!
//! # Serialised Shape
//!
//! ```json
//! {
//!   "config_field": "db.url",
//!   "env": "APP_DB_URL",
//!   "description": "Connection string.",
//!   "value": "*REDACTED*",
//!   "obfuscated": true
//! }
//! ```
//!
//! `description` is omitted when empty and `obfuscated` is omitted on
//! branches. A branch's `value` is an object keyed by child `raw_name`.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Textual form of an empty or absent value.
pub const EMPTY_MARKER: &str = "''";

static EMPTY: FieldDescriptor = FieldDescriptor {
    raw_name: String::new(),
    env_key: String::new(),
    json_path: String::new(),
    env_name: String::new(),
    description: String::new(),
    value: DescriptorValue::Leaf(Value::Null),
    obfuscated: None,
    owner: String::new(),
};

/// Metadata of one field of the inspected object.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FieldDescriptor {
    /// Declared identifier, or the stringified key of a map entry.
    #[serde(skip)]
    pub raw_name: String,

    /// This field's own contribution to environment names.
    #[serde(skip)]
    pub env_key: String,

    /// Dot-joined JSON path; empty on branches and excluded fields.
    #[serde(rename = "config_field")]
    pub json_path: String,

    /// Full environment variable name; empty on branches.
    #[serde(rename = "env")]
    pub env_name: String,

    /// Doc comment text, filled in by the documentation merger.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Rendered value or children.
    pub value: DescriptorValue,

    /// Whether the value was redacted; `None` on branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,

    /// Name of the declaring struct: empty for map entries, the JSON kind for
    /// dynamic objects.
    #[serde(skip)]
    pub(crate) owner: String,
}

/// A leaf value or a branch's children.
#[derive(Clone, Debug, PartialEq)]
pub enum DescriptorValue {
    /// Rendered scalar.
    Leaf(Value),

    /// Children in declaration order.
    Branch(Vec<FieldDescriptor>),
}

impl Default for DescriptorValue {
    fn default() -> Self {
        Self::Leaf(Value::Null)
    }
}

impl Serialize for DescriptorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(value) => value.serialize(serializer),
            Self::Branch(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for child in children {
                    map.serialize_entry(&child.raw_name, child)?;
                }
                map.end()
            }
        }
    }
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        EMPTY.clone()
    }
}

impl FieldDescriptor {
    /// Creates a leaf descriptor.
    #[must_use]
    pub fn leaf(
        raw_name: impl Into<String>,
        env_key: impl Into<String>,
        env_name: impl Into<String>,
        json_path: impl Into<String>,
        value: Value,
        obfuscated: bool,
    ) -> Self {
        Self {
            raw_name: raw_name.into(),
            env_key: env_key.into(),
            env_name: env_name.into(),
            json_path: json_path.into(),
            value: DescriptorValue::Leaf(value),
            obfuscated: Some(obfuscated),
            ..Self::default()
        }
    }

    /// Creates a branch descriptor.
    #[must_use]
    pub fn branch(
        raw_name: impl Into<String>,
        env_key: impl Into<String>,
        children: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            raw_name: raw_name.into(),
            env_key: env_key.into(),
            value: DescriptorValue::Branch(children),
            ..Self::default()
        }
    }

    /// Sets the declaring struct's name.
    #[must_use]
    pub(crate) fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Sentinel returned by lookups that miss.
    #[must_use]
    pub fn empty() -> &'static FieldDescriptor {
        &EMPTY
    }

    /// Whether this is the empty sentinel (or equivalent to it).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_name.is_empty() && self.env_name.is_empty() && self.json_path.is_empty()
    }

    /// Whether this descriptor has children.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        matches!(self.value, DescriptorValue::Branch(_))
    }

    /// Name of the declaring struct: empty for map entries, the JSON kind
    /// (`object`) for keys of dynamic objects.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Children of a branch; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[FieldDescriptor] {
        match &self.value {
            DescriptorValue::Branch(children) => children,
            DescriptorValue::Leaf(_) => &[],
        }
    }

    /// Looks up a direct child by `raw_name`.
    #[must_use]
    pub fn child(&self, raw_name: &str) -> Option<&FieldDescriptor> {
        self.children().iter().find(|child| child.raw_name == raw_name)
    }

    /// The leaf value, if this is a leaf.
    #[must_use]
    pub fn leaf_value(&self) -> Option<&Value> {
        match &self.value {
            DescriptorValue::Leaf(value) => Some(value),
            DescriptorValue::Branch(_) => None,
        }
    }

    /// Textual form of the value: strings unquoted, arrays comma-joined,
    /// empty or absent values as `''`.
    #[must_use]
    pub fn value_string(&self) -> String {
        match &self.value {
            DescriptorValue::Leaf(value) => text_form(value),
            DescriptorValue::Branch(_) => EMPTY_MARKER.to_owned(),
        }
    }

    /// `ENVNAME=value` line for this leaf.
    #[must_use]
    pub fn render_line(&self) -> String {
        format!("{}={}", self.env_name, self.value_string())
    }
}

/// Renders a JSON value in its textual form.
#[must_use]
pub fn text_form(value: &Value) -> String {
    let text = match value {
        Value::Array(items) => items.iter().map(item_text).collect::<Vec<_>>().join(","),
        other => item_text(other),
    };

    if text.is_empty() {
        EMPTY_MARKER.to_owned()
    } else {
        text
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// All leaves of `tree`, depth-first in declaration order.
#[must_use]
pub fn leaves(tree: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    fn collect<'a>(nodes: &'a [FieldDescriptor], out: &mut Vec<&'a FieldDescriptor>) {
        for node in nodes {
            match &node.value {
                DescriptorValue::Branch(children) => collect(children, out),
                DescriptorValue::Leaf(_) => out.push(node),
            }
        }
    }

    let mut out = Vec::new();
    collect(tree, &mut out);
    out
}

/// Level-first search: siblings are compared before any branch is entered.
pub(crate) fn search<'a>(
    nodes: &'a [FieldDescriptor],
    matches: &dyn Fn(&FieldDescriptor) -> bool,
) -> Option<&'a FieldDescriptor> {
    nodes.iter().find(|node| matches(*node)).or_else(|| {
        nodes
            .iter()
            .filter(|node| node.is_branch())
            .find_map(|node| search(node.children(), matches))
    })
}

/// Depth-first pre-order search for a mutable descriptor.
pub(crate) fn find_mut<'a>(
    nodes: &'a mut [FieldDescriptor],
    matches: &dyn Fn(&FieldDescriptor) -> bool,
) -> Option<&'a mut FieldDescriptor> {
    for node in nodes.iter_mut() {
        if matches(&*node) {
            return Some(node);
        }

        if let DescriptorValue::Branch(children) = &mut node.value
            && let Some(found) = find_mut(children, matches)
        {
            return Some(found);
        }
    }

    None
}

/// Nested map view of the tree: branches as maps, leaves as descriptors.
#[derive(Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Nested<'a> {
    /// A leaf descriptor.
    Leaf(&'a FieldDescriptor),

    /// A branch's children keyed by `raw_name`.
    Branch(BTreeMap<&'a str, Nested<'a>>),
}

/// Builds the nested map view of `tree`.
#[must_use]
pub fn nested_map(tree: &[FieldDescriptor]) -> BTreeMap<&str, Nested<'_>> {
    tree.iter()
        .map(|node| {
            let entry = match &node.value {
                DescriptorValue::Branch(children) => Nested::Branch(nested_map(children)),
                DescriptorValue::Leaf(_) => Nested::Leaf(node),
            };
            (node.raw_name.as_str(), entry)
        })
        .collect()
}
