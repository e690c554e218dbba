//! Recursive flattening of an aggregate into a descriptor tree.
//!
//! Each visible field becomes one [`FieldDescriptor`]:
//!
//! | Field value | Descriptor |
//! |-------------|------------|
//! | nested aggregate | branch; children under `ENV_KEY_` and `segment.` |
//! | map | branch; aggregate entries become branches, other entries leaves |
//! | sequence / scalar / opaque | leaf with `env_name` and `json_path` |
//!
//! Environment names join keys with `_`; JSON paths join segments with `.`.
//! A field with an empty JSON segment (tag `-`) has no JSON path and neither
//! do its descendants. Obfuscation is inherited by every descendant.

use tracing::trace;

use crate::descriptor::FieldDescriptor;
use crate::error::Error;
use crate::naming::{self, child_path};
use crate::redact::ObfuscateTags;
use crate::value::{FieldValue, Node};
use crate::view::{Field, StructView};

/// Flattens `value` into a descriptor tree.
///
/// `env_prefix` is prepended verbatim to every environment name; `json_prefix`
/// is joined with `.` in front of every JSON path.
///
/// # Errors
///
/// Returns [`Error::InvalidObjectKind`] if `value` is not an aggregate.
pub fn flatten(
    value: &dyn StructView,
    env_prefix: &str,
    json_prefix: &str,
    tags: &ObfuscateTags,
) -> Result<Vec<FieldDescriptor>, Error> {
    if !value.is_aggregate() {
        return Err(Error::invalid_object_kind(value.type_name()));
    }

    let flattener = Flattener { tags };
    Ok(flattener.visit_struct(value, env_prefix, Some(json_prefix), false))
}

struct Flattener<'t> {
    tags: &'t ObfuscateTags,
}

impl Flattener<'_> {
    fn visit_struct(
        &self,
        value: &dyn StructView,
        env_prefix: &str,
        json_prefix: Option<&str>,
        obfuscated: bool,
    ) -> Vec<FieldDescriptor> {
        let owner = value.type_name();

        value
            .fields()
            .into_iter()
            .map(|field| self.visit_field(field, owner, env_prefix, json_prefix, obfuscated))
            .collect()
    }

    fn visit_field(
        &self,
        field: Field<'_>,
        owner: &str,
        env_prefix: &str,
        json_prefix: Option<&str>,
        inherited: bool,
    ) -> FieldDescriptor {
        let Field { meta, node } = field;
        let env_key = meta.env_key();
        let json_path = child_path(json_prefix, meta.json_segment());
        let obfuscated = inherited || self.tags.matches(&meta, json_path.as_deref());

        trace!(
            field = meta.name,
            env_key = %env_key,
            json_path = json_path.as_deref(),
            obfuscated,
            "visiting field"
        );

        let nested_prefix = format!("{env_prefix}{env_key}_");
        let descriptor = match node {
            Node::Struct(inner) => {
                let children =
                    self.visit_struct(inner, &nested_prefix, json_path.as_deref(), obfuscated);
                FieldDescriptor::branch(meta.name, env_key, children)
            }
            Node::Map(entries) => {
                let children = entries
                    .into_iter()
                    .map(|(key, value)| {
                        self.visit_entry(key, value, &nested_prefix, json_path.as_deref(), obfuscated)
                    })
                    .collect();
                FieldDescriptor::branch(meta.name, env_key, children)
            }
            leaf @ (Node::Seq(_) | Node::Scalar(_)) => {
                let env_name = format!("{env_prefix}{env_key}");
                FieldDescriptor::leaf(
                    meta.name,
                    env_key,
                    env_name,
                    json_path.unwrap_or_default(),
                    leaf.into_json(),
                    obfuscated,
                )
            }
        };

        descriptor.with_owner(owner)
    }

    fn visit_entry(
        &self,
        key: String,
        value: &dyn FieldValue,
        env_prefix: &str,
        json_prefix: Option<&str>,
        inherited: bool,
    ) -> FieldDescriptor {
        let env_key = naming::normalize(&key);
        let json_path = child_path(json_prefix, &key);
        let obfuscated = inherited || self.tags.matches_path(json_path.as_deref());

        match value.node() {
            Node::Struct(inner) => {
                let nested_prefix = format!("{env_prefix}{env_key}_");
                let children =
                    self.visit_struct(inner, &nested_prefix, json_path.as_deref(), obfuscated);
                FieldDescriptor::branch(key, env_key, children)
            }
            other => {
                let env_name = format!("{env_prefix}{env_key}");
                FieldDescriptor::leaf(
                    key,
                    env_key,
                    env_name,
                    json_path.unwrap_or_default(),
                    other.into_json(),
                    obfuscated,
                )
            }
        }
    }
}
