//! Redaction of sensitive fields before they are exposed.
//!
//! A field is redacted when its redaction marker is one of the viewer's
//! [`ObfuscateTags`] markers, or its dotted JSON path is one of its paths. Redaction happens in place on the
//! viewer's private copy of the object:
//!
//! - non-empty `String` → [`REDACTED`](crate::REDACTED)
//! - other scalars → `Default`
//! - aggregates and maps → `Default` / empty
//! - `Option` → `None`, `Vec` → empty
//!
//! Fields that do not match are descended into, including map entries and
//! sequence elements, so nested secrets are found at any depth. Sequence
//! elements have no JSON path; only markers apply inside them.

use std::collections::BTreeSet;

use tracing::trace;

use crate::naming::child_path;
use crate::value::{Node, NodeMut};
use crate::view::{FieldMeta, FieldMut, StructView};

/// The default redaction marker, set by `#[view(obfuscate)]`.
pub const OBFUSCATE: &str = "obfuscate";

/// Redaction markers and dotted JSON paths that trigger redaction.
///
/// The two are kept apart: a marker only matches a field's `redact` attribute
/// and a path only matches the field's position. Defaults to the marker
/// `"obfuscate"` and no paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObfuscateTags {
    markers: BTreeSet<String>,
    paths: BTreeSet<String>,
}

impl Default for ObfuscateTags {
    fn default() -> Self {
        Self::new([OBFUSCATE])
    }
}

impl<S: Into<String>> FromIterator<S> for ObfuscateTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            markers: iter.into_iter().map(Into::into).collect(),
            paths: BTreeSet::new(),
        }
    }
}

impl ObfuscateTags {
    /// Creates a set from redaction markers.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        markers.into_iter().collect()
    }

    /// An empty set; nothing is redacted.
    #[must_use]
    pub fn none() -> Self {
        Self {
            markers: BTreeSet::new(),
            paths: BTreeSet::new(),
        }
    }

    /// Adds a redaction marker.
    pub fn insert(&mut self, marker: impl Into<String>) -> bool {
        self.markers.insert(marker.into())
    }

    /// Adds a dotted JSON path.
    pub fn insert_path(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    /// Builder form of [`insert_path`](Self::insert_path).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.insert_path(path);
        self
    }

    /// Replaces the markers, keeping the paths.
    pub(crate) fn set_markers(&mut self, markers: BTreeSet<String>) {
        self.markers = markers;
    }

    /// Whether `marker` is a configured redaction marker.
    #[must_use]
    pub fn contains(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    /// Whether nothing would be redacted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.paths.is_empty()
    }

    /// Iterates the configured markers in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    /// Iterates the configured paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Whether a field with `meta` at `json_path` must be redacted.
    #[must_use]
    pub fn matches(&self, meta: &FieldMeta<'_>, json_path: Option<&str>) -> bool {
        meta.redact.is_some_and(|marker| self.contains(marker)) || self.matches_path(json_path)
    }

    /// Whether the dotted JSON path is listed; empty and excluded paths never match.
    #[must_use]
    pub fn matches_path(&self, json_path: Option<&str>) -> bool {
        json_path.is_some_and(|path| !path.is_empty() && self.paths.contains(path))
    }
}

/// Redacts every matching field of `value` in place.
///
/// Returns the number of redacted fields.
pub fn redact(value: &mut (dyn StructView + '_), tags: &ObfuscateTags) -> usize {
    if tags.is_empty() {
        return 0;
    }

    Redactor { tags }.visit_struct(value, Some(""))
}

/// Returns the path of the first field of `value` that would be redacted.
///
/// Used for borrowed objects, which cannot be modified.
pub(crate) fn first_redacted(value: &dyn StructView, tags: &ObfuscateTags) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    Redactor { tags }.find_in_struct(value, Some(""))
}

struct Redactor<'t> {
    tags: &'t ObfuscateTags,
}

impl Redactor<'_> {
    fn visit_struct(&self, value: &mut (dyn StructView + '_), json_prefix: Option<&str>) -> usize {
        let mut redacted = 0;

        for FieldMut { meta, mut slot } in value.fields_mut() {
            let path = child_path(json_prefix, meta.json_segment());

            if self.tags.matches(&meta, path.as_deref()) {
                trace!(field = meta.name, path = path.as_deref(), "redacting field");
                slot.obfuscate();
                redacted += 1;
                continue;
            }

            redacted += self.visit_node(slot.node_mut(), path.as_deref());
        }

        redacted
    }

    fn visit_node(&self, node: NodeMut<'_>, json_path: Option<&str>) -> usize {
        match node {
            NodeMut::Struct(inner) => self.visit_struct(inner, json_path),
            NodeMut::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| {
                    let path = child_path(json_path, &key);

                    if self.tags.matches_path(path.as_deref()) {
                        trace!(key = %key, path = path.as_deref(), "redacting map entry");
                        value.obfuscate();
                        return 1;
                    }

                    self.visit_node(value.node_mut(), path.as_deref())
                })
                .sum(),
            NodeMut::Seq(items) => items
                .into_iter()
                .map(|item| self.visit_node(item.node_mut(), None))
                .sum(),
            NodeMut::Scalar => 0,
        }
    }

    fn find_in_struct(&self, value: &dyn StructView, json_prefix: Option<&str>) -> Option<String> {
        value.fields().into_iter().find_map(|field| {
            let path = child_path(json_prefix, field.meta.json_segment());

            if self.tags.matches(&field.meta, path.as_deref()) {
                return Some(path.unwrap_or_else(|| field.meta.name.to_owned()));
            }

            self.find_in_node(field.node, path.as_deref())
        })
    }

    fn find_in_node(&self, node: Node<'_>, json_path: Option<&str>) -> Option<String> {
        match node {
            Node::Struct(inner) => self.find_in_struct(inner, json_path),
            Node::Map(entries) => entries.into_iter().find_map(|(key, value)| {
                let path = child_path(json_path, &key);

                if self.tags.matches_path(path.as_deref()) {
                    return Some(path.unwrap_or(key));
                }

                self.find_in_node(value.node(), path.as_deref())
            }),
            Node::Seq(items) => items
                .into_iter()
                .find_map(|item| self.find_in_node(item.node(), None)),
            Node::Scalar(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_tags() {
        let tags = ObfuscateTags::default();
        assert!(tags.contains(OBFUSCATE));
        assert_eq!(tags.iter().collect::<Vec<_>>(), [OBFUSCATE]);
    }

    #[test]
    fn test_matches_marker_or_path() {
        let tags = ObfuscateTags::default().with_path("db.url");

        let marked = FieldMeta::new("secret", Some("secret"), Some("obfuscate"));
        assert!(tags.matches(&marked, Some("secret")));

        let plain = FieldMeta::new("url", Some("url"), None);
        assert!(tags.matches(&plain, Some("db.url")));
        assert!(!tags.matches(&plain, Some("url")));
        assert!(!tags.matches(&plain, None));
    }

    #[test]
    fn test_markers_and_paths_are_separate() {
        let tags = ObfuscateTags::default();
        let plain = FieldMeta::new("obfuscate", Some("obfuscate"), None);
        assert!(!tags.matches(&plain, Some("obfuscate")));

        let tags = ObfuscateTags::none().with_path("secret");
        let marked = FieldMeta::new("token", Some("token"), Some("secret"));
        assert!(!tags.matches(&marked, Some("token")));
        assert!(tags.matches(&marked, Some("secret")));
    }

    #[test]
    fn test_redact_inside_array_by_marker_only() {
        let mut value = json!({"items": [{"a": "x"}, "y"]});

        assert_eq!(redact(&mut value, &ObfuscateTags::none().with_path("items.a")), 0);
        assert_eq!(value, json!({"items": [{"a": "x"}, "y"]}));
    }

    #[test]
    fn test_empty_path_never_matches() {
        let tags = ObfuscateTags::none().with_path("");
        assert!(!tags.matches_path(Some("")));
    }

    #[test]
    fn test_redact_dynamic_by_path() {
        let mut value = json!({"db": {"url": "postgres://", "pool": 4}, "name": "x"});
        let tags = ObfuscateTags::none().with_path("db.url");

        assert_eq!(redact(&mut value, &tags), 1);
        assert_eq!(value, json!({"db": {"url": crate::REDACTED, "pool": 4}, "name": "x"}));
    }

    #[test]
    fn test_redact_whole_branch() {
        let mut value = json!({"db": {"url": "postgres://", "pool": 4}});
        let tags = ObfuscateTags::none().with_path("db");

        redact(&mut value, &tags);
        assert_eq!(value, json!({"db": {}}));
    }

    #[test]
    fn test_first_redacted() {
        let value = json!({"a": {"b": "x"}});

        assert_eq!(
            first_redacted(&value, &ObfuscateTags::none().with_path("a.b")),
            Some("a.b".to_owned())
        );
        assert_eq!(first_redacted(&value, &ObfuscateTags::default()), None);
    }

    #[test]
    fn test_no_tags_no_work() {
        let mut value = json!({"a": "x"});
        assert_eq!(redact(&mut value, &ObfuscateTags::none()), 0);
        assert_eq!(value, json!({"a": "x"}));
    }
}
