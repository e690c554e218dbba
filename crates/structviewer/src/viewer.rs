//! The viewer facade: construction, lookups and rendering.
//!
//! [`Viewer::new`] runs the whole pipeline once, synchronously:
//!
//! 1. validate the [`ViewerConfig`]
//! 2. redact the owned copy of the object (or refuse a borrowed one that needs it)
//! 3. flatten it into a descriptor tree and check env names are unique
//! 4. optionally merge doc comments from the configured source file
//!
//! The resulting `Viewer` owns plain data only and is read-only afterwards,
//! so it can be shared behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, trace};

use crate::descriptor::{self, FieldDescriptor, Nested};
use crate::docs::{DEFAULT_SOURCE_PATH, FsReader, SourceDocs, SourceReader};
use crate::error::Error;
use crate::flatten::flatten;
use crate::redact::{self, ObfuscateTags};
use crate::value::Node;
use crate::view::StructView;

// ============================================================================
// Object
// ============================================================================

/// The object handed to the viewer.
///
/// An owned object is redacted in place; a borrowed one can only be viewed
/// if none of its fields need redaction.
pub enum Object<'a> {
    /// The viewer's private copy.
    Owned(Box<dyn StructView + 'a>),

    /// A caller-owned value that must not be modified.
    Borrowed(&'a dyn StructView),
}

impl<'a> Object<'a> {
    /// Moves `value` into the viewer.
    pub fn owned<T: StructView + 'a>(value: T) -> Self {
        Self::Owned(Box::new(value))
    }

    /// Borrows `value`.
    pub fn borrowed<T: StructView>(value: &'a T) -> Self {
        Self::Borrowed(value)
    }

    fn get(&self) -> &dyn StructView {
        match self {
            Self::Owned(value) => value.as_ref(),
            Self::Borrowed(value) => *value,
        }
    }
}

impl fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Owned(_) => "Owned",
            Self::Borrowed(_) => "Borrowed",
        };
        f.debug_tuple(kind).field(&self.get().type_name()).finish()
    }
}

// ============================================================================
// ViewerConfig
// ============================================================================

/// Builder for [`Viewer`] construction.
///
/// ```rust,ignore
/// let config = ViewerConfig::new(app_config)
///     .prefix("APP_")
///     .obfuscate_path("db.url")
///     .parse_comments(true)
///     .source_path("src/config.rs");
/// ```
pub struct ViewerConfig<'a> {
    object: Option<Object<'a>>,
    prefix: String,
    parse_comments: bool,
    source_path: PathBuf,
    obfuscate_tags: ObfuscateTags,
    reader: Box<dyn SourceReader>,
}

impl Default for ViewerConfig<'_> {
    fn default() -> Self {
        Self {
            object: None,
            prefix: String::new(),
            parse_comments: false,
            source_path: PathBuf::new(),
            obfuscate_tags: ObfuscateTags::default(),
            reader: Box::new(FsReader),
        }
    }
}

impl fmt::Debug for ViewerConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerConfig")
            .field("object", &self.object)
            .field("prefix", &self.prefix)
            .field("parse_comments", &self.parse_comments)
            .field("source_path", &self.source_path)
            .field("obfuscate_tags", &self.obfuscate_tags)
            .finish_non_exhaustive()
    }
}

impl<'a> ViewerConfig<'a> {
    /// Configuration for an owned object.
    #[must_use]
    pub fn new<T: StructView + 'a>(object: T) -> Self {
        Self::default().object(Object::owned(object))
    }

    /// Configuration for a borrowed object.
    #[must_use]
    pub fn borrowed<T: StructView>(object: &'a T) -> Self {
        Self::default().object(Object::borrowed(object))
    }

    /// Sets the object to inspect.
    #[must_use]
    pub fn object(mut self, object: Object<'a>) -> Self {
        self.object = Some(object);
        self
    }

    /// Sets the environment variable prefix (prepended verbatim).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Merges doc comments from the source file during construction.
    #[must_use]
    pub fn parse_comments(mut self, enabled: bool) -> Self {
        self.parse_comments = enabled;
        self
    }

    /// Sets the source file holding the config structs (default `config.rs`).
    #[must_use]
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }

    /// Replaces the redaction markers (default `{"obfuscate"}`), keeping any paths.
    #[must_use]
    pub fn obfuscate_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.obfuscate_tags
            .set_markers(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a redaction marker.
    #[must_use]
    pub fn obfuscate(mut self, tag: impl Into<String>) -> Self {
        self.obfuscate_tags.insert(tag);
        self
    }

    /// Redacts the field at a dotted JSON path.
    #[must_use]
    pub fn obfuscate_path(mut self, path: impl Into<String>) -> Self {
        self.obfuscate_tags.insert_path(path);
        self
    }

    /// Sets how the source file is read.
    #[must_use]
    pub fn source_reader(mut self, reader: impl SourceReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }
}

// ============================================================================
// Viewer
// ============================================================================

/// Flattened, redacted view of a configuration object.
pub struct Viewer {
    prefix: String,
    envs: Vec<FieldDescriptor>,
    config: Value,
    source_path: PathBuf,
    reader: Box<dyn SourceReader>,
    docs: Option<SourceDocs>,
}

impl fmt::Debug for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("prefix", &self.prefix)
            .field("envs", &self.envs)
            .field("source_path", &self.source_path)
            .field("comments_parsed", &self.docs.is_some())
            .finish_non_exhaustive()
    }
}

impl Viewer {
    /// Builds a viewer.
    ///
    /// # Errors
    ///
    /// - [`Error::NilConfig`] if `config` is `None`
    /// - [`Error::EmptyObject`] if the configuration has no object
    /// - [`Error::InvalidObjectKind`] if the object is not an aggregate
    /// - [`Error::NotAddressable`] if a borrowed object needs redaction
    /// - [`Error::EnvNameCollision`] if two leaves share an env name
    /// - [`Error::SourceParse`] if comment parsing was requested and failed
    pub fn new<'a>(config: impl Into<Option<ViewerConfig<'a>>>) -> Result<Self, Error> {
        let ViewerConfig {
            object,
            prefix,
            parse_comments,
            source_path,
            obfuscate_tags,
            reader,
        } = config.into().ok_or(Error::NilConfig)?;

        let mut object = object.ok_or(Error::EmptyObject)?;
        if !object.get().is_aggregate() {
            return Err(Error::invalid_object_kind(object.get().type_name()));
        }

        match &mut object {
            Object::Owned(value) => {
                let redacted = redact::redact(value.as_mut(), &obfuscate_tags);
                debug!(redacted, "redacted configuration copy");
            }
            Object::Borrowed(value) => {
                if let Some(field) = redact::first_redacted(*value, &obfuscate_tags) {
                    return Err(Error::NotAddressable { field });
                }
            }
        }

        let envs = flatten(object.get(), &prefix, "", &obfuscate_tags)?;
        check_unique_env_names(&envs)?;
        let config = Node::Struct(object.get()).into_json();

        let source_path = if source_path.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_SOURCE_PATH)
        } else {
            source_path
        };

        let mut viewer = Self {
            prefix,
            envs,
            config,
            source_path,
            reader,
            docs: None,
        };

        if parse_comments {
            viewer.parse_comments()?;
        }

        debug!(
            prefix = %viewer.prefix,
            leaves = descriptor::leaves(&viewer.envs).len(),
            "struct viewer ready"
        );

        Ok(viewer)
    }

    /// Loads doc comments from the source file and merges them into the tree.
    ///
    /// The parsed source is cached; calling this again does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceParse`] if the source cannot be read or parsed.
    pub fn parse_comments(&mut self) -> Result<(), Error> {
        if self.docs.is_some() {
            trace!("doc comments already merged");
            return Ok(());
        }

        let docs = SourceDocs::load(self.reader.as_ref(), &self.source_path)?;
        let merged = docs.merge_into(&mut self.envs);
        debug!(source = %self.source_path.display(), merged, "merged doc comments");

        self.docs = Some(docs);
        Ok(())
    }

    /// Whether doc comments have been merged.
    #[must_use]
    pub fn comments_parsed(&self) -> bool {
        self.docs.is_some()
    }

    /// The environment variable prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The source file doc comments are read from.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The descriptor tree.
    #[must_use]
    pub fn envs(&self) -> &[FieldDescriptor] {
        &self.envs
    }

    /// The redacted object as JSON.
    #[must_use]
    pub fn config_json(&self) -> &Value {
        &self.config
    }

    /// Looks up a leaf by dotted JSON path; the empty sentinel on a miss.
    #[must_use]
    pub fn by_json_path(&self, path: &str) -> &FieldDescriptor {
        self.find_by_json_path(path)
            .unwrap_or(FieldDescriptor::empty())
    }

    /// Looks up a leaf by dotted JSON path.
    #[must_use]
    pub fn find_by_json_path(&self, path: &str) -> Option<&FieldDescriptor> {
        if path.is_empty() {
            return None;
        }

        descriptor::search(&self.envs, &|d| d.json_path == path)
    }

    /// Looks up a leaf by environment variable name; the empty sentinel on a miss.
    #[must_use]
    pub fn by_env_name(&self, name: &str) -> &FieldDescriptor {
        self.find_by_env_name(name)
            .unwrap_or(FieldDescriptor::empty())
    }

    /// Looks up a leaf by environment variable name.
    #[must_use]
    pub fn find_by_env_name(&self, name: &str) -> Option<&FieldDescriptor> {
        if name.is_empty() {
            return None;
        }

        descriptor::search(&self.envs, &|d| d.env_name == name)
    }

    /// `ENVNAME=value` lines for every leaf, depth-first.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        descriptor::leaves(&self.envs)
            .into_iter()
            .map(FieldDescriptor::render_line)
            .collect()
    }

    /// The tree as nested maps keyed by `raw_name`.
    #[must_use]
    pub fn as_nested_map(&self) -> BTreeMap<&str, Nested<'_>> {
        descriptor::nested_map(&self.envs)
    }

    /// Leaf values keyed by environment variable name.
    #[must_use]
    pub fn env_map(&self) -> BTreeMap<&str, &Value> {
        descriptor::leaves(&self.envs)
            .into_iter()
            .filter_map(|leaf| Some((leaf.env_name.as_str(), leaf.leaf_value()?)))
            .collect()
    }
}

fn check_unique_env_names(envs: &[FieldDescriptor]) -> Result<(), Error> {
    let label = |d: &FieldDescriptor| {
        if d.json_path.is_empty() {
            d.raw_name.clone()
        } else {
            d.json_path.clone()
        }
    };

    let mut seen: HashMap<&str, &FieldDescriptor> = HashMap::new();
    for leaf in descriptor::leaves(envs) {
        if let Some(first) = seen.insert(&leaf.env_name, leaf) {
            return Err(Error::EnvNameCollision {
                name: leaf.env_name.clone(),
                first: label(first),
                second: label(leaf),
            });
        }
    }

    Ok(())
}
