//! Doc comment extraction from Rust source text.
//!
//! Doc comments are not available at runtime, so the viewer re-reads the
//! source file that declares the configuration structs, parses it with
//! `syn`, and attaches each field's `///` text to the matching descriptor.
//!
//! ```rust,ignore
//! let viewer = Viewer::new(
//!     ViewerConfig::new(config)
//!         .parse_comments(true)
//!         .source_reader(|_: &Path| -> io::Result<String> { Ok(include_str!("config.rs").to_owned()) }),
//! )?;
//!
//! assert_eq!(viewer.by_json_path("listen_port").description, "Port to listen on.");
//! ```
//!
//! # Matching
//!
//! A documented field `owner.field` is matched, depth-first, against the
//! first descriptor with the same `raw_name` declared by the same struct.
//! When no such descriptor exists, the first descriptor with that `raw_name`
//! and no description yet receives it, so an exact match is never
//! overwritten. Unmatched or undocumented fields are ignored.

use std::fs;
use std::io;
use std::path::Path;

use syn::ext::IdentExt;
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, ExprLit, Lit, Meta};
use tracing::{debug, trace};

use crate::descriptor::{self, FieldDescriptor};
use crate::error::{Error, SourceError};

/// Source file read when no path is configured.
pub const DEFAULT_SOURCE_PATH: &str = "config.rs";

/// Supplies the text of the configuration source file.
pub trait SourceReader: Send + Sync {
    /// Returns the contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source cannot be produced.
    fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Reads source text from the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl<F> SourceReader for F
where
    F: Fn(&Path) -> io::Result<String> + Send + Sync,
{
    fn read_source(&self, path: &Path) -> io::Result<String> {
        self(path)
    }
}

/// One documented field found in source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDoc {
    /// Struct (or enum variant) declaring the field.
    pub owner: String,

    /// Field identifier, raw prefix removed.
    pub field: String,

    /// Doc comment lines, trimmed and joined with `\n`.
    pub text: String,
}

/// Documented fields of a parsed source file, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceDocs {
    entries: Vec<FieldDoc>,
}

impl SourceDocs {
    /// Parses `text` and collects the doc comment of every named field.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Parse`] if `text` is not a valid Rust file.
    pub fn parse(source_name: &str, text: &str) -> Result<Self, SourceError> {
        let file = syn::parse_file(text).map_err(|err| SourceError::parse(source_name, text, &err))?;

        let mut collector = DocCollector::default();
        collector.visit_file(&file);

        debug!(
            source = source_name,
            documented = collector.entries.len(),
            "collected field docs"
        );

        Ok(Self {
            entries: collector.entries,
        })
    }

    /// Reads `path` through `reader` and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Read`] or [`SourceError::Parse`].
    pub fn load(reader: &dyn SourceReader, path: &Path) -> Result<Self, SourceError> {
        let label = path.display().to_string();
        let text = reader
            .read_source(path)
            .map_err(|source| SourceError::Read {
                path: label.clone(),
                source,
            })?;

        Self::parse(&label, &text)
    }

    /// Documented fields in source order.
    #[must_use]
    pub fn entries(&self) -> &[FieldDoc] {
        &self.entries
    }

    /// Doc text of `owner.field`, if documented.
    #[must_use]
    pub fn get(&self, owner: &str, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|doc| doc.owner == owner && doc.field == field)
            .map(|doc| doc.text.as_str())
    }

    /// Sets the `description` of every matching descriptor in `tree`.
    ///
    /// Entries whose owner declares a descriptor in `tree` are merged first.
    /// The remaining entries then fill the first still undescribed descriptor
    /// with the same field name. Returns the number of descriptors updated.
    pub fn merge_into(&self, tree: &mut [FieldDescriptor]) -> usize {
        let mut merged = 0;
        let mut unmatched = Vec::new();

        for doc in &self.entries {
            let exact = |d: &FieldDescriptor| d.raw_name == doc.field && d.owner == doc.owner;

            match descriptor::find_mut(tree, &exact) {
                Some(target) => {
                    trace!(owner = %doc.owner, field = %doc.field, "merged doc comment");
                    target.description.clone_from(&doc.text);
                    merged += 1;
                }
                None => unmatched.push(doc),
            }
        }

        for doc in unmatched {
            let by_name = |d: &FieldDescriptor| d.raw_name == doc.field && d.description.is_empty();

            if let Some(target) = descriptor::find_mut(tree, &by_name) {
                trace!(owner = %doc.owner, field = %doc.field, "merged doc comment by name");
                target.description.clone_from(&doc.text);
                merged += 1;
            }
        }

        merged
    }
}

/// Parses `source_text` and merges its field docs into `tree`.
///
/// # Errors
///
/// Returns [`Error::SourceParse`] if the text is not a valid Rust file.
pub fn merge_docs(
    tree: &mut [FieldDescriptor],
    source_name: &str,
    source_text: &str,
) -> Result<(), Error> {
    SourceDocs::parse(source_name, source_text)?.merge_into(tree);
    Ok(())
}

#[derive(Default)]
struct DocCollector {
    owners: Vec<String>,
    entries: Vec<FieldDoc>,
}

impl<'ast> Visit<'ast> for DocCollector {
    fn visit_item_struct(&mut self, item: &'ast syn::ItemStruct) {
        self.owners.push(item.ident.unraw().to_string());
        visit::visit_item_struct(self, item);
        self.owners.pop();
    }

    fn visit_variant(&mut self, variant: &'ast syn::Variant) {
        self.owners.push(variant.ident.unraw().to_string());
        visit::visit_variant(self, variant);
        self.owners.pop();
    }

    fn visit_field(&mut self, field: &'ast syn::Field) {
        if let Some(ident) = &field.ident
            && let Some(text) = extract_doc_comment(&field.attrs)
        {
            self.entries.push(FieldDoc {
                owner: self.owners.last().cloned().unwrap_or_default(),
                field: ident.unraw().to_string(),
                text,
            });
        }

        visit::visit_field(self, field);
    }
}

/// Joins the trimmed `#[doc]` lines of `attrs` with `\n`.
///
/// Leading and trailing blank lines are dropped and runs of blank lines
/// collapse into one.
fn extract_doc_comment(attrs: &[Attribute]) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }

        if let Meta::NameValue(meta) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) = &meta.value
        {
            for line in lit_str.value().lines() {
                let line = line.trim();
                let blank_run = line.is_empty() && lines.last().is_none_or(String::is_empty);
                if !blank_run {
                    lines.push(line.to_owned());
                }
            }
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}
