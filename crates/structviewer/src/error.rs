//! Error types for viewer construction.
//!
//! Every error is returned synchronously from [`Viewer::new`](crate::Viewer::new)
//! (or from [`merge_docs`](crate::merge_docs) when used directly). None of them
//! are retried: each one describes a caller configuration mistake.
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::NilConfig`] | No configuration was supplied |
//! | [`Error::EmptyObject`] | The configuration has no object |
//! | [`Error::InvalidObjectKind`] | The object is not a struct or JSON object |
//! | [`Error::NotAddressable`] | A borrowed object has fields that must be redacted |
//! | [`Error::SourceParse`] | The comment source is unreadable or unparsable |
//! | [`Error::EnvNameCollision`] | Two leaves derive the same environment variable |
//!
//! Lookup misses are not errors; see [`FieldDescriptor::empty`](crate::FieldDescriptor::empty).

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Errors that can occur while building a [`Viewer`](crate::Viewer).
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `structviewer::nil_config` | No configuration supplied |
/// | `structviewer::empty_object` | Configuration without an object |
/// | `structviewer::invalid_object_kind` | Object is not an aggregate |
/// | `structviewer::not_addressable` | Borrowed object needs redaction |
/// | `structviewer::source::*` | Comment source errors |
/// | `structviewer::env_name_collision` | Duplicate environment variable name |
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    /// No configuration was supplied to the viewer.
    #[error("no viewer configuration was supplied")]
    #[diagnostic(
        code(structviewer::nil_config),
        help("pass a ViewerConfig to Viewer::new")
    )]
    NilConfig,

    /// The configuration does not carry an object to inspect.
    #[error("viewer configuration has no object to inspect")]
    #[diagnostic(
        code(structviewer::empty_object),
        help("set the object with ViewerConfig::new or ViewerConfig::object")
    )]
    EmptyObject,

    /// The object is not a struct-like aggregate.
    #[error("cannot inspect `{type_name}`: expected a struct or a JSON object")]
    #[diagnostic(
        code(structviewer::invalid_object_kind),
        help("derive StructView on a struct with named fields, or pass a JSON object")
    )]
    InvalidObjectKind {
        /// Name of the rejected type (or JSON kind for dynamic values).
        type_name: String,
    },

    /// The object was borrowed but some of its fields must be redacted.
    #[error("field `{field}` must be redacted but the object was only borrowed")]
    #[diagnostic(
        code(structviewer::not_addressable),
        help("pass the object by value (ViewerConfig::new) so a private copy can be redacted")
    )]
    NotAddressable {
        /// JSON path (or identifier) of the first field that needs redaction.
        field: String,
    },

    /// The comment source could not be read or parsed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    SourceParse(#[from] SourceError),

    /// Two leaves resolve to the same environment variable name.
    #[error("environment variable {name} is derived from both `{first}` and `{second}`")]
    #[diagnostic(
        code(structviewer::env_name_collision),
        help("give one of the fields a distinct name with #[view(json = \"...\")]")
    )]
    EnvNameCollision {
        /// The duplicated environment variable name.
        name: String,

        /// JSON path (or identifier) of the first leaf.
        first: String,

        /// JSON path (or identifier) of the second leaf.
        second: String,
    },
}

impl Error {
    /// Creates an `InvalidObjectKind` error for the given type name.
    pub fn invalid_object_kind(type_name: impl Into<String>) -> Self {
        Self::InvalidObjectKind {
            type_name: type_name.into(),
        }
    }
}

/// Errors raised while loading doc comments from source text.
///
/// Parse errors carry the full source and a span at the syntax error, so
/// `miette` can render the offending line:
///
/// ```text
/// Error: structviewer::source::parse_error
///   × failed to parse source file config.rs
///    ╭─[config.rs:3:17]
///  3 │     pub port: u16
///    ·                 ┬
///    ·                 ╰── expected `,`
///    ╰────
/// ```
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum SourceError {
    /// The source text could not be read.
    #[error("failed to read source file: {path}")]
    #[diagnostic(
        code(structviewer::source::read_error),
        help("check that the file exists and is readable, or configure a SourceReader")
    )]
    Read {
        /// Path that was requested.
        path: String,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The source text is not valid Rust.
    #[error("failed to parse source file {path}")]
    #[diagnostic(
        code(structviewer::source::parse_error),
        help("the comment source must be a complete Rust file containing the config structs")
    )]
    Parse {
        /// Path (or label) of the source.
        path: String,

        /// The source text for display.
        #[source_code]
        src: NamedSource<String>,

        /// Location of the syntax error.
        #[label("{message}")]
        span: SourceSpan,

        /// What the parser expected.
        message: String,
    },
}

impl SourceError {
    /// Builds a `Parse` error from a `syn` error, locating its span in `content`.
    pub(crate) fn parse(path: &str, content: &str, err: &syn::Error) -> Self {
        let start = err.span().start();
        let offset = line_col_to_offset(content, start.line, start.column);

        Self::Parse {
            path: path.to_owned(),
            src: NamedSource::new(path, content.to_owned()),
            span: offset_to_span(offset, content),
            message: err.to_string(),
        }
    }
}

/// Converts a 1-indexed line and 0-indexed character column to a byte offset.
fn line_col_to_offset(content: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;

    for (index, text) in content.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(column)
                .map_or(text.trim_end_matches('\n').len(), |(byte, _)| byte);
            return offset + within;
        }

        offset += text.len();
    }

    content.len()
}

/// Highlights the token starting at `offset`.
fn offset_to_span(offset: usize, content: &str) -> SourceSpan {
    let offset = offset.min(content.len());
    let remaining = content.get(offset..).unwrap_or_default();
    let len = remaining
        .find(char::is_whitespace)
        .unwrap_or(remaining.len())
        .max(1);

    SourceSpan::new(offset.into(), len.min(remaining.len().max(1)))
}
