//! # structviewer
//!
//! Runtime introspection of configuration structs.
//!
//! `structviewer` walks a configuration value and derives, for every leaf
//! field, the environment variable that would name it, the JSON path that
//! addresses it, its current (redacted) value and the doc comment that
//! describes it. Operators use it to discover how a struct maps onto
//! environment variables; tooling uses it to display configuration state
//! without leaking secrets.
//!
//! Rust has no runtime reflection, so the field table is generated at compile
//! time by `#[derive(StructView)]`. Untyped values can be inspected too:
//! [`serde_json::Value`] implements the same traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use structviewer::{StructView, Viewer, ViewerConfig};
//!
//! #[derive(StructView, Default)]
//! struct Database {
//!     /// Connection string.
//!     #[view(json = "url", obfuscate)]
//!     pub url: String,
//!
//!     #[view(json = "pool_size")]
//!     pub pool_size: u32,
//! }
//!
//! #[derive(StructView, Default)]
//! struct Config {
//!     #[view(json = "listen_port")]
//!     pub listen_port: u16,
//!
//!     #[view(json = "db")]
//!     pub db: Database,
//! }
//!
//! let viewer = Viewer::new(ViewerConfig::new(config).prefix("APP_"))?;
//!
//! // ["APP_LISTENPORT=8080", "APP_DB_URL=*REDACTED*", "APP_DB_POOLSIZE=4"]
//! println!("{:?}", viewer.render());
//!
//! assert_eq!(viewer.by_json_path("db.pool_size").env_name, "APP_DB_POOLSIZE");
//! assert_eq!(viewer.by_env_name("APP_DB_URL").json_path, "db.url");
//! ```
//!
//! ## Naming Rules
//!
//! | Field | JSON tag | Env key | JSON path |
//! |-------|----------|---------|-----------|
//! | `listen_port` | *(none)* | `LISTENPORT` | `listen_port` |
//! | `port` | `"http_port,omitempty"` | `HTTPPORT` | `http_port` |
//! | `internal` | `"-"` | `INTERNAL` | *(empty)* |
//!
//! Nested structs join their env keys with `_` and their JSON segments
//! with `.`. Map entries add the stringified key as one more segment.
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `json = "name"` | JSON tag (serde `rename`/`skip` are honoured as fallbacks) |
//! | `obfuscate` | Redact the value before it is exposed |
//! | `redact = "marker"` | Custom redaction marker matched against the viewer's tags |
//! | `opaque` | Render with `Debug` instead of descending into the value |
//!
//! Only `pub` fields are visited; private fields never appear in any output.
//!
//! ## Redaction
//!
//! The viewer redacts a private copy of the object before anything is
//! derived from it. Non-empty strings become [`REDACTED`], other values are
//! reset to their `Default`. Every leaf produced from a redacted field
//! reports `obfuscated == Some(true)`.
//!
//! ## Error Handling
//!
//! Construction errors are reported through [`Error`], which integrates with
//! [`miette`] for rich terminal diagnostics (source comment parse errors point
//! at the offending line).

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// Lets the derive macro's `::structviewer::` paths resolve inside this crate.
extern crate self as structviewer;

// Re-export the derive macro
pub use structviewer_macro::StructView;

/// Re-export `serde_json` so callers can work with leaf values directly.
pub use serde_json;

/// Re-export miette for error handling.
pub use miette;

/// Re-export secrecy when the feature is enabled.
#[cfg(feature = "secrecy")]
pub use secrecy;

#[cfg(feature = "secrecy")]
pub use secrecy::{ExposeSecret, SecretString};

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::{Error, SourceError};

/// A Result type that displays errors with miette's fancy formatting.
///
/// ```rust,ignore
/// fn main() -> structviewer::Result<()> {
///     let viewer = Viewer::new(ViewerConfig::new(config))?;
///     Ok(())
/// }
/// ```
pub type Result<T> = miette::Result<T>;

pub mod naming;

mod view;
pub use view::{Field, FieldMeta, FieldMut, Reset, Slot, StructView};

mod value;
pub use value::{FieldValue, Node, NodeMut, REDACTED};

mod dynamic;

// ============================================================================
// Engine
// ============================================================================

pub mod descriptor;
pub use descriptor::{DescriptorValue, FieldDescriptor, Nested};

pub mod flatten;
pub use flatten::flatten;

pub mod redact;
pub use redact::{OBFUSCATE, ObfuscateTags, redact};

pub mod docs;
pub use docs::{DEFAULT_SOURCE_PATH, FsReader, SourceDocs, SourceReader, merge_docs};

// ============================================================================
// Facade
// ============================================================================

mod viewer;
pub use viewer::{Object, Viewer, ViewerConfig};

pub mod handler;
