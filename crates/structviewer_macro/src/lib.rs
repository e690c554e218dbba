//! # structviewer_macro
//!
//! Procedural macro implementation for the `structviewer` crate.
//!
//! This crate provides `#[derive(StructView)]`, which generates the
//! compile-time field table the runtime flattener walks. It is a proc-macro
//! crate and can only export procedural macros.
//!
//! **Note:** Users should depend on the `structviewer` crate, not this one
//! directly. The `structviewer` crate re-exports this macro along with the
//! runtime traits.
//!
//! # Module Structure
//!
//! - `parse` - Attribute parsing for `#[view(...)]` and serde fallbacks
//! - `field` - Field classification and per-field code generation
//! - `expand` - Expansion orchestration
//!
//! # Generated Code
//!
//! | Impl | Purpose |
//! |------|---------|
//! | `structviewer::StructView` | Enumerates visible fields with their metadata |
//! | `structviewer::FieldValue` | Lets the struct nest inside other views |

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;
mod field;
mod parse;

/// Derive macro exposing a struct's public fields to the `structviewer` runtime.
///
/// # Field Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `json = "name"` | JSON tag; modifiers after `,` are ignored, `"-"` excludes the field from JSON paths |
/// | `obfuscate` | Redact the value (marker `"obfuscate"`) |
/// | `redact = "marker"` | Redact when `marker` is in the viewer's obfuscation set |
/// | `opaque` | Render with `Debug` instead of requiring `FieldValue` |
///
/// # Struct Attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `rename_all = "camelCase"` | Naming rule for fields without an explicit tag |
///
/// Without `json`, `#[serde(rename = "...")]` and `#[serde(skip)]` are
/// honoured, then `#[serde(rename_all = "...")]`, then the identifier itself.
/// Non-`pub` fields are never visited. `SecretString` fields are redacted
/// automatically.
///
/// # Example
///
/// ```rust,ignore
/// use structviewer::StructView;
///
/// #[derive(StructView, Default)]
/// #[view(rename_all = "camelCase")]
/// pub struct Server {
///     /// Port to listen on.
///     pub listen_port: u16,
///
///     #[view(json = "token", obfuscate)]
///     pub api_token: String,
///
///     #[view(opaque)]
///     pub mode: Mode,
///
///     internal_state: u64,
/// }
/// ```
///
/// The struct must implement `Default`, which is used to reset it when an
/// enclosing field is redacted.
#[proc_macro_derive(StructView, attributes(view))]
pub fn derive_struct_view(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::Expander::expand(&input).unwrap_or_else(|err| err.to_compile_error().into())
}
