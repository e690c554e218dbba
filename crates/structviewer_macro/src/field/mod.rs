//! Field classification and per-field code generation.
//!
//! Each visible field becomes a [`FieldGenerator`] trait object that knows how
//! to emit its entry in `fields()` and `fields_mut()` and which `where`
//! predicate its type needs.
//!
//! | Type | Attribute | Rendering |
//! |------|-----------|-----------|
//! | [`DelegateField`] | *(default)* | Through the field type's `FieldValue` impl |
//! | [`OpaqueField`] | `opaque` | `Debug` string; reset with `Default` |
//!
//! ```text
//! syn::Field ──► FieldFactory::parse_field ──► Option<Box<dyn FieldGenerator>>
//!                                                  │
//!                              ┌───────────────────┼───────────────────┐
//!                              ▼                   ▼                   ▼
//!                        generate_field   generate_field_mut   where_predicate
//! ```
//!
//! Fields with inherited (private) visibility produce no generator at all.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Error as SynError, Field, GenericArgument, PathArguments, Result as SynResult, Type,
    Visibility, WherePredicate,
};

use crate::parse::{
    ContainerAttr, OBFUSCATE_MARKER, Parser, SerdeAttr, has_view_attr, resolve_json_tag,
};

mod delegate;
mod opaque;

pub use delegate::DelegateField;
pub use opaque::OpaqueField;

// ============================================================================
// FieldMeta - compile-time metadata
// ============================================================================

/// Metadata emitted as a `structviewer::FieldMeta` constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMetaSpec {
    /// Identifier with the raw prefix removed.
    pub name: String,

    /// Resolved JSON tag.
    pub json: String,

    /// Redaction marker, if any.
    pub redact: Option<String>,
}

impl FieldMetaSpec {
    /// Tokens constructing the runtime `FieldMeta`.
    pub fn to_tokens(&self) -> QuoteStream {
        let name = &self.name;
        let json = &self.json;
        let redact = match &self.redact {
            Some(marker) => quote! { ::core::option::Option::Some(#marker) },
            None => quote! { ::core::option::Option::None },
        };

        quote! {
            ::structviewer::FieldMeta::new(#name, ::core::option::Option::Some(#json), #redact)
        }
    }
}

// ============================================================================
// FieldGenerator Trait
// ============================================================================

/// Code generation strategy for one visible field.
pub trait FieldGenerator {
    /// Compile-time metadata.
    fn meta(&self) -> &FieldMetaSpec;

    /// Expression producing a `structviewer::Field` from `&self`.
    fn generate_field(&self) -> QuoteStream;

    /// Expression producing a `structviewer::FieldMut` from `&mut self`.
    fn generate_field_mut(&self) -> QuoteStream;

    /// Bound the field type needs when the struct is generic.
    fn where_predicate(&self) -> WherePredicate;
}

// ============================================================================
// FieldFactory
// ============================================================================

/// Parses fields into generators.
pub struct FieldFactory;

impl FieldFactory {
    /// Classifies `field`, returning `None` for private fields.
    pub fn parse_field(
        field: &Field,
        container: &ContainerAttr,
    ) -> SynResult<Option<Box<dyn FieldGenerator>>> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| SynError::new_spanned(field, "Expected named field"))?;

        if matches!(field.vis, Visibility::Inherited) {
            if has_view_attr(field) {
                return Err(SynError::new_spanned(
                    &ident,
                    format!("`#[view]` has no effect on private field `{ident}`; make it `pub`"),
                ));
            }
            return Ok(None);
        }

        let view = Parser::parse_field_attr(field)?;
        let serde = SerdeAttr::parse_field(field)?;

        let name = ident.unraw().to_string();
        let json = resolve_json_tag(&view, &serde, container, &name);
        let redact = view.redact.clone().or_else(|| {
            Self::is_secret_string(&field.ty).then(|| OBFUSCATE_MARKER.to_owned())
        });

        let meta = FieldMetaSpec { name, json, redact };
        let ty = field.ty.clone();

        if view.opaque {
            return Ok(Some(Box::new(OpaqueField { ident, ty, meta })));
        }

        Ok(Some(Box::new(DelegateField { ident, ty, meta })))
    }

    /// Whether `ty` is `SecretString`, possibly wrapped in `Option`.
    pub fn is_secret_string(ty: &Type) -> bool {
        let ty = Self::extract_option_inner(ty).unwrap_or(ty);

        let Type::Path(type_path) = ty else {
            return false;
        };

        type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "SecretString")
    }

    /// Extracts `T` from `Option<T>`.
    pub fn extract_option_inner(ty: &Type) -> Option<&Type> {
        let Type::Path(type_path) = ty else {
            return None;
        };

        let segment = type_path.path.segments.last()?;
        if segment.ident != "Option" {
            return None;
        }

        let PathArguments::AngleBracketed(args) = &segment.arguments else {
            return None;
        };

        let GenericArgument::Type(inner) = args.args.first()? else {
            return None;
        };

        Some(inner)
    }
}
