//! Fields marked `#[view(opaque)]`.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Ident, Type, WherePredicate, parse_quote};

use super::{FieldGenerator, FieldMetaSpec};

/// A field rendered with `Debug` and never descended into.
///
/// Used for types that have no `FieldValue` impl (enums, foreign types) or
/// for aggregates that should appear as a single leaf. Redaction resets the
/// value with `Default`.
pub struct OpaqueField {
    pub ident: Ident,
    pub ty: Type,
    pub meta: FieldMetaSpec,
}

impl FieldGenerator for OpaqueField {
    fn meta(&self) -> &FieldMetaSpec {
        &self.meta
    }

    fn generate_field(&self) -> QuoteStream {
        let ident = &self.ident;
        let meta = self.meta.to_tokens();

        quote! {
            ::structviewer::Field::new(#meta, ::structviewer::Node::opaque(&self.#ident))
        }
    }

    fn generate_field_mut(&self) -> QuoteStream {
        let ident = &self.ident;
        let meta = self.meta.to_tokens();

        quote! {
            ::structviewer::FieldMut::new(#meta, ::structviewer::Slot::Opaque(&mut self.#ident))
        }
    }

    fn where_predicate(&self) -> WherePredicate {
        let ty = &self.ty;
        parse_quote!(#ty: ::core::fmt::Debug + ::core::default::Default)
    }
}
