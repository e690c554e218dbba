//! Fields rendered through their type's own `FieldValue` impl.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Ident, Type, WherePredicate, parse_quote};

use super::{FieldGenerator, FieldMetaSpec};

/// A field whose type implements `structviewer::FieldValue`.
///
/// Covers scalars, strings, options, collections, maps and nested structs
/// deriving `StructView`; the runtime classifies the value.
pub struct DelegateField {
    pub ident: Ident,
    pub ty: Type,
    pub meta: FieldMetaSpec,
}

impl FieldGenerator for DelegateField {
    fn meta(&self) -> &FieldMetaSpec {
        &self.meta
    }

    fn generate_field(&self) -> QuoteStream {
        let ident = &self.ident;
        let meta = self.meta.to_tokens();

        quote! {
            ::structviewer::Field::new(#meta, ::structviewer::FieldValue::node(&self.#ident))
        }
    }

    fn generate_field_mut(&self) -> QuoteStream {
        let ident = &self.ident;
        let meta = self.meta.to_tokens();

        quote! {
            ::structviewer::FieldMut::new(#meta, ::structviewer::Slot::Value(&mut self.#ident))
        }
    }

    fn where_predicate(&self) -> WherePredicate {
        let ty = &self.ty;
        parse_quote!(#ty: ::structviewer::FieldValue)
    }
}
