//! `FieldValue` impl generation, so derived structs can nest.
//!
//! A nested struct is an aggregate node; redacting it as a whole resets it
//! to `Default`.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Generics, Ident, parse_quote};

/// Generates the `FieldValue` impl.
pub fn generate_field_value_impl(struct_name: &Ident, generics: &Generics) -> QuoteStream {
    let mut generics = generics.clone();

    if !generics.params.is_empty() {
        let (_, type_generics, _) = generics.split_for_impl();
        let self_ty: syn::Type = parse_quote!(#struct_name #type_generics);
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#self_ty: ::core::default::Default));
    }

    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics ::structviewer::FieldValue for #struct_name #type_generics #where_clause {
            fn node(&self) -> ::structviewer::Node<'_> {
                ::structviewer::Node::Struct(self)
            }

            fn node_mut(&mut self) -> ::structviewer::NodeMut<'_> {
                ::structviewer::NodeMut::Struct(self)
            }

            fn obfuscate(&mut self) {
                *self = <Self as ::core::default::Default>::default();
            }
        }
    }
}
