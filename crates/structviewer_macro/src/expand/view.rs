//! `StructView` impl generation.
//!
//! ```rust,ignore
//! impl ::structviewer::StructView for Config {
//!     fn type_name(&self) -> &str { "Config" }
//!     fn fields(&self) -> Vec<Field<'_>> { vec![/* one per pub field */] }
//!     fn fields_mut(&mut self) -> Vec<FieldMut<'_>> { vec![/* ... */] }
//! }
//! ```

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Generics, Ident};

use crate::field::FieldGenerator;

/// Generates the `StructView` impl.
pub fn generate_struct_view_impl(
    struct_name: &Ident,
    generics: &Generics,
    generators: &[Box<dyn FieldGenerator>],
) -> QuoteStream {
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
    let type_name = struct_name.unraw().to_string();

    let fields = generators.iter().map(|g| g.generate_field());
    let fields_mut = generators.iter().map(|g| g.generate_field_mut());

    quote! {
        impl #impl_generics ::structviewer::StructView for #struct_name #type_generics #where_clause {
            fn type_name(&self) -> &str {
                #type_name
            }

            fn fields(&self) -> ::std::vec::Vec<::structviewer::Field<'_>> {
                ::std::vec![#(#fields),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::structviewer::FieldMut<'_>> {
                ::std::vec![#(#fields_mut),*]
            }
        }
    }
}
