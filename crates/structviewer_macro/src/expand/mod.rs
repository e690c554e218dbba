//! Code generation orchestration for `StructView` derive macro.
//!
//! The [`Expander`] coordinates the expansion:
//!
//! 1. **Validation** - the input must be a struct with named fields
//! 2. **Parsing** - each visible field becomes a [`FieldGenerator`]
//! 3. **Generation** - the `StructView` and `FieldValue` impls are emitted
//!
//! | Impl | Generator Function |
//! |------|-------------------|
//! | `StructView` | [`view::generate_struct_view_impl`] |
//! | `FieldValue` | [`value::generate_field_value_impl`] |
//!
//! Generic structs get one `where` predicate per visible field type, so a
//! `Wrapper<T>` is only viewable when `T` is.

use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Error as SynError, Field, Fields, Generics, Result as SynResult};

use crate::field::{FieldFactory, FieldGenerator};
use crate::parse::{ContainerAttr, SKIP_TAG};

pub mod value;
pub mod view;

/// The main orchestrator for macro expansion.
pub struct Expander;

impl Expander {
    /// Main entry point for expanding the derive macro.
    pub fn expand(input: &DeriveInput) -> SynResult<TokenStream> {
        let container = ContainerAttr::parse_from_struct(input)?;
        let fields = Self::extract_struct_fields(input)?;

        let mut generators: Vec<Box<dyn FieldGenerator>> = Vec::with_capacity(fields.len());
        let mut tags: HashSet<String> = HashSet::new();

        for field in fields {
            let Some(generator) = FieldFactory::parse_field(field, &container)? else {
                continue;
            };

            let tag = json_tag_name(&generator.meta().json);
            if !tag.is_empty() && tag != SKIP_TAG && !tags.insert(tag.to_owned()) {
                return Err(SynError::new_spanned(
                    field,
                    format!("Duplicate JSON tag `{tag}`; rename one of the fields"),
                ));
            }

            generators.push(generator);
        }

        let generics = Self::bounded_generics(&input.generics, &generators);

        let view_impl = view::generate_struct_view_impl(&input.ident, &generics, &generators);
        let value_impl = value::generate_field_value_impl(&input.ident, &generics);

        let combined = quote! {
            #view_impl
            #value_impl
        };

        Ok(combined.into())
    }

    /// Adds a `where` predicate per field type when the struct is generic.
    fn bounded_generics(generics: &Generics, generators: &[Box<dyn FieldGenerator>]) -> Generics {
        let mut generics = generics.clone();

        if generics.params.is_empty() {
            return generics;
        }

        let where_clause = generics.make_where_clause();
        for generator in generators {
            where_clause.predicates.push(generator.where_predicate());
        }

        generics
    }

    /// Extract named fields from the struct, rejecting invalid types.
    fn extract_struct_fields(input: &DeriveInput) -> SynResult<&Punctuated<Field, Comma>> {
        match &input.data {
            Data::Struct(data_struct) => match &data_struct.fields {
                Fields::Named(fields_named) => Ok(&fields_named.named),

                Fields::Unnamed(_) => Err(SynError::new_spanned(
                    input,
                    "StructView does not support tuple structs",
                )),

                Fields::Unit => Err(SynError::new_spanned(
                    input,
                    "StructView does not support unit structs",
                )),
            },

            Data::Enum(_) => Err(SynError::new_spanned(
                input,
                "StructView can only be derived for structs, not enums; use #[view(opaque)] on enum fields",
            )),

            Data::Union(_) => Err(SynError::new_spanned(
                input,
                "StructView can only be derived for structs, not unions",
            )),
        }
    }
}

/// Tag name without modifiers, as the runtime reads it.
fn json_tag_name(tag: &str) -> &str {
    tag.split(',').next().unwrap_or_default().trim()
}
