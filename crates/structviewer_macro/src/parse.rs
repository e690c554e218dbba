//! Attribute parsing for `StructView` derive macro.
//!
//! Two attribute sources are read:
//!
//! - `#[view(...)]` on fields and on the struct, which is authoritative
//! - `#[serde(...)]`, read only as a fallback for JSON naming so that a
//!   struct already annotated for serde needs no duplicate tags
//!
//! # Field Options
//!
//! | Option | Form | Meaning |
//! |--------|------|---------|
//! | `json` | `json = "name,omitempty"` | JSON tag |
//! | `obfuscate` | flag | Redaction marker `"obfuscate"` |
//! | `redact` | `redact = "marker"` | Custom redaction marker |
//! | `opaque` | flag | Render with `Debug` |
//!
//! # Struct Options
//!
//! | Option | Form | Meaning |
//! |--------|------|---------|
//! | `rename_all` | `rename_all = "camelCase"` | Default naming rule |

use std::collections::HashSet;

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, DeriveInput, Error as SynError, Expr, Field, LitStr, Result as SynResult, Token,
    parenthesized, token,
};

/// Marker set by `#[view(obfuscate)]`.
pub const OBFUSCATE_MARKER: &str = "obfuscate";

/// JSON tag that excludes a field from JSON addressing.
pub const SKIP_TAG: &str = "-";

// ============================================================================
// Rename rules
// ============================================================================

/// Naming rule applied to field identifiers without an explicit JSON tag.
///
/// Accepts the same spellings as serde's `rename_all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    const SUPPORTED: &'static str = "lowercase, UPPERCASE, PascalCase, camelCase, snake_case, \
         SCREAMING_SNAKE_CASE, kebab-case, SCREAMING-KEBAB-CASE";

    /// Parses a serde-style rule name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            _ => return None,
        })
    }

    /// Applies the rule to a snake_case identifier.
    pub fn apply(self, ident: &str) -> String {
        match self {
            Self::Lower => ident.to_ascii_lowercase(),
            Self::Upper => ident.to_ascii_uppercase(),
            Self::Pascal => ident.to_upper_camel_case(),
            Self::Camel => ident.to_lower_camel_case(),
            Self::Snake => ident.to_snake_case(),
            Self::ScreamingSnake => ident.to_shouty_snake_case(),
            Self::Kebab => ident.to_kebab_case(),
            Self::ScreamingKebab => ident.to_shouty_kebab_case(),
        }
    }

    fn parse_lit(lit: &LitStr) -> SynResult<Self> {
        Self::from_name(&lit.value()).ok_or_else(|| {
            SynError::new_spanned(
                lit,
                format!("Unknown rename rule `{}`. Supported: {}", lit.value(), Self::SUPPORTED),
            )
        })
    }
}

// ============================================================================
// Field attributes
// ============================================================================

/// Parsed `#[view(...)]` options of one field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewAttr {
    /// Explicit JSON tag.
    pub json: Option<String>,

    /// Redaction marker.
    pub redact: Option<String>,

    /// Render with `Debug`.
    pub opaque: bool,
}

/// Accumulates field options across all `#[view(...)]` attributes.
#[derive(Default)]
pub struct Parser {
    json: Option<String>,
    redact: Option<String>,
    obfuscate: bool,
    opaque: bool,

    /// Options already seen, for duplicate detection.
    seen: HashSet<&'static str>,
}

impl Parser {
    #[expect(
        clippy::needless_pass_by_value,
        reason = "ParseNestedMeta is passed by value per syn's parse_nested_meta callback signature"
    )]
    fn parse_meta(&mut self, meta: ParseNestedMeta) -> SynResult<()> {
        let ident = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("Expected identifier"))?;
        let name = ident.to_string();

        let key: &'static str = match name.as_str() {
            "json" => "json",
            "obfuscate" => "obfuscate",
            "redact" => "redact",
            "opaque" => "opaque",
            "rename_all" => {
                return Err(meta.error("`rename_all` is a struct-level option"));
            }
            _ => return Err(meta.error(format!("Unknown option `{name}`"))),
        };

        if !self.seen.insert(key) {
            return Err(meta.error(format!("Duplicate option: `{key}`")));
        }

        match key {
            "json" => {
                let lit_str: LitStr = meta.value()?.parse()?;
                self.json = Some(lit_str.value());
            }

            "redact" => {
                let lit_str: LitStr = meta.value()?.parse()?;
                if lit_str.value().is_empty() {
                    return Err(SynError::new_spanned(lit_str, "Redaction marker cannot be empty"));
                }
                self.redact = Some(lit_str.value());
            }

            "obfuscate" => self.obfuscate = true,

            "opaque" => self.opaque = true,

            _ => unreachable!(),
        }

        Ok(())
    }

    fn build(self, field: &Field) -> SynResult<ViewAttr> {
        if self.obfuscate && self.redact.is_some() {
            return Err(SynError::new_spanned(
                field,
                "Cannot use both `obfuscate` and `redact` on the same field",
            ));
        }

        let redact = if self.obfuscate {
            Some(OBFUSCATE_MARKER.to_owned())
        } else {
            self.redact
        };

        Ok(ViewAttr {
            json: self.json,
            redact,
            opaque: self.opaque,
        })
    }

    /// Parses every `#[view(...)]` attribute on `field`.
    pub fn parse_field_attr(field: &Field) -> SynResult<ViewAttr> {
        let mut parser = Self::default();

        for attr in view_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| parser.parse_meta(meta))?;
        }

        parser.build(field)
    }
}

/// Whether `field` carries any `#[view(...)]` attribute.
pub fn has_view_attr(field: &Field) -> bool {
    view_attrs(&field.attrs).next().is_some()
}

fn view_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("view"))
}

// ============================================================================
// Serde fallbacks
// ============================================================================

/// The subset of `#[serde(...)]` field options that affects JSON naming.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerdeAttr {
    /// `rename = "..."` (or `rename(serialize = "...")`).
    pub rename: Option<String>,

    /// `skip` or `skip_serializing`.
    pub skip: bool,
}

impl SerdeAttr {
    /// Reads the naming-related serde options of `field`, ignoring the rest.
    pub fn parse_field(field: &Field) -> SynResult<Self> {
        let mut result = Self::default();

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    result.rename = parse_serialize_name(&meta)?;
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    result.skip = true;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

/// Reads `key = "name"` or `key(serialize = "name", ...)`.
fn parse_serialize_name(meta: &ParseNestedMeta) -> SynResult<Option<String>> {
    if meta.input.peek(Token![=]) {
        let lit_str: LitStr = meta.value()?.parse()?;
        return Ok(Some(lit_str.value()));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            let lit_str: LitStr = inner.value()?.parse()?;
            name = Some(lit_str.value());
        } else {
            skip_meta_value(&inner)?;
        }
        Ok(())
    })?;

    Ok(name)
}

/// Consumes the value of an option this crate does not interpret.
fn skip_meta_value(meta: &ParseNestedMeta) -> SynResult<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }

    Ok(())
}

// ============================================================================
// Struct attributes
// ============================================================================

/// Parsed struct-level options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContainerAttr {
    /// Naming rule for untagged fields.
    pub rename_all: Option<RenameRule>,
}

impl ContainerAttr {
    /// Parses `#[view(rename_all = "...")]`, falling back to serde's `rename_all`.
    pub fn parse_from_struct(input: &DeriveInput) -> SynResult<Self> {
        let mut view_rule = None;
        let mut serde_rule = None;

        for attr in view_attrs(&input.attrs) {
            attr.parse_nested_meta(|meta| {
                if !meta.path.is_ident("rename_all") {
                    return Err(meta.error("Unknown struct option; expected `rename_all`"));
                }
                if view_rule.is_some() {
                    return Err(meta.error("Duplicate option: `rename_all`"));
                }

                let lit_str: LitStr = meta.value()?.parse()?;
                view_rule = Some(RenameRule::parse_lit(&lit_str)?);
                Ok(())
            })?;
        }

        for attr in input.attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(name) = parse_serialize_name(&meta)? {
                        serde_rule = RenameRule::from_name(&name);
                    }
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            })?;
        }

        Ok(Self {
            rename_all: view_rule.or(serde_rule),
        })
    }

    /// Default JSON name of a field with identifier `ident`.
    pub fn default_json_name(&self, ident: &str) -> String {
        self.rename_all
            .map_or_else(|| ident.to_owned(), |rule| rule.apply(ident))
    }
}

/// Resolves a field's JSON tag: explicit `view(json)`, then serde skip and
/// rename, then the container rule applied to the identifier.
pub fn resolve_json_tag(
    view: &ViewAttr,
    serde: &SerdeAttr,
    container: &ContainerAttr,
    ident: &str,
) -> String {
    if let Some(json) = &view.json {
        return json.clone();
    }

    if serde.skip {
        return SKIP_TAG.to_owned();
    }

    serde
        .rename
        .clone()
        .unwrap_or_else(|| container.default_json_name(ident))
}
