//! Naming rules shared by the flattener and the redaction pass.
//!
//! A field contributes two names:
//!
//! - its **env key**, the identifier (or JSON tag name when one is present and
//!   not the skip sentinel `-`) with underscores removed and upper-cased;
//! - its **JSON segment**, the tag name with modifiers stripped, or empty when
//!   the tag is missing or `-`.
//!
//! ```rust
//! use structviewer::naming;
//!
//! assert_eq!(naming::env_key("listen_port", None), "LISTENPORT");
//! assert_eq!(naming::env_key("port", Some("http_port,omitempty")), "HTTPPORT");
//! assert_eq!(naming::json_segment(Some("http_port,omitempty")), "http_port");
//! assert_eq!(naming::join_path("db", "url"), "db.url");
//! ```

/// JSON tag that excludes a field from JSON addressing.
pub const SKIP_TAG: &str = "-";

/// Returns the tag name: everything before the first `,`, trimmed.
#[must_use]
pub fn tag_name(tag: &str) -> &str {
    tag.split(',').next().unwrap_or_default().trim()
}

/// Removes underscores and upper-cases the rest.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Derives a field's own contribution to its environment variable name.
#[must_use]
pub fn env_key(raw_name: &str, json: Option<&str>) -> String {
    let name = json
        .map(tag_name)
        .filter(|name| !name.is_empty() && *name != SKIP_TAG)
        .unwrap_or(raw_name);

    normalize(name)
}

/// Returns the JSON path segment for a tag, empty for missing or skipped tags.
#[must_use]
pub fn json_segment(json: Option<&str>) -> &str {
    match json.map(tag_name) {
        Some(name) if name != SKIP_TAG => name,
        _ => "",
    }
}

/// Joins a JSON prefix and a segment with exactly one `.` and no leading dot.
#[must_use]
pub fn join_path(prefix: &str, segment: &str) -> String {
    let prefix = prefix.trim_end_matches('.');
    let segment = segment.trim_start_matches('.');

    match (prefix.is_empty(), segment.is_empty()) {
        (true, _) => segment.to_owned(),
        (false, true) => prefix.to_owned(),
        (false, false) => format!("{prefix}.{segment}"),
    }
}

/// Path of a child under `prefix`, or `None` when either side is excluded.
pub(crate) fn child_path(prefix: Option<&str>, segment: &str) -> Option<String> {
    let prefix = prefix?;

    if segment.is_empty() {
        return None;
    }

    Some(join_path(prefix, segment))
}
