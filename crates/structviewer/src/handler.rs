//! Framework-agnostic HTTP adapters.
//!
//! Each handler turns viewer state into a [`Response`] carrying a status code
//! and a JSON body, leaving routing and transport to the caller:
//!
//! ```rust,ignore
//! let response = handler::envs_handler(viewer.as_ref(), request.uri().query().unwrap_or(""));
//! http::Response::builder()
//!     .status(response.status)
//!     .header("content-type", handler::CONTENT_TYPE)
//!     .body(response.to_bytes())
//! ```
//!
//! A `None` viewer means construction failed and yields `500`. A lookup
//! miss yields `404`.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::viewer::Viewer;

/// Query key selecting a field by JSON path.
pub const JSON_QUERY_KEY: &str = "field";

/// Query key selecting a field by environment variable name.
pub const ENV_QUERY_KEY: &str = "env";

/// Content type of every response body.
pub const CONTENT_TYPE: &str = "application/json";

/// Status code and JSON body produced by a handler.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,

    /// JSON body.
    pub body: Value,
}

impl Response {
    /// `200 OK`.
    pub const OK: u16 = 200;

    /// `404 Not Found`.
    pub const NOT_FOUND: u16 = 404;

    /// `500 Internal Server Error`.
    pub const INTERNAL_SERVER_ERROR: u16 = 500;

    fn ok(body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self {
                status: Self::OK,
                body,
            },
            Err(err) => {
                warn!(error = %err, "failed to serialise response body");
                Self::error(Self::INTERNAL_SERVER_ERROR, "failed to serialise response")
            }
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn unavailable() -> Self {
        Self::error(Self::INTERNAL_SERVER_ERROR, "struct viewer is not available")
    }

    /// Whether the status is `2xx`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body serialised as JSON bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.body).unwrap_or_default()
    }
}

/// Returns the first non-empty value of `key` in a URL query string.
#[must_use]
pub fn query_param(query: &str, key: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, value)| name == key && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Serves the redacted configuration object.
#[must_use]
pub fn config_handler(viewer: Option<&Viewer>) -> Response {
    let Some(viewer) = viewer else {
        return Response::unavailable();
    };

    Response::ok(viewer.config_json())
}

/// Serves descriptors: one field by `?field=json.path`, or the nested map.
#[must_use]
pub fn detailed_config_handler(viewer: Option<&Viewer>, query: &str) -> Response {
    let Some(viewer) = viewer else {
        return Response::unavailable();
    };

    match query_param(query, JSON_QUERY_KEY) {
        Some(path) => {
            debug!(path = %path, "looking up field by JSON path");
            viewer
                .find_by_json_path(&path)
                .map_or_else(|| Response::error(Response::NOT_FOUND, "field not found"), Response::ok)
        }
        None => Response::ok(viewer.as_nested_map()),
    }
}

/// Serves `ENV=value` lines: one by `?env=NAME`, or all of them.
#[must_use]
pub fn envs_handler(viewer: Option<&Viewer>, query: &str) -> Response {
    let Some(viewer) = viewer else {
        return Response::unavailable();
    };

    match query_param(query, ENV_QUERY_KEY) {
        Some(name) => {
            debug!(env = %name, "looking up field by env name");
            viewer.find_by_env_name(&name).map_or_else(
                || Response::error(Response::NOT_FOUND, "environment variable not found"),
                |descriptor| Response::ok(descriptor.render_line()),
            )
        }
        None => Response::ok(viewer.render()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("field=a.b", "field").as_deref(), Some("a.b"));
        assert_eq!(query_param("?env=APP%5FX", "env").as_deref(), Some("APP_X"));
        assert_eq!(query_param("field=", "field"), None);
        assert_eq!(query_param("", "field"), None);
        assert_eq!(query_param("other=1&field=x", "field").as_deref(), Some("x"));
    }

    #[test]
    fn test_unavailable_viewer() {
        assert_eq!(config_handler(None).status, Response::INTERNAL_SERVER_ERROR);
        assert_eq!(detailed_config_handler(None, "").status, 500);
        assert_eq!(envs_handler(None, "env=X").status, 500);
    }

    #[test]
    fn test_response_bytes() {
        let response = Response::ok(vec!["A=1"]);
        assert!(response.is_success());
        assert_eq!(response.to_bytes(), br#"["A=1"]"#);
    }
}
