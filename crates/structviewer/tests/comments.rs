//! Doc comment merging from source files.
//!
//! The structs below are documented in this file, and the tests read this
//! file back as the configuration source.

#![allow(clippy::pedantic)]

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use structviewer::{Error, SourceDocs, SourceError, StructView, Viewer, ViewerConfig, merge_docs};

const SOURCE: &str = include_str!("comments.rs");

#[derive(StructView, Default)]
pub struct Listener {
    /// Interface to bind.
    #[view(json = "host")]
    pub host: String,

    /// Port to listen on.
    #[view(json = "port")]
    pub port: u16,
}

#[derive(StructView, Default)]
pub struct Upstream {
    /// Upstream host name.
    #[view(json = "host")]
    pub host: String,
}

#[derive(StructView, Default)]
pub struct Service {
    /// Human readable service name.
    #[view(json = "name")]
    pub name: String,

    /// Where the service listens.
    #[view(json = "listen")]
    pub listen: Listener,

    #[view(json = "upstream")]
    pub upstream: Upstream,

    /// Per-route rate limits.
    #[view(json = "limits")]
    pub limits: HashMap<String, u32>,

    pub undocumented: bool,
}

fn source_reader(_: &Path) -> io::Result<String> {
    Ok(SOURCE.to_owned())
}

fn viewer() -> Viewer {
    Viewer::new(
        ViewerConfig::new(Service::default())
            .parse_comments(true)
            .source_reader(source_reader),
    )
    .unwrap()
}

#[test]
fn test_every_documented_leaf_described() {
    let viewer = viewer();

    assert!(viewer.comments_parsed());
    assert_eq!(viewer.by_json_path("name").description, "Human readable service name.");
    assert_eq!(viewer.by_json_path("listen.port").description, "Port to listen on.");
    assert_eq!(viewer.by_env_name("UNDOCUMENTED").description, "");
}

#[test]
fn test_owner_disambiguates_same_field_name() {
    let viewer = viewer();

    assert_eq!(viewer.by_json_path("listen.host").description, "Interface to bind.");
    assert_eq!(viewer.by_json_path("upstream.host").description, "Upstream host name.");
}

#[test]
fn test_branch_description() {
    let viewer = viewer();

    assert_eq!(viewer.envs()[1].description, "Where the service listens.");
    assert_eq!(viewer.envs()[3].description, "Per-route rate limits.");
}

#[test]
fn test_description_serialized() {
    let viewer = viewer();
    let rendered = serde_json::to_value(viewer.by_json_path("listen.port")).unwrap();

    assert_eq!(rendered["description"], "Port to listen on.");
}

#[test]
fn test_comments_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service.rs");
    fs::write(&path, SOURCE).unwrap();

    let viewer = Viewer::new(
        ViewerConfig::new(Service::default())
            .source_path(&path)
            .parse_comments(true),
    )
    .unwrap();

    assert_eq!(viewer.source_path(), path);
    assert_eq!(viewer.by_json_path("listen.port").description, "Port to listen on.");
}

#[test]
fn test_lazy_parse_is_cached() {
    let mut viewer = Viewer::new(
        ViewerConfig::new(Service::default()).source_reader(|_: &Path| -> io::Result<String> {
            Ok(SOURCE.to_owned())
        }),
    )
    .unwrap();

    assert!(!viewer.comments_parsed());
    assert_eq!(viewer.by_json_path("name").description, "");

    viewer.parse_comments().unwrap();
    viewer.parse_comments().unwrap();

    assert_eq!(viewer.by_json_path("name").description, "Human readable service name.");
}

#[test]
fn test_missing_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.rs");

    let err = Viewer::new(
        ViewerConfig::new(Service::default())
            .source_path(&path)
            .parse_comments(true),
    )
    .unwrap_err();

    assert!(matches!(err, Error::SourceParse(SourceError::Read { .. })));
}

#[test]
fn test_invalid_source_text() {
    let err = Viewer::new(
        ViewerConfig::new(Service::default())
            .parse_comments(true)
            .source_reader(|_: &Path| -> io::Result<String> {
                Ok("pub struct Broken {".to_owned())
            }),
    )
    .unwrap_err();

    assert!(matches!(err, Error::SourceParse(SourceError::Parse { .. })));
}

#[test]
fn test_source_docs_entries() {
    let docs = SourceDocs::parse("comments.rs", SOURCE).unwrap();

    assert_eq!(docs.get("Listener", "port"), Some("Port to listen on."));
    assert_eq!(docs.get("Upstream", "host"), Some("Upstream host name."));
    assert_eq!(docs.get("Service", "undocumented"), None);
}

#[test]
fn test_merge_docs_into_dynamic_tree() {
    let object = serde_json::json!({"port": 80});
    let viewer = Viewer::new(ViewerConfig::new(object)).unwrap();
    let mut tree = viewer.envs().to_vec();

    let source = "struct Settings {\n    /// The port.\n    port: u16,\n}\n";
    merge_docs(&mut tree, "settings.rs", source).unwrap();

    assert_eq!(tree[0].description, "The port.");
}
