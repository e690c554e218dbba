//! Test that generic structs derive with per-field bounds.

use std::collections::BTreeMap;

use structviewer::{StructView, Viewer, ViewerConfig};

#[derive(StructView, Default)]
pub struct Endpoint {
    pub url: String,
}

#[derive(StructView, Default)]
pub struct Registry<T> {
    pub primary: T,
    pub replicas: BTreeMap<String, T>,
}

fn main() {
    let mut registry = Registry::<Endpoint>::default();
    registry
        .replicas
        .insert("eu".into(), Endpoint { url: "https://eu".into() });

    let viewer = Viewer::new(ViewerConfig::new(registry).prefix("REG_")).unwrap();
    assert_eq!(viewer.by_json_path("replicas.eu.url").env_name, "REG_REPLICAS_EU_URL");
    assert_eq!(viewer.render(), ["REG_PRIMARY_URL=''", "REG_REPLICAS_EU_URL=https://eu"]);
}
