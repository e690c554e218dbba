//! Test that serde naming attributes are honoured without `#[view]`.

use serde::Serialize;
use structviewer::{StructView, Viewer, ViewerConfig};

#[derive(Serialize, StructView, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub listen_port: u16,

    #[serde(rename = "url")]
    pub database_url: String,

    #[serde(skip_serializing)]
    pub cache_dir: String,

    #[view(json = "explicit")]
    #[serde(rename = "ignored")]
    pub overridden: bool,
}

fn main() {
    let viewer = Viewer::new(ViewerConfig::new(Config::default())).unwrap();

    assert_eq!(viewer.by_json_path("listenPort").env_name, "LISTENPORT");
    assert_eq!(viewer.by_json_path("url").env_name, "URL");
    assert_eq!(viewer.by_json_path("explicit").env_name, "EXPLICIT");
}
