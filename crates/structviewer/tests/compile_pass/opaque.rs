//! Test that opaque fields only need `Debug + Default`.

use std::net::{IpAddr, Ipv4Addr};

use structviewer::{StructView, Viewer, ViewerConfig};

#[derive(Debug, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug)]
pub struct Bind(IpAddr);

impl Default for Bind {
    fn default() -> Self {
        Self(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

#[derive(StructView, Default)]
pub struct Config {
    #[view(opaque)]
    pub format: LogFormat,

    #[view(opaque, json = "bind")]
    pub bind: Bind,
}

fn main() {
    let config = Config {
        format: LogFormat::Json,
        ..Config::default()
    };

    let viewer = Viewer::new(ViewerConfig::new(config)).unwrap();
    assert_eq!(viewer.by_env_name("FORMAT").value_string(), "Json");
    assert_eq!(viewer.by_json_path("bind").value_string(), "Bind(127.0.0.1)");
}
