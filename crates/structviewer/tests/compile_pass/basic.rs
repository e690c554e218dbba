//! Test that a plain struct with nested structs derives cleanly.

use structviewer::{StructView, Viewer, ViewerConfig};

#[derive(StructView, Default)]
pub struct Database {
    pub host: String,
    pub port: u16,
}

#[derive(StructView, Default)]
pub struct Config {
    pub name: String,
    pub database: Database,
    pub debug: bool,
    hidden: u8,
}

fn main() {
    let config = Config {
        hidden: 1,
        ..Config::default()
    };
    let _ = config.hidden;

    let viewer = Viewer::new(ViewerConfig::new(config)).unwrap();
    assert_eq!(viewer.render().len(), 4);
    assert_eq!(viewer.by_env_name("DATABASE_PORT").value_string(), "0");
}
