//! Test that every `#[view]` option is accepted.

use structviewer::{StructView, Viewer, ViewerConfig};

#[derive(StructView, Default)]
#[view(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    #[view(json = "listen_port,omitempty")]
    pub port: u16,

    #[view(json = "-")]
    pub internal: String,

    #[view(obfuscate)]
    pub token: String,

    #[view(redact = "pii")]
    pub email: String,

    pub log_level: String,
}

fn main() {
    let viewer = Viewer::new(ViewerConfig::new(Config::default()).obfuscate("pii")).unwrap();

    assert_eq!(viewer.by_json_path("listen_port").env_name, "LISTENPORT");
    assert_eq!(viewer.by_json_path("LOG_LEVEL").env_name, "LOGLEVEL");
    assert_eq!(viewer.by_env_name("INTERNAL").json_path, "");
    assert_eq!(viewer.by_env_name("TOKEN").obfuscated, Some(true));
    assert_eq!(viewer.by_env_name("EMAIL").obfuscated, Some(true));
}
