//! Test that `SecretString` fields are redacted without any attribute.

use structviewer::{SecretString, StructView, Viewer, ViewerConfig};

#[derive(StructView)]
pub struct Config {
    pub api_token: SecretString,
    pub fallback: Option<SecretString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: SecretString::from(""),
            fallback: None,
        }
    }
}

fn main() {
    let config = Config {
        api_token: SecretString::from("token"),
        fallback: None,
    };

    let viewer = Viewer::new(ViewerConfig::new(config)).unwrap();
    assert_eq!(viewer.by_env_name("APITOKEN").obfuscated, Some(true));
    assert_eq!(viewer.by_env_name("APITOKEN").value_string(), structviewer::REDACTED);
}
