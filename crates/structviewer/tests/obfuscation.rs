//! Redaction of sensitive fields.
//!
//! Exercises redaction markers, path-based redaction, inheritance into nested
//! aggregates and the borrowed-object guard.

#![allow(clippy::pedantic)]

use std::collections::HashMap;

use serde_json::json;
use structviewer::{Error, REDACTED, StructView, Viewer, ViewerConfig};

#[derive(StructView, Default, Clone)]
pub struct Database {
    #[view(json = "host")]
    pub host: String,

    #[view(json = "password", obfuscate)]
    pub password: String,

    #[view(json = "pool")]
    pub pool: u32,
}

#[derive(StructView, Default, Clone)]
pub struct Credentials {
    #[view(json = "user")]
    pub user: String,

    #[view(json = "key_id")]
    pub key_id: u64,
}

#[derive(StructView, Default, Clone)]
pub struct AppConfig {
    #[view(json = "name")]
    pub name: String,

    #[view(json = "secret", obfuscate)]
    pub secret: String,

    #[view(json = "retries", obfuscate)]
    pub retries: u8,

    #[view(json = "db")]
    pub db: Database,

    #[view(json = "creds", obfuscate)]
    pub creds: Credentials,

    #[view(json = "api_key", redact = "sensitive")]
    pub api_key: String,

    #[view(json = "tokens")]
    pub tokens: HashMap<String, String>,
}

fn app_config() -> AppConfig {
    AppConfig {
        name: "gateway".into(),
        secret: "hunter2".into(),
        retries: 3,
        db: Database {
            host: "localhost".into(),
            password: "pa55".into(),
            pool: 8,
        },
        creds: Credentials {
            user: "admin".into(),
            key_id: 42,
        },
        api_key: "abc".into(),
        tokens: HashMap::from([
            ("internal".to_owned(), "t1".to_owned()),
            ("public".to_owned(), "t2".to_owned()),
        ]),
    }
}

// ============================================================================
// Markers
// ============================================================================

#[test]
fn test_marked_string_is_replaced() {
    let viewer = Viewer::new(ViewerConfig::new(app_config())).unwrap();
    let secret = viewer.by_json_path("secret");

    assert_eq!(secret.leaf_value(), Some(&json!(REDACTED)));
    assert_eq!(secret.obfuscated, Some(true));
    assert_eq!(viewer.by_json_path("name").obfuscated, Some(false));
}

#[test]
fn test_empty_string_stays_empty_but_flagged() {
    let value = AppConfig {
        secret: String::new(),
        ..app_config()
    };
    let viewer = Viewer::new(ViewerConfig::new(value)).unwrap();
    let secret = viewer.by_json_path("secret");

    assert_eq!(secret.leaf_value(), Some(&json!("")));
    assert_eq!(secret.value_string(), "''");
    assert_eq!(secret.obfuscated, Some(true));
}

#[test]
fn test_marked_number_is_zeroed() {
    let viewer = Viewer::new(ViewerConfig::new(app_config())).unwrap();
    assert_eq!(viewer.by_json_path("retries").leaf_value(), Some(&json!(0)));
}

#[test]
fn test_nested_marker() {
    let viewer = Viewer::new(ViewerConfig::new(app_config())).unwrap();

    assert_eq!(viewer.by_env_name("DB_PASSWORD").value_string(), REDACTED);
    assert_eq!(viewer.by_env_name("DB_HOST").value_string(), "localhost");
    assert_eq!(viewer.by_env_name("DB_POOL").value_string(), "8");
}

#[test]
fn test_marked_aggregate_is_reset_and_inherited() {
    let viewer = Viewer::new(ViewerConfig::new(app_config())).unwrap();

    let user = viewer.by_json_path("creds.user");
    assert_eq!(user.value_string(), "''");
    assert_eq!(user.obfuscated, Some(true));

    let key_id = viewer.by_json_path("creds.key_id");
    assert_eq!(key_id.leaf_value(), Some(&json!(0)));
    assert_eq!(key_id.obfuscated, Some(true));
}

#[test]
fn test_custom_marker_requires_configuration() {
    let viewer = Viewer::new(ViewerConfig::new(app_config())).unwrap();
    assert_eq!(viewer.by_json_path("api_key").value_string(), "abc");

    let viewer = Viewer::new(ViewerConfig::new(app_config()).obfuscate("sensitive")).unwrap();
    assert_eq!(viewer.by_json_path("api_key").value_string(), REDACTED);
}

#[test]
fn test_replacing_tags_drops_default_marker() {
    let viewer =
        Viewer::new(ViewerConfig::new(app_config()).obfuscate_tags(["sensitive"])).unwrap();

    assert_eq!(viewer.by_json_path("secret").value_string(), "hunter2");
    assert_eq!(viewer.by_json_path("api_key").value_string(), REDACTED);
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_redact_by_path() {
    let viewer = Viewer::new(ViewerConfig::new(app_config()).obfuscate_path("db.host")).unwrap();
    let host = viewer.by_json_path("db.host");

    assert_eq!(host.value_string(), REDACTED);
    assert_eq!(host.obfuscated, Some(true));
}

#[test]
fn test_redact_map_entry_by_path() {
    let viewer =
        Viewer::new(ViewerConfig::new(app_config()).obfuscate_path("tokens.internal")).unwrap();

    assert_eq!(viewer.by_json_path("tokens.internal").value_string(), REDACTED);
    assert_eq!(viewer.by_json_path("tokens.internal").obfuscated, Some(true));
    assert_eq!(viewer.by_json_path("tokens.public").value_string(), "t2");
}

#[test]
fn test_redact_dynamic_object_by_path() {
    let object = json!({"auth": {"token": "t", "ttl": 60}});
    let viewer = Viewer::new(ViewerConfig::new(object).obfuscate_path("auth.token")).unwrap();

    assert_eq!(viewer.by_env_name("AUTH_TOKEN").value_string(), REDACTED);
    assert_eq!(viewer.by_env_name("AUTH_TTL").value_string(), "60");
    assert_eq!(
        viewer.config_json(),
        &json!({"auth": {"token": REDACTED, "ttl": 60}})
    );
}

// ============================================================================
// Exposure
// ============================================================================

#[test]
fn test_secrets_never_rendered() {
    let viewer = Viewer::new(ViewerConfig::new(app_config())).unwrap();

    let lines = viewer.render().join("\n");
    assert!(!lines.contains("hunter2"));
    assert!(!lines.contains("pa55"));
    assert!(!lines.contains("admin"));

    let json = viewer.config_json().to_string();
    assert!(!json.contains("hunter2"));
    assert!(!json.contains("pa55"));
}

#[derive(StructView, Default, Clone)]
pub struct Login {
    #[view(json = "user")]
    pub user: String,

    #[view(json = "password", obfuscate)]
    pub password: String,
}

#[derive(StructView, Default, Clone)]
pub struct Accounts {
    #[view(json = "logins")]
    pub logins: Vec<Login>,

    #[view(json = "by_region")]
    pub by_region: HashMap<String, Vec<Login>>,
}

fn accounts() -> Accounts {
    let login = Login {
        user: "u".into(),
        password: "hunter2".into(),
    };

    Accounts {
        logins: vec![login.clone()],
        by_region: HashMap::from([("eu".to_owned(), vec![login])]),
    }
}

#[test]
fn test_marker_inside_sequence_elements() {
    let viewer = Viewer::new(ViewerConfig::new(accounts())).unwrap();

    assert_eq!(
        viewer.by_json_path("logins").leaf_value(),
        Some(&json!([{"user": "u", "password": REDACTED}]))
    );
    assert_eq!(
        viewer.by_json_path("by_region.eu").leaf_value(),
        Some(&json!([{"user": "u", "password": REDACTED}]))
    );

    assert!(!viewer.render().join("\n").contains("hunter2"));
    assert!(!viewer.config_json().to_string().contains("hunter2"));
}

#[test]
fn test_borrowed_sequence_with_marker() {
    let value = accounts();
    let err = Viewer::new(ViewerConfig::borrowed(&value)).unwrap_err();

    let Error::NotAddressable { field } = err else {
        panic!("expected a not addressable error");
    };
    assert_eq!(field, "password");
}

#[test]
fn test_marker_does_not_match_path() {
    #[derive(StructView, Default)]
    struct Flags {
        #[view(json = "obfuscate")]
        pub obfuscate: bool,

        #[view(json = "sensitive")]
        pub sensitive: String,
    }

    let value = Flags {
        obfuscate: true,
        sensitive: "visible".into(),
    };
    let viewer = Viewer::new(ViewerConfig::new(value).obfuscate("sensitive")).unwrap();

    assert_eq!(viewer.by_json_path("obfuscate").leaf_value(), Some(&json!(true)));
    assert_eq!(viewer.by_json_path("obfuscate").obfuscated, Some(false));
    assert_eq!(viewer.by_json_path("sensitive").value_string(), "visible");
}

#[test]
fn test_caller_copy_untouched() {
    let original = app_config();
    let viewer = Viewer::new(ViewerConfig::new(original.clone())).unwrap();

    assert_eq!(viewer.by_json_path("secret").value_string(), REDACTED);
    assert_eq!(original.secret, "hunter2");
    assert_eq!(original.db.password, "pa55");
}

#[test]
fn test_borrowed_object_needing_redaction() {
    let original = app_config();
    let err = Viewer::new(ViewerConfig::borrowed(&original)).unwrap_err();

    let Error::NotAddressable { field } = err else {
        panic!("expected a not addressable error");
    };
    assert_eq!(field, "secret");
}

#[test]
fn test_borrowed_object_without_markers() {
    let original = app_config();
    let viewer = Viewer::new(ViewerConfig::borrowed(&original).obfuscate_tags(Vec::<String>::new()))
        .unwrap();

    assert_eq!(viewer.by_json_path("secret").value_string(), "hunter2");
    assert_eq!(viewer.by_json_path("secret").obfuscated, Some(false));
}

#[cfg(feature = "secrecy")]
mod secrecy_fields {
    use super::*;
    use structviewer::SecretString;

    #[derive(StructView)]
    pub struct Vault {
        #[view(json = "token")]
        pub token: SecretString,

        #[view(json = "backup")]
        pub backup: Option<SecretString>,
    }

    impl Default for Vault {
        fn default() -> Self {
            Self {
                token: SecretString::from(""),
                backup: None,
            }
        }
    }

    #[test]
    fn test_secret_string_is_always_redacted() {
        let value = Vault {
            token: SecretString::from("s3cr3t"),
            backup: Some(SecretString::from("b4ckup")),
        };
        let viewer = Viewer::new(ViewerConfig::new(value)).unwrap();

        assert_eq!(viewer.by_json_path("token").obfuscated, Some(true));
        assert!(!viewer.render().join("\n").contains("s3cr3t"));
        assert!(!viewer.config_json().to_string().contains("b4ckup"));
    }
}
