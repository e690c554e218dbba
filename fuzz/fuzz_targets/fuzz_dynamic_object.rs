#![no_main]

use libfuzzer_sys::fuzz_target;
use structviewer::{REDACTED, Viewer, ViewerConfig};

fuzz_target!(|data: (&[u8], String)| {
    let (bytes, secret_path) = data;

    let Ok(object) = serde_json::from_slice::<serde_json::Value>(bytes) else {
        return;
    };

    // Construction should return Result, never panic
    let Ok(viewer) = Viewer::new(ViewerConfig::new(object).obfuscate_path(secret_path.clone())) else {
        return;
    };

    // Every rendered leaf must be found again by its env name
    for (name, _) in viewer.env_map() {
        if name.is_empty() {
            continue;
        }
        assert!(!viewer.by_env_name(name).is_empty(), "Leaf {name} not addressable!");
    }

    // CRITICAL: a redacted non-empty string must never be exposed
    if let Some(field) = viewer.find_by_json_path(&secret_path) {
        assert_eq!(field.obfuscated, Some(true));
        if let Some(serde_json::Value::String(text)) = field.leaf_value() {
            assert!(text.is_empty() || text == REDACTED, "Secret exposed!");
        }
    }
});
