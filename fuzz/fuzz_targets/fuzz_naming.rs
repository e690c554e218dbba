#![no_main]

use libfuzzer_sys::fuzz_target;
use structviewer::naming::{env_key, join_path, json_segment, normalize};

fuzz_target!(|data: (String, String, Option<String>)| {
    let (prefix, name, tag) = data;

    // Normalization is idempotent and strips every underscore
    let normalized = normalize(&name);
    assert_eq!(normalize(&normalized), normalized);
    assert!(!normalized.contains('_'));

    // Env keys are always normalized
    let key = env_key(&name, tag.as_deref());
    assert_eq!(normalize(&key), key);

    // Skipped and missing tags never produce a JSON segment
    if tag.is_none() || tag.as_deref() == Some("-") {
        assert!(json_segment(tag.as_deref()).is_empty());
    }

    // Joined paths always end with the segment
    let joined = join_path(&prefix, &name);
    assert!(joined.ends_with(name.trim_start_matches('.')));
});
