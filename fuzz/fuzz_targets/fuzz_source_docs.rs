#![no_main]

use libfuzzer_sys::fuzz_target;
use structviewer::SourceDocs;

fuzz_target!(|text: &str| {
    // Parsing should return Result, never panic
    let Ok(docs) = SourceDocs::parse("fuzz.rs", text) else {
        return;
    };

    // Every collected entry must be retrievable by its owner and field
    for entry in docs.entries() {
        assert!(!entry.text.is_empty(), "Empty doc text collected!");
        assert!(docs.get(&entry.owner, &entry.field).is_some());
    }
});
