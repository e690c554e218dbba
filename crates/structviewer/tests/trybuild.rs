//! Compile-time tests for the `StructView` derive macro.
//!
//! These tests verify that valid derive usage compiles successfully across
//! attribute combinations, generics and serde fallbacks.
//!
//! Run with: cargo nextest run --package structviewer trybuild

#[test]
fn compile_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/compile_pass/basic.rs");
    t.pass("tests/compile_pass/attributes.rs");
    t.pass("tests/compile_pass/generics.rs");
    t.pass("tests/compile_pass/serde_fallback.rs");
    t.pass("tests/compile_pass/opaque.rs");
}

/// Tests requiring the secrecy feature
#[test]
#[cfg(feature = "secrecy")]
fn compile_pass_secrecy() {
    let t = trybuild::TestCases::new();
    t.pass("tests/compile_pass/secret_field.rs");
}
