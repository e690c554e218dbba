//! Example: dump the environment variables of a configuration struct
//!
//! Prints the descriptor tree as JSON, with doc comments merged from this file:
//!   cargo run --package structviewer --example env_dump
//!
//! Other output formats and options:
//!   `cargo run --package structviewer --example env_dump -- --format envs --prefix APP_`
//!   `cargo run --package structviewer --example env_dump -- --format config --obfuscate inner_object.map.key`
//!
//! Set `RUST_LOG=structviewer=trace` to follow the flattening.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use structviewer::{StructView, Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;

const SOURCE: &str = include_str!("env_dump.rs");

#[derive(StructView, Default)]
pub struct Kv {
    /// Key represents a key for your KV.
    #[view(json = "key")]
    pub key: String,

    /// Value represents a value of specific Key.
    #[view(json = "value")]
    pub value: serde_json::Value,
}

#[derive(StructView, Default)]
pub struct Obj {
    /// Temp value for Obj.
    #[view(json = "temp")]
    pub temp: i64,

    #[view(json = "buffer")]
    pub buffer: Vec<u8>,

    /// Timeout represents timeout for Obj.
    #[view(json = "timeout")]
    pub timeout: Duration,

    /// Map represents Obj's KV.
    #[view(json = "map")]
    pub map: Kv,
}

#[derive(StructView, Default)]
pub struct ExampleConfig {
    /// ExportedField represents exported struct field.
    #[view(json = "exported_field,omitempty")]
    pub exported_field: String,

    /// Multiple represents a list of values.
    #[view(json = "multiple,omitempty")]
    pub multiple: Vec<String>,

    /// InnerObject includes a field that includes struct objects.
    #[view(json = "inner_object")]
    pub inner_object: Obj,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Descriptor tree
    Tree,
    /// `ENV=value` lines
    Envs,
    /// Redacted configuration object
    Config,
}

#[derive(Debug, Parser)]
#[command(about = "Dump the environment variables of an example configuration")]
struct Cli {
    /// Environment variable prefix
    #[arg(long, default_value = "TYK_", env = "ENV_DUMP_PREFIX")]
    prefix: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Skip doc comment merging
    #[arg(long)]
    no_comments: bool,

    /// Redact a field by JSON path (repeatable)
    #[arg(long)]
    obfuscate: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ExampleConfig {
        exported_field: "val".into(),
        multiple: vec!["one".into(), "two".into()],
        inner_object: Obj {
            temp: 32,
            timeout: Duration::from_secs(2),
            map: Kv {
                key: "key".into(),
                value: json!("value"),
            },
            ..Obj::default()
        },
    };

    let mut options = ViewerConfig::new(config)
        .prefix(cli.prefix)
        .parse_comments(!cli.no_comments)
        .source_reader(|_: &Path| -> io::Result<String> { Ok(SOURCE.to_owned()) });

    for path in cli.obfuscate {
        options = options.obfuscate_path(path);
    }

    let viewer = Viewer::new(options)?;

    let output = match cli.format {
        Format::Tree => serde_json::to_string_pretty(viewer.envs()),
        Format::Envs => serde_json::to_string_pretty(&viewer.render()),
        Format::Config => serde_json::to_string_pretty(viewer.config_json()),
    }
    .into_diagnostic()?;

    writeln!(io::stdout(), "{output}").into_diagnostic()?;
    Ok(())
}
