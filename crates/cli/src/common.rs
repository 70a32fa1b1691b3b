//! Common types shared across CLI commands

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use normapi_core::openapi::{Format, LoadError, load_path};

/// Document serialization formats
#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Yaml => Self::Yaml,
        }
    }
}

/// Loads the document at `path`, mapping failures to a printable message.
pub fn load(path: &Path) -> Result<normapi_core::openapi::Document, String> {
    load_path(path).map_err(|err| match err {
        LoadError::Io { .. } | LoadError::UnknownExtension(_) => err.to_string(),
        _ => format!("{}: {err}", path.display()),
    })
}

/// Writes `contents` to `output`, or to stdout when no file is given.
pub fn write_output(output: Option<&Path>, contents: &str) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, contents)
            .map_err(|err| format!("failed to write {}: {err}", path.display())),
        None => std::io::stdout()
            .lock()
            .write_all(contents.as_bytes())
            .map_err(|err| format!("failed to write to stdout: {err}")),
    }
}
