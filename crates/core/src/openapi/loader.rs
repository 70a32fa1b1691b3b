//! Loading and saving documents.
//!
//! Loading runs three steps:
//! 1. Parse: JSON or YAML text -> `Document` with unresolved references
//! 2. Link: references -> registry handles
//! 3. Validate: structural checks flattening depends on

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::LoadError;
use super::resolve::link;
use super::spec::Document;
use super::validate::validate;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON, written pretty-printed.
    Json,
    /// YAML 1.2.
    Yaml,
}

impl Format {
    /// Format implied by the file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            other => Err(LoadError::UnknownExtension(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Guesses the format of `text`: JSON if it parses as JSON, YAML otherwise.
    pub fn detect(text: &str) -> Self {
        if serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok() {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    /// Lower-case format name, for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Parses `text` without linking or validating it.
pub fn parse_str(text: &str, format: Format) -> Result<Document, LoadError> {
    let doc = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(doc)
}

/// Parses, links and validates `text`, detecting its format.
pub fn load_str(text: &str) -> Result<Document, LoadError> {
    load_str_as(text, Format::detect(text))
}

/// Parses, links and validates `text` in the given format.
pub fn load_str_as(text: &str, format: Format) -> Result<Document, LoadError> {
    let mut doc = parse_str(text, format)?;
    link(&mut doc)?;
    validate(&doc)?;
    Ok(doc)
}

/// Reads, links and validates the document at `path`, picking the format
/// from the file extension.
pub fn load_path(path: &Path) -> Result<Document, LoadError> {
    let format = Format::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = load_str_as(&text, format)?;
    debug!(path = %path.display(), format = format.as_str(), "Loaded document.");
    Ok(doc)
}

/// Serializes `doc`, preserving the order of every map.
pub fn to_string(doc: &Document, format: Format) -> Result<String, LoadError> {
    match format {
        Format::Json => {
            let mut text = serde_json::to_string_pretty(doc)?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml => Ok(serde_yaml::to_string(doc)?),
    }
}
