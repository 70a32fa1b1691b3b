//! Errors raised while loading, linking, validating and flattening documents.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for document operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// One step on the way from the document root to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A fixed field, e.g. `paths` or `schema`.
    Field(String),
    /// A map key, e.g. a path template or a status code.
    Key(String),
    /// A list position.
    Index(usize),
}

/// Breadcrumb from the document root to the node an error is about.
///
/// Displays as `paths["/w"].get.responses["200"].content["application/json"].schema`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPath {
    segments: Vec<Segment>,
}

impl ErrorPath {
    /// Segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check if the error sits at the document root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push_front(&mut self, segment: Segment) {
        self.segments.insert(0, segment);
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if position == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Key(key) => write!(f, "[{key:?}]")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A `$ref` names no registry entry.
    #[error("couldn't resolve {0:?}")]
    UnresolvedReference(String),

    /// A chain of registry aliases loops back on itself.
    #[error("reference {0:?} is circular")]
    CircularReference(String),

    /// A schema kind outside the supported set was about to be promoted.
    #[error("unimplemented schema type {0:?}")]
    UnsupportedSchemaType(String),

    /// An array's items have a kind the promotion rules do not cover.
    #[error("unimplemented item type {0:?}")]
    UnsupportedItemType(String),

    /// A mandatory field is missing. The field is the last path segment.
    #[error("value is required")]
    Required,

    /// A value is present but malformed.
    #[error("invalid value {value:?}: {message}")]
    Invalid {
        /// The offending value as written.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// None of `paths`, `webhooks` or `components` is present.
    #[error("document must contain paths, webhooks or components")]
    EmptyDocument,
}

/// A failure located inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    path: ErrorPath,
    kind: ErrorKind,
}

impl Error {
    /// An error at the document root.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            path: ErrorPath::default(),
            kind,
        }
    }

    pub(crate) fn invalid(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid {
            value: value.into(),
            message: message.into(),
        })
    }

    /// Where in the document the error happened.
    pub fn path(&self) -> &ErrorPath {
        &self.path
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn field(mut self, name: &str) -> Self {
        self.path.push_front(Segment::Field(name.to_string()));
        self
    }

    pub(crate) fn key(mut self, key: &str) -> Self {
        self.path.push_front(Segment::Key(key.to_string()));
        self
    }

    pub(crate) fn index(mut self, index: usize) -> Self {
        self.path.push_front(Segment::Index(index));
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Prefixes the error of a failed step with the segment it happened under.
pub trait ResultExt<T> {
    /// Under the fixed field `name`.
    fn at_field(self, name: &str) -> Result<T>;
    /// Under the map key `key`.
    fn at_key(self, key: &str) -> Result<T>;
    /// Under list position `index`.
    fn at_index(self, index: usize) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn at_field(self, name: &str) -> Result<T> {
        self.map_err(|err| err.field(name))
    }

    fn at_key(self, key: &str) -> Result<T> {
        self.map_err(|err| err.key(key))
    }

    fn at_index(self, index: usize) -> Result<T> {
        self.map_err(|err| err.index(index))
    }
}

/// Errors from reading, parsing or saving a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read or written.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The path has no `.json`, `.yaml` or `.yml` extension.
    #[error("unknown file extension {0:?} (expected .json, .yaml or .yml)")]
    UnknownExtension(String),

    /// Malformed JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Well-formed input that is not a valid document.
    #[error(transparent)]
    Document(#[from] Error),
}
