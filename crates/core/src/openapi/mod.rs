//! OpenAPI normal form.
//!
//! This module contains:
//! - `spec`: Serde model of OpenAPI 3.0/3.1 documents
//! - `ordered`: Insertion-ordered maps for every named collection
//! - `reference`: `$ref` nodes, registry handles and component kinds
//! - `resolve`: Reference linking
//! - `validate`: Structural checks
//! - `loader`: Reading and writing JSON/YAML documents
//! - `flatten`: Promotion of inline definitions into components

mod error;
pub mod flatten;
mod loader;
mod ordered;
mod reference;
mod resolve;
pub mod spec;
mod validate;

pub use error::{Error, ErrorKind, ErrorPath, LoadError, Result, Segment};
pub use flatten::{
    flatten, flatten_with, is_failure_response, FlattenOptions, FlattenStats, Mode,
};
pub use loader::{load_path, load_str, load_str_as, parse_str, to_string, Format};
pub use ordered::OrderedMap;
pub use reference::{Component, Handle, RefOr, Reference};
pub use resolve::link;
pub use spec::{
    AdditionalProperties, Callback, Components, Content, DataType, Document, Encoding, EnumValue,
    Example, Header, Info, Link, MediaRange, MediaType, Method, Operation, Parameter,
    ParameterLocation, PathItem, Paths, RequestBody, Response, Responses, Schema, SchemaKind,
    SchemaType, SecurityScheme, StatusCode,
};
pub use validate::validate;
