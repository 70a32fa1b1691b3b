//! OpenAPI specification structs for serde (de)serialization.
//!
//! This module models the OpenAPI 3.0/3.1 objects that can carry references
//! or schemas. Fields nothing here looks at are kept verbatim in
//! `extensions`, so a document survives a load/save round trip.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ordered::{OrderedMap, ScalarString};
use super::reference::RefOr;

/// Fields of an object that are not modelled explicitly: `x-` extensions and
/// any keyword passed through untouched.
pub type Extensions = IndexMap<String, Value>;

/// Path templates mapped to their path items.
pub type Paths = OrderedMap<PathItem>;

/// Status codes mapped to responses.
pub type Responses = OrderedMap<RefOr<Response>>;

/// Media ranges mapped to media types.
pub type Content = OrderedMap<MediaType>;

/// Reads a string that YAML may have typed as a number, e.g. `version: 1`.
fn scalar_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    ScalarString::deserialize(deserializer).map(|scalar| scalar.0)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Root OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Version of the OpenAPI specification the document uses.
    #[serde(default, deserialize_with = "scalar_string")]
    pub openapi: String,
    /// API metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    /// Default `$schema` dialect for schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema_dialect: Option<String>,
    /// Connectivity information, passed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Value>,
    /// Available paths and operations.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub paths: Paths,
    /// Incoming webhooks the API consumer may receive.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub webhooks: OrderedMap<RefOr<PathItem>>,
    /// Reusable definitions.
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    /// Security requirements, passed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<Value>,
    /// Tags, passed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Value>,
    /// External documentation, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<Value>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// API metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Title of the API.
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,
    /// Version of the API document.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
    /// Unmodelled fields (description, contact, license, ...).
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Components section holding the named registries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Reusable schemas.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub schemas: OrderedMap<RefOr<Schema>>,
    /// Reusable responses.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub responses: OrderedMap<RefOr<Response>>,
    /// Reusable parameters.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub parameters: OrderedMap<RefOr<Parameter>>,
    /// Reusable examples.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub examples: OrderedMap<RefOr<Example>>,
    /// Reusable request bodies.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub request_bodies: OrderedMap<RefOr<RequestBody>>,
    /// Reusable headers.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub headers: OrderedMap<RefOr<Header>>,
    /// Reusable security schemes.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub security_schemes: OrderedMap<RefOr<SecurityScheme>>,
    /// Reusable links.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub links: OrderedMap<RefOr<Link>>,
    /// Reusable callbacks.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub callbacks: OrderedMap<RefOr<Callback>>,
    /// Reusable path items.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub path_items: OrderedMap<RefOr<PathItem>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Components {
    /// Check if no registry holds an entry.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.responses.is_empty()
            && self.parameters.is_empty()
            && self.examples.is_empty()
            && self.request_bodies.is_empty()
            && self.headers.is_empty()
            && self.security_schemes.is_empty()
            && self.links.is_empty()
            && self.callbacks.is_empty()
            && self.path_items.is_empty()
            && self.extensions.is_empty()
    }

    /// Check if `key` may name a registry entry (`^[a-zA-Z0-9.\-_]+$`).
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty() && key.chars().all(is_key_char)
    }
}

/// Characters allowed in registry keys.
pub(crate) fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_')
}

/// HTTP method of an operation within a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl Method {
    /// Every method, in the order path items are walked.
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Upper-case method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Name of the path item field holding this method's operation.
    pub const fn field(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternative servers, passed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Value>,
    /// Path-level parameters shared by all operations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<Parameter>>,
    /// The `GET` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// The `PUT` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// The `POST` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// The `DELETE` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// The `OPTIONS` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// The `HEAD` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// The `PATCH` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// The `TRACE` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl PathItem {
    /// The operation for `method`, if declared.
    pub const fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
        }
    }

    /// Sets (or clears) the operation for `method`.
    pub fn set_operation(&mut self, method: Method, op: Option<Operation>) {
        let slot = match method {
            Method::Get => &mut self.get,
            Method::Put => &mut self.put,
            Method::Post => &mut self.post,
            Method::Delete => &mut self.delete,
            Method::Options => &mut self.options,
            Method::Head => &mut self.head,
            Method::Patch => &mut self.patch,
            Method::Trace => &mut self.trace,
        };
        *slot = op;
    }

    /// Declared operations in walk order (GET, PUT, POST, DELETE, OPTIONS, HEAD, PATCH, TRACE).
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        Method::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|op| (method, op)))
    }

    /// Mutable variant of [`PathItem::operations`].
    pub fn operations_mut(&mut self) -> impl Iterator<Item = (Method, &mut Operation)> {
        [
            (Method::Get, &mut self.get),
            (Method::Put, &mut self.put),
            (Method::Post, &mut self.post),
            (Method::Delete, &mut self.delete),
            (Method::Options, &mut self.options),
            (Method::Head, &mut self.head),
            (Method::Patch, &mut self.patch),
            (Method::Trace, &mut self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_mut().map(|op| (method, op)))
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Tags for grouping, passed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External documentation, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<Value>,
    /// Unique operation identifier. Promoted bodies and responses are named after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Operation parameters, added to the path-level ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<Parameter>>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RefOr<RequestBody>>,
    /// Responses keyed by status code.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub responses: Responses,
    /// Out-of-band callbacks keyed by name.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub callbacks: OrderedMap<RefOr<Callback>>,
    /// Marks the item as deprecated.
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// An empty list is meaningful here (it removes top-level security).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Value>>,
    /// Alternative servers, passed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Value>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Appended to the URL query string.
    #[default]
    Query,
    /// Sent as a request header.
    Header,
    /// Part of the path template.
    Path,
    /// Sent as a cookie.
    Cookie,
}

/// A parameter (query, path, header, or cookie).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name.
    #[serde(default)]
    pub name: String,
    /// Where the parameter is sent (`in`).
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter must be sent.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Marks the item as deprecated.
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Whether an empty value may be sent.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_empty_value: bool,
    /// Serialization style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Whether arrays and objects expand into separate values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Whether reserved characters pass unencoded.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_reserved: bool,
    /// Schema of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
    /// Media type describing the value, used instead of `schema`.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub content: Content,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub examples: OrderedMap<RefOr<Example>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A request body definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body per media range.
    #[serde(default)]
    pub content: Content,
    /// Whether the body is mandatory.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A response definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Description of the response.
    #[serde(default)]
    pub description: String,
    /// Response headers.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub headers: OrderedMap<RefOr<Header>>,
    /// Body per media range.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub content: Content,
    /// Links to other operations.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub links: OrderedMap<RefOr<Link>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub examples: OrderedMap<RefOr<Example>>,
    /// Per-property encoding of multipart and form bodies.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub encoding: OrderedMap<Encoding>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Encoding of a single property of a multipart or form body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    /// Content type of the part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Headers of the part.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub headers: OrderedMap<RefOr<Header>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A response or encoding header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the header must be sent.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Marks the item as deprecated.
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Schema of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
    /// Media type describing the value, used instead of `schema`.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub content: Content,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Named examples.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub examples: OrderedMap<RefOr<Example>>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// An example value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Embedded example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// URL of an external example.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_value: Option<String>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A design-time link between a response and an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Reference to the linked operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_ref: Option<String>,
    /// Unique operation identifier. Promoted bodies and responses are named after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters passed to the linked operation.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
    /// Request body passed to the linked operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Description of the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A security scheme. Only its shape is kept; nothing inside is a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// Scheme type (`apiKey`, `http`, `oauth2`, ...).
    #[serde(rename = "type", default)]
    pub scheme_type: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unmodelled fields.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Runtime expressions mapped to the path items describing the callback requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Callback {
    /// Path items keyed by runtime expression.
    pub expressions: OrderedMap<RefOr<PathItem>>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The name of the schema. Overrides derived names when promoted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Format hint (e.g., date-time, uuid).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Intersection type (all of these schemas combined).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<RefOr<Schema>>,

    /// Enum values.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Item schema for array types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<RefOr<Schema>>,

    /// Properties for object types, in declaration order.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub properties: OrderedMap<RefOr<Schema>>,

    /// Required property names for object types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Additional properties for object types (for map types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    // --- Validation keywords (kept as they are) ---
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Regular expression string values must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Minimum array length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Maximum array length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Every other keyword (anyOf, oneOf, const, x- extensions, ...).
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Schema {
    /// A schema of a single `kind`.
    pub fn of_type(kind: DataType) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(kind)),
            ..Self::default()
        }
    }

    /// Shape of the schema as far as flattening is concerned.
    ///
    /// A 3.1 type list with exactly one non-null member counts as that member.
    pub fn kind(&self) -> SchemaKind {
        match &self.schema_type {
            Some(SchemaType::Single(data_type)) => SchemaKind::from(data_type),
            Some(SchemaType::Multiple(types)) => {
                let mut non_null = types.iter().filter(|t| **t != DataType::Null);
                match (non_null.next(), non_null.next()) {
                    (Some(data_type), None) => SchemaKind::from(data_type),
                    _ => SchemaKind::Unsupported(
                        types
                            .iter()
                            .map(DataType::as_str)
                            .collect::<Vec<_>>()
                            .join(","),
                    ),
                }
            }
            None if !self.all_of.is_empty() => SchemaKind::AllOf,
            None => SchemaKind::Unsupported(String::new()),
        }
    }
}

/// Closed set of schema shapes the flattening engine dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// No type, composed through `allOf` only.
    AllOf,
    /// Any other type, named as written in the document.
    Unsupported(String),
}

impl From<&DataType> for SchemaKind {
    fn from(data_type: &DataType) -> Self {
        match data_type {
            DataType::Integer => Self::Integer,
            DataType::Number => Self::Number,
            DataType::String => Self::String,
            DataType::Boolean => Self::Boolean,
            DataType::Array => Self::Array,
            DataType::Object => Self::Object,
            DataType::Null | DataType::Other(_) => Self::Unsupported(data_type.as_str().to_string()),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
            Self::Array => f.write_str("array"),
            Self::Object => f.write_str("object"),
            Self::AllOf => f.write_str(""),
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// A JSON Schema primitive type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `null`
    Null,
    /// A type name outside the JSON Schema vocabulary.
    Other(String),
}

impl DataType {
    /// The type name as written in documents.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for DataType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "integer" => Self::Integer,
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            "null" => Self::Null,
            _ => Self::Other(name),
        }
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(DataType),
    /// `"type": ["string", "null"]`
    Multiple(Vec<DataType>),
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    /// A string member.
    String(String),
    /// An integer member.
    Integer(i64),
    /// A floating-point member.
    Float(f64),
    /// A boolean member.
    Bool(bool),
    /// `null`
    Null,
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// Whether undeclared properties are allowed at all.
    Bool(bool),
    /// Schema of every undeclared property value.
    Schema(RefOr<Schema>),
}

/// A key of an operation's responses: `"200"`, a range such as `"2XX"`, or `"default"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode<'a>(&'a str);

impl<'a> StatusCode<'a> {
    /// Documents responses other than the ones declared for specific codes.
    pub const DEFAULT: &'static str = "default";

    /// Wraps a responses key.
    pub const fn new(code: &'a str) -> Self {
        Self(code)
    }

    /// The key as written.
    pub const fn as_str(self) -> &'a str {
        self.0
    }

    /// Leading digit of a range definition such as `2XX`.
    fn range_class(self) -> Option<u8> {
        match self.0.as_bytes() {
            [class @ b'1'..=b'5', b'X', b'X'] => Some(*class),
            _ => None,
        }
    }

    /// Canonical reason phrase, e.g. `OK` for `200`.
    ///
    /// Returns `None` for `default`, ranges, and codes without a registered phrase.
    pub fn status_text(self) -> Option<&'static str> {
        let code = self.0.parse::<u16>().ok()?;
        http::StatusCode::from_u16(code).ok()?.canonical_reason()
    }

    /// Check if this is a 2xx code or the `2XX` range.
    pub fn is_success(self) -> bool {
        if let Some(class) = self.range_class() {
            return class == b'2';
        }
        self.0
            .parse::<u16>()
            .is_ok_and(|code| (200..300).contains(&code))
    }

    /// Check if this key may appear in a responses map.
    pub fn is_valid(self) -> bool {
        self.0 == Self::DEFAULT || self.range_class().is_some() || self.status_text().is_some()
    }
}

impl fmt::Display for StatusCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A key of a content map: a media type or media type range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRange<'a>(&'a str);

impl<'a> MediaRange<'a> {
    /// Essence of JSON bodies.
    pub const JSON: &'static str = "application/json";
    /// Essence of HTML bodies.
    pub const HTML: &'static str = "text/html";

    /// Wraps a content key.
    pub const fn new(range: &'a str) -> Self {
        Self(range)
    }

    /// The lower-cased `type/subtype` with parameters dropped, or `None` when
    /// the range does not parse.
    pub fn essence(self) -> Option<String> {
        let essence = self.0.split(';').next().unwrap_or_default().trim();
        let (kind, subtype) = essence.split_once('/')?;
        if is_token(kind) && is_token(subtype) {
            Some(essence.to_ascii_lowercase())
        } else {
            None
        }
    }
}

/// RFC 2045 token: visible ASCII without separators.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|ch| {
            ch.is_ascii_graphic() && !"()<>@,;:\\\"/[]?=".contains(ch)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_success_class() {
        assert!(StatusCode::new("200").is_success());
        assert!(StatusCode::new("204").is_success());
        assert!(StatusCode::new("2XX").is_success());
        assert!(!StatusCode::new("404").is_success());
        assert!(!StatusCode::new("4XX").is_success());
        assert!(!StatusCode::new("default").is_success());
    }

    #[test]
    fn test_status_code_text() {
        assert_eq!(StatusCode::new("200").status_text(), Some("OK"));
        assert_eq!(StatusCode::new("404").status_text(), Some("Not Found"));
        assert_eq!(StatusCode::new("default").status_text(), None);
        assert_eq!(StatusCode::new("2XX").status_text(), None);
        assert!(StatusCode::new("5XX").is_valid());
        assert!(!StatusCode::new("6XX").is_valid());
        assert!(!StatusCode::new("abc").is_valid());
    }

    #[test]
    fn test_media_range_essence() {
        assert_eq!(
            MediaRange::new("Application/JSON; charset=utf-8").essence(),
            Some("application/json".to_string())
        );
        assert_eq!(MediaRange::new("text/*").essence(), Some("text/*".to_string()));
        assert_eq!(MediaRange::new("json").essence(), None);
        assert_eq!(MediaRange::new("a/b/c").essence(), None);
    }

    #[test]
    fn test_schema_kind() {
        let schema: Schema = serde_json::from_str(r#"{ "type": ["string", "null"] }"#).unwrap();
        assert_eq!(schema.kind(), SchemaKind::String);

        let schema: Schema =
            serde_json::from_str(r#"{ "allOf": [{ "type": "object" }] }"#).unwrap();
        assert_eq!(schema.kind(), SchemaKind::AllOf);

        let schema: Schema = serde_json::from_str(r#"{ "type": "null" }"#).unwrap();
        assert_eq!(schema.kind(), SchemaKind::Unsupported("null".to_string()));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let json = r#"{"type":"object","x-internal":true,"anyOf":[{"type":"string"}]}"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.extensions.len(), 2);
        assert_eq!(serde_json::to_string(&schema).unwrap(), json);
    }

    #[test]
    fn test_operations_in_walk_order() {
        let item: PathItem = serde_json::from_str(
            r#"{ "post": {}, "get": {}, "trace": {}, "delete": {} }"#,
        )
        .unwrap();
        let methods: Vec<_> = item.operations().map(|(method, _)| method).collect();
        assert_eq!(
            methods,
            vec![Method::Get, Method::Post, Method::Delete, Method::Trace]
        );
    }
}
