//! Structural checks run after linking.
//!
//! Only the rules flattening relies on are enforced; this is not a complete
//! OpenAPI validator. References are not followed, since the entries they
//! point at are checked where they are registered.

use super::error::{Error, ErrorKind, Result, ResultExt};
use super::ordered::OrderedMap;
use super::reference::RefOr;
use super::spec::{
    AdditionalProperties, Components, Content, Document, Header, Operation,
    Parameter, ParameterLocation, PathItem, RequestBody, Response, Schema, SchemaKind,
    SchemaType, StatusCode,
};

/// Checks `doc` against the structural rules flattening depends on.
pub fn validate(doc: &Document) -> Result<()> {
    if doc.openapi.is_empty() {
        return Err(Error::new(ErrorKind::Required).field("openapi"));
    }
    if !is_supported_version(&doc.openapi) {
        return Err(Error::invalid(&doc.openapi, "expected a 3.0.x or 3.1.x version").field("openapi"));
    }
    if doc.info.is_none() {
        return Err(Error::new(ErrorKind::Required).field("info"));
    }
    if doc.paths.is_empty() && doc.webhooks.is_empty() && doc.components.is_empty() {
        return Err(ErrorKind::EmptyDocument.into());
    }

    for (path, item) in &doc.paths {
        if !path.starts_with('/') {
            return Err(Error::invalid(path, "path must begin with a slash")
                .key(path)
                .field("paths"));
        }
        validate_path_item(item).at_key(path).at_field("paths")?;
    }
    for (name, item) in &doc.webhooks {
        inline(item, validate_path_item).at_key(name).at_field("webhooks")?;
    }
    validate_components(&doc.components).at_field("components")
}

fn is_supported_version(version: &str) -> bool {
    let mut parts = version.split('.');
    matches!((parts.next(), parts.next()), (Some("3"), Some("0" | "1")))
        && parts.next().is_none_or(|patch| !patch.is_empty())
        && parts.next().is_none()
}

/// Runs `check` on inline values; references pass.
fn inline<T>(node: &RefOr<T>, check: impl FnOnce(&T) -> Result<()>) -> Result<()> {
    node.as_inline().map_or(Ok(()), check)
}

fn each<V>(map: &OrderedMap<V>, mut check: impl FnMut(&V) -> Result<()>) -> Result<()> {
    for (key, value) in map {
        check(value).at_key(key)?;
    }
    Ok(())
}

fn validate_components(components: &Components) -> Result<()> {
    check_keys(&components.schemas).at_field("schemas")?;
    check_keys(&components.responses).at_field("responses")?;
    check_keys(&components.parameters).at_field("parameters")?;
    check_keys(&components.examples).at_field("examples")?;
    check_keys(&components.request_bodies).at_field("requestBodies")?;
    check_keys(&components.headers).at_field("headers")?;
    check_keys(&components.security_schemes).at_field("securitySchemes")?;
    check_keys(&components.links).at_field("links")?;
    check_keys(&components.callbacks).at_field("callbacks")?;
    check_keys(&components.path_items).at_field("pathItems")?;

    each(&components.schemas, |s| inline(s, validate_schema)).at_field("schemas")?;
    each(&components.responses, |r| inline(r, validate_response)).at_field("responses")?;
    each(&components.parameters, |p| inline(p, validate_parameter)).at_field("parameters")?;
    each(&components.request_bodies, |b| inline(b, validate_request_body))
        .at_field("requestBodies")?;
    each(&components.headers, |h| inline(h, validate_header)).at_field("headers")?;
    each(&components.path_items, |p| inline(p, validate_path_item)).at_field("pathItems")
}

fn check_keys<V>(registry: &OrderedMap<V>) -> Result<()> {
    match registry.keys().find(|key| !Components::is_valid_key(key)) {
        Some(key) => Err(Error::invalid(key, "must match ^[a-zA-Z0-9.\\-_]+$").key(key)),
        None => Ok(()),
    }
}

fn validate_path_item(item: &PathItem) -> Result<()> {
    validate_parameters(&item.parameters).at_field("parameters")?;
    for (method, op) in item.operations() {
        validate_operation(op).at_field(method.field())?;
    }
    Ok(())
}

fn validate_operation(op: &Operation) -> Result<()> {
    validate_parameters(&op.parameters).at_field("parameters")?;
    if let Some(body) = &op.request_body {
        inline(body, validate_request_body).at_field("requestBody")?;
    }
    for (code, response) in &op.responses {
        if !StatusCode::new(code).is_valid() {
            return Err(Error::invalid(code, "invalid status code")
                .key(code)
                .field("responses"));
        }
        inline(response, validate_response).at_key(code).at_field("responses")?;
    }
    Ok(())
}

fn validate_parameters(parameters: &[RefOr<Parameter>]) -> Result<()> {
    for (index, param) in parameters.iter().enumerate() {
        inline(param, validate_parameter).at_index(index)?;
    }
    Ok(())
}

fn validate_parameter(param: &Parameter) -> Result<()> {
    if param.name.is_empty() {
        return Err(Error::new(ErrorKind::Required).field("name"));
    }
    if param.location == ParameterLocation::Path && !param.required {
        return Err(Error::invalid(&param.name, "path parameters must be required").field("required"));
    }
    validate_optional_schema(param.schema.as_ref())?;
    validate_content(&param.content).at_field("content")
}

fn validate_header(header: &Header) -> Result<()> {
    validate_optional_schema(header.schema.as_ref())?;
    validate_content(&header.content).at_field("content")
}

fn validate_request_body(body: &RequestBody) -> Result<()> {
    validate_content(&body.content).at_field("content")
}

fn validate_response(response: &Response) -> Result<()> {
    each(&response.headers, |h| inline(h, validate_header)).at_field("headers")?;
    validate_content(&response.content).at_field("content")
}

fn validate_content(content: &Content) -> Result<()> {
    for (range, media) in content {
        validate_optional_schema(media.schema.as_ref()).at_key(range)?;
    }
    Ok(())
}

fn validate_optional_schema(schema: Option<&RefOr<Schema>>) -> Result<()> {
    match schema {
        Some(schema) => inline(schema, validate_schema).at_field("schema"),
        None => Ok(()),
    }
}

fn validate_schema(schema: &Schema) -> Result<()> {
    if schema.schema_type.is_none() && schema.all_of.is_empty() {
        return Err(Error::new(ErrorKind::Required).field("type"));
    }
    if schema.enum_values.is_some() && schema.kind() != SchemaKind::String {
        let type_name = match &schema.schema_type {
            Some(SchemaType::Single(data_type)) => data_type.as_str().to_string(),
            _ => schema.kind().to_string(),
        };
        return Err(Error::invalid(type_name, "enum is only supported on string schemas").field("enum"));
    }
    if schema.kind() == SchemaKind::Array && schema.items.is_none() {
        return Err(Error::new(ErrorKind::Required).field("items"));
    }
    if let Some(SchemaType::Multiple(types)) = &schema.schema_type
        && types.is_empty()
    {
        return Err(Error::invalid("[]", "type list must not be empty").field("type"));
    }

    for (index, member) in schema.all_of.iter().enumerate() {
        inline(member, validate_schema).at_index(index).at_field("allOf")?;
    }
    if let Some(items) = &schema.items {
        inline(items, validate_schema).at_field("items")?;
    }
    each(&schema.properties, |p| inline(p, validate_schema)).at_field("properties")?;
    if let Some(AdditionalProperties::Schema(value)) = &schema.additional_properties {
        inline(value, validate_schema).at_field("additionalProperties")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn doc(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_supported_versions() {
        assert!(is_supported_version("3.0.3"));
        assert!(is_supported_version("3.1.0"));
        assert!(is_supported_version("3.1"));
        assert!(!is_supported_version("2.0"));
        assert!(!is_supported_version("3.2.0"));
        assert!(!is_supported_version("3.0."));
    }

    #[test]
    fn test_rejects_invalid_component_key() {
        let err = validate(&doc(
            r#"{"openapi":"3.0.3","info":{"title":"t","version":"1"},
                "components":{"schemas":{"bad name":{"type":"string"}}}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.path().to_string(), r#"components.schemas["bad name"]"#);
    }

    #[test]
    fn test_rejects_array_without_items() {
        let err = validate(&doc(
            r#"{"openapi":"3.0.3","info":{"title":"t","version":"1"},
                "paths":{"/w":{"get":{"responses":{"200":{"description":"ok",
                    "content":{"application/json":{"schema":{"type":"array"}}}}}}}}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Required);
        assert_eq!(
            err.path().to_string(),
            r#"paths["/w"].get.responses["200"].content["application/json"].schema.items"#
        );
    }

    #[test]
    fn test_rejects_enum_on_integer() {
        let err = validate(&doc(
            r#"{"openapi":"3.1.0","info":{"title":"t","version":"1"},
                "components":{"schemas":{"Level":{"type":"integer","enum":[1,2]}}}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.path().to_string(), r#"components.schemas["Level"].enum"#);
    }

    #[test]
    fn test_rejects_bad_status_code() {
        let err = validate(&doc(
            r#"{"openapi":"3.0.3","info":{"title":"t","version":"1"},
                "paths":{"/w":{"get":{"responses":{"299x":{"description":"?"}}}}}}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::Invalid {
                value: "299x".into(),
                message: "invalid status code".into()
            }
        );
    }

    #[test]
    fn test_requires_info_and_content() {
        let err = validate(&doc(r#"{"openapi":"3.0.3","paths":{}}"#)).unwrap_err();
        assert_eq!(err.to_string(), "info: value is required");

        let err = validate(&doc(r#"{"openapi":"3.0.3","info":{"title":"t","version":"1"}}"#))
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EmptyDocument);
    }
}
