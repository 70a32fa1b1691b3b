//! Reference linking.
//!
//! Linking runs in two phases:
//! 1. Collect: index every registry entry under its `#/components/<kind>/<name>` identifier
//! 2. Resolve: walk the document and turn every unresolved `$ref` into a handle

use std::collections::HashMap;

use tracing::debug;

use super::error::{Error, ErrorKind, Result, ResultExt};
use super::ordered::OrderedMap;
use super::reference::{Component, Handle, RefOr, Reference};
use super::spec::{
    Callback, Components, Content, Document, Example, Header, Link, MediaType, Operation,
    Parameter, PathItem, Paths, RequestBody, Response, Schema, SecurityScheme,
    AdditionalProperties,
};

/// Identifier to handle table for one registry.
#[derive(Debug)]
struct Lookup<T> {
    handles: HashMap<String, Handle<T>>,
}

impl<T: Component> Lookup<T> {
    fn collect(components: &Components) -> Self {
        let handles = T::registry(components)
            .keys()
            .enumerate()
            .map(|(index, name)| {
                (
                    Reference::component(T::REGISTRY, name).identifier,
                    Handle::new(index),
                )
            })
            .collect();
        Self { handles }
    }
}

impl<T> Lookup<T> {
    fn get(&self, identifier: &str) -> Option<Handle<T>> {
        self.handles.get(identifier).copied()
    }
}

/// Links `node` if it is an unresolved reference, or resolves the inside of
/// an inline value with `resolve_value`.
fn resolve_ref<T>(
    node: &mut RefOr<T>,
    table: &Lookup<T>,
    resolve_value: impl FnOnce(&mut T) -> Result<()>,
) -> Result<()> {
    match node {
        RefOr::Unresolved(reference) => {
            let Some(handle) = table.get(&reference.identifier) else {
                return Err(ErrorKind::UnresolvedReference(reference.identifier.clone()).into());
            };
            let reference = reference.clone();
            *node = RefOr::Resolved(reference, handle);
            Ok(())
        }
        RefOr::Resolved(..) => Ok(()),
        RefOr::Inline(value) => resolve_value(value),
    }
}

/// Runs `f` on every value of `map`, keying errors by entry name.
fn each<V>(map: &mut OrderedMap<V>, mut f: impl FnMut(&mut V) -> Result<()>) -> Result<()> {
    for (key, value) in map {
        f(value).at_key(key)?;
    }
    Ok(())
}

#[derive(Debug)]
struct Linker {
    schemas: Lookup<Schema>,
    responses: Lookup<Response>,
    parameters: Lookup<Parameter>,
    examples: Lookup<Example>,
    request_bodies: Lookup<RequestBody>,
    headers: Lookup<Header>,
    security_schemes: Lookup<SecurityScheme>,
    links: Lookup<Link>,
    callbacks: Lookup<Callback>,
    path_items: Lookup<PathItem>,
}

/// Links every reference in `doc` to the registry entry it names.
///
/// Already linked references are left alone, so linking twice is harmless.
pub fn link(doc: &mut Document) -> Result<()> {
    let linker = Linker::collect(&doc.components);
    linker.resolve_paths(&mut doc.paths).at_field("paths")?;
    linker
        .resolve_path_item_refs(&mut doc.webhooks)
        .at_field("webhooks")?;
    linker
        .resolve_components(&mut doc.components)
        .at_field("components")?;
    check_aliases(&doc.components).at_field("components")?;

    debug!(
        paths = doc.paths.len(),
        schemas = doc.components.schemas.len(),
        responses = doc.components.responses.len(),
        "Linked document references."
    );
    Ok(())
}

impl Linker {
    fn collect(components: &Components) -> Self {
        Self {
            schemas: Lookup::collect(components),
            responses: Lookup::collect(components),
            parameters: Lookup::collect(components),
            examples: Lookup::collect(components),
            request_bodies: Lookup::collect(components),
            headers: Lookup::collect(components),
            security_schemes: Lookup::collect(components),
            links: Lookup::collect(components),
            callbacks: Lookup::collect(components),
            path_items: Lookup::collect(components),
        }
    }

    fn resolve_components(&self, components: &mut Components) -> Result<()> {
        each(&mut components.schemas, |s| self.resolve_schema_ref(s)).at_field("schemas")?;
        each(&mut components.responses, |r| self.resolve_response_ref(r))
            .at_field("responses")?;
        each(&mut components.parameters, |p| self.resolve_parameter_ref(p))
            .at_field("parameters")?;
        each(&mut components.examples, |e| self.resolve_example_ref(e)).at_field("examples")?;
        each(&mut components.request_bodies, |b| {
            self.resolve_request_body_ref(b)
        })
        .at_field("requestBodies")?;
        each(&mut components.headers, |h| self.resolve_header_ref(h)).at_field("headers")?;
        each(&mut components.security_schemes, |s| {
            resolve_ref(s, &self.security_schemes, |_| Ok(()))
        })
        .at_field("securitySchemes")?;
        each(&mut components.links, |l| self.resolve_link_ref(l)).at_field("links")?;
        each(&mut components.callbacks, |c| self.resolve_callback_ref(c))
            .at_field("callbacks")?;
        self.resolve_path_item_refs(&mut components.path_items)
            .at_field("pathItems")
    }

    fn resolve_paths(&self, paths: &mut Paths) -> Result<()> {
        each(paths, |item| self.resolve_path_item(item))
    }

    fn resolve_path_item_refs(&self, items: &mut OrderedMap<RefOr<PathItem>>) -> Result<()> {
        each(items, |item| {
            resolve_ref(item, &self.path_items, |item| self.resolve_path_item(item))
        })
    }

    fn resolve_path_item(&self, item: &mut PathItem) -> Result<()> {
        self.resolve_parameters(&mut item.parameters)
            .at_field("parameters")?;
        for (method, op) in item.operations_mut() {
            self.resolve_operation(op).at_field(method.field())?;
        }
        Ok(())
    }

    fn resolve_operation(&self, op: &mut Operation) -> Result<()> {
        self.resolve_parameters(&mut op.parameters)
            .at_field("parameters")?;
        if let Some(body) = &mut op.request_body {
            self.resolve_request_body_ref(body)
                .at_field("requestBody")?;
        }
        each(&mut op.responses, |r| self.resolve_response_ref(r)).at_field("responses")?;
        each(&mut op.callbacks, |c| self.resolve_callback_ref(c)).at_field("callbacks")
    }

    fn resolve_parameters(&self, parameters: &mut [RefOr<Parameter>]) -> Result<()> {
        for (index, param) in parameters.iter_mut().enumerate() {
            self.resolve_parameter_ref(param).at_index(index)?;
        }
        Ok(())
    }

    fn resolve_parameter_ref(&self, node: &mut RefOr<Parameter>) -> Result<()> {
        resolve_ref(node, &self.parameters, |param| {
            self.resolve_optional_schema(&mut param.schema)?;
            self.resolve_content(&mut param.content).at_field("content")?;
            each(&mut param.examples, |e| self.resolve_example_ref(e)).at_field("examples")
        })
    }

    fn resolve_request_body_ref(&self, node: &mut RefOr<RequestBody>) -> Result<()> {
        resolve_ref(node, &self.request_bodies, |body| {
            self.resolve_content(&mut body.content).at_field("content")
        })
    }

    fn resolve_response_ref(&self, node: &mut RefOr<Response>) -> Result<()> {
        resolve_ref(node, &self.responses, |response| {
            each(&mut response.headers, |h| self.resolve_header_ref(h)).at_field("headers")?;
            self.resolve_content(&mut response.content)
                .at_field("content")?;
            each(&mut response.links, |l| self.resolve_link_ref(l)).at_field("links")
        })
    }

    fn resolve_header_ref(&self, node: &mut RefOr<Header>) -> Result<()> {
        resolve_ref(node, &self.headers, |header| {
            self.resolve_optional_schema(&mut header.schema)?;
            self.resolve_content(&mut header.content).at_field("content")?;
            each(&mut header.examples, |e| self.resolve_example_ref(e)).at_field("examples")
        })
    }

    fn resolve_content(&self, content: &mut Content) -> Result<()> {
        each(content, |media| self.resolve_media_type(media))
    }

    fn resolve_media_type(&self, media: &mut MediaType) -> Result<()> {
        self.resolve_optional_schema(&mut media.schema)?;
        each(&mut media.examples, |e| self.resolve_example_ref(e)).at_field("examples")?;
        each(&mut media.encoding, |encoding| {
            each(&mut encoding.headers, |h| self.resolve_header_ref(h)).at_field("headers")
        })
        .at_field("encoding")
    }

    fn resolve_example_ref(&self, node: &mut RefOr<Example>) -> Result<()> {
        resolve_ref(node, &self.examples, |_| Ok(()))
    }

    fn resolve_link_ref(&self, node: &mut RefOr<Link>) -> Result<()> {
        resolve_ref(node, &self.links, |_| Ok(()))
    }

    fn resolve_callback_ref(&self, node: &mut RefOr<Callback>) -> Result<()> {
        resolve_ref(node, &self.callbacks, |callback| {
            self.resolve_path_item_refs(&mut callback.expressions)
        })
    }

    fn resolve_optional_schema(&self, schema: &mut Option<RefOr<Schema>>) -> Result<()> {
        match schema {
            Some(schema) => self.resolve_schema_ref(schema).at_field("schema"),
            None => Ok(()),
        }
    }

    fn resolve_schema_ref(&self, node: &mut RefOr<Schema>) -> Result<()> {
        resolve_ref(node, &self.schemas, |schema| self.resolve_schema(schema))
    }

    fn resolve_schema(&self, schema: &mut Schema) -> Result<()> {
        for (index, member) in schema.all_of.iter_mut().enumerate() {
            self.resolve_schema_ref(member)
                .at_index(index)
                .at_field("allOf")?;
        }
        if let Some(items) = &mut schema.items {
            self.resolve_schema_ref(items).at_field("items")?;
        }
        each(&mut schema.properties, |p| self.resolve_schema_ref(p)).at_field("properties")?;
        if let Some(AdditionalProperties::Schema(value)) = &mut schema.additional_properties {
            self.resolve_schema_ref(value)
                .at_field("additionalProperties")?;
        }
        Ok(())
    }
}

fn check_aliases(components: &Components) -> Result<()> {
    check_registry::<Schema>(components)?;
    check_registry::<Response>(components)?;
    check_registry::<Parameter>(components)?;
    check_registry::<Example>(components)?;
    check_registry::<RequestBody>(components)?;
    check_registry::<Header>(components)?;
    check_registry::<SecurityScheme>(components)?;
    check_registry::<Link>(components)?;
    check_registry::<Callback>(components)?;
    check_registry::<PathItem>(components)
}

/// Rejects registry entries that alias each other in a loop.
fn check_registry<T: Component>(components: &Components) -> Result<()> {
    for (index, (name, entry)) in T::registry(components).iter().enumerate() {
        if let RefOr::Resolved(reference, _) = entry
            && components.get(Handle::<T>::new(index)).is_none()
        {
            return Err(Error::new(ErrorKind::CircularReference(
                reference.identifier.clone(),
            ))
            .key(name)
            .field(T::REGISTRY));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Document {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_link_resolves_schema_reference() {
        let mut doc = parse(
            r##"{
                "openapi": "3.0.3",
                "paths": {},
                "components": { "schemas": {
                    "Widget": { "type": "object", "properties": {
                        "parts": { "type": "array", "items": { "$ref": "#/components/schemas/Part" } }
                    } },
                    "Part": { "type": "string" }
                } }
            }"##,
        );

        link(&mut doc).unwrap();

        let widget = doc.components.schemas.get("Widget").unwrap().as_inline().unwrap();
        let parts = widget.properties.get("parts").unwrap().as_inline().unwrap();
        let items = parts.items.as_ref().unwrap();
        assert_eq!(items.handle(), doc.components.handle_of::<Schema>("Part"));
    }

    #[test]
    fn test_link_reports_unresolved_reference_with_path() {
        let mut doc = parse(
            r##"{
                "openapi": "3.0.3",
                "paths": { "/w": { "get": { "responses": {
                    "200": { "$ref": "#/components/responses/Missing" }
                } } } }
            }"##,
        );

        let err = link(&mut doc).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnresolvedReference("#/components/responses/Missing".into())
        );
        assert_eq!(err.path().to_string(), r#"paths["/w"].get.responses["200"]"#);
    }

    #[test]
    fn test_link_rejects_alias_cycle() {
        let mut doc = parse(
            r##"{
                "openapi": "3.0.3",
                "components": { "schemas": {
                    "A": { "$ref": "#/components/schemas/B" },
                    "B": { "$ref": "#/components/schemas/A" }
                } }
            }"##,
        );

        let err = link(&mut doc).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::CircularReference("#/components/schemas/B".into())
        );
        assert_eq!(err.path().to_string(), r#"components.schemas["A"]"#);
    }

    #[test]
    fn test_link_allows_recursive_schema() {
        let mut doc = parse(
            r##"{
                "openapi": "3.0.3",
                "components": { "schemas": {
                    "Node": { "type": "object", "properties": {
                        "next": { "$ref": "#/components/schemas/Node" }
                    } }
                } }
            }"##,
        );

        link(&mut doc).unwrap();
        link(&mut doc).unwrap();
    }
}
