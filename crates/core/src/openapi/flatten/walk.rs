//! Traversal of paths, operations, request bodies and responses.

use super::naming::{self, Owner};
use super::{Flattener, Mode};
use crate::openapi::error::{Result, ResultExt};
use crate::openapi::ordered::OrderedMap;
use crate::openapi::reference::{Handle, RefOr};
use crate::openapi::spec::{
    Content, MediaType, Method, Operation, Parameter, PathItem, Paths, RequestBody, Response,
    Responses, StatusCode,
};

/// Whether the registered response `handle` is used for failures only.
///
/// A response referenced under any 2xx code (or `2XX`) anywhere in `paths`
/// is a success response. One that no operation references counts as a
/// failure.
pub fn is_failure_response(paths: &Paths, handle: Handle<Response>) -> bool {
    !paths
        .values()
        .flat_map(PathItem::operations)
        .any(|(_, op)| {
            op.responses.iter().any(|(code, node)| {
                node.handle() == Some(handle) && StatusCode::new(code).is_success()
            })
        })
}

impl Flattener<'_> {
    pub(super) fn paths(&mut self, paths: &mut Paths) -> Result<()> {
        for (path, item) in paths {
            self.path_item(item, path).at_key(path)?;
        }
        Ok(())
    }

    pub(super) fn webhooks(&mut self, webhooks: &mut OrderedMap<RefOr<PathItem>>) -> Result<()> {
        for (name, node) in webhooks {
            if let Some(item) = node.as_inline_mut() {
                self.path_item(item, name).at_key(name)?;
            }
        }
        Ok(())
    }

    fn path_item(&mut self, item: &mut PathItem, path: &str) -> Result<()> {
        self.parameters(&mut item.parameters);
        for (method, op) in item.operations_mut() {
            self.operation(op, method, path).at_field(method.field())?;
        }
        Ok(())
    }

    fn operation(&mut self, op: &mut Operation, method: Method, path: &str) -> Result<()> {
        let operation_id = op
            .operation_id
            .clone()
            .unwrap_or_else(|| naming::fallback_operation_id(method, path));

        self.parameters(&mut op.parameters);
        if let Some(body) = &mut op.request_body {
            self.request_body_ref(body, &naming::request_body_name(&operation_id))
                .at_field("requestBody")?;
        }
        self.operation_responses(&mut op.responses, &operation_id)
            .at_field("responses")
    }

    /// Promotes inline parameters under their own name. Their schema and
    /// content are not walked.
    fn parameters(&mut self, parameters: &mut [RefOr<Parameter>]) {
        for node in parameters {
            let Some(name) = node.as_inline().map(|param| param.name.clone()) else {
                continue;
            };
            self.move_to_components(node, &name);
        }
    }

    fn request_body_ref(&mut self, node: &mut RefOr<RequestBody>, name: &str) -> Result<()> {
        let Some((handle, name)) = self.move_to_components(node, name) else {
            return Ok(());
        };
        self.update_entry(handle, |this, body| this.request_body(body, &name))
    }

    fn request_body(&mut self, body: &mut RequestBody, name: &str) -> Result<()> {
        self.content(&mut body.content, name, Owner::RequestBody, Mode::MoveIfNecessary)
            .at_field("content")
    }

    fn operation_responses(&mut self, responses: &mut Responses, operation_id: &str) -> Result<()> {
        for (code, node) in responses {
            let status = StatusCode::new(code);
            let name = naming::response_name(operation_id, status);
            self.response_ref(node, &name, Mode::for_status(status))
                .at_key(code)?;
        }
        Ok(())
    }

    fn response_ref(&mut self, node: &mut RefOr<Response>, name: &str, mode: Mode) -> Result<()> {
        let Some((handle, name)) = self.move_to_components(node, name) else {
            return Ok(());
        };
        self.update_entry(handle, |this, response| this.response(response, &name, mode))
    }

    fn response(&mut self, response: &mut Response, name: &str, mode: Mode) -> Result<()> {
        self.content(&mut response.content, name, Owner::Response, mode)
            .at_field("content")
    }

    fn content(&mut self, content: &mut Content, owner_name: &str, owner: Owner, mode: Mode) -> Result<()> {
        for (range, media) in content {
            let name = naming::media_type_name(owner_name, range, owner);
            self.media_type(media, name, mode).at_key(range)?;
        }
        Ok(())
    }

    /// A schema title wins over the derived name.
    fn media_type(&mut self, media: &mut MediaType, name: String, mode: Mode) -> Result<()> {
        let Some(schema) = &mut media.schema else {
            return Ok(());
        };
        let title = schema
            .value(&*self.components)
            .and_then(|schema| schema.title.as_deref())
            .filter(|title| !title.is_empty())
            .map(naming::to_go_pascal);
        let name = title.unwrap_or(name);
        self.schema_ref(schema, &name, mode).at_field("schema")
    }

    /// Walks every response present when this pass starts, in the mode its
    /// use by operations calls for.
    ///
    /// Responses promoted by the paths pass are walked again and yield nothing
    /// new. Responses appended by this pass are not revisited.
    pub(super) fn registered_responses(&mut self, paths: &Paths) -> Result<()> {
        let count = self.components.responses.len();
        for index in 0..count {
            let handle = Handle::<Response>::new(index);
            let Some(name) = self.components.name_of(handle).map(str::to_string) else {
                continue;
            };
            let mode = Mode::for_named_response(paths, handle);
            self.update_entry(handle, |this, response| this.response(response, &name, mode))
                .at_key(&name)?;
        }
        Ok(())
    }

    /// Walks every request body present when this pass starts, like
    /// [`Self::registered_responses`].
    pub(super) fn registered_request_bodies(&mut self) -> Result<()> {
        let count = self.components.request_bodies.len();
        for index in 0..count {
            let handle = Handle::<RequestBody>::new(index);
            let Some(name) = self.components.name_of(handle).map(str::to_string) else {
                continue;
            };
            self.update_entry(handle, |this, body| this.request_body(body, &name))
                .at_key(&name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::reference::Reference;

    fn operation_using(code: &str, handle: Handle<Response>) -> Operation {
        let mut op = Operation::default();
        op.responses.set(
            code,
            RefOr::Resolved(Reference::component("responses", "Shared"), handle),
        );
        op
    }

    fn paths_with(ops: Vec<(&str, Method, Operation)>) -> Paths {
        let mut paths = Paths::new();
        for (path, method, op) in ops {
            let mut item = paths.get(path).cloned().unwrap_or_default();
            item.set_operation(method, Some(op));
            paths.set(path, item);
        }
        paths
    }

    #[test]
    fn test_failure_response_classification() {
        let shared = Handle::new(0);
        let other = Handle::new(1);

        let paths = paths_with(vec![("/w", Method::Get, operation_using("404", shared))]);
        assert!(is_failure_response(&paths, shared));

        let paths = paths_with(vec![
            ("/w", Method::Get, operation_using("404", shared)),
            ("/v", Method::Post, operation_using("201", shared)),
        ]);
        assert!(!is_failure_response(&paths, shared));
        assert!(is_failure_response(&paths, other));

        let paths = paths_with(vec![("/w", Method::Get, operation_using("2XX", shared))]);
        assert!(!is_failure_response(&paths, shared));
    }
}
