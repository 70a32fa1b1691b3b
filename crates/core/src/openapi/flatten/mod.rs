//! Flattening: promote inline definitions into `components`.
//!
//! This module contains:
//! - `naming`: Name derivation for promoted values
//! - `schema`: Promotion rules for schemas and their children
//! - `walk`: Traversal of paths, operations, bodies and responses
//!
//! A flattened document refers to named components wherever a code
//! generator would want a named type, and keeps scalar shapes inline.

pub mod naming;
mod schema;
mod walk;

use tracing::debug;

use super::error::{Result, ResultExt};
use super::reference::{Component, Handle, RefOr, Reference};
use super::spec::{Components, Document, Paths, Response, StatusCode};

pub use walk::is_failure_response;

/// How eagerly an inline value is promoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Promote only shapes that need a name of their own.
    #[default]
    MoveIfNecessary,
    /// Promote regardless of shape.
    AlwaysMove,
    /// Never promote, but still walk into children.
    NeverMove,
}

impl Mode {
    /// Mode for a response declared under `code`: failures are always promoted.
    pub fn for_status(code: StatusCode<'_>) -> Self {
        if code.is_success() {
            Self::MoveIfNecessary
        } else {
            Self::AlwaysMove
        }
    }

    /// Mode for the registered response `handle`, classified by how operations use it.
    pub fn for_named_response(paths: &Paths, handle: Handle<Response>) -> Self {
        if is_failure_response(paths, handle) {
            Self::AlwaysMove
        } else {
            Self::MoveIfNecessary
        }
    }
}

/// Which optional passes to run besides the paths walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Also walk entries already registered under `components`.
    pub components: bool,
    /// Also walk `webhooks`.
    pub webhooks: bool,
}

/// Number of promotions per registry during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    /// Schemas moved into `components.schemas`.
    pub schemas: usize,
    /// Responses moved into `components.responses`.
    pub responses: usize,
    /// Parameters moved into `components.parameters`.
    pub parameters: usize,
    /// Request bodies moved into `components.requestBodies`.
    pub request_bodies: usize,
}

impl FlattenStats {
    /// Promotions across all registries.
    pub fn total(&self) -> usize {
        self.schemas + self.responses + self.parameters + self.request_bodies
    }

    fn record(&mut self, registry: &str) {
        match registry {
            "schemas" => self.schemas += 1,
            "responses" => self.responses += 1,
            "parameters" => self.parameters += 1,
            "requestBodies" => self.request_bodies += 1,
            _ => {}
        }
    }
}

/// Rewrites `doc` into normal form by walking its paths.
pub fn flatten(doc: &mut Document) -> Result<()> {
    flatten_with(doc, FlattenOptions::default()).map(|_| ())
}

/// Rewrites `doc` into normal form, running the passes selected by `options`.
///
/// `doc` must be linked. On error the document may be partially flattened.
pub fn flatten_with(doc: &mut Document, options: FlattenOptions) -> Result<FlattenStats> {
    let mut flattener = Flattener::new(&mut doc.components);

    flattener.paths(&mut doc.paths).at_field("paths")?;
    if options.webhooks {
        flattener.webhooks(&mut doc.webhooks).at_field("webhooks")?;
    }
    if options.components {
        flattener.components(&doc.paths).at_field("components")?;
    }

    let stats = flattener.stats;
    debug!(
        schemas = stats.schemas,
        responses = stats.responses,
        parameters = stats.parameters,
        request_bodies = stats.request_bodies,
        "Flattened document."
    );
    Ok(stats)
}

/// Promotion context for one run.
#[derive(Debug)]
struct Flattener<'a> {
    components: &'a mut Components,
    stats: FlattenStats,
}

impl<'a> Flattener<'a> {
    fn new(components: &'a mut Components) -> Self {
        Self {
            components,
            stats: FlattenStats::default(),
        }
    }
}

impl Flattener<'_> {
    /// Moves an inline `node` into its registry and points `node` at it.
    ///
    /// The entry is stored under a unique key derived from `candidate`.
    /// Returns the new entry's handle and key, or `None` if `node` already is
    /// a reference.
    fn move_to_components<T: Component>(
        &mut self,
        node: &mut RefOr<T>,
        candidate: &str,
    ) -> Option<(Handle<T>, String)> {
        if node.is_reference() {
            return None;
        }
        let registry = T::registry_mut(self.components);
        let name = registry.unique_name(&naming::sanitize_key(candidate));
        let handle = Handle::new(registry.len());
        let reference = Reference::component(T::REGISTRY, &name);
        let value = std::mem::replace(node, RefOr::Resolved(reference, handle));
        registry.set(name.as_str(), value);

        self.stats.record(T::REGISTRY);
        debug!(registry = T::REGISTRY, name = %name, "Promoted inline definition.");
        Some((handle, name))
    }

    /// Runs `f` on a copy of the inline entry at `handle` and stores the result.
    ///
    /// The registry holds the unmodified entry while `f` runs. Alias entries
    /// are skipped.
    fn update_entry<T: Component + Clone>(
        &mut self,
        handle: Handle<T>,
        f: impl FnOnce(&mut Self, &mut T) -> Result<()>,
    ) -> Result<()> {
        let Some(mut value) = self.components.get_inline(handle).cloned() else {
            return Ok(());
        };
        let result = f(self, &mut value);
        if let Some((_, RefOr::Inline(slot))) =
            T::registry_mut(self.components).get_index_mut(handle.index())
        {
            **slot = value;
        }
        result
    }

    /// Walks the registries after the paths and webhooks passes, so entries
    /// those passes promoted are walked a second time.
    fn components(&mut self, paths: &Paths) -> Result<()> {
        self.registered_schemas().at_field("schemas")?;
        self.registered_responses(paths).at_field("responses")?;
        self.registered_request_bodies().at_field("requestBodies")
    }
}
