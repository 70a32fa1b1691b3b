//! References, handles and the reference-or-value duality.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ordered::OrderedMap;
use super::spec::{
    Callback, Components, Example, Header, Link, Parameter, PathItem, RequestBody, Response,
    Schema, SecurityScheme,
};

const COMPONENTS_PREFIX: &str = "#/components/";

/// A `$ref` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The identifier, e.g. `#/components/schemas/Widget`.
    #[serde(rename = "$ref")]
    pub identifier: String,
    /// Overrides the summary of the referenced entry (3.1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Overrides the description of the referenced entry (3.1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Reference {
    /// A bare reference to `identifier`.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            summary: None,
            description: None,
        }
    }

    /// Reference to entry `name` of the registry `#/components/<registry>`.
    pub fn component(registry: &str, name: &str) -> Self {
        Self::new(format!("{COMPONENTS_PREFIX}{registry}/{name}"))
    }
}

/// Position of an entry in the registry for `T`.
///
/// Handles stay valid while the registry only grows, which is all flattening
/// ever does to it.
pub struct Handle<T> {
    index: usize,
    kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) const fn new(index: usize) -> Self {
        Self {
            index,
            kind: PhantomData,
        }
    }

    /// Position in the registry.
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.index).finish()
    }
}

/// Either a reference to a registry entry or an inline value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefOr<T> {
    /// A reference that has not been linked yet.
    Unresolved(Reference),
    /// A linked reference.
    Resolved(Reference, Handle<T>),
    /// A value defined in place.
    Inline(Box<T>),
}

impl<T> RefOr<T> {
    /// Wraps `value` as an inline node.
    pub fn inline(value: T) -> Self {
        Self::Inline(Box::new(value))
    }

    /// Whether this node is a `$ref`, linked or not.
    pub const fn is_reference(&self) -> bool {
        !matches!(self, Self::Inline(_))
    }

    /// The `$ref` object, if this node is one.
    pub const fn reference(&self) -> Option<&Reference> {
        match self {
            Self::Unresolved(reference) | Self::Resolved(reference, _) => Some(reference),
            Self::Inline(_) => None,
        }
    }

    /// Target of a linked reference.
    pub const fn handle(&self) -> Option<Handle<T>> {
        match self {
            Self::Resolved(_, handle) => Some(*handle),
            _ => None,
        }
    }

    /// The value, if defined in place.
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            Self::Inline(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable access to a value defined in place.
    pub fn as_inline_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Inline(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Component> RefOr<T> {
    /// The value this node stands for: the inline value, or the entry a
    /// linked reference leads to.
    pub fn value<'a>(&'a self, components: &'a Components) -> Option<&'a T> {
        match self {
            Self::Inline(value) => Some(value),
            Self::Resolved(_, handle) => components.get(*handle),
            Self::Unresolved(_) => None,
        }
    }
}

impl<T: Serialize> Serialize for RefOr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unresolved(reference) | Self::Resolved(reference, _) => {
                reference.serialize(serializer)
            }
            Self::Inline(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RefOr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // An object with a string `$ref` is a reference, everything else is the value.
        // YAML values keep non-string keys such as unquoted status codes.
        let value = serde_yaml::Value::deserialize(deserializer)?;
        if value.get("$ref").is_some_and(serde_yaml::Value::is_string) {
            return Reference::deserialize(value)
                .map(Self::Unresolved)
                .map_err(D::Error::custom);
        }
        T::deserialize(value)
            .map(Self::inline)
            .map_err(D::Error::custom)
    }
}

/// An entity kind with its own registry under `components`.
pub trait Component: Sized + 'static {
    /// Registry name as used in identifiers, e.g. `schemas`.
    const REGISTRY: &'static str;

    /// The registry holding this kind.
    fn registry(components: &Components) -> &OrderedMap<RefOr<Self>>;

    /// Mutable access to the registry holding this kind.
    fn registry_mut(components: &mut Components) -> &mut OrderedMap<RefOr<Self>>;
}

macro_rules! component {
    ($ty:ty, $registry:literal, $field:ident) => {
        impl Component for $ty {
            const REGISTRY: &'static str = $registry;

            fn registry(components: &Components) -> &OrderedMap<RefOr<Self>> {
                &components.$field
            }

            fn registry_mut(components: &mut Components) -> &mut OrderedMap<RefOr<Self>> {
                &mut components.$field
            }
        }
    };
}

component!(Schema, "schemas", schemas);
component!(Response, "responses", responses);
component!(Parameter, "parameters", parameters);
component!(Example, "examples", examples);
component!(RequestBody, "requestBodies", request_bodies);
component!(Header, "headers", headers);
component!(SecurityScheme, "securitySchemes", security_schemes);
component!(Link, "links", links);
component!(Callback, "callbacks", callbacks);
component!(PathItem, "pathItems", path_items);

impl Components {
    /// Follows `handle` through any chain of aliases to an inline value.
    ///
    /// Returns `None` for dangling handles, unlinked aliases and alias cycles.
    pub fn get<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        let registry = T::registry(self);
        let mut current = handle;
        for _ in 0..=registry.len() {
            match registry.get_index(current.index())?.1 {
                RefOr::Inline(value) => return Some(value),
                RefOr::Resolved(_, next) => current = *next,
                RefOr::Unresolved(_) => return None,
            }
        }
        None
    }

    /// The inline value stored at `handle` itself, without following aliases.
    pub fn get_inline<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        T::registry(self)
            .get_index(handle.index())
            .and_then(|(_, entry)| entry.as_inline())
    }

    /// Registry key of `handle`.
    pub fn name_of<T: Component>(&self, handle: Handle<T>) -> Option<&str> {
        T::registry(self).get_index(handle.index()).map(|(name, _)| name)
    }

    /// Handle of the entry named `name`.
    pub fn handle_of<T: Component>(&self, name: &str) -> Option<Handle<T>> {
        T::registry(self).index_of(name).map(Handle::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::spec::DataType;

    #[test]
    fn test_deserialize_reference_or_inline() {
        let node: RefOr<Schema> =
            serde_json::from_str(r##"{ "$ref": "#/components/schemas/Widget" }"##).unwrap();
        assert_eq!(
            node,
            RefOr::Unresolved(Reference::new("#/components/schemas/Widget"))
        );

        let node: RefOr<Schema> = serde_json::from_str(r#"{ "type": "string" }"#).unwrap();
        assert_eq!(node, RefOr::inline(Schema::of_type(DataType::String)));
    }

    #[test]
    fn test_serialize_resolved_as_plain_reference() {
        let node: RefOr<Schema> = RefOr::Resolved(Reference::component("schemas", "Widget"), Handle::new(3));
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r##"{"$ref":"#/components/schemas/Widget"}"##
        );
    }

    #[test]
    fn test_get_follows_aliases() {
        let mut components = Components::default();
        components
            .schemas
            .set("Widget", RefOr::inline(Schema::of_type(DataType::Object)));
        components.schemas.set(
            "Gadget",
            RefOr::Resolved(Reference::component("schemas", "Widget"), Handle::new(0)),
        );

        let gadget = components.handle_of::<Schema>("Gadget").unwrap();
        assert_eq!(components.name_of(gadget), Some("Gadget"));
        assert_eq!(
            components.get(gadget).and_then(|s| s.schema_type.clone()),
            Some(crate::openapi::spec::SchemaType::Single(DataType::Object))
        );
        assert!(components.get_inline(gadget).is_none());
    }

    fn keys<T: Component>(components: &Components) -> Vec<&str> {
        (0..T::registry(components).len())
            .filter_map(|index| components.name_of(Handle::<T>::new(index)))
            .collect()
    }

    #[test]
    fn test_name_of_borrows_from_components() {
        let mut components = Components::default();
        components
            .responses
            .set("NotFound", RefOr::inline(Response::default()));
        components
            .schemas
            .set("Widget", RefOr::inline(Schema::of_type(DataType::Object)));

        assert_eq!(keys::<Response>(&components), vec!["NotFound"]);
        assert_eq!(keys::<Schema>(&components), vec!["Widget"]);
        assert!(keys::<Parameter>(&components).is_empty());
    }

    #[test]
    fn test_get_stops_on_alias_cycle() {
        let mut components = Components::default();
        components.schemas.set(
            "A",
            RefOr::Resolved(Reference::component("schemas", "B"), Handle::new(1)),
        );
        components.schemas.set(
            "B",
            RefOr::Resolved(Reference::component("schemas", "A"), Handle::new(0)),
        );

        assert!(components.get(Handle::<Schema>::new(0)).is_none());
    }
}
