//! Promotion rules for schemas.

use super::{naming, Flattener, Mode};
use crate::openapi::error::{Error, ErrorKind, Result, ResultExt};
use crate::openapi::reference::{Handle, RefOr};
use crate::openapi::spec::{AdditionalProperties, Schema, SchemaKind};

impl Flattener<'_> {
    /// Promotes the schema at `node` if `mode` asks for it, then walks its children.
    ///
    /// References are left untouched.
    pub(super) fn schema_ref(&mut self, node: &mut RefOr<Schema>, name: &str, mode: Mode) -> Result<()> {
        let RefOr::Inline(schema) = node else {
            return Ok(());
        };

        if mode == Mode::AlwaysMove || self.needs_name(schema, mode)? {
            let Some((handle, _)) = self.move_to_components(node, name) else {
                return Ok(());
            };
            return self.update_entry(handle, |this, schema| this.schema(schema, name));
        }
        self.schema(schema, name)
    }

    /// Whether `schema` gets its own component under `mode`.
    ///
    /// | kind                       | promoted when                  |
    /// |----------------------------|--------------------------------|
    /// | integer, number, boolean   | never                          |
    /// | string                     | it has an enum                 |
    /// | object                     | it has properties              |
    /// | array                      | its items would be promoted    |
    /// | allOf only                 | never                          |
    ///
    /// `NeverMove` turns every "promoted" into "not promoted" but still
    /// rejects unsupported kinds.
    fn needs_name(&self, schema: &Schema, mode: Mode) -> Result<bool> {
        let movable = mode != Mode::NeverMove;
        match schema.kind() {
            SchemaKind::Integer | SchemaKind::Number | SchemaKind::Boolean | SchemaKind::AllOf => {
                Ok(false)
            }
            SchemaKind::String => Ok(movable && schema.enum_values.is_some()),
            SchemaKind::Object => Ok(movable && !schema.properties.is_empty()),
            SchemaKind::Array => {
                let components = &*self.components;
                let items = schema
                    .items
                    .as_ref()
                    .and_then(|items| items.value(components))
                    .ok_or_else(|| Error::new(ErrorKind::Required).field("items"))?;
                match items.kind() {
                    SchemaKind::Integer => Ok(false),
                    SchemaKind::String => Ok(movable && items.enum_values.is_some()),
                    SchemaKind::Object => Ok(movable && !items.properties.is_empty()),
                    other => Err(ErrorKind::UnsupportedItemType(other.to_string()).into()),
                }
            }
            SchemaKind::Unsupported(kind) => Err(ErrorKind::UnsupportedSchemaType(kind).into()),
        }
    }

    /// Walks the children of `schema`, naming them after `name`.
    ///
    /// allOf members are never promoted; items, properties and
    /// additionalProperties are promoted when necessary.
    pub(super) fn schema(&mut self, schema: &mut Schema, name: &str) -> Result<()> {
        match schema.kind() {
            SchemaKind::Integer | SchemaKind::Number | SchemaKind::String | SchemaKind::Boolean => {
                return Ok(());
            }
            SchemaKind::Array | SchemaKind::Object | SchemaKind::AllOf => {}
            SchemaKind::Unsupported(kind) => {
                return Err(ErrorKind::UnsupportedSchemaType(kind).into());
            }
        }

        for (index, member) in schema.all_of.iter_mut().enumerate() {
            self.schema_ref(member, &format!("{name}AllOf{index}"), Mode::NeverMove)
                .at_index(index)
                .at_field("allOf")?;
        }
        if let Some(items) = &mut schema.items {
            self.schema_ref(items, &format!("{name}Items"), Mode::MoveIfNecessary)
                .at_field("items")?;
        }
        for (property, value) in &mut schema.properties {
            self.schema_ref(value, &naming::property_name(name, property), Mode::MoveIfNecessary)
                .at_key(property)
                .at_field("properties")?;
        }
        if let Some(AdditionalProperties::Schema(value)) = &mut schema.additional_properties {
            self.schema_ref(value, &format!("{name}Value"), Mode::MoveIfNecessary)
                .at_field("additionalProperties")?;
        }
        Ok(())
    }

    /// Walks the children of every schema present when this pass starts.
    ///
    /// That includes schemas promoted by the paths and webhooks passes, whose
    /// children are already in normal form. Schemas appended by this pass are
    /// not revisited.
    pub(super) fn registered_schemas(&mut self) -> Result<()> {
        let count = self.components.schemas.len();
        for index in 0..count {
            let handle = Handle::<Schema>::new(index);
            let Some(name) = self.components.name_of(handle).map(str::to_string) else {
                continue;
            };
            self.update_entry(handle, |this, schema| this.schema(schema, &name))
                .at_key(&name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::openapi::reference::Reference;
    use crate::openapi::spec::Components;

    fn schema(json: &str) -> RefOr<Schema> {
        serde_json::from_str(json).unwrap()
    }

    fn promote(json: &str, mode: Mode) -> (RefOr<Schema>, Components) {
        let mut components = Components::default();
        let mut node = schema(json);
        let mut flattener = Flattener::new(&mut components);
        flattener.schema_ref(&mut node, "Widget", mode).unwrap();
        (node, components)
    }

    #[test]
    fn test_scalars_stay_inline() {
        for json in [
            r#"{"type":"integer"}"#,
            r#"{"type":"number"}"#,
            r#"{"type":"boolean"}"#,
            r#"{"type":"string"}"#,
            r#"{"type":"object"}"#,
            r#"{"type":"array","items":{"type":"integer"}}"#,
            r#"{"allOf":[{"type":"object","properties":{"a":{"type":"string"}}}]}"#,
        ] {
            let (node, components) = promote(json, Mode::MoveIfNecessary);
            assert!(!node.is_reference(), "{json} was promoted");
            assert!(components.schemas.is_empty());
        }
    }

    #[test]
    fn test_string_enum_and_object_are_promoted() {
        let (node, components) = promote(r#"{"type":"string","enum":["a","b"]}"#, Mode::MoveIfNecessary);
        assert_eq!(
            node.reference().map(|r| r.identifier.as_str()),
            Some("#/components/schemas/Widget")
        );
        assert_eq!(components.schemas.len(), 1);

        let (node, _) = promote(
            r#"{"type":"object","properties":{"id":{"type":"string"}}}"#,
            Mode::MoveIfNecessary,
        );
        assert!(node.is_reference());
    }

    #[test]
    fn test_always_move_promotes_scalars() {
        let (node, components) = promote(r#"{"type":"string"}"#, Mode::AlwaysMove);
        assert!(node.is_reference());
        assert_eq!(components.schemas.keys().collect::<Vec<_>>(), vec!["Widget"]);
    }

    #[test]
    fn test_never_move_walks_children() {
        let (node, components) = promote(
            r#"{"type":"object","properties":{
                "owner":{"type":"object","properties":{"name":{"type":"string"}}}
            }}"#,
            Mode::NeverMove,
        );
        let widget = node.as_inline().unwrap();
        assert!(widget.properties.get("owner").unwrap().is_reference());
        assert_eq!(
            components.schemas.keys().collect::<Vec<_>>(),
            vec!["WidgetOwner"]
        );
    }

    #[test]
    fn test_array_of_objects_names_items() {
        let (node, components) = promote(
            r#"{"type":"array","items":{"type":"object","properties":{"id":{"type":"integer"}}}}"#,
            Mode::MoveIfNecessary,
        );
        assert!(node.is_reference());
        assert_eq!(
            components.schemas.keys().collect::<Vec<_>>(),
            vec!["Widget", "WidgetItems"]
        );
        let array = components.schemas.get("Widget").unwrap().as_inline().unwrap();
        assert_eq!(
            array.items.as_ref().and_then(|i| i.reference()).map(|r| r.identifier.as_str()),
            Some("#/components/schemas/WidgetItems")
        );
    }

    #[test]
    fn test_array_items_through_reference() {
        let mut components = Components::default();
        components.schemas.set(
            "Color",
            schema(r#"{"type":"string","enum":["red","green"]}"#),
        );
        let mut node = schema(r#"{"type":"array"}"#);
        node.as_inline_mut().unwrap().items = Some(RefOr::Resolved(
            Reference::component("schemas", "Color"),
            Handle::new(0),
        ));

        Flattener::new(&mut components)
            .schema_ref(&mut node, "Palette", Mode::MoveIfNecessary)
            .unwrap();
        assert!(node.is_reference());
        assert!(components.schemas.contains_key("Palette"));
    }

    #[test]
    fn test_unsupported_kinds() {
        let mut components = Components::default();
        let mut flattener = Flattener::new(&mut components);

        let mut node = schema(r#"{"type":"null"}"#);
        let err = flattener
            .schema_ref(&mut node, "Widget", Mode::MoveIfNecessary)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnsupportedSchemaType("null".into()));

        let mut node = schema(r#"{"type":"array","items":{"type":"boolean"}}"#);
        let err = flattener
            .schema_ref(&mut node, "Widget", Mode::MoveIfNecessary)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnsupportedItemType("boolean".into()));

        let mut node = schema(r#"{"type":"array"}"#);
        let err = flattener
            .schema_ref(&mut node, "Widget", Mode::MoveIfNecessary)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Required);
        assert_eq!(err.path().to_string(), "items");
    }

    #[test]
    fn test_all_of_members_keep_inline_but_children_move() {
        let (node, components) = promote(
            r#"{"allOf":[
                {"type":"object","properties":{"tags":{"type":"string","enum":["x"]}}}
            ]}"#,
            Mode::MoveIfNecessary,
        );
        let composed = node.as_inline().unwrap();
        assert!(!composed.all_of[0].is_reference());
        assert_eq!(
            components.schemas.keys().collect::<Vec<_>>(),
            vec!["WidgetAllOf0Tags"]
        );
    }
}
