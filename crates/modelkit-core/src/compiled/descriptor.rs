//! Name-based schema descriptor consumed by persistence runtimes.

use crate::error::Error;
use crate::spec::{DefaultValue, DeleteRule, ScalarType};
use rkyv::Archive;

/// Flat, owned description of a compiled schema.
///
/// References are plain names, so the descriptor can cross process or
/// storage boundaries as JSON or as rkyv bytes.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct SchemaDescriptor {
    /// Entities in declaration order.
    pub entities: Vec<EntityDescriptor>,
}

/// Description of one entity.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    pub name: String,
    pub is_abstract: bool,
    /// Bound type name with the fallback already applied.
    pub bound_type_name: String,
    pub properties: Vec<PropertyDescriptor>,
}

/// A tagged property.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyDescriptor {
    Attribute(AttributeDescriptor),
    Relationship(RelationshipDescriptor),
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub name: String,
    pub scalar_type: ScalarType,
    pub is_optional: bool,
    pub default_value: Option<DefaultValue>,
    pub allows_external_storage: bool,
    pub preserves_on_delete: bool,
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDescriptor {
    pub name: String,
    /// Destination entity name.
    pub destination: String,
    /// `0` means unlimited.
    pub max_count: u32,
    pub min_count: u32,
    pub delete_rule: DeleteRule,
    /// Inverse relationship name on the destination entity.
    pub inverse: Option<String>,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        match self {
            PropertyDescriptor::Attribute(a) => &a.name,
            PropertyDescriptor::Relationship(r) => &r.name,
        }
    }
}

impl SchemaDescriptor {
    /// Get an entity description by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Serialize the descriptor to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a descriptor from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

impl EntityDescriptor {
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeSpec, EntitySpec, RelationshipSpec, SchemaCompiler};
    use pretty_assertions::assert_eq;

    fn sample_descriptor() -> SchemaDescriptor {
        let list = EntitySpec::builder("ShoppingList")
            .attribute(
                AttributeSpec::new("title", ScalarType::String)
                    .required()
                    .with_default(DefaultValue::String("Groceries".into()))
                    .unwrap(),
            )
            .relationship(
                RelationshipSpec::to_many("items", "ShoppingListItem")
                    .with_inverse("shoppingList")
                    .with_delete_rule(DeleteRule::Cascade),
            )
            .build()
            .unwrap();
        let item = EntitySpec::builder("ShoppingListItem")
            .attribute(AttributeSpec::new("photo", ScalarType::Binary).with_external_storage())
            .relationship(RelationshipSpec::to_one("shoppingList", "ShoppingList"))
            .build()
            .unwrap();

        SchemaCompiler::new()
            .compile(vec![list, item])
            .unwrap()
            .descriptor()
    }

    #[test]
    fn test_descriptor_shape() {
        let descriptor = sample_descriptor();
        let list = descriptor.get_entity("ShoppingList").unwrap();

        assert_eq!(list.bound_type_name, crate::DEFAULT_BOUND_TYPE_NAME);
        assert_eq!(
            list.get_property("items"),
            Some(&PropertyDescriptor::Relationship(RelationshipDescriptor {
                name: "items".into(),
                destination: "ShoppingListItem".into(),
                max_count: 0,
                min_count: 0,
                delete_rule: DeleteRule::Cascade,
                inverse: Some("shoppingList".into()),
            }))
        );

        // inverse is reported on the side that did not declare it
        let item = descriptor.get_entity("ShoppingListItem").unwrap();
        match item.get_property("shoppingList") {
            Some(PropertyDescriptor::Relationship(r)) => {
                assert_eq!(r.inverse.as_deref(), Some("items"));
                assert_eq!(r.max_count, 1);
            }
            other => panic!("expected relationship, got {:?}", other),
        }
    }

    #[test]
    fn test_json_uses_kind_tag() {
        let json = sample_descriptor().to_json().unwrap();

        assert!(json.contains("\"kind\": \"relationship\""));
        assert!(json.contains("\"kind\": \"attribute\""));
        assert!(json.contains("\"scalarType\": \"binary\""));

        let decoded = SchemaDescriptor::from_json(&json).unwrap();
        assert_eq!(decoded, sample_descriptor());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let descriptor = sample_descriptor();
        let bytes = descriptor.to_bytes().unwrap();
        let decoded = SchemaDescriptor::from_bytes(&bytes).unwrap();

        assert_eq!(descriptor, decoded);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = SchemaDescriptor::from_bytes(&[1, 2, 3]);
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }
}
