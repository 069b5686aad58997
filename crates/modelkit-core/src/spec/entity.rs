//! Entity declarations.

use super::attribute::AttributeSpec;
use super::relationship::RelationshipSpec;
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An entity declaration: a named record type with attributes and relationships.
///
/// Attribute and relationship names share one property namespace. An
/// `EntitySpec` can only be obtained through [`EntitySpecBuilder::build`],
/// [`EntitySpec::new`] or deserialization, all of which reject duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntitySpec", into = "RawEntitySpec")]
pub struct EntitySpec {
    name: String,
    is_abstract: bool,
    bound_type_name: Option<String>,
    attributes: Vec<AttributeSpec>,
    relationships: Vec<RelationshipSpec>,
}

impl EntitySpec {
    /// Create a concrete entity from its properties.
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<AttributeSpec>,
        relationships: Vec<RelationshipSpec>,
    ) -> Result<Self, SchemaError> {
        Self::builder(name)
            .attributes(attributes)
            .relationships(relationships)
            .build()
    }

    /// Start building an entity.
    pub fn builder(name: impl Into<String>) -> EntitySpecBuilder {
        EntitySpecBuilder {
            spec: EntitySpec {
                name: name.into(),
                is_abstract: false,
                bound_type_name: None,
                attributes: Vec::new(),
                relationships: Vec::new(),
            },
        }
    }

    /// Entity name (unique within a schema).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Explicitly bound runtime type name, if any.
    pub fn bound_type_name(&self) -> Option<&str> {
        self.bound_type_name.as_deref()
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// Relationships in declaration order.
    pub fn relationships(&self) -> &[RelationshipSpec] {
        &self.relationships
    }

    /// Get an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Get a relationship by name.
    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipSpec> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Total number of declared properties.
    pub fn property_count(&self) -> usize {
        self.attributes.len() + self.relationships.len()
    }

    fn check_property_names(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::with_capacity(self.property_count());
        let names = self
            .attributes
            .iter()
            .map(AttributeSpec::name)
            .chain(self.relationships.iter().map(|r| r.name.as_str()));

        for name in names {
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateProperty {
                    entity: self.name.clone(),
                    property: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`EntitySpec`].
#[derive(Debug, Clone)]
pub struct EntitySpecBuilder {
    spec: EntitySpec,
}

impl EntitySpecBuilder {
    /// Mark the entity as abstract.
    pub fn abstract_entity(mut self) -> Self {
        self.spec.is_abstract = true;
        self
    }

    /// Bind the entity to a runtime type name.
    pub fn bound_type(mut self, type_name: impl Into<String>) -> Self {
        self.spec.bound_type_name = Some(type_name.into());
        self
    }

    /// Add an attribute.
    pub fn attribute(mut self, attribute: AttributeSpec) -> Self {
        self.spec.attributes.push(attribute);
        self
    }

    /// Add multiple attributes.
    pub fn attributes(mut self, attributes: impl IntoIterator<Item = AttributeSpec>) -> Self {
        self.spec.attributes.extend(attributes);
        self
    }

    /// Add a relationship.
    pub fn relationship(mut self, relationship: RelationshipSpec) -> Self {
        self.spec.relationships.push(relationship);
        self
    }

    /// Add multiple relationships.
    pub fn relationships(
        mut self,
        relationships: impl IntoIterator<Item = RelationshipSpec>,
    ) -> Self {
        self.spec.relationships.extend(relationships);
        self
    }

    /// Finish the entity, rejecting duplicate property names.
    pub fn build(self) -> Result<EntitySpec, SchemaError> {
        self.spec.check_property_names()?;
        Ok(self.spec)
    }
}

/// Serialized layout of [`EntitySpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntitySpec {
    name: String,
    #[serde(default)]
    is_abstract: bool,
    #[serde(default, rename = "boundType", skip_serializing_if = "Option::is_none")]
    bound_type_name: Option<String>,
    #[serde(default)]
    attributes: Vec<AttributeSpec>,
    #[serde(default)]
    relationships: Vec<RelationshipSpec>,
}

impl TryFrom<RawEntitySpec> for EntitySpec {
    type Error = SchemaError;

    fn try_from(raw: RawEntitySpec) -> Result<Self, Self::Error> {
        let mut builder = EntitySpec::builder(raw.name)
            .attributes(raw.attributes)
            .relationships(raw.relationships);
        if raw.is_abstract {
            builder = builder.abstract_entity();
        }
        if let Some(type_name) = raw.bound_type_name {
            builder = builder.bound_type(type_name);
        }
        builder.build()
    }
}

impl From<EntitySpec> for RawEntitySpec {
    fn from(spec: EntitySpec) -> Self {
        Self {
            name: spec.name,
            is_abstract: spec.is_abstract,
            bound_type_name: spec.bound_type_name,
            attributes: spec.attributes,
            relationships: spec.relationships,
        }
    }
}
