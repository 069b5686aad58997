//! Resolved, read-only schema graph.
//!
//! Entities live in a flat arena owned by [`CompiledSchema`] and are addressed
//! by [`EntityId`]. Relationships refer to their destination and inverse by
//! id and [`RelationshipKey`], so cyclic graphs need no shared ownership.

use super::descriptor::{
    AttributeDescriptor, EntityDescriptor, PropertyDescriptor, RelationshipDescriptor,
    SchemaDescriptor,
};
use crate::spec::{AttributeSpec, DefaultValue, DeleteRule, RelationshipSpec, ScalarType};
use std::collections::HashMap;

/// Stable identifier of an entity inside one compiled schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the entity in declaration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Address of a relationship: owning entity and position among its relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationshipKey {
    /// Owning entity.
    pub entity: EntityId,
    /// Index into the owner's relationships, in declaration order.
    pub index: usize,
}

/// Location of a named property inside an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertySlot {
    Attribute(usize),
    Relationship(usize),
}

/// A compiled attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    spec: AttributeSpec,
}

impl ResolvedAttribute {
    pub(crate) fn new(spec: AttributeSpec) -> Self {
        Self { spec }
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.spec.scalar_type()
    }

    pub fn is_optional(&self) -> bool {
        self.spec.is_optional()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.spec.default_value()
    }

    pub fn allows_external_storage(&self) -> bool {
        self.spec.allows_external_storage()
    }

    pub fn preserves_on_delete(&self) -> bool {
        self.spec.preserves_on_delete()
    }

    /// The declaration this attribute was compiled from.
    pub fn spec(&self) -> &AttributeSpec {
        &self.spec
    }
}

/// A compiled relationship with its destination and inverse resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelationship {
    key: RelationshipKey,
    spec: RelationshipSpec,
    destination: EntityId,
    inverse: Option<RelationshipKey>,
}

impl ResolvedRelationship {
    pub(crate) fn new(
        key: RelationshipKey,
        spec: RelationshipSpec,
        destination: EntityId,
        inverse: Option<RelationshipKey>,
    ) -> Self {
        Self {
            key,
            spec,
            destination,
            inverse,
        }
    }

    /// This relationship's own address.
    pub fn key(&self) -> RelationshipKey {
        self.key
    }

    /// Owning entity.
    pub fn owner(&self) -> EntityId {
        self.key.entity
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Declared destination entity name.
    pub fn destination_name(&self) -> &str {
        &self.spec.destination_name
    }

    /// Resolved destination entity.
    pub fn destination_entity(&self) -> EntityId {
        self.destination
    }

    /// Resolved inverse relationship, whichever side declared it.
    pub fn inverse_relationship(&self) -> Option<RelationshipKey> {
        self.inverse
    }

    /// Inverse name as declared on this side.
    pub fn declared_inverse_name(&self) -> Option<&str> {
        self.spec.inverse_name.as_deref()
    }

    pub fn is_to_many(&self) -> bool {
        self.spec.is_to_many
    }

    pub fn is_optional(&self) -> bool {
        self.spec.is_optional
    }

    pub fn delete_rule(&self) -> DeleteRule {
        self.spec.delete_rule
    }

    /// Maximum number of related records; `0` means unlimited.
    pub fn max_count(&self) -> u32 {
        if self.spec.is_to_many {
            0
        } else {
            1
        }
    }

    /// Minimum number of related records.
    pub fn min_count(&self) -> u32 {
        if self.spec.is_optional {
            0
        } else {
            1
        }
    }

    /// The declaration this relationship was compiled from.
    pub fn spec(&self) -> &RelationshipSpec {
        &self.spec
    }
}

/// A property of a resolved entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Property<'a> {
    Attribute(&'a ResolvedAttribute),
    Relationship(&'a ResolvedRelationship),
}

impl<'a> Property<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Property::Attribute(a) => a.name(),
            Property::Relationship(r) => r.name(),
        }
    }

    pub fn as_attribute(&self) -> Option<&'a ResolvedAttribute> {
        match *self {
            Property::Attribute(a) => Some(a),
            Property::Relationship(_) => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&'a ResolvedRelationship> {
        match *self {
            Property::Attribute(_) => None,
            Property::Relationship(r) => Some(r),
        }
    }
}

/// A compiled entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    id: EntityId,
    name: String,
    is_abstract: bool,
    bound_type_name: Option<String>,
    effective_bound_type_name: String,
    attributes: Vec<ResolvedAttribute>,
    relationships: Vec<ResolvedRelationship>,
    property_index: HashMap<String, PropertySlot>,
}

impl ResolvedEntity {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: EntityId,
        name: String,
        is_abstract: bool,
        bound_type_name: Option<String>,
        effective_bound_type_name: String,
        attributes: Vec<ResolvedAttribute>,
        relationships: Vec<ResolvedRelationship>,
        property_index: HashMap<String, PropertySlot>,
    ) -> Self {
        Self {
            id,
            name,
            is_abstract,
            bound_type_name,
            effective_bound_type_name,
            attributes,
            relationships,
            property_index,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Explicitly declared bound type name.
    pub fn bound_type_name(&self) -> Option<&str> {
        self.bound_type_name.as_deref()
    }

    /// Bound type name with the configured fallback applied.
    pub fn effective_bound_type_name(&self) -> &str {
        &self.effective_bound_type_name
    }

    /// All properties in declaration order, attributes first.
    pub fn properties(&self) -> impl Iterator<Item = Property<'_>> + Clone {
        self.attributes
            .iter()
            .map(Property::Attribute)
            .chain(self.relationships.iter().map(Property::Relationship))
    }

    /// Look up any property by name.
    pub fn property(&self, name: &str) -> Option<Property<'_>> {
        match self.property_index.get(name)? {
            PropertySlot::Attribute(i) => self.attributes.get(*i).map(Property::Attribute),
            PropertySlot::Relationship(i) => {
                self.relationships.get(*i).map(Property::Relationship)
            }
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&ResolvedAttribute> {
        self.property(name)?.as_attribute()
    }

    /// Look up a relationship by name.
    pub fn relationship(&self, name: &str) -> Option<&ResolvedRelationship> {
        self.property(name)?.as_relationship()
    }

    pub fn attributes(&self) -> &[ResolvedAttribute] {
        &self.attributes
    }

    pub fn relationships(&self) -> &[ResolvedRelationship] {
        &self.relationships
    }
}

/// The immutable output of [`SchemaCompiler`](crate::SchemaCompiler).
///
/// There is no mutation API. Every destination and inverse reference inside
/// is guaranteed to resolve, and inverses are symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    entities: Vec<ResolvedEntity>,
    index: HashMap<String, EntityId>,
}

impl CompiledSchema {
    pub(crate) fn new(entities: Vec<ResolvedEntity>, index: HashMap<String, EntityId>) -> Self {
        Self { entities, index }
    }

    /// Get an entity by name.
    pub fn entity(&self, name: &str) -> Option<&ResolvedEntity> {
        self.index.get(name).and_then(|id| self.entity_by_id(*id))
    }

    /// Get an entity by id.
    pub fn entity_by_id(&self, id: EntityId) -> Option<&ResolvedEntity> {
        self.entities.get(id.index())
    }

    /// Iterate entities in declaration order. The iterator can be cloned to restart.
    pub fn entities(&self) -> std::slice::Iter<'_, ResolvedEntity> {
        self.entities.iter()
    }

    /// List entity names in declaration order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name()).collect()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get a relationship by key.
    pub fn relationship_at(&self, key: RelationshipKey) -> Option<&ResolvedRelationship> {
        self.entity_by_id(key.entity)?.relationships.get(key.index)
    }

    /// The entity a relationship points at.
    pub fn destination_of(&self, relationship: &ResolvedRelationship) -> &ResolvedEntity {
        &self.entities[relationship.destination.index()]
    }

    /// The inverse of a relationship, if it has one.
    pub fn inverse_of(&self, relationship: &ResolvedRelationship) -> Option<&ResolvedRelationship> {
        self.relationship_at(relationship.inverse?)
    }

    /// All relationships whose destination is the named entity.
    pub fn relationships_to(&self, entity: &str) -> Vec<&ResolvedRelationship> {
        let Some(target) = self.index.get(entity).copied() else {
            return Vec::new();
        };
        self.entities
            .iter()
            .flat_map(|e| e.relationships.iter())
            .filter(|r| r.destination == target)
            .collect()
    }

    /// Total number of relationships across all entities.
    pub fn relationship_count(&self) -> usize {
        self.entities.iter().map(|e| e.relationships.len()).sum()
    }

    /// Flatten the graph into the name-based form handed to a persistence runtime.
    pub fn descriptor(&self) -> SchemaDescriptor {
        let entities = self
            .entities
            .iter()
            .map(|entity| EntityDescriptor {
                name: entity.name.clone(),
                is_abstract: entity.is_abstract,
                bound_type_name: entity.effective_bound_type_name.clone(),
                properties: entity
                    .properties()
                    .map(|property| self.describe_property(property))
                    .collect(),
            })
            .collect();

        SchemaDescriptor { entities }
    }

    fn describe_property(&self, property: Property<'_>) -> PropertyDescriptor {
        match property {
            Property::Attribute(a) => PropertyDescriptor::Attribute(AttributeDescriptor {
                name: a.name().to_string(),
                scalar_type: a.scalar_type(),
                is_optional: a.is_optional(),
                default_value: a.default_value().cloned(),
                allows_external_storage: a.allows_external_storage(),
                preserves_on_delete: a.preserves_on_delete(),
            }),
            Property::Relationship(r) => PropertyDescriptor::Relationship(RelationshipDescriptor {
                name: r.name().to_string(),
                destination: self.destination_of(r).name.clone(),
                max_count: r.max_count(),
                min_count: r.min_count(),
                delete_rule: r.delete_rule(),
                inverse: self.inverse_of(r).map(|i| i.name().to_string()),
            }),
        }
    }
}
