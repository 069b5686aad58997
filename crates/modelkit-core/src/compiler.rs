//! Two-pass compiler from entity specs to a [`CompiledSchema`].
//!
//! Pass 1 registers every entity with resolved attributes and relationship
//! placeholders. Pass 2 walks the placeholders in declaration order, resolving
//! destinations by name and linking inverse pairs from whichever side
//! declares them. Any failure aborts the whole compilation.

use crate::compiled::{
    CompiledSchema, EntityId, PropertySlot, RelationshipKey, ResolvedAttribute, ResolvedEntity,
    ResolvedRelationship,
};
use crate::config::CompilerConfig;
use crate::error::SchemaError;
use crate::spec::{EntitySpec, RelationshipSpec};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Compiles entity specs into a linked schema graph.
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    config: CompilerConfig,
}

/// Entity registered in pass 1, relationships not yet resolved.
struct EntitySkeleton {
    name: String,
    is_abstract: bool,
    bound_type_name: Option<String>,
    attributes: Vec<ResolvedAttribute>,
    relationships: Vec<RelationshipPlaceholder>,
    property_index: HashMap<String, PropertySlot>,
}

struct RelationshipPlaceholder {
    spec: RelationshipSpec,
    destination: Option<EntityId>,
    inverse: Option<RelationshipKey>,
}

/// Name-keyed arena being filled during one compilation.
struct Registry {
    entities: Vec<EntitySkeleton>,
    index: HashMap<String, EntityId>,
}

impl SchemaCompiler {
    /// Create a compiler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with a custom configuration.
    pub fn with_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile an ordered collection of entity specs.
    ///
    /// Entity names must be unique. Relationships may reference entities
    /// declared before or after them, including their own entity.
    pub fn compile(
        &self,
        entity_specs: impl IntoIterator<Item = EntitySpec>,
    ) -> Result<CompiledSchema, SchemaError> {
        let specs: Vec<EntitySpec> = entity_specs.into_iter().collect();
        let result = self.run(specs);

        match &result {
            Ok(schema) => info!(
                entities = schema.len(),
                relationships = schema.relationship_count(),
                "Compiled schema"
            ),
            Err(e) => warn!(error = %e, "Schema compilation failed"),
        }
        result
    }

    fn run(&self, specs: Vec<EntitySpec>) -> Result<CompiledSchema, SchemaError> {
        check_unique_entities(&specs)?;
        let mut registry = self.build_skeletons(specs);
        self.resolve_references(&mut registry)?;
        self.finish(registry)
    }

    /// Pass 1: register every entity with attributes resolved and relationships pending.
    fn build_skeletons(&self, specs: Vec<EntitySpec>) -> Registry {
        let mut registry = Registry {
            entities: Vec::with_capacity(specs.len()),
            index: HashMap::with_capacity(specs.len()),
        };

        for spec in specs {
            let id = EntityId::new(registry.entities.len());
            let mut property_index = HashMap::with_capacity(spec.property_count());

            let attributes: Vec<ResolvedAttribute> = spec
                .attributes()
                .iter()
                .enumerate()
                .map(|(i, attribute)| {
                    if self.config.warn_on_storage_hints
                        && attribute.has_storage_hints()
                        && !attribute.scalar_type().is_large_object()
                    {
                        warn!(
                            entity = spec.name(),
                            attribute = attribute.name(),
                            scalar_type = %attribute.scalar_type(),
                            "Storage hints have no effect on this attribute type"
                        );
                    }
                    property_index.insert(attribute.name().to_string(), PropertySlot::Attribute(i));
                    ResolvedAttribute::new(attribute.clone())
                })
                .collect();

            let relationships: Vec<RelationshipPlaceholder> = spec
                .relationships()
                .iter()
                .enumerate()
                .map(|(i, relationship)| {
                    property_index.insert(relationship.name.clone(), PropertySlot::Relationship(i));
                    RelationshipPlaceholder {
                        spec: relationship.clone(),
                        destination: None,
                        inverse: None,
                    }
                })
                .collect();

            debug!(
                entity = spec.name(),
                attributes = attributes.len(),
                relationships = relationships.len(),
                "Registered entity"
            );

            registry.index.insert(spec.name().to_string(), id);
            registry.entities.push(EntitySkeleton {
                name: spec.name().to_string(),
                is_abstract: spec.is_abstract(),
                bound_type_name: spec.bound_type_name().map(str::to_string),
                attributes,
                relationships,
                property_index,
            });
        }

        registry
    }

    /// Pass 2: resolve destinations and link inverses in declaration order.
    fn resolve_references(&self, registry: &mut Registry) -> Result<(), SchemaError> {
        let pending: Vec<RelationshipKey> = registry
            .entities
            .iter()
            .enumerate()
            .flat_map(|(e, entity)| {
                (0..entity.relationships.len()).map(move |index| RelationshipKey {
                    entity: EntityId::new(e),
                    index,
                })
            })
            .collect();

        debug!(relationships = pending.len(), "Resolving relationship references");

        for key in pending {
            let destination = registry.resolve_destination(key)?;
            registry.placeholder_mut(key).destination = Some(destination);

            let Some(inverse_name) = registry.placeholder(key).spec.inverse_name.clone() else {
                continue;
            };
            let inverse = registry.find_inverse(key, destination, &inverse_name)?;
            if self.config.strict_inverses {
                registry.check_inverse_points_back(key, inverse)?;
            }
            registry.link(key, inverse)?;
        }

        Ok(())
    }

    /// Turn the fully resolved registry into the immutable schema.
    fn finish(&self, registry: Registry) -> Result<CompiledSchema, SchemaError> {
        let Registry { entities, index } = registry;
        let mut resolved = Vec::with_capacity(entities.len());

        for (e, skeleton) in entities.into_iter().enumerate() {
            let id = EntityId::new(e);
            let relationships = skeleton
                .relationships
                .into_iter()
                .enumerate()
                .map(|(i, placeholder)| -> Result<ResolvedRelationship, SchemaError> {
                    let key = RelationshipKey { entity: id, index: i };
                    let destination = placeholder.destination.ok_or_else(|| {
                        SchemaError::UnknownDestinationEntity {
                            entity: skeleton.name.clone(),
                            relationship: placeholder.spec.name.clone(),
                            destination: placeholder.spec.destination_name.clone(),
                        }
                    })?;
                    Ok(ResolvedRelationship::new(
                        key,
                        placeholder.spec,
                        destination,
                        placeholder.inverse,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let effective_bound_type_name = skeleton
                .bound_type_name
                .clone()
                .unwrap_or_else(|| self.config.default_bound_type_name.clone());

            resolved.push(ResolvedEntity::new(
                id,
                skeleton.name,
                skeleton.is_abstract,
                skeleton.bound_type_name,
                effective_bound_type_name,
                skeleton.attributes,
                relationships,
                skeleton.property_index,
            ));
        }

        Ok(CompiledSchema::new(resolved, index))
    }
}

impl Registry {
    fn placeholder(&self, key: RelationshipKey) -> &RelationshipPlaceholder {
        &self.entities[key.entity.index()].relationships[key.index]
    }

    fn placeholder_mut(&mut self, key: RelationshipKey) -> &mut RelationshipPlaceholder {
        &mut self.entities[key.entity.index()].relationships[key.index]
    }

    fn entity_name(&self, id: EntityId) -> &str {
        &self.entities[id.index()].name
    }

    fn resolve_destination(&self, key: RelationshipKey) -> Result<EntityId, SchemaError> {
        let spec = &self.placeholder(key).spec;
        self.index
            .get(&spec.destination_name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownDestinationEntity {
                entity: self.entity_name(key.entity).to_string(),
                relationship: spec.name.clone(),
                destination: spec.destination_name.clone(),
            })
    }

    fn find_inverse(
        &self,
        key: RelationshipKey,
        destination: EntityId,
        inverse_name: &str,
    ) -> Result<RelationshipKey, SchemaError> {
        match self.entities[destination.index()]
            .property_index
            .get(inverse_name)
        {
            Some(PropertySlot::Relationship(index)) => Ok(RelationshipKey {
                entity: destination,
                index: *index,
            }),
            _ => Err(SchemaError::UnknownInverseRelationship {
                entity: self.entity_name(key.entity).to_string(),
                relationship: self.placeholder(key).spec.name.clone(),
                inverse: inverse_name.to_string(),
            }),
        }
    }

    /// The inverse must target the entity that owns `key`.
    fn check_inverse_points_back(
        &self,
        key: RelationshipKey,
        inverse: RelationshipKey,
    ) -> Result<(), SchemaError> {
        let owner = self.entity_name(key.entity);
        let found = &self.placeholder(inverse).spec.destination_name;
        if found == owner {
            return Ok(());
        }
        Err(SchemaError::InverseDestinationMismatch {
            entity: owner.to_string(),
            relationship: self.placeholder(key).spec.name.clone(),
            expected: owner.to_string(),
            found: found.clone(),
        })
    }

    /// Link `a` and `b` as each other's inverse.
    ///
    /// Re-linking an existing pair is a no-op; claiming a relationship that
    /// already has another inverse is a conflict.
    fn link(&mut self, a: RelationshipKey, b: RelationshipKey) -> Result<(), SchemaError> {
        for (slot, partner) in [(a, b), (b, a)] {
            if let Some(existing) = self.placeholder(slot).inverse {
                if existing != partner {
                    return Err(SchemaError::ConflictingInverse {
                        entity: self.entity_name(slot.entity).to_string(),
                        relationship: self.placeholder(slot).spec.name.clone(),
                    });
                }
            }
        }

        self.placeholder_mut(a).inverse = Some(b);
        self.placeholder_mut(b).inverse = Some(a);
        Ok(())
    }
}

fn check_unique_entities(specs: &[EntitySpec]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.name()) {
            return Err(SchemaError::DuplicateEntity {
                entity: spec.name().to_string(),
            });
        }
    }
    Ok(())
}
