//! The compiled, immutable schema graph and its runtime descriptor.

mod descriptor;
mod schema;

pub use descriptor::{
    AttributeDescriptor, EntityDescriptor, PropertyDescriptor, RelationshipDescriptor,
    SchemaDescriptor,
};
pub(crate) use schema::PropertySlot;
pub use schema::{
    CompiledSchema, EntityId, Property, RelationshipKey, ResolvedAttribute, ResolvedEntity,
    ResolvedRelationship,
};
