//! Core error types.

use crate::spec::ScalarType;
use thiserror::Error;

/// Errors raised while declaring or compiling a schema.
///
/// All of these are detected before a [`CompiledSchema`](crate::CompiledSchema)
/// exists; a compiled schema never produces them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A default value does not match the attribute's declared scalar type.
    #[error("attribute '{attribute}' is declared as {expected} but its default value is {found}")]
    TypeMismatch {
        attribute: String,
        expected: ScalarType,
        found: ScalarType,
    },

    /// Two properties of one entity share a name.
    #[error("entity '{entity}' declares property '{property}' more than once")]
    DuplicateProperty { entity: String, property: String },

    /// Two entities of one schema share a name.
    #[error("entity '{entity}' is declared more than once")]
    DuplicateEntity { entity: String },

    /// A relationship points at an entity that is not part of the schema.
    #[error("relationship '{entity}.{relationship}' targets unknown entity '{destination}'")]
    UnknownDestinationEntity {
        entity: String,
        relationship: String,
        destination: String,
    },

    /// A relationship names an inverse that does not exist on its destination.
    #[error(
        "relationship '{entity}.{relationship}' names inverse '{inverse}' which is not a relationship of its destination"
    )]
    UnknownInverseRelationship {
        entity: String,
        relationship: String,
        inverse: String,
    },

    /// A relationship was claimed as the inverse of two different relationships.
    #[error("relationship '{entity}.{relationship}' already has a different inverse")]
    ConflictingInverse { entity: String, relationship: String },

    /// An inverse does not point back at the entity owning the relationship.
    #[error(
        "inverse of '{entity}.{relationship}' targets '{found}' instead of its owner '{expected}'"
    )]
    InverseDestinationMismatch {
        entity: String,
        relationship: String,
        expected: String,
        found: String,
    },
}

/// Crate-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema declaration or compilation error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}
