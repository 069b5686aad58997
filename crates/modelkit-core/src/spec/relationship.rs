//! Relationship declarations between entities.

use super::types::DeleteRule;
use serde::{Deserialize, Serialize};

/// An edge declared on an entity, pointing at another entity by name.
///
/// The destination and inverse are plain names here; the compiler turns them
/// into references into the compiled schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipSpec {
    /// Relationship name (unique among the owner's properties).
    pub name: String,
    /// Name of the destination entity. May be the owning entity itself.
    #[serde(rename = "destination")]
    pub destination_name: String,
    /// Whether the relationship connects to many records.
    #[serde(default)]
    pub is_to_many: bool,
    /// Whether a record may have no related record.
    #[serde(default = "default_optional")]
    pub is_optional: bool,
    /// Action applied to related records on delete.
    #[serde(default)]
    pub delete_rule: DeleteRule,
    /// Name of the matching relationship on the destination entity.
    #[serde(default, rename = "inverse", skip_serializing_if = "Option::is_none")]
    pub inverse_name: Option<String>,
}

fn default_optional() -> bool {
    true
}

impl RelationshipSpec {
    /// Create an optional to-one relationship.
    pub fn to_one(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination_name: destination.into(),
            is_to_many: false,
            is_optional: true,
            delete_rule: DeleteRule::Nullify,
            inverse_name: None,
        }
    }

    /// Create an optional to-many relationship.
    pub fn to_many(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            is_to_many: true,
            ..Self::to_one(name, destination)
        }
    }

    /// Set the inverse relationship name.
    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse_name = Some(inverse.into());
        self
    }

    /// Set the delete rule.
    pub fn with_delete_rule(mut self, delete_rule: DeleteRule) -> Self {
        self.delete_rule = delete_rule;
        self
    }

    /// Mark the relationship as required.
    pub fn required(mut self) -> Self {
        self.is_optional = false;
        self
    }

    /// Check if this relationship points back at its owner.
    pub fn is_self_referential(&self, owner: &str) -> bool {
        self.destination_name == owner
    }
}
