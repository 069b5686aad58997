//! Attribute declarations for entities.

use super::types::{DefaultValue, ScalarType};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};

/// A scalar field declared on an entity.
///
/// Fields are private so that a default value can never disagree with the
/// declared scalar type; both [`AttributeSpec::with_default`] and
/// deserialization enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAttributeSpec", into = "RawAttributeSpec")]
pub struct AttributeSpec {
    name: String,
    scalar_type: ScalarType,
    is_optional: bool,
    default_value: Option<DefaultValue>,
    allows_external_storage: bool,
    preserves_on_delete: bool,
}

impl AttributeSpec {
    /// Create a new optional attribute without a default value.
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
            is_optional: true,
            default_value: None,
            allows_external_storage: false,
            preserves_on_delete: false,
        }
    }

    /// Mark the attribute as required.
    pub fn required(mut self) -> Self {
        self.is_optional = false;
        self
    }

    /// Set whether the attribute is optional.
    pub fn with_optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    /// Set the default value.
    ///
    /// Fails with [`SchemaError::TypeMismatch`] if the value's kind is not the
    /// attribute's scalar type.
    pub fn with_default(mut self, value: DefaultValue) -> Result<Self, SchemaError> {
        if !value.matches(self.scalar_type) {
            return Err(SchemaError::TypeMismatch {
                attribute: self.name,
                expected: self.scalar_type,
                found: value.kind(),
            });
        }
        self.default_value = Some(value);
        Ok(self)
    }

    /// Allow the runtime to store values outside the record.
    pub fn with_external_storage(mut self) -> Self {
        self.allows_external_storage = true;
        self
    }

    /// Keep the value around after the owning record is deleted.
    pub fn with_preserve_on_delete(mut self) -> Self {
        self.preserves_on_delete = true;
        self
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared scalar type.
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Whether a record may omit this value.
    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// Default value, if any.
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default_value.as_ref()
    }

    pub fn allows_external_storage(&self) -> bool {
        self.allows_external_storage
    }

    pub fn preserves_on_delete(&self) -> bool {
        self.preserves_on_delete
    }

    /// Whether any storage hint is set.
    pub fn has_storage_hints(&self) -> bool {
        self.allows_external_storage || self.preserves_on_delete
    }
}

/// Serialized layout of [`AttributeSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttributeSpec {
    name: String,
    #[serde(rename = "type")]
    scalar_type: ScalarType,
    #[serde(default = "default_optional")]
    optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<DefaultValue>,
    #[serde(default)]
    allows_external_storage: bool,
    #[serde(default)]
    preserves_on_delete: bool,
}

fn default_optional() -> bool {
    true
}

impl TryFrom<RawAttributeSpec> for AttributeSpec {
    type Error = SchemaError;

    fn try_from(raw: RawAttributeSpec) -> Result<Self, Self::Error> {
        let mut spec = AttributeSpec::new(raw.name, raw.scalar_type).with_optional(raw.optional);
        if let Some(value) = raw.default {
            spec = spec.with_default(value)?;
        }
        spec.allows_external_storage = raw.allows_external_storage;
        spec.preserves_on_delete = raw.preserves_on_delete;
        Ok(spec)
    }
}

impl From<AttributeSpec> for RawAttributeSpec {
    fn from(spec: AttributeSpec) -> Self {
        Self {
            name: spec.name,
            scalar_type: spec.scalar_type,
            optional: spec.is_optional,
            default: spec.default_value,
            allows_external_storage: spec.allows_external_storage,
            preserves_on_delete: spec.preserves_on_delete,
        }
    }
}
