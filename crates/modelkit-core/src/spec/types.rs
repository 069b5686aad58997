//! Core type definitions shared by specs and the compiled schema.

use rkyv::Archive;
use std::fmt;

/// Scalar data types an attribute can declare.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ScalarType {
    /// UTF-8 string.
    String,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Fixed-point decimal.
    Decimal,
    /// 64-bit floating point.
    Double,
    /// 32-bit floating point.
    Float,
    /// Boolean value.
    Boolean,
    /// Point in time (microseconds since Unix epoch).
    Date,
    /// Binary data.
    Binary,
    /// Opaque value encoded by the runtime through a value transformer.
    Transformable,
    /// UUID (128-bit identifier).
    Uuid,
    /// Uniform resource identifier.
    Uri,
    /// Reference to a stored record by its object identifier.
    ObjectReference,
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int16
                | ScalarType::Int32
                | ScalarType::Int64
                | ScalarType::Decimal
                | ScalarType::Double
                | ScalarType::Float
        )
    }

    /// Check if values of this type may be large enough for out-of-record storage.
    ///
    /// Storage hints (`allows_external_storage`, `preserves_on_delete`) only
    /// carry meaning for these types.
    pub fn is_large_object(&self) -> bool {
        matches!(self, ScalarType::Binary | ScalarType::Transformable)
    }

    /// Stable lower camel case name, as used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Decimal => "decimal",
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Boolean => "boolean",
            ScalarType::Date => "date",
            ScalarType::Binary => "binary",
            ScalarType::Transformable => "transformable",
            ScalarType::Uuid => "uuid",
            ScalarType::Uri => "uri",
            ScalarType::ObjectReference => "objectReference",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed default value for an attribute.
///
/// Every variant corresponds to exactly one [`ScalarType`].
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
pub enum DefaultValue {
    /// String value.
    String(String),
    /// 16-bit integer value.
    Int16(i16),
    /// 32-bit integer value.
    Int32(i32),
    /// 64-bit integer value.
    Int64(i64),
    /// Decimal value, `mantissa * 10^-scale`.
    Decimal {
        /// Unscaled digits.
        mantissa: i64,
        /// Number of digits after the decimal point.
        scale: u8,
    },
    /// 64-bit floating point value.
    Double(f64),
    /// 32-bit floating point value.
    Float(f32),
    /// Boolean value.
    Boolean(bool),
    /// Microseconds since Unix epoch.
    Date(i64),
    /// Binary data.
    Binary(Vec<u8>),
    /// Pre-encoded transformable payload.
    Transformable(Vec<u8>),
    /// UUID as 16 bytes.
    Uuid([u8; 16]),
    /// URI string.
    Uri(String),
    /// Object identifier URI of the referenced record.
    ObjectReference(String),
}

impl DefaultValue {
    /// The scalar type this value belongs to.
    pub fn kind(&self) -> ScalarType {
        match self {
            DefaultValue::String(_) => ScalarType::String,
            DefaultValue::Int16(_) => ScalarType::Int16,
            DefaultValue::Int32(_) => ScalarType::Int32,
            DefaultValue::Int64(_) => ScalarType::Int64,
            DefaultValue::Decimal { .. } => ScalarType::Decimal,
            DefaultValue::Double(_) => ScalarType::Double,
            DefaultValue::Float(_) => ScalarType::Float,
            DefaultValue::Boolean(_) => ScalarType::Boolean,
            DefaultValue::Date(_) => ScalarType::Date,
            DefaultValue::Binary(_) => ScalarType::Binary,
            DefaultValue::Transformable(_) => ScalarType::Transformable,
            DefaultValue::Uuid(_) => ScalarType::Uuid,
            DefaultValue::Uri(_) => ScalarType::Uri,
            DefaultValue::ObjectReference(_) => ScalarType::ObjectReference,
        }
    }

    /// Check whether this value can be the default of an attribute of `scalar_type`.
    pub fn matches(&self, scalar_type: ScalarType) -> bool {
        self.kind() == scalar_type
    }
}

/// Action applied to related records when the owning record is deleted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum DeleteRule {
    /// Clear the reference on the related records.
    #[default]
    Nullify,
    /// Delete the related records as well.
    Cascade,
    /// Refuse the deletion while related records exist.
    Deny,
    /// Leave related records untouched.
    NoAction,
}

impl fmt::Display for DeleteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeleteRule::Nullify => "nullify",
            DeleteRule::Cascade => "cascade",
            DeleteRule::Deny => "deny",
            DeleteRule::NoAction => "noAction",
        };
        f.write_str(name)
    }
}
