//! Declarative entity specifications.
//!
//! Specs reference each other only by name. They are plain values; turning
//! them into a linked graph is the job of the [`compiler`](crate::compiler).

mod attribute;
mod entity;
mod relationship;
mod types;

pub use attribute::AttributeSpec;
pub use entity::{EntitySpec, EntitySpecBuilder};
pub use relationship::RelationshipSpec;
pub use types::{DefaultValue, DeleteRule, ScalarType};
