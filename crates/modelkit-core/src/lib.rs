//! modelkit core - entity specifications and the schema compiler.
//!
//! Callers declare entities with [`EntitySpec`], [`AttributeSpec`] and
//! [`RelationshipSpec`], referencing each other by name. [`SchemaCompiler`]
//! resolves those names in two passes and returns an immutable
//! [`CompiledSchema`] whose relationships know their destination entity and
//! their symmetric inverse.
//!
//! ```rust
//! use modelkit_core::{EntitySpec, RelationshipSpec, SchemaCompiler};
//!
//! let list = EntitySpec::builder("ShoppingList")
//!     .relationship(RelationshipSpec::to_many("items", "ShoppingListItem").with_inverse("shoppingList"))
//!     .build()
//!     .unwrap();
//! let item = EntitySpec::builder("ShoppingListItem")
//!     .relationship(RelationshipSpec::to_one("shoppingList", "ShoppingList"))
//!     .build()
//!     .unwrap();
//!
//! let schema = SchemaCompiler::new().compile(vec![list, item]).unwrap();
//! let items = schema.entity("ShoppingList").unwrap().relationship("items").unwrap();
//! assert_eq!(items.max_count(), 0);
//! assert_eq!(schema.inverse_of(items).unwrap().name(), "shoppingList");
//! ```

pub mod compiled;
pub mod compiler;
pub mod config;
pub mod error;
pub mod spec;

pub use compiled::{
    AttributeDescriptor, CompiledSchema, EntityDescriptor, EntityId, Property, PropertyDescriptor,
    RelationshipDescriptor, RelationshipKey, ResolvedAttribute, ResolvedEntity,
    ResolvedRelationship, SchemaDescriptor,
};
pub use compiler::SchemaCompiler;
pub use config::{CompilerConfig, DEFAULT_BOUND_TYPE_NAME};
pub use error::{Error, SchemaError};
pub use spec::{
    AttributeSpec, DefaultValue, DeleteRule, EntitySpec, EntitySpecBuilder, RelationshipSpec,
    ScalarType,
};
