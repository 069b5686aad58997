//! Integration tests for schema compilation.

use modelkit_core::{
    AttributeSpec, CompiledSchema, DefaultValue, DeleteRule, EntitySpec, PropertyDescriptor,
    RelationshipSpec, ScalarType, SchemaCompiler, SchemaError,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn shopping_schema() -> Vec<EntitySpec> {
    let list = EntitySpec::builder("ShoppingList")
        .attribute(AttributeSpec::new("title", ScalarType::String).required())
        .attribute(
            AttributeSpec::new("createdAt", ScalarType::Date)
                .with_default(DefaultValue::Date(0))
                .unwrap(),
        )
        .relationship(
            RelationshipSpec::to_many("items", "ShoppingListItem")
                .with_inverse("shoppingList")
                .with_delete_rule(DeleteRule::Cascade),
        )
        .build()
        .unwrap();

    let item = EntitySpec::builder("ShoppingListItem")
        .attribute(AttributeSpec::new("name", ScalarType::String).required())
        .attribute(
            AttributeSpec::new("quantity", ScalarType::Int16)
                .with_default(DefaultValue::Int16(1))
                .unwrap(),
        )
        .attribute(AttributeSpec::new("done", ScalarType::Boolean))
        .relationship(RelationshipSpec::to_one("shoppingList", "ShoppingList").with_inverse("items"))
        .build()
        .unwrap();

    vec![list, item]
}

fn university_schema() -> Vec<EntitySpec> {
    // only `Student.courses` names its inverse
    let student = EntitySpec::builder("Student")
        .attribute(AttributeSpec::new("name", ScalarType::String))
        .relationship(RelationshipSpec::to_many("courses", "Course").with_inverse("students"))
        .build()
        .unwrap();
    let course = EntitySpec::builder("Course")
        .attribute(AttributeSpec::new("title", ScalarType::String))
        .relationship(RelationshipSpec::to_many("students", "Student"))
        .build()
        .unwrap();

    vec![course, student]
}

fn assert_inverses_symmetric(schema: &CompiledSchema) {
    for entity in schema.entities() {
        for relationship in entity.relationships() {
            if let Some(inverse) = schema.inverse_of(relationship) {
                assert_eq!(
                    inverse.inverse_relationship(),
                    Some(relationship.key()),
                    "{}.{} is not mirrored by {}",
                    entity.name(),
                    relationship.name(),
                    inverse.name()
                );
                assert_eq!(inverse.destination_entity(), relationship.owner());
            }
        }
    }
}

fn assert_counts_derived(schema: &CompiledSchema) {
    for relationship in schema.entities().flat_map(|e| e.relationships()) {
        let expected_max = if relationship.is_to_many() { 0 } else { 1 };
        let expected_min = if relationship.is_optional() { 0 } else { 1 };
        assert_eq!(relationship.max_count(), expected_max);
        assert_eq!(relationship.min_count(), expected_min);
    }
}

#[test]
fn test_shopping_list_round_trip() {
    let schema = SchemaCompiler::new().compile(shopping_schema()).unwrap();

    let list = schema.entity("ShoppingList").unwrap();
    let item = schema.entity("ShoppingListItem").unwrap();
    let items = list.relationship("items").unwrap();
    let shopping_list = item.relationship("shoppingList").unwrap();

    assert_eq!(items.max_count(), 0);
    assert_eq!(shopping_list.max_count(), 1);
    assert_eq!(items.inverse_relationship(), Some(shopping_list.key()));
    assert_eq!(shopping_list.inverse_relationship(), Some(items.key()));
    assert_eq!(schema.destination_of(items).name(), "ShoppingListItem");
    assert_eq!(schema.destination_of(shopping_list).name(), "ShoppingList");
    assert_eq!(items.delete_rule(), DeleteRule::Cascade);
    assert_eq!(shopping_list.delete_rule(), DeleteRule::Nullify);

    assert_inverses_symmetric(&schema);
    assert_counts_derived(&schema);
}

#[test]
fn test_many_to_many_linked_from_one_side() {
    let schema = SchemaCompiler::new().compile(university_schema()).unwrap();

    let courses = schema.entity("Student").unwrap().relationship("courses").unwrap();
    let students = schema.entity("Course").unwrap().relationship("students").unwrap();

    assert_eq!(courses.max_count(), 0);
    assert_eq!(students.max_count(), 0);
    assert_eq!(students.declared_inverse_name(), None);
    assert_eq!(schema.inverse_of(students).unwrap().name(), "courses");
    assert_eq!(schema.inverse_of(courses).unwrap().name(), "students");

    assert_inverses_symmetric(&schema);
}

#[test]
fn test_self_relationship_resolves_to_owner() {
    let employee = EntitySpec::builder("Employee")
        .attribute(AttributeSpec::new("name", ScalarType::String))
        .relationship(RelationshipSpec::to_one("manager", "Employee").with_inverse("reports"))
        .relationship(RelationshipSpec::to_many("reports", "Employee"))
        .build()
        .unwrap();

    let schema = SchemaCompiler::new().compile(vec![employee]).unwrap();
    let entity = schema.entity("Employee").unwrap();
    let manager = entity.relationship("manager").unwrap();

    assert_eq!(manager.destination_entity(), entity.id());
    assert_eq!(schema.destination_of(manager).name(), "Employee");
    assert_eq!(schema.inverse_of(manager).unwrap().name(), "reports");
    assert_inverses_symmetric(&schema);
}

#[test]
fn test_entity_count_matches_input() {
    let mut specs = shopping_schema();
    specs.extend(university_schema());
    let names: HashSet<String> = specs.iter().map(|s| s.name().to_string()).collect();

    let schema = SchemaCompiler::new().compile(specs).unwrap();

    assert_eq!(schema.len(), names.len());
    assert_eq!(
        schema.entity_names(),
        vec!["ShoppingList", "ShoppingListItem", "Course", "Student"]
    );
}

#[test]
fn test_declaration_order_does_not_change_graph() {
    let forward = SchemaCompiler::new().compile(shopping_schema()).unwrap();
    let mut reversed_specs = shopping_schema();
    reversed_specs.reverse();
    let reversed = SchemaCompiler::new().compile(reversed_specs).unwrap();

    assert_eq!(forward.descriptor().entities.len(), reversed.descriptor().entities.len());
    for entity in forward.descriptor().entities {
        let other = reversed.descriptor().get_entity(&entity.name).cloned().unwrap();
        assert_eq!(entity, other);
    }
}

#[test]
fn test_unknown_destination_is_an_error() {
    let orphan = EntitySpec::builder("Invoice")
        .relationship(RelationshipSpec::to_one("order", "Order"))
        .build()
        .unwrap();

    let err = SchemaCompiler::new().compile(vec![orphan]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownDestinationEntity {
            entity: "Invoice".into(),
            relationship: "order".into(),
            destination: "Order".into(),
        }
    );
}

#[test]
fn test_duplicate_attribute_rejected_before_compilation() {
    let err = EntitySpec::builder("Person")
        .attribute(AttributeSpec::new("name", ScalarType::String))
        .attribute(AttributeSpec::new("name", ScalarType::String))
        .build()
        .unwrap_err();

    assert_eq!(
        err,
        SchemaError::DuplicateProperty {
            entity: "Person".into(),
            property: "name".into(),
        }
    );
}

#[test]
fn test_compile_from_json_document() {
    let json = r#"[
        {
            "name": "Note",
            "boundType": "NoteRecord",
            "attributes": [
                {"name": "body", "type": "string", "optional": false},
                {"name": "attachment", "type": "binary", "allowsExternalStorage": true}
            ],
            "relationships": [
                {"name": "tags", "destination": "Tag", "isToMany": true, "inverse": "notes"}
            ]
        },
        {
            "name": "Tag",
            "relationships": [
                {"name": "notes", "destination": "Note", "isToMany": true, "deleteRule": "noAction"}
            ]
        }
    ]"#;

    let specs: Vec<EntitySpec> = serde_json::from_str(json).unwrap();
    let schema = SchemaCompiler::new().compile(specs).unwrap();

    let note = schema.entity("Note").unwrap();
    assert_eq!(note.effective_bound_type_name(), "NoteRecord");
    assert!(!note.attribute("body").unwrap().is_optional());
    assert!(note.attribute("attachment").unwrap().allows_external_storage());

    let descriptor = schema.descriptor();
    let tag = descriptor.get_entity("Tag").unwrap();
    match tag.get_property("notes") {
        Some(PropertyDescriptor::Relationship(r)) => {
            assert_eq!(r.destination, "Note");
            assert_eq!(r.inverse.as_deref(), Some("tags"));
            assert_eq!(r.delete_rule, DeleteRule::NoAction);
        }
        other => panic!("expected relationship, got {:?}", other),
    }
}

#[test]
fn test_compiled_schema_shared_across_threads() {
    let schema = Arc::new(SchemaCompiler::new().compile(university_schema()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let courses = schema.entity("Student").unwrap().relationship("courses").unwrap();
                schema.inverse_of(courses).unwrap().name().to_string()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "students");
    }
}

#[test]
fn test_failed_compilation_is_deterministic() {
    let specs = || {
        vec![EntitySpec::builder("A")
            .relationship(RelationshipSpec::to_one("b", "B").with_inverse("a"))
            .build()
            .unwrap()]
    };

    let first = SchemaCompiler::new().compile(specs()).unwrap_err();
    let second = SchemaCompiler::new().compile(specs()).unwrap_err();
    assert_eq!(first, second);
}
