//! Mapping the fixture schemas into host types

use tilores_sdk::mapping::{HostType, MappedType, ModelCodeGenerator, Primitive, RecordKind};
use tilores_sdk::{Schema, TiloresError, TypeMapper, TypeRegistry};

fn load(name: &str) -> Schema {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let sdl = std::fs::read_to_string(path).expect("fixture should exist");
    Schema::from_sdl(&sdl).expect("fixture should parse")
}

fn field_type(registry: &TypeRegistry, record: &str, field: &str) -> HostType {
    let record = registry
        .get_by_name(record)
        .and_then(MappedType::as_record)
        .expect("record should be mapped");
    record.get_field(field).expect("field should exist").host_type()
}

#[test]
fn test_mapping_is_deterministic() {
    let schema = load("schema.graphql");
    let first = TypeMapper::new(&schema).generate().unwrap();
    let second = TypeMapper::new(&schema).generate().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_roots_and_reachable_types_are_mapped() {
    let registry = TypeRegistry::from_schema(&load("schema.graphql")).unwrap();

    for name in ["Record", "RecordInput", "SearchParams", "Address", "Phone", "Country", "PhoneKind"] {
        assert!(registry.contains(name), "{} should be mapped", name);
    }
    // Not reachable from the roots
    assert!(!registry.contains("Entity"));
    assert!(!registry.contains("Query"));

    let input = registry.get_by_name("RecordInput").and_then(MappedType::as_record).unwrap();
    assert_eq!(input.kind, RecordKind::InputObject);
    assert!(input.complete);
}

#[test]
fn test_field_types() {
    let registry = TypeRegistry::from_schema(&load("schema.graphql")).unwrap();
    let phone = registry.lookup("Phone").unwrap();

    assert_eq!(
        field_type(&registry, "Record", "id"),
        HostType::Primitive(Primitive::String)
    );
    assert_eq!(
        field_type(&registry, "Record", "updated"),
        HostType::optional(HostType::Primitive(Primitive::Time))
    );
    assert_eq!(
        field_type(&registry, "Record", "phones"),
        HostType::optional(HostType::list(HostType::Named(phone)))
    );
    assert_eq!(
        field_type(&registry, "Record", "tags"),
        HostType::optional(HostType::list(HostType::optional(HostType::Primitive(
            Primitive::String
        ))))
    );
}

#[test]
fn test_shared_type_has_one_identity() {
    let registry = TypeRegistry::from_schema(&load("complex_schema.graphql")).unwrap();
    let record = registry.lookup("Record").unwrap();

    let from_source = field_type(&registry, "Source", "record").named();
    let from_postal = field_type(&registry, "Postal", "owner").named();
    assert_eq!(from_source, Some(record));
    assert_eq!(from_postal, Some(record));
    assert_eq!(registry.iter().filter(|(_, t)| t.name() == "Record").count(), 1);
}

#[test]
fn test_self_reference_terminates() {
    let registry = TypeRegistry::from_schema(&load("complex_schema.graphql")).unwrap();
    let record = registry.lookup("Record").unwrap();

    assert_eq!(field_type(&registry, "Record", "parent").named(), Some(record));
    assert_eq!(field_type(&registry, "Record", "children").named(), Some(record));
    assert!(registry.record(record).unwrap().complete);
}

#[test]
fn test_union_members_in_declared_order() {
    let registry = TypeRegistry::from_schema(&load("complex_schema.graphql")).unwrap();
    let contact = registry.get_by_name("Contact").and_then(MappedType::as_union).unwrap();

    let members: Vec<&str> = contact.members.iter().map(|id| registry.get(*id).name()).collect();
    assert_eq!(members, vec!["Email", "Postal"]);
}

#[test]
fn test_unknown_scalar_names_the_scalar() {
    let schema = Schema::from_sdl(
        "type Record { id: ID! geo: Geo } input RecordInput { id: ID! } input SearchParams { id: ID } scalar Geo",
    )
    .unwrap();
    let err = TypeMapper::new(&schema).generate().unwrap_err();

    assert_eq!(err, TiloresError::UnsupportedScalar { name: "Geo".to_string() });
    assert!(err.to_string().contains("Geo"));
    assert!(err.is_mapping_error());
}

#[test]
fn test_missing_root_type() {
    let schema = Schema::from_sdl("type Record { id: ID! }").unwrap();
    let err = TypeMapper::new(&schema).generate().unwrap_err();
    assert_eq!(err.to_string(), "Cannot get type in schema for: 'RecordInput'");
}

#[test]
fn test_generated_models_cover_registry() {
    let registry = TypeRegistry::from_schema(&load("complex_schema.graphql")).unwrap();
    let code = ModelCodeGenerator::new().generate_models(&registry).unwrap();

    for (_, mapped) in registry.iter() {
        let item = match mapped {
            MappedType::Record(_) => format!("pub struct {}", mapped.name()),
            MappedType::Enum(_) | MappedType::Union(_) => format!("pub enum {}", mapped.name()),
        };
        assert!(code.contains(&item), "missing {}", item);
    }
    assert!(code.contains("Option<Box<Record>>"));
    assert!(code.contains("Option<Vec<Record>>"));
}
