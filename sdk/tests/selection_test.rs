//! Masks and insights over the fixture schemas

use serde_json::json;
use std::sync::Arc;
use tilores_sdk::selection::{Direction, MaskInstance, MaskSet, RecordInsights, Selection};
use tilores_sdk::{Schema, TiloresError, TypeRegistry, project};

fn masks(name: &str) -> Arc<MaskSet> {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let sdl = std::fs::read_to_string(path).expect("fixture should exist");
    let registry = TypeRegistry::from_schema(&Schema::from_sdl(&sdl).unwrap()).unwrap();
    Arc::new(MaskSet::build(&registry).unwrap())
}

fn render(selections: &[Selection]) -> Vec<String> {
    selections.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_empty_masks_project_to_nothing() {
    let set = masks("schema.graphql");
    for name in ["Record", "RecordInput", "SearchParams", "Address", "Phone"] {
        let mask = MaskInstance::new(set.clone(), name).unwrap();
        assert!(project(&mask).is_empty(), "{} should project to nothing", name);
    }
}

#[test]
fn test_project_selected_fields_in_declared_order() {
    let set = masks("schema.graphql");
    let mask = MaskInstance::from_json(
        set,
        "Record",
        &json!({
            "id": true,
            "firstName": false,
            "addr": {"street": true, "house": false, "city": true}
        }),
    )
    .unwrap();

    assert_eq!(
        render(&mask.project()),
        vec!["id", "addr {\n  street\n  city\n}"]
    );
}

#[test]
fn test_nested_mask_without_selection_is_dropped() {
    let set = masks("schema.graphql");
    let mask = MaskInstance::from_json(
        set,
        "Record",
        &json!({"id": true, "addr": {"street": false, "house": false}}),
    )
    .unwrap();

    assert_eq!(render(&mask.project()), vec!["id"]);
}

#[test]
fn test_deep_path_selection() {
    let set = masks("schema.graphql");
    let mut mask = MaskInstance::new(set, "Record").unwrap();
    mask.select_path("addr.country.code").unwrap();
    mask.select_path("phones.number").unwrap();

    assert_eq!(
        render(&mask.project()),
        vec![
            "addr {\n  country {\n    code\n  }\n}",
            "phones {\n  number\n}"
        ]
    );
}

#[test]
fn test_unknown_mask_field() {
    let set = masks("schema.graphql");
    let err = MaskInstance::from_json(set, "Record", &json!({"nickname": true})).unwrap_err();
    assert_eq!(err, TiloresError::unknown_field("Record", "nickname"));
}

#[test]
fn test_union_field_projects_to_fragments() {
    let set = masks("complex_schema.graphql");
    let mask = MaskInstance::from_json(
        set,
        "Record",
        &json!({"contact": {"Email": {"address": true}, "Postal": {"city": true}}}),
    )
    .unwrap();

    assert_eq!(
        render(&mask.project()),
        vec!["contact {\n  ... on Email {\n    address\n  }\n  ... on Postal {\n    city\n  }\n}"]
    );
}

#[test]
fn test_cyclic_mask_follows_instance_depth() {
    let set = masks("complex_schema.graphql");
    let mut mask = MaskInstance::new(set, "Record").unwrap();
    mask.select_path("parent.parent.name").unwrap();
    mask.select("id").unwrap();

    assert_eq!(
        render(&mask.project()),
        vec!["id", "parent {\n  parent {\n    name\n  }\n}"]
    );
}

#[test]
fn test_insights_whitelist() {
    let insights = RecordInsights::new().with_whitelist(["first_name", "last_name"]);

    assert_eq!(
        insights.clone().values("middle_name", None).unwrap_err(),
        TiloresError::unknown_field("Record", "middle_name")
    );
    assert!(insights.values("first_name", None).is_ok());
}

#[test]
fn test_insights_chain() {
    let insights = || -> Result<RecordInsights, TiloresError> {
        RecordInsights::new()
            .frequency_distribution("lastName", Some("topNames"), 5, Direction::Asc)?
            .values_distinct("email", Some("emails"))?
            .oldest("updated", "first", vec!["firstName".into(), "lastName".into()])
    };

    let selection = insights().unwrap().into_selection();
    assert_eq!(
        selection.to_string(),
        "recordInsights {
  topNames: frequencyDistribution(field: \"lastName\", top: 5, direction: ASC) {
    value
    frequency
    percentage
  }
  emails: valuesDistinct(field: \"email\")
  first: oldest(field: \"updated\") {
    firstName
    lastName
  }
}"
    );
}
