//! Tests for declarative transformer definitions.
mod common;
use common::*;
use henkan::definition::{
    FieldDefinition, OrderDefinition, PreloadDefinition, RuleDefinition,
};
use henkan::prelude::*;
use serde_json::{Value, json};

#[cfg(test)]
mod definition_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn accounts() -> DefinedTransformer {
        DefinedTransformer::new(ACCOUNTS_DEFINITION).expect("Failed to build definition")
    }

    #[test]
    fn test_parses_every_rule_kind() {
        let transformer = accounts();
        let definition = transformer.definition();

        assert_eq!(definition.name, "accounts");
        assert_eq!(definition.fields.len(), 6);
        assert_eq!(
            definition.fields[1],
            FieldDefinition {
                key: "handle".to_string(),
                rule: RuleDefinition::Rename {
                    from: "username".to_string()
                },
            }
        );
        assert_eq!(
            definition.preload,
            vec![PreloadDefinition::Path("settings".to_string())]
        );
        assert_eq!(
            definition.order_by,
            Some(OrderDefinition::Field("id".to_string()))
        );
        assert_eq!(transformer.name(), "accounts");
    }

    #[test]
    fn test_full_output() {
        let account = account(1, "active");
        let output = henkan::transform(&account, &accounts()).expect("Transform failed");

        assert_eq!(
            output,
            json!({
                "id": 1,
                "handle": "user1",
                "profile": { "email": "user1@example.com", "country": "DE" },
                "status": "Active",
                "joined": "09.03.2024",
                "roles": [
                    { "label": "admin", "level": 9 },
                    { "label": "reader", "level": 1 }
                ]
            })
        );
    }

    #[test]
    fn test_minimal_output_and_ordering() {
        let accounts_data = vec![
            account(3, "blocked"),
            account(1, "active"),
            account(2, "gone"),
        ];
        let engine = TransformEngine::new(&Preloaded);

        let output = engine
            .transform(Input::many(&accounts_data), &accounts(), Variant::Minimal)
            .expect("Transform failed");
        assert_eq!(
            output,
            json!([
                { "id": 1, "handle": "user1" },
                { "id": 2, "handle": "user2" },
                { "id": 3, "handle": "user3" }
            ])
        );

        let output = engine
            .transform(Input::many(&accounts_data), &accounts(), Variant::Full)
            .expect("Transform failed");
        let statuses: Vec<&Value> = output
            .as_array()
            .expect("Expected an array")
            .iter()
            .map(|account| &account["status"])
            .collect();
        assert_eq!(statuses, vec!["Active", "Unknown", "Blocked"]);
    }

    #[test]
    fn test_null_state() {
        let output = henkan::transform(Input::Null, &accounts()).expect("Transform failed");
        assert_eq!(output, json!({ "missing": true }));
    }

    #[test]
    fn test_preloads_follow_related_fields() {
        let declared = PreloadPlanner::new(&Preloaded)
            .declared(&accounts(), Variant::Full)
            .expect("Planning failed");
        assert_eq!(
            declared.into_iter().collect::<Vec<_>>(),
            vec!["settings", "roles", "roles.permissions"]
        );
    }

    #[test]
    fn test_detailed_preload_entries() {
        let transformer = DefinedTransformer::new(json!({
            "name": "authors",
            "fields": [
                { "key": "books", "rule": "transform", "transformer": {
                    "name": "books",
                    "fields": [{ "key": "title", "rule": "copy" }],
                    "preload": ["publisher"]
                }}
            ],
            "preload": [
                { "relation": "books", "related": true },
                { "relation": "avatar" }
            ]
        }))
        .expect("Failed to build definition");

        let declared = PreloadPlanner::new(&Preloaded)
            .declared(&transformer, Variant::Full)
            .expect("Planning failed");
        assert_eq!(
            declared.into_iter().collect::<Vec<_>>(),
            vec!["books", "books.publisher", "avatar"]
        );
    }

    #[test]
    fn test_unknown_minimal_field() {
        let result = DefinedTransformer::new(json!({
            "name": "users",
            "fields": [{ "key": "id", "rule": "copy" }],
            "minimal": ["id", "email"]
        }));
        assert_eq!(
            result.map(|_| ()),
            Err(DefinitionError::UnknownMinimalField {
                transformer: "users".to_string(),
                key: "email".to_string(),
            })
        );
    }

    #[test]
    fn test_structure_errors_name_the_transformer() {
        let result = DefinedTransformer::new(json!({
            "name": "users",
            "fields": [
                { "key": "posts", "rule": "transform", "transformer": {
                    "name": "posts",
                    "fields": [
                        { "key": "title", "rule": "copy" },
                        { "key": "title", "rule": "rename", "from": "headline" }
                    ]
                }}
            ]
        }));
        assert_eq!(
            result.map(|_| ()),
            Err(DefinitionError::Spec {
                transformer: "posts".to_string(),
                source: SpecError::DuplicateKey {
                    key: "title".to_string()
                },
            })
        );
    }

    #[test]
    fn test_malformed_definitions() {
        let missing_name = DefinedTransformer::new(json!({ "fields": [] }));
        assert!(matches!(missing_name, Err(DefinitionError::Parse(_))));

        let unknown_rule = DefinedTransformer::new(
            r#"{ "name": "x", "fields": [{ "key": "a", "rule": "explode" }] }"#,
        );
        assert!(matches!(unknown_rule, Err(DefinitionError::Parse(_))));

        let not_json = DefinedTransformer::new("{ name: ");
        assert!(matches!(not_json, Err(DefinitionError::Parse(_))));
    }

    #[test]
    fn test_definition_serializes_without_empty_sections() {
        let transformer = DefinedTransformer::new(json!({
            "name": "tags",
            "fields": [{ "key": "label", "rule": "copy" }]
        }))
        .expect("Failed to build definition");

        let serialized =
            serde_json::to_value(transformer.definition()).expect("Serialization failed");
        assert_eq!(
            serialized,
            json!({ "name": "tags", "fields": [{ "key": "label", "rule": "copy" }] })
        );
    }

    #[test]
    fn test_excessive_decimals_are_rejected() {
        let result = DefinedTransformer::new(json!({
            "name": "prices",
            "fields": [
                { "key": "amount", "rule": "format",
                  "format": { "kind": "number", "decimals": 1000000000000u64 } }
            ]
        }));
        assert!(matches!(result, Err(DefinitionError::Validation(_))));

        let result = DefinedTransformer::new(json!({
            "name": "prices",
            "fields": [
                { "key": "amount", "rule": "format",
                  "format": { "kind": "number", "decimals": 20 } }
            ]
        }));
        assert!(result.is_ok());
    }
}
