//! Shared helpers for building introspection-shaped schemas in tests.
//!
//! Fixtures are written as introspection JSON so they exercise the same
//! deserialization path as a schema loaded from disk.

#![allow(dead_code)]

use graphql_schema::Schema;
use serde_json::{json, Value};

pub fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

pub fn scalar(name: &str) -> Value {
    named("SCALAR", name)
}

pub fn object_ref(name: &str) -> Value {
    named("OBJECT", name)
}

pub fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

pub fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

pub fn arg(name: &str, type_ref: Value, default_value: Option<&str>) -> Value {
    json!({
        "name": name,
        "description": null,
        "type": type_ref,
        "defaultValue": default_value,
    })
}

pub fn field(name: &str, type_ref: Value) -> Value {
    field_with_args(name, Vec::new(), type_ref)
}

pub fn field_with_args(name: &str, args: Vec<Value>, type_ref: Value) -> Value {
    json!({
        "name": name,
        "description": null,
        "args": args,
        "type": type_ref,
        "isDeprecated": false,
        "deprecationReason": null,
    })
}

pub fn object(name: &str, fields: Vec<Value>) -> Value {
    json!({
        "kind": "OBJECT",
        "name": name,
        "description": null,
        "fields": fields,
        "inputFields": null,
        "interfaces": [],
        "enumValues": null,
        "possibleTypes": null,
    })
}

pub fn interface(name: &str, fields: Vec<Value>, possible_types: &[&str]) -> Value {
    json!({
        "kind": "INTERFACE",
        "name": name,
        "description": null,
        "fields": fields,
        "inputFields": null,
        "interfaces": [],
        "enumValues": null,
        "possibleTypes": possible_types.iter().map(|name| object_ref(name)).collect::<Vec<_>>(),
    })
}

pub fn union(name: &str, possible_types: &[&str]) -> Value {
    json!({
        "kind": "UNION",
        "name": name,
        "description": null,
        "fields": null,
        "inputFields": null,
        "interfaces": null,
        "enumValues": null,
        "possibleTypes": possible_types.iter().map(|name| object_ref(name)).collect::<Vec<_>>(),
    })
}

pub fn input_object(name: &str, input_fields: Vec<Value>) -> Value {
    json!({
        "kind": "INPUT_OBJECT",
        "name": name,
        "description": null,
        "fields": null,
        "inputFields": input_fields,
        "interfaces": null,
        "enumValues": null,
        "possibleTypes": null,
    })
}

pub fn scalar_type(name: &str) -> Value {
    json!({ "kind": "SCALAR", "name": name, "description": null })
}

/// Builds a schema with `Query` and `Mutation` as root operation types.
pub fn build_schema(types: Vec<Value>) -> Schema {
    let document = json!({
        "queryType": { "name": "Query" },
        "mutationType": { "name": "Mutation" },
        "subscriptionType": null,
        "types": types,
    });
    Schema::from_json(&document.to_string()).expect("fixture schema should deserialize")
}

/// Interface `Animal` implemented by `Dog` and `Cat`, reachable from `Query`.
pub fn animal_schema() -> Schema {
    build_schema(vec![
        object(
            "Query",
            vec![
                field("animal", named("INTERFACE", "Animal")),
                field("pets", non_null(list(non_null(named("INTERFACE", "Animal"))))),
            ],
        ),
        interface(
            "Animal",
            vec![field("name", scalar("String")), field("age", scalar("Int"))],
            &["Cat", "Dog"],
        ),
        object(
            "Dog",
            vec![
                field("name", scalar("String")),
                field("age", scalar("Int")),
                field("breed", scalar("String")),
            ],
        ),
        object(
            "Cat",
            vec![
                field("name", scalar("String")),
                field("age", scalar("Int")),
                field("indoor", scalar("Boolean")),
            ],
        ),
        scalar_type("String"),
        scalar_type("Int"),
        scalar_type("Boolean"),
    ])
}

/// Fails when any block is opened and closed without a line in between.
pub fn assert_no_empty_blocks(selection: &str) {
    let lines: Vec<&str> = selection.lines().collect();
    for pair in lines.windows(2) {
        assert!(
            !(pair[0].trim_end().ends_with('{') && pair[1].trim() == "}"),
            "empty block in selection:\n{selection}"
        );
    }
}

/// Deepest nesting of field blocks, not counting inline fragments.
pub fn max_field_nesting(selection: &str) -> usize {
    let mut stack: Vec<bool> = Vec::new();
    let mut deepest = 0;
    for line in selection.lines() {
        let line = line.trim();
        if line == "}" {
            stack.pop();
        } else if let Some(opening) = line.strip_suffix(" {") {
            stack.push(!opening.starts_with("... on "));
            deepest = deepest.max(stack.iter().filter(|is_field| **is_field).count());
        }
    }
    deepest
}
