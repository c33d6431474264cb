//! Integration tests for the assignment and normalization engines.
//!
//! These tests exercise the behavior guaranteed across the whole pipeline:
//! 1. Default fill, null preservation, and idempotence
//! 2. Enum resolution precedence and singleton identity
//! 3. Arrays, inheritance, and per-call type overrides
//! 4. Naming conversion, the same-class short-circuit, and round trips
//! 5. Diagnostics and fatal shape errors

use std::sync::Arc;

use modelbind_bind::{AssignOptions, Binder, FieldSelector};
use modelbind_core::{BindError, CollectingSink, Diagnostic, ErrorKind, NamingStyle};
use modelbind_schema::{
    BuiltinType, ClassBuilder, EnumeratorDecl, FieldSchema, Record, SchemaRegistry, TypeRef, Value,
};
use serde_json::json;

// ============================================================================
// Shared helpers
// ============================================================================

fn registry() -> SchemaRegistry {
    let r = SchemaRegistry::new();
    r.register(
        ClassBuilder::enum_class("Status")
            .enumerator(EnumeratorDecl::new("ACTIVE", "启用").code("A").i18n("status.active"))
            .enumerator(EnumeratorDecl::new("DISABLED", "停用").code("D")),
    )
    .unwrap();
    r.register(
        ClassBuilder::model("Address")
            .field(FieldSchema::new("city").default_value("Unknown").normalized())
            .field(FieldSchema::new("zipCode")),
    )
    .unwrap();
    r.register(
        ClassBuilder::model("Entity")
            .field(FieldSchema::new("id").of_type(BuiltinType::Int).default_value(0))
            .field(FieldSchema::new("createdBy").default_value("system")),
    )
    .unwrap();
    r.register(
        ClassBuilder::model("Person")
            .extends("Entity")
            .field(FieldSchema::new("firstName").of_type(BuiltinType::String).normalized())
            .field(FieldSchema::new("nickName").default_value("anon"))
            .field(FieldSchema::new("status").class("Status").default_enum("ACTIVE"))
            .field(FieldSchema::new("homeAddress").class("Address").default_instance())
            .field(FieldSchema::new("roles").array_of(TypeRef::class("Status")))
            .field(FieldSchema::new("tags").array_of(BuiltinType::String).normalized())
            .field(FieldSchema::new("extra").nullable(true))
            .name_field("firstName"),
    )
    .unwrap();
    r
}

fn src(v: serde_json::Value) -> Value {
    Value::from(v)
}

fn opts() -> AssignOptions {
    AssignOptions::default()
}

// ============================================================================
// 1. Default fill, null preservation, and idempotence
// ============================================================================

#[test]
fn test_default_fill() {
    let r = registry();
    let binder = Binder::new(&r);
    let person = binder
        .create("Person", &src(json!({"firstName": "Ada"})), &opts())
        .unwrap()
        .unwrap();
    let default = r.default_instance("Person").unwrap();

    for field in ["id", "createdBy", "nickName", "status", "homeAddress", "roles", "tags", "extra"] {
        assert_eq!(person.get(field), default.get(field), "field {field}");
    }
    assert_eq!(person.value("firstName"), &Value::from("Ada"));
}

#[test]
fn test_default_fill_does_not_share_nested_records() {
    let r = registry();
    let binder = Binder::new(&r);
    let mut a = binder.create("Person", &src(json!({})), &opts()).unwrap().unwrap();
    if let Some(Value::Record(address)) = a.get_mut("homeAddress") {
        address.set("city", "Paris");
    }
    let b = binder.create("Person", &src(json!({})), &opts()).unwrap().unwrap();
    assert_eq!(b.value("homeAddress").get("city"), Some(&Value::from("Unknown")));
}

#[test]
fn test_null_preservation() {
    let r = registry();
    let binder = Binder::new(&r);
    let mut source = src(json!({"nickName": null, "status": null, "homeAddress": null}));
    if let Value::Map(map) = &mut source {
        map.insert("createdBy".into(), Value::Undefined);
    }
    let person = binder.create("Person", &source, &opts()).unwrap().unwrap();
    assert_eq!(person.value("nickName"), &Value::Null);
    assert_eq!(person.value("status"), &Value::Null);
    assert_eq!(person.value("homeAddress"), &Value::Null);
    assert_eq!(person.value("createdBy"), &Value::Undefined);
}

#[test]
fn test_nullish_source_resets_to_defaults() {
    let r = registry();
    let binder = Binder::new(&r);
    let mut person = r.instantiate("Person").unwrap();
    person.set("firstName", "Ada");
    person.set("nickName", "A");
    binder.assign(&mut person, &Value::Null, &opts()).unwrap();
    assert_eq!(person.value("firstName"), &Value::Undefined);
    assert_eq!(person.value("nickName"), &Value::from("anon"));
}

#[test]
fn test_assign_is_idempotent() {
    let r = registry();
    let binder = Binder::new(&r);
    let source = src(json!({
        "id": 7,
        "firstName": "  Grace ",
        "status": "D",
        "homeAddress": {"city": " Rome ", "zipCode": "00100"},
        "roles": ["active", "停用"],
        "tags": [" a ", "b"],
        "extra": {"k": [1, 2]}
    }));
    let mut first = r.instantiate("Person").unwrap();
    binder.assign(&mut first, &source, &opts()).unwrap();
    let mut second = first.clone();
    binder.assign(&mut second, &source, &opts()).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.value("firstName"), &Value::from("Grace"));
    assert_eq!(first.value("homeAddress").get("city"), Some(&Value::from("Rome")));
    assert_eq!(
        first.value("tags"),
        &Value::Array(vec![Value::from("a"), Value::from("b")])
    );
}

// ============================================================================
// 2. Enum resolution precedence and singleton identity
// ============================================================================

#[test]
fn test_enum_precedence() {
    let r = registry();
    let status = r.enum_type("Status").unwrap();
    assert_eq!(status.of("  active ").unwrap().unwrap().value(), "ACTIVE");
    assert_eq!(status.of("启用").unwrap().unwrap().value(), "ACTIVE");
    assert_eq!(status.of("A").unwrap().unwrap().value(), "ACTIVE");
    assert!(status.of("").unwrap().is_none());

    r.register(
        ClassBuilder::enum_class("Grade")
            .enumerator(EnumeratorDecl::new("TOP", "Top").code("A"))
            .enumerator(EnumeratorDecl::new("a", "Lowercase a")),
    )
    .unwrap();
    let grade = r.enum_type("Grade").unwrap();
    assert_eq!(grade.of("A").unwrap().unwrap().name(), "Lowercase a");
}

#[test]
fn test_enum_singleton_identity() {
    let r = registry();
    let status = r.enum_type("Status").unwrap();
    let a = status.of("ACTIVE").unwrap().unwrap();
    let b = status.of("active").unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &status.values()[0]));

    let binder = Binder::new(&r);
    let p = binder
        .create("Person", &src(json!({"status": "A"})), &opts())
        .unwrap()
        .unwrap();
    let cloned = p.clone();
    assert!(Arc::ptr_eq(cloned.value("status").as_enum().unwrap(), &a));
}

#[test]
fn test_unresolvable_enum_aborts_assign() {
    let r = registry();
    let binder = Binder::new(&r);
    let err = binder
        .create("Person", &src(json!({"status": "BOGUS"})), &opts())
        .unwrap_err();
    assert!(matches!(err, BindError::EnumRange { ref class, .. } if class == "Status"));
    assert_eq!(err.kind(), ErrorKind::Shape);

    let err = binder
        .create("Person", &src(json!({"roles": ["ACTIVE", 5]})), &opts())
        .unwrap_err();
    assert!(matches!(err, BindError::EnumRange { ref value, .. } if value == "5"));
}

// ============================================================================
// 3. Arrays, inheritance, and per-call type overrides
// ============================================================================

#[test]
fn test_array_fan_out_independence() {
    let r = registry();
    let binder = Binder::new(&r);
    let mut people = binder
        .create_array("Person", &src(json!([{"firstName": "A"}, {"firstName": "B"}, null])), &opts())
        .unwrap()
        .unwrap();
    assert_eq!(people.len(), 3);
    assert!(people[2].is_none());

    if let Some(first) = people[0].as_mut() {
        first.set("nickName", "changed");
    }
    let second = people[1].as_ref().unwrap();
    assert_eq!(second.value("firstName"), &Value::from("B"));
    assert_eq!(second.value("nickName"), &Value::from("anon"));
}

#[test]
fn test_enum_array_uses_same_index_defaults() {
    let r = SchemaRegistry::new();
    r.register(
        ClassBuilder::enum_class("Level")
            .enumerator(EnumeratorDecl::new("LOW", "Low"))
            .enumerator(EnumeratorDecl::new("HIGH", "High")),
    )
    .unwrap();
    let level = r.enum_type("Level").unwrap();
    let high = Value::Enum(level.of("HIGH").unwrap().unwrap());
    r.register(
        ClassBuilder::model("Config").field(
            FieldSchema::new("levels")
                .array_of(TypeRef::class("Level"))
                .default_value(vec![high.clone()]),
        ),
    )
    .unwrap();

    let binder = Binder::new(&r);
    let config = binder
        .create("Config", &src(json!({"levels": ["", "", "low"]})), &opts())
        .unwrap()
        .unwrap();
    let levels = config.value("levels").as_array().unwrap();
    assert_eq!(levels[0], high);
    assert_eq!(levels[1], Value::Null);
    assert_eq!(levels[2].as_enum().unwrap().value(), "LOW");
}

#[test]
fn test_inherited_fields_merge_at_declaring_level() {
    let r = registry();
    let sink = CollectingSink::shared();
    let binder = Binder::new(&r).with_diagnostics(sink.clone());
    let person = binder
        .create("Person", &src(json!({"id": 3, "created_by": "ops"})), &opts())
        .unwrap()
        .unwrap();
    assert_eq!(person.value("id"), &Value::from(3));
    assert_eq!(person.value("createdBy"), &Value::from("system"));
    assert_eq!(
        sink.entries(),
        vec![Diagnostic::NamingMismatch {
            class: "Entity".into(),
            field: "createdBy".into(),
            expected_key: "createdBy".into(),
            found_key: "created_by".into(),
        }]
    );
}

#[test]
fn test_type_overrides_by_path() {
    let r = registry();
    let binder = Binder::new(&r);
    let options = opts()
        .with_type("extra", TypeRef::class("Address"))
        .with_element_type("homeAddress.zipCode", TypeRef::class("Status"));
    let person = binder
        .create(
            "Person",
            &src(json!({"extra": {"city": "Oslo"}, "homeAddress": {"zipCode": ["A", "disabled"]}})),
            &options,
        )
        .unwrap()
        .unwrap();

    let extra = person.value("extra").as_record().unwrap();
    assert_eq!(extra.class_name(), "Address");
    assert_eq!(extra.value("city"), &Value::from("Oslo"));

    let zip = person.value("homeAddress").get("zipCode").unwrap();
    let values: Vec<&str> = zip
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_enum().unwrap().value())
        .collect();
    assert_eq!(values, vec!["ACTIVE", "DISABLED"]);
}

#[test]
fn test_default_instance_built_once_under_contention() {
    let r = registry();
    let defaults: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| r.default_instance("Person").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(defaults.iter().all(|d| Arc::ptr_eq(d, &defaults[0])));
}

// ============================================================================
// 4. Naming conversion, the same-class short-circuit, and round trips
// ============================================================================

#[test]
fn test_convert_naming_reads_source_style() {
    let r = registry();
    let binder = Binder::new(&r);
    let options = opts()
        .convert_naming(true)
        .source_naming(NamingStyle::UpperUnderscore);
    let person = binder
        .create(
            "Person",
            &src(json!({"FIRST_NAME": "Ada", "CREATED_BY": "me", "HOME_ADDRESS": {"ZIP_CODE": "1"}})),
            &options,
        )
        .unwrap()
        .unwrap();
    assert_eq!(person.value("firstName"), &Value::from("Ada"));
    assert_eq!(person.value("createdBy"), &Value::from("me"));
    assert_eq!(person.value("homeAddress").get("zipCode"), Some(&Value::from("1")));
}

#[test]
fn test_same_class_short_circuit() {
    let r = registry();
    let binder = Binder::new(&r);
    let original = binder
        .create("Person", &src(json!({"firstName": "Ada", "nickName": "A"})), &opts())
        .unwrap()
        .unwrap();
    let source = Value::Record(original.clone());

    let mut plain = r.instantiate("Person").unwrap();
    binder.assign(&mut plain, &source, &opts()).unwrap();
    let mut converting = r.instantiate("Person").unwrap();
    binder
        .assign(&mut converting, &source, &opts().convert_naming(true))
        .unwrap();

    assert_eq!(plain, converting);
    assert_eq!(converting.value("nickName"), &Value::from("A"));
}

#[test]
fn test_round_trip_with_undefined_asymmetry() {
    let r = registry();
    let binder = Binder::new(&r);
    let mut source = src(json!({
        "first_name": "Ada",
        "status": "DISABLED",
        "home_address": {"city": "London", "zip_code": "N1"},
        "tags": ["x"]
    }));
    if let Value::Map(map) = &mut source {
        map.insert("nick_name".into(), Value::Undefined);
    }
    let options = opts().convert_naming(true);
    let first = binder.create("Person", &source, &options).unwrap().unwrap();
    assert_eq!(first.value("nickName"), &Value::Undefined);

    let plain = first.to_plain(Some((NamingStyle::LowerCamel, NamingStyle::LowerUnderscore)));
    assert_eq!(plain.get("status"), Some(&Value::from("DISABLED")));
    assert!(plain.get("nick_name").is_none());

    let second = binder.create("Person", &plain, &options).unwrap().unwrap();
    for field in ["firstName", "status", "homeAddress", "tags", "id", "createdBy"] {
        assert_eq!(first.get(field), second.get(field), "field {field}");
    }
    assert_eq!(second.value("nickName"), &Value::from("anon"));
}

// ============================================================================
// 5. Diagnostics and fatal shape errors
// ============================================================================

#[test]
fn test_soft_and_fatal_shape_errors() {
    let r = registry();
    let sink = CollectingSink::shared();
    let binder = Binder::new(&r).with_diagnostics(sink.clone());

    let person = binder
        .create("Person", &src(json!({"tags": "solo", "firstName": 1})), &opts())
        .unwrap()
        .unwrap();
    assert_eq!(person.value("tags"), &Value::Undefined);
    assert_eq!(person.value("firstName"), &Value::from(1));
    let entries = sink.entries();
    assert!(entries.contains(&Diagnostic::ArrayExpected {
        path: "tags".into(),
        found: "string".into()
    }));
    assert!(entries.contains(&Diagnostic::TypeMismatch {
        path: "firstName".into(),
        expected: "string".into(),
        found: "int".into()
    }));

    let err = binder
        .create("Person", &src(json!({"homeAddress": [1, 2]})), &opts())
        .unwrap_err();
    assert!(matches!(err, BindError::ShapeError { ref path, ref found, .. }
        if path == "homeAddress" && found == "array"));
}

#[test]
fn test_normalize_can_be_disabled() {
    let r = registry();
    let binder = Binder::new(&r);
    let mut person = binder
        .create("Person", &src(json!({"firstName": " Ada "})), &opts().normalize(false))
        .unwrap()
        .unwrap();
    assert_eq!(person.value("firstName"), &Value::from(" Ada "));
    binder.normalize(&mut person, &FieldSelector::from("firstName"));
    assert_eq!(person.value("firstName"), &Value::from("Ada"));
}

#[test]
fn test_display_name_and_ids() {
    let r = registry();
    let binder = Binder::new(&r);
    let person: Record = binder
        .create("Person", &src(json!({"firstName": "Ada"})), &opts())
        .unwrap()
        .unwrap();
    assert_eq!(r.display_name(&person).as_deref(), Some("Ada"));
    assert_eq!(r.generate_id("Person").unwrap(), "Person:1");
}
