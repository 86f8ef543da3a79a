//! Property discovery across type hierarchies.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::*;
use confbind::errors::{AccessError, ConversionError};
use confbind::property::TargetType;
use confbind::{
    ConfigObject, IntrospectError, PropertyValue, PropertyValueConverter, TypeIntrospector,
    index_by_name, index_type,
};

fn names(introspector: &TypeIntrospector) -> Vec<String> {
    introspector
        .discover_properties()
        .unwrap()
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

#[test]
fn test_ancestor_properties_come_first() {
    init_logging();
    let introspector = TypeIntrospector::new(child_type());
    assert_eq!(names(&introspector), vec!["x", "y"]);

    let properties = introspector.discover_properties().unwrap();
    assert_eq!(properties[0].declaring_type(), "Base");
    assert_eq!(properties[1].declaring_type(), "Child");
}

#[test]
fn test_static_fields_are_skipped_even_when_marked() {
    let properties = TypeIntrospector::new(child_type())
        .discover_properties()
        .unwrap();
    assert!(properties.iter().all(|p| p.field_name() != "Z"));
}

#[test]
fn test_three_level_hierarchy() {
    let introspector = TypeIntrospector::new(grand_child_type());
    // `cache` carries no marker, `tags` is injected under its alias.
    assert_eq!(names(&introspector), vec!["x", "y", "w", "labels"]);

    let map = introspector.to_map().unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["x", "y", "w", "labels"]);
    assert!(map["w"].is_optional());
    assert!(!map["x"].is_optional());
    assert_eq!(map["labels"].field_name(), "tags");
}

#[test]
fn test_type_without_properties() {
    let properties = TypeIntrospector::new(service_type())
        .discover_properties()
        .unwrap();
    assert!(properties.is_empty());
    assert!(index_type(service_type()).unwrap().is_empty());
}

#[test]
fn test_shadowed_name_fails_indexing_but_not_discovery() {
    let introspector = TypeIntrospector::new(shadowing_type());
    let properties = introspector.discover_properties().unwrap();
    assert_eq!(properties.len(), 2);

    let err = index_by_name(&properties).unwrap_err();
    match err {
        IntrospectError::DuplicateProperty {
            name,
            first,
            second,
        } => {
            assert_eq!(name, "x");
            assert_eq!(first, "Base");
            assert_eq!(second, "Shadowing");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(introspector.to_map().is_err());
}

#[test]
fn test_get_and_set_through_subtype_instance() {
    let mut instance = GrandChild::default();
    instance.child.base.x = "origin".to_string();
    instance.child.y = 7;

    let map = index_type(grand_child_type()).unwrap();
    let x = map["x"].get_value(&instance).unwrap();
    assert_eq!(x.downcast_ref::<String>().unwrap(), "origin");

    map["y"]
        .set_value(&mut instance, PropertyValue::of(42i64))
        .unwrap();
    assert_eq!(instance.child.y, 42);
}

#[test]
fn test_property_rejects_unrelated_instance() {
    let map = index_type(child_type()).unwrap();
    let endpoint = Endpoint {
        url: "http://localhost".to_string(),
    };
    let err = map["y"].get_value(&endpoint).unwrap_err();
    assert!(matches!(
        err,
        IntrospectError::PropertyAccess {
            source: AccessError::NotInHierarchy { .. },
            ..
        }
    ));
}

#[test]
fn test_set_value_with_wrong_type() {
    let mut instance = Child::default();
    let map = index_type(child_type()).unwrap();
    let err = map["y"]
        .set_value(&mut instance, PropertyValue::of("seven".to_string()))
        .unwrap_err();
    assert!(matches!(err, IntrospectError::PropertyAccess { .. }));
    assert_eq!(instance.y, 0);
}

#[test]
fn test_inject_raw_uses_field_decoding() {
    let mut instance = GrandChild::default();
    let map = index_type(grand_child_type()).unwrap();

    map["x"]
        .inject_raw(&mut instance, &toml::Value::String("from-file".into()))
        .unwrap();
    map["labels"]
        .inject_raw(
            &mut instance,
            &toml::Value::Array(vec!["a".into(), "b".into()]),
        )
        .unwrap();

    assert_eq!(instance.child.base.x, "from-file");
    assert_eq!(instance.tags, vec!["a".to_string(), "b".to_string()]);

    let err = map["y"]
        .inject_raw(&mut instance, &toml::Value::String("not a number".into()))
        .unwrap_err();
    assert!(matches!(
        err,
        IntrospectError::Conversion {
            source: ConversionError::Decode(_),
            ..
        }
    ));
}

#[test]
fn test_converter_is_consulted_before_field_decoding() {
    // Accepts "<n>k" for integer properties and declines everything else.
    let converter = |raw: &toml::Value,
                     target: &TargetType<'_>|
     -> Result<Option<PropertyValue>, ConversionError> {
        if !target.is::<i64>() {
            return Ok(None);
        }
        match raw.as_str().and_then(|s| s.strip_suffix('k')) {
            Some(thousands) => {
                let n: i64 = thousands
                    .parse()
                    .map_err(|_| ConversionError::Custom(format!("bad size '{raw}'")))?;
                Ok(Some(PropertyValue::of(n * 1000)))
            }
            None => Ok(None),
        }
    };
    let converter: Arc<dyn PropertyValueConverter> = Arc::new(converter);

    let introspector = TypeIntrospector::with_converter(child_type(), converter);
    let map = introspector.to_map().unwrap();
    let mut instance = Child::default();

    map["y"]
        .inject_raw(&mut instance, &toml::Value::String("4k".into()))
        .unwrap();
    assert_eq!(instance.y, 4000);

    // Declined by the converter, decoded by the field.
    map["y"]
        .inject_raw(&mut instance, &toml::Value::Integer(12))
        .unwrap();
    assert_eq!(instance.y, 12);

    map["x"]
        .inject_raw(&mut instance, &toml::Value::String("plain".into()))
        .unwrap();
    assert_eq!(instance.base.x, "plain");

    let err = map["y"]
        .inject_raw(&mut instance, &toml::Value::String("xk".into()))
        .unwrap_err();
    assert!(matches!(
        err,
        IntrospectError::Conversion {
            source: ConversionError::Custom(_),
            ..
        }
    ));
}

#[test]
fn test_malformed_delegate_fails_discovery() {
    let err = TypeIntrospector::new(broken_type())
        .discover_properties()
        .unwrap_err();
    assert!(matches!(
        err,
        IntrospectError::MalformedField { ref field, .. } if field == "inner"
    ));
}

#[test]
fn test_config_object_reports_runtime_descriptor() {
    let instance = GrandChild::default();
    let descriptor = instance.type_descriptor();
    assert_eq!(descriptor.name(), "GrandChild");
    assert!(descriptor.is_subtype_of(base_type().id()));
    assert!(!base_type().is_subtype_of(descriptor.id()));
}
