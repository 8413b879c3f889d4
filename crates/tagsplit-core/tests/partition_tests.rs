use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::json;
use tagsplit_core::error::PartitionError;
use tagsplit_core::parse;
use tagsplit_core::parse::operation::PathItem;
use tagsplit_core::parse::spec::SwaggerDocument;
use tagsplit_core::partition::{FALLBACK_TAG, group_paths_by_tag, partition};

const WAITER_INCOME: &str = include_str!("fixtures/waiter-income.json");
const PETSTORE: &str = include_str!("fixtures/petstore-2.0.yaml");

/// A document with `count` paths spread over a handful of tags, some untagged.
fn synthetic_document(count: usize) -> SwaggerDocument {
    let tags = ["users", "orders", "billing", "reports"];
    let paths: IndexMap<String, PathItem> = (0..count)
        .map(|i| {
            let operation = if i % 5 == 0 {
                json!({"operationId": format!("op{i}")})
            } else {
                json!({"tags": [tags[i % tags.len()]], "operationId": format!("op{i}")})
            };
            let method = if i % 2 == 0 { "get" } else { "post" };
            let item: PathItem = [(method.to_string(), operation)].into_iter().collect();
            (format!("/resource{i}"), item)
        })
        .collect();
    SwaggerDocument {
        swagger: Some("2.0".to_string()),
        paths,
        ..Default::default()
    }
}

#[test]
fn every_path_lands_in_exactly_one_group() {
    for count in [0, 1, 7, 40] {
        let doc = synthetic_document(count);
        let groups = partition(&doc).unwrap();

        let mut seen = HashSet::new();
        let mut total = 0;
        for group in &groups {
            for path in group.document.paths.keys() {
                assert!(seen.insert(path.clone()), "{path} appears twice");
                assert!(doc.paths.contains_key(path));
                total += 1;
            }
        }
        assert_eq!(total, count);
    }
}

#[test]
fn groups_follow_first_appearance_order() {
    let groups = partition(&synthetic_document(10)).unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.class_name.as_str()).collect();
    // /resource0 is untagged, /resource1 is "orders", /resource2 "billing", ...
    assert_eq!(
        names,
        vec![FALLBACK_TAG, "Orders", "Billing", "Reports", "Users"]
    );

    let orders: Vec<&str> = groups[1].document.paths.keys().map(String::as_str).collect();
    assert_eq!(orders, vec!["/resource1", "/resource9"]);
}

#[test]
fn partition_is_deterministic() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    assert_eq!(partition(&doc).unwrap(), partition(&doc).unwrap());
    assert_eq!(
        group_paths_by_tag(&doc).unwrap(),
        group_paths_by_tag(&doc).unwrap()
    );
}

#[test]
fn partition_waiter_income() {
    let doc = parse::from_json(WAITER_INCOME).unwrap();
    let groups = partition(&doc).unwrap();

    let summary: Vec<(String, Vec<String>)> = groups
        .iter()
        .map(|g| (g.class_name.clone(), g.document.paths.keys().cloned().collect()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "Income-controller".to_string(),
                vec!["/income".to_string(), "/income/{id}/tips".to_string()]
            ),
            (
                "Waiter-controller".to_string(),
                vec!["/waiters/{id}".to_string()]
            ),
            (FALLBACK_TAG.to_string(), vec!["/health".to_string()]),
        ]
    );

    let names: Vec<&str> = groups.iter().map(|g| g.class_name.as_str()).collect();
    insta::assert_snapshot!(
        names.join(","),
        @"Income-controller,Waiter-controller,NotTaggedEndpoints"
    );
}

#[test]
fn scoped_documents_keep_everything_but_paths() {
    let doc = parse::from_json(WAITER_INCOME).unwrap();
    for group in partition(&doc).unwrap() {
        assert_eq!(group.document.host, doc.host);
        assert_eq!(group.document.base_path, doc.base_path);
        assert_eq!(group.document.extra, doc.extra);
        for (path, item) in &group.document.paths {
            assert_eq!(item, &doc.paths[path]);
        }
    }
    // The input is not modified.
    assert_eq!(doc.paths.len(), 4);
}

#[test]
fn petstore_groups_by_first_tag_only() {
    let doc = parse::from_yaml(PETSTORE).unwrap();
    let groups = partition(&doc).unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.class_name.as_str()).collect();
    assert_eq!(names, vec!["Pets", "Store"]);
    assert_eq!(groups[0].document.paths.len(), 3);
    assert_eq!(groups[1].document.paths.len(), 2);
}

#[test]
fn missing_operations_fail_fast() {
    let doc = parse::from_value(json!({
        "paths": {
            "/ok": {"get": {"tags": ["a"]}},
            "/empty": {},
        }
    }))
    .unwrap();
    match partition(&doc).unwrap_err() {
        PartitionError::InvalidSpecification(msg) => assert!(msg.contains("/empty")),
        other => panic!("expected InvalidSpecification, got {other}"),
    }
}

#[test]
fn capitalization_collision_is_reported() {
    let doc = parse::from_value(json!({
        "paths": {
            "/a": {"get": {"tags": ["Billing"]}},
            "/b": {"get": {"tags": ["payments"]}},
            "/c": {"get": {"tags": ["billing"]}},
        }
    }))
    .unwrap();
    let err = partition(&doc).unwrap_err();
    assert!(matches!(
        err,
        PartitionError::AmbiguousTagCollision { ref class_name, .. } if class_name == "Billing"
    ));
    assert_eq!(
        err.to_string(),
        "tags `Billing` and `billing` both map to client `Billing`"
    );
}
