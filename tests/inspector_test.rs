//! Tests for node inspection and tree rendering

mod common;

use std::sync::Arc;

use common::{small_table, small_taxonomy, APP, ROOT, SCENARIO};
use corix::application::{inspect, DetailBody, TreeRender};
use corix::domain::{DomainError, NodeRecord, TreeBuilder, TreeSnapshot};

fn snapshot() -> TreeSnapshot {
    TreeBuilder::new(Arc::new(small_taxonomy()))
        .build(&small_table(), APP, SCENARIO)
        .unwrap()
        .snapshot()
}

#[test]
fn given_internal_node_when_inspecting_then_lists_children() {
    // Act
    let details = inspect(&snapshot(), "Model Testing").unwrap();

    // Assert
    assert_eq!(details.level, 3);
    assert_eq!(details.formatted_score(), "2.00/10");
    match details.body {
        DetailBody::Children(children) => {
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].id, "MT Annotator Label");
            assert_eq!(children[0].score, Some(2.0));
        }
        other => panic!("expected children, got {other:?}"),
    }
}

#[test]
fn given_leaf_node_when_inspecting_then_lists_items() {
    let details = inspect(&snapshot(), "MT RA 2").unwrap();

    match &details.body {
        DetailBody::Items(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].item_id, "MT RA 2");
        }
        other => panic!("expected items, got {other:?}"),
    }
    let text = details.to_string();
    assert!(text.contains("--- Node Details for: MT RA 2 (ID: MT RA 2) ---"));
    assert!(text.contains("Score: 3.00/10"));
}

#[test]
fn given_root_when_inspecting_then_reports_aggregated_score() {
    let details = inspect(&snapshot(), ROOT).unwrap();

    assert_eq!(details.score, Some(5.0));
    assert!(details.to_string().contains("Direct Children and their Scores:"));
}

#[test]
fn given_unknown_id_when_inspecting_then_not_found() {
    let result = inspect(&snapshot(), "Nope");

    assert_eq!(result.unwrap_err(), DomainError::NotFound("Nope".into()));
}

#[test]
fn given_record_without_level_when_inspecting_then_malformed_node() {
    // Arrange
    let mut snapshot = snapshot();
    if let Some(record) = snapshot.nodes.get_mut("Red Teaming") {
        record.level = None;
    }

    // Act
    let result = inspect(&snapshot, "Red Teaming");

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::MalformedNode {
            id: "Red Teaming".into(),
            field: "level".into()
        }
    );
}

#[test]
fn given_dangling_child_when_inspecting_then_malformed_node() {
    let mut snapshot = snapshot();
    snapshot.nodes.remove("RT Annotator Label");

    let result = inspect(&snapshot, "Red Teaming");

    assert!(matches!(result, Err(DomainError::MalformedNode { .. })));
}

#[test]
fn given_node_without_children_or_items_when_inspecting_then_empty_body() {
    // Arrange
    let mut snapshot = TreeSnapshot::default();
    snapshot.nodes.insert(
        "Lonely".into(),
        NodeRecord {
            id: Some("Lonely".into()),
            name: Some("Lonely".into()),
            construct: Some("Lonely".into()),
            level: Some(3),
            score: None,
            ..NodeRecord::default()
        },
    );

    // Act
    let details = inspect(&snapshot, "Lonely").unwrap();

    // Assert
    assert_eq!(details.body, DetailBody::Empty);
    assert_eq!(details.formatted_score(), "n/a");
}

#[test]
fn given_snapshot_when_json_round_trip_then_inspection_matches() {
    let original = snapshot();

    let json = serde_json::to_string(&original).unwrap();
    let restored: TreeSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, original);
    assert_eq!(
        inspect(&restored, ROOT).unwrap(),
        inspect(&original, ROOT).unwrap()
    );
}

#[test]
fn given_partial_json_record_when_inspecting_then_reports_missing_field() {
    let json = r#"{"root":"A","nodes":{"A":{"id":"A","level":2,"construct":"A"}}}"#;
    let snapshot: TreeSnapshot = serde_json::from_str(json).unwrap();

    let result = inspect(&snapshot, "A");

    assert!(matches!(
        result,
        Err(DomainError::MalformedNode { ref field, .. }) if field == "name"
    ));
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn given_tree_when_rendering_to_level_3_then_deeper_nodes_hidden() {
    let tree = TreeBuilder::new(Arc::new(small_taxonomy()))
        .build(&small_table(), APP, SCENARIO)
        .unwrap();

    let text = tree.to_tree_string(3).to_string();

    assert!(text.starts_with("Validity/Reliability [L2] 5.00"));
    assert!(text.contains("Model Testing [L3] 2.00"));
    assert!(!text.contains("MT Annotator Label"));
}

#[test]
fn given_empty_tree_when_rendering_then_placeholder() {
    let tree = corix::domain::CorixTree::new();

    assert_eq!(tree.to_tree_string(5).to_string().trim(), "Empty tree");
}
