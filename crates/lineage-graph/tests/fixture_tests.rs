//! Integration tests: traversal over a store snapshot loaded from disk.

use lineage_graph::*;
use std::sync::Arc;

fn load_fixture(name: &str) -> InMemoryStore {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    InMemoryStore::from_path(std::path::Path::new(&path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {name}: {e}"))
}

fn view() -> LineageView {
    let routes = |r: &lineage_core::LineageResource, t: &str| format!("/{}/{}/{}", r.kind(), t, r.id());
    LineageView::new(
        Arc::new(load_fixture("pipeline.yaml")),
        Arc::new(routes),
        LineageConfig::default(),
    )
}

fn card_ids(layout: &LineageLayout, column: ColumnType) -> Vec<(String, Vec<i64>)> {
    layout
        .column(column)
        .cards
        .iter()
        .map(|c| (c.title.clone(), c.rows.iter().map(|r| r.resource.id()).collect()))
        .collect()
}

#[tokio::test]
async fn model_sits_between_trainer_and_evaluator() {
    let view = view();
    let Retarget::Applied(layout) = view.retarget(4).await.unwrap() else {
        panic!("expected applied");
    };
    assert_eq!(
        card_ids(&layout, ColumnType::InputArtifact),
        vec![("Dataset".to_string(), vec![2])]
    );
    assert_eq!(
        card_ids(&layout, ColumnType::InputExecution),
        vec![("Trainer".to_string(), vec![101])]
    );
    assert_eq!(
        card_ids(&layout, ColumnType::OutputExecution),
        vec![("Evaluator".to_string(), vec![102])]
    );
    assert_eq!(
        card_ids(&layout, ColumnType::OutputArtifact),
        vec![("Metrics".to_string(), vec![5])]
    );
}

#[tokio::test]
async fn walking_upstream_through_cards() {
    let view = view();
    view.retarget(5).await.unwrap();

    // metrics <- evaluator <- {model, eval}
    let graph = view.current().unwrap();
    let inputs: Vec<_> = graph.input_artifacts.iter().map(|a| a.id).collect();
    assert_eq!(inputs, vec![4, 3]);

    let eval = graph.input_artifacts[1].clone();
    assert!(view.select_from_card(&eval).await.unwrap().is_applied());

    let layout = view.layout().unwrap();
    assert_eq!(layout.target_id, 3);
    assert_eq!(
        card_ids(&layout, ColumnType::InputExecution),
        vec![("Preprocess".to_string(), vec![100])]
    );
    assert_eq!(
        card_ids(&layout, ColumnType::InputArtifact),
        vec![("Dataset".to_string(), vec![1])]
    );
    assert_eq!(
        card_ids(&layout, ColumnType::OutputArtifact),
        vec![("Metrics".to_string(), vec![5])]
    );
}

#[tokio::test]
async fn source_artifact_has_no_left_edge() {
    let view = view();
    let Retarget::Applied(layout) = view.retarget(1).await.unwrap() else {
        panic!("expected applied");
    };
    let row = &layout.column(ColumnType::Target).cards[0].rows[0];
    assert!(!row.prev);
    assert!(row.next);
    assert_eq!(row.route, "/artifact/Dataset/1");
    // preprocess outputs both train and eval
    assert_eq!(
        card_ids(&layout, ColumnType::OutputArtifact),
        vec![("Dataset".to_string(), vec![2, 3])]
    );
}
