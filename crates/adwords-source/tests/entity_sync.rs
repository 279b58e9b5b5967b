//! Entity stream sync and discovery against in-memory collaborators.

mod common;

use adwords_sync_source::{resolve_selection, run_discover, run_sync, SyncError};
use common::*;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use sync_core::{Catalog, RawValue, StreamKind};

fn campaign(id: usize) -> RawValue {
    RawValue::Mapping(BTreeMap::from([
        ("id".to_string(), RawValue::scalar(id.to_string())),
        ("name".to_string(), RawValue::scalar(format!("Campaign {id}"))),
        ("status".to_string(), RawValue::scalar("ENABLED")),
    ]))
}

fn api_with_campaigns(count: usize) -> FakeApi {
    FakeApi {
        entities: HashMap::from([(
            "CampaignService".to_string(),
            (0..count).map(campaign).collect(),
        )]),
        ..Default::default()
    }
}

fn catalog(stream: &str, selected: &[&str]) -> Catalog {
    Catalog::from_json_str(&catalog_json(stream, selected)).unwrap()
}

#[tokio::test]
async fn test_pagination_stops_after_reported_total() {
    init_logging();
    let api = api_with_campaigns(250);
    let sink = MemorySink::default();
    let mut h = harness(&["123"], day(2017, 1, 1), day(2017, 6, 1));

    run_sync(&api, &sink, &mut h.ctx, &catalog("campaigns", &["name"]))
        .await
        .unwrap();

    let offsets: Vec<u64> = api
        .entity_selectors()
        .iter()
        .map(|s| s.paging.start_index)
        .collect();
    assert_eq!(offsets, vec![0, 100, 200]);
    for selector in api.entity_selectors() {
        assert_eq!(selector.paging.number_results, 100);
    }
    assert_eq!(sink.records("campaigns").len(), 250);
}

#[tokio::test]
async fn test_entity_streams_resync_in_full_every_run() {
    let api = api_with_campaigns(120);
    let sink = MemorySink::default();
    let mut h = harness(&["123"], day(2017, 1, 1), day(2017, 6, 1));
    let catalog = catalog("campaigns", &["name"]);

    run_sync(&api, &sink, &mut h.ctx, &catalog).await.unwrap();
    assert!(h.ctx.state.cursor("123", "campaigns").is_none());
    assert!(h.transport.history().iter().all(|s| s.is_empty()));

    run_sync(&api, &sink, &mut h.ctx, &catalog).await.unwrap();
    assert_eq!(api.entity_selectors().len(), 4);
    assert_eq!(sink.records("campaigns").len(), 240);
}

#[tokio::test]
async fn test_wire_fields_are_filtered_and_capitalized() {
    let api = api_with_campaigns(1);
    let sink = MemorySink::default();
    let mut h = harness(&["123"], day(2017, 1, 1), day(2017, 6, 1));

    run_sync(
        &api,
        &sink,
        &mut h.ctx,
        &catalog("campaigns", &["status", "name", "networkSetting", "frequencyCap"]),
    )
    .await
    .unwrap();

    let selector = api.entity_selectors().pop().unwrap();
    assert_eq!(selector.fields, vec!["Id", "Name", "Status"]);

    let calls = api.calls();
    assert!(matches!(
        &calls[0],
        ApiCall::GetEntities { customer_id, service, .. }
            if customer_id == "123" && service == "CampaignService"
    ));
}

#[tokio::test]
async fn test_entity_records_are_typed_and_stamped() {
    let api = api_with_campaigns(1);
    let sink = MemorySink::default();
    let mut h = harness(&["123"], day(2017, 1, 1), day(2017, 6, 1));

    run_sync(&api, &sink, &mut h.ctx, &catalog("campaigns", &["name", "status"]))
        .await
        .unwrap();

    let record = sink.records("campaigns").pop().unwrap();
    assert_eq!(
        record.into_json(),
        json!({"id": 0, "name": "Campaign 0", "status": "ENABLED", "customer_id": "123"})
    );

    let (_, schema, keys) = sink.schemas().pop().unwrap();
    assert_eq!(keys, vec!["id"]);
    assert!(!serde_json::to_string(&schema).unwrap().contains("inclusion"));
}

#[tokio::test]
async fn test_unselected_streams_are_skipped() {
    let api = api_with_campaigns(3);
    let sink = MemorySink::default();
    let mut h = harness(&["123"], day(2017, 1, 1), day(2017, 6, 1));
    let catalog = Catalog::from_json_str(
        r#"{"streams": [{"stream": "campaigns", "tap_stream_id": "campaigns",
            "schema": {"type": "object", "properties": {}}}]}"#,
    )
    .unwrap();

    run_sync(&api, &sink, &mut h.ctx, &catalog).await.unwrap();
    assert!(api.calls().is_empty());
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn test_discovery_lists_entities_then_supported_reports() {
    let api = FakeApi {
        report_types: vec![
            "UNKNOWN".to_string(),
            "AD_PERFORMANCE_REPORT".to_string(),
            "LABEL_REPORT".to_string(),
            "CLICK_PERFORMANCE_REPORT".to_string(),
        ],
        report_fields: HashMap::from([
            ("AD_PERFORMANCE_REPORT".to_string(), standard_report_fields()),
            ("CLICK_PERFORMANCE_REPORT".to_string(), standard_report_fields()),
        ]),
        ..Default::default()
    };

    let catalog = run_discover(&api, &["999".to_string(), "123".to_string()])
        .await
        .unwrap();

    assert_eq!(
        catalog.stream_names(),
        vec![
            "campaigns",
            "ad_groups",
            "ads",
            "accounts",
            "AD_PERFORMANCE_REPORT",
            "CLICK_PERFORMANCE_REPORT",
        ]
    );
    for entry in &catalog.streams {
        assert_eq!(entry.stream, entry.tap_stream_id);
    }
    assert_eq!(
        catalog.get_stream("ads").unwrap().stream_kind,
        Some(StreamKind::Entity)
    );
    assert_eq!(
        catalog.get_stream("AD_PERFORMANCE_REPORT").unwrap().stream_kind,
        Some(StreamKind::Report)
    );

    let report = catalog.get_stream("CLICK_PERFORMANCE_REPORT").unwrap();
    assert_eq!(report.schema.is_report.as_deref(), Some("true"));
    assert!(report.schema.property("day").unwrap().is_automatic());

    assert!(api.calls().iter().all(|call| match call {
        ApiCall::DescribeReportFields { customer_id, .. } => customer_id == "999",
        _ => true,
    }));
}

#[tokio::test]
async fn test_discovery_without_customers_is_a_configuration_error() {
    let api = FakeApi::default();
    let err = run_discover(&api, &[]).await.unwrap_err();
    assert!(matches!(err, SyncError::Configuration(_)));
}

#[test]
fn test_selection_uses_recorded_stream_kind() {
    let catalog = Catalog::from_json_str(
        r#"{"streams": [
            {"stream": "budgets", "tap_stream_id": "budgets", "stream_kind": "entity",
             "schema": {"type": "object", "selected": true, "properties": {}}},
            {"stream": "campaigns", "tap_stream_id": "campaigns",
             "schema": {"type": "object", "selected": true, "properties": {}}}
        ]}"#,
    )
    .unwrap();

    let kinds: Vec<(String, StreamKind)> = resolve_selection(&catalog)
        .into_iter()
        .map(|s| (s.name, s.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("budgets".to_string(), StreamKind::Entity),
            ("campaigns".to_string(), StreamKind::Entity),
        ]
    );
}

#[tokio::test]
async fn test_unknown_entity_stream_is_a_configuration_error() {
    let api = api_with_campaigns(3);
    let sink = MemorySink::default();
    let mut h = harness(&["123"], day(2017, 1, 1), day(2017, 6, 1));
    let catalog = Catalog::from_json_str(
        r#"{"streams": [{"stream": "budgets", "tap_stream_id": "budgets", "stream_kind": "entity",
            "schema": {"type": "object", "selected": true, "properties": {}}}]}"#,
    )
    .unwrap();

    let err = run_sync(&api, &sink, &mut h.ctx, &catalog).await.unwrap_err();
    assert!(matches!(err, SyncError::Configuration(_)));
    assert!(api.calls().is_empty());
    assert!(sink.messages().is_empty());
}
