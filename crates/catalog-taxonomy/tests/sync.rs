//! Integration tests for `sync_record_categories` and the upsert protocol.

use catalog_core::{IndexConfig, UpsertMode};
use catalog_taxonomy::{
    sync_record_categories, upsert_category, CategoryNode, IndexClient, UpsertOutcome,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = "ecommerce_transformed";

fn test_config(base_url: &str, upsert_mode: UpsertMode) -> IndexConfig {
    IndexConfig {
        app_id: "APPID".to_owned(),
        api_key: "index-key".to_owned(),
        index_name: INDEX.to_owned(),
        base_url: base_url.to_owned(),
        attributes_to_retrieve: vec!["name".to_owned()],
        upsert_mode,
        request_timeout_secs: 5,
    }
}

fn client_for(config: &IndexConfig) -> IndexClient {
    IndexClient::new(config).expect("client construction should not fail")
}

fn women_shoes_loafers_record() -> serde_json::Value {
    json!({
        "objectID": "sku-42",
        "name": "Penny Loafer",
        "hierarchical_categories": {
            "lvl0": "Women",
            "lvl1": "Women > Shoes",
            "lvl2": "Women > Shoes > Loafers"
        }
    })
}

fn insert_ack() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({ "taskID": 1, "objectID": "x" }))
}

/// Lookup mock that reports the given object ID as present.
async fn mount_present(server: &MockServer, object_id: &str) {
    Mock::given(method("POST"))
        .and(path("/1/indexes/*/objects"))
        .and(body_partial_json(json!({ "requests": [{ "objectID": object_id }] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": [{ "objectID": object_id }] })),
        )
        .with_priority(1)
        .mount(server)
        .await;
}

/// Fallback lookup mock that reports every object as missing.
async fn mount_absent_by_default(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/1/indexes/*/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [null] })))
        .with_priority(5)
        .mount(server)
        .await;
}

#[tokio::test]
async fn record_without_categories_makes_no_calls() {
    let server = MockServer::start().await;
    let config = test_config(&server.uri(), UpsertMode::CheckThenInsert);
    let client = client_for(&config);

    let report = sync_record_categories(&client, &config, &json!({ "name": "Gift card" })).await;

    assert!(report.is_empty());
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "expected no requests, got {}", received.len());
}

#[tokio::test]
async fn inserts_only_missing_categories() {
    let server = MockServer::start().await;
    mount_present(&server, "category-women").await;
    mount_absent_by_default(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/1/indexes/{INDEX}")))
        .respond_with(insert_ack())
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), UpsertMode::CheckThenInsert);
    let client = client_for(&config);
    let report = sync_record_categories(&client, &config, &women_shoes_loafers_record()).await;

    assert_eq!(
        report.outcomes,
        vec![
            ("category-women".to_owned(), UpsertOutcome::AlreadyPresent),
            ("category-women-shoes".to_owned(), UpsertOutcome::Inserted),
            ("category-women-shoes-loafers".to_owned(), UpsertOutcome::Inserted),
        ]
    );
    assert_eq!(report.inserted(), 2);
    assert_eq!(report.failed(), 0);
}

#[tokio::test]
async fn inserted_bodies_carry_leaf_flags() {
    let server = MockServer::start().await;
    mount_absent_by_default(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/1/indexes/{INDEX}")))
        .and(body_partial_json(json!({ "objectID": "category-women-shoes-loafers", "isLeaf": true })))
        .respond_with(insert_ack())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/1/indexes/{INDEX}")))
        .and(body_partial_json(json!({ "isLeaf": false })))
        .respond_with(insert_ack())
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), UpsertMode::CheckThenInsert);
    let client = client_for(&config);
    let report = sync_record_categories(&client, &config, &women_shoes_loafers_record()).await;
    assert_eq!(report.inserted(), 3);
}

#[tokio::test]
async fn failed_lookup_still_inserts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/*/objects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/1/indexes/{INDEX}")))
        .respond_with(insert_ack())
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), UpsertMode::CheckThenInsert);
    let client = client_for(&config);
    let record = json!({ "hierarchical_categories": { "lvl0": "Kids" } });
    let report = sync_record_categories(&client, &config, &record).await;

    assert_eq!(
        report.outcomes,
        vec![("category-kids".to_owned(), UpsertOutcome::Inserted)]
    );
}

#[tokio::test]
async fn failed_insert_is_reported_not_propagated() {
    let server = MockServer::start().await;
    mount_absent_by_default(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/1/indexes/{INDEX}")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "bad object" })))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), UpsertMode::CheckThenInsert);
    let client = client_for(&config);
    let report = sync_record_categories(&client, &config, &women_shoes_loafers_record()).await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failed(), 3);
    match &report.outcomes[0].1 {
        UpsertOutcome::Failed(reason) => assert!(reason.contains("bad object"), "{reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn replace_mode_skips_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/*/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(0)
        .mount(&server)
        .await;
    for id in [
        "category-women",
        "category-women-shoes",
        "category-women-shoes-loafers",
    ] {
        Mock::given(method("PUT"))
            .and(path(format!("/1/indexes/{INDEX}/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskID": 2 })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = test_config(&server.uri(), UpsertMode::Replace);
    let client = client_for(&config);
    let report = sync_record_categories(&client, &config, &women_shoes_loafers_record()).await;

    assert!(report
        .outcomes
        .iter()
        .all(|(_, outcome)| *outcome == UpsertOutcome::Replaced));
}

/// Two runs racing on the same not-yet-indexed category both see "not found"
/// and both insert. Check-then-insert is not idempotent.
#[tokio::test]
async fn concurrent_check_then_insert_inserts_twice() {
    let server = MockServer::start().await;
    mount_absent_by_default(&server).await;

    Mock::given(method("POST"))
        .and(path(format!("/1/indexes/{INDEX}")))
        .respond_with(insert_ack())
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), UpsertMode::CheckThenInsert);
    let first = client_for(&config);
    let second = client_for(&config);
    let node = CategoryNode {
        object_id: "category-men".to_owned(),
        name: "Men".to_owned(),
        path: "Men".to_owned(),
        level: 0,
        is_leaf: true,
        parent: None,
    };

    let (a, b) = tokio::join!(
        upsert_category(&first, &config, &node),
        upsert_category(&second, &config, &node)
    );

    assert_eq!(a, UpsertOutcome::Inserted);
    assert_eq!(b, UpsertOutcome::Inserted);
}

/// The same race under replace mode writes the same ID twice, which the
/// index collapses into one object.
#[tokio::test]
async fn concurrent_replace_targets_single_object_id() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/1/indexes/{INDEX}/category-men")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskID": 3 })))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), UpsertMode::Replace);
    let client = client_for(&config);
    let node = CategoryNode {
        object_id: "category-men".to_owned(),
        name: "Men".to_owned(),
        path: "Men".to_owned(),
        level: 0,
        is_leaf: true,
        parent: None,
    };

    let (a, b) = tokio::join!(
        upsert_category(&client, &config, &node),
        upsert_category(&client, &config, &node)
    );
    assert_eq!(a, UpsertOutcome::Replaced);
    assert_eq!(b, UpsertOutcome::Replaced);
}
