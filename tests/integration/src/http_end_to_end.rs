//! End-to-end tests against a live depot API server

use crate::test_utils::{fast_config, init_tracing, start_depot_server};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use smartdepot_depot::{CoordinatorConfig, HoldPolicy};
use tokio::time::Duration;

async fn post_json(client: &Client, url: String, body: Value) -> (StatusCode, Value) {
    let response = client.post(url).json(&body).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn assign(client: &Client, base: &str) -> (StatusCode, String) {
    let response = client
        .post(format!("{}/api/v1/trams/assign-mission", base))
        .send()
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    (status, body["msg"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn test_full_depot_lifecycle() {
    init_tracing();
    let base = start_depot_server(fast_config(HoldPolicy::Synchronous)).await;
    let client = Client::new();

    let (status, body) = post_json(
        &client,
        format!("{}/api/v1/trams/initialize", base),
        json!({ "n": 5, "c": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Depot initialized.");

    for expected in 3..=5 {
        let (status, msg) = assign(&client, &base).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(msg, format!("Mission assigned to tram #{}.", expected));
    }

    let (status, msg) = assign(&client, &base).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(msg, "No available tram.");

    let trams: Value = client
        .get(format!("{}/api/v1/trams", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let trams = trams.as_array().unwrap();
    assert_eq!(trams.len(), 6);
    assert!(trams.iter().all(|t| t["hasMission"] == true));
}

#[tokio::test]
async fn test_invalid_initialize_keeps_roster() {
    init_tracing();
    let base = start_depot_server(fast_config(HoldPolicy::Synchronous)).await;
    let client = Client::new();
    let url = format!("{}/api/v1/trams/initialize", base);

    post_json(&client, url.clone(), json!({ "n": 2, "c": 1 })).await;

    let invalid = [
        json!({ "n": -1, "c": 0 }),
        json!({ "n": 2, "c": -1 }),
        json!({ "n": 1, "c": 2 }),
    ];
    for body in invalid {
        let (status, _) = post_json(&client, url.clone(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let trams: Value = client
        .get(format!("{}/api/v1/trams", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        trams,
        json!([
            { "index": 0, "hasMission": true },
            { "index": 1, "hasMission": true },
            { "index": 2, "hasMission": false },
        ])
    );
}

#[tokio::test]
async fn test_concurrent_requests_conflict() {
    init_tracing();
    let base = start_depot_server(CoordinatorConfig {
        planning_delay: Duration::from_millis(500),
        ..fast_config(HoldPolicy::Synchronous)
    })
    .await;
    let client = Client::new();

    post_json(
        &client,
        format!("{}/api/v1/trams/initialize", base),
        json!({ "n": 5, "c": 2 }),
    )
    .await;

    let (first, second) = tokio::join!(assign(&client, &base), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        assign(&client, &base).await
    });

    assert_eq!(first, (StatusCode::OK, "Mission assigned to tram #3.".to_string()));
    assert_eq!(
        second,
        (
            StatusCode::CONFLICT,
            "Another client is currently performing planning.".to_string()
        )
    );
}

#[tokio::test]
async fn test_abandoned_request_still_assigns() {
    init_tracing();
    let base = start_depot_server(CoordinatorConfig {
        planning_delay: Duration::from_millis(400),
        ..fast_config(HoldPolicy::Synchronous)
    })
    .await;
    let client = Client::new();

    post_json(
        &client,
        format!("{}/api/v1/trams/initialize", base),
        json!({ "n": 5, "c": 2 }),
    )
    .await;

    let impatient = Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let abandoned = impatient
        .post(format!("{}/api/v1/trams/assign-mission", base))
        .send()
        .await;
    assert!(abandoned.unwrap_err().is_timeout());

    tokio::time::sleep(Duration::from_millis(600)).await;
    let trams: Value = client
        .get(format!("{}/api/v1/trams", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trams[3], json!({ "index": 3, "hasMission": true }));

    let (status, msg) = assign(&client, &base).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Mission assigned to tram #4.");
}

#[tokio::test]
async fn test_detached_lockout_outlasts_response() {
    init_tracing();
    let base = start_depot_server(CoordinatorConfig {
        lockout_delay: Duration::from_millis(400),
        ..fast_config(HoldPolicy::Detached)
    })
    .await;
    let client = Client::new();

    post_json(
        &client,
        format!("{}/api/v1/trams/initialize", base),
        json!({ "n": 3, "c": 0 }),
    )
    .await;

    let (status, msg) = assign(&client, &base).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Mission assigned to tram #1.");

    let (status, _) = assign(&client, &base).await;
    assert_eq!(status, StatusCode::CONFLICT);

    tokio::time::sleep(Duration::from_millis(600)).await;
    let (status, msg) = assign(&client, &base).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg, "Mission assigned to tram #2.");
}
