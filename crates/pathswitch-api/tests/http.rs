//! HTTP surface tests

use axum::http::StatusCode;
use axum_test::TestServer;
use pathswitch_api::{build_router, ApiState};
use pathswitch_common::{seed_defaults, InMemoryProfileStore, ProfileStore};
use pathswitch_engine::{EngineConfig, Scheduler, SyntheticTelemetry};
use serde_json::{json, Value};
use std::sync::Arc;

async fn server() -> (TestServer, Arc<Scheduler>) {
    let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    seed_defaults(profiles.as_ref()).await.unwrap();

    let scheduler = Arc::new(
        Scheduler::new(
            EngineConfig::default(),
            Arc::new(SyntheticTelemetry::seeded(7)),
        )
        .unwrap(),
    );

    let app = build_router(ApiState::new(scheduler.clone(), profiles));
    (TestServer::new(app).unwrap(), scheduler)
}

#[tokio::test]
async fn test_health() {
    let (server, _) = server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_engine_lifecycle() {
    let (server, scheduler) = server().await;

    let body: Value = server.get("/api/engine").await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["state"], "idle");
    assert_eq!(body["data"]["activePath"], "Path-1");
    assert_eq!(body["data"]["config"]["switchingMargin"], 5.0);

    let body: Value = server.post("/api/engine/start").await.json();
    assert_eq!(body["data"]["isRunning"], true);

    let record = scheduler.step().await.unwrap();
    assert!(!scheduler.history().is_empty());

    let body: Value = server.post("/api/engine/pause").await.json();
    assert_eq!(body["data"]["state"], "paused");
    assert!(body["data"]["historyLen"].as_u64().unwrap() >= 1);
    let scores = body["data"]["lastScores"].as_object().unwrap();
    assert_eq!(scores.len(), 3);
    assert!(scores.contains_key("Path-2"));

    let body: Value = server.get("/api/history").await.json();
    let records = body["data"].as_array().unwrap();
    assert_eq!(records[0]["activePath"], json!(record.active_path));
    assert!(records[0]["timestamp"].is_string());

    let body: Value = server.get("/api/history/summary").await.json();
    assert_eq!(body["data"]["samples"], json!(records.len()));

    let body: Value = server.post("/api/engine/reset").await.json();
    assert_eq!(body["data"]["state"], "idle");
    assert_eq!(body["data"]["activePath"], "Path-1");
    assert_eq!(body["data"]["historyLen"], 0);
}

#[tokio::test]
async fn test_update_weights_and_params() {
    let (server, scheduler) = server().await;

    let response = server
        .put("/api/engine/weights")
        .json(&json!({ "w1": 0.6, "w2": 0.2, "w3": 0.2 }))
        .await;
    response.assert_status_ok();
    assert_eq!(scheduler.config().weights.w1, 0.6);

    let response = server
        .put("/api/engine/params")
        .json(&json!({ "switchingMargin": 1.5, "decisionInterval": 250 }))
        .await;
    response.assert_status_ok();
    let config = scheduler.config();
    assert_eq!(config.switching_margin, 1.5);
    assert_eq!(config.decision_interval_ms, 250);

    let response = server
        .put("/api/engine/params")
        .json(&json!({ "switchingMargin": -1.0, "decisionInterval": 250 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "invalid_config");
    assert_eq!(scheduler.config().switching_margin, 1.5);
}

#[tokio::test]
async fn test_activate_profile() {
    let (server, scheduler) = server().await;

    let body: Value = server.get("/api/settings").await.json();
    let throughput = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Throughput Priority")
        .cloned()
        .unwrap();
    let id = throughput["id"].as_u64().unwrap();

    let response = server.post(&format!("/api/engine/profile/{id}")).await;
    response.assert_status_ok();

    let config = scheduler.config();
    assert_eq!(config.weights.w1, 0.8);
    assert_eq!(config.switching_margin, 2.0);
    assert_eq!(config.decision_interval_ms, 500);

    let response = server.post("/api/engine/profile/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_crud() {
    let (server, _) = server().await;

    let response = server
        .post("/api/settings")
        .json(&json!({
            "name": "Low Latency",
            "weightDelay": 0.7,
            "weightThroughput": 0.2,
            "weightLoss": 0.1
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["data"]["id"].as_u64().unwrap();
    assert_eq!(body["data"]["switchingMargin"], 5.0);
    assert_eq!(body["data"]["isDefault"], false);

    let response = server
        .put(&format!("/api/settings/{id}"))
        .json(&json!({ "switchingMargin": 3.0 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["switchingMargin"], 3.0);
    assert_eq!(body["data"]["name"], "Low Latency");

    let body: Value = server.get(&format!("/api/settings/{id}")).await.json();
    assert_eq!(body["data"]["weightDelay"], 0.7);

    let response = server.delete(&format!("/api/settings/{id}")).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/settings/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_settings_validation() {
    let (server, _) = server().await;

    let response = server
        .post("/api/settings")
        .json(&json!({ "name": "Broken", "decisionInterval": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation");

    let response = server
        .put("/api/settings/1")
        .json(&json!({ "name": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = server.get("/api/settings").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_bodies_use_envelope() {
    let (server, scheduler) = server().await;

    let response = server
        .put("/api/engine/params")
        .json(&json!({ "switchingMargin": 1.0, "decisionInterval": -5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "validation");
    assert_eq!(scheduler.config().decision_interval_ms, 1000);

    let response = server
        .post("/api/settings")
        .json(&json!({ "weightThroughput": 0.5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation");
    assert!(body["error"]["message"].as_str().unwrap().contains("name"));

    let response = server
        .put("/api/engine/weights")
        .json(&json!({ "w1": "high", "w2": 0.3, "w3": 0.3 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(scheduler.config().weights.w1, 0.4);
}
