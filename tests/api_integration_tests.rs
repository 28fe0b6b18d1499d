//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for the operational endpoints.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use achievement_cache::api::create_router;
use achievement_cache::cache::{Cache, MemoryBackend};
use achievement_cache::{AppState, ReadThrough, Shutdown};
use common::StubUpstream;

// == Helper Functions ==

fn create_test_read_through() -> Arc<ReadThrough> {
    let cache = Cache::new(MemoryBackend::new(Shutdown::never()));
    Arc::new(ReadThrough::new(cache, Arc::new(StubUpstream::new())))
}

fn create_test_app(read_through: Arc<ReadThrough>) -> Router {
    create_router(AppState::new(read_through))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(create_test_read_through());

    let (status, json) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert!(json["timestamp"].is_string());
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_starts_at_zero() {
    let app = create_test_app(create_test_read_through());

    let (status, json) = get(app, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["backend"], "memory");
    assert_eq!(json["hits"], 0);
    assert_eq!(json["misses"], 0);
    assert_eq!(json["upstream_calls"], 0);
    assert_eq!(json["hit_rate"], 0.0);
}

#[tokio::test]
async fn test_stats_reflect_read_through_traffic() {
    let read_through = create_test_read_through();
    read_through.get_player_owned_games("U").await.unwrap();
    read_through.get_player_owned_games("U").await.unwrap();
    read_through.get_player_achievements("U", common::UNTRACKED_GAME).await.unwrap();

    let (status, json) = get(create_test_app(read_through), "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 2);
    assert_eq!(json["upstream_calls"], 2);
    assert_eq!(json["upstream_failures"], 1);
    assert_eq!(json["negative_cached"], 1);
    assert_eq!(json["backend_errors"], 0);
    let hit_rate = json["hit_rate"].as_f64().unwrap();
    assert!((hit_rate - 1.0 / 3.0).abs() < 0.001);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(create_test_read_through());

    let response = app
        .oneshot(Request::builder().uri("/set").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
