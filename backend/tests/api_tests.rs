//! Router tests through `tower::ServiceExt::oneshot`

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crop_advisor::{create_app, AppState};

fn app(dir: &std::path::Path) -> Router {
    let config = common::write_fixture(dir);
    create_app(AppState::from_config(config).unwrap())
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_trained_price_models() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(dir.path()), "GET", "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["suitability_model"], "untrained");
    assert_eq!(body["price_models"], json!(["rice", "wheat"]));
}

// ============================================================================
// Recommendations
// ============================================================================

#[tokio::test]
async fn test_recommendation_ranks_by_projected_profit() {
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "location": "Khon Kaen",
        "crops": ["wheat", "rice", "cassava"],
        "farm_size": 2.0,
        "as_of": "2024-06-01"
    });
    let (status, body) = send(app(dir.path()), "POST", "/api/v1/recommendations", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    let ranked = body["ranked"].as_array().unwrap();
    let names: Vec<&str> = ranked.iter().map(|r| r["crop"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["rice", "wheat"]);

    let first = ranked[0]["profitability"]["projected_profit"].as_f64().unwrap();
    let second = ranked[1]["profitability"]["projected_profit"].as_f64().unwrap();
    assert!(first >= second);

    // soil came from the soil provider, weather from the snapshot file
    assert_eq!(body["soil"]["soil_type"], "sandy_loam");
    assert_eq!(body["weather"]["weather_score"], 0.9);

    assert_eq!(ranked[0]["price_forecast"]["prices"].as_array().unwrap().len(), 6);
    assert_eq!(ranked[0]["trend_forecast"].as_array().unwrap().len(), 6);
    assert!(ranked[0]["suitability_score"].is_null());

    let skipped = body["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0]["crop"], "cassava");
}

#[tokio::test]
async fn test_recommendation_defaults_to_supported_crops() {
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "location": "Khon Kaen",
        "farm_size": 1.0,
        "soil_type": "loamy",
        "as_of": "2024-06-01"
    });
    let (status, body) = send(app(dir.path()), "POST", "/api/v1/recommendations", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ranked"].as_array().unwrap().len(), 2);
    assert_eq!(body["soil"]["soil_type"], "loamy");
}

#[tokio::test]
async fn test_recommendation_rejects_unknown_soil() {
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "location": "Khon Kaen",
        "crops": ["rice"],
        "farm_size": 1.0,
        "soil_type": "peat",
        "as_of": "2024-06-01"
    });
    let (status, body) = send(app(dir.path()), "POST", "/api/v1/recommendations", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_SOIL_TYPE");
}

#[tokio::test]
async fn test_recommendation_without_known_soil_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "location": "Nowhere",
        "crops": ["rice"],
        "farm_size": 1.0,
        "as_of": "2024-06-01"
    });
    let (status, body) = send(app(dir.path()), "POST", "/api/v1/recommendations", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "soil_type");
}

#[tokio::test]
async fn test_recommendation_rejects_zero_farm_size() {
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "location": "Khon Kaen",
        "crops": ["rice"],
        "farm_size": 0.0,
        "as_of": "2024-06-01"
    });
    let (status, body) = send(app(dir.path()), "POST", "/api/v1/recommendations", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "farm_size");
}

#[tokio::test]
async fn test_recommendation_request_validation() {
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "location": "",
        "crops": ["rice"],
        "farm_size": 1.0
    });
    let (status, body) = send(app(dir.path()), "POST", "/api/v1/recommendations", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Crop catalogue
// ============================================================================

#[tokio::test]
async fn test_crop_crud() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/v1/crops",
        Some(json!({"name": "rice", "growing_season": "kharif", "water_needs": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "rice");

    let (status, body) = send(app.clone(), "POST", "/api/v1/crops", Some(json!({"name": "Rice"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_EXISTS");

    let (status, body) = send(
        app.clone(),
        "PUT",
        "/api/v1/crops/rice",
        Some(json!({"water_needs": "very high", "duration_days": 120})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["water_needs"], "very high");
    assert_eq!(body["growing_season"], "kharif");
    assert_eq!(body["duration_days"], 120);

    let (status, body) = send(app.clone(), "GET", "/api/v1/crops/RICE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["water_needs"], "very high");

    let (status, _) = send(app.clone(), "GET", "/api/v1/crops/wheat", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app.clone(), "PUT", "/api/v1/crops/wheat", Some(json!({"water_needs": "low"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app, "GET", "/api/v1/crops", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crops"], json!(["rice"]));

    // every mutation reached the file
    let stored: Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("crops.json")).unwrap()).unwrap();
    assert_eq!(stored["rice"]["duration_days"], 120);
}
