mod common;

use axum::http::StatusCode;
use common::{build_test_context, login_and_get_token, request_json};
use serde_json::json;

#[tokio::test]
async fn health_returns_version_and_uptime() {
    let ctx = build_test_context().await.expect("test context should build");
    let (status, body) = request_json(&ctx.app, "GET", "/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(body["uptime_secs"].is_number());
}

#[tokio::test]
async fn login_success_and_failure_cases() {
    let ctx = build_test_context().await.expect("test context should build");

    // Success
    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "changeme"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert_eq!(body["expires_in"], 3600);

    // Wrong password
    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    // Unknown user
    let (status, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "changeme"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Empty fields
    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "", "password": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let ctx = build_test_context().await.expect("test context should build");

    let (status, body) = request_json(&ctx.app, "GET", "/v1/thresholds", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) =
        request_json(&ctx.app, "GET", "/v1/thresholds", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login_and_get_token(&ctx.app).await;
    let (status, body) = request_json(&ctx.app, "GET", "/v1/thresholds", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_threshold_validates_input_before_storing() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let valid = json!({
        "region": "Nairobi",
        "lat": -1.29,
        "lng": 36.82,
        "hazard_type": "heatwave",
        "metric": "temperature_c",
        "operator": ">",
        "threshold_value": 35.0
    });

    // Unknown operator is rejected with 400
    let mut bad_op = valid.clone();
    bad_op["operator"] = json!("==");
    let (status, body) =
        request_json(&ctx.app, "POST", "/v1/thresholds", Some(&token), Some(bad_op)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("operator"));

    // Out-of-range latitude
    let mut bad_lat = valid.clone();
    bad_lat["lat"] = json!(95.0);
    let (status, _) =
        request_json(&ctx.app, "POST", "/v1/thresholds", Some(&token), Some(bad_lat)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty region
    let mut bad_region = valid.clone();
    bad_region["region"] = json!("  ");
    let (status, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/thresholds",
        Some(&token),
        Some(bad_region),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored
    let (_, body) = request_json(&ctx.app, "GET", "/v1/thresholds", Some(&token), None).await;
    assert_eq!(body["total"], 0);

    // The valid request succeeds
    let (status, body) =
        request_json(&ctx.app, "POST", "/v1/thresholds", Some(&token), Some(valid)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["region"], "Nairobi");
    assert_eq!(body["operator"], ">");
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn threshold_lifecycle_list_filter_and_deactivate() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (_, created) = request_json(
        &ctx.app,
        "POST",
        "/v1/thresholds",
        Some(&token),
        Some(json!({
            "region": "Mombasa",
            "lat": -4.04,
            "lng": 39.66,
            "hazard_type": "flood",
            "metric": "rainfall_mm",
            "operator": ">=",
            "threshold_value": 100.0
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) =
        request_json(&ctx.app, "GET", &format!("/v1/thresholds/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metric"], "rainfall_mm");

    let (_, body) = request_json(
        &ctx.app,
        "GET",
        "/v1/thresholds?region__eq=Mombasa&active__eq=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);

    // Deactivate (thresholds are never deleted)
    let (status, body) = request_json(
        &ctx.app,
        "PUT",
        &format!("/v1/thresholds/{id}/active"),
        Some(&token),
        Some(json!({"active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (_, body) = request_json(
        &ctx.app,
        "GET",
        "/v1/thresholds?active__eq=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 0);

    let (status, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/thresholds/no-such-id/active",
        Some(&token),
        Some(json!({"active": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_rejects_bad_queries_before_calling_the_provider() {
    let ctx = build_test_context().await.expect("test context should build");

    let (status, body) = request_json(&ctx.app, "GET", "/v1/locations/search", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, _) =
        request_json(&ctx.app, "GET", "/v1/locations/search?q=%20%20", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long = "a".repeat(200);
    let (status, body) = request_json(
        &ctx.app,
        "GET",
        &format!("/v1/locations/search?q={long}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("too long"));

    // A valid query reaches the (unreachable) provider and surfaces a 500
    let (status, body) =
        request_json(&ctx.app, "GET", "/v1/locations/search?q=Nairobi", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "weather_api_error");
}

#[tokio::test]
async fn latest_observation_is_404_until_ingested() {
    let ctx = build_test_context().await.expect("test context should build");
    let token = login_and_get_token(&ctx.app).await;

    let (status, _) = request_json(
        &ctx.app,
        "GET",
        "/v1/observations/latest?region=Nairobi",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.state
        .store
        .insert_observation(&common::make_observation_row("Nairobi", Some(25.0), 30))
        .await
        .unwrap();

    let (status, body) = request_json(
        &ctx.app,
        "GET",
        "/v1/observations/latest?region=Nairobi",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["temperature_c"], 25.0);
    assert_eq!(body["data_source"], "open-meteo");

    let (_, body) = request_json(
        &ctx.app,
        "GET",
        "/v1/observations?region__eq=Nairobi",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn ingest_captures_per_location_failures_without_aborting() {
    let ctx = build_test_context().await.expect("test context should build");

    // The provider is unreachable in tests: both locations fail, the batch
    // itself still reports success.
    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/v1/weather/ingest",
        None,
        Some(json!({
            "locations": [
                {"name": "Nairobi", "lat": -1.29, "lng": 36.82},
                {"name": "Mombasa", "lat": -4.04, "lng": 39.66}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["ingested"], 0);
    assert_eq!(body["failed"], 2);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["region"], "Nairobi");
    assert!(errors[0]["error"].is_string());
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn ingest_without_body_uses_monitored_regions() {
    let ctx = build_test_context().await.expect("test context should build");

    // No active thresholds: nothing to ingest, still a success response.
    let (status, body) = request_json(&ctx.app, "POST", "/v1/weather/ingest", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["ingested"], 0);
    assert_eq!(body["failed"], 0);

    // One active threshold: its region is attempted (and fails against the
    // unreachable test provider).
    ctx.state
        .store
        .insert_threshold(&common::make_threshold_row(
            "Nairobi",
            "temperature_c",
            ">",
            35.0,
        ))
        .await
        .unwrap();

    let (_, body) = request_json(&ctx.app, "POST", "/v1/weather/ingest", None, None).await;
    assert_eq!(body["failed"], 1);
    assert_eq!(body["errors"][0]["region"], "Nairobi");
}
