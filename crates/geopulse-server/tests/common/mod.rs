#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use geopulse_ai::RiskAssessor;
use geopulse_server::app;
use geopulse_server::config::ServerConfig;
use geopulse_server::state::AppState;
use geopulse_storage::auth::hash_password;
use geopulse_storage::{GeoStore, ObservationRow, ThresholdRow};
use geopulse_weather::WeatherClient;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
}

pub async fn build_test_context() -> Result<TestContext> {
    build_test_context_with_assessor(None).await
}

/// Build a full app over a temp SQLite database with one `admin`/`changeme`
/// account. The weather client points at a closed local port so provider
/// calls fail fast instead of reaching the network.
pub async fn build_test_context_with_assessor(
    assessor: Option<Arc<dyn RiskAssessor>>,
) -> Result<TestContext> {
    geopulse_common::id::init(1, 1);

    let temp_dir = tempfile::tempdir()?;
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("geopulse.db").display()
    );
    let store = Arc::new(GeoStore::new(&db_url).await?);

    let password_hash = hash_password("changeme")?;
    let _ = store.create_user("admin", &password_hash).await?;

    let weather = Arc::new(WeatherClient::new(
        "http://127.0.0.1:9/v1/forecast".to_string(),
        "http://127.0.0.1:9/v1/search".to_string(),
        2,
    )?);

    let config: ServerConfig = toml::from_str("")?;

    let state = AppState {
        store,
        weather,
        assessor,
        jwt_secret: Arc::new("test-secret".to_string()),
        token_expire_secs: 3600,
        start_time: Utc::now(),
        config: Arc::new(config),
    };

    let app = app::build_http_app(state.clone());
    Ok(TestContext {
        temp_dir,
        state,
        app,
    })
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = if let Some(body) = body {
        builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    } else {
        builder.body(Body::empty()).expect("request should build")
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn login_and_get_token(app: &axum::Router) -> String {
    let (status, body) = request_json(
        app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "changeme"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"]
        .as_str()
        .expect("login response should carry access_token")
        .to_string()
}

pub fn make_threshold_row(region: &str, metric: &str, operator: &str, value: f64) -> ThresholdRow {
    let now = Utc::now();
    ThresholdRow {
        id: geopulse_common::id::next_id(),
        user_id: "user-1".to_string(),
        region: region.to_string(),
        latitude: -1.29,
        longitude: 36.82,
        hazard_type: "heatwave".to_string(),
        metric: metric.to_string(),
        operator: operator.to_string(),
        threshold_value: value,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_observation_row(
    region: &str,
    temperature_c: Option<f64>,
    secs_ago: i64,
) -> ObservationRow {
    let ts = Utc::now() - Duration::seconds(secs_ago);
    ObservationRow {
        id: geopulse_common::id::next_id(),
        region: region.to_string(),
        latitude: -1.29,
        longitude: 36.82,
        observed_at: ts,
        temperature_c,
        rainfall_mm: Some(2.0),
        soil_moisture: None,
        wind_speed_kmh: Some(10.0),
        humidity_percent: Some(55.0),
        data_source: "open-meteo".to_string(),
        raw_payload: None,
        created_at: ts,
    }
}
