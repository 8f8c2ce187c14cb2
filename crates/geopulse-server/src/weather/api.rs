use crate::state::AppState;
use crate::weather::ingestor::{IngestFailure, IngestResult, WeatherIngestor};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use geopulse_common::types::LocationSpec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Optional ingestion request body. Without it, the monitored regions of
/// all active thresholds are ingested.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
    pub locations: Option<Vec<LocationSpec>>,
}

/// Ingestion run summary. This wire shape is consumed by external cron
/// triggers and kept stable.
#[derive(Serialize, ToSchema)]
pub struct IngestResponse {
    pub success: bool,
    pub ingested: u64,
    pub failed: u64,
    pub results: Vec<IngestResult>,
    pub errors: Vec<IngestFailure>,
}

#[derive(Serialize, ToSchema)]
struct TriggerError {
    error: String,
}

/// Ingest current weather for the given locations (or for all monitored
/// regions when the body is omitted).
#[utoipa::path(
    post,
    path = "/v1/weather/ingest",
    tag = "Weather",
    request_body(content = IngestRequest, description = "Optional location list"),
    responses(
        (status = 200, description = "Ingestion run summary", body = IngestResponse),
        (status = 500, description = "Ingestion could not start", body = TriggerError)
    )
)]
pub async fn ingest_weather(
    State(state): State<AppState>,
    body: Option<Json<IngestRequest>>,
) -> impl IntoResponse {
    let ingestor = WeatherIngestor::new(state.store.clone(), Arc::clone(&state.weather));

    let locations = match body.and_then(|Json(req)| req.locations) {
        Some(locations) => locations,
        None => match ingestor.monitored_locations().await {
            Ok(locations) => locations,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load monitored regions");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(TriggerError {
                        error: e.to_string(),
                    }),
                )
                    .into_response();
            }
        },
    };

    let run = ingestor.ingest(&locations).await;
    Json(IngestResponse {
        success: true,
        ingested: run.results.len() as u64,
        failed: run.errors.len() as u64,
        results: run.results,
        errors: run.errors,
    })
    .into_response()
}

pub fn weather_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(ingest_weather))
}
