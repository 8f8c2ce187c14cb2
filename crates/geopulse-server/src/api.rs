pub mod alerts;
pub mod observations;
pub mod pagination;
pub mod search;
pub mod thresholds;

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// API error body.
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
    /// Stable machine-readable error code
    pub code: String,
}

/// Paginated collection envelope.
#[derive(Serialize, ToSchema)]
pub struct PaginatedData<T>
where
    T: Serialize,
{
    pub items: Vec<T>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}

pub fn error_response(status: StatusCode, code: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: msg.to_string(),
            code: code.to_string(),
        }),
    )
        .into_response()
}

pub fn paginated_response<T>(items: Vec<T>, total: u64, limit: usize, offset: usize) -> Response
where
    T: Serialize,
{
    Json(PaginatedData {
        items,
        total,
        limit,
        offset,
    })
    .into_response()
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
}

/// Service liveness, version, and uptime.
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (Utc::now() - state.start_time).num_seconds(),
    })
}

pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .merge(search::search_routes())
}

pub fn auth_routes() -> OpenApiRouter<AppState> {
    crate::auth::auth_routes()
}

pub fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(thresholds::threshold_routes())
        .merge(alerts::alert_routes())
        .merge(observations::observation_routes())
}
