use crate::api::pagination::PaginationParams;
use crate::api::{error_response, paginated_response};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use geopulse_storage::{AlertFilter, AlertRow};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// AI-generated risk note attached to an alert.
#[derive(Serialize, ToSchema)]
pub struct AssessmentResponse {
    /// One-paragraph risk note
    pub text: String,
    /// Model that generated the note
    pub model: String,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

/// Hazard alert.
#[derive(Serialize, ToSchema)]
pub struct AlertResponse {
    /// Alert unique identifier
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Originating threshold ID
    pub threshold_id: String,
    /// Region name
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Hazard category
    pub hazard_type: String,
    /// Severity bucket (low / moderate / high / critical)
    pub severity: String,
    /// Alert title
    pub title: String,
    /// Alert description
    pub description: String,
    /// Metric key that tripped
    pub metric: String,
    /// Observed metric value
    pub observed_value: f64,
    /// Configured bound
    pub threshold_value: f64,
    /// Optional AI assessment
    pub assessment: Option<AssessmentResponse>,
    /// Whether the alert has been resolved
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AlertRow> for AlertResponse {
    fn from(r: AlertRow) -> Self {
        let assessment = r.assessment().map(|a| AssessmentResponse {
            text: a.text,
            model: a.model,
            generated_at: a.generated_at,
        });
        Self {
            id: r.id,
            user_id: r.user_id,
            threshold_id: r.threshold_id,
            region: r.region,
            latitude: r.latitude,
            longitude: r.longitude,
            hazard_type: r.hazard_type,
            severity: r.severity,
            title: r.title,
            description: r.description,
            metric: r.metric,
            observed_value: r.observed_value,
            threshold_value: r.threshold_value,
            assessment,
            resolved: r.resolved,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Alert list query parameters.
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ListAlertsParams {
    /// Resolved flag exact match
    #[param(required = false, rename = "resolved__eq")]
    #[serde(rename = "resolved__eq")]
    resolved_eq: Option<bool>,
    /// Severity exact match (low / moderate / high / critical)
    #[param(required = false, rename = "severity__eq")]
    #[serde(rename = "severity__eq")]
    severity_eq: Option<String>,
    /// Region exact match
    #[param(required = false, rename = "region__eq")]
    #[serde(rename = "region__eq")]
    region_eq: Option<String>,
    /// Originating threshold ID exact match
    #[param(required = false, rename = "threshold_id__eq")]
    #[serde(rename = "threshold_id__eq")]
    threshold_id_eq: Option<String>,
    /// Page size (default 20)
    #[param(required = false)]
    #[serde(
        default,
        deserialize_with = "crate::api::pagination::deserialize_optional_u64"
    )]
    limit: Option<u64>,
    /// Offset (default 0)
    #[param(required = false)]
    #[serde(
        default,
        deserialize_with = "crate::api::pagination::deserialize_optional_u64"
    )]
    offset: Option<u64>,
}

/// List hazard alerts, newest first.
#[utoipa::path(
    get,
    path = "/v1/alerts",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(ListAlertsParams),
    responses(
        (status = 200, description = "Paginated alert list", body = Vec<AlertResponse>),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError)
    )
)]
async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<ListAlertsParams>,
) -> impl IntoResponse {
    let limit = PaginationParams::resolve_limit(params.limit);
    let offset = PaginationParams::resolve_offset(params.offset);
    let filter = AlertFilter {
        resolved_eq: params.resolved_eq,
        severity_eq: params.severity_eq,
        region_eq: params.region_eq,
        threshold_id_eq: params.threshold_id_eq,
    };

    let total = match state.store.count_alerts(&filter).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count alerts");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            );
        }
    };

    match state.store.list_alerts(&filter, limit, offset).await {
        Ok(rows) => {
            let items: Vec<AlertResponse> = rows.into_iter().map(AlertResponse::from).collect();
            paginated_response(items, total, limit, offset)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list alerts");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// Get a single alert.
#[utoipa::path(
    get,
    path = "/v1/alerts/{id}",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert detail", body = AlertResponse),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError),
        (status = 404, description = "Alert not found", body = crate::api::ApiError)
    )
)]
async fn get_alert(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.get_alert_by_id(&id).await {
        Ok(Some(row)) => Json(AlertResponse::from(row)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Alert not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to get alert");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// Resolve an alert. Once resolved, its threshold may trip again on a
/// later evaluation run.
#[utoipa::path(
    post,
    path = "/v1/alerts/{id}/resolve",
    tag = "Alerts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert resolved", body = AlertResponse),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError),
        (status = 404, description = "Alert not found", body = crate::api::ApiError)
    )
)]
async fn resolve_alert(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.resolve_alert(&id).await {
        Ok(true) => match state.store.get_alert_by_id(&id).await {
            Ok(Some(row)) => Json(AlertResponse::from(row)).into_response(),
            Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Alert not found"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload resolved alert");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Database error",
                )
            }
        },
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "Alert not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve alert");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

pub fn alert_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_alerts))
        .routes(routes!(get_alert))
        .routes(routes!(resolve_alert))
}
