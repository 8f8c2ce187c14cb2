use crate::api::pagination::PaginationParams;
use crate::api::{error_response, paginated_response};
use crate::auth::Claims;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use geopulse_common::types::{CreateThresholdRequest, SetThresholdActiveRequest};
use geopulse_hazard::CompareOp;
use geopulse_storage::{ThresholdFilter, ThresholdRow};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Monitoring threshold.
#[derive(Serialize, ToSchema)]
pub struct ThresholdResponse {
    /// Threshold unique identifier
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Region name
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Hazard category
    pub hazard_type: String,
    /// Metric key
    pub metric: String,
    /// Comparison operator (`>`, `<`, `>=`, `<=`)
    pub operator: String,
    /// Numeric bound
    pub threshold_value: f64,
    /// Whether the threshold is evaluated
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ThresholdRow> for ThresholdResponse {
    fn from(r: ThresholdRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            region: r.region,
            latitude: r.latitude,
            longitude: r.longitude,
            hazard_type: r.hazard_type,
            metric: r.metric,
            operator: r.operator,
            threshold_value: r.threshold_value,
            active: r.active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Threshold list query parameters.
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ListThresholdsParams {
    /// Region exact match
    #[param(required = false, rename = "region__eq")]
    #[serde(rename = "region__eq")]
    region_eq: Option<String>,
    /// Metric exact match
    #[param(required = false, rename = "metric__eq")]
    #[serde(rename = "metric__eq")]
    metric_eq: Option<String>,
    /// Active flag exact match
    #[param(required = false, rename = "active__eq")]
    #[serde(rename = "active__eq")]
    active_eq: Option<bool>,
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

/// List monitoring thresholds, newest first.
#[utoipa::path(
    get,
    path = "/v1/thresholds",
    tag = "Thresholds",
    security(("bearer_auth" = [])),
    params(ListThresholdsParams),
    responses(
        (status = 200, description = "Paginated threshold list", body = Vec<ThresholdResponse>),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError)
    )
)]
async fn list_thresholds(
    State(state): State<AppState>,
    Query(params): Query<ListThresholdsParams>,
) -> impl IntoResponse {
    let limit = PaginationParams::resolve_limit(params.limit);
    let offset = PaginationParams::resolve_offset(params.offset);
    let filter = ThresholdFilter {
        region_eq: params.region_eq,
        metric_eq: params.metric_eq,
        active_eq: params.active_eq,
    };

    let total = match state.store.count_thresholds(&filter).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count thresholds");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            );
        }
    };

    match state.store.list_thresholds(&filter, limit, offset).await {
        Ok(rows) => {
            let items: Vec<ThresholdResponse> =
                rows.into_iter().map(ThresholdResponse::from).collect();
            paginated_response(items, total, limit, offset)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list thresholds");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// Get a single threshold.
#[utoipa::path(
    get,
    path = "/v1/thresholds/{id}",
    tag = "Thresholds",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Threshold ID")),
    responses(
        (status = 200, description = "Threshold detail", body = ThresholdResponse),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError),
        (status = 404, description = "Threshold not found", body = crate::api::ApiError)
    )
)]
async fn get_threshold(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_threshold_by_id(&id).await {
        Ok(Some(row)) => Json(ThresholdResponse::from(row)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Threshold not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to get threshold");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

fn validate_create(req: &CreateThresholdRequest) -> Result<(), String> {
    if req.region.trim().is_empty() {
        return Err("region must not be empty".to_string());
    }
    if req.metric.trim().is_empty() {
        return Err("metric must not be empty".to_string());
    }
    if req.hazard_type.trim().is_empty() {
        return Err("hazard_type must not be empty".to_string());
    }
    // The closed operator set is enforced here; rows written before this
    // validation existed still evaluate via the lenient parse.
    if req.operator.parse::<CompareOp>().is_err() {
        return Err(format!(
            "operator must be one of >, <, >=, <= (got '{}')",
            req.operator
        ));
    }
    if !(-90.0..=90.0).contains(&req.lat) {
        return Err("lat must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&req.lng) {
        return Err("lng must be between -180 and 180".to_string());
    }
    if !req.threshold_value.is_finite() {
        return Err("threshold_value must be a finite number".to_string());
    }
    Ok(())
}

/// Create a monitoring threshold.
#[utoipa::path(
    post,
    path = "/v1/thresholds",
    tag = "Thresholds",
    security(("bearer_auth" = [])),
    request_body = CreateThresholdRequest,
    responses(
        (status = 201, description = "Threshold created", body = ThresholdResponse),
        (status = 400, description = "Invalid request", body = crate::api::ApiError),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError)
    )
)]
async fn create_threshold(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateThresholdRequest>,
) -> impl IntoResponse {
    if let Err(msg) = validate_create(&req) {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request", &msg);
    }

    let now = Utc::now();
    let row = ThresholdRow {
        id: geopulse_common::id::next_id(),
        user_id: claims.sub.clone(),
        region: req.region.trim().to_string(),
        latitude: req.lat,
        longitude: req.lng,
        hazard_type: req.hazard_type.trim().to_string(),
        metric: req.metric.trim().to_string(),
        operator: req.operator,
        threshold_value: req.threshold_value,
        active: req.active,
        created_at: now,
        updated_at: now,
    };

    match state.store.insert_threshold(&row).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ThresholdResponse::from(created)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create threshold");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// Activate or deactivate a threshold. Thresholds are deactivated rather
/// than deleted.
#[utoipa::path(
    put,
    path = "/v1/thresholds/{id}/active",
    tag = "Thresholds",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Threshold ID")),
    request_body = SetThresholdActiveRequest,
    responses(
        (status = 200, description = "Threshold updated", body = ThresholdResponse),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError),
        (status = 404, description = "Threshold not found", body = crate::api::ApiError)
    )
)]
async fn set_threshold_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetThresholdActiveRequest>,
) -> impl IntoResponse {
    match state.store.set_threshold_active(&id, req.active).await {
        Ok(Some(row)) => Json(ThresholdResponse::from(row)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Threshold not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update threshold active state");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

pub fn threshold_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_thresholds, create_threshold))
        .routes(routes!(get_threshold))
        .routes(routes!(set_threshold_active))
}
