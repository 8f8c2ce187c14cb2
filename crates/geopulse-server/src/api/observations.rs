use crate::api::pagination::PaginationParams;
use crate::api::{error_response, paginated_response};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use geopulse_storage::ObservationRow;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Weather observation. The raw provider payload is stored but not exposed
/// through the API.
#[derive(Serialize, ToSchema)]
pub struct ObservationResponse {
    /// Observation unique identifier
    pub id: String,
    /// Region name
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Observation timestamp
    pub observed_at: DateTime<Utc>,
    /// Air temperature (°C)
    pub temperature_c: Option<f64>,
    /// Precipitation (mm)
    pub rainfall_mm: Option<f64>,
    /// Topsoil moisture (m³/m³)
    pub soil_moisture: Option<f64>,
    /// Wind speed (km/h)
    pub wind_speed_kmh: Option<f64>,
    /// Relative humidity (%)
    pub humidity_percent: Option<f64>,
    /// Provider tag
    pub data_source: String,
    pub created_at: DateTime<Utc>,
}

impl From<ObservationRow> for ObservationResponse {
    fn from(r: ObservationRow) -> Self {
        Self {
            id: r.id,
            region: r.region,
            latitude: r.latitude,
            longitude: r.longitude,
            observed_at: r.observed_at,
            temperature_c: r.temperature_c,
            rainfall_mm: r.rainfall_mm,
            soil_moisture: r.soil_moisture,
            wind_speed_kmh: r.wind_speed_kmh,
            humidity_percent: r.humidity_percent,
            data_source: r.data_source,
            created_at: r.created_at,
        }
    }
}

/// Observation list query parameters.
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ListObservationsParams {
    /// Region exact match
    #[param(required = false, rename = "region__eq")]
    #[serde(rename = "region__eq")]
    region_eq: Option<String>,
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

/// List weather observations, newest first.
#[utoipa::path(
    get,
    path = "/v1/observations",
    tag = "Observations",
    security(("bearer_auth" = [])),
    params(ListObservationsParams),
    responses(
        (status = 200, description = "Paginated observation list", body = Vec<ObservationResponse>),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError)
    )
)]
async fn list_observations(
    State(state): State<AppState>,
    Query(params): Query<ListObservationsParams>,
) -> impl IntoResponse {
    let limit = PaginationParams::resolve_limit(params.limit);
    let offset = PaginationParams::resolve_offset(params.offset);
    let region = params.region_eq.as_deref();

    let total = match state.store.count_observations(region).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count observations");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            );
        }
    };

    match state.store.list_observations(region, limit, offset).await {
        Ok(rows) => {
            let items: Vec<ObservationResponse> =
                rows.into_iter().map(ObservationResponse::from).collect();
            paginated_response(items, total, limit, offset)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list observations");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct LatestObservationParams {
    /// Region name
    region: String,
}

/// Most recent observation for a region.
#[utoipa::path(
    get,
    path = "/v1/observations/latest",
    tag = "Observations",
    security(("bearer_auth" = [])),
    params(LatestObservationParams),
    responses(
        (status = 200, description = "Latest observation", body = ObservationResponse),
        (status = 401, description = "Not authenticated", body = crate::api::ApiError),
        (status = 404, description = "No observations for region", body = crate::api::ApiError)
    )
)]
async fn latest_observation(
    State(state): State<AppState>,
    Query(params): Query<LatestObservationParams>,
) -> impl IntoResponse {
    match state
        .store
        .latest_observation_for_region(&params.region)
        .await
    {
        Ok(Some(row)) => Json(ObservationResponse::from(row)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            "No observations for region",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to get latest observation");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Database error",
            )
        }
    }
}

pub fn observation_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_observations))
        .routes(routes!(latest_observation))
}
