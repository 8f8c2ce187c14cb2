use crate::api::error_response;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Longest accepted search query; anything beyond this is rejected before
/// the provider is contacted.
const MAX_QUERY_CHARS: usize = 120;

const RESULT_COUNT: usize = 5;

/// One location search hit.
#[derive(Serialize, ToSchema)]
pub struct LocationHitResponse {
    /// Place name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name
    pub country: Option<String>,
    /// First-level administrative area
    pub admin1: Option<String>,
}

#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct SearchParams {
    /// Place name to search for
    #[param(required = false)]
    q: Option<String>,
}

/// Search locations by name via the weather provider's geocoding API.
#[utoipa::path(
    get,
    path = "/v1/locations/search",
    tag = "Locations",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching locations", body = Vec<LocationHitResponse>),
        (status = 400, description = "Empty or oversized query", body = crate::api::ApiError),
        (status = 500, description = "Provider failure", body = crate::api::ApiError)
    )
)]
async fn search_locations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    // Input validation happens before any external call.
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "query must not be empty",
        );
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "query too long",
        );
    }

    match state.weather.search_locations(query, RESULT_COUNT).await {
        Ok(hits) => {
            let items: Vec<LocationHitResponse> = hits
                .into_iter()
                .map(|h| LocationHitResponse {
                    name: h.name,
                    latitude: h.latitude,
                    longitude: h.longitude,
                    country: h.country,
                    admin1: h.admin1,
                })
                .collect();
            Json(items).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, query = %query, "Location search failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "weather_api_error",
                "Location search failed",
            )
        }
    }
}

pub fn search_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(search_locations))
}
