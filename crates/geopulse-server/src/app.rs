use crate::state::AppState;
use crate::{api, auth, hazard, logging, weather};
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GeoPulse API",
        description = "GeoPulse environmental monitoring REST API",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Authentication"),
        (name = "Thresholds", description = "Monitoring threshold management"),
        (name = "Alerts", description = "Hazard alerts"),
        (name = "Observations", description = "Weather observations"),
        (name = "Hazards", description = "Hazard evaluation trigger"),
        (name = "Weather", description = "Weather ingestion trigger"),
        (name = "Locations", description = "Location search")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub fn build_http_app(state: AppState) -> Router {
    let (public_router, public_spec) = api::public_routes().split_for_parts();
    let (login_router, login_spec) = api::auth_routes().split_for_parts();
    let (hazard_router, hazard_spec) = hazard::api::hazard_routes().split_for_parts();
    let (weather_router, weather_spec) = weather::api::weather_routes().split_for_parts();
    let (protected_router, protected_spec) = api::protected_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(public_spec);
    merged_spec.merge(login_spec);
    merged_spec.merge(hazard_spec);
    merged_spec.merge(weather_spec);
    merged_spec.merge(protected_spec);

    // CORS stays permissive: the trigger endpoints are called cross-origin
    // and preflight must always succeed.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public_router
        .merge(login_router)
        .merge(hazard_router)
        .merge(weather_router)
        .merge(protected_router.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::jwt_auth_middleware,
        )))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", merged_spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
