use crate::api::alerts::AlertResponse;
use crate::hazard::evaluator::HazardEvaluator;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Evaluation run summary. This wire shape is consumed by external cron
/// triggers and kept stable.
#[derive(Serialize, ToSchema)]
pub struct EvaluateResponse {
    pub success: bool,
    pub thresholds_evaluated: u64,
    pub alerts_created: u64,
    pub alerts: Vec<AlertResponse>,
}

#[derive(Serialize, ToSchema)]
struct TriggerError {
    error: String,
}

/// Run hazard evaluation over all active thresholds. No request body.
#[utoipa::path(
    post,
    path = "/v1/hazards/evaluate",
    tag = "Hazards",
    responses(
        (status = 200, description = "Evaluation run summary", body = EvaluateResponse),
        (status = 500, description = "Evaluation failed", body = TriggerError)
    )
)]
pub async fn evaluate_hazards(State(state): State<AppState>) -> impl IntoResponse {
    let evaluator = HazardEvaluator::new(state.store.clone(), state.assessor.clone());

    match evaluator.run().await {
        Ok(run) => {
            let alerts: Vec<AlertResponse> =
                run.alerts.into_iter().map(AlertResponse::from).collect();
            Json(EvaluateResponse {
                success: true,
                thresholds_evaluated: run.thresholds_evaluated,
                alerts_created: alerts.len() as u64,
                alerts,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Evaluation run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerError {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub fn hazard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(evaluate_hazards))
}
