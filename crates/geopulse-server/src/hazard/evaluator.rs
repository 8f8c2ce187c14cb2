use anyhow::Result;
use chrono::Utc;
use geopulse_ai::{AssessmentInput, RiskAssessor};
use geopulse_hazard::{evaluate, CompareOp, ThresholdCheck, Trigger};
use geopulse_storage::{AiAssessment, AlertRow, GeoStore, ThresholdRow};
use std::sync::Arc;

/// Result of one evaluation run.
#[derive(Debug, Default)]
pub struct EvaluationRun {
    /// Active thresholds considered by this run
    pub thresholds_evaluated: u64,
    /// Thresholds skipped (no observation, metric absent, or an unresolved
    /// alert already exists)
    pub skipped: u64,
    /// Per-threshold storage failures captured without aborting the run
    pub errors: u64,
    /// Newly created alerts
    pub alerts: Vec<AlertRow>,
}

enum Outcome {
    Created(AlertRow),
    NotTriggered,
    Skipped,
}

/// The hazard evaluation batch job: load active thresholds, match each
/// against the most recent observation for its region, and persist an alert
/// for every threshold that trips and has no unresolved alert yet.
///
/// Thresholds are processed strictly sequentially; there is no retry logic.
pub struct HazardEvaluator {
    store: Arc<GeoStore>,
    assessor: Option<Arc<dyn RiskAssessor>>,
}

impl HazardEvaluator {
    pub fn new(store: Arc<GeoStore>, assessor: Option<Arc<dyn RiskAssessor>>) -> Self {
        Self { store, assessor }
    }

    pub async fn run(&self) -> Result<EvaluationRun> {
        let thresholds = self.store.list_active_thresholds().await?;

        let mut run = EvaluationRun {
            thresholds_evaluated: thresholds.len() as u64,
            ..Default::default()
        };
        if thresholds.is_empty() {
            return Ok(run);
        }

        for threshold in &thresholds {
            match self.evaluate_threshold(threshold).await {
                Ok(Outcome::Created(alert)) => {
                    tracing::info!(
                        threshold_id = %threshold.id,
                        region = %threshold.region,
                        severity = %alert.severity,
                        alert_id = %alert.id,
                        "Hazard alert created"
                    );
                    run.alerts.push(alert);
                }
                Ok(Outcome::NotTriggered) => {}
                Ok(Outcome::Skipped) => {
                    run.skipped += 1;
                }
                Err(e) => {
                    run.errors += 1;
                    tracing::error!(
                        threshold_id = %threshold.id,
                        error = %e,
                        "Threshold evaluation failed"
                    );
                }
            }
        }

        tracing::info!(
            thresholds_evaluated = run.thresholds_evaluated,
            alerts_created = run.alerts.len(),
            skipped = run.skipped,
            errors = run.errors,
            "Evaluation run finished"
        );
        Ok(run)
    }

    async fn evaluate_threshold(&self, threshold: &ThresholdRow) -> Result<Outcome> {
        let Some(observation) = self
            .store
            .latest_observation_for_region(&threshold.region)
            .await?
        else {
            tracing::debug!(
                threshold_id = %threshold.id,
                region = %threshold.region,
                "No observation for region, skipping"
            );
            return Ok(Outcome::Skipped);
        };

        let Some(observed) = observation.metric_value(&threshold.metric) else {
            tracing::debug!(
                threshold_id = %threshold.id,
                metric = %threshold.metric,
                "Metric absent on latest observation, skipping"
            );
            return Ok(Outcome::Skipped);
        };

        let check = ThresholdCheck {
            region: &threshold.region,
            hazard_type: &threshold.hazard_type,
            metric: &threshold.metric,
            // Rows predating operator validation may hold anything; they
            // evaluate as ">".
            operator: CompareOp::parse_or_default(&threshold.operator),
            threshold_value: threshold.threshold_value,
        };
        let Some(trigger) = evaluate(&check, observed) else {
            return Ok(Outcome::NotTriggered);
        };

        if self
            .store
            .find_unresolved_alert_for_threshold(&threshold.id)
            .await?
            .is_some()
        {
            tracing::debug!(
                threshold_id = %threshold.id,
                "Unresolved alert already exists, skipping"
            );
            return Ok(Outcome::Skipped);
        }

        let assessment = self.request_assessment(threshold, &trigger).await;

        let now = Utc::now();
        let row = AlertRow {
            id: geopulse_common::id::next_id(),
            user_id: threshold.user_id.clone(),
            threshold_id: threshold.id.clone(),
            region: threshold.region.clone(),
            latitude: threshold.latitude,
            longitude: threshold.longitude,
            hazard_type: threshold.hazard_type.clone(),
            severity: trigger.severity.to_string(),
            title: trigger.title,
            description: trigger.description,
            metric: threshold.metric.clone(),
            observed_value: trigger.observed_value,
            threshold_value: trigger.threshold_value,
            ai_assessment: assessment.as_ref().map(|a| a.text.clone()),
            ai_model: assessment.as_ref().map(|a| a.model.clone()),
            ai_generated_at: assessment.as_ref().map(|a| a.generated_at),
            resolved: false,
            created_at: now,
            updated_at: now,
        };

        match self.store.insert_alert(&row).await {
            Ok(created) => Ok(Outcome::Created(created)),
            Err(e) if e.to_string().contains("UNIQUE constraint") => {
                // An overlapping run inserted first; the invariant holds.
                tracing::warn!(
                    threshold_id = %threshold.id,
                    "Concurrent run already created an unresolved alert, skipping"
                );
                Ok(Outcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort enrichment. Any failure degrades to "no note" and never
    /// aborts alert creation.
    async fn request_assessment(
        &self,
        threshold: &ThresholdRow,
        trigger: &Trigger,
    ) -> Option<AiAssessment> {
        let assessor = self.assessor.as_ref()?;

        let input = AssessmentInput {
            hazard_type: threshold.hazard_type.clone(),
            metric: threshold.metric.clone(),
            observed_value: trigger.observed_value,
            threshold_value: trigger.threshold_value,
            region: threshold.region.clone(),
        };

        match assessor.assess(&input).await {
            Ok(text) => Some(AiAssessment {
                text,
                model: assessor.model_name().to_string(),
                generated_at: Utc::now(),
            }),
            Err(e) => {
                tracing::warn!(
                    threshold_id = %threshold.id,
                    error = %e,
                    "Risk note generation failed, creating alert without assessment"
                );
                None
            }
        }
    }
}
