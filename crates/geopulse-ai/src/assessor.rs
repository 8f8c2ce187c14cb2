use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Everything the risk-note prompt embeds about a tripped threshold.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentInput {
    /// Hazard category (e.g. `"flood"`)
    pub hazard_type: String,
    /// Metric key that tripped (e.g. `"rainfall_mm"`)
    pub metric: String,
    /// Observed metric value
    pub observed_value: f64,
    /// Configured threshold bound
    pub threshold_value: f64,
    /// Region name
    pub region: String,
}

/// Text-generation backend producing a one-paragraph risk note.
///
/// Implementations return `Err` on any failure (network, non-2xx status,
/// malformed response). Callers own the failure boundary: enrichment is
/// best-effort and an error must never abort alert creation.
#[async_trait]
pub trait RiskAssessor: Send + Sync {
    /// Provider name (e.g. `"gateway"`).
    fn provider(&self) -> &str;

    /// Model identifier stored alongside the generated note.
    fn model_name(&self) -> &str;

    /// Generate a risk note for a tripped threshold.
    async fn assess(&self, input: &AssessmentInput) -> Result<String>;
}
