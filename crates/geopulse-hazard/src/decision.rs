use crate::op::CompareOp;
use crate::severity::severity_for;
use geopulse_common::types::Severity;

/// The parts of a monitoring threshold the decision logic needs.
#[derive(Debug, Clone)]
pub struct ThresholdCheck<'a> {
    pub region: &'a str,
    pub hazard_type: &'a str,
    pub metric: &'a str,
    pub operator: CompareOp,
    pub threshold_value: f64,
}

/// A tripped threshold, ready to be persisted as an alert.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub observed_value: f64,
    pub threshold_value: f64,
}

/// Evaluate one threshold against one observed metric value.
///
/// Returns `None` when the comparison does not hold.
pub fn evaluate(check: &ThresholdCheck<'_>, observed: f64) -> Option<Trigger> {
    if !check.operator.check(observed, check.threshold_value) {
        return None;
    }

    let severity = severity_for(observed, check.threshold_value);
    Some(Trigger {
        severity,
        title: format!("{} alert: {}", check.hazard_type, check.region),
        description: format!(
            "{} is {} {} in {} (observed {}, severity {})",
            check.metric,
            check.operator.describe(),
            check.threshold_value,
            check.region,
            observed,
            severity,
        ),
        observed_value: observed,
        threshold_value: check.threshold_value,
    })
}
