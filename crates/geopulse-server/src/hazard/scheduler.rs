use crate::hazard::evaluator::HazardEvaluator;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// Periodic hazard evaluation loop.
pub struct EvaluationScheduler {
    evaluator: Arc<HazardEvaluator>,
    interval_secs: u64,
}

impl EvaluationScheduler {
    pub fn new(evaluator: Arc<HazardEvaluator>, interval_secs: u64) -> Self {
        Self {
            evaluator,
            interval_secs,
        }
    }

    pub async fn run(&self) {
        tracing::info!(
            interval_secs = self.interval_secs,
            "Hazard evaluation scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_secs));
        loop {
            tick.tick().await;
            if let Err(e) = self.evaluator.run().await {
                tracing::error!(error = %e, "Hazard evaluation cycle failed");
            }
        }
    }
}
