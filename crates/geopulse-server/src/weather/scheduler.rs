use crate::weather::ingestor::WeatherIngestor;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// Periodic weather ingestion loop over the monitored regions.
pub struct IngestScheduler {
    ingestor: Arc<WeatherIngestor>,
    interval_secs: u64,
}

impl IngestScheduler {
    pub fn new(ingestor: Arc<WeatherIngestor>, interval_secs: u64) -> Self {
        Self {
            ingestor,
            interval_secs,
        }
    }

    pub async fn run(&self) {
        tracing::info!(
            interval_secs = self.interval_secs,
            "Weather ingestion scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_secs));
        loop {
            tick.tick().await;
            if let Err(e) = self.ingest_cycle().await {
                tracing::error!(error = %e, "Weather ingestion cycle failed");
            }
        }
    }

    async fn ingest_cycle(&self) -> anyhow::Result<()> {
        let locations = self.ingestor.monitored_locations().await?;
        if locations.is_empty() {
            tracing::debug!("No monitored regions, skipping ingestion cycle");
            return Ok(());
        }
        self.ingestor.ingest(&locations).await;
        Ok(())
    }
}
