use anyhow::Result;
use chrono::{DateTime, Utc};
use geopulse_common::types::LocationSpec;
use geopulse_storage::{GeoStore, ObservationRow};
use geopulse_weather::WeatherClient;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;

const DATA_SOURCE: &str = "open-meteo";

/// One successfully ingested location.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngestResult {
    pub region: String,
    pub observation_id: String,
    pub observed_at: DateTime<Utc>,
}

/// One failed location. The batch continues past failures.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngestFailure {
    pub region: String,
    pub error: String,
}

/// Result of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestRun {
    pub results: Vec<IngestResult>,
    pub errors: Vec<IngestFailure>,
}

/// The weather ingestion batch job: fetch current conditions for each
/// location sequentially and append one observation row per success.
pub struct WeatherIngestor {
    store: Arc<GeoStore>,
    client: Arc<WeatherClient>,
}

impl WeatherIngestor {
    pub fn new(store: Arc<GeoStore>, client: Arc<WeatherClient>) -> Self {
        Self { store, client }
    }

    /// Distinct regions of all active thresholds, first occurrence winning
    /// for coordinates. This is the default location set when the trigger
    /// request carries no body.
    pub async fn monitored_locations(&self) -> Result<Vec<LocationSpec>> {
        let thresholds = self.store.list_active_thresholds().await?;
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        for t in thresholds {
            if seen.insert(t.region.clone()) {
                locations.push(LocationSpec {
                    name: t.region,
                    lat: t.latitude,
                    lng: t.longitude,
                });
            }
        }
        Ok(locations)
    }

    /// Ingest the given locations. A failure on one location is recorded and
    /// the rest of the batch continues; this never returns an error itself.
    pub async fn ingest(&self, locations: &[LocationSpec]) -> IngestRun {
        let mut run = IngestRun::default();

        for location in locations {
            match self.ingest_one(location).await {
                Ok(result) => {
                    tracing::info!(
                        region = %result.region,
                        observation_id = %result.observation_id,
                        "Weather observation ingested"
                    );
                    run.results.push(result);
                }
                Err(e) => {
                    tracing::error!(
                        region = %location.name,
                        error = %e,
                        "Weather ingestion failed for region"
                    );
                    run.errors.push(IngestFailure {
                        region: location.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            ingested = run.results.len(),
            failed = run.errors.len(),
            "Ingestion run finished"
        );
        run
    }

    async fn ingest_one(&self, location: &LocationSpec) -> Result<IngestResult> {
        let reading = self.client.fetch_current(location.lat, location.lng).await?;

        let now = Utc::now();
        let row = ObservationRow {
            id: geopulse_common::id::next_id(),
            region: location.name.clone(),
            latitude: location.lat,
            longitude: location.lng,
            observed_at: now,
            temperature_c: reading.temperature_c,
            rainfall_mm: reading.rainfall_mm,
            soil_moisture: reading.soil_moisture,
            wind_speed_kmh: reading.wind_speed_kmh,
            humidity_percent: reading.humidity_percent,
            data_source: DATA_SOURCE.to_string(),
            raw_payload: Some(reading.raw.to_string()),
            created_at: now,
        };
        let created = self.store.insert_observation(&row).await?;

        Ok(IngestResult {
            region: created.region,
            observation_id: created.id,
            observed_at: created.observed_at,
        })
    }
}
