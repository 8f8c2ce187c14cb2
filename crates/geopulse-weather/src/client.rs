use crate::error::{Result, WeatherApiError};
use crate::models::{GeocodingHit, GeocodingResponse, WeatherReading};
use reqwest::Client;
use serde_json::Value;

/// Current-conditions fields requested from the provider, matching the
/// metric set GeoPulse stores on an observation row.
const CURRENT_FIELDS: &str =
    "temperature_2m,precipitation,relative_humidity_2m,wind_speed_10m,soil_moisture_0_to_1cm";

/// HTTP client for the weather provider.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    forecast_url: String,
    geocoding_url: String,
}

impl WeatherClient {
    pub fn new(forecast_url: String, geocoding_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            forecast_url,
            geocoding_url,
        })
    }

    /// Fetch current conditions for a coordinate pair.
    pub async fn fetch_current(&self, lat: f64, lng: f64) -> Result<WeatherReading> {
        tracing::debug!(lat, lng, "Fetching current weather");

        let resp = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("wind_speed_unit", "kmh".to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(WeatherApiError::Http { status, body });
        }

        let payload: Value = resp.json().await?;
        Ok(WeatherReading::from_payload(payload)?)
    }

    /// Search locations by name. Returns at most `count` hits; an unknown
    /// name yields an empty list, not an error.
    pub async fn search_locations(&self, query: &str, count: usize) -> Result<Vec<GeocodingHit>> {
        tracing::debug!(query, count, "Searching locations");

        let resp = self
            .client
            .get(&self.geocoding_url)
            .query(&[
                ("name", query.to_string()),
                ("count", count.to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(WeatherApiError::Http { status, body });
        }

        let parsed: GeocodingResponse = resp.json().await?;
        Ok(parsed.results.unwrap_or_default())
    }
}
