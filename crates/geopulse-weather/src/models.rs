use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `current` block of an Open-Meteo forecast response. Every field is
/// optional; the provider omits whatever it cannot report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    pub time: Option<String>,
    pub temperature_2m: Option<f64>,
    pub precipitation: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub soil_moisture_0_to_1cm: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentConditions>,
}

/// One current-conditions reading, normalized to GeoPulse metric names.
#[derive(Debug, Clone)]
pub struct WeatherReading {
    pub temperature_c: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub humidity_percent: Option<f64>,
    /// The raw provider payload, retained verbatim on the observation row.
    pub raw: Value,
}

impl WeatherReading {
    /// Build a reading from a raw provider payload. Absent or non-numeric
    /// fields stay `None`; the payload is kept as-is.
    pub fn from_payload(raw: Value) -> Result<Self, serde_json::Error> {
        let parsed: ForecastResponse = serde_json::from_value(raw.clone())?;
        let current = parsed.current.unwrap_or_default();
        Ok(Self {
            temperature_c: current.temperature_2m,
            rainfall_mm: current.precipitation,
            soil_moisture: current.soil_moisture_0_to_1cm,
            wind_speed_kmh: current.wind_speed_10m,
            humidity_percent: current.relative_humidity_2m,
            raw,
        })
    }
}

/// One geocoding search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingHit {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    /// First-level administrative area (state/province/county)
    pub admin1: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingHit>>,
}
