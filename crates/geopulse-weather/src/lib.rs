//! HTTP client for the public weather provider (Open-Meteo-compatible):
//! current conditions keyed by latitude/longitude, plus location geocoding
//! search. No API key is required; failures surface as
//! [`error::WeatherApiError`] and are handled per-item by callers.

pub mod client;
pub mod error;
pub mod models;

pub use client::WeatherClient;
pub use error::WeatherApiError;
pub use models::{GeocodingHit, WeatherReading};
