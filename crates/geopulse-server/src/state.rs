use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use geopulse_ai::RiskAssessor;
use geopulse_storage::GeoStore;
use geopulse_weather::WeatherClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GeoStore>,
    pub weather: Arc<WeatherClient>,
    /// Present only when `[ai]` is enabled; alerts are created without
    /// assessments otherwise.
    pub assessor: Option<Arc<dyn RiskAssessor>>,
    pub jwt_secret: Arc<String>,
    pub token_expire_secs: u64,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}
