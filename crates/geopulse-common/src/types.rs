use serde::{Deserialize, Serialize};

/// Hazard alert severity bucket, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use geopulse_common::types::Severity;
///
/// let sev: Severity = "moderate".parse().unwrap();
/// assert_eq!(sev, Severity::Moderate);
/// assert_eq!(sev.to_string(), "moderate");
/// assert!(Severity::Critical > Severity::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "moderate" => Ok(Severity::Moderate),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// A named geographic location submitted to the ingestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LocationSpec {
    /// Region name used as the observation key (e.g. `"Nairobi"`)
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

/// Create-threshold request body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateThresholdRequest {
    /// Region name (must match the region key of ingested observations)
    pub region: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Hazard category (free-form, e.g. `"flood"`, `"drought"`, `"heatwave"`)
    pub hazard_type: String,
    /// Metric key into an observation (e.g. `"temperature_c"`, `"rainfall_mm"`)
    pub metric: String,
    /// Comparison operator: one of `>`, `<`, `>=`, `<=`
    pub operator: String,
    /// Numeric bound the observation is compared against
    pub threshold_value: f64,
    /// Whether the threshold is evaluated (default true)
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Activate / deactivate a threshold.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SetThresholdActiveRequest {
    /// New active state
    pub active: bool,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Login username (required)
    pub username: String,
    /// Password (required)
    pub password: String,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}
