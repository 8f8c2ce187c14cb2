//! Persistence layer for GeoPulse.
//!
//! All monitoring data (thresholds, weather observations, hazard alerts,
//! users) lives in a single SQLite database behind [`store::GeoStore`],
//! accessed through SeaORM. Schema migrations run automatically on connect.

pub mod auth;
pub mod entities;
pub mod store;

#[cfg(test)]
mod tests;

pub use store::alert::{AiAssessment, AlertFilter, AlertRow};
pub use store::observation::ObservationRow;
pub use store::threshold::{ThresholdFilter, ThresholdRow};
pub use store::user::UserRow;
pub use store::GeoStore;
