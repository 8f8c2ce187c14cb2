//! Hazard decision logic: comparison operators, deviation-ratio severity
//! bucketing, and trigger construction.
//!
//! This crate is pure: it never touches storage or the network. The
//! evaluation run in the server crate loads thresholds and observations,
//! calls [`decision::evaluate`] per pair, and persists whatever triggers.

pub mod decision;
pub mod op;
pub mod severity;

#[cfg(test)]
mod tests;

pub use decision::{evaluate, ThresholdCheck, Trigger};
pub use op::CompareOp;
pub use severity::{deviation_ratio, severity_for};
