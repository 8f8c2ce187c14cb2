use geopulse_common::types::Severity;

/// Normalized deviation of an observed value from its threshold.
///
/// The denominator is clamped to at least 1 so near-zero thresholds do not
/// blow the ratio up.
pub fn deviation_ratio(observed: f64, threshold: f64) -> f64 {
    (observed - threshold).abs() / threshold.abs().max(1.0)
}

/// Severity bucket for an observed/threshold pair.
///
/// Purely a function of distance from the threshold; the comparison
/// operator and hazard category play no part. Cutoffs are inclusive, so a
/// ratio of exactly 0.75 is already `High`.
///
/// # Examples
///
/// ```
/// use geopulse_common::types::Severity;
/// use geopulse_hazard::severity_for;
///
/// // |42 - 35| / 35 ≈ 0.2
/// assert_eq!(severity_for(42.0, 35.0), Severity::Low);
/// // |90 - 35| / 35 ≈ 1.57
/// assert_eq!(severity_for(90.0, 35.0), Severity::Critical);
/// ```
pub fn severity_for(observed: f64, threshold: f64) -> Severity {
    let ratio = deviation_ratio(observed, threshold);
    if ratio >= 1.5 {
        Severity::Critical
    } else if ratio >= 0.75 {
        Severity::High
    } else if ratio >= 0.3 {
        Severity::Moderate
    } else {
        Severity::Low
    }
}
