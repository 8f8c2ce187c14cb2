use crate::decision::{evaluate, ThresholdCheck};
use crate::op::CompareOp;
use crate::severity::{deviation_ratio, severity_for};
use geopulse_common::types::Severity;

fn make_check(operator: CompareOp, threshold_value: f64) -> ThresholdCheck<'static> {
    ThresholdCheck {
        region: "Nairobi",
        hazard_type: "heatwave",
        metric: "temperature_c",
        operator,
        threshold_value,
    }
}

#[test]
fn all_four_operators_hold_exactly() {
    assert!(CompareOp::GreaterThan.check(36.0, 35.0));
    assert!(!CompareOp::GreaterThan.check(35.0, 35.0));

    assert!(CompareOp::LessThan.check(34.0, 35.0));
    assert!(!CompareOp::LessThan.check(35.0, 35.0));

    assert!(CompareOp::GreaterEqual.check(35.0, 35.0));
    assert!(!CompareOp::GreaterEqual.check(34.9, 35.0));

    assert!(CompareOp::LessEqual.check(35.0, 35.0));
    assert!(!CompareOp::LessEqual.check(35.1, 35.0));
}

#[test]
fn strict_parse_rejects_unknown_operators() {
    assert_eq!(">".parse::<CompareOp>().unwrap(), CompareOp::GreaterThan);
    assert_eq!("<".parse::<CompareOp>().unwrap(), CompareOp::LessThan);
    assert_eq!(">=".parse::<CompareOp>().unwrap(), CompareOp::GreaterEqual);
    assert_eq!("<=".parse::<CompareOp>().unwrap(), CompareOp::LessEqual);

    assert!("==".parse::<CompareOp>().is_err());
    assert!("gt".parse::<CompareOp>().is_err());
    assert!("".parse::<CompareOp>().is_err());
}

#[test]
fn lenient_parse_falls_back_to_greater_than() {
    // Legacy rows with unrecognized operators behave exactly like ">".
    for raw in ["==", "!=", "gt", "between", ""] {
        let op = CompareOp::parse_or_default(raw);
        assert_eq!(op, CompareOp::GreaterThan);
        assert_eq!(op.check(36.0, 35.0), CompareOp::GreaterThan.check(36.0, 35.0));
        assert_eq!(op.check(35.0, 35.0), CompareOp::GreaterThan.check(35.0, 35.0));
    }
    assert_eq!(CompareOp::parse_or_default("<="), CompareOp::LessEqual);
}

#[test]
fn severity_matches_cutoffs_at_boundaries() {
    // ratio = |v - 100| / 100
    assert_eq!(severity_for(129.9, 100.0), Severity::Low);
    assert_eq!(severity_for(130.0, 100.0), Severity::Moderate); // ratio = 0.3
    assert_eq!(severity_for(174.9, 100.0), Severity::Moderate);
    assert_eq!(severity_for(175.0, 100.0), Severity::High); // ratio = 0.75
    assert_eq!(severity_for(249.9, 100.0), Severity::High);
    assert_eq!(severity_for(250.0, 100.0), Severity::Critical); // ratio = 1.5
}

#[test]
fn severity_is_monotonic_in_the_ratio() {
    let mut last = Severity::Low;
    for i in 0..2000 {
        let observed = 100.0 + f64::from(i) * 0.25;
        let sev = severity_for(observed, 100.0);
        assert!(sev >= last, "severity regressed at observed={observed}");
        last = sev;
    }
}

#[test]
fn severity_ignores_direction_and_clamps_small_thresholds() {
    // Deviation is absolute: undershooting by the same distance buckets
    // identically.
    assert_eq!(severity_for(25.0, 100.0), severity_for(175.0, 100.0));

    // Denominator clamps at 1 for small thresholds.
    assert_eq!(deviation_ratio(1.0, 0.25), 0.75);
    assert_eq!(severity_for(0.9, 0.1), Severity::High);
}

#[test]
fn mild_overshoot_buckets_as_low() {
    let check = make_check(CompareOp::GreaterThan, 35.0);
    let trigger = evaluate(&check, 42.0).expect("42 > 35 must trigger");
    // |42 - 35| / 35 ≈ 0.2
    assert_eq!(trigger.severity, Severity::Low);
    assert_eq!(trigger.observed_value, 42.0);
    assert_eq!(trigger.threshold_value, 35.0);
}

#[test]
fn large_overshoot_buckets_as_critical() {
    let check = make_check(CompareOp::GreaterThan, 35.0);
    let trigger = evaluate(&check, 90.0).expect("90 > 35 must trigger");
    // |90 - 35| / 35 ≈ 1.57
    assert_eq!(trigger.severity, Severity::Critical);
}

#[test]
fn no_trigger_when_comparison_does_not_hold() {
    let check = make_check(CompareOp::GreaterThan, 35.0);
    assert!(evaluate(&check, 35.0).is_none());
    assert!(evaluate(&check, 20.0).is_none());

    let check = make_check(CompareOp::LessThan, 5.0);
    assert!(evaluate(&check, 5.0).is_none());
    assert!(evaluate(&check, 3.0).is_some());
}

#[test]
fn trigger_message_names_metric_region_and_bound() {
    let check = ThresholdCheck {
        region: "Mombasa",
        hazard_type: "flood",
        metric: "rainfall_mm",
        operator: CompareOp::GreaterEqual,
        threshold_value: 100.0,
    };
    let trigger = evaluate(&check, 130.0).unwrap();
    assert_eq!(trigger.title, "flood alert: Mombasa");
    assert!(trigger.description.contains("rainfall_mm"));
    assert!(trigger.description.contains("at or above"));
    assert!(trigger.description.contains("100"));
    assert!(trigger.description.contains("Mombasa"));
}
