use crate::store::GeoStore;
use crate::{AlertFilter, AlertRow, ObservationRow, ThresholdFilter, ThresholdRow};
use chrono::{Duration, Utc};
use tempfile::TempDir;

async fn setup() -> (TempDir, GeoStore) {
    geopulse_common::id::init(1, 1);
    let dir = TempDir::new().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("geopulse.db").display()
    );
    let store = GeoStore::new(&db_url).await.unwrap();
    (dir, store)
}

fn make_threshold(region: &str, metric: &str, operator: &str, value: f64) -> ThresholdRow {
    let now = Utc::now();
    ThresholdRow {
        id: geopulse_common::id::next_id(),
        user_id: "user-1".to_string(),
        region: region.to_string(),
        latitude: -1.29,
        longitude: 36.82,
        hazard_type: "heatwave".to_string(),
        metric: metric.to_string(),
        operator: operator.to_string(),
        threshold_value: value,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

fn make_observation(region: &str, temperature_c: Option<f64>, secs_ago: i64) -> ObservationRow {
    let ts = Utc::now() - Duration::seconds(secs_ago);
    ObservationRow {
        id: geopulse_common::id::next_id(),
        region: region.to_string(),
        latitude: -1.29,
        longitude: 36.82,
        observed_at: ts,
        temperature_c,
        rainfall_mm: Some(0.0),
        soil_moisture: None,
        wind_speed_kmh: Some(12.5),
        humidity_percent: Some(61.0),
        data_source: "open-meteo".to_string(),
        raw_payload: None,
        created_at: ts,
    }
}

fn make_alert(threshold_id: &str, region: &str) -> AlertRow {
    let now = Utc::now();
    AlertRow {
        id: geopulse_common::id::next_id(),
        user_id: "user-1".to_string(),
        threshold_id: threshold_id.to_string(),
        region: region.to_string(),
        latitude: -1.29,
        longitude: 36.82,
        hazard_type: "heatwave".to_string(),
        severity: "low".to_string(),
        title: "heatwave alert: Nairobi".to_string(),
        description: "temperature_c is above 35 in Nairobi (observed 42)".to_string(),
        metric: "temperature_c".to_string(),
        observed_value: 42.0,
        threshold_value: 35.0,
        ai_assessment: None,
        ai_model: None,
        ai_generated_at: None,
        resolved: false,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn insert_and_list_thresholds_with_active_filter() {
    let (_dir, store) = setup().await;

    let active = store
        .insert_threshold(&make_threshold("Nairobi", "temperature_c", ">", 35.0))
        .await
        .unwrap();
    let inactive = store
        .insert_threshold(&ThresholdRow {
            active: false,
            ..make_threshold("Mombasa", "rainfall_mm", ">=", 100.0)
        })
        .await
        .unwrap();

    let all = store
        .list_thresholds(&ThresholdFilter::default(), 100, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let only_active = store.list_active_thresholds().await.unwrap();
    assert_eq!(only_active.len(), 1);
    assert_eq!(only_active[0].id, active.id);

    let count = store
        .count_thresholds(&ThresholdFilter {
            active_eq: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert!(!inactive.active);
}

#[tokio::test]
async fn deactivated_threshold_leaves_active_list() {
    let (_dir, store) = setup().await;

    let row = store
        .insert_threshold(&make_threshold("Nairobi", "temperature_c", ">", 35.0))
        .await
        .unwrap();

    let updated = store
        .set_threshold_active(&row.id, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.active);
    assert!(store.list_active_thresholds().await.unwrap().is_empty());

    // Unknown ID is a no-op, not an error
    assert!(store
        .set_threshold_active("does-not-exist", true)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn latest_observation_picks_newest_by_timestamp() {
    let (_dir, store) = setup().await;

    store
        .insert_observation(&make_observation("Nairobi", Some(30.0), 3600))
        .await
        .unwrap();
    store
        .insert_observation(&make_observation("Nairobi", Some(42.0), 60))
        .await
        .unwrap();
    store
        .insert_observation(&make_observation("Mombasa", Some(28.0), 10))
        .await
        .unwrap();

    let latest = store
        .latest_observation_for_region("Nairobi")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.temperature_c, Some(42.0));

    assert!(store
        .latest_observation_for_region("Kisumu")
        .await
        .unwrap()
        .is_none());
}

#[test]
fn metric_value_resolves_known_keys_only() {
    let obs = make_observation("Nairobi", Some(42.0), 0);
    assert_eq!(obs.metric_value("temperature_c"), Some(42.0));
    assert_eq!(obs.metric_value("wind_speed_kmh"), Some(12.5));
    assert_eq!(obs.metric_value("soil_moisture"), None);
    assert_eq!(obs.metric_value("no_such_metric"), None);
}

#[tokio::test]
async fn unresolved_alert_is_unique_per_threshold() {
    let (_dir, store) = setup().await;

    let threshold = store
        .insert_threshold(&make_threshold("Nairobi", "temperature_c", ">", 35.0))
        .await
        .unwrap();

    let first = store.insert_alert(&make_alert(&threshold.id, "Nairobi")).await;
    assert!(first.is_ok());

    // Second unresolved alert for the same threshold hits the partial
    // unique index.
    let second = store.insert_alert(&make_alert(&threshold.id, "Nairobi")).await;
    let err = second.err().expect("duplicate unresolved alert must fail");
    assert!(err.to_string().contains("UNIQUE"), "unexpected error: {err}");

    let existing = store
        .find_unresolved_alert_for_threshold(&threshold.id)
        .await
        .unwrap();
    assert!(existing.is_some());
}

#[tokio::test]
async fn resolving_allows_a_new_alert_for_the_same_threshold() {
    let (_dir, store) = setup().await;

    let threshold = store
        .insert_threshold(&make_threshold("Nairobi", "temperature_c", ">", 35.0))
        .await
        .unwrap();

    let alert = store
        .insert_alert(&make_alert(&threshold.id, "Nairobi"))
        .await
        .unwrap();
    assert!(store.resolve_alert(&alert.id).await.unwrap());
    assert!(store
        .find_unresolved_alert_for_threshold(&threshold.id)
        .await
        .unwrap()
        .is_none());

    // With the previous alert resolved, the threshold may trip again.
    store
        .insert_alert(&make_alert(&threshold.id, "Nairobi"))
        .await
        .unwrap();

    let unresolved = store
        .count_alerts(&AlertFilter {
            resolved_eq: Some(false),
            threshold_id_eq: Some(threshold.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(unresolved, 1);

    assert!(!store.resolve_alert("does-not-exist").await.unwrap());
}

#[tokio::test]
async fn cleanup_removes_only_stale_observations() {
    let (_dir, store) = setup().await;

    store
        .insert_observation(&make_observation("Nairobi", Some(30.0), 40 * 86400))
        .await
        .unwrap();
    store
        .insert_observation(&make_observation("Nairobi", Some(42.0), 60))
        .await
        .unwrap();

    let removed = store.cleanup_observations(30).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.count_observations(Some("Nairobi")).await.unwrap(), 1);
}

#[tokio::test]
async fn create_and_look_up_user() {
    let (_dir, store) = setup().await;

    assert_eq!(store.count_users().await.unwrap(), 0);
    let hash = crate::auth::hash_password("changeme").unwrap();
    let user = store.create_user("admin", &hash).await.unwrap();
    assert_eq!(user.username, "admin");

    let found = store.get_user_by_username("admin").await.unwrap().unwrap();
    assert!(crate::auth::verify_password("changeme", &found.password_hash).unwrap());
    assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
}
