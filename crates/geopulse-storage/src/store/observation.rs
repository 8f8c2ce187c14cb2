use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::weather_observation::{self, Column, Entity};
use crate::store::GeoStore;

/// Weather observation row (from the `weather_observations` table).
///
/// Observations are append-only; "most recent" is purely timestamp ordering
/// at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRow {
    pub id: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub data_source: String,
    pub raw_payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ObservationRow {
    /// Resolve a threshold's metric key against this observation.
    ///
    /// Unknown metric names resolve to `None`, the same as a known metric
    /// the provider did not report.
    pub fn metric_value(&self, metric: &str) -> Option<f64> {
        match metric {
            "temperature_c" => self.temperature_c,
            "rainfall_mm" => self.rainfall_mm,
            "soil_moisture" => self.soil_moisture,
            "wind_speed_kmh" => self.wind_speed_kmh,
            "humidity_percent" => self.humidity_percent,
            _ => None,
        }
    }
}

fn to_row(m: weather_observation::Model) -> ObservationRow {
    ObservationRow {
        id: m.id,
        region: m.region,
        latitude: m.latitude,
        longitude: m.longitude,
        observed_at: m.observed_at.with_timezone(&Utc),
        temperature_c: m.temperature_c,
        rainfall_mm: m.rainfall_mm,
        soil_moisture: m.soil_moisture,
        wind_speed_kmh: m.wind_speed_kmh,
        humidity_percent: m.humidity_percent,
        data_source: m.data_source,
        raw_payload: m.raw_payload,
        created_at: m.created_at.with_timezone(&Utc),
    }
}

impl GeoStore {
    pub async fn insert_observation(&self, row: &ObservationRow) -> Result<ObservationRow> {
        let am = weather_observation::ActiveModel {
            id: Set(row.id.clone()),
            region: Set(row.region.clone()),
            latitude: Set(row.latitude),
            longitude: Set(row.longitude),
            observed_at: Set(row.observed_at.fixed_offset()),
            temperature_c: Set(row.temperature_c),
            rainfall_mm: Set(row.rainfall_mm),
            soil_moisture: Set(row.soil_moisture),
            wind_speed_kmh: Set(row.wind_speed_kmh),
            humidity_percent: Set(row.humidity_percent),
            data_source: Set(row.data_source.clone()),
            raw_payload: Set(row.raw_payload.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };
        let model = am.insert(self.db()).await?;
        Ok(to_row(model))
    }

    /// Most recent observation for an exact region name, if any.
    pub async fn latest_observation_for_region(
        &self,
        region: &str,
    ) -> Result<Option<ObservationRow>> {
        let model = Entity::find()
            .filter(Column::Region.eq(region))
            .order_by(Column::ObservedAt, Order::Desc)
            .one(self.db())
            .await?;
        Ok(model.map(to_row))
    }

    pub async fn list_observations(
        &self,
        region: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ObservationRow>> {
        let mut q = Entity::find();
        if let Some(region) = region {
            q = q.filter(Column::Region.eq(region));
        }
        let rows = q
            .order_by(Column::ObservedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_observations(&self, region: Option<&str>) -> Result<u64> {
        let mut q = Entity::find();
        if let Some(region) = region {
            q = q.filter(Column::Region.eq(region));
        }
        Ok(q.count(self.db()).await?)
    }

    /// Delete observations older than `retention_days`. Returns the number
    /// of rows removed.
    pub async fn cleanup_observations(&self, retention_days: u32) -> Result<u64> {
        let cutoff = (Utc::now() - Duration::days(retention_days as i64)).fixed_offset();
        let res = Entity::delete_many()
            .filter(Column::ObservedAt.lt(cutoff))
            .exec(self.db())
            .await?;
        Ok(res.rows_affected)
    }
}
