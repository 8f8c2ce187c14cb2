use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::monitoring_threshold::{self, Column, Entity};
use crate::store::GeoStore;

/// Monitoring threshold row (from the `monitoring_thresholds` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRow {
    pub id: String,
    pub user_id: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hazard_type: String,
    pub metric: String,
    pub operator: String,
    pub threshold_value: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Threshold list filter.
#[derive(Debug, Clone, Default)]
pub struct ThresholdFilter {
    pub region_eq: Option<String>,
    pub metric_eq: Option<String>,
    pub active_eq: Option<bool>,
}

fn to_row(m: monitoring_threshold::Model) -> ThresholdRow {
    ThresholdRow {
        id: m.id,
        user_id: m.user_id,
        region: m.region,
        latitude: m.latitude,
        longitude: m.longitude,
        hazard_type: m.hazard_type,
        metric: m.metric,
        operator: m.operator,
        threshold_value: m.threshold_value,
        active: m.active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn apply_filter(
    mut q: sea_orm::Select<Entity>,
    filter: &ThresholdFilter,
) -> sea_orm::Select<Entity> {
    if let Some(region) = &filter.region_eq {
        q = q.filter(Column::Region.eq(region.as_str()));
    }
    if let Some(metric) = &filter.metric_eq {
        q = q.filter(Column::Metric.eq(metric.as_str()));
    }
    if let Some(active) = filter.active_eq {
        q = q.filter(Column::Active.eq(active));
    }
    q
}

impl GeoStore {
    pub async fn insert_threshold(&self, row: &ThresholdRow) -> Result<ThresholdRow> {
        let now = Utc::now().fixed_offset();
        let am = monitoring_threshold::ActiveModel {
            id: Set(row.id.clone()),
            user_id: Set(row.user_id.clone()),
            region: Set(row.region.clone()),
            latitude: Set(row.latitude),
            longitude: Set(row.longitude),
            hazard_type: Set(row.hazard_type.clone()),
            metric: Set(row.metric.clone()),
            operator: Set(row.operator.clone()),
            threshold_value: Set(row.threshold_value),
            active: Set(row.active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = am.insert(self.db()).await?;
        Ok(to_row(model))
    }

    pub async fn get_threshold_by_id(&self, id: &str) -> Result<Option<ThresholdRow>> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        Ok(model.map(to_row))
    }

    pub async fn list_thresholds(
        &self,
        filter: &ThresholdFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ThresholdRow>> {
        let rows = apply_filter(Entity::find(), filter)
            .order_by(Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_thresholds(&self, filter: &ThresholdFilter) -> Result<u64> {
        Ok(apply_filter(Entity::find(), filter)
            .count(self.db())
            .await?)
    }

    /// All thresholds currently being evaluated, oldest first.
    pub async fn list_active_thresholds(&self) -> Result<Vec<ThresholdRow>> {
        let rows = Entity::find()
            .filter(Column::Active.eq(true))
            .order_by(Column::CreatedAt, Order::Asc)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    /// Thresholds are deactivated rather than deleted, so this is the only
    /// mutation the API exposes after creation.
    pub async fn set_threshold_active(
        &self,
        id: &str,
        active: bool,
    ) -> Result<Option<ThresholdRow>> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        if let Some(m) = model {
            let now = Utc::now().fixed_offset();
            let mut am: monitoring_threshold::ActiveModel = m.into();
            am.active = Set(active);
            am.updated_at = Set(now);
            let updated = am.update(self.db()).await?;
            Ok(Some(to_row(updated)))
        } else {
            Ok(None)
        }
    }
}
