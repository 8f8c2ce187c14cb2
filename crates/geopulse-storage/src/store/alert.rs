use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::entities::hazard_alert::{self, Column, Entity};
use crate::store::GeoStore;

/// AI-generated risk note embedded on an alert row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAssessment {
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// Hazard alert row (from the `hazard_alerts` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRow {
    pub id: String,
    pub user_id: String,
    pub threshold_id: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hazard_type: String,
    pub severity: String,
    pub title: String,
    pub description: String,
    pub metric: String,
    pub observed_value: f64,
    pub threshold_value: f64,
    pub ai_assessment: Option<String>,
    pub ai_model: Option<String>,
    pub ai_generated_at: Option<DateTime<Utc>>,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertRow {
    /// The embedded assessment, when enrichment produced one.
    pub fn assessment(&self) -> Option<AiAssessment> {
        let text = self.ai_assessment.clone()?;
        Some(AiAssessment {
            text,
            model: self.ai_model.clone().unwrap_or_default(),
            generated_at: self.ai_generated_at.unwrap_or(self.created_at),
        })
    }
}

/// Alert list filter.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub resolved_eq: Option<bool>,
    pub severity_eq: Option<String>,
    pub region_eq: Option<String>,
    pub threshold_id_eq: Option<String>,
}

fn to_row(m: hazard_alert::Model) -> AlertRow {
    AlertRow {
        id: m.id,
        user_id: m.user_id,
        threshold_id: m.threshold_id,
        region: m.region,
        latitude: m.latitude,
        longitude: m.longitude,
        hazard_type: m.hazard_type,
        severity: m.severity,
        title: m.title,
        description: m.description,
        metric: m.metric,
        observed_value: m.observed_value,
        threshold_value: m.threshold_value,
        ai_assessment: m.ai_assessment,
        ai_model: m.ai_model,
        ai_generated_at: m.ai_generated_at.map(|t| t.with_timezone(&Utc)),
        resolved: m.resolved,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn apply_filter(mut q: sea_orm::Select<Entity>, filter: &AlertFilter) -> sea_orm::Select<Entity> {
    if let Some(resolved) = filter.resolved_eq {
        q = q.filter(Column::Resolved.eq(resolved));
    }
    if let Some(severity) = &filter.severity_eq {
        q = q.filter(Column::Severity.eq(severity.as_str()));
    }
    if let Some(region) = &filter.region_eq {
        q = q.filter(Column::Region.eq(region.as_str()));
    }
    if let Some(threshold_id) = &filter.threshold_id_eq {
        q = q.filter(Column::ThresholdId.eq(threshold_id.as_str()));
    }
    q
}

impl GeoStore {
    /// Insert a new alert.
    ///
    /// The `hazard_alerts` table carries a partial unique index on
    /// `(threshold_id) WHERE resolved = 0`; inserting a second unresolved
    /// alert for the same threshold fails with a UNIQUE constraint error,
    /// which the evaluator treats as a concurrent-duplicate skip.
    pub async fn insert_alert(&self, row: &AlertRow) -> Result<AlertRow> {
        let now = Utc::now().fixed_offset();
        let am = hazard_alert::ActiveModel {
            id: Set(row.id.clone()),
            user_id: Set(row.user_id.clone()),
            threshold_id: Set(row.threshold_id.clone()),
            region: Set(row.region.clone()),
            latitude: Set(row.latitude),
            longitude: Set(row.longitude),
            hazard_type: Set(row.hazard_type.clone()),
            severity: Set(row.severity.clone()),
            title: Set(row.title.clone()),
            description: Set(row.description.clone()),
            metric: Set(row.metric.clone()),
            observed_value: Set(row.observed_value),
            threshold_value: Set(row.threshold_value),
            ai_assessment: Set(row.ai_assessment.clone()),
            ai_model: Set(row.ai_model.clone()),
            ai_generated_at: Set(row.ai_generated_at.map(|t| t.fixed_offset())),
            resolved: Set(row.resolved),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = am.insert(self.db()).await?;
        Ok(to_row(model))
    }

    pub async fn get_alert_by_id(&self, id: &str) -> Result<Option<AlertRow>> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        Ok(model.map(to_row))
    }

    /// The unresolved alert for a threshold, if one exists.
    pub async fn find_unresolved_alert_for_threshold(
        &self,
        threshold_id: &str,
    ) -> Result<Option<AlertRow>> {
        let model = Entity::find()
            .filter(Column::ThresholdId.eq(threshold_id))
            .filter(Column::Resolved.eq(false))
            .one(self.db())
            .await?;
        Ok(model.map(to_row))
    }

    pub async fn list_alerts(
        &self,
        filter: &AlertFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AlertRow>> {
        let rows = apply_filter(Entity::find(), filter)
            .order_by(Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_row).collect())
    }

    pub async fn count_alerts(&self, filter: &AlertFilter) -> Result<u64> {
        Ok(apply_filter(Entity::find(), filter)
            .count(self.db())
            .await?)
    }

    /// Mark an alert resolved. Returns false when the alert does not exist.
    pub async fn resolve_alert(&self, id: &str) -> Result<bool> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        if let Some(m) = model {
            let now = Utc::now().fixed_offset();
            let mut am: hazard_alert::ActiveModel = m.into();
            am.resolved = Set(true);
            am.updated_at = Set(now);
            am.update(self.db()).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
