use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_initial_schema"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

const UP_SQL: &str = "
PRAGMA journal_mode=WAL;

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    token_version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS monitoring_thresholds (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    region TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    hazard_type TEXT NOT NULL,
    metric TEXT NOT NULL,
    operator TEXT NOT NULL,
    threshold_value REAL NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_thresholds_region ON monitoring_thresholds(region);
CREATE INDEX IF NOT EXISTS idx_thresholds_active ON monitoring_thresholds(active);

CREATE TABLE IF NOT EXISTS weather_observations (
    id TEXT PRIMARY KEY NOT NULL,
    region TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    observed_at TEXT NOT NULL,
    temperature_c REAL,
    rainfall_mm REAL,
    soil_moisture REAL,
    wind_speed_kmh REAL,
    humidity_percent REAL,
    data_source TEXT NOT NULL,
    raw_payload TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_observations_region_observed_at
    ON weather_observations(region, observed_at DESC);

CREATE TABLE IF NOT EXISTS hazard_alerts (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    threshold_id TEXT NOT NULL,
    region TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    hazard_type TEXT NOT NULL,
    severity TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    metric TEXT NOT NULL,
    observed_value REAL NOT NULL,
    threshold_value REAL NOT NULL,
    ai_assessment TEXT,
    ai_model TEXT,
    ai_generated_at TEXT,
    resolved INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_alerts_threshold_id ON hazard_alerts(threshold_id);
CREATE INDEX IF NOT EXISTS idx_alerts_region ON hazard_alerts(region);
CREATE INDEX IF NOT EXISTS idx_alerts_created_at ON hazard_alerts(created_at DESC);

-- At most one unresolved alert per threshold. The evaluator checks before
-- inserting; this index closes the check-then-act window under overlapping
-- evaluation runs.
CREATE UNIQUE INDEX IF NOT EXISTS idx_alerts_unresolved_threshold
    ON hazard_alerts(threshold_id) WHERE resolved = 0;
";

const DOWN_SQL: &str = "
DROP TABLE IF EXISTS hazard_alerts;
DROP TABLE IF EXISTS weather_observations;
DROP TABLE IF EXISTS monitoring_thresholds;
DROP TABLE IF EXISTS users;
";
