use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hazard_alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    pub ai_generated_at: Option<DateTimeWithTimeZone>,
    pub resolved: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
