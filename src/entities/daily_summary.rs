//! One row per calendar day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_summary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    pub total_employees_present: i32,
    pub early_count: i32,
    pub ontime_count: i32,
    pub acceptable_count: i32,
    pub late_count: i32,
    /// Percentage, 0-100.
    pub ontime_rate: f64,
    pub earliest_checkin: Option<Time>,
    pub latest_checkin: Option<Time>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
