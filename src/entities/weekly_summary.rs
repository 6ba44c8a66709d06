//! One row per week.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_summary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub week_start: Date,
    pub week_end: Date,
    pub total_employees: i32,
    pub perfect_attendance_count: i32,
    /// Percentage, 0-100.
    pub perfect_attendance_rate: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
