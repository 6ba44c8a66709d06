//! One row per employee per day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub emp_code: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    pub name: String,
    pub check_in: Option<Time>,
    pub check_out: Option<Time>,
    pub work_hours: Option<f64>,
    pub status: String,
    pub time_category: Option<String>,
    pub total_punches: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
