//! Daily and weekly summary queries.

use crate::entities::{daily_summary, prelude::*, weekly_summary};
use crate::models::{DailySummary, DateRange, WeeklySummary};
use sea_orm::*;

/// Daily summaries within a date range, newest first.
pub async fn daily_summaries(
    db: &DatabaseConnection,
    range: DateRange,
    limit: u64,
) -> Result<Vec<DailySummary>, DbErr> {
    DailySummaries::find()
        .filter(daily_summary::Column::Date.between(range.start, range.end))
        .order_by_desc(daily_summary::Column::Date)
        .limit(limit)
        .all(db)
        .await
}

/// Most recent weekly summaries, optionally restricted to weeks starting in a range.
pub async fn weekly_summaries(
    db: &DatabaseConnection,
    range: Option<DateRange>,
    limit: u64,
) -> Result<Vec<WeeklySummary>, DbErr> {
    let mut query = WeeklySummaries::find();

    if let Some(range) = range {
        query = query.filter(weekly_summary::Column::WeekStart.between(range.start, range.end));
    }

    query
        .order_by_desc(weekly_summary::Column::WeekStart)
        .limit(limit)
        .all(db)
        .await
}
