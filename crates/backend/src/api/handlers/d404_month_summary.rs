use axum::{extract::Query, Json};
use contracts::dashboards::d404_month_summary::{MonthSummaryRequest, MonthSummaryResponse};

use super::error::DashboardError;
use crate::dashboards::d404_month_summary::service;
use crate::shared::{clock, config, sheets};

/// GET /api/d404/month_summary
pub async fn get_month_summary(
    Query(request): Query<MonthSummaryRequest>,
) -> Result<Json<MonthSummaryResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(service::compute_month_summary(&snapshot, now)))
}
