use axum::{extract::Query, Json};
use contracts::dashboards::d406_next_months::{NextMonthsRequest, NextMonthsResponse};

use super::error::DashboardError;
use crate::dashboards::d406_next_months::service;
use crate::shared::{clock, config, sheets};

/// GET /api/d406/next_months
pub async fn get_next_months(
    Query(request): Query<NextMonthsRequest>,
) -> Result<Json<NextMonthsResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(service::compute_next_months(&snapshot.records, now)))
}
