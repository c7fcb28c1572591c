use axum::{extract::Query, Json};
use contracts::dashboards::d409_year_comparison::{YearComparisonRequest, YearComparisonResponse};

use super::error::DashboardError;
use crate::dashboards::d409_year_comparison::service;
use crate::shared::{clock, config, sheets};

/// GET /api/d409/year_comparison
pub async fn get_year_comparison(
    Query(request): Query<YearComparisonRequest>,
) -> Result<Json<YearComparisonResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(service::compute_year_comparison(&snapshot.records, now)))
}
