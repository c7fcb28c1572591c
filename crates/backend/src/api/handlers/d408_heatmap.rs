use axum::{extract::Query, Json};
use contracts::dashboards::d408_heatmap::{HeatmapRequest, HeatmapResponse};

use super::error::DashboardError;
use crate::dashboards::d408_heatmap::service;
use crate::shared::{clock, config, sheets};

/// GET /api/d408/heatmap
pub async fn get_heatmap(
    Query(request): Query<HeatmapRequest>,
) -> Result<Json<HeatmapResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(service::build_heatmap(&snapshot.records, now)))
}
