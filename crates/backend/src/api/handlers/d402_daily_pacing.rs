use axum::{extract::Query, Json};
use contracts::dashboards::d402_daily_pacing::{DailyPacingRequest, DailyPacingResponse};

use super::error::DashboardError;
use crate::dashboards::d402_daily_pacing::{distribution, service};
use crate::shared::{clock, config, sheets};

/// GET /api/d402/daily_pacing
pub async fn get_daily_pacing(
    Query(request): Query<DailyPacingRequest>,
) -> Result<Json<DailyPacingResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    let response = service::build_daily_pacing(
        &snapshot,
        distribution::get_distribution(),
        &config.pacing,
        now,
    )?;

    Ok(Json(response))
}
