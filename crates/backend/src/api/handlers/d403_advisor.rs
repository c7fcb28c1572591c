use axum::{extract::Query, Json};
use contracts::dashboards::d403_advisor::{AdvisorRequest, AdvisorResponse};

use super::error::DashboardError;
use crate::dashboards::d403_advisor::service;
use crate::shared::{clock, config, sheets};

/// GET /api/d403/advisor
pub async fn get_advisor(
    Query(request): Query<AdvisorRequest>,
) -> Result<Json<AdvisorResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(service::compute_advisor(
        &snapshot.records,
        &snapshot.costs,
        now,
        &config.advisor,
    )))
}
