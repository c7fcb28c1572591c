use axum::{extract::Query, Json};
use contracts::dashboards::d405_purchase::{PurchaseRequest, PurchaseResponse};

use super::error::DashboardError;
use crate::dashboards::d405_purchase::service;
use crate::shared::{clock, config, sheets};

/// GET /api/d405/purchase
pub async fn get_purchase(
    Query(request): Query<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, DashboardError> {
    let config = config::get_config();
    let now = clock::resolve_moment(request.at.as_deref(), &config.shop)
        .map_err(DashboardError::BadRequest)?;

    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(service::compute_purchase(
        &snapshot.records,
        now,
        &config.purchase,
    )))
}
