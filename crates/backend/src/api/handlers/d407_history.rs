use axum::Json;
use contracts::dashboards::d407_history::HistoryResponse;

use super::error::DashboardError;
use crate::dashboards::d407_history::service;
use crate::shared::sheets;

/// GET /api/d407/history
pub async fn get_history() -> Result<Json<HistoryResponse>, DashboardError> {
    let snapshot = sheets::get_sheets().snapshot().await?;
    let response = service::build_history(&snapshot.records);
    tracing::info!("D407 History: {} years", response.years.len());
    Ok(Json(response))
}
