use axum::Json;
use serde::Serialize;

use super::error::DashboardError;
use crate::shared::sheets;

/// Сводка по загруженным листам
#[derive(Debug, Serialize)]
pub struct SheetsStatus {
    pub loaded_at: String,
    pub records: usize,
    pub plans: usize,
    pub costs: usize,
    pub shop_records: usize,
    pub leaders: usize,
    pub failed_sheets: Vec<&'static str>,
    pub malformed_values: usize,
    pub skipped_rows: usize,
}

impl From<&sheets::SheetsSnapshot> for SheetsStatus {
    fn from(snapshot: &sheets::SheetsSnapshot) -> Self {
        Self {
            loaded_at: snapshot.loaded_at.to_rfc3339(),
            records: snapshot.records.len(),
            plans: snapshot.plans.len(),
            costs: snapshot.costs.len(),
            shop_records: snapshot.shop_records.len(),
            leaders: snapshot.leaders.len(),
            failed_sheets: snapshot.failed_sheets.iter().map(|s| s.label()).collect(),
            malformed_values: snapshot.quality.malformed_values,
            skipped_rows: snapshot.quality.skipped_rows,
        }
    }
}

/// GET /api/sheets/status
pub async fn status() -> Result<Json<SheetsStatus>, DashboardError> {
    let snapshot = sheets::get_sheets().snapshot().await?;
    Ok(Json(SheetsStatus::from(snapshot.as_ref())))
}

/// POST /api/sheets/refresh
pub async fn refresh() -> Result<Json<SheetsStatus>, DashboardError> {
    let snapshot = sheets::get_sheets().refresh().await?;
    tracing::info!("Sheets reloaded on request");
    Ok(Json(SheetsStatus::from(snapshot.as_ref())))
}
