use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dashboards::d402_daily_pacing::engine::PacingError;
use crate::shared::sheets::SheetsError;

/// Тело ответа с ошибкой
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Ошибки обработчиков дашбордов
#[derive(Debug)]
pub enum DashboardError {
    /// Bad query parameters
    BadRequest(String),
    /// Sheets could not be fetched or parsed
    Sheets(SheetsError),
    /// Intraday table is incomplete
    Configuration(PacingError),
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Sheets(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            DashboardError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            DashboardError::Sheets(e) => {
                tracing::error!("Failed to load sheets: {}", e);
                ApiError::new("SHEETS_UNAVAILABLE", e.to_string())
            }
            DashboardError::Configuration(e) => {
                tracing::error!("Pacing configuration error: {}", e);
                ApiError::new("CONFIGURATION_ERROR", e.to_string())
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<SheetsError> for DashboardError {
    fn from(err: SheetsError) -> Self {
        DashboardError::Sheets(err)
    }
}

impl From<PacingError> for DashboardError {
    fn from(err: PacingError) -> Self {
        DashboardError::Configuration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DashboardError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DashboardError::from(SheetsError::NothingLoaded).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            DashboardError::from(PacingError::Configuration {
                weekday: Weekday::Mon
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = DashboardError::BadRequest("bad at".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
