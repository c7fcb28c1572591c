use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // DASHBOARDS
        // ========================================
        // D402 Daily Pacing ("oracle")
        .route(
            "/api/d402/daily_pacing",
            get(handlers::d402_daily_pacing::get_daily_pacing),
        )
        // D403 Advisor
        .route(
            "/api/d403/advisor",
            get(handlers::d403_advisor::get_advisor),
        )
        // D404 Month Summary
        .route(
            "/api/d404/month_summary",
            get(handlers::d404_month_summary::get_month_summary),
        )
        // D405 Purchase
        .route(
            "/api/d405/purchase",
            get(handlers::d405_purchase::get_purchase),
        )
        // D406 Next Months
        .route(
            "/api/d406/next_months",
            get(handlers::d406_next_months::get_next_months),
        )
        // D407 History
        .route("/api/d407/history", get(handlers::d407_history::get_history))
        // D408 Heatmap
        .route("/api/d408/heatmap", get(handlers::d408_heatmap::get_heatmap))
        // D409 Year Comparison
        .route(
            "/api/d409/year_comparison",
            get(handlers::d409_year_comparison::get_year_comparison),
        )
        // ========================================
        // UTILITIES
        // ========================================
        .route("/api/sheets/status", get(handlers::sheets::status))
        .route("/api/sheets/refresh", post(handlers::sheets::refresh))
}
