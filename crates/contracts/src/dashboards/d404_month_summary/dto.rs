use serde::{Deserialize, Serialize};

/// Query for the month summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthSummaryRequest {
    #[serde(default)]
    pub at: Option<String>,
}

/// Month-to-date picture: plan, fact, forecast and last year's same days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummaryResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    pub day_of_month: u32,
    pub days_in_month: u32,

    // ========================================
    // Plan ("Планы")
    // ========================================
    pub plan_revenue: i64,
    pub plan_traffic: i64,
    /// plan_revenue / plan_traffic, 0 when either is missing
    pub plan_avg_check: i64,

    // ========================================
    // Fact, days 1..=today with revenue
    // ========================================
    pub fact_revenue: f64,
    pub fact_traffic: i64,
    pub avg_check: i64,
    pub days_reported: usize,
    pub avg_revenue_per_day: f64,
    /// avg_revenue_per_day × days_in_month
    pub forecast_revenue: i64,

    // ========================================
    // Same days of the same month last year
    // ========================================
    pub last_year_revenue: f64,
    pub diff_vs_last_year: i64,
    /// None when last year has no revenue for these days
    pub diff_vs_last_year_percent: Option<i64>,

    // ========================================
    // "Рекорды" and "Лидеры"
    // ========================================
    pub record_revenue: Option<f64>,
    pub record_traffic: Option<f64>,
    pub leaders: Vec<String>,
}
