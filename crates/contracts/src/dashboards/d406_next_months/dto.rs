use serde::{Deserialize, Serialize};

/// Query for the next months forecast
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextMonthsRequest {
    #[serde(default)]
    pub at: Option<String>,
}

/// Expected average day of one upcoming month, taken from the same month a
/// year earlier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthForecast {
    /// Forecast month "YYYY-MM"
    pub month: String,
    /// "Янв"
    pub label: String,
    /// Month the numbers come from, "YYYY-MM"
    pub basis_month: String,
    /// Days of the basis month with revenue
    pub basis_days: usize,
    pub revenue: i64,
    pub traffic: i64,
    pub avg_check: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextMonthsResponse {
    pub months: Vec<MonthForecast>,
}
