use serde::{Deserialize, Serialize};

/// One reported day; duplicate rows of a date are summed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHistory {
    pub day: u32,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "пн"
    pub weekday: String,
    pub is_weekend: bool,
    pub revenue: f64,
    pub traffic: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthHistory {
    pub month: u32,
    /// "Октябрь"
    pub name: String,
    pub revenue: f64,
    pub traffic: i64,
    pub day_count: usize,
    /// Average reported day
    pub avg_revenue: i64,
    pub avg_traffic: i64,
    /// Latest day first
    pub days: Vec<DayHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearHistory {
    pub year: i32,
    pub revenue: f64,
    pub traffic: i64,
    /// January first
    pub months: Vec<MonthHistory>,
}

/// Years → months → days, latest year first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub years: Vec<YearHistory>,
}
