use serde::{Deserialize, Serialize};

/// Query for the month heatmap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatmapRequest {
    #[serde(default)]
    pub at: Option<String>,
}

/// Revenue bucket of a day relative to the month's min..max
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatLevel {
    /// No revenue reported
    Empty,
    /// Below 25% of the range
    Low,
    /// 25%..50%
    MediumLow,
    /// 50%..75%
    Medium,
    /// 75% and above
    High,
}

/// One calendar cell of the current month, filled from last year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapDay {
    pub day: u32,
    /// Last year's revenue on this day of the month
    pub revenue: f64,
    pub level: HeatLevel,
    /// revenue / max_revenue × 100, for the daily bar chart
    pub bar_percent: f64,
    /// Weekend in the basis month
    pub is_weekend: bool,
}

/// Calendar of the current month coloured by last year's same-month revenue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapResponse {
    /// Current month "YYYY-MM"
    pub month: String,
    /// Month the revenue comes from, "YYYY-MM"
    pub basis_month: String,
    /// Empty cells before day 1, Monday = 0
    pub start_offset: u32,
    pub days_in_month: u32,
    pub min_revenue: f64,
    pub max_revenue: f64,
    pub has_data: bool,
    pub days: Vec<HeatmapDay>,
}
