use serde::{Deserialize, Serialize};

/// Query for the year comparison chart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearComparisonRequest {
    #[serde(default)]
    pub at: Option<String>,
}

/// Average daily revenue per calendar month of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub year: i32,
    /// Twelve values, January first; 0 for months without data
    pub monthly_avg_revenue: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearComparisonResponse {
    /// "Янв".."Дек"
    pub labels: Vec<String>,
    /// Current year first, then the two before it
    pub series: Vec<YearSeries>,
}
