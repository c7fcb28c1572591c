use serde::{Deserialize, Serialize};

/// Query for the purchase recommendation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub at: Option<String>,
}

/// How much stock to buy, from the last reported days of the month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    /// Dates ("YYYY-MM-DD") the average was taken over, oldest first
    pub basis_days: Vec<String>,
    pub avg_revenue: f64,
    /// Rubles to spend on the next purchase
    pub recommended: i64,
    /// Acceptable deviation either way, rubles
    pub tolerance: i64,
}
