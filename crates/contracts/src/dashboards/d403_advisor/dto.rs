use serde::{Deserialize, Serialize};

/// How a cost line of the "EBITDA" sheet is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    /// Fixed amount per day, "руб"
    Rubles,
    /// Percent of revenue, "%"
    Percent,
    /// Anything else; not counted
    Other,
}

impl CostKind {
    /// Classify the "Тип" column the way the sheet is filled in by hand.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("руб") {
            CostKind::Rubles
        } else if label.contains('%') {
            CostKind::Percent
        } else {
            CostKind::Other
        }
    }
}

/// One row of the cost structure sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub name: String,
    pub value: f64,
    pub kind: CostKind,
}

/// Which rule fired, first match wins in the order listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorVerdict {
    /// Average check below threshold
    LowAsp,
    /// Average daily revenue below threshold
    LowRevenue,
    /// Daily EBITDA below threshold
    LowEbitda,
    OnTrack,
    /// No day of the month has both revenue and receipts
    NoData,
}

/// Query for the advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorRequest {
    #[serde(default)]
    pub at: Option<String>,
}

/// Response for the advisor block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    pub verdict: AdvisorVerdict,
    /// Average check, rubles
    pub asp: i64,
    pub avg_revenue: f64,
    pub total_costs: f64,
    pub ebitda: f64,
    /// Days of the month that fed the averages
    pub valid_days: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_kind_from_label() {
        assert_eq!(CostKind::from_label("Руб/день"), CostKind::Rubles);
        assert_eq!(CostKind::from_label("руб"), CostKind::Rubles);
        assert_eq!(CostKind::from_label("% от ТО"), CostKind::Percent);
        assert_eq!(CostKind::from_label(""), CostKind::Other);
    }
}
