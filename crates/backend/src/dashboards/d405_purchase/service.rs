use chrono::{Datelike, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d405_purchase::PurchaseResponse;

use crate::shared::clock::month_key;
use crate::shared::config::PurchaseConfig;
use crate::shared::format::format_rub;

/// Recommended purchase amount for the month of `now`.
///
/// Takes the latest `window_days` days of the month up to today with revenue,
/// averages them and scales by `days_covered × cost_share`.
pub fn compute_purchase(
    records: &[DailyRecord],
    now: NaiveDateTime,
    config: &PurchaseConfig,
) -> PurchaseResponse {
    let today = now.date();
    let period = month_key(today.year(), today.month());

    let mut month: Vec<&DailyRecord> = records
        .iter()
        .filter(|r| r.date.year() == today.year() && r.date.month() == today.month())
        .filter(|r| r.date <= today && r.revenue > 0.0)
        .collect();
    month.sort_by_key(|r| r.date);

    let basis = &month[month.len().saturating_sub(config.window_days)..];
    let avg_revenue = if basis.is_empty() {
        0.0
    } else {
        basis.iter().map(|r| r.revenue).sum::<f64>() / basis.len() as f64
    };
    let recommended = (avg_revenue * config.days_covered * config.cost_share).round() as i64;

    tracing::info!(
        "Purchase {}: рекомендуемая закупка {} (среднее за {} дн.)",
        period,
        format_rub(recommended),
        basis.len()
    );

    PurchaseResponse {
        period,
        basis_days: basis
            .iter()
            .map(|r| r.date.format("%Y-%m-%d").to_string())
            .collect(),
        avg_revenue,
        recommended,
        tolerance: config.tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(date: &str, revenue: f64) -> DailyRecord {
        DailyRecord::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), revenue, 0)
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_last_three_reported_days() {
        let records = vec![
            day("2025-10-05", 40000.0),
            day("2025-10-01", 10000.0),
            day("2025-10-02", 20000.0),
            day("2025-10-03", 0.0),
            day("2025-10-04", 30000.0),
            // future and other months are ignored
            day("2025-10-09", 99000.0),
            day("2025-09-30", 99000.0),
        ];

        let response = compute_purchase(&records, at("2025-10-05 18:00"), &PurchaseConfig::default());

        assert_eq!(response.basis_days, vec!["2025-10-02", "2025-10-04", "2025-10-05"]);
        assert_eq!(response.avg_revenue, 30000.0);
        // 30000 × 4 × 0.45
        assert_eq!(response.recommended, 54000);
        assert_eq!(response.tolerance, 5000);
    }

    #[test]
    fn test_fewer_days_than_window() {
        let records = vec![day("2025-10-01", 25000.0)];
        let response = compute_purchase(&records, at("2025-10-01 10:00"), &PurchaseConfig::default());
        assert_eq!(response.recommended, 45000);
    }

    #[test]
    fn test_no_days_means_zero() {
        let response = compute_purchase(&[], at("2025-10-01 10:00"), &PurchaseConfig::default());
        assert!(response.basis_days.is_empty());
        assert_eq!(response.recommended, 0);
    }
}
