use chrono::{Datelike, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d403_advisor::{AdvisorResponse, AdvisorVerdict, CostItem, CostKind};

use crate::shared::config::AdvisorConfig;
use crate::shared::format::format_rub;

/// Daily cost total: fixed rubles plus percentages of `avg_revenue`
pub fn total_daily_costs(costs: &[CostItem], avg_revenue: f64) -> f64 {
    costs
        .iter()
        .map(|c| match c.kind {
            CostKind::Rubles => c.value,
            CostKind::Percent => avg_revenue * c.value / 100.0,
            CostKind::Other => 0.0,
        })
        .sum()
}

/// First failing rule wins: average check, revenue, EBITDA.
pub fn select_verdict(asp: i64, avg_revenue: f64, ebitda: f64, thresholds: &AdvisorConfig) -> AdvisorVerdict {
    if (asp as f64) < thresholds.asp_min {
        AdvisorVerdict::LowAsp
    } else if avg_revenue < thresholds.revenue_min {
        AdvisorVerdict::LowRevenue
    } else if ebitda < thresholds.ebitda_min {
        AdvisorVerdict::LowEbitda
    } else {
        AdvisorVerdict::OnTrack
    }
}

/// Month-to-date advisor metrics and verdict.
///
/// Uses days of the current month (today included) with both revenue and
/// receipts filled in.
pub fn compute_advisor(
    records: &[DailyRecord],
    costs: &[CostItem],
    now: NaiveDateTime,
    thresholds: &AdvisorConfig,
) -> AdvisorResponse {
    let today = now.date();
    let period = format!("{:04}-{:02}", today.year(), today.month());

    let valid: Vec<&DailyRecord> = records
        .iter()
        .filter(|r| r.date.year() == today.year() && r.date.month() == today.month())
        .filter(|r| r.revenue > 0.0 && r.receipts > 0.0)
        .collect();

    if valid.is_empty() {
        tracing::warn!("Advisor {}: нет валидных данных для анализа", period);
        return AdvisorResponse {
            period,
            verdict: AdvisorVerdict::NoData,
            asp: 0,
            avg_revenue: 0.0,
            total_costs: 0.0,
            ebitda: 0.0,
            valid_days: 0,
        };
    }

    let days = valid.len() as f64;
    let avg_revenue = valid.iter().map(|r| r.revenue).sum::<f64>() / days;
    let avg_receipts = valid.iter().map(|r| r.receipts).sum::<f64>() / days;
    let asp = if avg_receipts > 0.0 {
        (avg_revenue / avg_receipts).round() as i64
    } else {
        0
    };

    let total_costs = total_daily_costs(costs, avg_revenue);
    let ebitda = avg_revenue - total_costs;
    let verdict = select_verdict(asp, avg_revenue, ebitda, thresholds);

    tracing::info!(
        "Advisor {}: ASP {}, выручка {}, EBITDA {}, дней: {}, вердикт {:?}",
        period,
        format_rub(asp),
        format_rub(avg_revenue.round() as i64),
        format_rub(ebitda.round() as i64),
        valid.len(),
        verdict
    );

    AdvisorResponse {
        period,
        verdict,
        asp,
        avg_revenue,
        total_costs,
        ebitda,
        valid_days: valid.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::default_config;
    use chrono::NaiveDate;

    fn thresholds() -> AdvisorConfig {
        default_config().unwrap().advisor
    }

    fn day(date: &str, revenue: f64, receipts: f64) -> DailyRecord {
        let mut record =
            DailyRecord::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), revenue, 0);
        record.receipts = receipts;
        record
    }

    fn cost(value: f64, kind: CostKind) -> CostItem {
        CostItem {
            name: String::new(),
            value,
            kind,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-10-15 12:00", "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_total_daily_costs() {
        let costs = vec![
            cost(5000.0, CostKind::Rubles),
            cost(10.0, CostKind::Percent),
            cost(999.0, CostKind::Other),
        ];
        assert_eq!(total_daily_costs(&costs, 30000.0), 8000.0);
    }

    #[test]
    fn test_verdict_order() {
        let t = thresholds();
        assert_eq!(select_verdict(200, 10000.0, -5000.0, &t), AdvisorVerdict::LowAsp);
        assert_eq!(select_verdict(300, 10000.0, -5000.0, &t), AdvisorVerdict::LowRevenue);
        assert_eq!(select_verdict(300, 30000.0, 1999.0, &t), AdvisorVerdict::LowEbitda);
        assert_eq!(select_verdict(300, 30000.0, 2000.0, &t), AdvisorVerdict::OnTrack);
    }

    #[test]
    fn test_compute_advisor_on_track() {
        let records = vec![
            day("2025-10-01", 30000.0, 100.0),
            day("2025-10-02", 34000.0, 100.0),
            // no receipts: ignored
            day("2025-10-03", 90000.0, 0.0),
            // previous month: ignored
            day("2025-09-30", 1000.0, 10.0),
        ];
        let costs = vec![cost(20000.0, CostKind::Rubles), cost(10.0, CostKind::Percent)];

        let response = compute_advisor(&records, &costs, now(), &thresholds());
        assert_eq!(response.period, "2025-10");
        assert_eq!(response.valid_days, 2);
        assert_eq!(response.avg_revenue, 32000.0);
        assert_eq!(response.asp, 320);
        assert_eq!(response.total_costs, 23200.0);
        assert_eq!(response.ebitda, 8800.0);
        assert_eq!(response.verdict, AdvisorVerdict::OnTrack);
    }

    #[test]
    fn test_compute_advisor_low_asp() {
        let records = vec![day("2025-10-01", 30000.0, 150.0)];
        let response = compute_advisor(&records, &[], now(), &thresholds());
        assert_eq!(response.asp, 200);
        assert_eq!(response.verdict, AdvisorVerdict::LowAsp);
    }

    #[test]
    fn test_compute_advisor_without_data() {
        let records = vec![day("2025-10-01", 30000.0, 0.0)];
        let response = compute_advisor(&records, &[], now(), &thresholds());
        assert_eq!(response.verdict, AdvisorVerdict::NoData);
        assert_eq!(response.valid_days, 0);
    }
}
