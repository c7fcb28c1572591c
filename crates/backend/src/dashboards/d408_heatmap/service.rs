use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d408_heatmap::{HeatLevel, HeatmapDay, HeatmapResponse};

use crate::shared::clock::{days_in_month, month_key};
use crate::shared::format::is_weekend;

/// Bucket of `revenue` within `min..=max`.
///
/// A flat month (min == max) puts every day with revenue in the top bucket.
pub fn heat_level(revenue: f64, min: f64, max: f64) -> HeatLevel {
    if revenue <= 0.0 {
        return HeatLevel::Empty;
    }
    let normalized = if max > min {
        (revenue - min) / (max - min)
    } else {
        1.0
    };
    if normalized < 0.25 {
        HeatLevel::Low
    } else if normalized < 0.5 {
        HeatLevel::MediumLow
    } else if normalized < 0.75 {
        HeatLevel::Medium
    } else {
        HeatLevel::High
    }
}

/// Calendar of the month of `now`, each day coloured by the revenue of the
/// same day of that month one year earlier.
pub fn build_heatmap(records: &[DailyRecord], now: NaiveDateTime) -> HeatmapResponse {
    let today = now.date();
    let (year, month) = (today.year(), today.month());
    let basis_year = year - 1;

    let mut by_day: BTreeMap<u32, f64> = BTreeMap::new();
    for r in records {
        if r.date.year() == basis_year && r.date.month() == month && r.revenue > 0.0 {
            *by_day.entry(r.date.day()).or_insert(0.0) += r.revenue;
        }
    }

    let min_revenue = by_day.values().copied().fold(f64::INFINITY, f64::min);
    let max_revenue = by_day.values().copied().fold(0.0, f64::max);
    let has_data = !by_day.is_empty();
    let min_revenue = if has_data { min_revenue } else { 0.0 };

    if !has_data {
        tracing::info!(
            "Heatmap {}: нет данных за прошлый год",
            month_key(year, month)
        );
    }

    let month_days = days_in_month(year, month);
    let start_offset = NaiveDate::from_ymd_opt(year, month, 1)
        .map_or(0, |first| first.weekday().num_days_from_monday());

    let days = (1..=month_days)
        .map(|day| {
            let revenue = by_day.get(&day).copied().unwrap_or(0.0);
            let bar_percent = if max_revenue > 0.0 {
                revenue * 100.0 / max_revenue
            } else {
                0.0
            };
            HeatmapDay {
                day,
                revenue,
                level: heat_level(revenue, min_revenue, max_revenue),
                bar_percent,
                is_weekend: NaiveDate::from_ymd_opt(basis_year, month, day)
                    .is_some_and(|d| is_weekend(d.weekday())),
            }
        })
        .collect();

    HeatmapResponse {
        month: month_key(year, month),
        basis_month: month_key(basis_year, month),
        start_offset,
        days_in_month: month_days,
        min_revenue,
        max_revenue,
        has_data,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, revenue: f64) -> DailyRecord {
        DailyRecord::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), revenue, 0)
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_heat_levels() {
        assert_eq!(heat_level(0.0, 10.0, 50.0), HeatLevel::Empty);
        assert_eq!(heat_level(10.0, 10.0, 50.0), HeatLevel::Low);
        assert_eq!(heat_level(20.0, 10.0, 50.0), HeatLevel::MediumLow);
        assert_eq!(heat_level(30.0, 10.0, 50.0), HeatLevel::Medium);
        assert_eq!(heat_level(50.0, 10.0, 50.0), HeatLevel::High);
        assert_eq!(heat_level(7.0, 7.0, 7.0), HeatLevel::High);
    }

    #[test]
    fn test_heatmap_from_last_year() {
        let records = vec![
            day("2024-10-01", 10000.0),
            day("2024-10-05", 30000.0),
            day("2024-10-05", 20000.0),
            day("2024-10-10", 30000.0),
            // current year is not the basis
            day("2025-10-02", 99000.0),
        ];

        let heatmap = build_heatmap(&records, at("2025-10-15 12:00"));

        assert_eq!(heatmap.month, "2025-10");
        assert_eq!(heatmap.basis_month, "2024-10");
        // 2025-10-01 is a Wednesday
        assert_eq!(heatmap.start_offset, 2);
        assert_eq!(heatmap.days.len(), 31);
        assert!(heatmap.has_data);
        assert_eq!(heatmap.min_revenue, 10000.0);
        assert_eq!(heatmap.max_revenue, 50000.0);

        let first = &heatmap.days[0];
        assert_eq!(first.level, HeatLevel::Low);
        assert_eq!(first.bar_percent, 20.0);

        let fifth = &heatmap.days[4];
        assert_eq!(fifth.revenue, 50000.0);
        assert_eq!(fifth.level, HeatLevel::High);
        // 2024-10-05 was a Saturday
        assert!(fifth.is_weekend);

        assert_eq!(heatmap.days[9].level, HeatLevel::Medium);
        assert_eq!(heatmap.days[1].level, HeatLevel::Empty);
    }

    #[test]
    fn test_heatmap_without_data() {
        let heatmap = build_heatmap(&[], at("2025-02-01 09:00"));
        assert!(!heatmap.has_data);
        assert_eq!(heatmap.days.len(), 28);
        assert_eq!(heatmap.min_revenue, 0.0);
        assert!(heatmap.days.iter().all(|d| d.level == HeatLevel::Empty));
    }
}
