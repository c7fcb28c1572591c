use chrono::{Datelike, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d406_next_months::{MonthForecast, NextMonthsResponse};

use crate::shared::clock::{add_months, month_key};
use crate::shared::format::month_ru_short;

const MONTHS_AHEAD: u32 = 3;

/// Average reported day of `year`/`month`, rounded
fn average_day(records: &[DailyRecord], year: i32, month: u32) -> (usize, i64, i64) {
    let (days, revenue, traffic) = records
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month && r.revenue > 0.0)
        .fold((0usize, 0.0, 0.0), |(days, revenue, traffic), r| {
            (days + 1, revenue + r.revenue, traffic + r.traffic.max(0) as f64)
        });
    if days == 0 {
        return (0, 0, 0);
    }
    let n = days as f64;
    (days, (revenue / n).round() as i64, (traffic / n).round() as i64)
}

/// Forecast for each of the next three months: the average day of the same
/// month one year earlier.
pub fn compute_next_months(records: &[DailyRecord], now: NaiveDateTime) -> NextMonthsResponse {
    let today = now.date();

    let months = (1..=MONTHS_AHEAD)
        .map(|offset| {
            let (year, month) = add_months(today.year(), today.month(), offset);
            let (basis_days, revenue, traffic) = average_day(records, year - 1, month);
            let avg_check = if traffic > 0 {
                (revenue as f64 / traffic as f64).round() as i64
            } else {
                0
            };

            MonthForecast {
                month: month_key(year, month),
                label: month_ru_short(month).to_string(),
                basis_month: month_key(year - 1, month),
                basis_days,
                revenue,
                traffic,
                avg_check,
            }
        })
        .collect();

    NextMonthsResponse { months }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(date: &str, revenue: f64, traffic: i64) -> DailyRecord {
        DailyRecord::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), revenue, traffic)
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_next_months_from_last_year() {
        let records = vec![
            day("2024-11-01", 20000.0, 80),
            day("2024-11-02", 30000.0, 120),
            day("2024-11-03", 0.0, 0),
            day("2024-12-31", 45000.0, 150),
            // this year's November is not the basis
            day("2025-11-01", 99999.0, 1),
        ];

        let response = compute_next_months(&records, at("2025-10-15 12:00"));
        let months = &response.months;

        assert_eq!(months.len(), 3);
        assert_eq!(months[0].month, "2025-11");
        assert_eq!(months[0].label, "Ноя");
        assert_eq!(months[0].basis_month, "2024-11");
        assert_eq!(months[0].basis_days, 2);
        assert_eq!(months[0].revenue, 25000);
        assert_eq!(months[0].traffic, 100);
        assert_eq!(months[0].avg_check, 250);

        assert_eq!(months[1].revenue, 45000);
        assert_eq!(months[1].avg_check, 300);

        assert_eq!(months[2].month, "2026-01");
        assert_eq!(months[2].basis_month, "2025-01");
        assert_eq!(months[2].revenue, 0);
        assert_eq!(months[2].avg_check, 0);
    }
}
