use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d407_history::{DayHistory, HistoryResponse, MonthHistory, YearHistory};

use crate::shared::format::{is_weekend, month_ru, weekday_ru_short};

/// Year → month → day totals of every reported day.
///
/// Days without revenue are left out. Rows sharing a date are summed.
pub fn build_history(records: &[DailyRecord]) -> HistoryResponse {
    let mut totals: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
    for r in records.iter().filter(|r| r.revenue > 0.0) {
        let entry = totals.entry(r.date).or_insert((0.0, 0));
        entry.0 += r.revenue;
        entry.1 = entry.1.saturating_add(r.traffic.max(0));
    }

    let mut years: BTreeMap<i32, BTreeMap<u32, Vec<DayHistory>>> = BTreeMap::new();
    for (date, (revenue, traffic)) in totals {
        years
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_default()
            .push(DayHistory {
                day: date.day(),
                date: date.format("%Y-%m-%d").to_string(),
                weekday: weekday_ru_short(date.weekday()).to_string(),
                is_weekend: is_weekend(date.weekday()),
                revenue,
                traffic,
            });
    }

    let years = years
        .into_iter()
        .rev()
        .map(|(year, months)| {
            let months: Vec<MonthHistory> = months
                .into_iter()
                .map(|(month, days)| month_history(month, days))
                .collect();
            YearHistory {
                year,
                revenue: months.iter().map(|m| m.revenue).sum(),
                traffic: months.iter().map(|m| m.traffic).fold(0, i64::saturating_add),
                months,
            }
        })
        .collect();

    HistoryResponse { years }
}

fn month_history(month: u32, mut days: Vec<DayHistory>) -> MonthHistory {
    let revenue: f64 = days.iter().map(|d| d.revenue).sum();
    let traffic = days.iter().map(|d| d.traffic).fold(0, i64::saturating_add);
    let count = days.len() as f64;
    days.reverse();

    MonthHistory {
        month,
        name: month_ru(month).to_string(),
        revenue,
        traffic,
        day_count: days.len(),
        avg_revenue: (revenue / count).round() as i64,
        avg_traffic: (traffic as f64 / count).round() as i64,
        days,
    }
}
