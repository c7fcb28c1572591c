use chrono::{Datelike, NaiveDate, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d404_month_summary::MonthSummaryResponse;

use crate::shared::clock::{days_in_month, month_key};
use crate::shared::format::format_rub;
use crate::shared::sheets::{ShopRecord, SheetsSnapshot};

/// How many names of the "Лидеры" sheet are shown
const LEADERS_SHOWN: usize = 7;

/// Revenue and traffic over days 1..=`last_day` of a month, reported days only
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct MonthToDate {
    revenue: f64,
    traffic: i64,
    days: usize,
}

fn month_to_date(records: &[DailyRecord], year: i32, month: u32, last_day: u32) -> MonthToDate {
    records
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month && r.date.day() <= last_day)
        .filter(|r| r.revenue > 0.0)
        .fold(MonthToDate::default(), |acc, r| MonthToDate {
            revenue: acc.revenue + r.revenue,
            traffic: acc.traffic.saturating_add(r.traffic.max(0)),
            days: acc.days + 1,
        })
}

fn ratio(numerator: f64, denominator: f64) -> i64 {
    if denominator > 0.0 {
        (numerator / denominator).round() as i64
    } else {
        0
    }
}

/// First record whose indicator mentions `keyword`, case-insensitive
fn find_record(records: &[ShopRecord], keyword: &str) -> Option<f64> {
    records
        .iter()
        .find(|r| r.indicator.to_lowercase().contains(keyword))
        .map(|r| r.value)
}

/// Same day number one year back; Feb 29 maps to Feb 28
fn year_ago(today: NaiveDate) -> (i32, u32, u32) {
    let year = today.year() - 1;
    let last_day = today.day().min(days_in_month(year, today.month()));
    (year, today.month(), last_day)
}

/// Month-to-date summary for the month of `now`.
pub fn compute_month_summary(snapshot: &SheetsSnapshot, now: NaiveDateTime) -> MonthSummaryResponse {
    let today = now.date();
    let period = month_key(today.year(), today.month());
    let month_days = days_in_month(today.year(), today.month());

    let plan = snapshot.plans.iter().find(|p| p.month == period);
    let plan_revenue = plan.map_or(0, |p| p.revenue_per_day);
    let plan_traffic = plan.map_or(0, |p| p.traffic_per_day);

    let fact = month_to_date(&snapshot.records, today.year(), today.month(), today.day());
    let avg_revenue_per_day = if fact.days > 0 {
        fact.revenue / fact.days as f64
    } else {
        0.0
    };
    let forecast_revenue = (avg_revenue_per_day * month_days as f64).round() as i64;

    let (ly_year, ly_month, ly_day) = year_ago(today);
    let last_year = month_to_date(&snapshot.records, ly_year, ly_month, ly_day);
    let diff = fact.revenue - last_year.revenue;
    let diff_vs_last_year_percent = if last_year.revenue > 0.0 {
        Some((diff / last_year.revenue * 100.0).round() as i64)
    } else {
        None
    };

    tracing::info!(
        "Month summary {}: факт {} за {} дн., прогноз {}, к прошлому году {}",
        period,
        format_rub(fact.revenue.round() as i64),
        fact.days,
        format_rub(forecast_revenue),
        format_rub(diff.round() as i64)
    );

    MonthSummaryResponse {
        period,
        day_of_month: today.day(),
        days_in_month: month_days,
        plan_revenue,
        plan_traffic,
        plan_avg_check: ratio(plan_revenue as f64, plan_traffic as f64),
        fact_revenue: fact.revenue,
        fact_traffic: fact.traffic,
        avg_check: ratio(fact.revenue, fact.traffic as f64),
        days_reported: fact.days,
        avg_revenue_per_day,
        forecast_revenue,
        last_year_revenue: last_year.revenue,
        diff_vs_last_year: diff.round() as i64,
        diff_vs_last_year_percent,
        record_revenue: find_record(&snapshot.shop_records, "выручка"),
        record_traffic: find_record(&snapshot.shop_records, "трафик"),
        leaders: snapshot.leaders.iter().take(LEADERS_SHOWN).cloned().collect(),
    }
}
