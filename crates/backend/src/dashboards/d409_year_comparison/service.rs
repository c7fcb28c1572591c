use chrono::{Datelike, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d409_year_comparison::{YearComparisonResponse, YearSeries};

use crate::shared::format::month_ru_short;

const YEARS_COMPARED: i32 = 3;

/// Average revenue of a reported day, per calendar month of `year`
fn monthly_averages(records: &[DailyRecord], year: i32) -> Vec<f64> {
    let mut sums = [0.0f64; 12];
    let mut counts = [0usize; 12];
    for r in records.iter().filter(|r| r.date.year() == year && r.revenue > 0.0) {
        let m = r.date.month0() as usize;
        sums[m] += r.revenue;
        counts[m] += 1;
    }
    sums.iter()
        .zip(counts)
        .map(|(sum, count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect()
}

/// Monthly average day of the current year and the two before it.
pub fn compute_year_comparison(records: &[DailyRecord], now: NaiveDateTime) -> YearComparisonResponse {
    let current = now.date().year();

    YearComparisonResponse {
        labels: (1..=12).map(|m| month_ru_short(m).to_string()).collect(),
        series: (0..YEARS_COMPARED)
            .map(|back| YearSeries {
                year: current - back,
                monthly_avg_revenue: monthly_averages(records, current - back),
            })
            .collect(),
    }
}
