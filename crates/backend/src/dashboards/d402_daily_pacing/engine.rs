//! Daily revenue/traffic pacing.
//!
//! Pure functions of their inputs: records, the intraday curve, an optional
//! plan and the shop-local "now". Nothing here reads the clock or does I/O.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use contracts::dashboards::d402_daily_pacing::{
    Checkpoint, DailyRecord, MonthlyPlan, PacingTarget,
};
use thiserror::Error;

use super::distribution::IntradayDistribution;

#[derive(Debug, Error, PartialEq)]
pub enum PacingError {
    /// The table must cover every weekday; a gap is a deployment defect.
    #[error("intraday distribution has no entry for {weekday}")]
    Configuration { weekday: Weekday },
}

/// Today's target revenue and traffic.
///
/// The average is taken over days of the current month strictly before
/// today that have revenue. Days with zero revenue are "not reported" and
/// are dropped from both sum and count. Traffic is averaged over the same
/// days. The result is the greater of the plan and the rounded average.
pub fn compute_today_target(
    records: &[DailyRecord],
    now: NaiveDateTime,
    plan: Option<&MonthlyPlan>,
) -> PacingTarget {
    let today = now.date();

    let history: Vec<&DailyRecord> = records
        .iter()
        .filter(|r| is_prior_day_of_month(r.date, today) && r.revenue > 0.0)
        .collect();

    let (avg_revenue, avg_traffic) = if history.is_empty() {
        (0.0, 0.0)
    } else {
        let days = history.len() as f64;
        let revenue: f64 = history.iter().map(|r| r.revenue).sum();
        let traffic: f64 = history.iter().map(|r| r.traffic.max(0) as f64).sum();
        (revenue / days, traffic / days)
    };

    let plan_revenue = plan.map_or(0, |p| p.revenue_per_day);
    let plan_traffic = plan.map_or(0, |p| p.traffic_per_day);

    PacingTarget {
        target_revenue: plan_revenue.max(avg_revenue.round() as i64),
        target_traffic: plan_traffic.max(avg_traffic.round() as i64),
        history_days: history.len(),
    }
}

/// Expected revenue/traffic per slot of today's weekday, in configured order.
///
/// Traffic reuses the revenue share of each slot.
pub fn build_checkpoints(
    target: &PacingTarget,
    distribution: &IntradayDistribution,
    now: NaiveDateTime,
) -> Result<Vec<Checkpoint>, PacingError> {
    let weekday = now.weekday();
    let slots = distribution
        .get(weekday)
        .ok_or(PacingError::Configuration { weekday })?;

    let max_share = slots
        .iter()
        .map(|s| s.share)
        .fold(f64::NEG_INFINITY, f64::max);
    let minute_of_day = now.hour() * 60 + now.minute();

    let mut cumulative_revenue = 0i64;
    let mut cumulative_traffic = 0i64;

    let checkpoints = slots
        .iter()
        .map(|s| {
            let expected_increment = (target.target_revenue as f64 * s.share).round() as i64;
            let expected_traffic_increment =
                (target.target_traffic as f64 * s.share).round() as i64;
            cumulative_revenue = cumulative_revenue.saturating_add(expected_increment);
            cumulative_traffic = cumulative_traffic.saturating_add(expected_traffic_increment);

            Checkpoint {
                slot: s.slot,
                share: s.share,
                expected_increment,
                expected_traffic_increment,
                cumulative_expected_revenue: cumulative_revenue,
                cumulative_expected_traffic: cumulative_traffic,
                is_peak_slot: s.share == max_share,
                is_current: s.slot.contains(minute_of_day),
                is_met: false,
            }
        })
        .collect();

    Ok(checkpoints)
}

/// Mark each checkpoint met when actual revenue covers its cumulative goal.
pub fn evaluate_progress(checkpoints: &[Checkpoint], actual_revenue_today: f64) -> Vec<Checkpoint> {
    checkpoints
        .iter()
        .map(|c| Checkpoint {
            is_met: actual_revenue_today >= c.cumulative_expected_revenue as f64,
            ..c.clone()
        })
        .collect()
}

/// Revenue and traffic reported for `today` (duplicate rows are summed)
pub fn today_actuals(records: &[DailyRecord], today: NaiveDate) -> (f64, i64) {
    records
        .iter()
        .filter(|r| r.date == today)
        .fold((0.0, 0), |(revenue, traffic), r| {
            (revenue + r.revenue, traffic.saturating_add(r.traffic.max(0)))
        })
}

fn is_prior_day_of_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month() && date.day() < today.day()
}
