use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One observed business day from the "Данные" sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Revenue (ТО), 0 means "not reported yet"
    pub revenue: f64,
    /// Traffic (ТР)
    pub traffic: i64,
    /// Receipts count used for the average check ("расчет ASP")
    #[serde(default)]
    pub receipts: f64,
    /// Per-row plan ("План на день"), if filled in
    #[serde(default)]
    pub plan_revenue_per_day: Option<i64>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, revenue: f64, traffic: i64) -> Self {
        Self {
            date,
            revenue,
            traffic,
            receipts: 0.0,
            plan_revenue_per_day: None,
        }
    }
}

/// Daily plan figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    pub revenue_per_day: i64,
    pub traffic_per_day: i64,
}

/// Where the plan used for today's target came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// "План на день" column of today's row
    DailyRow,
    /// Row of the "Планы" sheet for the current month
    PlansTable,
    /// `[pacing]` fallback from config.toml
    ConfigFallback,
    None,
}

// ---------------------------------------------------------------------------
// Time slots
// ---------------------------------------------------------------------------

/// Half-open clock interval `[start, end)` within one day, in minutes of day.
///
/// Text form is `HH:MM–HH:MM`; both en-dash and hyphen are accepted on input,
/// output always uses the en-dash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    pub start_minute: u32,
    pub end_minute: u32,
}

impl TimeSlot {
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    pub fn contains(&self, minute_of_day: u32) -> bool {
        minute_of_day >= self.start_minute && minute_of_day < self.end_minute
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }
}

fn parse_clock(s: &str) -> Result<u32, String> {
    let (h, m) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("invalid time '{}', expected HH:MM", s))?;
    let h: u32 = h.parse().map_err(|_| format!("invalid hour in '{}'", s))?;
    let m: u32 = m.parse().map_err(|_| format!("invalid minute in '{}'", s))?;
    if h > 24 || m > 59 || (h == 24 && m != 0) {
        return Err(format!("time out of range: '{}'", s));
    }
    Ok(h * 60 + m)
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('–')
            .or_else(|| s.split_once('-'))
            .ok_or_else(|| format!("invalid time slot '{}', expected HH:MM–HH:MM", s))?;
        let start_minute = parse_clock(start)?;
        let end_minute = parse_clock(end)?;
        if start_minute >= end_minute {
            return Err(format!("time slot '{}' ends before it starts", s));
        }
        Ok(Self::new(start_minute, end_minute))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}–{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

// ---------------------------------------------------------------------------
// Computed values
// ---------------------------------------------------------------------------

/// Today's goal: the greater of plan and this month's average so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingTarget {
    pub target_revenue: i64,
    pub target_traffic: i64,
    /// Number of prior days of this month that fed the average
    pub history_days: usize,
}

impl PacingTarget {
    /// All-zero target means "not enough data", never a real goal of zero.
    pub fn is_empty(&self) -> bool {
        self.target_revenue == 0 && self.target_traffic == 0
    }
}

/// One time slot of today's pacing curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub slot: TimeSlot,
    pub share: f64,
    pub expected_increment: i64,
    pub expected_traffic_increment: i64,
    pub cumulative_expected_revenue: i64,
    pub cumulative_expected_traffic: i64,
    pub is_peak_slot: bool,
    pub is_current: bool,
    /// Actual revenue so far covers the cumulative expectation
    pub is_met: bool,
}

/// Non-fatal conditions the dashboard should show next to the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PacingWarning {
    /// A sheet the target depends on failed to load; its data is missing
    SheetUnavailable { sheet: String },
    InsufficientData {
        history_days: usize,
        min_required: usize,
    },
    /// Numeric cells that were unparseable or negative and read as 0
    MalformedValues { count: usize },
    /// Rows dropped because the date could not be read
    SkippedRows { count: usize },
}

// ---------------------------------------------------------------------------
// API request / response
// ---------------------------------------------------------------------------

/// Query for the pacing dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyPacingRequest {
    /// Shop-local moment `YYYY-MM-DDTHH:MM[:SS]`; shop "now" when absent
    #[serde(default)]
    pub at: Option<String>,
}

/// Response for the daily pacing dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPacingResponse {
    /// Date in format "YYYY-MM-DD"
    pub date: String,
    /// Moment used for the computation, "HH:MM"
    pub time: String,
    /// e.g. "Wednesday"
    pub weekday: String,
    /// e.g. "среда"
    pub weekday_ru: String,
    pub plan_source: PlanSource,
    pub target: PacingTarget,
    pub actual_revenue: f64,
    pub actual_traffic: i64,
    pub checkpoints: Vec<Checkpoint>,
    /// Index into `checkpoints` of the slot containing `time`
    pub current_checkpoint: Option<usize>,
    pub warnings: Vec<PacingWarning>,
    /// When the underlying sheets were fetched (RFC 3339)
    pub loaded_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_parse_and_display() {
        let slot: TimeSlot = "09:00–12:00".parse().unwrap();
        assert_eq!(slot, TimeSlot::new(540, 720));
        assert_eq!(slot.to_string(), "09:00–12:00");

        let hyphen: TimeSlot = "18:00-21:00".parse().unwrap();
        assert_eq!(hyphen.to_string(), "18:00–21:00");
    }

    #[test]
    fn test_time_slot_rejects_garbage() {
        assert!("12:00–09:00".parse::<TimeSlot>().is_err());
        assert!("9–12".parse::<TimeSlot>().is_err());
        assert!("25:00–26:00".parse::<TimeSlot>().is_err());
        assert!("".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn test_time_slot_is_half_open() {
        let slot = TimeSlot::new(540, 720);
        assert!(!slot.contains(539));
        assert!(slot.contains(540));
        assert!(slot.contains(719));
        assert!(!slot.contains(720));
    }

    #[test]
    fn test_time_slot_overlap() {
        let a = TimeSlot::new(540, 720);
        assert!(!a.overlaps(&TimeSlot::new(720, 900)));
        assert!(a.overlaps(&TimeSlot::new(600, 660)));
    }

    #[test]
    fn test_time_slot_serde_as_string() {
        let slot = TimeSlot::new(720, 900);
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"12:00–15:00\"");
        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_warning_is_tagged() {
        let w = PacingWarning::MalformedValues { count: 3 };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "MalformedValues");
        assert_eq!(json["count"], 3);
    }
}
