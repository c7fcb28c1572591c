use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::shared::config::ShopConfig;

/// Current shop-local wall clock time
pub fn shop_now(shop: &ShopConfig) -> NaiveDateTime {
    (Utc::now() + Duration::hours(shop.utc_offset_hours)).naive_utc()
}

/// Moment a dashboard is computed for: `at` when given, otherwise shop "now".
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, a space instead of `T`, or a bare date
/// (read as midnight).
pub fn resolve_moment(at: Option<&str>, shop: &ShopConfig) -> Result<NaiveDateTime, String> {
    match at.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(shop_now(shop)),
        Some(raw) => parse_moment(raw),
    }
}

/// Number of days in `month` (1-12) of `year`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

/// "YYYY-MM" key used by the plans sheet and the responses
pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Year and month `offset` months after the given one
pub fn add_months(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let index = month - 1 + offset;
    (year + (index / 12) as i32, index % 12 + 1)
}

fn parse_moment(raw: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    for format in FORMATS {
        if let Ok(moment) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(moment);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid moment '{}', expected YYYY-MM-DDTHH:MM", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn shop() -> ShopConfig {
        ShopConfig {
            name: "test".to_string(),
            utc_offset_hours: 3,
        }
    }

    #[test]
    fn test_resolve_explicit_moment() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(19, 5, 0)
            .unwrap();
        assert_eq!(resolve_moment(Some("2025-10-15T19:05"), &shop()), Ok(expected));
        assert_eq!(resolve_moment(Some("2025-10-15 19:05:00"), &shop()), Ok(expected));
    }

    #[test]
    fn test_resolve_bare_date_is_midnight() {
        let moment = resolve_moment(Some("2025-10-15"), &shop()).unwrap();
        assert_eq!(moment.hour(), 0);
        assert_eq!(moment.minute(), 0);
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        assert!(resolve_moment(Some("15/10/2025"), &shop()).is_err());
    }

    #[test]
    fn test_empty_means_now() {
        let before = shop_now(&shop());
        let moment = resolve_moment(Some("  "), &shop()).unwrap();
        assert!(moment >= before);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 10), 31);
        assert_eq!(days_in_month(2025, 11), 30);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_add_months_wraps_year() {
        assert_eq!(add_months(2025, 10, 1), (2025, 11));
        assert_eq!(add_months(2025, 11, 2), (2026, 1));
        assert_eq!(add_months(2025, 12, 3), (2026, 3));
        assert_eq!(month_key(2026, 3), "2026-03");
    }
}
