use chrono::{Datelike, NaiveDate, NaiveDateTime};
use contracts::dashboards::d402_daily_pacing::{
    DailyPacingResponse, DailyRecord, MonthlyPlan, PacingWarning, PlanSource,
};

use super::distribution::IntradayDistribution;
use super::engine::{self, PacingError};
use crate::shared::config::PacingConfig;
use crate::shared::format::{format_rub, weekday_en, weekday_ru};
use crate::shared::sheets::{PlanRow, SheetKind, SheetsSnapshot};

/// Plan for `today`, first found wins:
/// today's "План на день", the month row of "Планы", the config fallback.
///
/// The daily row carries revenue only; its traffic comes from the next source.
pub fn resolve_plan(
    records: &[DailyRecord],
    plans: &[PlanRow],
    today: NaiveDate,
    config: &PacingConfig,
) -> (Option<MonthlyPlan>, PlanSource) {
    let month = format!("{:04}-{:02}", today.year(), today.month());
    let month_row = plans
        .iter()
        .find(|p| p.month == month)
        .filter(|p| p.revenue_per_day > 0 || p.traffic_per_day > 0);

    let fallback = match (config.fallback_revenue_per_day, config.fallback_traffic_per_day) {
        (None, None) => None,
        (revenue, traffic) => Some(MonthlyPlan {
            revenue_per_day: revenue.unwrap_or(0),
            traffic_per_day: traffic.unwrap_or(0),
        }),
    };

    let day_plan = records
        .iter()
        .filter(|r| r.date == today)
        .find_map(|r| r.plan_revenue_per_day);

    if let Some(revenue_per_day) = day_plan {
        let traffic_per_day = month_row
            .map(|p| p.traffic_per_day)
            .or_else(|| fallback.map(|f| f.traffic_per_day))
            .unwrap_or(0);
        return (
            Some(MonthlyPlan {
                revenue_per_day,
                traffic_per_day,
            }),
            PlanSource::DailyRow,
        );
    }

    if let Some(row) = month_row {
        return (
            Some(MonthlyPlan {
                revenue_per_day: row.revenue_per_day,
                traffic_per_day: row.traffic_per_day,
            }),
            PlanSource::PlansTable,
        );
    }

    match fallback {
        Some(plan) => (Some(plan), PlanSource::ConfigFallback),
        None => (None, PlanSource::None),
    }
}

/// Full pacing picture for the moment `now`: target, evaluated checkpoints,
/// today's actuals and data warnings.
pub fn build_daily_pacing(
    snapshot: &SheetsSnapshot,
    distribution: &IntradayDistribution,
    config: &PacingConfig,
    now: NaiveDateTime,
) -> Result<DailyPacingResponse, PacingError> {
    let today = now.date();

    let (plan, plan_source) = resolve_plan(&snapshot.records, &snapshot.plans, today, config);
    let target = engine::compute_today_target(&snapshot.records, now, plan.as_ref());
    let checkpoints = engine::build_checkpoints(&target, distribution, now)?;
    let (actual_revenue, actual_traffic) = engine::today_actuals(&snapshot.records, today);
    let checkpoints = engine::evaluate_progress(&checkpoints, actual_revenue);
    let current_checkpoint = checkpoints.iter().position(|c| c.is_current);

    let mut warnings: Vec<PacingWarning> = snapshot
        .failed_sheets
        .iter()
        .filter(|sheet| matches!(sheet, SheetKind::Data | SheetKind::Plans))
        .map(|sheet| PacingWarning::SheetUnavailable {
            sheet: sheet.label().to_string(),
        })
        .collect();
    if target.history_days < config.min_history_days {
        warnings.push(PacingWarning::InsufficientData {
            history_days: target.history_days,
            min_required: config.min_history_days,
        });
    }
    if snapshot.quality.malformed_values > 0 {
        warnings.push(PacingWarning::MalformedValues {
            count: snapshot.quality.malformed_values,
        });
    }
    if snapshot.quality.skipped_rows > 0 {
        warnings.push(PacingWarning::SkippedRows {
            count: snapshot.quality.skipped_rows,
        });
    }

    tracing::info!(
        "Oracle {}: цель на день {}, трафик {}, факт {} ({:?}, дней в среднем: {})",
        today,
        format_rub(target.target_revenue),
        target.target_traffic,
        format_rub(actual_revenue.round() as i64),
        plan_source,
        target.history_days
    );

    Ok(DailyPacingResponse {
        date: today.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M").to_string(),
        weekday: weekday_en(today.weekday()).to_string(),
        weekday_ru: weekday_ru(today.weekday()).to_string(),
        plan_source,
        target,
        actual_revenue,
        actual_traffic,
        checkpoints,
        current_checkpoint,
        warnings,
        loaded_at: snapshot.loaded_at.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::default_config;
    use crate::shared::sheets::testing::{snapshot_of, StaticSource};
    use crate::shared::sheets::{load_snapshot, DataQuality};
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn no_fallback() -> PacingConfig {
        PacingConfig {
            fallback_revenue_per_day: None,
            fallback_traffic_per_day: None,
            min_history_days: 1,
        }
    }

    fn plan_row(month: &str, revenue: i64, traffic: i64) -> PlanRow {
        PlanRow {
            month: month.to_string(),
            revenue_per_day: revenue,
            traffic_per_day: traffic,
        }
    }

    fn snapshot(records: Vec<DailyRecord>, plans: Vec<PlanRow>) -> SheetsSnapshot {
        SheetsSnapshot {
            plans,
            ..snapshot_of(records)
        }
    }

    #[test]
    fn test_plan_from_daily_row_first() {
        let mut today_row = DailyRecord::new(date("2025-10-15"), 0.0, 0);
        today_row.plan_revenue_per_day = Some(31000);
        let plans = vec![plan_row("2025-10", 27000, 90)];

        let (plan, source) = resolve_plan(&[today_row], &plans, date("2025-10-15"), &no_fallback());
        assert_eq!(source, PlanSource::DailyRow);
        assert_eq!(
            plan,
            Some(MonthlyPlan {
                revenue_per_day: 31000,
                traffic_per_day: 90
            })
        );
    }

    #[test]
    fn test_plan_from_month_row() {
        let plans = vec![plan_row("2025-09", 1, 1), plan_row("2025-10", 27000, 90)];
        let (plan, source) = resolve_plan(&[], &plans, date("2025-10-15"), &no_fallback());
        assert_eq!(source, PlanSource::PlansTable);
        assert_eq!(plan.unwrap().revenue_per_day, 27000);
    }

    #[test]
    fn test_plan_from_config_fallback() {
        let config = default_config().unwrap().pacing;
        let plans = vec![plan_row("2025-10", 0, 0)];
        let (plan, source) = resolve_plan(&[], &plans, date("2025-10-15"), &config);
        assert_eq!(source, PlanSource::ConfigFallback);
        assert_eq!(
            plan,
            Some(MonthlyPlan {
                revenue_per_day: 27000,
                traffic_per_day: 0
            })
        );
    }

    #[test]
    fn test_no_plan_anywhere() {
        let (plan, source) = resolve_plan(&[], &[], date("2025-10-15"), &no_fallback());
        assert_eq!(plan, None);
        assert_eq!(source, PlanSource::None);
    }

    #[test]
    fn test_build_daily_pacing() {
        let config = default_config().unwrap();
        let distribution = IntradayDistribution::from_config(&config.distribution).unwrap();
        let records = vec![
            DailyRecord::new(date("2025-10-13"), 26000.0, 80),
            DailyRecord::new(date("2025-10-14"), 0.0, 0),
            DailyRecord::new(date("2025-10-15"), 12000.0, 35),
        ];
        let snapshot = snapshot(records, vec![plan_row("2025-10", 27000, 90)]);

        let response =
            build_daily_pacing(&snapshot, &distribution, &config.pacing, at("2025-10-15 16:20"))
                .unwrap();

        assert_eq!(response.date, "2025-10-15");
        assert_eq!(response.time, "16:20");
        assert_eq!(response.weekday, "Wednesday");
        assert_eq!(response.weekday_ru, "среда");
        assert_eq!(response.plan_source, PlanSource::PlansTable);
        assert_eq!(response.target.target_revenue, 27000);
        assert_eq!(response.target.target_traffic, 90);
        assert_eq!(response.target.history_days, 1);
        assert_eq!(response.actual_revenue, 12000.0);
        assert_eq!(response.actual_traffic, 35);
        assert_eq!(response.current_checkpoint, Some(2));

        let met: Vec<bool> = response.checkpoints.iter().map(|c| c.is_met).collect();
        assert_eq!(met, vec![true, true, false, false]);
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn test_response_json_shape() {
        let config = default_config().unwrap();
        let distribution = IntradayDistribution::from_config(&config.distribution).unwrap();
        let snapshot = snapshot(Vec::new(), vec![plan_row("2025-10", 27000, 90)]);

        let response =
            build_daily_pacing(&snapshot, &distribution, &config.pacing, at("2025-10-15 10:00"))
                .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["plan_source"], "plans_table");
        assert_eq!(json["checkpoints"][0]["slot"], "09:00–12:00");
        assert_eq!(json["checkpoints"][0]["is_current"], true);
        assert_eq!(json["checkpoints"][3]["is_peak_slot"], true);
        assert_eq!(json["warnings"][0]["kind"], "InsufficientData");
    }

    #[test]
    fn test_warnings_for_thin_and_dirty_data() {
        let config = default_config().unwrap();
        let distribution = IntradayDistribution::from_config(&config.distribution).unwrap();
        let mut snapshot = snapshot(Vec::new(), Vec::new());
        snapshot.quality = DataQuality {
            malformed_values: 2,
            skipped_rows: 1,
        };

        let response =
            build_daily_pacing(&snapshot, &distribution, &config.pacing, at("2025-10-01 09:00"))
                .unwrap();

        assert_eq!(response.plan_source, PlanSource::ConfigFallback);
        assert_eq!(response.target.target_revenue, 27000);
        assert_eq!(
            response.warnings,
            vec![
                PacingWarning::InsufficientData {
                    history_days: 0,
                    min_required: 1
                },
                PacingWarning::MalformedValues { count: 2 },
                PacingWarning::SkippedRows { count: 1 },
            ]
        );
    }

    #[test]
    fn test_missing_weekday_propagates() {
        let snapshot = snapshot(Vec::new(), Vec::new());
        let err = build_daily_pacing(
            &snapshot,
            &IntradayDistribution::default(),
            &no_fallback(),
            at("2025-10-15 12:00"),
        )
        .unwrap_err();
        assert!(matches!(err, PacingError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_failed_data_sheet_is_reported() {
        let config = default_config().unwrap();
        let distribution = IntradayDistribution::from_config(&config.distribution).unwrap();
        let source = StaticSource::default()
            .with(SheetKind::Plans, "Месяц,План по выручке,План по трафику\n2025-10,27000,90\n")
            .with(SheetKind::Costs, "Статья,Значение,Тип\nАренда,3000,руб\n");
        let snapshot = load_snapshot(&source, Utc::now()).await.unwrap();

        let response =
            build_daily_pacing(&snapshot, &distribution, &config.pacing, at("2025-10-15 12:00"))
                .unwrap();

        assert_eq!(
            response.warnings[0],
            PacingWarning::SheetUnavailable {
                sheet: "Данные".to_string()
            }
        );
        // Records and Leaders failing do not concern pacing
        assert_eq!(
            response
                .warnings
                .iter()
                .filter(|w| matches!(w, PacingWarning::SheetUnavailable { .. }))
                .count(),
            1
        );
    }
}
