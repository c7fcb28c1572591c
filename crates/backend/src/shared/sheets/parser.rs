use chrono::NaiveDate;
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d403_advisor::{CostItem, CostKind};

use super::{DataQuality, PlanRow, SheetsError, ShopRecord};

const DATE_COLUMNS: &[&str] = &["Дата", "День"];
// Latin "TO" and Cyrillic "ТО" both occur in the sheet history
const REVENUE_COLUMNS: &[&str] = &["TO", "ТО"];
const TRAFFIC_COLUMNS: &[&str] = &["ТР", "TP"];
const RECEIPTS_COLUMNS: &[&str] = &["расчет ASP"];
const DAY_PLAN_COLUMNS: &[&str] = &["План на день"];

const MONTH_COLUMNS: &[&str] = &["Месяц"];
const PLAN_REVENUE_COLUMNS: &[&str] = &["План по выручке"];
const PLAN_TRAFFIC_COLUMNS: &[&str] = &["План по трафику"];

const COST_NAME_COLUMNS: &[&str] = &["Статья", "Название", "Показатель"];
const COST_VALUE_COLUMNS: &[&str] = &["Значение"];
const COST_KIND_COLUMNS: &[&str] = &["Тип"];

const RECORD_NAME_COLUMNS: &[&str] = &["Показатель"];
const RECORD_VALUE_COLUMNS: &[&str] = &["Значение"];

const LEADER_COLUMNS: &[&str] = &["Лидеры продаж"];

/// Raw CSV sheet: trimmed headers and non-blank rows
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(csv_text: &str) -> Result<Self, SheetsError> {
        // Strip UTF-8 BOM if present
        let text = csv_text.trim_start_matches('\u{FEFF}');

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Skipping malformed CSV record: {}", e);
                    continue;
                }
            };
            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Index of the first header matching any alias (case-insensitive)
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let alias = alias.to_lowercase();
            self.headers.iter().position(|h| h.to_lowercase() == alias)
        })
    }

    fn require(&self, aliases: &[&str]) -> Result<usize, SheetsError> {
        self.column(aliases)
            .ok_or_else(|| SheetsError::MissingColumn(aliases.join(" / ")))
    }

    fn cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
        index
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Number typed by hand into the sheet: "27 000", "1 234,5", "30000₽".
///
/// All whitespace is dropped (including non-breaking spaces), the first comma
/// becomes the decimal point and the longest numeric prefix is read. An empty
/// cell is 0. `None` means unparseable or negative.
pub fn clean_number(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Some(0.0);
    }
    let normalized = compact.replacen(',', ".", 1);

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, ch) in normalized.char_indices() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            '-' | '+' if i == 0 => {}
            _ => break,
        }
        end = i + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }

    let value: f64 = normalized[..end].trim_end_matches('.').parse().ok()?;
    if value < 0.0 || !value.is_finite() {
        return None;
    }
    Some(value)
}

/// Like [`clean_number`], but reads bad cells as 0 and counts them.
pub fn coerce_number(raw: &str, quality: &mut DataQuality) -> f64 {
    match clean_number(raw) {
        Some(value) => value,
        None => {
            quality.malformed_values += 1;
            0.0
        }
    }
}

/// Counts and daily plans above this are typos, not data
const MAX_COUNT: f64 = 1e12;

/// Integer count, fractional part dropped. Values above a trillion are read
/// as 0 and counted like unparseable cells.
pub fn coerce_count(raw: &str, quality: &mut DataQuality) -> i64 {
    let value = coerce_number(raw, quality);
    if value > MAX_COUNT {
        quality.malformed_values += 1;
        return 0;
    }
    value.trunc() as i64
}

/// `YYYY-MM-DD` or `DD.MM.YYYY`, zero padding optional, possibly followed
/// by a time
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let head = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .ok()
}

/// Parse the "Данные" sheet
pub fn parse_daily_records(csv_text: &str) -> Result<(Vec<DailyRecord>, DataQuality), SheetsError> {
    let table = CsvTable::parse(csv_text)?;
    let date_col = table.require(DATE_COLUMNS)?;
    let revenue_col = table.require(REVENUE_COLUMNS)?;
    let traffic_col = table.column(TRAFFIC_COLUMNS);
    let receipts_col = table.column(RECEIPTS_COLUMNS);
    let day_plan_col = table.column(DAY_PLAN_COLUMNS);

    let mut quality = DataQuality::default();
    let mut records = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let Some(date) = parse_sheet_date(CsvTable::cell(row, Some(date_col))) else {
            quality.skipped_rows += 1;
            continue;
        };

        let revenue = coerce_number(CsvTable::cell(row, Some(revenue_col)), &mut quality);
        let traffic = coerce_count(CsvTable::cell(row, traffic_col), &mut quality);
        let receipts = coerce_number(CsvTable::cell(row, receipts_col), &mut quality);
        let plan_revenue_per_day = match CsvTable::cell(row, day_plan_col) {
            "" => None,
            raw => Some(coerce_count(raw, &mut quality)).filter(|v| *v > 0),
        };

        records.push(DailyRecord {
            date,
            revenue,
            traffic,
            receipts,
            plan_revenue_per_day,
        });
    }

    Ok((records, quality))
}

/// Parse the "Планы" sheet
pub fn parse_plans(csv_text: &str) -> Result<(Vec<PlanRow>, DataQuality), SheetsError> {
    let table = CsvTable::parse(csv_text)?;
    let month_col = table.require(MONTH_COLUMNS)?;
    let revenue_col = table.column(PLAN_REVENUE_COLUMNS);
    let traffic_col = table.column(PLAN_TRAFFIC_COLUMNS);

    let mut quality = DataQuality::default();
    let mut plans = Vec::new();

    for row in &table.rows {
        let month = CsvTable::cell(row, Some(month_col));
        if month.is_empty() {
            quality.skipped_rows += 1;
            continue;
        }
        plans.push(PlanRow {
            month: month.to_string(),
            revenue_per_day: coerce_count(CsvTable::cell(row, revenue_col), &mut quality),
            traffic_per_day: coerce_count(CsvTable::cell(row, traffic_col), &mut quality),
        });
    }

    Ok((plans, quality))
}

/// Parse the "EBITDA" cost structure sheet
pub fn parse_costs(csv_text: &str) -> Result<(Vec<CostItem>, DataQuality), SheetsError> {
    let table = CsvTable::parse(csv_text)?;
    let value_col = table.require(COST_VALUE_COLUMNS)?;
    let kind_col = table.require(COST_KIND_COLUMNS)?;
    let name_col = table.column(COST_NAME_COLUMNS);

    let mut quality = DataQuality::default();
    let costs = table
        .rows
        .iter()
        .map(|row| CostItem {
            name: CsvTable::cell(row, name_col).to_string(),
            value: coerce_number(CsvTable::cell(row, Some(value_col)), &mut quality),
            kind: CostKind::from_label(CsvTable::cell(row, Some(kind_col))),
        })
        .collect();

    Ok((costs, quality))
}

/// Parse the "Рекорды" sheet
pub fn parse_shop_records(csv_text: &str) -> Result<(Vec<ShopRecord>, DataQuality), SheetsError> {
    let table = CsvTable::parse(csv_text)?;
    let name_col = table.require(RECORD_NAME_COLUMNS)?;
    let value_col = table.require(RECORD_VALUE_COLUMNS)?;

    let mut quality = DataQuality::default();
    let mut records = Vec::new();
    for row in &table.rows {
        let indicator = CsvTable::cell(row, Some(name_col));
        if indicator.is_empty() {
            quality.skipped_rows += 1;
            continue;
        }
        records.push(ShopRecord {
            indicator: indicator.to_string(),
            value: coerce_number(CsvTable::cell(row, Some(value_col)), &mut quality),
        });
    }

    Ok((records, quality))
}

/// Parse the "Лидеры" sheet: non-empty product names, in order
pub fn parse_leaders(csv_text: &str) -> Result<(Vec<String>, DataQuality), SheetsError> {
    let table = CsvTable::parse(csv_text)?;
    let name_col = table.require(LEADER_COLUMNS)?;

    let leaders = table
        .rows
        .iter()
        .map(|row| CsvTable::cell(row, Some(name_col)))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    Ok((leaders, DataQuality::default()))
}
