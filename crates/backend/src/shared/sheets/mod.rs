pub mod cache;
pub mod parser;
pub mod source;

use chrono::{DateTime, Utc};
use contracts::dashboards::d402_daily_pacing::DailyRecord;
use contracts::dashboards::d403_advisor::CostItem;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use thiserror::Error;

use crate::shared::config::SheetsConfig;
use cache::SnapshotCache;
use source::{GoogleSheetsSource, SheetSource};

static SHEETS: OnceCell<SheetsService> = OnceCell::new();

/// Spreadsheet tabs the dashboards read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Data,
    Plans,
    Costs,
    Records,
    Leaders,
}

impl SheetKind {
    pub const ALL: [SheetKind; 5] = [
        SheetKind::Data,
        SheetKind::Plans,
        SheetKind::Costs,
        SheetKind::Records,
        SheetKind::Leaders,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SheetKind::Data => "Данные",
            SheetKind::Plans => "Планы",
            SheetKind::Costs => "EBITDA",
            SheetKind::Records => "Рекорды",
            SheetKind::Leaders => "Лидеры",
        }
    }
}

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error for sheet \"{sheet}\": {source}")]
    Http {
        sheet: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("sheet \"{sheet}\" returned HTTP {status}")]
    Status { sheet: &'static str, status: u16 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column not found: {0}")]
    MissingColumn(String),

    #[error("no sheet could be loaded")]
    NothingLoaded,
}

/// Counters of what the loader had to forgive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Numeric cells that were unparseable or negative, read as 0
    pub malformed_values: usize,
    /// Rows dropped because the key column could not be read
    pub skipped_rows: usize,
}

impl DataQuality {
    pub fn merge(&mut self, other: DataQuality) {
        self.malformed_values += other.malformed_values;
        self.skipped_rows += other.skipped_rows;
    }
}

/// One row of the "Планы" sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    /// "YYYY-MM"
    pub month: String,
    pub revenue_per_day: i64,
    pub traffic_per_day: i64,
}

/// One row of the "Рекорды" sheet: best values ever reached
#[derive(Debug, Clone, PartialEq)]
pub struct ShopRecord {
    /// "Показатель", e.g. "Рекордная выручка"
    pub indicator: String,
    pub value: f64,
}

/// Immutable copy of all sheets, taken at `loaded_at`
#[derive(Debug, Clone)]
pub struct SheetsSnapshot {
    pub records: Vec<DailyRecord>,
    pub plans: Vec<PlanRow>,
    pub costs: Vec<CostItem>,
    pub shop_records: Vec<ShopRecord>,
    /// Best-selling products, in sheet order
    pub leaders: Vec<String>,
    pub quality: DataQuality,
    pub failed_sheets: Vec<SheetKind>,
    pub loaded_at: DateTime<Utc>,
}

/// Fetch every tab concurrently and parse it.
///
/// A tab that fails is logged and left empty. Fails only when no tab loads.
pub async fn load_snapshot(
    source: &dyn SheetSource,
    loaded_at: DateTime<Utc>,
) -> Result<SheetsSnapshot, SheetsError> {
    tracing::info!("Загрузка листов из Google Sheets...");

    let (data, plans, costs, shop_records, leaders) = tokio::join!(
        load_sheet(source, SheetKind::Data, parser::parse_daily_records),
        load_sheet(source, SheetKind::Plans, parser::parse_plans),
        load_sheet(source, SheetKind::Costs, parser::parse_costs),
        load_sheet(source, SheetKind::Records, parser::parse_shop_records),
        load_sheet(source, SheetKind::Leaders, parser::parse_leaders),
    );

    let mut quality = DataQuality::default();
    let mut failed_sheets = Vec::new();
    let mut take = |sheet: SheetKind, loaded: Option<DataQuality>| match loaded {
        Some(q) => quality.merge(q),
        None => failed_sheets.push(sheet),
    };

    let (records, q) = split(data);
    take(SheetKind::Data, q);
    let (plans, q) = split(plans);
    take(SheetKind::Plans, q);
    let (costs, q) = split(costs);
    take(SheetKind::Costs, q);
    let (shop_records, q) = split(shop_records);
    take(SheetKind::Records, q);
    let (leaders, q) = split(leaders);
    take(SheetKind::Leaders, q);

    if failed_sheets.len() == SheetKind::ALL.len() {
        return Err(SheetsError::NothingLoaded);
    }

    let snapshot = SheetsSnapshot {
        records,
        plans,
        costs,
        shop_records,
        leaders,
        quality,
        failed_sheets,
        loaded_at,
    };

    if snapshot.quality.malformed_values > 0 || snapshot.quality.skipped_rows > 0 {
        tracing::warn!(
            "Sheets data quality: {} malformed values read as 0, {} rows skipped",
            snapshot.quality.malformed_values,
            snapshot.quality.skipped_rows
        );
    }

    Ok(snapshot)
}

fn split<T>(loaded: Option<(Vec<T>, DataQuality)>) -> (Vec<T>, Option<DataQuality>) {
    match loaded {
        Some((rows, quality)) => (rows, Some(quality)),
        None => (Vec::new(), None),
    }
}

async fn load_sheet<T>(
    source: &dyn SheetSource,
    sheet: SheetKind,
    parse: fn(&str) -> Result<(Vec<T>, DataQuality), SheetsError>,
) -> Option<(Vec<T>, DataQuality)> {
    let result = match source.fetch_csv(sheet).await {
        Ok(text) => parse(&text),
        Err(e) => Err(e),
    };

    match result {
        Ok((rows, quality)) => {
            tracing::info!("Лист \"{}\" загружен: {} строк", sheet.label(), rows.len());
            Some((rows, quality))
        }
        Err(e) => {
            tracing::error!("Ошибка загрузки листа \"{}\": {}", sheet.label(), e);
            None
        }
    }
}

/// Sheet source plus the TTL cache in front of it
pub struct SheetsService {
    source: Box<dyn SheetSource>,
    cache: SnapshotCache,
}

impl SheetsService {
    pub fn new(source: Box<dyn SheetSource>, cache: SnapshotCache) -> Self {
        Self { source, cache }
    }

    pub async fn snapshot(&self) -> Result<Arc<SheetsSnapshot>, SheetsError> {
        self.cache.get_or_load(self.source.as_ref(), Utc::now()).await
    }

    /// Drop the cached snapshot and fetch the sheets again
    pub async fn refresh(&self) -> Result<Arc<SheetsSnapshot>, SheetsError> {
        self.cache.invalidate().await;
        self.snapshot().await
    }
}

pub fn initialize_sheets(config: &SheetsConfig) -> anyhow::Result<()> {
    let source = GoogleSheetsSource::new(config)?;
    let cache = SnapshotCache::new(
        chrono::Duration::seconds(config.cache_ttl_secs as i64),
        chrono::Duration::seconds(config.partial_cache_ttl_secs as i64),
    );
    let _ = SHEETS.set(SheetsService::new(Box::new(source), cache));
    Ok(())
}

pub fn get_sheets() -> &'static SheetsService {
    SHEETS
        .get()
        .expect("Sheets service has not been initialized")
}
