use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::dashboards::d402_daily_pacing::distribution::DistributionConfig;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub shop: ShopConfig,
    pub sheets: SheetsConfig,
    pub pacing: PacingConfig,
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub purchase: PurchaseConfig,
    pub distribution: DistributionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShopConfig {
    pub name: String,
    /// Shop-local time = UTC + offset
    pub utc_offset_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet id from the "publish to web" link
    pub file_id: String,
    pub data_gid: u64,
    pub plans_gid: u64,
    pub costs_gid: u64,
    #[serde(default = "default_records_gid")]
    pub records_gid: u64,
    #[serde(default = "default_leaders_gid")]
    pub leaders_gid: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Snapshots with a failed tab are kept only this long
    #[serde(default = "default_partial_cache_ttl_secs")]
    pub partial_cache_ttl_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    #[serde(default)]
    pub fallback_revenue_per_day: Option<i64>,
    #[serde(default)]
    pub fallback_traffic_per_day: Option<i64>,
    /// Below this many prior days the target is flagged as insufficient data
    #[serde(default = "default_min_history_days")]
    pub min_history_days: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisorConfig {
    pub asp_min: f64,
    pub revenue_min: f64,
    pub ebitda_min: f64,
}

/// Purchase = average of the last `window_days` × `days_covered` × `cost_share`
#[derive(Debug, Deserialize, Clone)]
pub struct PurchaseConfig {
    #[serde(default = "default_purchase_window_days")]
    pub window_days: usize,
    #[serde(default = "default_purchase_days_covered")]
    pub days_covered: f64,
    #[serde(default = "default_purchase_cost_share")]
    pub cost_share: f64,
    #[serde(default = "default_purchase_tolerance")]
    pub tolerance: i64,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            window_days: default_purchase_window_days(),
            days_covered: default_purchase_days_covered(),
            cost_share: default_purchase_cost_share(),
            tolerance: default_purchase_tolerance(),
        }
    }
}

fn default_purchase_window_days() -> usize {
    3
}

fn default_purchase_days_covered() -> f64 {
    4.0
}

fn default_purchase_cost_share() -> f64 {
    0.45
}

fn default_purchase_tolerance() -> i64 {
    5000
}

fn default_records_gid() -> u64 {
    143269600
}

fn default_leaders_gid() -> u64 {
    1406705679
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_partial_cache_ttl_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_min_history_days() -> usize {
    1
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[shop]
name = "KIVI Market"
utc_offset_hours = 3

[sheets]
file_id = "1tTpD8d0U7P7BDjWNUritaGcuottV-cFg8mLPltaWrFI"
data_gid = 2099900296
plans_gid = 1774855984
costs_gid = 567373639
records_gid = 143269600
leaders_gid = 1406705679
cache_ttl_secs = 300
partial_cache_ttl_secs = 30
timeout_secs = 30

[pacing]
fallback_revenue_per_day = 27000
min_history_days = 1

[advisor]
asp_min = 250.0
revenue_min = 25000.0
ebitda_min = 2000.0

[purchase]
window_days = 3
days_covered = 4.0
cost_share = 0.45
tolerance = 5000

[distribution]
monday    = [["09:00–12:00", 0.117], ["12:00–15:00", 0.267], ["15:00–18:00", 0.322], ["18:00–21:00", 0.294]]
tuesday   = [["09:00–12:00", 0.170], ["12:00–15:00", 0.291], ["15:00–18:00", 0.319], ["18:00–21:00", 0.220]]
wednesday = [["09:00–12:00", 0.177], ["12:00–15:00", 0.248], ["15:00–18:00", 0.252], ["18:00–21:00", 0.316]]
thursday  = [["09:00–12:00", 0.123], ["12:00–15:00", 0.242], ["15:00–18:00", 0.330], ["18:00–21:00", 0.304]]
friday    = [["09:00–12:00", 0.155], ["12:00–15:00", 0.215], ["15:00–18:00", 0.318], ["18:00–21:00", 0.305]]
saturday  = [["09:00–12:00", 0.182], ["12:00–15:00", 0.333], ["15:00–18:00", 0.293], ["18:00–21:00", 0.192]]
sunday    = [["09:00–12:00", 0.134], ["12:00–15:00", 0.389], ["15:00–18:00", 0.306], ["18:00–21:00", 0.170]]
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Load config once and keep it for the lifetime of the process
pub fn initialize_config() -> anyhow::Result<&'static Config> {
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

pub fn get_config() -> &'static Config {
    CONFIG.get().expect("config is not initialized")
}
