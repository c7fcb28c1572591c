use async_trait::async_trait;
use std::time::Duration;

use super::{SheetKind, SheetsError};
use crate::shared::config::SheetsConfig;

/// Where the CSV text of a sheet tab comes from
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_csv(&self, sheet: SheetKind) -> Result<String, SheetsError>;
}

/// Published Google spreadsheet, one CSV export per tab
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    file_id: String,
    data_gid: u64,
    plans_gid: u64,
    costs_gid: u64,
    records_gid: u64,
    leaders_gid: u64,
}

impl GoogleSheetsSource {
    pub fn new(config: &SheetsConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            file_id: config.file_id.clone(),
            data_gid: config.data_gid,
            plans_gid: config.plans_gid,
            costs_gid: config.costs_gid,
            records_gid: config.records_gid,
            leaders_gid: config.leaders_gid,
        })
    }

    pub fn csv_url(&self, sheet: SheetKind) -> String {
        let gid = match sheet {
            SheetKind::Data => self.data_gid,
            SheetKind::Plans => self.plans_gid,
            SheetKind::Costs => self.costs_gid,
            SheetKind::Records => self.records_gid,
            SheetKind::Leaders => self.leaders_gid,
        };
        format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
            self.file_id, gid
        )
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    async fn fetch_csv(&self, sheet: SheetKind) -> Result<String, SheetsError> {
        let url = self.csv_url(sheet);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SheetsError::Http {
                sheet: sheet.label(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::Status {
                sheet: sheet.label(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SheetsError::Http {
            sheet: sheet.label(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::default_config;

    #[test]
    fn test_csv_url() {
        let config = default_config().unwrap();
        let source = GoogleSheetsSource::new(&config.sheets).unwrap();
        assert_eq!(
            source.csv_url(SheetKind::Plans),
            "https://docs.google.com/spreadsheets/d/1tTpD8d0U7P7BDjWNUritaGcuottV-cFg8mLPltaWrFI/export?format=csv&gid=1774855984"
        );
        assert!(source.csv_url(SheetKind::Leaders).ends_with("gid=1406705679"));
    }
}
