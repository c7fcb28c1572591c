use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::source::SheetSource;
use super::{load_snapshot, SheetsError, SheetsSnapshot};

/// Keeps the last snapshot for `ttl`, then reloads on the next request.
///
/// A snapshot with a failed tab lives only `partial_ttl`, so a transient
/// fetch error does not pin empty data for the full period.
pub struct SnapshotCache {
    ttl: Duration,
    partial_ttl: Duration,
    current: RwLock<Option<Arc<SheetsSnapshot>>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration, partial_ttl: Duration) -> Self {
        Self {
            ttl,
            partial_ttl: partial_ttl.min(ttl),
            current: RwLock::new(None),
        }
    }

    fn is_fresh(&self, snapshot: &SheetsSnapshot, now: DateTime<Utc>) -> bool {
        let ttl = if snapshot.failed_sheets.is_empty() {
            self.ttl
        } else {
            self.partial_ttl
        };
        now - snapshot.loaded_at < ttl
    }

    pub async fn get_or_load(
        &self,
        source: &dyn SheetSource,
        now: DateTime<Utc>,
    ) -> Result<Arc<SheetsSnapshot>, SheetsError> {
        if let Some(snapshot) = self.current.read().await.as_ref() {
            if self.is_fresh(snapshot, now) {
                return Ok(Arc::clone(snapshot));
            }
        }

        let mut current = self.current.write().await;
        // Another request may have reloaded while we waited for the lock
        if let Some(snapshot) = current.as_ref() {
            if self.is_fresh(snapshot, now) {
                return Ok(Arc::clone(snapshot));
            }
        }

        let snapshot = Arc::new(load_snapshot(source, now).await?);
        *current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::sheets::testing::StaticSource;
    use crate::shared::sheets::SheetKind;

    fn source() -> StaticSource {
        StaticSource::default()
            .with(SheetKind::Data, "Дата,TO\n2025-10-01,100\n")
            .with(SheetKind::Plans, "Месяц,План по выручке\n2025-10,27000\n")
            .with(SheetKind::Costs, "Значение,Тип\n3000,руб\n")
            .with(SheetKind::Records, "Показатель,Значение\nРекордная выручка,61000\n")
            .with(SheetKind::Leaders, "Лидеры продаж\nКиви\n")
    }

    fn cache() -> SnapshotCache {
        SnapshotCache::new(Duration::minutes(5), Duration::seconds(30))
    }

    #[tokio::test]
    async fn test_snapshot_is_reused_within_ttl() {
        let source = source();
        let cache = cache();
        let t0 = Utc::now();

        let first = cache.get_or_load(&source, t0).await.unwrap();
        let second = cache
            .get_or_load(&source, t0 + Duration::minutes(4))
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        // one fetch per tab
        assert_eq!(source.fetch_count(), 5);
    }

    #[tokio::test]
    async fn test_snapshot_reloads_after_ttl() {
        let source = source();
        let cache = cache();
        let t0 = Utc::now();

        let first = cache.get_or_load(&source, t0).await.unwrap();
        let second = cache
            .get_or_load(&source, t0 + Duration::minutes(5))
            .await
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 10);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let source = StaticSource::default();
        let cache = cache();

        assert!(cache.get_or_load(&source, Utc::now()).await.is_err());
        assert!(cache.get_or_load(&source, Utc::now()).await.is_err());
        assert_eq!(source.fetch_count(), 10);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let source = source();
        let cache = cache();
        let t0 = Utc::now();

        cache.get_or_load(&source, t0).await.unwrap();
        cache.invalidate().await;
        cache.get_or_load(&source, t0).await.unwrap();
        assert_eq!(source.fetch_count(), 10);
    }

    #[tokio::test]
    async fn test_partial_snapshot_expires_early() {
        let source = StaticSource::default().with(SheetKind::Plans, "Месяц,План по выручке\n2025-10,27000\n");
        let cache = cache();
        let t0 = Utc::now();

        let first = cache.get_or_load(&source, t0).await.unwrap();
        assert!(first.failed_sheets.contains(&SheetKind::Data));

        let within = cache
            .get_or_load(&source, t0 + Duration::seconds(10))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &within));

        let after = cache
            .get_or_load(&source, t0 + Duration::seconds(30))
            .await
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &after));
        assert_eq!(source.fetch_count(), 10);
    }
}
