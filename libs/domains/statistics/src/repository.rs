use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StatisticsResult;
use crate::models::EntityCounts;

/// Read-only view over the collections the dashboard reports on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    async fn entity_counts(&self) -> StatisticsResult<EntityCounts>;

    /// Sum of order `totalPrice` with `start <= createdAt < end`
    async fn sales_between(&self, start: DateTime<Utc>, end: DateTime<Utc>)
    -> StatisticsResult<f64>;
}

#[derive(Default)]
struct Ledger {
    counts: EntityCounts,
    orders: Vec<(DateTime<Utc>, f64)>,
}

/// Fixed counts plus a list of orders, for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryStatisticsRepository {
    inner: Arc<RwLock<Ledger>>,
}

impl InMemoryStatisticsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_counts(&self, counts: EntityCounts) {
        self.inner.write().await.counts = counts;
    }

    /// Record an order; also bumps the order count
    pub async fn record_order(&self, created_at: DateTime<Utc>, total_price: f64) {
        let mut inner = self.inner.write().await;
        inner.orders.push((created_at, total_price));
        inner.counts.orders += 1;
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryStatisticsRepository {
    async fn entity_counts(&self) -> StatisticsResult<EntityCounts> {
        Ok(self.inner.read().await.counts)
    }

    async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatisticsResult<f64> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .iter()
            .filter(|(at, _)| start <= *at && *at < end)
            .map(|(_, total)| total)
            .sum())
    }
}
